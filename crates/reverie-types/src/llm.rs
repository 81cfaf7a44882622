//! Generation request/response types for the model collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::message::Role;

/// Role of a message inside a generation prompt.
///
/// Unlike the transcript [`Role`], prompts additionally carry a system
/// preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<Role> for PromptRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => PromptRole::User,
            Role::Assistant => PromptRole::Assistant,
        }
    }
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptRole::System => write!(f, "system"),
            PromptRole::User => write!(f, "user"),
            PromptRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for PromptRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(PromptRole::System),
            "user" => Ok(PromptRole::User),
            "assistant" => Ok(PromptRole::Assistant),
            other => Err(format!("invalid prompt role: '{other}'")),
        }
    }
}

/// A single role/content pair in a generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }
}

/// Request to the generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    #[serde(default)]
    pub stream: bool,
}

/// One chunk of a streamed generation response.
///
/// A chunk may carry a primary content delta, an auxiliary reasoning delta,
/// both, or neither (a bare terminal marker).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationChunk {
    pub content: Option<String>,
    pub reasoning: Option<String>,
    #[serde(default)]
    pub done: bool,
}

impl GenerationChunk {
    pub fn text(delta: impl Into<String>) -> Self {
        Self {
            content: Some(delta.into()),
            reasoning: None,
            done: false,
        }
    }

    pub fn terminal() -> Self {
        Self {
            content: None,
            reasoning: None,
            done: true,
        }
    }
}
