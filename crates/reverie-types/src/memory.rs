//! Long-term memory types.
//!
//! These types model the similarity-searchable memory tier: records are
//! created only through promotion or explicit storage, never mutated after
//! creation, and carry a fixed importance score set at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::message::Role;

/// How a memory record came into being.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    /// Stored explicitly by a caller.
    UserGenerated,
    /// Promoted from the short-term log by the importance gate.
    AutoDetected,
}

impl fmt::Display for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemorySource::UserGenerated => write!(f, "user_generated"),
            MemorySource::AutoDetected => write!(f, "auto_detected"),
        }
    }
}

impl FromStr for MemorySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user_generated" => Ok(MemorySource::UserGenerated),
            "auto_detected" => Ok(MemorySource::AutoDetected),
            other => Err(format!("invalid memory source: '{other}'")),
        }
    }
}

/// Metadata attached to a memory record at creation time.
///
/// `importance` is set once and never revised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub timestamp: DateTime<Utc>,
    pub source: MemorySource,
    /// Importance in `[0, 1]`, fixed at creation.
    pub importance: f32,
    /// Author role for promoted messages; `None` for explicit storage.
    pub role: Option<Role>,
}

impl MemoryMetadata {
    /// Default metadata for explicitly stored memories.
    ///
    /// A caller bothering to store something is the strongest importance
    /// signal there is, so these carry full importance and survive any
    /// min-importance search filter.
    pub fn user_generated() -> Self {
        Self {
            timestamp: Utc::now(),
            source: MemorySource::UserGenerated,
            importance: 1.0,
            role: None,
        }
    }

    /// Metadata for a message promoted by the importance gate.
    pub fn auto_detected(importance: f32, role: Role) -> Self {
        Self {
            timestamp: Utc::now(),
            source: MemorySource::AutoDetected,
            importance,
            role: Some(role),
        }
    }
}

/// A stored memory record.
///
/// The embedding itself lives inside the vector index; the record carries
/// only the opaque id, content, and creation-time metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub content: String,
    pub metadata: MemoryMetadata,
}

/// A memory returned from similarity search, annotated with its distance
/// to the query (smaller is nearer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalledMemory {
    pub content: String,
    pub metadata: MemoryMetadata,
    pub distance: f32,
}
