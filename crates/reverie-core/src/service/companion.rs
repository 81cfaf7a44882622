//! The companion service: the single entry point callers hold.
//!
//! Generic over the four collaborator ports so the whole pipeline runs
//! against fakes in tests and against sqlite/Ollama in production without
//! a code change.

use std::sync::Arc;

use futures_util::{Stream, StreamExt, pin_mut};
use tracing::info;

use reverie_types::cognition::{CognitiveSnapshot, EmotionState};
use reverie_types::config::EngineConfig;
use reverie_types::error::EmbeddingError;
use reverie_types::event::TurnEvent;
use reverie_types::memory::{MemoryMetadata, MemoryRecord, RecalledMemory};
use reverie_types::message::TranscriptMessage;

use crate::llm::provider::ChatModel;
use crate::memory::embedder::Embedder;
use crate::memory::long_term::LongTermMemory;
use crate::memory::transcript::TranscriptStore;
use crate::memory::vector::VectorIndex;
use crate::session::{SessionInfo, SessionRegistry};
use crate::turn::orchestrator::{TurnOrchestrator, TurnOutcome};

/// Facade wiring sessions, turns, and memory together.
pub struct CompanionService<S, E, V, M>
where
    S: TranscriptStore,
    E: Embedder,
    V: VectorIndex,
    M: ChatModel,
{
    registry: SessionRegistry<S>,
    orchestrator: TurnOrchestrator<E, V, M>,
    memory: Arc<LongTermMemory<E, V>>,
}

impl<S, E, V, M> CompanionService<S, E, V, M>
where
    S: TranscriptStore + 'static,
    E: Embedder + 'static,
    V: VectorIndex + 'static,
    M: ChatModel + 'static,
{
    pub fn new(store: Arc<S>, embedder: E, index: V, model: Arc<M>, config: EngineConfig) -> Self {
        let memory = Arc::new(LongTermMemory::new(embedder, index));
        info!(model = %model.name(), "companion service ready");
        Self {
            registry: SessionRegistry::new(store),
            orchestrator: TurnOrchestrator::new(model, Arc::clone(&memory), config),
            memory,
        }
    }

    /// Open (or reattach to) a session. Idempotent per id.
    pub async fn open_session(&self, session_id: &str) -> SessionInfo {
        let session = self.registry.open(session_id).await;
        SessionInfo {
            id: session.id().to_string(),
            created_at: session.created_at(),
        }
    }

    /// Run one turn and stream its events.
    ///
    /// The session is opened on demand. Turns submitted concurrently for the
    /// same session queue in arrival order.
    pub async fn submit_turn(
        &self,
        session_id: &str,
        input: impl Into<String>,
    ) -> impl Stream<Item = TurnEvent> + Send + 'static {
        let session = self.registry.open(session_id).await;
        self.orchestrator.run_turn(session, input.into())
    }

    /// Run one turn to completion and collect the result.
    pub async fn submit_turn_sync(
        &self,
        session_id: &str,
        input: impl Into<String>,
    ) -> TurnOutcome {
        let stream = self.submit_turn(session_id, input).await;
        pin_mut!(stream);

        let mut reply = String::new();
        let mut thought = String::new();
        let mut emotion = EmotionState::initial();
        let mut error = None;
        while let Some(event) = stream.next().await {
            match event {
                TurnEvent::Text { delta } => reply.push_str(&delta),
                TurnEvent::Meta {
                    thought: t,
                    emotion: e,
                } => {
                    thought = t;
                    emotion = e;
                }
                TurnEvent::Error { message } => error = Some(message),
            }
        }
        TurnOutcome {
            reply,
            thought,
            thoughts: self.recent_thoughts(session_id, 3),
            emotion,
            error,
        }
    }

    /// Store an explicit, caller-provided memory at full importance.
    pub async fn remember(&self, content: &str) -> Result<MemoryRecord, EmbeddingError> {
        self.memory
            .add(content, MemoryMetadata::user_generated())
            .await
    }

    /// Similarity search over long-term memory, nearest first.
    pub async fn search_memory(&self, query: &str, k: usize) -> Vec<RecalledMemory> {
        self.memory.search(query, k, 0.0).await
    }

    /// The session's full ordered transcript; empty for unknown ids.
    pub async fn transcript(&self, session_id: &str) -> Vec<TranscriptMessage> {
        match self.registry.get(session_id) {
            Some(session) => session.state.lock().await.buffer.all().to_vec(),
            None => Vec::new(),
        }
    }

    /// The session's current emotion state and latest thought.
    pub fn cognitive_snapshot(&self, session_id: &str) -> Option<CognitiveSnapshot> {
        let session = self.registry.get(session_id)?;
        let tracker = session.tracker();
        let guard = tracker.lock().ok()?;
        Some(guard.snapshot())
    }

    /// The session's last `count` inner thoughts, oldest first.
    pub fn recent_thoughts(&self, session_id: &str, count: usize) -> Vec<String> {
        let Some(session) = self.registry.get(session_id) else {
            return Vec::new();
        };
        let tracker = session.tracker();
        match tracker.lock() {
            Ok(guard) => guard.recent_thoughts(count),
            Err(_) => Vec::new(),
        }
    }

    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        self.registry.list()
    }

    /// Detach a session. Its transcript stays durable and is restored on
    /// the next `open_session` with the same id.
    pub fn close_session(&self, session_id: &str) -> bool {
        self.registry.close(session_id)
    }

    pub fn config(&self) -> &EngineConfig {
        self.orchestrator.config()
    }
}
