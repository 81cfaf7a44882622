//! Per-turn orchestration.
//!
//! One turn: ingest the user message, update cognitive state, recall
//! long-term memories, assemble the prompt, stream the generated reply
//! through the bridge, then finalize (persist the reply, run the promotion
//! gate, fold the conversation into the reflective state).
//!
//! The session's turn lock is taken before ingestion and held until the
//! final event is yielded, so concurrent turns on one session queue in
//! arrival order and each sees the previous turn's full effects.

use std::sync::Arc;

use async_stream::stream;
use futures_util::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use reverie_types::cognition::EmotionState;
use reverie_types::config::EngineConfig;
use reverie_types::event::TurnEvent;
use reverie_types::llm::{GenerationRequest, PromptMessage};
use reverie_types::memory::RecalledMemory;
use reverie_types::message::Role;

use crate::llm::provider::ChatModel;
use crate::memory::embedder::Embedder;
use crate::memory::long_term::LongTermMemory;
use crate::memory::transcript::TranscriptStore;
use crate::memory::vector::VectorIndex;
use crate::session::Session;
use crate::turn::bridge::StreamingBridge;

/// Collected result of a fully-drained turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub thought: String,
    /// The session's last few inner thoughts, oldest first.
    pub thoughts: Vec<String>,
    pub emotion: EmotionState,
    pub error: Option<String>,
}

/// Drives single turns against a session.
pub struct TurnOrchestrator<E, V, M>
where
    E: Embedder,
    V: VectorIndex,
    M: ChatModel,
{
    model: Arc<M>,
    memory: Arc<LongTermMemory<E, V>>,
    config: EngineConfig,
}

impl<E, V, M> TurnOrchestrator<E, V, M>
where
    E: Embedder + 'static,
    V: VectorIndex + 'static,
    M: ChatModel + 'static,
{
    pub fn new(model: Arc<M>, memory: Arc<LongTermMemory<E, V>>, config: EngineConfig) -> Self {
        Self {
            model,
            memory,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one turn, yielding its ordered event stream.
    ///
    /// Dropping the returned stream mid-way cancels the in-flight
    /// generation; everything ingested up to that point stays persisted.
    #[instrument(skip_all, fields(session_id = %session.id()))]
    pub fn run_turn<S>(
        &self,
        session: Arc<Session<S>>,
        input: String,
    ) -> impl Stream<Item = TurnEvent> + Send + 'static
    where
        S: TranscriptStore + 'static,
    {
        let model = Arc::clone(&self.model);
        let memory = Arc::clone(&self.memory);
        let config = self.config.clone();
        let bridge = StreamingBridge::new(config.stream.channel_capacity, config.stream.meta_interval);

        stream! {
            let tracker = session.tracker();
            let mut state = session.state.lock().await;

            // Ingest. The user message is durable before anything else runs.
            state.buffer.append(Role::User, input.clone()).await;

            // Cognitive pass over the fresh window.
            let recent = state.buffer.recent(config.memory.recent_window).to_vec();
            let (thought, label) = match tracker.lock() {
                Ok(mut tracker) => {
                    tracker.update(&recent);
                    let thought = tracker.generate_thought(&input);
                    (thought, tracker.emotion_label())
                }
                Err(_) => (String::new(), "Neutral"),
            };
            let recent_prompt: Vec<PromptMessage> = recent
                .iter()
                .map(|m| PromptMessage {
                    role: m.role.into(),
                    content: m.content.clone(),
                })
                .collect();
            let background = state.subconscious.background_thoughts(&recent);

            // Recall. Degrades to no memories rather than failing the turn.
            let recalled = memory
                .search(&input, config.memory.recall_limit, 0.0)
                .await;
            debug!(recalled = recalled.len(), "memories recalled for prompt");

            let system = compose_system_prompt(
                &state.persona.system_prompt(),
                label,
                &thought,
                &background,
                &recalled,
            );
            let mut messages = vec![PromptMessage::system(system)];
            messages.extend(recent_prompt);

            let request = GenerationRequest {
                model: config.model.clone(),
                messages,
                stream: true,
            };

            // Stream. The guard cancels the producer if this stream is
            // dropped before draining.
            let cancel = CancellationToken::new();
            let _guard = cancel.clone().drop_guard();
            let mut rx = bridge.spawn(model, request, Arc::clone(&tracker), cancel);

            let mut reply = String::new();
            let mut failed = false;
            while let Some(event) = rx.recv().await {
                match &event {
                    TurnEvent::Text { delta } => reply.push_str(delta),
                    TurnEvent::Error { message } => {
                        failed = true;
                        warn!(error = %message, "turn ended with a generation error");
                    }
                    TurnEvent::Meta { .. } => {}
                }
                yield event;
            }

            // Finalize. A partial reply is still a reply; only a failure
            // with no text at all leaves the transcript without an
            // assistant message.
            if !reply.is_empty() {
                state.buffer.append(Role::Assistant, reply.clone()).await;
            }

            let promoted = memory
                .promote_if_important(
                    state.buffer.recent(config.memory.promotion_window),
                    config.memory.promotion_threshold,
                )
                .await;
            if promoted > 0 {
                info!(promoted, "messages promoted to long-term memory");
            }

            let log = state.buffer.all().to_vec();
            state.learning.learn_from(&log);
            let emotion = match tracker.lock() {
                Ok(tracker) => tracker.emotion().clone(),
                Err(_) => EmotionState::initial(),
            };
            state.reflection.reflect(&log, &emotion);

            // End-of-turn snapshot so consumers see the settled state.
            // Skipped after a failure: the error event stays terminal. The
            // snapshot is taken before yielding so the lock is never held
            // across a suspension point.
            if !failed {
                let snapshot = match tracker.lock() {
                    Ok(tracker) => Some(tracker.snapshot()),
                    Err(_) => None,
                };
                if let Some(snapshot) = snapshot {
                    yield TurnEvent::Meta {
                        thought: snapshot.thought,
                        emotion: snapshot.emotion,
                    };
                }
            }
        }
    }
}

fn compose_system_prompt(
    persona: &str,
    emotion_label: &str,
    thought: &str,
    background: &[String],
    recalled: &[RecalledMemory],
) -> String {
    let mut prompt = String::from(persona);
    prompt.push_str(&format!("\n\nAktuelle Stimmung: {emotion_label}"));
    if !thought.is_empty() {
        prompt.push_str(&format!("\nInnerer Gedanke: {thought}"));
    }
    for thought in background {
        prompt.push_str(&format!("\nHintergrundgedanke: {thought}"));
    }
    if !recalled.is_empty() {
        prompt.push_str("\n\nWas du dir gemerkt hast:");
        for memory in recalled {
            prompt.push_str(&format!("\nErinnerung: {}", memory.content));
        }
    }
    prompt
}
