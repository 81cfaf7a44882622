//! Streaming bridge between the generation producer and the event consumer.
//!
//! A dedicated producer task drives the model's chunk stream and enqueues
//! tagged [`TurnEvent`]s into a bounded channel; the consumer only reads.
//! Lifecycle: idle -> producing (first chunk requested) -> draining (terminal
//! chunk or error emitted) -> closed (sender dropped, channel empty).
//!
//! Contracts:
//! - FIFO: events reach the consumer in exactly the emission order.
//! - Backpressure: the channel is bounded; a slow consumer blocks the
//!   producer's enqueue rather than growing memory without limit.
//! - Failure: a generation error becomes one terminal `error` event; no
//!   native failure crosses into the consumer's execution context.
//! - Cancellation: the token aborts the in-flight generation and releases
//!   the producer task; the consumer side cancels it on drop.
//!
//! The producer is also the only writer of the emotion refresh cadence: every
//! `meta_interval` text chunks it folds the accumulated reply tail into the
//! shared cognitive state and emits a fresh `meta` snapshot.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use reverie_types::event::TurnEvent;
use reverie_types::llm::GenerationRequest;

use crate::cognition::CognitiveTracker;
use crate::llm::provider::ChatModel;

/// Producer/consumer bridge for one turn's event stream.
pub struct StreamingBridge {
    capacity: usize,
    meta_interval: usize,
}

impl StreamingBridge {
    pub fn new(capacity: usize, meta_interval: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            meta_interval: meta_interval.max(1),
        }
    }

    /// Spawn the producer task and return the consumer's receiving end.
    ///
    /// The channel closing (after the receiver drains it) is the terminal
    /// sentinel: no events follow, and none are reordered or coalesced.
    pub fn spawn<M>(
        &self,
        model: Arc<M>,
        request: GenerationRequest,
        tracker: Arc<Mutex<CognitiveTracker>>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<TurnEvent>
    where
        M: ChatModel + 'static,
    {
        let (tx, rx) = mpsc::channel(self.capacity);
        let meta_interval = self.meta_interval;

        tokio::spawn(async move {
            // Stream-start snapshot.
            if send_meta(&tx, &tracker).await.is_err() {
                return;
            }

            let mut stream = model.stream(request);
            let mut tail = String::new();
            let mut chunk_count = 0_usize;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("generation abandoned: consumer cancelled mid-stream");
                        return;
                    }
                    next = stream.next() => match next {
                        Some(Ok(chunk)) => {
                            if let Some(reasoning) = chunk.reasoning {
                                debug!(len = reasoning.len(), "reasoning delta received");
                            }
                            if let Some(delta) = chunk.content {
                                if !delta.is_empty() {
                                    tail.push_str(&delta);
                                    chunk_count += 1;
                                    if tx.send(TurnEvent::Text { delta }).await.is_err() {
                                        return;
                                    }
                                    if chunk_count % meta_interval == 0 {
                                        refresh_tracker(&tracker, &tail);
                                        tail.clear();
                                        if send_meta(&tx, &tracker).await.is_err() {
                                            return;
                                        }
                                    }
                                }
                            }
                            if chunk.done {
                                break;
                            }
                        }
                        Some(Err(err)) => {
                            warn!(error = %err, "generation failed mid-stream");
                            let _ = tx
                                .send(TurnEvent::Error {
                                    message: err.to_string(),
                                })
                                .await;
                            return;
                        }
                        None => break,
                    }
                }
            }
            // Normal completion: fold any leftover tail into the state so the
            // end-of-stream snapshot reflects the full reply.
            if !tail.is_empty() {
                refresh_tracker(&tracker, &tail);
            }
            // Sender drops here, closing the channel.
        });

        rx
    }
}

fn refresh_tracker(tracker: &Arc<Mutex<CognitiveTracker>>, tail: &str) {
    if let Ok(mut tracker) = tracker.lock() {
        tracker.refresh_from_reply(tail);
    }
}

async fn send_meta(
    tx: &mpsc::Sender<TurnEvent>,
    tracker: &Arc<Mutex<CognitiveTracker>>,
) -> Result<(), ()> {
    let snapshot = match tracker.lock() {
        Ok(tracker) => tracker.snapshot(),
        Err(_) => return Ok(()),
    };
    tx.send(TurnEvent::Meta {
        thought: snapshot.thought,
        emotion: snapshot.emotion,
    })
    .await
    .map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::Stream;
    use futures_util::stream;
    use reverie_types::error::GenerationError;
    use reverie_types::llm::GenerationChunk;
    use std::pin::Pin;

    /// Replays a fixed script of chunks. The script is consumed by the
    /// first `stream` call.
    struct ScriptedModel {
        script: std::sync::Mutex<Vec<Result<GenerationChunk, GenerationError>>>,
    }

    impl ScriptedModel {
        fn new(script: Vec<Result<GenerationChunk, GenerationError>>) -> Self {
            Self {
                script: std::sync::Mutex::new(script),
            }
        }

        fn text(deltas: &[&str]) -> Self {
            let mut script: Vec<_> = deltas
                .iter()
                .map(|d| Ok(GenerationChunk::text(*d)))
                .collect();
            script.push(Ok(GenerationChunk::terminal()));
            Self::new(script)
        }
    }

    impl ChatModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        fn stream(
            &self,
            _request: GenerationRequest,
        ) -> Pin<Box<dyn Stream<Item = Result<GenerationChunk, GenerationError>> + Send + 'static>>
        {
            let script = std::mem::take(&mut *self.script.lock().unwrap());
            Box::pin(stream::iter(script))
        }
    }

    /// A model whose stream never yields; used to exercise cancellation.
    struct StalledModel;

    impl ChatModel for StalledModel {
        fn name(&self) -> &str {
            "stalled"
        }

        fn stream(
            &self,
            _request: GenerationRequest,
        ) -> Pin<Box<dyn Stream<Item = Result<GenerationChunk, GenerationError>> + Send + 'static>>
        {
            Box::pin(stream::pending())
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "test".to_string(),
            messages: vec![],
            stream: true,
        }
    }

    fn tracker() -> Arc<Mutex<CognitiveTracker>> {
        Arc::new(Mutex::new(CognitiveTracker::with_seed(1)))
    }

    async fn drain(mut rx: mpsc::Receiver<TurnEvent>) -> Vec<TurnEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_events_preserve_emission_order() {
        let bridge = StreamingBridge::new(8, 100);
        let model = Arc::new(ScriptedModel::text(&["Hal", "lo ", "du!"]));
        let rx = bridge.spawn(model, request(), tracker(), CancellationToken::new());

        let events = drain(rx).await;
        assert!(matches!(events[0], TurnEvent::Meta { .. }));
        let deltas: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                TurnEvent::Text { delta } => Some(delta.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(deltas, vec!["Hal", "lo ", "du!"]);
    }

    #[tokio::test]
    async fn test_error_after_two_deltas_is_terminal() {
        let bridge = StreamingBridge::new(8, 100);
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(GenerationChunk::text("eins ")),
            Ok(GenerationChunk::text("zwei")),
            Err(GenerationError::Stream("connection reset".to_string())),
        ]));
        let rx = bridge.spawn(model, request(), tracker(), CancellationToken::new());

        let events = drain(rx).await;
        let text_count = events
            .iter()
            .filter(|e| matches!(e, TurnEvent::Text { .. }))
            .count();
        assert_eq!(text_count, 2);
        // Error is the final event; the channel closed right after.
        assert!(matches!(events.last(), Some(TurnEvent::Error { .. })));
    }

    #[tokio::test]
    async fn test_meta_cadence() {
        let bridge = StreamingBridge::new(8, 2);
        let model = Arc::new(ScriptedModel::text(&["a", "b", "c", "d"]));
        let rx = bridge.spawn(model, request(), tracker(), CancellationToken::new());

        let events = drain(rx).await;
        let meta_count = events
            .iter()
            .filter(|e| matches!(e, TurnEvent::Meta { .. }))
            .count();
        // Start snapshot plus one after every 2nd chunk.
        assert_eq!(meta_count, 3);
    }

    #[tokio::test]
    async fn test_cancellation_releases_producer() {
        let bridge = StreamingBridge::new(8, 100);
        let cancel = CancellationToken::new();
        let mut rx = bridge.spawn(
            Arc::new(StalledModel),
            request(),
            tracker(),
            cancel.clone(),
        );

        // Start snapshot arrives, then the producer is stalled on the model.
        let first = rx.recv().await;
        assert!(matches!(first, Some(TurnEvent::Meta { .. })));

        cancel.cancel();
        // Producer abandons generation; channel closes without further events.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_mid_stream_refresh_mutates_state() {
        let bridge = StreamingBridge::new(8, 1);
        let shared = tracker();
        let model = Arc::new(ScriptedModel::text(&["So viel Freude ", "und Lachen!"]));
        let rx = bridge.spawn(model, request(), shared.clone(), CancellationToken::new());
        drain(rx).await;

        let joy = shared
            .lock()
            .unwrap()
            .emotion()
            .get(reverie_types::cognition::EmotionDimension::Joy);
        assert!(joy > 0.5, "joy should rise above its 0.5 baseline, got {joy}");
    }
}
