//! Session lifecycle and registry.
//!
//! A session owns everything conversational: the durable short-term buffer,
//! the cognitive tracker, the persona, and the reflective state. The mutable
//! parts sit behind one async mutex so overlapping turns on the same session
//! queue rather than interleave; the tracker additionally lives behind its
//! own sync mutex because the stream producer refreshes it mid-turn while
//! the turn lock is held elsewhere.

use std::sync::Arc;
use std::sync::Mutex as SyncMutex;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cognition::CognitiveTracker;
use crate::cognition::persona::PersonaProfile;
use crate::memory::short_term::ShortTermBuffer;
use crate::memory::transcript::TranscriptStore;
use crate::reflect::learning::LearningLedger;
use crate::reflect::reflection::ReflectionJournal;
use crate::reflect::subconscious::SubconsciousMind;

/// Mutable per-session state, guarded by the session's turn lock.
pub struct SessionState<S: TranscriptStore> {
    pub buffer: ShortTermBuffer<S>,
    pub persona: PersonaProfile,
    pub subconscious: SubconsciousMind,
    pub learning: LearningLedger,
    pub reflection: ReflectionJournal,
}

/// One conversation with its full conversational state.
pub struct Session<S: TranscriptStore> {
    id: String,
    created_at: DateTime<Utc>,
    pub(crate) state: Mutex<SessionState<S>>,
    pub(crate) tracker: Arc<SyncMutex<CognitiveTracker>>,
}

impl<S: TranscriptStore> Session<S> {
    async fn open(id: String, store: Arc<S>) -> Self {
        let buffer = ShortTermBuffer::open(id.clone(), store).await;
        Self {
            id,
            created_at: Utc::now(),
            state: Mutex::new(SessionState {
                buffer,
                persona: PersonaProfile::default(),
                subconscious: SubconsciousMind::new(),
                learning: LearningLedger::new(),
                reflection: ReflectionJournal::new(),
            }),
            tracker: Arc::new(SyncMutex::new(CognitiveTracker::new())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn tracker(&self) -> Arc<SyncMutex<CognitiveTracker>> {
        Arc::clone(&self.tracker)
    }
}

/// Descriptor returned by [`SessionRegistry::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Concurrent map of live sessions, keyed by caller-supplied id.
pub struct SessionRegistry<S: TranscriptStore> {
    store: Arc<S>,
    sessions: DashMap<String, Arc<Session<S>>>,
}

impl<S: TranscriptStore> SessionRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sessions: DashMap::new(),
        }
    }

    /// Look up a session by id, opening it (and restoring its transcript)
    /// on first use. Idempotent for a given id.
    pub async fn open(&self, id: &str) -> Arc<Session<S>> {
        if let Some(session) = self.sessions.get(id) {
            return Arc::clone(&session);
        }

        let session = Arc::new(Session::open(id.to_string(), Arc::clone(&self.store)).await);
        // Two callers can race to open the same id; the first insert wins
        // and the loser's freshly-built session is discarded unseen.
        let entry = self
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| Arc::clone(&session));
        let session = Arc::clone(&entry);
        drop(entry);
        info!(session_id = %id, "session opened");
        session
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session<S>>> {
        self.sessions.get(id).map(|s| Arc::clone(&s))
    }

    /// All live sessions, ordered by id.
    pub fn list(&self) -> Vec<SessionInfo> {
        let mut infos: Vec<SessionInfo> = self
            .sessions
            .iter()
            .map(|entry| SessionInfo {
                id: entry.id().to_string(),
                created_at: entry.created_at(),
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// Drop a session from the registry. The durable transcript survives;
    /// reopening the same id restores it. Returns whether anything was
    /// removed.
    pub fn close(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            debug!(session_id = %id, "session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
