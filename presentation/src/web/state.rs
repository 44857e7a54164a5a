//! Shared state for the web UI: use cases plus per-browser sessions.

use chrono::{DateTime, Utc};
use qchain_application::{
    GenerateAnswersUseCase, GenerateQuestionsUseCase, GenerationParams, LlmGateway,
};
use qchain_domain::{Model, SessionResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// One browser session's results and its in-flight marker.
pub struct SessionEntry {
    created_at: DateTime<Utc>,
    last_seen_ms: AtomicI64,
    result: Mutex<SessionResult>,
    round: Arc<Mutex<()>>,
}

impl SessionEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            last_seen_ms: AtomicI64::new(now.timestamp_millis()),
            result: Mutex::new(SessionResult::new()),
            round: Arc::new(Mutex::new(())),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn touch(&self, now: DateTime<Utc>) {
        self.last_seen_ms
            .store(now.timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_for_ms(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis() - self.last_seen_ms.load(Ordering::Relaxed)
    }

    /// Copy of the stored results.
    pub async fn snapshot(&self) -> SessionResult {
        self.result.lock().await.clone()
    }

    /// Overwrite the stored results with a finished round's outcome.
    pub async fn replace(&self, result: SessionResult) {
        *self.result.lock().await = result;
    }

    /// Claim the session for one round; `None` while another round runs.
    pub fn try_begin_round(&self) -> Option<OwnedMutexGuard<()>> {
        self.round.clone().try_lock_owned().ok()
    }

    pub fn is_generating(&self) -> bool {
        self.round.try_lock().is_err()
    }
}

/// In-memory session registry keyed by random ids.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(SessionEntry::new(Utc::now())));
        debug!(session = %id, "Session created");
        id
    }

    /// Look up a session and mark it as seen.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<SessionEntry>> {
        let entry = self.sessions.read().await.get(id).cloned()?;
        entry.touch(Utc::now());
        Some(entry)
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than `max_idle`; running rounds are kept.
    pub async fn purge_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> usize {
        let limit = i64::try_from(max_idle.as_millis()).unwrap_or(i64::MAX);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.is_generating() || entry.idle_for_ms(now) <= limit);
        before - sessions.len()
    }
}

/// Periodically purge idle sessions.
pub fn spawn_idle_sweeper(sessions: Arc<SessionStore>, max_idle: Duration) -> JoinHandle<()> {
    let period = max_idle.min(Duration::from_secs(60)).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let purged = sessions.purge_idle(max_idle, Utc::now()).await;
            if purged > 0 {
                info!(purged, "Dropped idle sessions");
            }
        }
    })
}

/// State shared by every web handler.
#[derive(Clone)]
pub struct AppState {
    pub questions: GenerateQuestionsUseCase,
    pub answers: GenerateAnswersUseCase,
    pub sessions: Arc<SessionStore>,
    pub model: Model,
}

impl AppState {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: GenerationParams) -> Self {
        Self {
            questions: GenerateQuestionsUseCase::new(gateway.clone(), params.clone()),
            answers: GenerateAnswersUseCase::new(gateway, params.clone()),
            sessions: Arc::new(SessionStore::new()),
            model: params.model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_get_remove() {
        let store = SessionStore::new();
        let id = store.create().await;

        assert!(store.get(&id).await.is_some());
        assert_eq!(store.len().await, 1);
        assert!(store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
        assert!(!store.remove(&id).await);
    }

    #[tokio::test]
    async fn only_one_round_at_a_time() {
        let store = SessionStore::new();
        let id = store.create().await;
        let entry = store.get(&id).await.unwrap();

        let guard = entry.try_begin_round().unwrap();
        assert!(entry.is_generating());
        assert!(entry.try_begin_round().is_none());

        drop(guard);
        assert!(!entry.is_generating());
        assert!(entry.try_begin_round().is_some());
    }

    #[tokio::test]
    async fn replace_overwrites_results() {
        let store = SessionStore::new();
        let id = store.create().await;
        let entry = store.get(&id).await.unwrap();

        let mut result = entry.snapshot().await;
        result.store_questions("1. Q");
        entry.replace(result).await;

        assert_eq!(entry.snapshot().await.questions_text(), Some("1. Q"));
    }

    #[tokio::test]
    async fn purge_drops_idle_sessions_but_keeps_running_ones() {
        let store = SessionStore::new();
        let idle = store.create().await;
        let running = store.create().await;
        let _guard = store.get(&running).await.unwrap().try_begin_round().unwrap();

        let later = Utc::now() + chrono::Duration::minutes(90);
        let purged = store.purge_idle(Duration::from_secs(3600), later).await;

        assert_eq!(purged, 1);
        assert!(store.get(&idle).await.is_none());
        assert!(store.get(&running).await.is_some());
    }

    #[tokio::test]
    async fn purge_keeps_recent_sessions() {
        let store = SessionStore::new();
        store.create().await;
        assert_eq!(store.purge_idle(Duration::from_secs(3600), Utc::now()).await, 0);
        assert!(!store.is_empty().await);
    }
}
