use crate::core::DeckSession;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// In-memory deck sessions, evicted after a period of inactivity.
///
/// Evicting the last handle to a session drops its deck, which aborts any
/// swipe still settling.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<DeckSession>>,
}

impl SessionStore {
    pub fn new(max_sessions: u64, idle_ttl_secs: u64) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(Duration::from_secs(idle_ttl_secs))
            .build();

        Self { sessions }
    }

    pub async fn insert(&self, session: DeckSession) -> Arc<DeckSession> {
        let session = Arc::new(session);
        self.sessions.insert(session.id(), session.clone()).await;
        tracing::debug!("Opened deck session {}", session.id());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<DeckSession>> {
        self.sessions.get(id).await
    }

    /// Close a session and forget it; returns false for unknown ids
    pub async fn remove(&self, id: &Uuid) -> bool {
        match self.sessions.remove(id).await {
            Some(session) => {
                session.close().await;
                tracing::debug!("Closed deck session {}", id);
                true
            }
            None => false,
        }
    }

    /// Close and forget every deck owned by `user_id`; returns how many were open
    pub async fn close_user(&self, user_id: &str) -> usize {
        let owned: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.user_id() == Some(user_id))
            .map(|(id, _)| *id)
            .collect();

        let mut closed = 0;
        for id in owned {
            if self.remove(&id).await {
                closed += 1;
            }
        }

        if closed > 0 {
            tracing::info!("Closed {} deck sessions for user {}", closed, user_id);
        }
        closed
    }

    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DeckSettings;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new(100, 60);
        let session = store
            .insert(DeckSession::new(None, vec![], DeckSettings::default(), None))
            .await;
        let id = session.id();

        assert!(store.get(&id).await.is_some());
        assert!(store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
        assert!(!store.remove(&id).await);
    }

    #[tokio::test]
    async fn test_close_user_only_touches_their_decks() {
        let store = SessionStore::new(100, 60);
        let open = |user: Option<&str>| {
            DeckSession::new(user.map(str::to_string), vec![], DeckSettings::default(), None)
        };

        let first = store.insert(open(Some("user-a"))).await;
        let second = store.insert(open(Some("user-a"))).await;
        let other = store.insert(open(Some("user-b"))).await;
        let anonymous = store.insert(open(None)).await;

        assert_eq!(store.close_user("user-a").await, 2);
        assert!(first.is_closed());
        assert!(second.is_closed());
        assert!(store.get(&first.id()).await.is_none());
        assert!(store.get(&second.id()).await.is_none());
        assert!(store.get(&other.id()).await.is_some());
        assert!(store.get(&anonymous.id()).await.is_some());

        assert_eq!(store.close_user("user-a").await, 0);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new(100, 60);
        assert!(store.get(&Uuid::new_v4()).await.is_none());
    }
}
