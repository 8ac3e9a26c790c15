//! Per-user storage for in-progress intake sessions.
//!
//! Backed by teloxide's dialogue storage: [`InMemStorage`] by default, or
//! [`SqliteStorage`] with the JSON serializer when sessions should survive a
//! restart. Sessions are keyed by the admin's user id. Ordering per user comes
//! from the dispatcher, which handles updates from one chat sequentially.

use std::sync::Arc;

use teloxide::dispatching::dialogue::{
    serializer::Json, ErasedStorage, InMemStorage, SqliteStorage, Storage,
};
use teloxide::types::{ChatId, UserId};

use crate::bot::workflow::IntakeSession;
use crate::error::{BotError, Result};

#[derive(Clone)]
pub struct ConversationStore {
    storage: Arc<ErasedStorage<IntakeSession>>,
}

impl ConversationStore {
    pub fn in_memory() -> Self {
        Self::with_storage(InMemStorage::<IntakeSession>::new().erase())
    }

    pub fn with_storage(storage: Arc<ErasedStorage<IntakeSession>>) -> Self {
        Self { storage }
    }

    pub async fn sqlite(path: &str) -> Result<Self> {
        let storage = SqliteStorage::open(path, Json)
            .await
            .map_err(|e| BotError::SessionStore(Box::new(e)))?;

        Ok(Self::with_storage(storage.erase()))
    }

    pub async fn get(&self, user_id: UserId) -> Result<Option<IntakeSession>> {
        Arc::clone(&self.storage)
            .get_dialogue(key(user_id))
            .await
            .map_err(BotError::SessionStore)
    }

    pub async fn put(&self, user_id: UserId, session: IntakeSession) -> Result<()> {
        Arc::clone(&self.storage)
            .update_dialogue(key(user_id), session)
            .await
            .map_err(BotError::SessionStore)
    }

    /// Removes the user's session. Returns whether one existed.
    pub async fn delete(&self, user_id: UserId) -> Result<bool> {
        // InMemStorage reports a missing dialogue as an error
        if self.get(user_id).await?.is_none() {
            return Ok(false);
        }

        Arc::clone(&self.storage)
            .remove_dialogue(key(user_id))
            .await
            .map_err(BotError::SessionStore)?;
        Ok(true)
    }
}

fn key(user_id: UserId) -> ChatId {
    ChatId(user_id.0 as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = ConversationStore::in_memory();
        let user = UserId(42);

        assert!(store.get(user).await.unwrap().is_none());

        store.put(user, IntakeSession::new(user)).await.unwrap();
        let session = store.get(user).await.unwrap().unwrap();
        assert_eq!(session.user_id, 42);

        assert!(store.delete(user).await.unwrap());
        assert!(store.get(user).await.unwrap().is_none());
        assert!(!store.delete(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_per_user() {
        let store = ConversationStore::in_memory();
        store.put(UserId(1), IntakeSession::new(UserId(1))).await.unwrap();

        assert!(store.get(UserId(2)).await.unwrap().is_none());
        assert!(!store.delete(UserId(2)).await.unwrap());
        assert!(store.get(UserId(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sqlite_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialogues.sqlite");
        let store = ConversationStore::sqlite(&path.to_string_lossy()).await.unwrap();
        let user = UserId(7);

        store.put(user, IntakeSession::new(user)).await.unwrap();
        assert_eq!(store.get(user).await.unwrap(), Some(IntakeSession::new(user)));
        assert!(store.delete(user).await.unwrap());
        assert!(store.get(user).await.unwrap().is_none());
    }
}
