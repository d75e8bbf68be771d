//! In-Memory Draft Store Adapter
//!
//! Keeps pending drafts in a map guarded by one lock, which makes every
//! operation trivially atomic per correlation id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::drafting::Draft;
use crate::domain::foundation::{DomainError, MessageId};
use crate::ports::DraftStore;

/// In-memory storage for pending drafts
#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftStore {
    drafts: Arc<RwLock<HashMap<MessageId, Draft>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pending drafts
    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn put(&self, draft: &Draft) -> Result<u64, DomainError> {
        let mut drafts = self.drafts.write().await;
        let held = drafts
            .get(&draft.correlation_id)
            .map(|d| d.version)
            .unwrap_or(0);
        let version = held.max(draft.version) + 1;

        let mut stored = draft.clone();
        stored.version = version;
        drafts.insert(stored.correlation_id.clone(), stored);
        Ok(version)
    }

    async fn get(&self, correlation_id: &MessageId) -> Result<Option<Draft>, DomainError> {
        Ok(self.drafts.read().await.get(correlation_id).cloned())
    }

    async fn take(
        &self,
        correlation_id: &MessageId,
        expected_version: u64,
    ) -> Result<Option<Draft>, DomainError> {
        let mut drafts = self.drafts.write().await;
        match drafts.get(correlation_id) {
            Some(d) if d.version == expected_version => Ok(drafts.remove(correlation_id)),
            _ => Ok(None),
        }
    }

    async fn delete(&self, correlation_id: &MessageId) -> Result<(), DomainError> {
        self.drafts.write().await.remove(correlation_id);
        Ok(())
    }
}
