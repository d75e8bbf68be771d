//! Draft Store port - correlation table for pending drafts.
//!
//! Drafts are keyed by the id of the outbound message that presented them.
//! Every operation is atomic per correlation id; nothing is serialized across
//! ids.
//!
//! # Versioning
//!
//! `put` stamps each write with a version one higher than both whatever the
//! id held before and the version the draft carries, so a fresh draft gets 1
//! and a restored draft never reuses a version a stale reply may hold. State-changing replies claim a draft with
//! `take(id, version)`, a compare-and-remove that only succeeds against the
//! version the caller read. Two replies racing on one draft therefore
//! produce exactly one winner.

use async_trait::async_trait;

use crate::domain::drafting::Draft;
use crate::domain::foundation::{DomainError, MessageId};

/// Port for pending draft storage.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Upsert a draft under its correlation id, overwriting entirely.
    ///
    /// Returns the version assigned to the stored draft.
    async fn put(&self, draft: &Draft) -> Result<u64, DomainError>;

    /// Fetch a draft by correlation id.
    async fn get(&self, correlation_id: &MessageId) -> Result<Option<Draft>, DomainError>;

    /// Remove and return the draft if it is still at `expected_version`.
    ///
    /// Returns `None` when the draft is gone or has been rewritten.
    async fn take(
        &self,
        correlation_id: &MessageId,
        expected_version: u64,
    ) -> Result<Option<Draft>, DomainError>;

    /// Remove a draft. Removing a missing id is not an error.
    async fn delete(&self, correlation_id: &MessageId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn DraftStore) {}
    }
}
