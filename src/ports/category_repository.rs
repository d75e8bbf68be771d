//! Category catalog port.

use async_trait::async_trait;

use crate::domain::foundation::{CategoryId, DomainError};
use crate::domain::ledger::Category;

/// Repository port for the category catalog.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories, ordered by id ascending.
    ///
    /// The first entry is the fallback for unresolvable references.
    async fn list_all(&self) -> Result<Vec<Category>, DomainError>;

    /// Find a category by id. Returns `None` if not found.
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, DomainError>;

    /// Create a category with the given name and return it with its new id.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, name: &str) -> Result<Category, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CategoryRepository) {}
    }
}
