//! CategoryResolver - turns untrusted category references into stored ids.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::foundation::{CategoryId, DomainError};
use crate::domain::ledger::{effective_category, Category};
use crate::ports::CategoryRepository;

/// Maps any category reference to an id that exists in the catalog.
///
/// Absent, non-positive, and unknown references fall back to the first
/// catalog entry. An empty catalog gets a default category created on demand.
pub struct CategoryResolver {
    categories: Arc<dyn CategoryRepository>,
    default_name: String,
}

impl CategoryResolver {
    pub fn new(categories: Arc<dyn CategoryRepository>, default_name: impl Into<String>) -> Self {
        Self {
            categories,
            default_name: default_name.into(),
        }
    }

    /// Resolves a single reference.
    ///
    /// # Errors
    ///
    /// Only persistence failures; every reference resolves to something.
    pub async fn resolve_or_default(
        &self,
        category_ref: Option<CategoryId>,
    ) -> Result<CategoryId, DomainError> {
        if let Some(id) = category_ref.filter(CategoryId::is_assignable) {
            if let Some(found) = self.categories.find_by_id(id).await? {
                return Ok(found.id);
            }
        }

        let catalog = self.categories.list_all().await?;
        match catalog.first() {
            Some(first) => {
                debug!(requested = ?category_ref, fallback = %first.id, "Category reference fell back");
                Ok(first.id)
            }
            None => Ok(self.create_default().await?.id),
        }
    }

    /// Resolves many references against one catalog read.
    pub async fn resolve_all(
        &self,
        refs: &[Option<CategoryId>],
    ) -> Result<Vec<CategoryId>, DomainError> {
        let mut catalog = self.categories.list_all().await?;
        if catalog.is_empty() && !refs.is_empty() {
            catalog.push(self.create_default().await?);
        }

        refs.iter()
            .map(|r| {
                effective_category(&catalog, *r)
                    .map(|c| c.id)
                    .ok_or_else(|| DomainError::database("category catalog is empty"))
            })
            .collect()
    }

    async fn create_default(&self) -> Result<Category, DomainError> {
        let created = self.categories.create(&self.default_name).await?;
        info!(category_id = %created.id, name = %created.name, "Created default category");
        Ok(created)
    }
}
