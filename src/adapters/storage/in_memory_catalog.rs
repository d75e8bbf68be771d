//! In-Memory Catalog Adapters
//!
//! Category catalog and user registry held in memory.
//! Useful for testing and for running without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CategoryId, DomainError, PhoneNumber};
use crate::domain::ledger::{Category, User};
use crate::ports::{CategoryRepository, UserRepository};

/// In-memory category catalog, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<Vec<Category>>>,
}

impl InMemoryCategoryRepository {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with `categories`
    pub fn with_categories(mut categories: Vec<Category>) -> Self {
        categories.sort_by_key(|c| c.id);
        Self {
            categories: Arc::new(RwLock::new(categories)),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.read().await.clone())
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, DomainError> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, name: &str) -> Result<Category, DomainError> {
        let mut categories = self.categories.write().await;

        // Same-name creates from racing commits collapse into one row.
        if let Some(existing) = categories.iter().find(|c| c.name == name) {
            return Ok(existing.clone());
        }

        let next_id = categories.iter().map(|c| c.id.value()).max().unwrap_or(0) + 1;
        let category = Category::new(next_id, name);
        categories.push(category.clone());
        Ok(category)
    }
}

/// In-memory user registry keyed by phone number.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<PhoneNumber, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of registered users
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_or_create_by_phone(&self, phone: &PhoneNumber) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let user = users
            .entry(phone.clone())
            .or_insert_with(|| User::register(phone.clone()));
        Ok(user.clone())
    }
}
