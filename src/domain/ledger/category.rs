//! Category catalog entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CategoryId;

/// Name given to the category synthesized when the catalog is empty.
pub const DEFAULT_CATEGORY_NAME: &str = "Lainnya";

/// A named bucket for transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }
}

/// Looks up a category by id within a fetched catalog.
pub fn find_in<'a>(catalog: &'a [Category], id: CategoryId) -> Option<&'a Category> {
    catalog.iter().find(|c| c.id == id)
}

/// Returns the category a line will be committed under.
///
/// Mirrors the resolver's fallback: unknown or missing ids land on the first
/// catalog entry. `None` means the catalog is empty and a default category
/// would be created at commit time.
pub fn effective_category(catalog: &[Category], id: Option<CategoryId>) -> Option<&Category> {
    id.filter(CategoryId::is_assignable)
        .and_then(|id| find_in(catalog, id))
        .or_else(|| catalog.first())
}

/// Renders the catalog as `1=Makanan, 2=Transport` for prompts.
pub fn catalog_listing(catalog: &[Category]) -> String {
    catalog
        .iter()
        .map(|c| format!("{}={}", c.id, c.name))
        .collect::<Vec<_>>()
        .join(", ")
}
