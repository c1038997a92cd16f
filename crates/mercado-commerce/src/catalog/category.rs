//! Categories and subcategories.

use crate::error::{CommerceError, Result};
use crate::ids::CategoryId;
use crate::state::{current_timestamp, MarketState};
use serde::{Deserialize, Serialize};

/// A product category.
///
/// Root categories have no parent; subcategories hang directly off a root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Parent category (None for root categories).
    pub parent_id: Option<CategoryId>,
    /// Category name.
    pub name: String,
    /// Category description.
    pub description: String,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl Category {
    /// Create a new root category.
    pub fn new_root(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::generate(),
            parent_id: None,
            name: name.into(),
            description: String::new(),
            created_at: current_timestamp(),
        }
    }

    /// Create a subcategory of `parent`.
    pub fn new_child(parent: &Category, name: impl Into<String>) -> Self {
        let mut child = Self::new_root(name);
        child.parent_id = Some(parent.id.clone());
        child
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Create a category, optionally as a subcategory of a root category.
pub fn create_category(
    state: &mut MarketState,
    name: &str,
    description: &str,
    parent: Option<&CategoryId>,
) -> Result<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CommerceError::validation("category name is required"));
    }

    let duplicate = state
        .categories
        .find(|c| c.name.eq_ignore_ascii_case(name) && c.parent_id.as_ref() == parent)
        .is_some();
    if duplicate {
        return Err(CommerceError::validation(format!(
            "category '{}' already exists",
            name
        )));
    }

    let mut category = match parent {
        Some(parent_id) => {
            let parent = state.category(parent_id)?;
            if !parent.is_root() {
                return Err(CommerceError::validation(format!(
                    "'{}' is already a subcategory",
                    parent.name
                )));
            }
            Category::new_child(parent, name)
        }
        None => Category::new_root(name),
    };
    category.description = description.trim().to_string();

    state
        .categories
        .insert_unique("categories", category.id.clone(), category.clone())?;

    tracing::info!(category = %category.id, name = %category.name, "created category");
    Ok(category)
}

/// IDs covered by `id`: the category itself plus its subcategories.
pub fn category_scope(state: &MarketState, id: &CategoryId) -> Vec<CategoryId> {
    let mut scope = vec![id.clone()];
    scope.extend(
        state
            .categories
            .values()
            .filter(|c| c.parent_id.as_ref() == Some(id))
            .map(|c| c.id.clone()),
    );
    scope
}

/// Root categories, each followed by its subcategories, sorted by name.
pub fn category_tree(state: &MarketState) -> Vec<(Category, Vec<Category>)> {
    let mut roots: Vec<Category> = state
        .categories
        .values()
        .filter(|c| c.is_root())
        .cloned()
        .collect();
    roots.sort_by(|a, b| a.name.cmp(&b.name));

    roots
        .into_iter()
        .map(|root| {
            let mut children: Vec<Category> = state
                .categories
                .values()
                .filter(|c| c.parent_id.as_ref() == Some(&root.id))
                .cloned()
                .collect();
            children.sort_by(|a, b| a.name.cmp(&b.name));
            (root, children)
        })
        .collect()
}
