use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named spending bucket such as `food` or `house`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Looks up a category by its name, matching the way users refer to them.
pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    let needle = name.trim();
    categories.iter().find(|category| category.name == needle)
}

/// Resolves the display name of a category id, falling back to the raw id.
pub fn name_of(categories: &[Category], id: Uuid) -> String {
    categories
        .iter()
        .find(|category| category.id == id)
        .map(|category| category.name.clone())
        .unwrap_or_else(|| id.to_string())
}
