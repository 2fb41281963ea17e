use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::FromRow;

/// Database model for a violation category
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ViolationCategory {
    pub id: i32,
    pub name: String,
}

/// Immutable id → category lookup, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    by_id: BTreeMap<i32, ViolationCategory>,
}

impl CategoryRegistry {
    pub fn from_categories(categories: impl IntoIterator<Item = ViolationCategory>) -> Self {
        Self {
            by_id: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: i32) -> Option<&ViolationCategory> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn name_of(&self, id: i32) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    /// All categories ordered by name
    pub fn list(&self) -> Vec<&ViolationCategory> {
        let mut categories: Vec<_> = self.by_id.values().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        categories
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> CategoryRegistry {
        CategoryRegistry::from_categories([
            ViolationCategory { id: 1, name: "Signal Jumping".to_string() },
            ViolationCategory { id: 2, name: "Illegal Parking".to_string() },
            ViolationCategory { id: 3, name: "Speeding".to_string() },
        ])
    }

    #[test]
    fn test_lookup() {
        let registry = sample_registry();
        assert_eq!(registry.name_of(3), Some("Speeding"));
        assert!(registry.contains(1));
        assert!(registry.get(99).is_none());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_list_ordered_by_name() {
        let names: Vec<_> = sample_registry()
            .list()
            .into_iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["Illegal Parking", "Signal Jumping", "Speeding"]);
    }
}
