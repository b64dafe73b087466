//! Category catalog: meal slots with display names and icons.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Soup course.
pub const SOUP: &str = "soup";
/// First of the two parallel main-dish slots.
pub const MAIN_A: &str = "mainA";
/// Second of the two parallel main-dish slots.
pub const MAIN_B: &str = "mainB";
/// Unified main-dish category shown to non-internal institutions.
pub const MAIN: &str = "main";
/// Dessert course.
pub const DESSERT: &str = "dessert";

/// The parallel main-dish slots, in tie-break order.
pub const MAIN_SLOTS: [&str; 2] = [MAIN_A, MAIN_B];

/// Whether a category key names one of the parallel main-dish slots.
pub fn is_main_slot(category: &str) -> bool {
    MAIN_SLOTS.contains(&category)
}

/// One of the two parallel main-dish slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum MainSlot {
    #[serde(rename = "mainA")]
    A,
    #[serde(rename = "mainB")]
    B,
}

impl MainSlot {
    /// Slots in tie-break order: the first assigned slot wins.
    pub const ORDER: [MainSlot; 2] = [MainSlot::A, MainSlot::B];

    pub fn key(&self) -> &'static str {
        match self {
            Self::A => MAIN_A,
            Self::B => MAIN_B,
        }
    }
}

/// Display metadata for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CategoryEntry {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl CategoryEntry {
    pub fn new(key: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// Ordered registry of canonical categories.
///
/// Order is display order; the placeholder generator uses it as the
/// canonical key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct CategoryCatalog {
    entries: Vec<CategoryEntry>,
}

impl CategoryCatalog {
    pub fn new(entries: Vec<CategoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Category keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Copy of the catalog with the synthetic "main" entry added.
    ///
    /// The entry is placed before the first main slot so renderers keep
    /// course order. A catalog that already has "main" is returned as is.
    pub fn augmented(&self, main_entry: &CategoryEntry) -> Self {
        if self.get(MAIN).is_some() {
            return self.clone();
        }

        let mut entries = self.entries.clone();
        let position = entries
            .iter()
            .position(|e| is_main_slot(&e.key))
            .unwrap_or(entries.len());
        entries.insert(
            position,
            CategoryEntry {
                key: MAIN.to_string(),
                ..main_entry.clone()
            },
        );
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(vec![
            CategoryEntry::new(SOUP, "Soup", "bowl"),
            CategoryEntry::new(MAIN_A, "Main A", "plate"),
            CategoryEntry::new(MAIN_B, "Main B", "plate"),
            CategoryEntry::new(DESSERT, "Dessert", "cake"),
        ])
    }

    #[test]
    fn test_augmented_inserts_main_before_slots() {
        let main = CategoryEntry::new(MAIN, "Main course", "utensils");
        let augmented = catalog().augmented(&main);
        let keys: Vec<&str> = augmented.keys().collect();
        assert_eq!(keys, vec![SOUP, MAIN, MAIN_A, MAIN_B, DESSERT]);
        assert_eq!(augmented.get(MAIN).unwrap().name, "Main course");
    }

    #[test]
    fn test_augmented_is_idempotent() {
        let main = CategoryEntry::new(MAIN, "Main course", "utensils");
        let once = catalog().augmented(&main);
        let twice = once.augmented(&main);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_main_slot_keys() {
        assert!(is_main_slot(MAIN_A));
        assert!(is_main_slot(MAIN_B));
        assert!(!is_main_slot(MAIN));
        assert_eq!(MainSlot::ORDER[0].key(), MAIN_A);
        assert_eq!(serde_json::to_string(&MainSlot::B).unwrap(), r#""mainB""#);
    }
}
