use std::collections::HashMap;

use crate::shortcut::RepairItem;

/// Pending repairs keyed by Steam app id. A later item for the same game
/// replaces the earlier one.
#[derive(Debug, Default)]
pub struct RepairRegistry {
    items: HashMap<String, RepairItem>,
}

impl RepairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, returning the one it displaced, if any.
    pub fn insert(&mut self, item: RepairItem) -> Option<RepairItem> {
        self.items.insert(item.game_id().to_string(), item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &RepairItem)> {
        self.items.iter().map(|(id, item)| (id.as_str(), item))
    }

    /// Hand the items over to the executor.
    pub fn into_items(self) -> impl Iterator<Item = RepairItem> {
        self.items.into_values()
    }
}
