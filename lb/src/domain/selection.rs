//! Lunchbox selection: at most one item per category

use serde::Serialize;
use tracing::debug;

use super::catalog::{Category, FoodItem, Price};

/// The chosen items of one lunchbox
///
/// Slots are indexed by [`Category::index`]. A selection is a small `Copy`
/// value, so handing a snapshot to a concurrent call is just a copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    items: [Option<&'static FoodItem>; 4],
}

impl Selection {
    /// An empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from items, each stored under its own category
    pub fn from_items(items: impl IntoIterator<Item = &'static FoodItem>) -> Self {
        let mut selection = Self::new();
        for item in items {
            selection.set(item);
        }
        selection
    }

    /// Store an item under its category, replacing whatever was there
    pub fn set(&mut self, item: &'static FoodItem) {
        debug!(id = %item.id, category = %item.category, "Selection::set: called");
        self.items[item.category.index()] = Some(item);
    }

    /// Item chosen for a category
    pub fn get(&self, category: Category) -> Option<&'static FoodItem> {
        self.items[category.index()]
    }

    /// Category/item pairs in selection order, absent ones included
    pub fn slots(&self) -> impl Iterator<Item = (Category, Option<&'static FoodItem>)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// The chosen items in category order
    pub fn chosen(&self) -> impl Iterator<Item = &'static FoodItem> + '_ {
        self.items.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.items.iter().all(Option::is_none)
    }

    /// True once every category holds an item
    pub fn is_complete(&self) -> bool {
        self.items.iter().all(Option::is_some)
    }

    /// Sum of the chosen items' prices; missing categories count as zero
    pub fn total_price(&self) -> Price {
        let total = self.chosen().map(|item| item.price).sum();
        debug!(%total, "Selection::total_price: computed");
        total
    }
}
