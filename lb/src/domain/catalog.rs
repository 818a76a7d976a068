//! Food catalog
//!
//! The catalog is a load-time constant: sixteen items, four per category.
//! Items are handed around as `&'static FoodItem` and never mutated.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;
use tracing::debug;

/// The four food roles a lunchbox is built from, in selection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Base,
    Protein,
    Green,
    Extra,
}

impl Category {
    /// All categories in the order the flow visits them
    pub const ALL: [Category; 4] = [Category::Base, Category::Protein, Category::Green, Category::Extra];

    /// Position of this category in the selection order (0..=3)
    pub fn index(self) -> usize {
        match self {
            Category::Base => 0,
            Category::Protein => 1,
            Category::Green => 2,
            Category::Extra => 3,
        }
    }

    /// Category at the given position, if any
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The category chosen after this one
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Danish label used in summaries and prompts
    pub fn label(self) -> &'static str {
        match self {
            Category::Base => "Bund",
            Category::Protein => "Protein",
            Category::Green => "Grønt",
            Category::Extra => "Ekstra",
        }
    }

    /// Heading shown while this category is being chosen
    pub fn step_title(self) -> &'static str {
        match self {
            Category::Base => "TRIN 1: FUNDAMENTET! 🥖",
            Category::Protein => "TRIN 2: SUPERKRÆFTER! 🥚",
            Category::Green => "TRIN 3: VITAMIN-BOMBEN! 🥦",
            Category::Extra => "TRIN 4: HEMMELIGT VÅBEN! 🎁",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Price in øre (1/100 DKK)
///
/// Fixed-point so that summing a lunchbox is exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Price(u32);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Build a price from whole kroner and øre
    pub const fn new(kroner: u32, ore: u32) -> Self {
        Price(kroner * 100 + ore)
    }

    pub const fn from_ore(ore: u32) -> Self {
        Price(ore)
    }

    pub fn as_ore(self) -> u32 {
        self.0
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// One selectable catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoodItem {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub emoji: &'static str,
    /// Display colour tag
    pub color: &'static str,
    pub description: &'static str,
    pub price: Price,
}

const fn item(
    id: &'static str,
    name: &'static str,
    category: Category,
    emoji: &'static str,
    color: &'static str,
    description: &'static str,
    price: Price,
) -> FoodItem {
    FoodItem {
        id,
        name,
        category,
        emoji,
        color,
        description,
        price,
    }
}

/// The full catalog, grouped by category in selection order
pub static CATALOG: [FoodItem; 16] = [
    // Bund
    item("rugbrod", "Rugbrødsklapper", Category::Base, "🍞", "amber", "Klassisk mørkt rugbrød der mætter længe", Price::new(3, 0)),
    item("grovbolle", "Grovbolle", Category::Base, "🥯", "orange", "Blød bolle med masser af kerner", Price::new(4, 50)),
    item("fuldkornspita", "Pitabrød", Category::Base, "🥙", "stone", "Fuldkornspita klar til fyld", Price::new(4, 0)),
    item("pastasalat", "Pastasalat", Category::Base, "🍝", "yellow", "Kold pasta med lidt olie", Price::new(5, 50)),
    // Protein
    item("leverpostej", "Leverpostej", Category::Protein, "🥣", "orange", "Klassisk dansk pålæg", Price::new(3, 50)),
    item("frikadeller", "Små Frikadeller", Category::Protein, "🍖", "red", "Hjemmelavede deller af svin/kalv", Price::new(8, 50)),
    item("kyllingepalaeg", "Kyllingepålæg", Category::Protein, "🍗", "blue", "Mager kylling i skiver", Price::new(6, 0)),
    item("aeg", "Hårdkogt æg", Category::Protein, "🥚", "white", "Nærende og nemt at spise", Price::new(2, 50)),
    // Grønt
    item("gulerod", "Gulerodsstænger", Category::Green, "🥕", "orange", "Sprøde gulerødder i stave", Price::new(1, 50)),
    item("agurk", "Agurke-hjul", Category::Green, "🥒", "green", "Frisk agurk i tykke skiver", Price::new(2, 0)),
    item("peberfrugt", "Snack-peber", Category::Green, "🫑", "red", "Sød og sprød rød peber", Price::new(3, 50)),
    item("tomater", "Cherrytomater", Category::Green, "🍅", "red", "Små søde tomater", Price::new(4, 50)),
    // Ekstra
    item("ostehapser", "Ostehaps", Category::Extra, "🧀", "yellow", "En lille cremet ostesnack", Price::new(3, 0)),
    item("figenstang", "Figenstang", Category::Extra, "🍫", "amber", "Sød snack med masser af fiber", Price::new(3, 50)),
    item("aeblebaade", "Æblebåde", Category::Extra, "🍎", "green", "Friske danske æbler", Price::new(2, 0)),
    item("rosiner", "Rosiner", Category::Extra, "🍇", "purple", "En lille æske med søde rosiner", Price::new(2, 50)),
];

/// Every catalog item
pub fn all() -> &'static [FoodItem] {
    &CATALOG
}

/// Items belonging to one category, in catalog order
pub fn items_in(category: Category) -> Vec<&'static FoodItem> {
    debug!(%category, "items_in: called");
    CATALOG.iter().filter(|item| item.category == category).collect()
}

/// Look up an item by its stable id
pub fn find(id: &str) -> Option<&'static FoodItem> {
    debug!(%id, "find: called");
    CATALOG.iter().find(|item| item.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_four_items_per_category() {
        for category in Category::ALL {
            assert_eq!(items_in(category).len(), 4, "category {category:?}");
        }
        assert_eq!(all().len(), 16);
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn test_find() {
        let item = find("frikadeller").unwrap();
        assert_eq!(item.name, "Små Frikadeller");
        assert_eq!(item.category, Category::Protein);
        assert_eq!(item.price, Price::new(8, 50));
        assert!(find("pizza").is_none());
    }

    #[test]
    fn test_category_order() {
        assert_eq!(Category::from_index(0), Some(Category::Base));
        assert_eq!(Category::Base.next(), Some(Category::Protein));
        assert_eq!(Category::Green.next(), Some(Category::Extra));
        assert_eq!(Category::Extra.next(), None);
        assert_eq!(Category::from_index(4), None);
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(11, 50).to_string(), "11.50");
        assert_eq!(Price::new(3, 0).to_string(), "3.00");
        assert_eq!(Price::from_ore(5).to_string(), "0.05");
        assert_eq!(Price::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::new(3, 0), Price::new(8, 50)].into_iter().sum();
        assert_eq!(total, Price::new(11, 50));
    }
}
