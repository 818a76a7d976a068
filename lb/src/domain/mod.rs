//! Domain types for the Lunchbox Wizard
//!
//! Catalog items, the per-lunchbox selection and the weekly plan.
//! Everything here is plain in-memory data; nothing is persisted.

pub mod catalog;
mod plan;
mod selection;

pub use catalog::{CATALOG, Category, FoodItem, Price};
pub use plan::{SavedLunchbox, Weekday, WeeklyPlan};
pub use selection::Selection;
