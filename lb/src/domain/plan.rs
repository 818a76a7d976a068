//! Weekly plan: five weekday slots, each optionally holding a saved lunchbox

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::catalog::Price;
use super::selection::Selection;

/// The five school days of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Weekday {
    Mandag,
    Tirsdag,
    Onsdag,
    Torsdag,
    Fredag,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Mandag,
        Weekday::Tirsdag,
        Weekday::Onsdag,
        Weekday::Torsdag,
        Weekday::Fredag,
    ];

    pub fn index(self) -> usize {
        match self {
            Weekday::Mandag => 0,
            Weekday::Tirsdag => 1,
            Weekday::Onsdag => 2,
            Weekday::Torsdag => 3,
            Weekday::Fredag => 4,
        }
    }

    /// Danish display label
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mandag => "Mandag",
            Weekday::Tirsdag => "Tirsdag",
            Weekday::Onsdag => "Onsdag",
            Weekday::Torsdag => "Torsdag",
            Weekday::Fredag => "Fredag",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Weekday::Mandag => "monday",
            Weekday::Tirsdag => "tuesday",
            Weekday::Onsdag => "wednesday",
            Weekday::Torsdag => "thursday",
            Weekday::Fredag => "friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Accepts the Danish label, the English name, or a three letter prefix
    /// of either, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        if needle.chars().count() < 3 {
            return Err(format!("Unknown weekday: '{}'", s));
        }
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let danish = day.label().to_lowercase();
                let english = day.english();
                needle == danish
                    || needle == english
                    || (needle.chars().count() == 3 && (danish.starts_with(&needle) || english.starts_with(&needle)))
            })
            .ok_or_else(|| format!("Unknown weekday: '{}'", s))
    }
}

/// A finalized lunchbox stored in a day slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedLunchbox {
    pub selection: Selection,
    /// Generated illustration as a data URI
    pub image: Option<String>,
}

impl SavedLunchbox {
    pub fn new(selection: Selection, image: Option<String>) -> Self {
        Self { selection, image }
    }

    pub fn total_price(&self) -> Price {
        self.selection.total_price()
    }
}

/// Fixed mapping from the five weekdays to optional lunchboxes
///
/// Backed by an array indexed by [`Weekday::index`], so every day is always
/// present as a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyPlan {
    slots: [Option<SavedLunchbox>; 5],
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan with every day filled, in weekday order
    pub fn from_days(days: [SavedLunchbox; 5]) -> Self {
        Self { slots: days.map(Some) }
    }

    pub fn get(&self, day: Weekday) -> Option<&SavedLunchbox> {
        self.slots[day.index()].as_ref()
    }

    /// Overwrite a day unconditionally
    pub fn save(&mut self, day: Weekday, lunchbox: SavedLunchbox) {
        debug!(%day, "WeeklyPlan::save: called");
        self.slots[day.index()] = Some(lunchbox);
    }

    /// Clear a day; returns what was there
    pub fn remove(&mut self, day: Weekday) -> Option<SavedLunchbox> {
        debug!(%day, "WeeklyPlan::remove: called");
        self.slots[day.index()].take()
    }

    /// All days in order with their slot content
    pub fn days(&self) -> impl Iterator<Item = (Weekday, Option<&SavedLunchbox>)> + '_ {
        Weekday::ALL.into_iter().map(move |day| (day, self.get(day)))
    }

    pub fn planned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Sum of every planned day's lunchbox price
    pub fn week_total(&self) -> Price {
        self.slots.iter().flatten().map(SavedLunchbox::total_price).sum()
    }
}
