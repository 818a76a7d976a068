//! Weekly plan generation
//!
//! Random lunchboxes for every weekday, illustrated concurrently.

use futures::future::join_all;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::domain::{Category, SavedLunchbox, Selection, Weekday, catalog};
use crate::illustrator::Illustrator;

/// Draw one item per category, each uniformly and independently
pub fn random_selection<R: Rng + ?Sized>(rng: &mut R) -> Selection {
    let mut selection = Selection::new();
    for category in Category::ALL {
        if let Some(item) = catalog::items_in(category).choose(rng).copied() {
            selection.set(item);
        }
    }
    selection
}

/// One random selection per weekday, in weekday order
pub fn random_week<R: Rng + ?Sized>(rng: &mut R) -> [Selection; 5] {
    debug!("random_week: called");
    Weekday::ALL.map(|_| random_selection(&mut *rng))
}

/// Illustrate five selections concurrently
///
/// Every image request is issued before any is awaited; the result is ready
/// once all five have settled. Failed illustrations leave the image empty.
pub async fn illustrate_week(illustrator: &Illustrator, selections: [Selection; 5]) -> [SavedLunchbox; 5] {
    debug!("illustrate_week: called");
    let images = join_all(selections.iter().map(|s| illustrator.illustrate(s))).await;

    let mut images = images.into_iter();
    let week = selections.map(|selection| SavedLunchbox::new(selection, images.next().flatten()));

    let illustrated = week.iter().filter(|day| day.image.is_some()).count();
    info!(illustrated, "illustrate_week: week generated");
    week
}
