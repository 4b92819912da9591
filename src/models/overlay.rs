use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::itinerary::{Attraction, Coordinates, Day, Itinerary};

/// An attraction the user added by hand. Removal flips `is_removed` instead
/// of deleting the entry so indexes stay stable.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CustomAttraction {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub is_removed: bool,
}

impl CustomAttraction {
    fn to_attraction(&self) -> Attraction {
        Attraction {
            name: self.name.clone(),
            description: self.description.clone(),
            estimated_duration: None,
            category: None,
            coordinates: self.coordinates,
            approximate: false,
            details: None,
        }
    }
}

/// Uncommitted edits layered over a canonical itinerary: per day, the set of
/// removed original-array indexes and the list of user-added attractions.
/// The canonical itinerary is untouched until [`EditOverlay::commit`].
///
/// This is the single source of truth for effective attraction visibility;
/// every view derives its list and counts from here.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct EditOverlay {
    pub removed_attractions: BTreeMap<u32, BTreeSet<usize>>,
    pub custom_attractions: BTreeMap<u32, Vec<CustomAttraction>>,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an attraction removed. For originals the index is recorded in
    /// that day's removed set (idempotent); for customs the entry at `index`
    /// is flagged, and an out-of-range index is a no-op.
    pub fn remove_attraction(&mut self, day_number: u32, index: usize, is_custom: bool) {
        if is_custom {
            if let Some(customs) = self.custom_attractions.get_mut(&day_number) {
                if let Some(custom) = customs.get_mut(index) {
                    custom.is_removed = true;
                }
            }
        } else {
            self.removed_attractions
                .entry(day_number)
                .or_default()
                .insert(index);
        }
    }

    /// Append a custom attraction to a day. The entry always starts active.
    pub fn add_custom_attraction(&mut self, day_number: u32, mut attraction: CustomAttraction) {
        attraction.is_removed = false;
        self.custom_attractions
            .entry(day_number)
            .or_default()
            .push(attraction);
    }

    /// The attraction list a view should show for `day`: originals minus the
    /// removed indexes, followed by the active customs. Recomputed on every
    /// call, never cached.
    pub fn effective_attractions(&self, day: &Day) -> Vec<Attraction> {
        let removed = self.removed_attractions.get(&day.day_number);
        let mut effective: Vec<Attraction> = day
            .attractions
            .iter()
            .enumerate()
            .filter(|(index, _)| removed.map_or(true, |set| !set.contains(index)))
            .map(|(_, attraction)| attraction.clone())
            .collect();

        if let Some(customs) = self.custom_attractions.get(&day.day_number) {
            effective.extend(
                customs
                    .iter()
                    .filter(|custom| !custom.is_removed)
                    .map(CustomAttraction::to_attraction),
            );
        }

        effective
    }

    /// Total attractions visible across the whole itinerary with this
    /// overlay active. Derived from the effective lists, not from the
    /// canonical `total_attractions`.
    pub fn effective_attraction_count(&self, itinerary: &Itinerary) -> u32 {
        itinerary
            .days
            .iter()
            .map(|day| self.effective_attractions(day).len() as u32)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.removed_attractions.values().all(BTreeSet::is_empty)
            && self.custom_attractions.values().all(Vec::is_empty)
    }

    /// Fold the overlay into a new canonical itinerary: each day's
    /// attractions become its effective list and `total_attractions` is
    /// recomputed. The overlay is cleared afterwards. A zero-edit commit
    /// returns the canonical itinerary unchanged.
    pub fn commit(&mut self, itinerary: &Itinerary) -> Itinerary {
        if self.is_empty() {
            return itinerary.clone();
        }

        let mut committed = itinerary.clone();
        for day in &mut committed.days {
            day.attractions = self.effective_attractions(day);
        }
        committed.total_attractions = committed
            .days
            .iter()
            .map(|day| day.attractions.len() as u32)
            .sum();

        self.removed_attractions.clear();
        self.custom_attractions.clear();
        committed
    }
}
