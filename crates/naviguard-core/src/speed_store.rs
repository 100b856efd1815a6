//! Positional per-segment speed storage.
//!
//! Entry `i` holds the user speed for the leg between waypoint `i` and `i + 1`.
//! Entries are addressed by position, not content, so every structural edit of
//! the waypoint list must be mirrored here through one of the `on_waypoint_*`
//! repair hooks. After each hook the store holds `max(0, waypoints - 1)` entries.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentSpeedStore {
    entries: Vec<Option<f64>>,
}

impl SegmentSpeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// User speed for segment `index`, `None` when unset or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.entries.get(index).copied().flatten()
    }

    /// Set or clear the speed of an existing segment. Values are stored as given;
    /// validation happens at resolution time.
    pub fn set(&mut self, index: usize, value: Option<f64>) -> Result<(), RouteError> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(RouteError::SegmentOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn entries(&self) -> &[Option<f64>] {
        &self.entries
    }

    /// A waypoint was pushed onto the end; `waypoint_count` is the new route length.
    pub fn on_waypoint_appended(&mut self, waypoint_count: usize) {
        if waypoint_count >= 2 {
            self.entries.push(None);
        }
    }

    /// Waypoint `index` was removed; `waypoint_count` is the route length before removal.
    ///
    /// Removing an interior waypoint merges its two legs. The merged leg keeps the
    /// speed of the leg that started at the removed waypoint.
    pub fn on_waypoint_removed(&mut self, index: usize, waypoint_count: usize) {
        if self.entries.is_empty() {
            return;
        }
        if index == 0 {
            self.entries.remove(0);
        } else if index + 1 >= waypoint_count {
            self.entries.pop();
        } else {
            self.entries.remove(index - 1);
        }
    }

    /// A waypoint was inserted at `index`; `waypoint_count` is the new route length.
    ///
    /// An interior insert splits one leg in two and both halves inherit its speed.
    /// Inserting at the front opens a new unset leg; inserting at the back is an append.
    pub fn on_waypoint_inserted(&mut self, index: usize, waypoint_count: usize) {
        if waypoint_count < 2 {
            return;
        }
        let previous_count = waypoint_count - 1;
        if index == 0 {
            self.entries.insert(0, None);
        } else if index >= previous_count {
            self.entries.push(None);
        } else {
            let inherited = self.entries.get(index - 1).copied().flatten();
            self.entries.insert(index, inherited);
        }
    }

    pub fn on_clear(&mut self) {
        self.entries.clear();
    }
}
