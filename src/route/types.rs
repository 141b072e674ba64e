use bevy::prelude::*;
use std::fmt;

use crate::constants::{ENTRY_ID, EXIT_ID, GAP_ID};
use crate::waypoint::WaypointId;

/// One slot of a route: a sentinel, a gap marker or a waypoint reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum RouteEntry {
    Entry,
    Exit,
    /// Intentional break, no flyable segment crosses it
    Gap,
    Waypoint(WaypointId),
}

impl RouteEntry {
    /// Decode a raw identifier. Negative ids other than the sentinels do not decode.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            ENTRY_ID => Some(RouteEntry::Entry),
            EXIT_ID => Some(RouteEntry::Exit),
            GAP_ID => Some(RouteEntry::Gap),
            id if id > 0 => Some(RouteEntry::Waypoint(WaypointId(id as u32))),
            _ => None,
        }
    }

    /// Raw identifier. Catalog ids never exceed `MAX_WAYPOINT_ID`, so waypoints map to positives.
    pub fn id(self) -> i32 {
        match self {
            RouteEntry::Entry => ENTRY_ID,
            RouteEntry::Exit => EXIT_ID,
            RouteEntry::Gap => GAP_ID,
            RouteEntry::Waypoint(id) => id.0 as i32,
        }
    }

    pub fn is_gap(self) -> bool {
        self == RouteEntry::Gap
    }

    pub fn is_sentinel(self) -> bool {
        matches!(self, RouteEntry::Entry | RouteEntry::Exit)
    }

    pub fn waypoint(self) -> Option<WaypointId> {
        match self {
            RouteEntry::Waypoint(id) => Some(id),
            _ => None,
        }
    }
}

impl From<WaypointId> for RouteEntry {
    fn from(id: WaypointId) -> Self {
        RouteEntry::Waypoint(id)
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Ordered route entries. Owned by the editing layer; playback works on a snapshot.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    entries: Vec<RouteEntry>,
}

impl Route {
    pub fn from_entries(entries: impl IntoIterator<Item = RouteEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<RouteEntry> {
        self.entries.last().copied()
    }

    pub fn contains(&self, entry: RouteEntry) -> bool {
        self.entries.contains(&entry)
    }

    pub fn index_of(&self, entry: RouteEntry) -> Option<usize> {
        self.entries.iter().position(|e| *e == entry)
    }

    /// Raw identifiers, gap markers included
    pub fn point_ids(&self) -> Vec<i32> {
        self.entries.iter().map(|e| e.id()).collect()
    }

    /// A route is closed once it reaches the Exit anchor
    pub fn is_closed(&self) -> bool {
        self.contains(RouteEntry::Exit)
    }

    /// Add to the end. Repeating the last entry is a no-op, and a route never starts with a gap.
    pub fn append(&mut self, entry: RouteEntry) -> bool {
        if self.last() == Some(entry) || (entry.is_gap() && self.is_empty()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Splice `entry` directly after `anchor`
    pub fn insert_after(&mut self, anchor: RouteEntry, entry: RouteEntry) -> bool {
        if entry.is_gap() || self.contains(entry) {
            return false;
        }
        let Some(index) = self.index_of(anchor) else {
            return false;
        };
        self.entries.insert(index + 1, entry);
        true
    }

    /// Remove an entry. An interior entry between two real neighbors leaves a gap marker
    /// behind so the neighbors are not silently reconnected.
    /// Gap markers are not points; they only go away through `remove_first_gap_between`.
    pub fn remove_point(&mut self, entry: RouteEntry) -> bool {
        if entry.is_gap() {
            return false;
        }
        let Some(index) = self.index_of(entry) else {
            return false;
        };

        let last = self.entries.len() - 1;
        let interior = index > 0 && index < last;
        if interior && !self.entries[index - 1].is_gap() && !self.entries[index + 1].is_gap() {
            self.entries[index] = RouteEntry::Gap;
            return true;
        }

        self.entries.remove(index);
        self.normalize_gaps();
        true
    }

    /// Entry directly after `entry`, gap markers included
    pub fn successor(&self, entry: RouteEntry) -> Option<RouteEntry> {
        let index = self.index_of(entry)?;
        self.entries.get(index + 1).copied()
    }

    /// The two entries that `remove_first_gap_between(a, b)` would join
    pub fn first_gap_between(
        &self,
        a: RouteEntry,
        b: RouteEntry,
    ) -> Option<(RouteEntry, RouteEntry)> {
        let gap = self.first_gap_index(a, b)?;
        Some((self.entries[gap - 1], self.entries[gap + 1]))
    }

    /// Delete the first gap marker between two entries, joining the segments on either side
    pub fn remove_first_gap_between(&mut self, a: RouteEntry, b: RouteEntry) -> bool {
        let Some(gap) = self.first_gap_index(a, b) else {
            return false;
        };
        self.entries.remove(gap);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Consecutive entry pairs not broken by a gap marker
    pub fn flyable_segments(&self) -> Vec<(RouteEntry, RouteEntry)> {
        self.entries
            .windows(2)
            .filter(|pair| !pair[0].is_gap() && !pair[1].is_gap())
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }

    // Always strictly between a and b, so both neighbors exist
    fn first_gap_index(&self, a: RouteEntry, b: RouteEntry) -> Option<usize> {
        let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
        let (lo, hi) = (ia.min(ib), ia.max(ib));
        (lo + 1..hi).find(|i| self.entries[*i].is_gap())
    }

    // Drop leading/trailing gaps and collapse adjacent ones
    fn normalize_gaps(&mut self) {
        self.entries
            .dedup_by(|next, prev| next.is_gap() && prev.is_gap());
        while self.entries.first().is_some_and(|e| e.is_gap()) {
            self.entries.remove(0);
        }
        while self.entries.last().is_some_and(|e| e.is_gap()) {
            self.entries.pop();
        }
    }
}
