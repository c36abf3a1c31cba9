// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural diff between two simplified room snapshots.
//!
//! Rooms are matched **by display name**, not by a stable id: a rename is
//! indistinguishable from a removal plus an addition. That is a documented
//! property of the source data model (room identity is the corner-id set,
//! which changes under any topology edit), not a bug to paper over here.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::simplified::SimplifiedRoomInfo;

/// Area changes at or below this tolerance do not count as modifications,
/// in floorplan units.
const AREA_TOLERANCE: f64 = 1.0;

/// What happened to a room between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomChange {
    Added,
    Removed,
    Modified,
}

/// One entry of the structural diff.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDiff {
    pub name: String,
    pub change: RoomChange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_before: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_after: Option<f64>,
    /// Item names present after but not before.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added_items: Vec<String>,
    /// Item names present before but not after.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed_items: Vec<String>,
}

/// Compares two simplified snapshots.
///
/// Matched rooms are `Modified` when the area moved beyond the tolerance or
/// the set of contained item names changed (set membership only; item
/// positions are ignored). Comparing a snapshot against itself yields an
/// empty list.
pub fn diff_simplified_room_info(
    before: &SimplifiedRoomInfo,
    after: &SimplifiedRoomInfo,
) -> Vec<RoomDiff> {
    let before_by_name: FxHashMap<&str, &crate::simplified::SimplifiedRoom> = before
        .rooms
        .iter()
        .map(|r| (r.name.as_str(), r))
        .collect();
    let after_by_name: FxHashMap<&str, &crate::simplified::SimplifiedRoom> = after
        .rooms
        .iter()
        .map(|r| (r.name.as_str(), r))
        .collect();

    let mut diffs = Vec::new();

    // Removed and modified rooms, in `before` order.
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for room in &before.rooms {
        if !seen.insert(room.name.as_str()) {
            continue;
        }
        let Some(matched) = after_by_name.get(room.name.as_str()) else {
            diffs.push(RoomDiff {
                name: room.name.clone(),
                change: RoomChange::Removed,
                area_before: Some(room.area),
                area_after: None,
                added_items: Vec::new(),
                removed_items: Vec::new(),
            });
            continue;
        };

        let before_items: FxHashSet<&str> =
            room.items.iter().map(|i| i.name.as_str()).collect();
        let after_items: FxHashSet<&str> =
            matched.items.iter().map(|i| i.name.as_str()).collect();

        let area_changed = (room.area - matched.area).abs() > AREA_TOLERANCE;
        let items_changed = before_items != after_items;

        if area_changed || items_changed {
            let mut added_items: Vec<String> = after_items
                .difference(&before_items)
                .map(|s| s.to_string())
                .collect();
            let mut removed_items: Vec<String> = before_items
                .difference(&after_items)
                .map(|s| s.to_string())
                .collect();
            added_items.sort();
            removed_items.sort();

            diffs.push(RoomDiff {
                name: room.name.clone(),
                change: RoomChange::Modified,
                area_before: Some(room.area),
                area_after: Some(matched.area),
                added_items,
                removed_items,
            });
        }
    }

    // Added rooms, in `after` order.
    let mut seen_after: FxHashSet<&str> = FxHashSet::default();
    for room in &after.rooms {
        if !seen_after.insert(room.name.as_str()) {
            continue;
        }
        if !before_by_name.contains_key(room.name.as_str()) {
            diffs.push(RoomDiff {
                name: room.name.clone(),
                change: RoomChange::Added,
                area_before: None,
                area_after: Some(room.area),
                added_items: room.items.iter().map(|i| i.name.clone()).collect(),
                removed_items: Vec::new(),
            });
        }
    }

    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplified::{PlanMetrics, SimplifiedItem, SimplifiedRoom, SpaceEfficiency};
    use crate::simplified::Placement;

    fn info(rooms: Vec<SimplifiedRoom>) -> SimplifiedRoomInfo {
        let metrics = PlanMetrics {
            total_area: rooms.iter().map(|r| r.area).sum(),
            room_count: rooms.len(),
            public_private_ratio: 1.0,
            space_efficiency: SpaceEfficiency::Balanced,
        };
        SimplifiedRoomInfo { rooms, metrics }
    }

    fn room(name: &str, area: f64, items: &[&str]) -> SimplifiedRoom {
        SimplifiedRoom {
            name: name.to_string(),
            area,
            items: items
                .iter()
                .map(|n| SimplifiedItem {
                    name: n.to_string(),
                    placement: Placement::AwayFromWalls,
                    nearest: None,
                })
                .collect(),
        }
    }

    #[test]
    fn identical_snapshots_diff_empty() {
        let snapshot = info(vec![
            room("거실", 24.0, &["sofa", "tv stand"]),
            room("방", 12.0, &["bed"]),
        ]);
        assert!(diff_simplified_room_info(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn area_within_tolerance_is_unchanged() {
        let before = info(vec![room("거실", 24.0, &[])]);
        let after = info(vec![room("거실", 24.9, &[])]);
        assert!(diff_simplified_room_info(&before, &after).is_empty());
    }

    #[test]
    fn area_beyond_tolerance_is_modified() {
        let before = info(vec![room("거실", 24.0, &[])]);
        let after = info(vec![room("거실", 26.0, &[])]);

        let diffs = diff_simplified_room_info(&before, &after);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].change, RoomChange::Modified);
        assert_eq!(diffs[0].area_before, Some(24.0));
        assert_eq!(diffs[0].area_after, Some(26.0));
    }

    #[test]
    fn item_set_change_is_modified() {
        let before = info(vec![room("거실", 24.0, &["sofa"])]);
        let after = info(vec![room("거실", 24.0, &["sofa", "lamp"])]);

        let diffs = diff_simplified_room_info(&before, &after);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].change, RoomChange::Modified);
        assert_eq!(diffs[0].added_items, vec!["lamp".to_string()]);
        assert!(diffs[0].removed_items.is_empty());
    }

    #[test]
    fn rename_reads_as_remove_plus_add() {
        let before = info(vec![room("거실", 24.0, &[])]);
        let after = info(vec![room("안방", 24.0, &[])]);

        let diffs = diff_simplified_room_info(&before, &after);
        assert_eq!(diffs.len(), 2);
        assert!(diffs
            .iter()
            .any(|d| d.change == RoomChange::Removed && d.name == "거실"));
        assert!(diffs
            .iter()
            .any(|d| d.change == RoomChange::Added && d.name == "안방"));
    }
}
