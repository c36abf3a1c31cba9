// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rooms: derived enclosed cycles of the wall graph.

use nalgebra::Point2;

use maru_geometry::{polygon_area, polygon_centroid};

use super::corner::CornerId;

/// Name given to rooms the user has not named yet.
pub const UNNAMED_ROOM: &str = "무명 공간";

/// A room derived from a minimal enclosed cycle of walls.
///
/// A room's identity is the sorted, comma-joined list of its corner ids:
/// moving a corner changes which room conceptually exists. Names are kept in
/// a side table keyed by that identity, so an unchanged cycle keeps its name
/// across recomputation.
#[derive(Debug, Clone)]
pub struct Room {
    /// Sorted, comma-joined corner ids. The room's identity.
    pub key: String,
    /// Corner ids in boundary order (polygon winding).
    pub corner_ids: Vec<CornerId>,
    /// Boundary polygon in meters, same order as `corner_ids`.
    pub polygon: Vec<Point2<f64>>,
    /// Display name; `"무명 공간"` when the user has not named the room.
    pub name: String,
}

impl Room {
    /// Builds a room from an ordered boundary, deriving its identity key.
    pub fn new(corner_ids: Vec<CornerId>, polygon: Vec<Point2<f64>>, name: String) -> Self {
        let key = room_key(&corner_ids);
        Self {
            key,
            corner_ids,
            polygon,
            name,
        }
    }

    /// Area of the boundary polygon in square meters.
    pub fn area(&self) -> f64 {
        polygon_area(&self.polygon)
    }

    /// Area-weighted center of the boundary polygon.
    pub fn area_center(&self) -> Point2<f64> {
        polygon_centroid(&self.polygon)
    }
}

/// Computes the identity key of a set of corner ids: sorted and joined with
/// commas, matching the serialized document's room map keys.
pub fn room_key(corner_ids: &[CornerId]) -> String {
    let mut sorted: Vec<&str> = corner_ids.iter().map(|s| s.as_str()).collect();
    sorted.sort_unstable();
    sorted.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn key_is_sorted_and_order_independent() {
        let a = room_key(&["c".into(), "a".into(), "b".into()]);
        let b = room_key(&["b".into(), "c".into(), "a".into()]);
        assert_eq!(a, "a,b,c");
        assert_eq!(a, b);
    }

    #[test]
    fn room_area_and_center() {
        let room = Room::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(6.0, 0.0),
                Point2::new(6.0, 4.0),
                Point2::new(0.0, 4.0),
            ],
            UNNAMED_ROOM.to_string(),
        );
        assert_relative_eq!(room.area(), 24.0);
        assert_relative_eq!(room.area_center().x, 3.0);
        assert_relative_eq!(room.area_center().y, 2.0);
    }
}
