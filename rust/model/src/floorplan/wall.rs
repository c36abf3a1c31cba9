// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Walls and their derived directional edges.

use nalgebra::{Point2, Vector2};
use slotmap::new_key_type;

use super::corner::CornerId;

new_key_type! {
    /// Key for a wall in the floorplan's wall arena.
    pub struct WallKey;
}

/// Which face of a wall an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

/// A straight wall segment between two corners.
#[derive(Debug, Clone)]
pub struct Wall {
    pub corner1: CornerId,
    pub corner2: CornerId,
    /// Thickness in meters.
    pub thickness: f64,
    /// Elevation at the `corner1` end, in meters.
    pub start_elevation: f64,
    /// Elevation at the `corner2` end, in meters.
    pub end_elevation: f64,
}

impl Wall {
    /// Returns `true` if the wall references the given corner.
    pub fn references(&self, id: &str) -> bool {
        self.corner1 == id || self.corner2 == id
    }

    pub fn max_elevation(&self) -> f64 {
        self.start_elevation.max(self.end_elevation)
    }
}

/// A derived, directional view of one face of a wall.
///
/// Wall edges are what items snap against and what the 3D view extrudes into
/// meshes. They are recomputed from the wall and its corners on demand and
/// never persisted. All coordinates are in meters; the snapping layer scales
/// to world centimeters where needed.
#[derive(Debug, Clone)]
pub struct WallEdge {
    pub wall: WallKey,
    pub side: Side,
    /// Face start point, offset from the wall centerline by half thickness.
    pub start: Point2<f64>,
    /// Face end point.
    pub end: Point2<f64>,
    /// Unit normal pointing away from the wall centerline.
    pub normal: Vector2<f64>,
    pub start_elevation: f64,
    pub end_elevation: f64,
}

impl WallEdge {
    /// Builds both faces of a wall from its corner positions.
    pub fn pair(
        key: WallKey,
        wall: &Wall,
        start: Point2<f64>,
        end: Point2<f64>,
    ) -> Option<[WallEdge; 2]> {
        let dir = end - start;
        let len = dir.norm();
        if len < 1e-12 {
            return None;
        }
        let dir = dir / len;
        // Left-hand normal of the direction; the back face gets the opposite.
        let normal = Vector2::new(-dir.y, dir.x);
        let half = wall.thickness / 2.0;

        let front = WallEdge {
            wall: key,
            side: Side::Front,
            start: start + normal * half,
            end: end + normal * half,
            normal,
            start_elevation: wall.start_elevation,
            end_elevation: wall.end_elevation,
        };
        let back = WallEdge {
            wall: key,
            side: Side::Back,
            start: start - normal * half,
            end: end - normal * half,
            normal: -normal,
            start_elevation: wall.start_elevation,
            end_elevation: wall.end_elevation,
        };
        Some([front, back])
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end.
    pub fn direction(&self) -> Vector2<f64> {
        let d = self.end - self.start;
        let len = d.norm();
        if len < 1e-12 {
            Vector2::x()
        } else {
            d / len
        }
    }

    pub fn max_elevation(&self) -> f64 {
        self.start_elevation.max(self.end_elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    #[test]
    fn edge_pair_offsets_and_normals() {
        let mut walls: SlotMap<WallKey, ()> = SlotMap::with_key();
        let key = walls.insert(());

        let wall = Wall {
            corner1: "a".into(),
            corner2: "b".into(),
            thickness: 0.2,
            start_elevation: 2.5,
            end_elevation: 2.5,
        };
        let [front, back] = WallEdge::pair(
            key,
            &wall,
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
        )
        .unwrap();

        // Wall runs along +x; front face is offset toward +y.
        assert_relative_eq!(front.start.y, 0.1);
        assert_relative_eq!(back.start.y, -0.1);
        assert_relative_eq!(front.normal.y, 1.0);
        assert_relative_eq!(back.normal.y, -1.0);
        assert_relative_eq!(front.length(), 4.0);
        assert_relative_eq!(front.center().x, 2.0);
    }

    #[test]
    fn degenerate_wall_has_no_edges() {
        let mut walls: SlotMap<WallKey, ()> = SlotMap::with_key();
        let key = walls.insert(());
        let wall = Wall {
            corner1: "a".into(),
            corner2: "b".into(),
            thickness: 0.1,
            start_elevation: 2.5,
            end_elevation: 2.5,
        };
        let p = Point2::new(1.0, 1.0);
        assert!(WallEdge::pair(key, &wall, p, p).is_none());
    }
}
