// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Maru Geometry
//!
//! Pure 2D geometry kernel shared by the floorplan model, the view
//! synchronizers, and the room-network analysis.
//!
//! Everything here operates on `nalgebra::Point2<f64>` vertex loops. Polygons
//! are treated as closed loops (the last vertex connects back to the first)
//! and may be convex or concave, but not self-intersecting. Degenerate input
//! (fewer than 3 vertices) is a normal edge case, never an error: areas come
//! back as `0.0` and containment tests as `false`.

pub mod overlap;
pub mod polygon;
pub mod segment;
pub mod triangulate;

pub use overlap::{polygon_contains, polygon_intersect};
pub use polygon::{
    closest_point_on_polygon, point_in_polygon, polygon_area, polygon_centroid,
};
pub use segment::{angle_between, closest_point_on_segment, distance_point_to_segment};
pub use triangulate::triangulate_polygon;
