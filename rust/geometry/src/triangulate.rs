// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation for floor meshes.
//!
//! The 3D view renders each room's floor as a triangle fan produced by
//! earcut. Room polygons come from the floorplan's cycle detection, so they
//! are simple but frequently concave.

use nalgebra::Point2;

/// Triangulates a simple polygon into index triples.
///
/// Indices refer to the input vertex order. Degenerate input (fewer than 3
/// vertices) or an earcut failure yields an empty list; floors for such
/// rooms simply do not render.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Vec<[usize; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity(points.len() * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    match earcutr::earcut(&vertices, &[], 2) {
        Ok(indices) => indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect(),
        Err(_) => Vec::new(),
    }
}
