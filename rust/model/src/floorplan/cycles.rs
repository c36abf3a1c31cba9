// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room discovery: minimal enclosed cycles of the wall graph.
//!
//! Rooms are never drawn by hand; they fall out of the wall topology. The
//! wall graph is a planar straight-line graph, so its bounded faces are
//! exactly the enclosed rooms. Faces are extracted with the angle-ordered
//! half-edge walk: from a directed edge (u, v), the next edge leaves v
//! through the predecessor of u in the counterclockwise ordering of v's
//! neighbors. Bounded faces come out with positive signed area; the single
//! unbounded outer face per component comes out negative and is dropped.

use nalgebra::Point2;
use rustc_hash::{FxHashMap, FxHashSet};

use super::corner::CornerId;

/// Faces with |signed area| at or below this are degenerate (spur-only
/// walks) and never become rooms.
const MIN_FACE_AREA: f64 = 1e-9;

/// Extracts the bounded faces of the wall graph as ordered corner cycles.
///
/// `corners` resolves ids to positions; `walls` lists undirected corner-id
/// pairs. Dangling walls (spurs) are tolerated: the walk traverses them in
/// both directions and they are stripped from the resulting boundary.
pub fn find_enclosed_cycles(
    corners: &FxHashMap<CornerId, Point2<f64>>,
    walls: &[(CornerId, CornerId)],
) -> Vec<Vec<CornerId>> {
    // Counterclockwise-sorted adjacency.
    let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for (a, b) in walls {
        if a == b || !corners.contains_key(a) || !corners.contains_key(b) {
            continue;
        }
        adjacency.entry(a.as_str()).or_default().push(b.as_str());
        adjacency.entry(b.as_str()).or_default().push(a.as_str());
    }
    for (id, neighbors) in adjacency.iter_mut() {
        neighbors.sort_unstable();
        neighbors.dedup();
        let origin = corners[*id];
        neighbors.sort_by(|a, b| {
            let pa = corners[*a] - origin;
            let pb = corners[*b] - origin;
            pa.y.atan2(pa.x)
                .partial_cmp(&pb.y.atan2(pb.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    // Deterministic traversal order over directed edges.
    let mut directed: Vec<(&str, &str)> = Vec::new();
    for (id, neighbors) in &adjacency {
        for n in neighbors {
            directed.push((*id, *n));
        }
    }
    directed.sort_unstable();

    let mut visited: FxHashSet<(&str, &str)> = FxHashSet::default();
    let mut cycles = Vec::new();

    for &start in &directed {
        if visited.contains(&start) {
            continue;
        }

        let mut face: Vec<&str> = Vec::new();
        let mut edge = start;
        loop {
            visited.insert(edge);
            face.push(edge.0);

            let (u, v) = edge;
            let neighbors = &adjacency[v];
            let idx = neighbors
                .iter()
                .position(|n| *n == u)
                .expect("directed edge endpoint must be an adjacency entry");
            let next = neighbors[(idx + neighbors.len() - 1) % neighbors.len()];

            edge = (v, next);
            if edge == start {
                break;
            }
            // A malformed graph cannot loop forever: every directed edge is
            // consumed at most once.
            if visited.contains(&edge) {
                break;
            }
        }

        let boundary = strip_spurs(face);
        if boundary.len() < 3 {
            continue;
        }
        let polygon: Vec<Point2<f64>> =
            boundary.iter().map(|id| corners[*id]).collect();
        if signed_area(&polygon) > MIN_FACE_AREA {
            cycles.push(boundary.into_iter().map(str::to_string).collect());
        }
    }

    cycles
}

/// Removes spur traversals (`..., x, v, x, ...`) from a face walk.
fn strip_spurs(mut face: Vec<&str>) -> Vec<&str> {
    loop {
        let n = face.len();
        if n < 3 {
            return face;
        }
        let mut removed = false;
        for i in 0..n {
            let prev = face[(i + n - 1) % n];
            let next = face[(i + 1) % n];
            if prev == next {
                // Drop the spur tip and one duplicated anchor.
                let anchor = (i + 1) % n;
                if anchor > i {
                    face.remove(anchor);
                    face.remove(i);
                } else {
                    face.remove(i);
                    face.remove(anchor);
                }
                removed = true;
                break;
            }
        }
        if !removed {
            return face;
        }
    }
}

fn signed_area(polygon: &[Point2<f64>]) -> f64 {
    let mut sum = 0.0;
    for i in 0..polygon.len() {
        let j = (i + 1) % polygon.len();
        sum += polygon[i].x * polygon[j].y - polygon[j].x * polygon[i].y;
    }
    sum / 2.0
}
