// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon overlap and containment via 2D boolean operations.
//!
//! Item collision checks need a robust "do these footprints overlap with
//! positive area" answer, including the partial-overlap and
//! fully-contained cases. Both are answered with a boolean intersection
//! through the i_overlay crate rather than hand-rolled edge tests.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

use crate::polygon::{point_in_polygon, polygon_area};

/// Minimum area for an intersection to count as a real overlap.
const MIN_OVERLAP_AREA: f64 = 1e-9;

fn to_path(polygon: &[Point2<f64>]) -> Vec<[f64; 2]> {
    polygon.iter().map(|p| [p.x, p.y]).collect()
}

/// Returns `true` if the two closed loops overlap with positive area.
///
/// Shared edges or touching vertices alone do not count as an intersection.
/// Degenerate inputs (fewer than 3 vertices) yield `false`.
pub fn polygon_intersect(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }

    let subject = vec![to_path(a)];
    let clip = vec![to_path(b)];
    let shapes = subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd);

    shapes.iter().any(|shape| {
        shape.iter().any(|contour| {
            let pts: Vec<Point2<f64>> =
                contour.iter().map(|c| Point2::new(c[0], c[1])).collect();
            polygon_area(&pts) > MIN_OVERLAP_AREA
        })
    })
}

/// Returns `true` if `inner` lies entirely within `outer`.
///
/// Every vertex of `inner` must be inside `outer` and the intersection of
/// the two loops must have the full area of `inner` (no boundary crossing).
pub fn polygon_contains(outer: &[Point2<f64>], inner: &[Point2<f64>]) -> bool {
    if outer.len() < 3 || inner.len() < 3 {
        return false;
    }

    if !inner.iter().all(|&p| point_in_polygon(p, outer)) {
        return false;
    }

    let subject = vec![to_path(outer)];
    let clip = vec![to_path(inner)];
    let shapes = subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd);

    let intersection_area: f64 = shapes
        .iter()
        .flat_map(|shape| shape.iter())
        .map(|contour| {
            let pts: Vec<Point2<f64>> =
                contour.iter().map(|c| Point2::new(c[0], c[1])).collect();
            polygon_area(&pts)
        })
        .sum();

    (intersection_area - polygon_area(inner)).abs() < 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, side: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x, y),
            Point2::new(x + side, y),
            Point2::new(x + side, y + side),
            Point2::new(x, y + side),
        ]
    }

    #[test]
    fn overlapping_squares_intersect() {
        assert!(polygon_intersect(&square(0.0, 0.0, 2.0), &square(1.0, 1.0, 2.0)));
    }

    #[test]
    fn disjoint_squares_do_not_intersect() {
        assert!(!polygon_intersect(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0)));
    }

    #[test]
    fn contained_square_intersects() {
        assert!(polygon_intersect(&square(0.0, 0.0, 4.0), &square(1.0, 1.0, 1.0)));
    }

    #[test]
    fn degenerate_input_never_intersects() {
        let segment = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(!polygon_intersect(&segment, &square(0.0, 0.0, 1.0)));
    }

    #[test]
    fn containment() {
        assert!(polygon_contains(&square(0.0, 0.0, 4.0), &square(1.0, 1.0, 1.0)));
        assert!(!polygon_contains(&square(0.0, 0.0, 4.0), &square(3.0, 3.0, 2.0)));
        assert!(!polygon_contains(&square(1.0, 1.0, 1.0), &square(0.0, 0.0, 4.0)));
    }
}
