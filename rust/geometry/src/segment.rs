// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment distance and projection helpers.

use nalgebra::{Point2, Vector2};

/// Returns the point on segment `[a, b]` closest to `p`.
///
/// The projection parameter is clamped to `[0, 1]`, so a point beyond either
/// endpoint maps to that endpoint rather than to the infinite line.
pub fn closest_point_on_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> Point2<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-18 {
        return a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `p` to segment `[a, b]`.
pub fn distance_point_to_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    (p - closest_point_on_segment(p, a, b)).norm()
}

/// Signed angle from `from` to `to`, in radians in `(-π, π]`.
///
/// Wall snapping derives an item's yaw from the angle between the plan
/// up-vector and the wall normal's 2D projection.
pub fn angle_between(from: Vector2<f64>, to: Vector2<f64>) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(&to);
    cross.atan2(dot)
}
