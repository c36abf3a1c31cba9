// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon area, centroid, and containment.

use nalgebra::Point2;

use crate::segment::closest_point_on_segment;

/// Computes the area of a polygon with the shoelace formula.
///
/// The result is always non-negative regardless of winding order. Fewer than
/// 3 vertices is degenerate input and yields `0.0`.
pub fn polygon_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum.abs() / 2.0
}

/// Computes the area-weighted centroid of a polygon.
///
/// Falls back to the plain vertex average when the polygon is degenerate
/// (near-zero area), so callers always get a finite point for label placement
/// and camera framing.
pub fn polygon_centroid(points: &[Point2<f64>]) -> Point2<f64> {
    if points.is_empty() {
        return Point2::origin();
    }

    let mut signed = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        let cross = points[i].x * points[j].y - points[j].x * points[i].y;
        signed += cross;
        cx += (points[i].x + points[j].x) * cross;
        cy += (points[i].y + points[j].y) * cross;
    }

    if signed.abs() < 1e-12 {
        let n = points.len() as f64;
        let sx: f64 = points.iter().map(|p| p.x).sum();
        let sy: f64 = points.iter().map(|p| p.y).sum();
        return Point2::new(sx / n, sy / n);
    }

    let factor = 1.0 / (3.0 * signed);
    Point2::new(cx * factor, cy * factor)
}

/// Ray-casting parity test for point-in-polygon.
///
/// Works for concave polygons and is independent of winding order. Points
/// exactly on the boundary are implementation-defined (not guaranteed
/// inside). Fewer than 3 vertices yields `false`.
pub fn point_in_polygon(point: Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        let crosses = ((yi > point.y) != (yj > point.y))
            && (point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi);
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Finds the point on a polygon's boundary closest to `p`.
///
/// Used by floor-item collision resolution to pull an overlapping item to
/// the nearest edge of the footprint it collides with. The loop is treated
/// as closed. Fewer than 2 vertices yields the first vertex, if any.
pub fn closest_point_on_polygon(p: Point2<f64>, polygon: &[Point2<f64>]) -> Option<Point2<f64>> {
    match polygon {
        [] => None,
        [only] => Some(*only),
        _ => {
            let mut best: Option<(f64, Point2<f64>)> = None;
            for i in 0..polygon.len() {
                let j = (i + 1) % polygon.len();
                let q = closest_point_on_segment(p, polygon[i], polygon[j]);
                let d = (p - q).norm_squared();
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, q));
                }
            }
            best.map(|(_, q)| q)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn unit_square_area() {
        assert_relative_eq!(polygon_area(&unit_square()), 1.0);
    }

    #[test]
    fn six_by_four_room_area() {
        let poly = vec![
            Point2::new(0.0, 0.0),
            Point2::new(6.0, 0.0),
            Point2::new(6.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        assert_relative_eq!(polygon_area(&poly), 24.0);
    }

    #[test]
    fn area_independent_of_winding() {
        let mut poly = unit_square();
        poly.reverse();
        assert_relative_eq!(polygon_area(&poly), 1.0);
    }

    #[test]
    fn degenerate_area_is_zero() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(
            polygon_area(&[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]),
            0.0
        );
    }

    #[test]
    fn centroid_of_square() {
        let c = polygon_centroid(&unit_square());
        assert_relative_eq!(c.x, 0.5);
        assert_relative_eq!(c.y, 0.5);
    }

    #[test]
    fn point_in_polygon_basic() {
        let poly = unit_square();
        assert!(point_in_polygon(Point2::new(0.5, 0.5), &poly));
        assert!(!point_in_polygon(Point2::new(1.5, 0.5), &poly));
        assert!(!point_in_polygon(Point2::new(-0.1, 0.5), &poly));
    }

    #[test]
    fn point_in_polygon_invariant_under_rotation_and_reversal() {
        let poly = unit_square();
        let inside = Point2::new(0.25, 0.75);
        let outside = Point2::new(2.0, 2.0);

        for shift in 0..poly.len() {
            let mut rotated: Vec<_> = poly.iter().cloned().collect();
            rotated.rotate_left(shift);
            assert!(point_in_polygon(inside, &rotated));
            assert!(!point_in_polygon(outside, &rotated));

            rotated.reverse();
            assert!(point_in_polygon(inside, &rotated));
            assert!(!point_in_polygon(outside, &rotated));
        }
    }

    #[test]
    fn point_in_concave_polygon() {
        // L-shape; the notch at (1.5, 1.5) is outside.
        let poly = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert!(point_in_polygon(Point2::new(0.5, 1.5), &poly));
        assert!(!point_in_polygon(Point2::new(1.5, 1.5), &poly));
    }

    #[test]
    fn closest_point_on_square_boundary() {
        let square = unit_square();

        // From outside, the nearest boundary point is on the right edge.
        let q = closest_point_on_polygon(Point2::new(3.0, 0.5), &square).unwrap();
        assert_relative_eq!(q.x, 1.0);
        assert_relative_eq!(q.y, 0.5);

        // From inside, still the nearest edge.
        let q = closest_point_on_polygon(Point2::new(0.9, 0.5), &square).unwrap();
        assert_relative_eq!(q.x, 1.0);
        assert_relative_eq!(q.y, 0.5);
    }
}
