// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera state for the 3D view.
//!
//! The camera is plain data plus ray math; rendering backends consume it,
//! they never own it. Switching projection mode reconstructs the camera but
//! preserves world position and target. Every reconstruction bumps a
//! generation counter so consumers holding a camera reference (the drag
//! controller) can detect staleness instead of silently using a dead
//! projection.

use nalgebra::{Point3, Vector3};

/// Projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Perspective,
    Orthographic,
}

/// A ray in world space (centimeters).
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Intersects the ray with a plane given by a point and normal.
    ///
    /// Returns the intersection point, or `None` when the ray is parallel to
    /// the plane or the hit lies behind the origin.
    pub fn intersect_plane(
        &self,
        plane_point: Point3<f64>,
        plane_normal: Vector3<f64>,
    ) -> Option<Point3<f64>> {
        let denom = plane_normal.dot(&self.direction);
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = (plane_point - self.origin).dot(&plane_normal) / denom;
        (t >= 0.0).then(|| self.origin + self.direction * t)
    }

    /// Slab test against an axis-aligned box. Returns the entry distance.
    pub fn intersect_aabb(&self, min: Point3<f64>, max: Point3<f64>) -> Option<f64> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let (o, d) = (self.origin[axis], self.direction[axis]);
            let (lo, hi) = (min[axis], max[axis]);
            if d.abs() < 1e-12 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (t1, t2) = ((lo - o) / d, (hi - o) / d);
            let (t1, t2) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        (t_max >= 0.0).then(|| t_min.max(0.0))
    }
}

/// Camera state shared by the scene view and the drag controller.
#[derive(Debug, Clone)]
pub struct Camera {
    pub mode: CameraMode,
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    /// Vertical field of view in radians (perspective mode).
    pub fov_y: f64,
    /// Vertical frustum extent in world units (orthographic mode).
    pub frustum_size: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    /// Bumped on every reconstruction; consumers compare before use.
    pub generation: u64,
}

impl Camera {
    /// The initial orthographic camera, matching the 3D viewer defaults.
    pub fn orthographic(frustum_size: f64) -> Self {
        Self {
            mode: CameraMode::Orthographic,
            position: Point3::new(0.0, 600.0, 1500.0),
            target: Point3::origin(),
            fov_y: 45f64.to_radians(),
            frustum_size,
            aspect: 5.0 / 4.0,
            near: 10.0,
            far: 100_000.0,
            generation: 0,
        }
    }

    /// Camera basis: forward, right, up.
    fn basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let forward = (self.target - self.position)
            .try_normalize(1e-12)
            .unwrap_or(-Vector3::z());
        let right = forward
            .cross(&Vector3::y())
            .try_normalize(1e-12)
            .unwrap_or(Vector3::x());
        let up = right.cross(&forward);
        (forward, right, up)
    }

    /// Casts a ray through normalized device coordinates (x, y in [-1, 1],
    /// y up).
    pub fn ray_through(&self, ndc_x: f64, ndc_y: f64) -> Ray {
        let (forward, right, up) = self.basis();

        match self.mode {
            CameraMode::Perspective => {
                let half_h = (self.fov_y / 2.0).tan();
                let direction = (forward
                    + right * (ndc_x * half_h * self.aspect)
                    + up * (ndc_y * half_h))
                    .normalize();
                Ray {
                    origin: self.position,
                    direction,
                }
            }
            CameraMode::Orthographic => {
                let half = self.frustum_size / 2.0;
                let origin = self.position
                    + right * (ndc_x * half * self.aspect)
                    + up * (ndc_y * half);
                Ray {
                    origin,
                    direction: forward,
                }
            }
        }
    }

    /// Rebuilds the camera in the other projection mode, preserving world
    /// position and target. The generation counter advances so stale
    /// references are detectable.
    pub fn switched_mode(&self) -> Self {
        let mode = match self.mode {
            CameraMode::Perspective => CameraMode::Orthographic,
            CameraMode::Orthographic => CameraMode::Perspective,
        };
        Self {
            mode,
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    /// Points the camera at a target from a position.
    pub fn look_at(&mut self, position: Point3<f64>, target: Point3<f64>) {
        self.position = position;
        self.target = target;
    }

    /// Adjusts the frustum to a viewport aspect ratio.
    pub fn set_aspect(&mut self, width: f64, height: f64) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_hits_floor_plane() {
        let mut camera = Camera::orthographic(1450.0);
        camera.look_at(Point3::new(0.0, 1000.0, 0.0), Point3::origin());

        let ray = camera.ray_through(0.0, 0.0);
        let hit = ray
            .intersect_plane(Point3::origin(), Vector3::y())
            .unwrap();
        assert_relative_eq!(hit.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(hit.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn parallel_ray_misses_plane() {
        let ray = Ray {
            origin: Point3::new(0.0, 10.0, 0.0),
            direction: Vector3::x(),
        };
        assert!(ray.intersect_plane(Point3::origin(), Vector3::y()).is_none());
    }

    #[test]
    fn plane_behind_origin_misses() {
        let ray = Ray {
            origin: Point3::new(0.0, 10.0, 0.0),
            direction: Vector3::y(),
        };
        assert!(ray.intersect_plane(Point3::origin(), Vector3::y()).is_none());
    }

    #[test]
    fn aabb_hit_and_miss() {
        let ray = Ray {
            origin: Point3::new(-10.0, 0.5, 0.5),
            direction: Vector3::x(),
        };
        let t = ray
            .intersect_aabb(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .unwrap();
        assert_relative_eq!(t, 10.0);

        let miss = Ray {
            origin: Point3::new(-10.0, 5.0, 0.5),
            direction: Vector3::x(),
        };
        assert!(miss
            .intersect_aabb(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .is_none());
    }

    #[test]
    fn mode_switch_preserves_pose_and_bumps_generation() {
        let camera = Camera::orthographic(1450.0);
        let switched = camera.switched_mode();
        assert_eq!(switched.mode, CameraMode::Perspective);
        assert_eq!(switched.position, camera.position);
        assert_eq!(switched.target, camera.target);
        assert_eq!(switched.generation, camera.generation + 1);

        let back = switched.switched_mode();
        assert_eq!(back.mode, CameraMode::Orthographic);
        assert_eq!(back.generation, camera.generation + 2);
    }
}
