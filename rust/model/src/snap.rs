// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapping: turning a raw pointer/ray intersection into a valid,
//! constrained item position and rotation.
//!
//! Each item type has a strategy selected by its type tag. All strategies
//! share the same contract: they never mutate anything, they only compute a
//! [`Snap`] the model then applies. Positions are world centimeters; room
//! containment tests scale into floorplan meters first.

use nalgebra::{Point2, Point3, Vector2, Vector3};
use slotmap::SlotMap;

use maru_geometry::{
    angle_between, closest_point_on_polygon, closest_point_on_segment, point_in_polygon,
    polygon_intersect,
};

use crate::config::Config;
use crate::floorplan::{Floorplan, Side, WallKey};
use crate::item::{Item, ItemKey, ItemKind, ItemType};

/// Plan-space up vector; wall yaw is measured against it.
fn up_vector() -> Vector2<f64> {
    Vector2::new(0.0, 1.0)
}

/// The surface a pointer ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Wall { wall: WallKey, side: Side },
    Floor,
    Roof,
}

/// A raw intersection produced by the drag controller.
#[derive(Debug, Clone, Copy)]
pub struct SnapCandidate {
    /// Intersection point in world centimeters.
    pub point: Point3<f64>,
    /// Surface normal at the intersection.
    pub normal: Vector3<f64>,
    pub surface: Surface,
}

/// The constrained placement computed by a snapping strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Snap {
    pub position: Point3<f64>,
    pub rotation: Vector3<f64>,
    /// `Some` when the strategy also aligns the item's own yaw (wall snap).
    pub inner_rotation: Option<Vector3<f64>>,
    pub attached: Option<(WallKey, Side)>,
}

impl Snap {
    /// A snap that leaves the item exactly where it is.
    fn unchanged(item: &Item) -> Self {
        Self {
            position: item.position,
            rotation: item.rotation,
            inner_rotation: None,
            attached: item.kind.attached_wall(),
        }
    }
}

/// Computes the snap for one item against a candidate intersection.
///
/// `items` is the full item arena; the strategy skips the item itself when
/// resolving collisions.
pub fn snap_to_point(
    key: ItemKey,
    candidate: &SnapCandidate,
    floorplan: &Floorplan,
    items: &SlotMap<ItemKey, Item>,
    config: &Config,
) -> Snap {
    let item = &items[key];
    match item.ty {
        ItemType::Floor | ItemType::WallFloor => {
            floor_snap(item, key, candidate, floorplan, items, config)
        }
        ItemType::InFloor => in_floor_snap(item, candidate),
        ItemType::Wall | ItemType::InWall | ItemType::InWallFloor => {
            wall_snap(item, key, candidate, floorplan, items, config)
        }
        ItemType::Prop => prop_snap(item, key, candidate, floorplan, items, config),
        ItemType::Roof => roof_snap(item, candidate, floorplan, config),
        ItemType::Generic => Snap {
            position: candidate.point,
            rotation: item.rotation,
            inner_rotation: None,
            attached: None,
        },
    }
}

/// Floor items: candidate must lie inside a room (wall-floor variants are
/// always valid at wall contact). With 3D snap enabled, footprint overlap
/// against other floor-class items pulls the position to the nearest edge of
/// the colliding footprint instead of rejecting the move.
fn floor_snap(
    item: &Item,
    key: ItemKey,
    candidate: &SnapCandidate,
    floorplan: &Floorplan,
    items: &SlotMap<ItemKey, Item>,
    config: &Config,
) -> Snap {
    let at_wall = matches!(candidate.surface, Surface::Wall { .. });
    let wall_contact_ok = item.ty == ItemType::WallFloor && at_wall;

    if !wall_contact_ok && !point_in_any_room(candidate.point, floorplan, config) {
        return Snap::unchanged(item);
    }

    let mut position = candidate.point;
    position.y = item.half_height();

    if config.snap_3d_enabled {
        position = resolve_footprint_collision(item, key, position, items, |other| {
            other.ty.is_floor_class()
        });
    }

    Snap {
        position,
        rotation: item.rotation,
        inner_rotation: None,
        attached: None,
    }
}

/// In-floor items sit exactly on the floor plane; yaw follows the surface
/// normal's plan projection.
fn in_floor_snap(item: &Item, candidate: &SnapCandidate) -> Snap {
    let normal2 = Vector2::new(candidate.normal.x, candidate.normal.z);
    let yaw = if normal2.norm() < 1e-9 {
        0.0
    } else {
        angle_between(up_vector(), normal2.normalize())
    };

    let mut position = candidate.point;
    position.y = item.half_height();

    Snap {
        position,
        rotation: Vector3::new(0.0, yaw, 0.0),
        inner_rotation: None,
        attached: None,
    }
}

/// Wall items project onto the wall face plane, clamp to the wall segment's
/// bounds, offset inward by the configured wall offset scaled by the item's
/// largest scale axis, and derive yaw from the wall normal.
fn wall_snap(
    item: &Item,
    key: ItemKey,
    candidate: &SnapCandidate,
    floorplan: &Floorplan,
    items: &SlotMap<ItemKey, Item>,
    config: &Config,
) -> Snap {
    let Surface::Wall { wall, side } = candidate.surface else {
        // Wall items only react to wall-plane intersections.
        return Snap::unchanged(item);
    };
    let Some(edge) = floorplan.wall_edge(wall, side) else {
        return Snap::unchanged(item);
    };

    let s = config.plan_to_world;
    let face_start = Point2::new(edge.start.x * s, edge.start.y * s);
    let face_end = Point2::new(edge.end.x * s, edge.end.y * s);
    let normal = edge.normal;

    // Clamp along the wall so the item stays inside the segment bounds.
    let candidate2 = Point2::new(candidate.point.x, candidate.point.z);
    let mut on_face = closest_point_on_segment(candidate2, face_start, face_end);
    let len = (face_end - face_start).norm();
    let half_w = item.half_size().x;
    if len > 1e-9 {
        let dir = (face_end - face_start) / len;
        let t = (on_face - face_start).dot(&dir);
        let t = if half_w * 2.0 >= len {
            len / 2.0
        } else {
            t.clamp(half_w, len - half_w)
        };
        on_face = face_start + dir * t;
    }

    let wall_offset = match &item.kind {
        ItemKind::Wall { wall_offset, .. } => *wall_offset,
        _ => 0.0,
    };
    let offset = wall_offset * item.max_scale();
    let snapped2 = on_face - normal * offset;

    let yaw = angle_between(up_vector(), normal);

    let half_h = item.half_height();
    let max_y = edge.max_elevation() * s - half_h;
    let y = candidate.point.y.clamp(half_h, max_y.max(half_h));

    let mut position = Point3::new(snapped2.x, y, snapped2.y);

    // Collision resolution only against items on the same wall.
    position = resolve_footprint_collision(item, key, position, items, |other| {
        matches!(
            other.kind.attached_wall(),
            Some((other_wall, _)) if other_wall == wall
        )
    });

    let rotation = Vector3::new(0.0, yaw, 0.0);
    Snap {
        position,
        rotation,
        inner_rotation: Some(rotation),
        attached: Some((wall, side)),
    }
}

/// Prop items stack on top of a supporting floor item when one is under the
/// candidate point; otherwise they behave like floor items.
fn prop_snap(
    item: &Item,
    key: ItemKey,
    candidate: &SnapCandidate,
    floorplan: &Floorplan,
    items: &SlotMap<ItemKey, Item>,
    config: &Config,
) -> Snap {
    let support = items.iter().find(|(other_key, other)| {
        if *other_key == key || !other.ty.is_floor_class() {
            return false;
        }
        let half = other.half_size();
        (candidate.point.x - other.position.x).abs() <= half.x
            && (candidate.point.z - other.position.z).abs() <= half.z
    });

    if let Some((_, support)) = support {
        let mut position = candidate.point;
        position.y = support.top() + item.half_height();
        return Snap {
            position,
            rotation: item.rotation,
            inner_rotation: None,
            attached: None,
        };
    }

    floor_snap(item, key, candidate, floorplan, items, config)
}

/// Roof items hang from the roof plane at the plan's wall elevation.
fn roof_snap(
    item: &Item,
    candidate: &SnapCandidate,
    floorplan: &Floorplan,
    config: &Config,
) -> Snap {
    let elevation = floorplan
        .walls()
        .map(|(_, w)| w.max_elevation())
        .fold(f64::NAN, f64::max);
    let elevation = if elevation.is_nan() {
        config.default_elevation
    } else {
        elevation
    };

    let mut position = candidate.point;
    position.y = elevation * config.plan_to_world - item.half_height();

    Snap {
        position,
        rotation: item.rotation,
        inner_rotation: None,
        attached: None,
    }
}

/// Tests an item world position (centimeters) against the room polygons
/// (meters). The unit scale is the single place the cm→m conversion happens.
pub fn point_in_any_room(point: Point3<f64>, floorplan: &Floorplan, config: &Config) -> bool {
    let scale = config.item_unit_scale();
    let plan_point = Point2::new(point.x * scale, point.z * scale);
    floorplan
        .rooms()
        .iter()
        .any(|room| point_in_polygon(plan_point, &room.polygon))
}

/// Checks the item's footprint at `position` against the footprints of other
/// items selected by `class_filter`. On overlap, the position is pulled to
/// the nearest edge of the colliding footprint: the item center moves to the
/// closest boundary point plus the footprint's support radius along the exit
/// direction, so the two footprints end up edge to edge.
fn resolve_footprint_collision<F>(
    item: &Item,
    key: ItemKey,
    position: Point3<f64>,
    items: &SlotMap<ItemKey, Item>,
    class_filter: F,
) -> Point3<f64>
where
    F: Fn(&Item) -> bool,
{
    let positioned = Item {
        position,
        ..item.clone()
    };
    let mine = positioned.footprint();
    let center = Point2::new(position.x, position.z);

    for (other_key, other) in items {
        if other_key == key || !class_filter(other) {
            continue;
        }
        let theirs = other.footprint();
        if !polygon_intersect(&mine, &theirs) {
            continue;
        }
        let Some(q) = closest_point_on_polygon(center, &theirs) else {
            continue;
        };

        let other_center = Point2::new(other.position.x, other.position.z);
        let inside = point_in_polygon(center, &theirs);
        let raw_dir = if inside { q - center } else { center - q };
        let dir = if raw_dir.norm() > 1e-9 {
            raw_dir.normalize()
        } else if (center - other_center).norm() > 1e-9 {
            (center - other_center).normalize()
        } else {
            Vector2::x()
        };

        // Support radius of the rotated rectangular footprint along `dir`.
        let half = item.half_size();
        let (sin, cos) = item.yaw().sin_cos();
        let axis_x = Vector2::new(cos, sin);
        let axis_z = Vector2::new(-sin, cos);
        let radius = half.x * dir.dot(&axis_x).abs() + half.z * dir.dot(&axis_z).abs();

        let pulled = q + dir * radius;
        return Point3::new(pulled.x, position.y, pulled.y);
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::floorplan::Floorplan;
    use approx::assert_relative_eq;

    fn room_plan() -> Floorplan {
        let mut fp = Floorplan::new(Config::default());
        let a = fp.add_corner(0.0, 0.0);
        let b = fp.add_corner(6.0, 0.0);
        let c = fp.add_corner(6.0, 4.0);
        let d = fp.add_corner(0.0, 4.0);
        fp.add_wall(&a, &b).unwrap();
        fp.add_wall(&b, &c).unwrap();
        fp.add_wall(&c, &d).unwrap();
        fp.add_wall(&d, &a).unwrap();
        fp
    }

    fn item(ty: ItemType, x: f64, z: f64) -> Item {
        Item {
            name: "sofa.glb".to_string(),
            ty,
            kind: ItemKind::for_type(ty, 0.0),
            position: Point3::new(x, 0.0, z),
            rotation: Vector3::zeros(),
            inner_rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            size: Vector3::new(100.0, 80.0, 100.0),
            fixed: false,
            resizable: true,
            is_parametric: false,
            model_url: Some("/models/sofa.glb".to_string()),
            mesh: Vec::new(),
            textures: Vec::new(),
        }
    }

    fn floor_candidate(x: f64, z: f64) -> SnapCandidate {
        SnapCandidate {
            point: Point3::new(x, 0.0, z),
            normal: Vector3::y(),
            surface: Surface::Floor,
        }
    }

    #[test]
    fn item_in_centimeters_lands_in_meter_room() {
        // [300, 0, 200] cm must land at (3, 2) m inside the 6x4 m room.
        let fp = room_plan();
        let config = Config::default();
        assert!(point_in_any_room(
            Point3::new(300.0, 0.0, 200.0),
            &fp,
            &config
        ));
        assert!(!point_in_any_room(
            Point3::new(900.0, 0.0, 200.0),
            &fp,
            &config
        ));
    }

    #[test]
    fn floor_snap_inside_room_sits_on_floor() {
        let fp = room_plan();
        let config = Config::default();
        let mut items = SlotMap::with_key();
        let key = items.insert(item(ItemType::Floor, 0.0, 0.0));

        let snap = snap_to_point(key, &floor_candidate(300.0, 200.0), &fp, &items, &config);
        assert_relative_eq!(snap.position.x, 300.0);
        assert_relative_eq!(snap.position.z, 200.0);
        assert_relative_eq!(snap.position.y, 40.0); // half height
    }

    #[test]
    fn floor_snap_outside_room_stays_put() {
        let fp = room_plan();
        let config = Config::default();
        let mut items = SlotMap::with_key();
        let key = items.insert(item(ItemType::Floor, 100.0, 100.0));

        let snap = snap_to_point(key, &floor_candidate(900.0, 200.0), &fp, &items, &config);
        assert_relative_eq!(snap.position.x, 100.0);
        assert_relative_eq!(snap.position.z, 100.0);
    }

    #[test]
    fn overlapping_floor_items_pull_apart() {
        let fp = room_plan();
        let config = Config::default();
        let mut items = SlotMap::with_key();
        let blocker = item(ItemType::Floor, 300.0, 200.0);
        items.insert(blocker);
        let key = items.insert(item(ItemType::Floor, 100.0, 100.0));

        // Candidate overlaps the blocker footprint (300±50, 200±50).
        let snap = snap_to_point(key, &floor_candidate(320.0, 200.0), &fp, &items, &config);
        // The position was adjusted away from the raw candidate.
        let moved = (snap.position.x - 320.0).abs() > 1e-9
            || (snap.position.z - 200.0).abs() > 1e-9;
        assert!(moved);
    }

    #[test]
    fn in_floor_item_sits_flush() {
        let fp = room_plan();
        let config = Config::default();
        let mut items = SlotMap::with_key();
        let key = items.insert(item(ItemType::InFloor, 0.0, 0.0));

        let snap = snap_to_point(key, &floor_candidate(100.0, 100.0), &fp, &items, &config);
        assert_relative_eq!(snap.position.y, 40.0);
        assert_relative_eq!(snap.rotation.y, 0.0);
    }

    #[test]
    fn wall_snap_projects_and_rotates() {
        let fp = room_plan();
        let config = Config::default();
        let mut items = SlotMap::with_key();
        let mut wall_item = item(ItemType::InWall, 0.0, 0.0);
        wall_item.size = Vector3::new(80.0, 100.0, 10.0);
        let key = items.insert(wall_item);

        // Find the wall along the x axis (corners (0,0)-(6,0)) and its face
        // toward the room interior (+y in plan).
        let edge = fp
            .wall_edges()
            .into_iter()
            .find(|e| e.normal.y > 0.5 && e.start.y.abs() < 0.2)
            .unwrap();

        let candidate = SnapCandidate {
            point: Point3::new(300.0, 120.0, 0.0),
            normal: Vector3::new(edge.normal.x, 0.0, edge.normal.y),
            surface: Surface::Wall {
                wall: edge.wall,
                side: edge.side,
            },
        };
        let snap = snap_to_point(key, &candidate, &fp, &items, &config);

        // Projected onto the face plane: plan y = half thickness = 0.05 m.
        assert_relative_eq!(snap.position.z, 5.0, epsilon = 1e-6);
        assert_relative_eq!(snap.position.x, 300.0, epsilon = 1e-6);
        assert_relative_eq!(snap.position.y, 120.0);
        // Face normal is plan +y, which is the up vector: yaw 0.
        assert_relative_eq!(snap.rotation.y, 0.0, epsilon = 1e-9);
        assert_eq!(snap.attached, Some((edge.wall, edge.side)));
        assert_eq!(snap.inner_rotation, Some(snap.rotation));
    }

    #[test]
    fn wall_snap_clamps_to_segment_bounds() {
        let fp = room_plan();
        let config = Config::default();
        let mut items = SlotMap::with_key();
        let mut wall_item = item(ItemType::InWall, 0.0, 0.0);
        wall_item.size = Vector3::new(80.0, 100.0, 10.0);
        let key = items.insert(wall_item);

        let edge = fp
            .wall_edges()
            .into_iter()
            .find(|e| e.normal.y > 0.5 && e.start.y.abs() < 0.2)
            .unwrap();

        // Candidate far beyond the wall's end.
        let candidate = SnapCandidate {
            point: Point3::new(2000.0, 120.0, 0.0),
            normal: Vector3::new(edge.normal.x, 0.0, edge.normal.y),
            surface: Surface::Wall {
                wall: edge.wall,
                side: edge.side,
            },
        };
        let snap = snap_to_point(key, &candidate, &fp, &items, &config);
        // Clamped to wall length (600cm) minus the item half width (40cm).
        assert!(snap.position.x <= 560.0 + 1e-6);
    }

    #[test]
    fn prop_stacks_on_floor_item() {
        let fp = room_plan();
        let config = Config::default();
        let mut items = SlotMap::with_key();
        items.insert(item(ItemType::Floor, 300.0, 200.0));

        let mut prop = item(ItemType::Prop, 0.0, 0.0);
        prop.size = Vector3::new(20.0, 20.0, 20.0);
        let key = items.insert(prop);

        let snap = snap_to_point(key, &floor_candidate(310.0, 210.0), &fp, &items, &config);
        // Support top (40) + prop half height (10).
        assert_relative_eq!(snap.position.y, 50.0);
    }

    #[test]
    fn prop_without_support_falls_back_to_floor() {
        let fp = room_plan();
        let config = Config::default();
        let mut items = SlotMap::with_key();
        let mut prop = item(ItemType::Prop, 0.0, 0.0);
        prop.size = Vector3::new(20.0, 20.0, 20.0);
        let key = items.insert(prop);

        let snap = snap_to_point(key, &floor_candidate(300.0, 200.0), &fp, &items, &config);
        assert_relative_eq!(snap.position.y, 10.0);
    }
}
