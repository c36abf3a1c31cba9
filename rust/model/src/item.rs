// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placed items: furnishings and fixtures.
//!
//! The source material modeled items as a deep prototype chain
//! (Item → FloorItem → InFloorItem/PropItem, Item → WallItem → InWallItem).
//! Here an item is flat data: common fields shared by every type, a closed
//! [`ItemType`] tag matching the wire discriminants, and a small per-kind
//! payload. Behavior differences live in the snapping strategies dispatched
//! by tag, not in a type hierarchy.
//!
//! Item world coordinates are centimeters with y up; the floorplan is meters
//! in the xz-plane, so containment tests scale by the configured unit scale.

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::floorplan::{Side, WallKey};

new_key_type! {
    /// Key for an item in the model's item arena.
    pub struct ItemKey;
}

/// Closed set of item types with their wire discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Generic = 0,
    Floor = 1,
    Wall = 2,
    InWall = 3,
    Roof = 4,
    InWallFloor = 7,
    InFloor = 8,
    WallFloor = 9,
    Prop = 10,
}

impl ItemType {
    /// Resolves a wire discriminant. Unknown tags fail boundary validation.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ItemType::Generic),
            1 => Some(ItemType::Floor),
            2 => Some(ItemType::Wall),
            3 => Some(ItemType::InWall),
            4 => Some(ItemType::Roof),
            7 => Some(ItemType::InWallFloor),
            8 => Some(ItemType::InFloor),
            9 => Some(ItemType::WallFloor),
            10 => Some(ItemType::Prop),
            _ => None,
        }
    }

    pub fn tag(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Generic => "Generic",
            ItemType::Floor => "Floor",
            ItemType::Wall => "Wall",
            ItemType::InWall => "InWall",
            ItemType::Roof => "Roof",
            ItemType::InWallFloor => "InWallFloor",
            ItemType::InFloor => "InFloor",
            ItemType::WallFloor => "WallFloor",
            ItemType::Prop => "Prop",
        }
    }

    /// Types that snap against wall faces.
    pub fn is_wall_class(&self) -> bool {
        matches!(
            self,
            ItemType::Wall | ItemType::InWall | ItemType::InWallFloor | ItemType::WallFloor
        )
    }

    /// Types whose footprints participate in floor collision checks.
    pub fn is_floor_class(&self) -> bool {
        matches!(self, ItemType::Floor | ItemType::WallFloor | ItemType::Prop)
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind payload. Only wall-class items carry extra state.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Generic,
    Floor,
    InFloor,
    Roof,
    Prop,
    Wall {
        /// Inward offset from the wall face, in centimeters, scaled by the
        /// item's largest scale axis at snap time.
        wall_offset: f64,
        /// The wall face the item is currently attached to, if any.
        attached: Option<(WallKey, Side)>,
    },
}

impl ItemKind {
    pub fn for_type(ty: ItemType, wall_offset: f64) -> Self {
        match ty {
            ItemType::Generic => ItemKind::Generic,
            ItemType::Floor => ItemKind::Floor,
            ItemType::InFloor => ItemKind::InFloor,
            ItemType::Roof => ItemKind::Roof,
            ItemType::Prop => ItemKind::Prop,
            ItemType::Wall | ItemType::InWall | ItemType::InWallFloor | ItemType::WallFloor => {
                ItemKind::Wall {
                    wall_offset,
                    attached: None,
                }
            }
        }
    }

    pub fn attached_wall(&self) -> Option<(WallKey, Side)> {
        match self {
            ItemKind::Wall { attached, .. } => *attached,
            _ => None,
        }
    }
}

/// A texture override applied to one mesh of an item's model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextureOverride {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub texture: String,
}

/// A placed item.
#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    pub ty: ItemType,
    pub kind: ItemKind,
    /// World position in centimeters, y up.
    pub position: Point3<f64>,
    /// Rotation in radians; yaw in `.y` is set by wall snapping.
    pub rotation: Vector3<f64>,
    /// The item's own yaw, independent of wall-snap rotation.
    pub inner_rotation: Vector3<f64>,
    pub scale: Vector3<f64>,
    /// Unscaled dimensions in centimeters.
    pub size: Vector3<f64>,
    pub fixed: bool,
    pub resizable: bool,
    pub is_parametric: bool,
    pub model_url: Option<String>,
    pub mesh: Vec<String>,
    pub textures: Vec<TextureOverride>,
}

impl Item {
    /// Scaled half extents in centimeters.
    pub fn half_size(&self) -> Vector3<f64> {
        Vector3::new(
            self.size.x * self.scale.x / 2.0,
            self.size.y * self.scale.y / 2.0,
            self.size.z * self.scale.z / 2.0,
        )
    }

    pub fn half_height(&self) -> f64 {
        self.half_size().y
    }

    /// Largest scale axis; wall offsets scale with it.
    pub fn max_scale(&self) -> f64 {
        self.scale.x.max(self.scale.y).max(self.scale.z)
    }

    /// Total yaw: snap rotation plus the item's own rotation.
    pub fn yaw(&self) -> f64 {
        self.rotation.y + self.inner_rotation.y
    }

    /// Footprint polygon in the world xz-plane (centimeters): the scaled
    /// size rectangle rotated by the item's yaw around its position.
    pub fn footprint(&self) -> Vec<Point2<f64>> {
        let half = self.half_size();
        let (sin, cos) = self.yaw().sin_cos();
        let center = Point2::new(self.position.x, self.position.z);

        [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .iter()
            .map(|(sx, sz)| {
                let (dx, dz) = (half.x * sx, half.z * sz);
                Point2::new(
                    center.x + dx * cos - dz * sin,
                    center.y + dx * sin + dz * cos,
                )
            })
            .collect()
    }

    /// Top face height in centimeters (for prop stacking).
    pub fn top(&self) -> f64 {
        self.position.y + self.half_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn basic_item(ty: ItemType) -> Item {
        Item {
            name: "desk.glb".to_string(),
            ty,
            kind: ItemKind::for_type(ty, 0.0),
            position: Point3::new(100.0, 40.0, 200.0),
            rotation: Vector3::zeros(),
            inner_rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            size: Vector3::new(120.0, 80.0, 60.0),
            fixed: false,
            resizable: true,
            is_parametric: false,
            model_url: Some("/models/desk.glb".to_string()),
            mesh: Vec::new(),
            textures: Vec::new(),
        }
    }

    #[test]
    fn tags_round_trip() {
        for tag in [0u8, 1, 2, 3, 4, 7, 8, 9, 10] {
            let ty = ItemType::from_tag(tag).unwrap();
            assert_eq!(ty.tag(), tag);
        }
        assert!(ItemType::from_tag(5).is_none());
        assert!(ItemType::from_tag(6).is_none());
        assert!(ItemType::from_tag(11).is_none());
    }

    #[test]
    fn wall_class_gets_wall_payload() {
        let item = basic_item(ItemType::InWall);
        assert!(matches!(item.kind, ItemKind::Wall { .. }));
        assert!(item.ty.is_wall_class());
        assert!(!item.ty.is_floor_class());
    }

    #[test]
    fn axis_aligned_footprint() {
        let item = basic_item(ItemType::Floor);
        let fp = item.footprint();
        assert_eq!(fp.len(), 4);
        let min_x = fp.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = fp.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(min_x, 40.0);
        assert_relative_eq!(max_x, 160.0);
    }

    #[test]
    fn rotated_footprint_swaps_extents() {
        let mut item = basic_item(ItemType::Floor);
        item.inner_rotation.y = std::f64::consts::FRAC_PI_2;
        let fp = item.footprint();
        let min_x = fp.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = fp.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        // 60cm depth now spans x.
        assert_relative_eq!(max_x - min_x, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn top_is_position_plus_half_height() {
        let item = basic_item(ItemType::Floor);
        assert_relative_eq!(item.top(), 80.0);
    }
}
