// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The model: single source of truth for the floorplan and its items.
//!
//! Both viewers and the analysis layer only read model state (or the
//! exported serialization); every mutation goes through the API here, which
//! validates synchronously, applies the change, and then queues the change
//! event. There is no partial mutation-then-fail: an error leaves the model
//! untouched and emits nothing.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::warn;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::ModelEvent;
use crate::floorplan::{Floorplan, FloorplanEvent};
use crate::item::{Item, ItemKey, ItemKind, ItemType, TextureOverride};
use crate::snap::{snap_to_point, Snap, SnapCandidate};

/// Wire-format item metadata, validated at the model boundary.
///
/// This is both the creation payload (manual placement and the AI action
/// boundary) and the serialized form of an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    pub item_name: String,
    pub item_type: u8,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub inner_rotation: [f64; 3],
    pub scale: [f64; 3],
    pub size: [f64; 3],
    #[serde(default)]
    pub fixed: bool,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(rename = "modelURL", default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(default)]
    pub is_parametric: bool,
    #[serde(default)]
    pub mesh: Vec<String>,
    #[serde(default)]
    pub textures: Vec<TextureOverride>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub wall_offset: f64,
}

fn default_true() -> bool {
    true
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

/// Owner of the floorplan and all placed items.
#[derive(Debug)]
pub struct Model {
    pub(crate) config: Config,
    pub(crate) floorplan: Floorplan,
    pub(crate) items: SlotMap<ItemKey, Item>,
    pub(crate) events: Vec<ModelEvent>,
}

impl Model {
    /// Creates a model with an empty floorplan.
    pub fn new(config: Config) -> Self {
        Self {
            floorplan: Floorplan::new(config.clone()),
            items: SlotMap::with_key(),
            events: Vec::new(),
            config,
        }
    }

    /// Creates a model holding the built-in default plan: one unnamed 4x4 m
    /// room. This is what a failed document load degrades to.
    pub fn with_default_plan(config: Config) -> Self {
        let mut model = Self::new(config);
        let fp = &mut model.floorplan;
        let a = fp.add_corner(0.0, 0.0);
        let b = fp.add_corner(4.0, 0.0);
        let c = fp.add_corner(4.0, 4.0);
        let d = fp.add_corner(0.0, 4.0);
        for (s, e) in [(&a, &b), (&b, &c), (&c, &d), (&d, &a)] {
            fp.add_wall(s, e).expect("default plan walls are valid");
        }
        fp.drain_events();
        model
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn floorplan(&self) -> &Floorplan {
        &self.floorplan
    }

    /// Mutable access to the floorplan. Topology events queued by the
    /// floorplan are folded into this model's queue on the next
    /// [`Model::drain_events`].
    pub fn floorplan_mut(&mut self) -> &mut Floorplan {
        &mut self.floorplan
    }

    // --- Items ---

    /// Creates an item from wire metadata.
    ///
    /// Unknown type tags and non-finite numbers fail validation. A missing
    /// model URL is not an error: the item exists and renders nothing, and a
    /// warning event is queued so hosts can surface it.
    pub fn add_item_by_metadata(&mut self, meta: ItemMetadata) -> Result<ItemKey> {
        let item = item_from_metadata(&meta)?;
        let missing_url = item.model_url.as_deref().map_or(true, str::is_empty);

        let key = self.items.insert(item);
        self.events.push(ModelEvent::ItemAdded(key));

        if missing_url {
            warn!(item = %meta.item_name, "item has no model URL; it will not render");
            self.events.push(ModelEvent::AssetWarning {
                item: key,
                reason: "missing model URL".to_string(),
            });
        }
        Ok(key)
    }

    /// Removes an item. Views dispose its derived state on the event.
    pub fn remove_item(&mut self, key: ItemKey) -> Result<Item> {
        let item = self.items.remove(key).ok_or(Error::ItemNotFound)?;
        self.events.push(ModelEvent::ItemRemoved(key));
        Ok(item)
    }

    pub fn item(&self, key: ItemKey) -> Option<&Item> {
        self.items.get(key)
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemKey, &Item)> {
        self.items.iter()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Moves an item to an absolute world position (centimeters).
    pub fn move_item(&mut self, key: ItemKey, position: Point3<f64>) -> Result<()> {
        let item = self.items.get_mut(key).ok_or(Error::ItemNotFound)?;
        item.position = position;
        self.events.push(ModelEvent::ItemUpdated(key));
        Ok(())
    }

    /// Sets the item's own yaw (independent of wall-snap rotation).
    pub fn rotate_item(&mut self, key: ItemKey, yaw: f64) -> Result<()> {
        let item = self.items.get_mut(key).ok_or(Error::ItemNotFound)?;
        item.inner_rotation = Vector3::new(0.0, yaw, 0.0);
        self.events.push(ModelEvent::ItemUpdated(key));
        Ok(())
    }

    /// Resizes an item. Only the metadata changes here; derived scale
    /// factors and visual state are recomputed by views from the event.
    pub fn resize_item(&mut self, key: ItemKey, size: Vector3<f64>) -> Result<()> {
        let item = self.items.get_mut(key).ok_or(Error::ItemNotFound)?;
        if !item.resizable {
            return Err(Error::Validation(format!(
                "item {} is not resizable",
                item.name
            )));
        }
        if !(size.x.is_finite() && size.y.is_finite() && size.z.is_finite())
            || size.x <= 0.0
            || size.y <= 0.0
            || size.z <= 0.0
        {
            return Err(Error::Validation("size must be positive".to_string()));
        }
        item.size = size;
        self.events.push(ModelEvent::ItemUpdated(key));
        Ok(())
    }

    /// Runs the item's snapping strategy against a pointer intersection and
    /// applies the result.
    pub fn snap_item(&mut self, key: ItemKey, candidate: &SnapCandidate) -> Result<Snap> {
        if !self.items.contains_key(key) {
            return Err(Error::ItemNotFound);
        }
        let snap = snap_to_point(key, candidate, &self.floorplan, &self.items, &self.config);

        let item = self.items.get_mut(key).expect("checked above");
        item.position = snap.position;
        item.rotation = snap.rotation;
        if let Some(inner) = snap.inner_rotation {
            item.inner_rotation = inner;
        }
        if let ItemKind::Wall { attached, .. } = &mut item.kind {
            *attached = snap.attached;
        }

        self.events.push(ModelEvent::ItemUpdated(key));
        Ok(snap)
    }

    // --- Events ---

    /// Drains all queued change notifications, floorplan topology events
    /// included, in emission order.
    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        let mut merged: Vec<ModelEvent> = self
            .floorplan
            .drain_events()
            .into_iter()
            .map(|e| match e {
                FloorplanEvent::WallsChanged => ModelEvent::WallsChanged,
                FloorplanEvent::RoomsChanged => ModelEvent::RoomsChanged,
            })
            .collect();
        merged.append(&mut self.events);
        merged
    }

    pub(crate) fn push_event(&mut self, event: ModelEvent) {
        self.events.push(event);
    }
}

/// Validates wire metadata into an item.
pub(crate) fn item_from_metadata(meta: &ItemMetadata) -> Result<Item> {
    let ty = ItemType::from_tag(meta.item_type).ok_or_else(|| {
        Error::Validation(format!(
            "unknown item type tag {} for {}",
            meta.item_type, meta.item_name
        ))
    })?;

    for values in [
        &meta.position,
        &meta.rotation,
        &meta.inner_rotation,
        &meta.scale,
        &meta.size,
    ] {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::Validation(format!(
                "non-finite number in metadata for {}",
                meta.item_name
            )));
        }
    }

    Ok(Item {
        name: meta.item_name.clone(),
        ty,
        kind: ItemKind::for_type(ty, meta.wall_offset),
        position: Point3::new(meta.position[0], meta.position[1], meta.position[2]),
        rotation: Vector3::new(meta.rotation[0], meta.rotation[1], meta.rotation[2]),
        inner_rotation: Vector3::new(
            meta.inner_rotation[0],
            meta.inner_rotation[1],
            meta.inner_rotation[2],
        ),
        scale: Vector3::new(meta.scale[0], meta.scale[1], meta.scale[2]),
        size: Vector3::new(meta.size[0], meta.size[1], meta.size[2]),
        fixed: meta.fixed,
        resizable: meta.resizable,
        is_parametric: meta.is_parametric,
        model_url: meta.model_url.clone(),
        mesh: meta.mesh.clone(),
        textures: meta.textures.clone(),
    })
}

/// Converts an item back to wire metadata (serialization path).
pub(crate) fn metadata_from_item(item: &Item) -> ItemMetadata {
    let wall_offset = match &item.kind {
        ItemKind::Wall { wall_offset, .. } => *wall_offset,
        _ => 0.0,
    };
    ItemMetadata {
        item_name: item.name.clone(),
        item_type: item.ty.tag(),
        position: [item.position.x, item.position.y, item.position.z],
        rotation: [item.rotation.x, item.rotation.y, item.rotation.z],
        inner_rotation: [
            item.inner_rotation.x,
            item.inner_rotation.y,
            item.inner_rotation.z,
        ],
        scale: [item.scale.x, item.scale.y, item.scale.z],
        size: [item.size.x, item.size.y, item.size.z],
        fixed: item.fixed,
        resizable: item.resizable,
        model_url: item.model_url.clone(),
        is_parametric: item.is_parametric,
        mesh: item.mesh.clone(),
        textures: item.textures.clone(),
        wall_offset,
    }
}
