// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The serialized floorplan document.
//!
//! This is the persisted and exchanged wire format:
//!
//! ```json
//! { "floorplanner": { "version": 2, "units": "m",
//!     "corners": { "<id>": { "x": 0.0, "y": 0.0, "elevation": 2.5 } },
//!     "walls": [ { "corner1": "<id>", "corner2": "<id>" } ],
//!     "rooms": { "<id,id,...>": { "name": "거실" } } },
//!   "items": [ ... ] }
//! ```
//!
//! Corners, walls, and rooms are meters; item positions are centimeters.
//! Loading fully replaces in-memory state; there is no incremental merge. A
//! document missing `floorplanner.corners` or `floorplanner.walls` fails
//! validation, and the caller is expected to fall back to the default plan.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::events::ModelEvent;
use crate::floorplan::{room_key, Corner, Wall};
use crate::model::{item_from_metadata, metadata_from_item, ItemMetadata, Model};

/// Version stamped into exported documents.
pub const DOCUMENT_VERSION: u32 = 2;

/// The full wire document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedDocument {
    pub floorplanner: SerializedFloorplanner,
    #[serde(default)]
    pub items: Vec<ItemMetadata>,
}

/// The `floorplanner` section. `corners` and `walls` are mandatory; their
/// absence is what distinguishes a malformed document from an empty plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedFloorplanner {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_units")]
    pub units: String,
    pub corners: BTreeMap<String, SerializedCorner>,
    pub walls: Vec<SerializedWall>,
    #[serde(default)]
    pub rooms: BTreeMap<String, SerializedRoomMeta>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

fn default_units() -> String {
    "m".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedCorner {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedWall {
    pub corner1: String,
    pub corner2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_elevation: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SerializedRoomMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Model {
    /// Exports the full model state as a wire document.
    pub fn export_serialized(&self) -> SerializedDocument {
        let corners: BTreeMap<String, SerializedCorner> = self
            .floorplan
            .corners()
            .map(|c| {
                (
                    c.id.clone(),
                    SerializedCorner {
                        x: c.x,
                        y: c.y,
                        elevation: Some(c.elevation),
                    },
                )
            })
            .collect();

        let mut walls: Vec<SerializedWall> = self
            .floorplan
            .walls()
            .map(|(_, w)| SerializedWall {
                corner1: w.corner1.clone(),
                corner2: w.corner2.clone(),
                thickness: Some(w.thickness),
                start_elevation: Some(w.start_elevation),
                end_elevation: Some(w.end_elevation),
            })
            .collect();
        walls.sort_by(|a, b| (&a.corner1, &a.corner2).cmp(&(&b.corner1, &b.corner2)));

        // Room keys are written in boundary order so consumers can rebuild
        // the polygon straight from the key; identity normalization (sorted
        // ids) happens again on load.
        let rooms: BTreeMap<String, SerializedRoomMeta> = self
            .floorplan
            .rooms()
            .iter()
            .map(|r| {
                (
                    r.corner_ids.join(","),
                    SerializedRoomMeta {
                        name: Some(r.name.clone()),
                    },
                )
            })
            .collect();

        let items: Vec<ItemMetadata> = self
            .items
            .values()
            .map(metadata_from_item)
            .collect();

        SerializedDocument {
            floorplanner: SerializedFloorplanner {
                version: DOCUMENT_VERSION,
                units: "m".to_string(),
                corners,
                walls,
                rooms,
            },
            items,
        }
    }

    /// Exports the model as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.export_serialized())
            .map_err(|e| Error::Validation(e.to_string()))
    }

    /// Replaces the whole model state with a wire document.
    ///
    /// Validation happens up front; on error the model keeps its previous
    /// state. Walls referencing unknown corners are dropped with a warning
    /// rather than failing the load.
    pub fn load_serialized(&mut self, doc: SerializedDocument) -> Result<()> {
        // Validate items before touching any state.
        let mut items = Vec::with_capacity(doc.items.len());
        for meta in &doc.items {
            items.push(item_from_metadata(meta)?);
        }

        self.floorplan.clear();
        self.items.clear();
        self.events.clear();

        for (id, corner) in &doc.floorplanner.corners {
            self.floorplan.insert_corner(Corner {
                id: id.clone(),
                x: corner.x,
                y: corner.y,
                elevation: corner.elevation.unwrap_or(self.config.default_elevation),
            });
        }

        for wall in &doc.floorplanner.walls {
            let known = doc.floorplanner.corners.contains_key(&wall.corner1)
                && doc.floorplanner.corners.contains_key(&wall.corner2);
            if !known {
                warn!(
                    corner1 = %wall.corner1,
                    corner2 = %wall.corner2,
                    "dropping wall referencing unknown corner"
                );
                continue;
            }
            let elevation = self.config.default_elevation;
            self.floorplan.insert_wall(Wall {
                corner1: wall.corner1.clone(),
                corner2: wall.corner2.clone(),
                thickness: wall.thickness.unwrap_or(self.config.default_wall_thickness),
                start_elevation: wall.start_elevation.unwrap_or(elevation),
                end_elevation: wall.end_elevation.unwrap_or(elevation),
            });
        }

        // Room names keyed by normalized identity, so hand-edited documents
        // with unsorted corner lists still resolve.
        let names: FxHashMap<String, String> = doc
            .floorplanner
            .rooms
            .iter()
            .filter_map(|(key, meta)| {
                let ids: Vec<String> =
                    key.split(',').map(|s| s.trim().to_string()).collect();
                meta.name
                    .clone()
                    .map(|name| (room_key(&ids), name))
            })
            .collect();
        self.floorplan.set_room_names(names);
        self.floorplan.update_rooms();
        self.floorplan.drain_events();

        for item in items {
            self.items.insert(item);
        }

        self.push_event(ModelEvent::Loaded);
        Ok(())
    }

    /// Parses and loads a JSON document.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let doc: SerializedDocument =
            serde_json::from_str(json).map_err(|e| Error::Validation(e.to_string()))?;
        self.load_serialized(doc)
    }

    /// Loads a JSON document, falling back to the built-in default plan when
    /// the document fails validation. Returns the load error, if any, so
    /// hosts can report it.
    pub fn load_json_or_default(&mut self, json: &str) -> Option<Error> {
        match self.load_json(json) {
            Ok(()) => None,
            Err(err) => {
                warn!(%err, "document load failed; falling back to default plan");
                *self = Model::with_default_plan(self.config.clone());
                self.push_event(ModelEvent::Loaded);
                Some(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use approx::assert_relative_eq;

    fn populated_model() -> Model {
        let mut model = Model::new(Config::default());
        let fp = model.floorplan_mut();
        let a = fp.add_corner(0.0, 0.0);
        let b = fp.add_corner(6.0, 0.0);
        let c = fp.add_corner(6.0, 4.0);
        let d = fp.add_corner(0.0, 4.0);
        fp.add_wall(&a, &b).unwrap();
        fp.add_wall(&b, &c).unwrap();
        fp.add_wall(&c, &d).unwrap();
        fp.add_wall(&d, &a).unwrap();
        let key = fp.rooms()[0].key.clone();
        fp.assign_room_name(&key, "거실");

        model
            .add_item_by_metadata(ItemMetadata {
                item_name: "sofa.glb".to_string(),
                item_type: 1,
                position: [300.0, 40.0, 200.0],
                rotation: [0.0, 0.0, 0.0],
                inner_rotation: [0.0, 1.2, 0.0],
                scale: [1.0, 1.0, 1.0],
                size: [100.0, 80.0, 100.0],
                fixed: false,
                resizable: true,
                model_url: Some("/models/sofa.glb".to_string()),
                is_parametric: false,
                mesh: Vec::new(),
                textures: Vec::new(),
                wall_offset: 0.0,
            })
            .unwrap();
        model.drain_events();
        model
    }

    #[test]
    fn export_import_round_trip() {
        let model = populated_model();
        let doc = model.export_serialized();

        let mut restored = Model::new(Config::default());
        restored.load_serialized(doc.clone()).unwrap();

        assert_eq!(restored.floorplan().corner_count(), 4);
        assert_eq!(restored.floorplan().wall_count(), 4);
        assert_eq!(restored.floorplan().rooms().len(), 1);
        assert_eq!(restored.floorplan().rooms()[0].name, "거실");
        assert_relative_eq!(restored.floorplan().rooms()[0].area(), 24.0);
        assert_eq!(restored.item_count(), 1);

        // Exporting again reproduces the same document.
        let doc2 = restored.export_serialized();
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            serde_json::to_string(&doc2).unwrap()
        );
    }

    #[test]
    fn json_round_trip() {
        let model = populated_model();
        let json = model.to_json().unwrap();

        let mut restored = Model::new(Config::default());
        restored.load_json(&json).unwrap();
        assert_eq!(restored.floorplan().rooms()[0].name, "거실");
        let (_, item) = restored.items().next().unwrap();
        assert_relative_eq!(item.inner_rotation.y, 1.2);
    }

    #[test]
    fn missing_sections_fail_validation() {
        let mut model = Model::new(Config::default());
        assert!(matches!(
            model.load_json("{\"floorplanner\":{}}"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            model.load_json("not json at all"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn failed_load_degrades_to_default_plan() {
        let mut model = Model::new(Config::default());
        let err = model.load_json_or_default("{}");
        assert!(err.is_some());
        assert_eq!(model.floorplan().rooms().len(), 1);
        assert_relative_eq!(model.floorplan().rooms()[0].area(), 16.0);
    }

    #[test]
    fn wall_with_unknown_corner_is_dropped() {
        let model = populated_model();
        let mut doc = model.export_serialized();
        doc.floorplanner.walls.push(SerializedWall {
            corner1: "ghost".to_string(),
            corner2: doc.floorplanner.walls[0].corner1.clone(),
            thickness: None,
            start_elevation: None,
            end_elevation: None,
        });

        let mut restored = Model::new(Config::default());
        restored.load_serialized(doc).unwrap();
        assert_eq!(restored.floorplan().wall_count(), 4);
    }

    #[test]
    fn invalid_item_fails_whole_load_without_state_change() {
        let model = populated_model();
        let mut doc = model.export_serialized();
        doc.items[0].item_type = 99;

        let mut restored = Model::with_default_plan(Config::default());
        assert!(restored.load_serialized(doc).is_err());
        // Prior state intact.
        assert_eq!(restored.floorplan().corner_count(), 4);
        assert_relative_eq!(restored.floorplan().rooms()[0].area(), 16.0);
    }
}
