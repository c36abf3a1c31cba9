// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The AI tool-call boundary.
//!
//! The chat layer drives the floorplan through coarse actions. The only
//! action implemented is `ADD_FURNITURE`: it translates into item metadata
//! consistent with the wire format and goes through the model's ordinary
//! item-creation entry point, so AI-driven edits and manual placement are
//! indistinguishable downstream.

use serde::Deserialize;

use maru_model::{ItemKey, ItemMetadata, Model};

use crate::error::{Error, Result};

/// A raw action request from the tool-call layer.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub params: ActionParams,
}

/// Action parameters; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionParams {
    /// Furniture kind, e.g. `"sofa"`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// Builds the item metadata for a furniture kind placed at `(x, y)`
/// centimeters with the given yaw.
pub fn furniture_metadata(kind: &str, x: f64, y: f64, rotation: f64) -> ItemMetadata {
    ItemMetadata {
        item_name: format!("{kind}.glb"),
        item_type: 1,
        position: [x, 0.0, y],
        rotation: [0.0, 0.0, 0.0],
        inner_rotation: [0.0, rotation, 0.0],
        scale: [1.0, 1.0, 1.0],
        size: [100.0, 80.0, 100.0],
        fixed: false,
        resizable: true,
        model_url: Some(format!("/models/{kind}.glb")),
        is_parametric: false,
        mesh: Vec::new(),
        textures: Vec::new(),
        wall_offset: 0.0,
    }
}

/// Executes an action against the model.
pub fn execute_action(model: &mut Model, request: &ActionRequest) -> Result<ItemKey> {
    match request.action.as_str() {
        "ADD_FURNITURE" => {
            let kind = request.params.kind.as_deref().unwrap_or("sofa");
            let meta = furniture_metadata(
                kind,
                request.params.x,
                request.params.y,
                request.params.rotation,
            );
            Ok(model.add_item_by_metadata(meta)?)
        }
        other => Err(Error::UnsupportedAction(other.to_string())),
    }
}

/// Parses and executes a JSON action payload.
pub fn execute_action_json(model: &mut Model, json: &str) -> Result<ItemKey> {
    let request: ActionRequest =
        serde_json::from_str(json).map_err(|e| Error::MalformedAction(e.to_string()))?;
    execute_action(model, &request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maru_model::{Config, ItemType};

    #[test]
    fn add_furniture_places_floor_item() {
        let mut model = Model::with_default_plan(Config::default());
        let key = execute_action_json(
            &mut model,
            r#"{"action":"ADD_FURNITURE","params":{"type":"sofa","x":200,"y":150,"rotation":1.57}}"#,
        )
        .unwrap();

        let item = model.item(key).unwrap();
        assert_eq!(item.ty, ItemType::Floor);
        assert_eq!(item.name, "sofa.glb");
        assert_eq!(item.model_url.as_deref(), Some("/models/sofa.glb"));
        approx::assert_relative_eq!(item.position.x, 200.0);
        approx::assert_relative_eq!(item.position.z, 150.0);
        approx::assert_relative_eq!(item.inner_rotation.y, 1.57);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let mut model = Model::with_default_plan(Config::default());
        let err = execute_action_json(&mut model, r#"{"action":"DELETE_EVERYTHING"}"#);
        assert!(matches!(err, Err(Error::UnsupportedAction(_))));
        assert_eq!(model.item_count(), 0);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let mut model = Model::with_default_plan(Config::default());
        assert!(matches!(
            execute_action_json(&mut model, "no json"),
            Err(Error::MalformedAction(_))
        ));
    }

    #[test]
    fn missing_kind_defaults_to_sofa() {
        let mut model = Model::with_default_plan(Config::default());
        let key =
            execute_action_json(&mut model, r#"{"action":"ADD_FURNITURE","params":{"x":10}}"#)
                .unwrap();
        assert_eq!(model.item(key).unwrap().name, "sofa.glb");
    }
}
