// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The designer facade: the application entry point.
//!
//! Owns the model and both view synchronizers and pumps the model's event
//! queue into them. Which view is shown is a visibility toggle only; both
//! views always reflect the current model state.

use tracing::warn;

use maru_model::{Config, Model, ModelEvent};
use maru_view::{PlanMode, PlanView, SceneView, ViewSync};

use crate::store::FloorplanStore;

/// Which view the host currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Plan,
    Scene,
}

/// The engine facade wiring model and views together.
#[derive(Debug)]
pub struct Designer {
    config: Config,
    model: Model,
    plan: PlanView,
    scene: SceneView,
    active: ActiveView,
}

impl Designer {
    /// Creates a designer over the built-in default plan.
    pub fn new(config: Config) -> Self {
        let model = Model::with_default_plan(config.clone());
        let mut designer = Self {
            plan: PlanView::new(&config),
            scene: SceneView::new(config.clone()),
            active: ActiveView::Plan,
            model,
            config,
        };
        designer.reset_views();
        designer
    }

    /// Re-derives both views from scratch, as if the model had just been
    /// loaded.
    fn reset_views(&mut self) {
        self.pump();
        let loaded = ModelEvent::Loaded;
        self.plan.apply(&loaded, &self.model);
        self.scene.apply(&loaded, &self.model);
        self.scene.finish_build(&self.model);
        self.scene.finish_item_instantiation(&self.model);
    }

    /// Creates a designer from a serialized JSON document, degrading to the
    /// default plan when the document fails validation.
    pub fn from_json(config: Config, json: &str) -> Self {
        let mut designer = Self::new(config);
        designer.load_json(json);
        designer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn plan_view(&self) -> &PlanView {
        &self.plan
    }

    pub fn plan_view_mut(&mut self) -> &mut PlanView {
        &mut self.plan
    }

    pub fn scene_view(&self) -> &SceneView {
        &self.scene
    }

    pub fn scene_view_mut(&mut self) -> &mut SceneView {
        &mut self.scene
    }

    pub fn active_view(&self) -> ActiveView {
        self.active
    }

    /// Toggles between the plan and scene views. Pure visibility: no data
    /// moves, both views stay current. The plan view drops back to Move
    /// mode so a half-drawn wall chain never survives the toggle.
    pub fn switch_view(&mut self) {
        self.plan.switch_mode(PlanMode::Move);
        self.active = match self.active {
            ActiveView::Plan => {
                self.plan.enabled = false;
                self.scene.enabled = true;
                ActiveView::Scene
            }
            ActiveView::Scene => {
                self.scene.enabled = false;
                self.plan.enabled = true;
                ActiveView::Plan
            }
        };
    }

    /// Drains model events into both views. Returns the events so hosts can
    /// react (progress bars, dirty flags). Call after every batch of model
    /// mutations.
    pub fn pump(&mut self) -> Vec<ModelEvent> {
        let events = self.model.drain_events();
        for event in &events {
            self.plan.apply(event, &self.model);
            self.scene.apply(event, &self.model);
        }
        events
    }

    /// Drives the scene's staged wall build to completion. Interactive
    /// hosts step the build from their render loop instead.
    pub fn finish_scene_build(&mut self) {
        self.scene.finish_build(&self.model);
        self.scene.finish_item_instantiation(&self.model);
    }

    /// Sets the plan view's interaction mode.
    pub fn set_plan_mode(&mut self, mode: PlanMode) {
        self.plan.switch_mode(mode);
    }

    /// Toggles the 3D camera between perspective and orthographic.
    pub fn switch_camera_mode(&mut self) {
        self.scene.switch_camera_mode();
    }

    /// Loads a JSON document; falls back to the default plan on validation
    /// failure (the user sees an empty room, never a blank screen).
    pub fn load_json(&mut self, json: &str) {
        if let Some(err) = self.model.load_json_or_default(json) {
            warn!(%err, "loaded default plan instead of document");
        }
        self.reset_views();
    }

    /// Persists the current model through the host's store.
    pub fn save_to(&self, store: &mut dyn FloorplanStore) -> crate::error::Result<String> {
        Ok(store.save(&self.model.export_serialized())?)
    }

    /// Loads a document by id from the host's store; storage and validation
    /// failures both degrade to the default plan.
    pub fn load_from(&mut self, store: &dyn FloorplanStore, id: &str) {
        match store.load(id) {
            Ok(doc) => {
                if let Err(err) = self.model.load_serialized(doc) {
                    warn!(%err, "stored document failed validation; using default plan");
                    self.model = Model::with_default_plan(self.config.clone());
                }
            }
            Err(err) => {
                warn!(%err, "storage load failed; using default plan");
                self.model = Model::with_default_plan(self.config.clone());
            }
        }
        self.reset_views();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::execute_action_json;
    use crate::store::MemoryStore;

    #[test]
    fn new_designer_has_default_room_in_both_views() {
        let designer = Designer::new(Config::default());
        assert_eq!(designer.plan_view().rooms().len(), 1);
        assert_eq!(designer.scene_view().floor_meshes().len(), 1);
        assert_eq!(designer.scene_view().wall_meshes().len(), 8);
    }

    #[test]
    fn switch_view_is_visibility_only() {
        let mut designer = Designer::new(Config::default());
        assert_eq!(designer.active_view(), ActiveView::Plan);

        designer.switch_view();
        assert_eq!(designer.active_view(), ActiveView::Scene);
        assert!(designer.scene_view().enabled);
        // The hidden plan view still reflects the model.
        assert_eq!(designer.plan_view().rooms().len(), 1);

        designer.switch_view();
        assert_eq!(designer.active_view(), ActiveView::Plan);
    }

    #[test]
    fn ai_action_reaches_both_views() {
        let mut designer = Designer::new(Config::default());
        execute_action_json(
            designer.model_mut(),
            r#"{"action":"ADD_FURNITURE","params":{"type":"bed","x":200,"y":200}}"#,
        )
        .unwrap();
        designer.pump();

        assert_eq!(designer.model().item_count(), 1);
        assert_eq!(designer.scene_view().item_count(), 1);
    }

    #[test]
    fn save_and_reload_through_store() {
        let mut designer = Designer::new(Config::default());
        execute_action_json(
            designer.model_mut(),
            r#"{"action":"ADD_FURNITURE","params":{"type":"desk","x":100,"y":100}}"#,
        )
        .unwrap();
        designer.pump();

        let mut store = MemoryStore::new();
        let id = designer.save_to(&mut store).unwrap();

        let mut other = Designer::new(Config::default());
        other.load_from(&store, &id);
        assert_eq!(other.model().item_count(), 1);
        assert_eq!(other.scene_view().item_count(), 1);
    }

    #[test]
    fn missing_document_degrades_to_default_plan() {
        let mut designer = Designer::new(Config::default());
        let store = MemoryStore::new();

        designer.load_from(&store, "fp-404");
        assert_eq!(designer.model().floorplan().rooms().len(), 1);
        approx::assert_relative_eq!(designer.model().floorplan().rooms()[0].area(), 16.0);
        assert_eq!(designer.plan_view().rooms().len(), 1);
    }
}
