// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The 2D plan view: sketching walls and rooms.
//!
//! Like the scene view, the plan view is a pure derivation over the model.
//! It additionally owns the 2D interaction modes as a small explicit state
//! machine: `Move` (drag corners/walls), `Draw` (multi-click wall chains),
//! and `EditIslands`. Mode changes are atomic and reset any in-progress
//! drawing chain.

use nalgebra::Point2;

use maru_model::{Config, CornerId, DimUnit, Model, ModelEvent, WallKey};

use crate::ViewSync;

/// 2D interaction modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    Move,
    Draw,
    EditIslands,
}

/// A wall rendered as a thick 2D segment, in meters.
#[derive(Debug, Clone)]
pub struct WallShape2d {
    pub wall: WallKey,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub thickness: f64,
    /// Dimension label in the configured display unit.
    pub length_label: String,
}

/// A room polygon with its label, in meters.
#[derive(Debug, Clone)]
pub struct RoomShape2d {
    pub room_key: String,
    pub name: String,
    pub polygon: Vec<Point2<f64>>,
    pub label_position: Point2<f64>,
    pub area_label: String,
}

/// Background grid settings.
#[derive(Debug, Clone)]
pub struct GridSettings {
    /// Spacing in meters.
    pub spacing: f64,
    pub visible: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            spacing: 0.5,
            visible: true,
        }
    }
}

/// The 2D view synchronizer.
#[derive(Debug)]
pub struct PlanView {
    mode: PlanMode,
    /// Last corner of an in-progress draw chain.
    draw_chain: Option<CornerId>,
    pub grid: GridSettings,
    /// Whether this view is the visible one.
    pub enabled: bool,
    dim_unit: DimUnit,
    walls: Vec<WallShape2d>,
    rooms: Vec<RoomShape2d>,
}

impl PlanView {
    pub fn new(config: &Config) -> Self {
        Self {
            mode: PlanMode::Move,
            draw_chain: None,
            grid: GridSettings::default(),
            enabled: true,
            dim_unit: config.dim_unit,
            walls: Vec::new(),
            rooms: Vec::new(),
        }
    }

    fn length_label(&self, meters: f64) -> String {
        match self.dim_unit {
            DimUnit::Meter => format!("{meters:.2}m"),
            DimUnit::Centimeter => format!("{:.0}cm", meters * 100.0),
        }
    }

    pub fn mode(&self) -> PlanMode {
        self.mode
    }

    /// Switches the interaction mode. Atomic: any in-progress multi-click
    /// wall chain is abandoned.
    pub fn switch_mode(&mut self, mode: PlanMode) {
        self.mode = mode;
        self.draw_chain = None;
    }

    pub fn walls(&self) -> &[WallShape2d] {
        &self.walls
    }

    pub fn rooms(&self) -> &[RoomShape2d] {
        &self.rooms
    }

    // --- Drawing ---

    /// Adds the next point of a wall chain at `(x, y)` meters. The first
    /// click places a corner; every further click places a corner and a
    /// wall back to the previous one. No-op outside `Draw` mode.
    pub fn draw_point(&mut self, model: &mut Model, x: f64, y: f64) -> Option<CornerId> {
        if self.mode != PlanMode::Draw {
            return None;
        }

        let corner = model.floorplan_mut().add_corner(x, y);
        if let Some(previous) = self.draw_chain.take() {
            if previous != corner {
                // A duplicate wall just means the user retraced an existing
                // one; the chain continues from the clicked corner.
                let _ = model.floorplan_mut().add_wall(&previous, &corner);
            }
        }
        self.draw_chain = Some(corner.clone());
        Some(corner)
    }

    /// Ends the current wall chain, keeping Draw mode active.
    pub fn end_draw(&mut self) {
        self.draw_chain = None;
    }

    fn rebuild(&mut self, model: &Model) {
        let floorplan = model.floorplan();

        self.walls = floorplan
            .walls()
            .filter_map(|(key, wall)| {
                let start = floorplan.corner(&wall.corner1)?.position();
                let end = floorplan.corner(&wall.corner2)?.position();
                Some(WallShape2d {
                    wall: key,
                    start,
                    end,
                    thickness: wall.thickness,
                    length_label: self.length_label((end - start).norm()),
                })
            })
            .collect();

        self.rooms = floorplan
            .rooms()
            .iter()
            .map(|room| RoomShape2d {
                room_key: room.key.clone(),
                name: room.name.clone(),
                polygon: room.polygon.clone(),
                label_position: room.area_center(),
                area_label: format!("{:.1}㎡", room.area()),
            })
            .collect();
    }
}

impl ViewSync for PlanView {
    fn apply(&mut self, event: &ModelEvent, model: &Model) {
        match event {
            ModelEvent::WallsChanged | ModelEvent::RoomsChanged | ModelEvent::Loaded => {
                self.rebuild(model);
            }
            // Items are not rendered in the plan view.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maru_model::Config;

    fn pump(view: &mut PlanView, model: &mut Model) {
        for event in model.drain_events() {
            view.apply(&event, model);
        }
    }

    #[test]
    fn drawing_a_square_creates_a_room() {
        let config = Config::default();
        let mut model = Model::new(config.clone());
        let mut view = PlanView::new(&config);
        view.switch_mode(PlanMode::Draw);

        view.draw_point(&mut model, 0.0, 0.0);
        view.draw_point(&mut model, 6.0, 0.0);
        view.draw_point(&mut model, 6.0, 4.0);
        view.draw_point(&mut model, 0.0, 4.0);
        // Closing click lands on the snap tolerance of the first corner.
        view.draw_point(&mut model, 0.05, 0.0);
        pump(&mut view, &mut model);

        assert_eq!(model.floorplan().rooms().len(), 1);
        assert_eq!(view.rooms().len(), 1);
        assert_eq!(view.walls().len(), 4);
        assert_eq!(view.rooms()[0].area_label, "24.0㎡");
    }

    #[test]
    fn mode_switch_resets_draw_chain() {
        let config = Config::default();
        let mut model = Model::new(config.clone());
        let mut view = PlanView::new(&config);
        view.switch_mode(PlanMode::Draw);

        view.draw_point(&mut model, 0.0, 0.0);
        view.switch_mode(PlanMode::Move);
        view.switch_mode(PlanMode::Draw);
        view.draw_point(&mut model, 6.0, 0.0);
        pump(&mut view, &mut model);

        // The chain was reset: two corners, no wall between them.
        assert_eq!(model.floorplan().corner_count(), 2);
        assert_eq!(model.floorplan().wall_count(), 0);
    }

    #[test]
    fn drawing_ignored_outside_draw_mode() {
        let config = Config::default();
        let mut model = Model::new(config.clone());
        let mut view = PlanView::new(&config);

        assert!(view.draw_point(&mut model, 0.0, 0.0).is_none());
        assert_eq!(model.floorplan().corner_count(), 0);
    }

    #[test]
    fn room_labels_follow_renames() {
        let config = Config::default();
        let mut model = Model::with_default_plan(config.clone());
        let mut view = PlanView::new(&config);
        model.drain_events();

        let key = model.floorplan().rooms()[0].key.clone();
        model.floorplan_mut().assign_room_name(&key, "거실");
        pump(&mut view, &mut model);

        assert_eq!(view.rooms()[0].name, "거실");
    }
}
