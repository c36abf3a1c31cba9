// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Maru View
//!
//! The two view synchronizers of the design tool, plus the drag controller
//! and the staged construction task.
//!
//! Both views are independent state machines driven by the same model event
//! stream. Neither owns model state: everything they hold is derived and can
//! be disposed and rebuilt at any time. Switching between the 2D and 3D view
//! is a visibility toggle, not a data transfer — both always reflect the
//! current model.

pub mod camera;
pub mod drag;
pub mod plan;
pub mod scene;
pub mod staged;

use maru_model::{Model, ModelEvent};

pub use camera::{Camera, CameraMode, Ray};
pub use drag::{DragController, DragState, ViewEvent};
pub use plan::{GridSettings, PlanMode, PlanView, RoomShape2d, WallShape2d};
pub use scene::{
    AssetEvent, AssetLoader, AssetStatus, FloorMesh3d, ImmediateAssetLoader, PhysicalItem,
    SceneView, WallMesh3d,
};
pub use staged::{BuildStep, StagedBuild, WallPiece};

/// A view fully derived from the model: it consumes change events and
/// re-derives its state, never mutating the model.
pub trait ViewSync {
    fn apply(&mut self, event: &ModelEvent, model: &Model);
}
