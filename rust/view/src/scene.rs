// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The 3D scene view: a disposable derivation of the model.
//!
//! The scene owns no model state. It derives wall meshes, floor meshes, and
//! per-item physical entries from the model, and rebuilds them from change
//! events. Wall rebuilding is staged (see [`crate::staged`]) with a
//! generation counter so rapid topology edits cancel in-flight builds
//! instead of racing them.
//!
//! Asset (mesh) loading is the one true asynchronous boundary: an item is
//! not visually ready right after creation. Readiness and failure arrive
//! through [`AssetLoader::poll`]; a failed load leaves the item in the model
//! rendering nothing.

use nalgebra::{Point2, Point3, Vector3};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use maru_geometry::triangulate_polygon;
use maru_model::{Config, ItemKey, Model, ModelEvent, Side, WallKey};

use crate::camera::Camera;
use crate::drag::DragController;
use crate::staged::{BuildStep, StagedBuild, WallPiece};
use crate::ViewSync;

/// Load state of an item's visual asset.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetStatus {
    Pending,
    Ready,
    Failed(String),
}

/// Asset load notifications produced by a loader.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetEvent {
    Progress(ItemKey, f32),
    Ready(ItemKey),
    Failed(ItemKey, String),
}

/// The asynchronous asset boundary. Hosts drive it however they load
/// meshes; the scene only consumes the resulting events.
pub trait AssetLoader {
    /// Requests the asset for an item.
    fn request(&mut self, key: ItemKey, url: &str);
    /// Drains completed and failed loads.
    fn poll(&mut self) -> Vec<AssetEvent>;
}

/// A loader that resolves every request immediately. Used in tests and
/// headless runs.
#[derive(Debug, Default)]
pub struct ImmediateAssetLoader {
    pending: Vec<ItemKey>,
}

impl AssetLoader for ImmediateAssetLoader {
    fn request(&mut self, key: ItemKey, _url: &str) {
        self.pending.push(key);
    }

    fn poll(&mut self) -> Vec<AssetEvent> {
        self.pending.drain(..).map(AssetEvent::Ready).collect()
    }
}

/// A wall face extruded to its elevation, in world centimeters.
#[derive(Debug, Clone)]
pub struct WallMesh3d {
    pub wall: WallKey,
    pub side: Side,
    /// Quad corners: bottom start, bottom end, top end, top start.
    pub vertices: [Point3<f64>; 4],
}

/// A room floor triangulated into a fan, in world centimeters.
#[derive(Debug, Clone)]
pub struct FloorMesh3d {
    pub room_key: String,
    pub vertices: Vec<Point3<f64>>,
    pub triangles: Vec<[usize; 3]>,
}

/// Per-item render entry.
#[derive(Debug, Clone)]
pub struct PhysicalItem {
    pub item: ItemKey,
    pub status: AssetStatus,
}

/// The 3D view synchronizer.
#[derive(Debug)]
pub struct SceneView {
    camera: Camera,
    drag: DragController,
    /// Whether this view is the visible one. Rendering state only; the
    /// derived geometry stays current either way.
    pub enabled: bool,
    config: Config,
    wall_meshes: Vec<WallMesh3d>,
    floor_meshes: Vec<FloorMesh3d>,
    items: FxHashMap<ItemKey, PhysicalItem>,
    /// Items awaiting staged instantiation after a full document load.
    pending_items: std::collections::VecDeque<ItemKey>,
    build: Option<StagedBuild>,
    topology_generation: u64,
    last_progress: f32,
    walls_completed: bool,
}

impl SceneView {
    pub fn new(config: Config) -> Self {
        let camera = Camera::orthographic(1450.0);
        let drag = DragController::new(&camera);
        Self {
            camera,
            drag,
            enabled: false,
            config,
            wall_meshes: Vec::new(),
            floor_meshes: Vec::new(),
            items: FxHashMap::default(),
            pending_items: std::collections::VecDeque::new(),
            build: None,
            topology_generation: 0,
            last_progress: 0.0,
            walls_completed: false,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn drag(&mut self) -> &mut DragController {
        &mut self.drag
    }

    pub fn wall_meshes(&self) -> &[WallMesh3d] {
        &self.wall_meshes
    }

    pub fn floor_meshes(&self) -> &[FloorMesh3d] {
        &self.floor_meshes
    }

    pub fn physical_item(&self, key: ItemKey) -> Option<&PhysicalItem> {
        self.items.get(&key)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Build progress 0-100; meaningful while a staged build runs.
    pub fn build_progress(&self) -> f32 {
        self.last_progress
    }

    pub fn walls_completed(&self) -> bool {
        self.walls_completed
    }

    // --- Camera ---

    /// Switches between perspective and orthographic projection, preserving
    /// world position and target. The drag controller is re-wired in the
    /// same call, so no input can arrive between the swap and the re-wire.
    pub fn switch_camera_mode(&mut self) {
        self.camera = self.camera.switched_mode();
        self.drag.sync_camera(&self.camera);
    }

    /// Moves the camera straight above the floorplan, looking down.
    pub fn switch_to_top_view(&mut self) {
        let Some((center, size)) = self.floor_bounds() else {
            return;
        };
        let height = size.x.max(size.y).max(size.z) * 2.0;
        self.camera
            .look_at(Point3::new(center.x, center.y + height, center.z), center);
    }

    /// Frames the floorplan: target at the floor bounding-box center,
    /// camera pulled back proportionally to the plan size, capped at the
    /// configured view bounds.
    pub fn frame_floorplan(&mut self) {
        let Some((center, size)) = self.floor_bounds() else {
            return;
        };
        let distance = (size.x.max(size.y).max(size.z) * 2.0).min(self.config.view_bounds);
        let position = Point3::new(
            center.x + distance * 0.9,
            center.y + distance * 1.1,
            center.z + distance * 0.9,
        );
        self.camera.look_at(position, center);
    }

    fn floor_bounds(&self) -> Option<(Point3<f64>, Vector3<f64>)> {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut any = false;
        for floor in &self.floor_meshes {
            for v in &floor.vertices {
                any = true;
                min = Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z));
                max = Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z));
            }
        }
        any.then(|| (nalgebra::center(&min, &max), max - min))
    }

    // --- Staged construction ---

    /// Starts a staged rebuild of walls and floors for the current
    /// topology. Floors build immediately (camera framing needs them); wall
    /// faces follow one per [`SceneView::advance_build`] call.
    pub fn begin_staged_build(&mut self, model: &Model) {
        self.topology_generation += 1;
        self.rebuild_floors(model);
        self.wall_meshes.clear();
        self.walls_completed = false;
        self.last_progress = 0.0;
        self.build = Some(StagedBuild::new(model, self.topology_generation));
    }

    /// Runs one step of the staged build. Returns the step taken, `None`
    /// when no build is active.
    pub fn advance_build(&mut self, model: &Model) -> Option<BuildStep> {
        let build = self.build.as_mut()?;
        let step = build.advance(self.topology_generation)?;

        match &step {
            BuildStep::Progress { piece, progress } => {
                if let Some(mesh) = wall_mesh(model, *piece, &self.config) {
                    self.wall_meshes.push(mesh);
                }
                self.last_progress = *progress;
            }
            BuildStep::Completed => {
                self.walls_completed = true;
                self.last_progress = 100.0;
                self.build = None;
                debug!(walls = self.wall_meshes.len(), "staged wall build completed");
            }
            BuildStep::Cancelled => {
                self.build = None;
            }
        }
        Some(step)
    }

    /// Drives the staged build to completion in one call (headless paths).
    pub fn finish_build(&mut self, model: &Model) {
        while let Some(step) = self.advance_build(model) {
            if matches!(step, BuildStep::Completed | BuildStep::Cancelled) {
                break;
            }
        }
    }

    fn rebuild_floors(&mut self, model: &Model) {
        let s = self.config.plan_to_world;
        self.floor_meshes = model
            .floorplan()
            .rooms()
            .iter()
            .map(|room| {
                let triangles = triangulate_polygon(&room.polygon);
                let vertices = room
                    .polygon
                    .iter()
                    .map(|p| Point3::new(p.x * s, 0.0, p.y * s))
                    .collect();
                FloorMesh3d {
                    room_key: room.key.clone(),
                    vertices,
                    triangles,
                }
            })
            .collect();
    }

    // --- Items ---

    fn add_item(&mut self, key: ItemKey, model: &Model, loader: Option<&mut dyn AssetLoader>) {
        let Some(item) = model.item(key) else {
            return;
        };
        let status = match item.model_url.as_deref() {
            Some(url) if !url.is_empty() => {
                if let Some(loader) = loader {
                    loader.request(key, url);
                }
                AssetStatus::Pending
            }
            _ => {
                warn!(item = %item.name, "no model URL; item renders nothing");
                AssetStatus::Failed("missing model URL".to_string())
            }
        };
        self.items.insert(key, PhysicalItem { item: key, status });
    }

    /// Instantiates one item from the post-load queue. Item creation after
    /// a full document load is time-sliced like wall construction, so large
    /// plans appear progressively instead of stalling a frame.
    pub fn advance_item_instantiation(
        &mut self,
        model: &Model,
        loader: Option<&mut dyn AssetLoader>,
    ) -> Option<ItemKey> {
        let key = self.pending_items.pop_front()?;
        self.add_item(key, model, loader);
        Some(key)
    }

    /// Drains the post-load instantiation queue (headless paths).
    pub fn finish_item_instantiation(&mut self, model: &Model) {
        while self.advance_item_instantiation(model, None).is_some() {}
    }

    /// Items still waiting for staged instantiation.
    pub fn pending_item_count(&self) -> usize {
        self.pending_items.len()
    }

    /// Applies asset loader notifications.
    pub fn pump_assets(&mut self, loader: &mut dyn AssetLoader) {
        for event in loader.poll() {
            match event {
                AssetEvent::Progress(_, _) => {}
                AssetEvent::Ready(key) => {
                    if let Some(entry) = self.items.get_mut(&key) {
                        entry.status = AssetStatus::Ready;
                    }
                }
                AssetEvent::Failed(key, reason) => {
                    warn!(?key, %reason, "asset load failed; item renders nothing");
                    if let Some(entry) = self.items.get_mut(&key) {
                        entry.status = AssetStatus::Failed(reason);
                    }
                }
            }
        }
    }

    /// Applies a model event, requesting assets through `loader`.
    pub fn apply_with_loader(
        &mut self,
        event: &ModelEvent,
        model: &Model,
        loader: &mut dyn AssetLoader,
    ) {
        match event {
            ModelEvent::ItemAdded(key) => self.add_item(*key, model, Some(loader)),
            _ => self.apply(event, model),
        }
    }
}

impl ViewSync for SceneView {
    fn apply(&mut self, event: &ModelEvent, model: &Model) {
        match event {
            ModelEvent::ItemAdded(key) => self.add_item(*key, model, None),
            ModelEvent::ItemRemoved(key) => {
                self.items.remove(key);
            }
            // Item transforms are read straight from the model at render
            // time; nothing derived to refresh here.
            ModelEvent::ItemUpdated(_) => {}
            ModelEvent::WallsChanged | ModelEvent::RoomsChanged => {
                self.begin_staged_build(model);
            }
            ModelEvent::Loaded => {
                self.items.clear();
                self.pending_items = model.items().map(|(key, _)| key).collect();
                self.begin_staged_build(model);
            }
            ModelEvent::AssetWarning { item, reason } => {
                if let Some(entry) = self.items.get_mut(item) {
                    entry.status = AssetStatus::Failed(reason.clone());
                }
            }
        }
    }
}

/// Builds the extruded quad for one wall face.
fn wall_mesh(model: &Model, piece: WallPiece, config: &Config) -> Option<WallMesh3d> {
    let edge = model.floorplan().wall_edge(piece.wall, piece.side)?;
    let s = config.plan_to_world;
    let to3 = |p: Point2<f64>, y: f64| Point3::new(p.x * s, y, p.y * s);

    Some(WallMesh3d {
        wall: piece.wall,
        side: piece.side,
        vertices: [
            to3(edge.start, 0.0),
            to3(edge.end, 0.0),
            to3(edge.end, edge.end_elevation * s),
            to3(edge.start, edge.start_elevation * s),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use maru_model::ItemMetadata;

    fn room_model() -> Model {
        let mut model = Model::new(Config::default());
        let fp = model.floorplan_mut();
        let a = fp.add_corner(0.0, 0.0);
        let b = fp.add_corner(6.0, 0.0);
        let c = fp.add_corner(6.0, 4.0);
        let d = fp.add_corner(0.0, 4.0);
        for (s, e) in [(&a, &b), (&b, &c), (&c, &d), (&d, &a)] {
            fp.add_wall(s, e).unwrap();
        }
        model
    }

    fn sofa() -> ItemMetadata {
        ItemMetadata {
            item_name: "sofa.glb".to_string(),
            item_type: 1,
            position: [300.0, 40.0, 200.0],
            rotation: [0.0, 0.0, 0.0],
            inner_rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            size: [100.0, 80.0, 100.0],
            fixed: false,
            resizable: true,
            model_url: Some("/models/sofa.glb".to_string()),
            is_parametric: false,
            mesh: Vec::new(),
            textures: Vec::new(),
            wall_offset: 0.0,
        }
    }

    fn pump(view: &mut SceneView, model: &mut Model) {
        for event in model.drain_events() {
            view.apply(&event, model);
        }
    }

    #[test]
    fn staged_build_derives_walls_and_floors() {
        let mut model = room_model();
        let mut view = SceneView::new(Config::default());
        pump(&mut view, &mut model);

        assert_eq!(view.floor_meshes().len(), 1);
        view.finish_build(&model);
        assert_eq!(view.wall_meshes().len(), 8);
        assert!(view.walls_completed());
        approx::assert_relative_eq!(view.build_progress(), 100.0);
    }

    #[test]
    fn topology_edit_cancels_inflight_build() {
        let mut model = room_model();
        let mut view = SceneView::new(Config::default());
        pump(&mut view, &mut model);

        // A few steps into the build...
        assert!(matches!(
            view.advance_build(&model),
            Some(BuildStep::Progress { .. })
        ));

        // ...the topology changes and a new build supersedes the old one.
        let fp = model.floorplan_mut();
        let room_corner = fp.rooms()[0].corner_ids[0].clone();
        fp.move_corner(&room_corner, -1.0, -1.0).unwrap();
        pump(&mut view, &mut model);

        view.finish_build(&model);
        assert!(view.walls_completed());
        assert_eq!(view.wall_meshes().len(), 8);
    }

    #[test]
    fn items_track_model_lifecycle() {
        let mut model = room_model();
        let mut view = SceneView::new(Config::default());
        pump(&mut view, &mut model);

        let key = model.add_item_by_metadata(sofa()).unwrap();
        pump(&mut view, &mut model);
        assert_eq!(view.item_count(), 1);
        assert_eq!(
            view.physical_item(key).unwrap().status,
            AssetStatus::Pending
        );

        model.remove_item(key).unwrap();
        pump(&mut view, &mut model);
        assert_eq!(view.item_count(), 0);
    }

    #[test]
    fn asset_loader_round_trip() {
        let mut model = room_model();
        let mut view = SceneView::new(Config::default());
        let mut loader = ImmediateAssetLoader::default();
        pump(&mut view, &mut model);

        let key = model.add_item_by_metadata(sofa()).unwrap();
        for event in model.drain_events() {
            view.apply_with_loader(&event, &model, &mut loader);
        }
        assert_eq!(
            view.physical_item(key).unwrap().status,
            AssetStatus::Pending
        );

        view.pump_assets(&mut loader);
        assert_eq!(view.physical_item(key).unwrap().status, AssetStatus::Ready);
    }

    #[test]
    fn missing_url_marks_item_failed() {
        let mut model = room_model();
        let mut view = SceneView::new(Config::default());
        pump(&mut view, &mut model);

        let mut meta = sofa();
        meta.model_url = None;
        let key = model.add_item_by_metadata(meta).unwrap();
        pump(&mut view, &mut model);

        assert!(matches!(
            view.physical_item(key).unwrap().status,
            AssetStatus::Failed(_)
        ));
        // The item itself stays in the model.
        assert!(model.item(key).is_some());
    }

    #[test]
    fn camera_switch_rewires_drag_atomically() {
        let model = room_model();
        let mut view = SceneView::new(Config::default());
        let generation_before = view.camera().generation;

        view.switch_camera_mode();
        assert_eq!(view.camera().generation, generation_before + 1);

        // Input through the scene's own camera still works: the controller
        // was re-synced in the same call.
        let camera = view.camera().clone();
        view.drag().press(0.0, 0.0, &camera, &model);
        // Not dropped as stale: the press was processed and reported.
        assert!(view
            .drag()
            .drain_events()
            .contains(&crate::drag::ViewEvent::NoItemSelected));
    }

    #[test]
    fn loaded_event_rebuilds_everything_in_stages() {
        let mut source = room_model();
        source.add_item_by_metadata(sofa()).unwrap();
        source.add_item_by_metadata(sofa()).unwrap();
        let json = source.to_json().unwrap();

        let mut model = Model::new(Config::default());
        let mut view = SceneView::new(Config::default());
        model.load_json(&json).unwrap();
        pump(&mut view, &mut model);

        // Items instantiate one per step after a load, not all at once.
        assert_eq!(view.item_count(), 0);
        assert_eq!(view.pending_item_count(), 2);
        assert!(view.advance_item_instantiation(&model, None).is_some());
        assert_eq!(view.item_count(), 1);
        view.finish_item_instantiation(&model);
        assert_eq!(view.item_count(), 2);
        assert_eq!(view.pending_item_count(), 0);

        assert_eq!(view.floor_meshes().len(), 1);
        view.finish_build(&model);
        assert_eq!(view.wall_meshes().len(), 8);
    }
}
