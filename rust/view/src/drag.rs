// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drag/placement controller.
//!
//! State machine: `Unselected → Selected → {Dragging, Rotating,
//! RotatingFree, Panning} → Selected → Unselected`. Selection is exclusive.
//! While dragging or rotating, camera controls are disabled so camera and
//! item manipulation can never interleave; they come back on drag finish or
//! deselection. Deselection cancels an active drag without rolling back
//! already-applied positions — further updates simply stop.
//!
//! Pointer picking resolves a camera ray against item bounding boxes first,
//! then wall face planes, then the floor plane. Empty-space, wall, and room
//! hits emit informational side-channel events consumed by texture and
//! camera-framing UI.

use nalgebra::{Point2, Point3, Vector3};

use maru_model::{
    point_in_any_room, ItemKey, Model, Side, SnapCandidate, Surface, WallKey,
};

use crate::camera::Camera;

/// Controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Unselected,
    Selected,
    Dragging,
    Rotating,
    RotatingFree,
    Panning,
}

/// Events emitted toward the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    ItemSelected(ItemKey),
    NoItemSelected,
    ItemMove(ItemKey),
    ItemMoveFinish(ItemKey),
    WallClicked { wall: WallKey, side: Side },
    RoomClicked { room_key: String },
}

/// The drag/placement controller of the 3D view.
#[derive(Debug)]
pub struct DragController {
    state: DragState,
    selected: Option<ItemKey>,
    /// Generation of the camera this controller was last synced with. A
    /// mismatch means the scene swapped cameras without re-wiring us; such
    /// input is ignored rather than interpreted through a dead projection.
    camera_generation: u64,
    camera_controls_enabled: bool,
    events: Vec<ViewEvent>,
}

impl DragController {
    pub fn new(camera: &Camera) -> Self {
        Self {
            state: DragState::Unselected,
            selected: None,
            camera_generation: camera.generation,
            camera_controls_enabled: true,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn selected(&self) -> Option<ItemKey> {
        self.selected
    }

    /// `false` while an item is being dragged or rotated.
    pub fn camera_controls_enabled(&self) -> bool {
        self.camera_controls_enabled
    }

    /// Re-wires the controller to a (possibly reconstructed) camera. Called
    /// atomically by the scene view whenever it swaps cameras.
    pub fn sync_camera(&mut self, camera: &Camera) {
        self.camera_generation = camera.generation;
    }

    fn camera_is_current(&self, camera: &Camera) -> bool {
        self.camera_generation == camera.generation
    }

    /// Drains queued UI events.
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Selection ---

    /// Handles a pointer press in normalized device coordinates.
    ///
    /// Picks an item if one is under the pointer (exclusive selection);
    /// otherwise reports the wall or room under the pointer and deselects.
    pub fn press(&mut self, ndc_x: f64, ndc_y: f64, camera: &Camera, model: &Model) {
        if !self.camera_is_current(camera) {
            return;
        }
        let ray = camera.ray_through(ndc_x, ndc_y);

        // Items first: nearest bounding-box hit wins.
        let mut best: Option<(f64, ItemKey)> = None;
        for (key, item) in model.items() {
            let half = item.half_size();
            let min = Point3::new(
                item.position.x - half.x,
                item.position.y - half.y,
                item.position.z - half.z,
            );
            let max = Point3::new(
                item.position.x + half.x,
                item.position.y + half.y,
                item.position.z + half.z,
            );
            if let Some(t) = ray.intersect_aabb(min, max) {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, key));
                }
            }
        }

        if let Some((_, key)) = best {
            self.select(key);
            return;
        }

        // No item: report what else the pointer hit, then deselect.
        if let Some(candidate) = self.intersect(ndc_x, ndc_y, camera, model) {
            match candidate.surface {
                Surface::Wall { wall, side } => {
                    self.events.push(ViewEvent::WallClicked { wall, side });
                }
                Surface::Floor => {
                    let scale = model.config().item_unit_scale();
                    let p = Point2::new(
                        candidate.point.x * scale,
                        candidate.point.z * scale,
                    );
                    if let Some(room) = model
                        .floorplan()
                        .rooms()
                        .iter()
                        .find(|r| maru_geometry::point_in_polygon(p, &r.polygon))
                    {
                        self.events.push(ViewEvent::RoomClicked {
                            room_key: room.key.clone(),
                        });
                    }
                }
                Surface::Roof => {}
            }
        }
        self.deselect();
    }

    /// Selects an item, deselecting any previous one.
    pub fn select(&mut self, key: ItemKey) {
        self.selected = Some(key);
        self.state = DragState::Selected;
        self.events.push(ViewEvent::ItemSelected(key));
    }

    /// Returns to the unselected state. Cancels any drag in progress;
    /// positions already applied stay applied.
    pub fn deselect(&mut self) {
        self.selected = None;
        self.state = DragState::Unselected;
        self.camera_controls_enabled = true;
        self.events.push(ViewEvent::NoItemSelected);
    }

    // --- Drag / rotate ---

    /// Enters the dragging state. Camera controls are disabled until the
    /// drag finishes.
    pub fn begin_drag(&mut self) {
        if self.state == DragState::Selected {
            self.state = DragState::Dragging;
            self.camera_controls_enabled = false;
        }
    }

    /// Moves the selected item to the pointer via its snapping strategy.
    pub fn drag_to(&mut self, ndc_x: f64, ndc_y: f64, camera: &Camera, model: &mut Model) {
        if self.state != DragState::Dragging || !self.camera_is_current(camera) {
            return;
        }
        let Some(key) = self.selected else {
            return;
        };
        let Some(candidate) = self.intersect(ndc_x, ndc_y, camera, model) else {
            return;
        };
        if model.snap_item(key, &candidate).is_ok() {
            self.events.push(ViewEvent::ItemMove(key));
        }
    }

    /// Enters the rotating state (yaw snapped by the model on apply).
    pub fn begin_rotate(&mut self, free: bool) {
        if self.state == DragState::Selected {
            self.state = if free {
                DragState::RotatingFree
            } else {
                DragState::Rotating
            };
            self.camera_controls_enabled = false;
        }
    }

    /// Applies a new yaw to the selected item while rotating.
    pub fn rotate_to(&mut self, yaw: f64, model: &mut Model) {
        if !matches!(self.state, DragState::Rotating | DragState::RotatingFree) {
            return;
        }
        let Some(key) = self.selected else {
            return;
        };
        if model.rotate_item(key, yaw).is_ok() {
            self.events.push(ViewEvent::ItemMove(key));
        }
    }

    /// Enters the panning state (camera pan with an item kept selected).
    pub fn begin_pan(&mut self) {
        if self.state == DragState::Selected {
            self.state = DragState::Panning;
        }
    }

    /// Finishes the active drag/rotate/pan, returning to `Selected` and
    /// re-enabling camera controls.
    pub fn finish(&mut self) {
        if matches!(
            self.state,
            DragState::Dragging | DragState::Rotating | DragState::RotatingFree | DragState::Panning
        ) {
            self.state = DragState::Selected;
            self.camera_controls_enabled = true;
            if let Some(key) = self.selected {
                self.events.push(ViewEvent::ItemMoveFinish(key));
            }
        }
    }

    // --- Picking ---

    /// Resolves the pointer to a snap candidate: wall faces first, then the
    /// floor plane (only inside a room), then the roof plane.
    pub fn intersect(
        &self,
        ndc_x: f64,
        ndc_y: f64,
        camera: &Camera,
        model: &Model,
    ) -> Option<SnapCandidate> {
        let ray = camera.ray_through(ndc_x, ndc_y);
        let config = model.config();
        let s = config.plan_to_world;

        // Wall faces: nearest in-bounds hit.
        let mut best_wall: Option<(f64, SnapCandidate)> = None;
        for edge in model.floorplan().wall_edges() {
            let center = edge.center();
            let plane_point = Point3::new(center.x * s, 0.0, center.y * s);
            let normal = Vector3::new(edge.normal.x, 0.0, edge.normal.y);

            let Some(hit) = ray.intersect_plane(plane_point, normal) else {
                continue;
            };

            // Inside the face rectangle?
            let start = Point2::new(edge.start.x * s, edge.start.y * s);
            let end = Point2::new(edge.end.x * s, edge.end.y * s);
            let dir = end - start;
            let len = dir.norm();
            if len < 1e-9 {
                continue;
            }
            let t_along = (Point2::new(hit.x, hit.z) - start).dot(&(dir / len));
            let height = edge.max_elevation() * s;
            if t_along < 0.0 || t_along > len || hit.y < 0.0 || hit.y > height {
                continue;
            }

            let t_ray = (hit - ray.origin).norm();
            if best_wall.map_or(true, |(bt, _)| t_ray < bt) {
                best_wall = Some((
                    t_ray,
                    SnapCandidate {
                        point: hit,
                        normal,
                        surface: Surface::Wall {
                            wall: edge.wall,
                            side: edge.side,
                        },
                    },
                ));
            }
        }
        if let Some((_, candidate)) = best_wall {
            return Some(candidate);
        }

        // Floor plane, but only inside a room.
        if let Some(hit) = ray.intersect_plane(Point3::origin(), Vector3::y()) {
            if point_in_any_room(hit, model.floorplan(), config) {
                return Some(SnapCandidate {
                    point: hit,
                    normal: Vector3::y(),
                    surface: Surface::Floor,
                });
            }
        }

        // Roof plane at the default elevation.
        let roof_y = config.default_elevation * s;
        ray.intersect_plane(Point3::new(0.0, roof_y, 0.0), Vector3::y())
            .map(|hit| SnapCandidate {
                point: hit,
                normal: -Vector3::y(),
                surface: Surface::Roof,
            })
    }
}
