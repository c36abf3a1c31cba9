// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Staged wall construction: a cancelable cooperative task.
//!
//! Rebuilding the 3D walls after a topology change is spread over many
//! small steps so the render loop stays responsive: exterior walls first
//! (they bound the plan and drive camera framing), then interior walls one
//! per step. Progress runs 0-20% through the exterior stage and 20-100%
//! through the interior stage; completion is its own terminal step.
//!
//! Every build carries the generation it was started for. A topology edit
//! bumps the view's generation, and the next `advance` of a stale build
//! yields `Cancelled` instead of racing the rebuild that replaced it.

use maru_model::{Model, Side, WallKey};

/// One piece of wall geometry to realize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPiece {
    pub wall: WallKey,
    pub side: Side,
}

/// The outcome of one build step.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildStep {
    /// A wall face was built; progress is 0-100.
    Progress { piece: WallPiece, progress: f32 },
    /// All pieces are built. Terminal.
    Completed,
    /// The build was invalidated by a newer topology generation. Terminal.
    Cancelled,
}

/// A staged wall build over the model's current wall edges.
#[derive(Debug)]
pub struct StagedBuild {
    exterior: Vec<WallPiece>,
    interior: Vec<WallPiece>,
    cursor: usize,
    generation: u64,
    done: bool,
}

impl StagedBuild {
    /// Plans a build from the model's current topology.
    ///
    /// A wall edge is exterior when either of its corners is attached to
    /// fewer than two rooms.
    pub fn new(model: &Model, generation: u64) -> Self {
        let floorplan = model.floorplan();
        let mut exterior = Vec::new();
        let mut interior = Vec::new();

        for edge in floorplan.wall_edges() {
            let Some(wall) = floorplan.wall(edge.wall) else {
                continue;
            };
            let piece = WallPiece {
                wall: edge.wall,
                side: edge.side,
            };
            let is_exterior = floorplan.attached_room_count(&wall.corner1) < 2
                || floorplan.attached_room_count(&wall.corner2) < 2;
            if is_exterior {
                exterior.push(piece);
            } else {
                interior.push(piece);
            }
        }

        Self {
            exterior,
            interior,
            cursor: 0,
            generation,
            done: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total pieces planned.
    pub fn len(&self) -> usize {
        self.exterior.len() + self.interior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs one cooperative step. Returns `None` once a terminal step
    /// (`Completed` or `Cancelled`) has been yielded.
    pub fn advance(&mut self, current_generation: u64) -> Option<BuildStep> {
        if self.done {
            return None;
        }

        if self.generation != current_generation {
            self.done = true;
            return Some(BuildStep::Cancelled);
        }

        let total = self.len();
        if self.cursor >= total {
            self.done = true;
            return Some(BuildStep::Completed);
        }

        let (piece, progress) = if self.cursor < self.exterior.len() {
            let built = self.cursor + 1;
            (
                self.exterior[self.cursor],
                (built as f32 / self.exterior.len() as f32) * 20.0,
            )
        } else {
            let inner_index = self.cursor - self.exterior.len();
            let built = inner_index + 1;
            (
                self.interior[inner_index],
                20.0 + (built as f32 / self.interior.len() as f32) * 80.0,
            )
        };

        self.cursor += 1;
        Some(BuildStep::Progress { piece, progress })
    }
}
