// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The floorplan: corners, walls, and the rooms derived from them.
//!
//! The floorplan owns the wall graph and exposes the only mutation API for
//! it. Rooms are recomputed from the graph's enclosed cycles after every
//! topology change; room names survive recomputation through a side table
//! keyed by the room's sorted-corner-id identity.

mod corner;
mod cycles;
mod room;
mod spatial;
mod wall;

pub use corner::{Corner, CornerId};
pub use room::{room_key, Room, UNNAMED_ROOM};
pub use wall::{Side, Wall, WallEdge, WallKey};

use nalgebra::Point2;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};

/// A change notification emitted by floorplan mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorplanEvent {
    WallsChanged,
    RoomsChanged,
}

/// Owner of the wall graph and its derived rooms.
#[derive(Debug)]
pub struct Floorplan {
    corners: FxHashMap<CornerId, Corner>,
    walls: SlotMap<WallKey, Wall>,
    rooms: Vec<Room>,
    /// Room display names, keyed by room identity. Survives recomputation.
    room_names: FxHashMap<String, String>,
    corner_index: spatial::CornerIndex,
    events: Vec<FloorplanEvent>,
    config: Config,
}

impl Floorplan {
    /// Creates an empty floorplan.
    pub fn new(config: Config) -> Self {
        Self {
            corners: FxHashMap::default(),
            walls: SlotMap::with_key(),
            rooms: Vec::new(),
            room_names: FxHashMap::default(),
            corner_index: spatial::CornerIndex::new(config.corner_snap_tolerance.max(0.01)),
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- Corner operations ---

    /// Adds a corner at `(x, y)` meters, or merges with an existing corner
    /// within the snap tolerance. Returns the id of the corner the caller
    /// should reference.
    pub fn add_corner(&mut self, x: f64, y: f64) -> CornerId {
        let p = Point2::new(x, y);
        if let Some(existing) = self.corner_index.find_near(
            p,
            self.config.corner_snap_tolerance,
            |id| self.corners.get(id).map(Corner::position),
        ) {
            return existing;
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.insert_corner(Corner {
            id: id.clone(),
            x,
            y,
            elevation: self.config.default_elevation,
        });
        id
    }

    /// Inserts a corner with a caller-provided id (deserialization path).
    pub(crate) fn insert_corner(&mut self, corner: Corner) {
        self.corner_index
            .insert(corner.id.clone(), corner.position());
        self.corners.insert(corner.id.clone(), corner);
    }

    /// Moves a corner and recomputes the derived rooms.
    pub fn move_corner(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let corner = self
            .corners
            .get_mut(id)
            .ok_or_else(|| Error::CornerNotFound(id.to_string()))?;
        self.corner_index.remove(id, corner.position());
        corner.x = x;
        corner.y = y;
        self.corner_index.insert(id.to_string(), corner.position());

        self.events.push(FloorplanEvent::WallsChanged);
        self.update_rooms();
        Ok(())
    }

    /// Removes a corner.
    ///
    /// Fails with a referential error if any wall still references the
    /// corner, unless `cascade` is set, in which case the attached walls are
    /// removed first.
    pub fn remove_corner(&mut self, id: &str, cascade: bool) -> Result<()> {
        if !self.corners.contains_key(id) {
            return Err(Error::CornerNotFound(id.to_string()));
        }

        let attached: SmallVec<[WallKey; 4]> = self
            .walls
            .iter()
            .filter(|(_, w)| w.references(id))
            .map(|(k, _)| k)
            .collect();

        if !attached.is_empty() {
            if !cascade {
                return Err(Error::CornerReferenced {
                    id: id.to_string(),
                    walls: attached.len(),
                });
            }
            for key in attached {
                self.walls.remove(key);
            }
        }

        let corner = self.corners.remove(id).expect("checked above");
        self.corner_index.remove(id, corner.position());

        self.events.push(FloorplanEvent::WallsChanged);
        self.update_rooms();
        Ok(())
    }

    pub fn corner(&self, id: &str) -> Option<&Corner> {
        self.corners.get(id)
    }

    pub fn corners(&self) -> impl Iterator<Item = &Corner> {
        self.corners.values()
    }

    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    /// Number of walls attached to a corner.
    pub fn attached_wall_count(&self, id: &str) -> usize {
        self.walls.values().filter(|w| w.references(id)).count()
    }

    /// Number of rooms whose boundary contains the corner.
    pub fn attached_room_count(&self, id: &str) -> usize {
        self.rooms
            .iter()
            .filter(|r| r.corner_ids.iter().any(|c| c == id))
            .count()
    }

    // --- Wall operations ---

    /// Adds a wall between two existing corners.
    pub fn add_wall(&mut self, corner1: &str, corner2: &str) -> Result<WallKey> {
        if !self.corners.contains_key(corner1) {
            return Err(Error::CornerNotFound(corner1.to_string()));
        }
        if !self.corners.contains_key(corner2) {
            return Err(Error::CornerNotFound(corner2.to_string()));
        }
        if corner1 == corner2 {
            return Err(Error::Validation(
                "wall endpoints must be distinct corners".to_string(),
            ));
        }
        let duplicate = self.walls.values().any(|w| {
            (w.corner1 == corner1 && w.corner2 == corner2)
                || (w.corner1 == corner2 && w.corner2 == corner1)
        });
        if duplicate {
            return Err(Error::DuplicateWall(
                corner1.to_string(),
                corner2.to_string(),
            ));
        }

        let elevation = self.config.default_elevation;
        let key = self.walls.insert(Wall {
            corner1: corner1.to_string(),
            corner2: corner2.to_string(),
            thickness: self.config.default_wall_thickness,
            start_elevation: elevation,
            end_elevation: elevation,
        });

        self.events.push(FloorplanEvent::WallsChanged);
        self.update_rooms();
        Ok(key)
    }

    pub(crate) fn insert_wall(&mut self, wall: Wall) -> WallKey {
        self.walls.insert(wall)
    }

    /// Removes a wall.
    pub fn remove_wall(&mut self, key: WallKey) -> Result<()> {
        self.walls.remove(key).ok_or(Error::WallNotFound)?;
        self.events.push(FloorplanEvent::WallsChanged);
        self.update_rooms();
        Ok(())
    }

    /// Splits a wall at `(x, y)`: the wall is replaced by two walls joined
    /// at a new corner. Returns the new corner's id.
    pub fn split_wall(&mut self, key: WallKey, x: f64, y: f64) -> Result<CornerId> {
        let wall = self.walls.remove(key).ok_or(Error::WallNotFound)?;

        let id = uuid::Uuid::new_v4().to_string();
        self.insert_corner(Corner {
            id: id.clone(),
            x,
            y,
            elevation: self.config.default_elevation,
        });

        self.walls.insert(Wall {
            corner1: wall.corner1.clone(),
            corner2: id.clone(),
            ..wall.clone()
        });
        self.walls.insert(Wall {
            corner1: id.clone(),
            corner2: wall.corner2.clone(),
            thickness: wall.thickness,
            start_elevation: wall.start_elevation,
            end_elevation: wall.end_elevation,
        });

        self.events.push(FloorplanEvent::WallsChanged);
        self.update_rooms();
        Ok(id)
    }

    /// Merges pairs of collinear walls that meet at a degree-2 corner,
    /// removing the corner. Returns the number of merges performed.
    pub fn merge_collinear_walls(&mut self) -> usize {
        let mut merges = 0;

        loop {
            let candidate = self.find_collinear_junction();
            let Some((corner_id, key_a, key_b)) = candidate else {
                break;
            };

            let wall_a = self.walls.remove(key_a).expect("key from scan");
            let wall_b = self.walls.remove(key_b).expect("key from scan");

            let far_a = if wall_a.corner1 == corner_id {
                wall_a.corner2.clone()
            } else {
                wall_a.corner1.clone()
            };
            let far_b = if wall_b.corner1 == corner_id {
                wall_b.corner2.clone()
            } else {
                wall_b.corner1.clone()
            };

            self.walls.insert(Wall {
                corner1: far_a,
                corner2: far_b,
                thickness: wall_a.thickness,
                start_elevation: wall_a.start_elevation,
                end_elevation: wall_b.end_elevation,
            });

            if let Some(corner) = self.corners.remove(&corner_id) {
                self.corner_index.remove(&corner_id, corner.position());
            }
            merges += 1;
        }

        if merges > 0 {
            self.events.push(FloorplanEvent::WallsChanged);
            self.update_rooms();
        }
        merges
    }

    fn find_collinear_junction(&self) -> Option<(CornerId, WallKey, WallKey)> {
        for corner in self.corners.values() {
            let attached: SmallVec<[(WallKey, &Wall); 4]> = self
                .walls
                .iter()
                .filter(|(_, w)| w.references(&corner.id))
                .collect();
            if attached.len() != 2 {
                continue;
            }

            let dir_of = |wall: &Wall| -> Option<nalgebra::Vector2<f64>> {
                let far = if wall.corner1 == corner.id {
                    &wall.corner2
                } else {
                    &wall.corner1
                };
                let far = self.corners.get(far)?;
                let d = far.position() - corner.position();
                let len = d.norm();
                (len > 1e-12).then(|| d / len)
            };

            let Some(da) = dir_of(attached[0].1) else { continue };
            let Some(db) = dir_of(attached[1].1) else { continue };
            // Opposite directions within tolerance = straight line through
            // the corner.
            let cross = da.x * db.y - da.y * db.x;
            if cross.abs() < 1e-6 && da.dot(&db) < 0.0 {
                return Some((corner.id.clone(), attached[0].0, attached[1].0));
            }
        }
        None
    }

    pub fn wall(&self, key: WallKey) -> Option<&Wall> {
        self.walls.get(key)
    }

    pub fn walls(&self) -> impl Iterator<Item = (WallKey, &Wall)> {
        self.walls.iter()
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Both directional faces of every wall, for snapping and 3D meshing.
    pub fn wall_edges(&self) -> Vec<WallEdge> {
        let mut edges = Vec::with_capacity(self.walls.len() * 2);
        for (key, wall) in &self.walls {
            let (Some(c1), Some(c2)) =
                (self.corners.get(&wall.corner1), self.corners.get(&wall.corner2))
            else {
                continue;
            };
            if let Some(pair) = WallEdge::pair(key, wall, c1.position(), c2.position()) {
                edges.extend(pair);
            }
        }
        edges
    }

    /// The directional face of one wall.
    pub fn wall_edge(&self, key: WallKey, side: Side) -> Option<WallEdge> {
        let wall = self.walls.get(key)?;
        let c1 = self.corners.get(&wall.corner1)?;
        let c2 = self.corners.get(&wall.corner2)?;
        WallEdge::pair(key, wall, c1.position(), c2.position())?
            .into_iter()
            .find(|e| e.side == side)
    }

    // --- Rooms ---

    /// Recomputes rooms from the wall graph's enclosed cycles.
    ///
    /// Existing names are reused by room identity; newly enclosed cycles are
    /// unnamed. Deterministic: rooms are sorted by identity key.
    pub fn update_rooms(&mut self) {
        let positions: FxHashMap<CornerId, Point2<f64>> = self
            .corners
            .values()
            .map(|c| (c.id.clone(), c.position()))
            .collect();
        let wall_pairs: Vec<(CornerId, CornerId)> = self
            .walls
            .values()
            .map(|w| (w.corner1.clone(), w.corner2.clone()))
            .collect();

        let mut rooms: Vec<Room> = cycles::find_enclosed_cycles(&positions, &wall_pairs)
            .into_iter()
            .map(|corner_ids| {
                let polygon = corner_ids.iter().map(|id| positions[id]).collect();
                let key = room_key(&corner_ids);
                let name = self
                    .room_names
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| UNNAMED_ROOM.to_string());
                Room::new(corner_ids, polygon, name)
            })
            .collect();
        rooms.sort_by(|a, b| a.key.cmp(&b.key));

        let changed = rooms.len() != self.rooms.len()
            || rooms
                .iter()
                .zip(&self.rooms)
                .any(|(a, b)| a.key != b.key);
        self.rooms = rooms;

        if changed {
            debug!(rooms = self.rooms.len(), "room set recomputed");
            self.events.push(FloorplanEvent::RoomsChanged);
        }
    }

    /// Assigns a display name to the room with the given identity key. The
    /// name sticks across room recomputation as long as the identity holds.
    pub fn assign_room_name(&mut self, room_key: &str, name: &str) {
        self.room_names
            .insert(room_key.to_string(), name.to_string());
        if let Some(room) = self.rooms.iter_mut().find(|r| r.key == room_key) {
            room.name = name.to_string();
            self.events.push(FloorplanEvent::RoomsChanged);
        }
    }

    pub(crate) fn set_room_names(&mut self, names: FxHashMap<String, String>) {
        self.room_names = names;
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Drains queued change notifications.
    pub fn drain_events(&mut self) -> Vec<FloorplanEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replaces the whole wall graph (deserialization path). The caller is
    /// responsible for recomputing rooms afterwards.
    pub(crate) fn clear(&mut self) {
        self.corners.clear();
        self.walls.clear();
        self.rooms.clear();
        self.room_names.clear();
        self.corner_index = spatial::CornerIndex::new(self.config.corner_snap_tolerance.max(0.01));
        self.events.clear();
    }
}
