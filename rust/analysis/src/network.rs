// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The room network: a graph of rooms, their adjacency, and contained items.
//!
//! Built from a serialized floorplan snapshot, never from the live model.
//! The build is pure and deterministic for a given document and always
//! rebuilds the whole graph; there is no incremental update.
//!
//! - **Nodes** are rooms (and the items assigned to them).
//! - **Edges** connect rooms sharing at least 2 corner ids — a shared wall
//!   segment, not just a touching vertex. Edges are emitted in both
//!   directions for undirected consumers.

use nalgebra::Point2;
use serde::Serialize;
use tracing::debug;

use maru_geometry::{point_in_polygon, polygon_area};
use maru_model::SerializedDocument;

/// A room node in the network.
#[derive(Debug, Clone, Serialize)]
pub struct RoomNode {
    /// The room's identity: its comma-joined corner-id key.
    pub id: String,
    pub name: String,
    /// Area in square meters, rounded to one decimal.
    pub area: f64,
    pub corner_ids: Vec<String>,
}

/// An item node, assigned to the first room containing its position.
#[derive(Debug, Clone, Serialize)]
pub struct ItemNode {
    pub id: String,
    /// Display name: the item file stem with underscores as spaces.
    pub name: String,
    pub room_id: String,
}

/// A directed adjacency edge between two rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// The full derived graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomNetwork {
    pub rooms: Vec<RoomNode>,
    pub items: Vec<ItemNode>,
    pub edges: Vec<Edge>,
}

impl RoomNetwork {
    /// Returns `true` if the two rooms are connected (in either direction).
    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        self.edges.iter().any(|e| e.from == a && e.to == b)
    }

    /// Ids of rooms adjacent to the given room.
    pub fn neighbors(&self, room_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.from == room_id)
            .map(|e| e.to.as_str())
            .collect()
    }

    /// Items assigned to the given room.
    pub fn items_in(&self, room_id: &str) -> Vec<&ItemNode> {
        self.items
            .iter()
            .filter(|i| i.room_id == room_id)
            .collect()
    }
}

/// Scale applied to item coordinates before room containment tests, derived
/// from the document's floorplan units.
pub(crate) fn item_unit_scale(units: &str) -> f64 {
    if units == "m" {
        0.01
    } else {
        1.0
    }
}

/// Resolves a room key's corner ids against the document's corner map,
/// keeping only corners that exist.
pub(crate) fn resolve_polygon(
    doc: &SerializedDocument,
    corner_ids: &[String],
) -> Vec<Point2<f64>> {
    corner_ids
        .iter()
        .filter_map(|id| doc.floorplanner.corners.get(id))
        .map(|c| Point2::new(c.x, c.y))
        .collect()
}

/// Builds the room network from a serialized floorplan.
pub fn build_room_network(doc: &SerializedDocument) -> RoomNetwork {
    let mut network = RoomNetwork::default();

    // Rooms. A room needs at least 3 resolvable corners; rooms that lost
    // corners below that are dropped, not an error.
    for (key, meta) in &doc.floorplanner.rooms {
        let corner_ids: Vec<String> =
            key.split(',').map(|s| s.trim().to_string()).collect();
        let polygon = resolve_polygon(doc, &corner_ids);
        if polygon.len() < 3 {
            debug!(room = %key, "dropping room with fewer than 3 valid corners");
            continue;
        }

        let area = polygon_area(&polygon);
        network.rooms.push(RoomNode {
            id: key.clone(),
            name: meta.name.clone().unwrap_or_else(|| key.clone()),
            area: (area * 10.0).round() / 10.0,
            corner_ids,
        });
    }

    // Adjacency: pairwise shared-corner count. Quadratic in the room count,
    // which stays tiny for real plans.
    for i in 0..network.rooms.len() {
        for j in (i + 1)..network.rooms.len() {
            let (a, b) = (&network.rooms[i], &network.rooms[j]);
            let shared = a
                .corner_ids
                .iter()
                .filter(|id| b.corner_ids.contains(id))
                .count();
            if shared >= 2 {
                network.edges.push(Edge {
                    from: a.id.clone(),
                    to: b.id.clone(),
                });
                network.edges.push(Edge {
                    from: b.id.clone(),
                    to: a.id.clone(),
                });
            }
        }
    }

    // Items: first room whose polygon contains the scaled (x, z) position
    // wins; items outside every room are not part of the network.
    for assigned in assign_items(doc, &network.rooms) {
        network.items.push(ItemNode {
            name: display_name(&assigned.id),
            id: assigned.id,
            room_id: network.rooms[assigned.room_index].id.clone(),
        });
    }

    network
}

/// An item resolved to its containing room, with its scaled plan position.
#[derive(Debug, Clone)]
pub(crate) struct AssignedItem {
    pub room_index: usize,
    pub id: String,
    /// Position in floorplan units (meters), projected to the plan.
    pub position: Point2<f64>,
}

/// Assigns each item to the first room containing its scaled (x, z)
/// position, in room order. Ties from overlapping rooms are not detected;
/// first match wins.
pub(crate) fn assign_items(doc: &SerializedDocument, rooms: &[RoomNode]) -> Vec<AssignedItem> {
    let scale = item_unit_scale(&doc.floorplanner.units);
    let mut assigned = Vec::new();

    for (idx, item) in doc.items.iter().enumerate() {
        let point = Point2::new(item.position[0] * scale, item.position[2] * scale);

        for (room_index, room) in rooms.iter().enumerate() {
            let polygon = resolve_polygon(doc, &room.corner_ids);
            if point_in_polygon(point, &polygon) {
                let id = if item.item_name.is_empty() {
                    format!("item_{idx}")
                } else {
                    item.item_name.clone()
                };
                assigned.push(AssignedItem {
                    room_index,
                    id,
                    position: point,
                });
                break;
            }
        }
    }
    assigned
}

/// Display name of an item: the file stem with underscores as spaces.
pub(crate) fn display_name(item_name: &str) -> String {
    item_name
        .split('.')
        .next()
        .unwrap_or(item_name)
        .replace('_', " ")
}
