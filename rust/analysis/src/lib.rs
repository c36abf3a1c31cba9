// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Maru Analysis
//!
//! Room-network analysis and diff engine.
//!
//! Everything in this crate is a pure, stateless derivation over a
//! serialized floorplan snapshot: the room adjacency graph with item
//! assignment, the simplified per-room summary handed to the recommendation
//! layer, structural diffs between two snapshots, and quantitative metrics
//! with similarity scoring.
//!
//! Item positions arrive in centimeters while floorplan geometry is meters;
//! the unit scale (0.01 for meter plans) is applied once, where items are
//! tested against room polygons.

pub mod classify;
pub mod diff;
pub mod metrics;
pub mod network;
pub mod simplified;

pub use classify::RoomFunction;
pub use diff::{diff_simplified_room_info, RoomChange, RoomDiff};
pub use metrics::{calculate_similarity_score, extract_metrics, FloorplanMetrics};
pub use network::{build_room_network, Edge, ItemNode, RoomNetwork, RoomNode};
pub use simplified::{
    get_simplified_room_info, NearestNeighbor, Placement, PlanMetrics, PlanSide, SimplifiedItem,
    SimplifiedRoom, SimplifiedRoomInfo, SpaceEfficiency,
};
