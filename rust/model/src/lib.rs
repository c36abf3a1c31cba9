// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Maru Model
//!
//! The floorplan data model at the heart of the design tool: corners, walls,
//! derived rooms, placed furnishing items, type-specific snapping, and the
//! versioned wire document.
//!
//! The model is the single source of truth. Views subscribe to its event
//! queue and re-derive everything; the analysis layer consumes only the
//! exported serialization. All model mutation is synchronous and validated
//! before any event is emitted.
//!
//! ## Units
//!
//! Floorplan geometry (corners, walls, rooms) is meters. Item world
//! positions are centimeters with y up. Every containment test of an item
//! against floorplan geometry scales by [`Config::item_unit_scale`].

pub mod config;
pub mod error;
pub mod events;
pub mod floorplan;
pub mod item;
pub mod model;
pub mod serialize;
pub mod snap;

pub use config::{Config, DimUnit};
pub use error::{Error, Result};
pub use events::ModelEvent;
pub use floorplan::{
    room_key, Corner, CornerId, Floorplan, FloorplanEvent, Room, Side, Wall, WallEdge, WallKey,
    UNNAMED_ROOM,
};
pub use item::{Item, ItemKey, ItemKind, ItemType, TextureOverride};
pub use model::{ItemMetadata, Model};
pub use serialize::{
    SerializedCorner, SerializedDocument, SerializedFloorplanner, SerializedRoomMeta,
    SerializedWall, DOCUMENT_VERSION,
};
pub use snap::{point_in_any_room, snap_to_point, Snap, SnapCandidate, Surface};
