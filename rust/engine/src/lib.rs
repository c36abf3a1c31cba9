// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Maru Engine
//!
//! The stable facade over the floorplan model and its viewers: the entry
//! point hosts embed. It also carries the two host boundaries that sit
//! outside the CAD core — the AI tool-call action surface and the
//! persistence trait.

pub mod actions;
pub mod designer;
pub mod error;
pub mod store;

pub use actions::{execute_action, execute_action_json, furniture_metadata, ActionRequest};
pub use designer::{ActiveView, Designer};
pub use error::{Error, Result, StorageError};
pub use store::{FloorplanStore, MemoryStore};
