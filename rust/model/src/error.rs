// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model operations.
//!
//! Mutation errors are synchronous and returned before any change event is
//! emitted; a failed operation leaves the model untouched. Asset problems are
//! never errors here — they surface as warning events and log lines.

use crate::floorplan::CornerId;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during model operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A serialized document or item metadata failed boundary validation.
    /// Callers are expected to fall back to the default plan.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Attempt to delete a corner still referenced by walls without cascade.
    #[error("corner {id} is still referenced by {walls} wall(s)")]
    CornerReferenced { id: CornerId, walls: usize },

    /// Corner id not present in the floorplan.
    #[error("corner not found: {0}")]
    CornerNotFound(CornerId),

    /// Wall key not present in the floorplan.
    #[error("wall not found")]
    WallNotFound,

    /// A wall between the same pair of corners already exists.
    #[error("duplicate wall between {0} and {1}")]
    DuplicateWall(CornerId, CornerId),

    /// Item key not present in the model.
    #[error("item not found")]
    ItemNotFound,
}
