// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine-level errors.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the facade boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The AI action boundary received an action this engine does not
    /// implement.
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    /// An action payload failed to parse.
    #[error("malformed action payload: {0}")]
    MalformedAction(String),

    #[error(transparent)]
    Model(#[from] maru_model::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Generic persistence failure; the caller decides retry or rollback.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage failure: {0}")]
    Failure(String),

    #[error("document not found: {0}")]
    NotFound(String),
}
