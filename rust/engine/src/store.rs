// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistence boundary.
//!
//! The engine does not know where documents live; hosts implement
//! [`FloorplanStore`] over their database or file storage. Failures surface
//! as a generic storage error and the caller decides what to do — a failed
//! load at the facade level degrades to the default plan.

use rustc_hash::FxHashMap;

use maru_model::SerializedDocument;

use crate::error::StorageError;

/// Host-implemented document storage.
pub trait FloorplanStore {
    /// Persists a document, returning its id.
    fn save(&mut self, doc: &SerializedDocument) -> Result<String, StorageError>;

    /// Loads a document by id.
    fn load(&self, id: &str) -> Result<SerializedDocument, StorageError>;
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: FxHashMap<String, String>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FloorplanStore for MemoryStore {
    fn save(&mut self, doc: &SerializedDocument) -> Result<String, StorageError> {
        let json =
            serde_json::to_string(doc).map_err(|e| StorageError::Failure(e.to_string()))?;
        self.next_id += 1;
        let id = format!("fp-{}", self.next_id);
        self.documents.insert(id.clone(), json);
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<SerializedDocument, StorageError> {
        let json = self
            .documents
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        serde_json::from_str(json).map_err(|e| StorageError::Failure(e.to_string()))
    }
}
