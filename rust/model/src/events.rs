// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model change notifications.
//!
//! The model is the single source of truth; every successful mutation pushes
//! an event onto its queue. The engine drains the queue and fans each event
//! out to both view synchronizers, which re-derive their visual state. Views
//! are rebuilt from events, never patched incrementally, so they can be
//! disposed and reconstructed at any time.

use crate::item::ItemKey;

/// A change notification emitted by the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// An item was created (manually or via the AI action boundary).
    ItemAdded(ItemKey),
    /// An item was removed; views must dispose its derived representation.
    ItemRemoved(ItemKey),
    /// An item's position, rotation, scale, or size changed.
    ItemUpdated(ItemKey),
    /// Wall topology changed (corner/wall added, removed, moved, or split).
    WallsChanged,
    /// The derived room set changed.
    RoomsChanged,
    /// A serialized document replaced the whole model state.
    Loaded,
    /// An item exists but cannot load a visual asset (e.g. missing model
    /// URL). Informational; the item stays in the model.
    AssetWarning { item: ItemKey, reason: String },
}
