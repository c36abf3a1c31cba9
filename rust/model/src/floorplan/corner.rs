// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Corners: the shared 2D points of the wall graph.

use nalgebra::Point2;

/// Stable string id of a corner.
///
/// Corner ids are the keys of the serialized document's `corners` map and
/// the components of room identity, so they are plain strings (UUID v4 for
/// corners created in-process).
pub type CornerId = String;

/// A 2D point of the wall graph, in meters.
///
/// Corners are owned by the floorplan and referenced by walls and rooms by
/// id (weak reference): deleting a corner first validates that no wall still
/// points at it, unless the caller asks for a cascade.
#[derive(Debug, Clone)]
pub struct Corner {
    pub id: CornerId,
    pub x: f64,
    pub y: f64,
    /// Wall height at this corner, in meters.
    pub elevation: f64,
}

impl Corner {
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}
