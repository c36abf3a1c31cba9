// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial index for tolerance-based corner lookup.
//!
//! A grid-based spatial hash over the plan's 2D corners. Adding or dragging
//! a corner close to an existing one merges the two, which is what keeps the
//! wall graph connected while sketching; the index makes that lookup O(1)
//! on average instead of a scan over all corners.

use nalgebra::Point2;
use rustc_hash::FxHashMap;

use super::corner::CornerId;

/// A spatial hash grid over corner positions.
///
/// The grid divides the plan into square cells of side `cell_size`. Lookups
/// check the 3x3 neighborhood around the query cell, so the query tolerance
/// should be <= `cell_size`.
#[derive(Debug, Default)]
pub struct CornerIndex {
    cell_size: f64,
    grid: FxHashMap<(i64, i64), Vec<CornerId>>,
}

impl CornerIndex {
    /// Creates an empty index with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            grid: FxHashMap::default(),
        }
    }

    fn cell_coords(&self, p: Point2<f64>) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Inserts a corner id at the given position.
    pub fn insert(&mut self, id: CornerId, p: Point2<f64>) {
        let cell = self.cell_coords(p);
        self.grid.entry(cell).or_default().push(id);
    }

    /// Removes a corner id previously inserted at `p`.
    pub fn remove(&mut self, id: &str, p: Point2<f64>) {
        let cell = self.cell_coords(p);
        if let Some(ids) = self.grid.get_mut(&cell) {
            ids.retain(|c| c != id);
            if ids.is_empty() {
                self.grid.remove(&cell);
            }
        }
    }

    /// Finds a corner within `tolerance` of `p`, resolving positions through
    /// `position_of`. Returns the closest match.
    pub fn find_near<F>(
        &self,
        p: Point2<f64>,
        tolerance: f64,
        position_of: F,
    ) -> Option<CornerId>
    where
        F: Fn(&str) -> Option<Point2<f64>>,
    {
        let (cx, cy) = self.cell_coords(p);
        let tol_sq = tolerance * tolerance;
        let mut best: Option<(f64, &CornerId)> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.grid.get(&(cx + dx, cy + dy)) {
                    for id in ids {
                        if let Some(q) = position_of(id) {
                            let dist_sq = (q - p).norm_squared();
                            if dist_sq <= tol_sq
                                && best.map_or(true, |(bd, _)| dist_sq < bd)
                            {
                                best = Some((dist_sq, id));
                            }
                        }
                    }
                }
            }
        }

        best.map(|(_, id)| id.clone())
    }
}
