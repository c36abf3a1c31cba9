// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.
//!
//! One explicit struct threaded through the constructors of the model and
//! both viewers. Floorplan geometry (corners, walls, rooms) lives in meters;
//! item world coordinates live in centimeters, so every containment test of
//! an item position against floorplan geometry multiplies by
//! [`Config::item_unit_scale`].

/// Display unit for dimension labels in the plan view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimUnit {
    Meter,
    Centimeter,
}

impl DimUnit {
    /// Returns the unit suffix used in dimension labels.
    pub fn suffix(&self) -> &'static str {
        match self {
            DimUnit::Meter => "m",
            DimUnit::Centimeter => "cm",
        }
    }
}

/// Configuration shared by the model, the viewers, and the drag controller.
#[derive(Debug, Clone)]
pub struct Config {
    /// Display unit for dimension labels.
    pub dim_unit: DimUnit,
    /// Camera distance bound in world units (centimeters).
    pub view_bounds: f64,
    /// Wall thickness applied to new walls, in meters.
    pub default_wall_thickness: f64,
    /// Wall elevation applied to new corners/walls, in meters.
    pub default_elevation: f64,
    /// New corners within this distance of an existing corner merge with it,
    /// in meters.
    pub corner_snap_tolerance: f64,
    /// When enabled, floor items resolve footprint collisions against each
    /// other during snapping.
    pub snap_3d_enabled: bool,
    /// Distance from a wall below which an item counts as "near wall" in the
    /// analysis layer, in meters.
    pub wall_proximity_threshold: f64,
    /// Scale from floorplan meters to item world centimeters.
    pub plan_to_world: f64,
}

impl Config {
    /// Scale applied to an item world coordinate before comparing it against
    /// floorplan geometry (centimeters to meters).
    pub fn item_unit_scale(&self) -> f64 {
        1.0 / self.plan_to_world
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dim_unit: DimUnit::Centimeter,
            view_bounds: 7500.0,
            default_wall_thickness: 0.1,
            default_elevation: 2.5,
            corner_snap_tolerance: 0.25,
            snap_3d_enabled: true,
            wall_proximity_threshold: 0.5,
            plan_to_world: 100.0,
        }
    }
}
