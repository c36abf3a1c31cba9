// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quantitative plan metrics and similarity scoring.
//!
//! This is the metric-extraction boundary consumed by the blueprint
//! suggestion service: room names are classified through fixed
//! Korean-language keyword sets, rooms below a small area threshold are
//! ignored as digitization noise, and two metric sets can be compared into a
//! weighted 0-100 similarity score.

use serde::{Deserialize, Serialize};
use tracing::debug;

use maru_geometry::polygon_area;
use maru_model::SerializedDocument;

use crate::network::resolve_polygon;

/// Rooms below this area are ignored as noise.
const MIN_ROOM_AREA: f64 = 0.1;

/// Quantitative metrics of one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorplanMetrics {
    pub total_area: f64,
    pub room_count: u32,
    /// Living/kitchen area over generic-room area.
    pub living_room_ratio: f64,
    pub bathroom_count: u32,
    pub storage_count: u32,
    pub balcony_count: u32,
}

/// Extracts quantitative metrics from a serialized floorplan.
///
/// Keyword classification: 거실/주방 count toward the living area, 화장실 is
/// a bathroom, 창고/드레스룸 storage, 발코니/베란다 a balcony, and 방 a
/// generic room. Room and bathroom counts are floored at 1 so downstream
/// ratio consumers never divide by zero.
pub fn extract_metrics(doc: &SerializedDocument) -> FloorplanMetrics {
    let mut total_area = 0.0;
    let mut living_area = 0.0;
    let mut other_room_area = 0.0;
    let mut room_count = 0u32;
    let mut bathroom_count = 0u32;
    let mut storage_count = 0u32;
    let mut balcony_count = 0u32;

    for (key, meta) in &doc.floorplanner.rooms {
        let name = meta.name.as_deref().unwrap_or("");
        let corner_ids: Vec<String> =
            key.split(',').map(|s| s.trim().to_string()).collect();
        let polygon = resolve_polygon(doc, &corner_ids);
        let area = polygon_area(&polygon);

        if area < MIN_ROOM_AREA {
            debug!(room = %name, area, "ignoring sub-threshold room");
            continue;
        }

        total_area += area;

        if name.contains("거실") || name.contains("주방") {
            living_area += area;
        } else if name.contains("화장실") {
            bathroom_count += 1;
        } else if name.contains("창고") || name.contains("드레스룸") {
            storage_count += 1;
        } else if name.contains("발코니") || name.contains("베란다") {
            balcony_count += 1;
        } else if name.contains("방") {
            room_count += 1;
            other_room_area += area;
        }
    }

    room_count = room_count.max(1);
    bathroom_count = bathroom_count.max(1);

    let living_room_ratio = if other_room_area > 0.0 {
        living_area / other_room_area
    } else {
        // No generic rooms: treat the denominator as one area unit.
        living_area
    };

    FloorplanMetrics {
        total_area: (total_area * 100.0).round() / 100.0,
        room_count,
        living_room_ratio: (living_room_ratio * 1000.0).round() / 1000.0,
        bathroom_count,
        storage_count,
        balcony_count,
    }
}

/// Weighted similarity between a user's desired metrics and a candidate
/// plan's metrics, as a percentage (0-100).
///
/// Weights: total area 25, room count 20, living-room ratio 20, bathrooms
/// 15, storage 10, balconies 10. Each factor scores its full weight inside
/// the tightest band and decays through fixed steps.
pub fn calculate_similarity_score(
    user: &FloorplanMetrics,
    candidate: &FloorplanMetrics,
) -> u32 {
    let mut score = 0.0;
    let mut total_weight = 0.0;

    const AREA_WEIGHT: f64 = 25.0;
    const ROOM_WEIGHT: f64 = 20.0;
    const RATIO_WEIGHT: f64 = 20.0;
    const BATHROOM_WEIGHT: f64 = 15.0;
    const STORAGE_WEIGHT: f64 = 10.0;
    const BALCONY_WEIGHT: f64 = 10.0;

    let area_diff = (user.total_area - candidate.total_area).abs();
    score += if area_diff <= 5.0 {
        AREA_WEIGHT
    } else if area_diff <= 10.0 {
        AREA_WEIGHT * 0.8
    } else if area_diff <= 20.0 {
        AREA_WEIGHT * 0.5
    } else if area_diff <= 50.0 {
        AREA_WEIGHT * 0.3
    } else {
        AREA_WEIGHT * (1.0 - (area_diff / 100.0).min(1.0))
    };
    total_weight += AREA_WEIGHT;

    let room_diff = user.room_count.abs_diff(candidate.room_count);
    score += match room_diff {
        0 => ROOM_WEIGHT,
        1 => ROOM_WEIGHT * 0.7,
        2 => ROOM_WEIGHT * 0.3,
        _ => 0.0,
    };
    total_weight += ROOM_WEIGHT;

    let ratio_diff = (user.living_room_ratio - candidate.living_room_ratio).abs();
    score += if ratio_diff <= 0.05 {
        RATIO_WEIGHT
    } else if ratio_diff <= 0.1 {
        RATIO_WEIGHT * 0.8
    } else if ratio_diff <= 0.2 {
        RATIO_WEIGHT * 0.5
    } else {
        RATIO_WEIGHT * (1.0 - (ratio_diff / 0.5).min(1.0))
    };
    total_weight += RATIO_WEIGHT;

    let bathroom_diff = user.bathroom_count.abs_diff(candidate.bathroom_count);
    score += match bathroom_diff {
        0 => BATHROOM_WEIGHT,
        1 => BATHROOM_WEIGHT * 0.5,
        _ => 0.0,
    };
    total_weight += BATHROOM_WEIGHT;

    let storage_diff = user.storage_count.abs_diff(candidate.storage_count);
    score += match storage_diff {
        0 => STORAGE_WEIGHT,
        1 => STORAGE_WEIGHT * 0.5,
        _ => 0.0,
    };
    total_weight += STORAGE_WEIGHT;

    let balcony_diff = user.balcony_count.abs_diff(candidate.balcony_count);
    score += match balcony_diff {
        0 => BALCONY_WEIGHT,
        1 => BALCONY_WEIGHT * 0.5,
        _ => 0.0,
    };
    total_weight += BALCONY_WEIGHT;

    ((score / total_weight) * 100.0).round() as u32
}
