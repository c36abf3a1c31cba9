// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simplified room info: the richer derivation handed to the
//! recommendation layer.
//!
//! On top of the plain room network, each item gets a placement
//! classification relative to its room's walls and center, and a
//! nearest-neighbor relation within the room. Aggregate metrics summarize
//! the plan: total area, room count, a public/private area ratio, and a
//! qualitative space-efficiency bucket.

use nalgebra::{Point2, Vector2};
use serde::Serialize;

use maru_geometry::{distance_point_to_segment, polygon_centroid};
use maru_model::SerializedDocument;

use crate::classify::RoomFunction;
use crate::network::{assign_items, build_room_network, display_name, resolve_polygon};

/// Items closer than this to a wall count as "near wall", in floorplan
/// units.
const WALL_PROXIMITY: f64 = 0.5;

/// Items closer than this to the room's area center count as "near center".
const CENTER_PROXIMITY: f64 = 0.5;

/// Compass side of a room or neighbor, on the plan's axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSide {
    North,
    South,
    East,
    West,
}

impl PlanSide {
    /// Classifies a direction vector by its dominant axis.
    fn of(direction: Vector2<f64>) -> Self {
        if direction.x.abs() >= direction.y.abs() {
            if direction.x >= 0.0 {
                PlanSide::East
            } else {
                PlanSide::West
            }
        } else if direction.y >= 0.0 {
            PlanSide::North
        } else {
            PlanSide::South
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanSide::North => "north",
            PlanSide::South => "south",
            PlanSide::East => "east",
            PlanSide::West => "west",
        }
    }
}

/// Where an item sits within its room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Within the wall-proximity threshold of a wall, on the given side of
    /// the room.
    NearWall { side: PlanSide },
    /// Within the center-proximity threshold of the room's area center.
    NearCenter,
    /// Neither near a wall nor near the center.
    AwayFromWalls,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::NearWall { side } => write!(f, "near wall ({})", side.as_str()),
            Placement::NearCenter => f.write_str("near center"),
            Placement::AwayFromWalls => f.write_str("away from walls"),
        }
    }
}

/// The closest other item in the same room.
#[derive(Debug, Clone, Serialize)]
pub struct NearestNeighbor {
    pub name: String,
    /// Euclidean distance in floorplan units, rounded to two decimals.
    pub distance: f64,
    /// Which side of the item the neighbor sits on.
    pub side: PlanSide,
}

/// One item with its in-room placement.
#[derive(Debug, Clone, Serialize)]
pub struct SimplifiedItem {
    pub name: String,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest: Option<NearestNeighbor>,
}

/// One room with its contained items.
#[derive(Debug, Clone, Serialize)]
pub struct SimplifiedRoom {
    pub name: String,
    pub area: f64,
    pub items: Vec<SimplifiedItem>,
}

/// Qualitative bucket from average area per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceEfficiency {
    VeryDense,
    Dense,
    Balanced,
    Spacious,
    VerySpacious,
}

impl SpaceEfficiency {
    fn from_average_area(avg: f64) -> Self {
        if avg < 5.0 {
            SpaceEfficiency::VeryDense
        } else if avg < 10.0 {
            SpaceEfficiency::Dense
        } else if avg < 20.0 {
            SpaceEfficiency::Balanced
        } else if avg < 35.0 {
            SpaceEfficiency::Spacious
        } else {
            SpaceEfficiency::VerySpacious
        }
    }
}

/// Aggregate plan metrics.
#[derive(Debug, Clone, Serialize)]
pub struct PlanMetrics {
    pub total_area: f64,
    pub room_count: usize,
    /// Public (living/kitchen/dining) over private (bedroom/bathroom) area;
    /// defaults to 1.0 when no private rooms exist.
    pub public_private_ratio: f64,
    pub space_efficiency: SpaceEfficiency,
}

/// The full simplified derivation.
#[derive(Debug, Clone, Serialize)]
pub struct SimplifiedRoomInfo {
    pub rooms: Vec<SimplifiedRoom>,
    pub metrics: PlanMetrics,
}

impl SimplifiedRoomInfo {
    /// Serializes for the prompt/tool-calling layer, which embeds the
    /// summary into chat context.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds the simplified room info from a serialized floorplan.
pub fn get_simplified_room_info(doc: &SerializedDocument) -> SimplifiedRoomInfo {
    let network = build_room_network(doc);
    let assigned = assign_items(doc, &network.rooms);

    let rooms: Vec<SimplifiedRoom> = network
        .rooms
        .iter()
        .enumerate()
        .map(|(room_index, room)| {
            let polygon = resolve_polygon(doc, &room.corner_ids);
            let center = polygon_centroid(&polygon);

            let in_room: Vec<_> = assigned
                .iter()
                .filter(|a| a.room_index == room_index)
                .collect();

            let items = in_room
                .iter()
                .map(|a| {
                    let placement = classify_placement(a.position, &polygon, center);
                    let nearest = nearest_neighbor(a.position, &a.id, &in_room);
                    SimplifiedItem {
                        name: display_name(&a.id),
                        placement,
                        nearest,
                    }
                })
                .collect();

            SimplifiedRoom {
                name: room.name.clone(),
                area: room.area,
                items,
            }
        })
        .collect();

    let metrics = compute_metrics(&rooms);
    SimplifiedRoomInfo { rooms, metrics }
}

fn classify_placement(
    position: Point2<f64>,
    polygon: &[Point2<f64>],
    center: Point2<f64>,
) -> Placement {
    let mut min_wall = f64::INFINITY;
    let mut nearest_on_wall = position;
    for i in 0..polygon.len() {
        let j = (i + 1) % polygon.len();
        let d = distance_point_to_segment(position, polygon[i], polygon[j]);
        if d < min_wall {
            min_wall = d;
            nearest_on_wall =
                maru_geometry::closest_point_on_segment(position, polygon[i], polygon[j]);
        }
    }

    if min_wall <= WALL_PROXIMITY {
        Placement::NearWall {
            side: PlanSide::of(nearest_on_wall - center),
        }
    } else if (position - center).norm() <= CENTER_PROXIMITY {
        Placement::NearCenter
    } else {
        Placement::AwayFromWalls
    }
}

fn nearest_neighbor(
    position: Point2<f64>,
    own_id: &str,
    in_room: &[&crate::network::AssignedItem],
) -> Option<NearestNeighbor> {
    in_room
        .iter()
        .filter(|other| other.id != own_id)
        .map(|other| {
            let delta = other.position - position;
            (delta.norm(), other)
        })
        .min_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(distance, other)| NearestNeighbor {
            name: display_name(&other.id),
            distance: (distance * 100.0).round() / 100.0,
            side: PlanSide::of(other.position - position),
        })
}

fn compute_metrics(rooms: &[SimplifiedRoom]) -> PlanMetrics {
    let total_area: f64 = rooms.iter().map(|r| r.area).sum();
    let room_count = rooms.len();

    let mut public_area = 0.0;
    let mut private_area = 0.0;
    for room in rooms {
        let function = RoomFunction::from_name(&room.name);
        if function.is_public() {
            public_area += room.area;
        } else if function.is_private() {
            private_area += room.area;
        }
    }
    let public_private_ratio = if private_area > 0.0 {
        ((public_area / private_area) * 1000.0).round() / 1000.0
    } else {
        1.0
    };

    let average = if room_count > 0 {
        total_area / room_count as f64
    } else {
        0.0
    };

    PlanMetrics {
        total_area: (total_area * 100.0).round() / 100.0,
        room_count,
        public_private_ratio,
        space_efficiency: SpaceEfficiency::from_average_area(average),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_by_dominant_axis() {
        assert_eq!(PlanSide::of(Vector2::new(2.0, 0.5)), PlanSide::East);
        assert_eq!(PlanSide::of(Vector2::new(-2.0, 0.5)), PlanSide::West);
        assert_eq!(PlanSide::of(Vector2::new(0.5, 2.0)), PlanSide::North);
        assert_eq!(PlanSide::of(Vector2::new(0.5, -2.0)), PlanSide::South);
    }

    #[test]
    fn placement_classification() {
        let polygon = vec![
            Point2::new(0.0, 0.0),
            Point2::new(6.0, 0.0),
            Point2::new(6.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        let center = polygon_centroid(&polygon);

        assert_eq!(
            classify_placement(Point2::new(3.0, 0.2), &polygon, center),
            Placement::NearWall {
                side: PlanSide::South
            }
        );
        assert_eq!(
            classify_placement(Point2::new(3.1, 2.1), &polygon, center),
            Placement::NearCenter
        );
        assert_eq!(
            classify_placement(Point2::new(4.5, 2.0), &polygon, center),
            Placement::AwayFromWalls
        );
    }

    #[test]
    fn efficiency_buckets() {
        assert_eq!(
            SpaceEfficiency::from_average_area(3.0),
            SpaceEfficiency::VeryDense
        );
        assert_eq!(SpaceEfficiency::from_average_area(7.0), SpaceEfficiency::Dense);
        assert_eq!(
            SpaceEfficiency::from_average_area(15.0),
            SpaceEfficiency::Balanced
        );
        assert_eq!(
            SpaceEfficiency::from_average_area(25.0),
            SpaceEfficiency::Spacious
        );
        assert_eq!(
            SpaceEfficiency::from_average_area(40.0),
            SpaceEfficiency::VerySpacious
        );
    }

    #[test]
    fn ratio_defaults_to_one_without_private_rooms() {
        let rooms = vec![SimplifiedRoom {
            name: "거실".to_string(),
            area: 24.0,
            items: Vec::new(),
        }];
        let metrics = compute_metrics(&rooms);
        approx::assert_relative_eq!(metrics.public_private_ratio, 1.0);
    }

    #[test]
    fn ratio_of_public_to_private() {
        let rooms = vec![
            SimplifiedRoom {
                name: "거실".to_string(),
                area: 24.0,
                items: Vec::new(),
            },
            SimplifiedRoom {
                name: "방".to_string(),
                area: 12.0,
                items: Vec::new(),
            },
        ];
        let metrics = compute_metrics(&rooms);
        approx::assert_relative_eq!(metrics.public_private_ratio, 2.0);
    }
}
