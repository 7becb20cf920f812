//! Level representation types that match the level JSON format.
//!
//! These types deserialize directly from the level files shipped with the
//! game (`{"id", "size", "exit", "vehicles", "optimalMoves"}`).

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Axis a vehicle slides along. Fixed for the vehicle's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "H")]
    Horizontal,
    #[serde(rename = "V")]
    Vertical,
}

/// Vehicle role. Exactly one `Red` vehicle per level is the goal vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Red,
    Car,
    Truck,
}

/// Position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rigid vehicle occupying `length` contiguous cells along its axis.
///
/// `(x, y)` is the lowest-index cell: leftmost for horizontal vehicles,
/// topmost for vertical ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: VehicleKind,
    pub orientation: Orientation,
    pub length: i32,
    pub x: i32,
    pub y: i32,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        kind: VehicleKind,
        orientation: Orientation,
        length: i32,
        x: i32,
        y: i32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            orientation,
            length,
            x,
            y,
        }
    }

    /// Shorthand for the goal vehicle
    pub fn goal(
        id: impl Into<String>,
        orientation: Orientation,
        length: i32,
        x: i32,
        y: i32,
    ) -> Self {
        Self::new(id, VehicleKind::Red, orientation, length, x, y)
    }

    /// Shorthand for an ordinary vehicle; the kind follows from the length
    pub fn blocker(
        id: impl Into<String>,
        orientation: Orientation,
        length: i32,
        x: i32,
        y: i32,
    ) -> Self {
        let kind = if length >= 3 {
            VehicleKind::Truck
        } else {
            VehicleKind::Car
        };
        Self::new(id, kind, orientation, length, x, y)
    }

    pub fn is_goal(&self) -> bool {
        self.kind == VehicleKind::Red
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Coordinate along the travel axis
    pub fn axis_position(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Coordinate across the travel axis
    pub fn cross_position(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.y,
            Orientation::Vertical => self.x,
        }
    }

    /// Axis coordinate of the last covered cell
    pub fn trailing_position(&self) -> i64 {
        i64::from(self.axis_position()) + i64::from(self.length) - 1
    }

    /// Cells between the vehicle's first cell and the low edge of the grid
    pub fn distance_behind(&self) -> i32 {
        self.axis_position()
    }

    /// Cells between the vehicle's last cell and the high edge of the grid
    pub fn distance_ahead(&self, grid_size: i32) -> i32 {
        grid_size.saturating_sub(self.axis_position().saturating_add(self.length))
    }

    /// Copy of this vehicle moved `delta` cells along its axis
    pub fn shifted(&self, delta: i32) -> Vehicle {
        let mut moved = self.clone();
        match self.orientation {
            Orientation::Horizontal => moved.x = moved.x.saturating_add(delta),
            Orientation::Vertical => moved.y = moved.y.saturating_add(delta),
        }
        moved
    }

    /// Cells covered by the vehicle, lowest index first
    pub fn cells(&self) -> SmallVec<[Position; 3]> {
        self.cells_at(0)
    }

    /// Cells the vehicle would cover after sliding `delta` cells.
    ///
    /// Only meaningful for footprints that pass [`Vehicle::fits_at`].
    pub fn cells_at(&self, delta: i32) -> SmallVec<[Position; 3]> {
        let start = self.axis_position().saturating_add(delta);
        (0..self.length)
            .map(|i| match self.orientation {
                Orientation::Horizontal => Position::new(start.saturating_add(i), self.y),
                Orientation::Vertical => Position::new(self.x, start.saturating_add(i)),
            })
            .collect()
    }

    /// Whether the footprint after sliding `delta` stays inside an N×N grid
    pub fn fits_at(&self, delta: i32, grid_size: i32) -> bool {
        let size = i64::from(grid_size);
        let across = i64::from(self.cross_position());
        let along = i64::from(self.axis_position()) + i64::from(delta);
        let length = i64::from(self.length);
        length > 0 && across >= 0 && across < size && along >= 0 && along + length <= size
    }
}

/// A move: a vehicle id plus signed travel along its axis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub vehicle_id: String,
    pub delta: i32,
}

impl Move {
    pub fn new(vehicle_id: impl Into<String>, delta: i32) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            delta,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:+}", self.vehicle_id, self.delta)
    }
}

/// The complete level definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Edge length of the square grid
    pub size: i32,
    pub exit: Position,
    pub vehicles: Vec<Vehicle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_moves: Option<u32>,
}

impl Level {
    pub fn new(id: impl Into<String>, size: i32, exit: Position, vehicles: Vec<Vehicle>) -> Self {
        Self {
            id: id.into(),
            title: None,
            size,
            exit,
            vehicles,
            optimal_moves: None,
        }
    }

    /// The goal vehicle, if the level has one
    pub fn goal_vehicle(&self) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.is_goal())
    }

    /// Look up a vehicle by id
    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }
}

/// A level file holds either a single level or a pack of levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelFile {
    Pack(Vec<Level>),
    Single(Level),
}

impl LevelFile {
    pub fn into_levels(self) -> Vec<Level> {
        match self {
            LevelFile::Pack(levels) => levels,
            LevelFile::Single(level) => vec![level],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_cells() {
        let red = Vehicle::goal("R", Orientation::Horizontal, 2, 2, 2);
        assert_eq!(
            red.cells().as_slice(),
            &[Position::new(2, 2), Position::new(3, 2)]
        );

        let truck = Vehicle::blocker("T", Orientation::Vertical, 3, 4, 1);
        assert_eq!(truck.kind, VehicleKind::Truck);
        assert_eq!(
            truck.cells_at(-1).as_slice(),
            &[Position::new(4, 0), Position::new(4, 1), Position::new(4, 2)]
        );
    }

    #[test]
    fn test_vehicle_distances() {
        let car = Vehicle::blocker("A", Orientation::Vertical, 2, 4, 1);
        assert_eq!(car.distance_behind(), 1);
        assert_eq!(car.distance_ahead(6), 3);
        assert!(car.fits_at(3, 6));
        assert!(!car.fits_at(4, 6));
        assert!(!car.fits_at(-2, 6));
    }

    #[test]
    fn test_fits_at_extreme_values() {
        let red = Vehicle::goal("R", Orientation::Horizontal, 2, 2, 2);
        assert!(!red.fits_at(i32::MAX, 6));
        assert!(!red.fits_at(i32::MIN, 6));

        let far = Vehicle::blocker("F", Orientation::Horizontal, 2, i32::MAX, 0);
        assert!(!far.fits_at(0, 6));
        assert!(!far.fits_at(i32::MIN, 6));

        let long = Vehicle::blocker("L", Orientation::Vertical, i32::MAX, 0, 0);
        assert!(!long.fits_at(0, 6));
        assert_eq!(long.distance_ahead(6), 6 - i32::MAX);
    }

    #[test]
    fn test_shifted_keeps_cross_axis() {
        let red = Vehicle::goal("R", Orientation::Horizontal, 2, 2, 2);
        let moved = red.shifted(2);
        assert_eq!(moved.position(), Position::new(4, 2));

        let car = Vehicle::blocker("A", Orientation::Vertical, 2, 4, 0);
        assert_eq!(car.shifted(3).position(), Position::new(4, 3));
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::new("R", 2).to_string(), "R+2");
        assert_eq!(Move::new("A", -1).to_string(), "A-1");
    }

    #[test]
    fn test_parse_level_json() {
        let json = r#"{
            "id": "easy_001",
            "size": 6,
            "exit": { "x": 5, "y": 2 },
            "vehicles": [
                { "id": "R", "type": "red", "orientation": "H", "length": 2, "x": 2, "y": 2 },
                { "id": "A", "type": "car", "orientation": "V", "length": 2, "x": 4, "y": 0 }
            ],
            "optimalMoves": 2
        }"#;

        let level: Level = serde_json::from_str(json).unwrap();
        assert_eq!(level.size, 6);
        assert_eq!(level.optimal_moves, Some(2));
        assert_eq!(level.goal_vehicle().map(|v| v.id.as_str()), Some("R"));
        assert_eq!(level.vehicle("A").map(|v| v.orientation), Some(Orientation::Vertical));
        assert!(level.title.is_none());
    }

    #[test]
    fn test_parse_level_pack() {
        let json = r#"[
            { "id": "a", "size": 6, "exit": { "x": 5, "y": 2 }, "vehicles": [] },
            { "id": "b", "size": 6, "exit": { "x": 5, "y": 2 }, "vehicles": [] }
        ]"#;

        let file: LevelFile = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = file.into_levels().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
