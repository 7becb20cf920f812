//! Move engine: legality, application and solved-state detection.
//!
//! Every function here is pure. Vehicle sets are taken by slice and new
//! sets are returned by value, so callers can keep any earlier state around
//! (the solver frontier, an undo stack, a restart snapshot).

use std::collections::HashSet;
use std::fmt;

use crate::puzzle::{Level, Move, Orientation, Position, Vehicle};

/// Union of every cell covered by every vehicle
pub fn occupied_cells(vehicles: &[Vehicle]) -> HashSet<Position> {
    vehicles.iter().flat_map(|v| v.cells()).collect()
}

/// Cells covered by every vehicle except `vehicle_id`
fn occupied_by_others(vehicle_id: &str, vehicles: &[Vehicle]) -> HashSet<Position> {
    vehicles
        .iter()
        .filter(|v| v.id != vehicle_id)
        .flat_map(|v| v.cells())
        .collect()
}

/// Every cell the vehicle touches while sliding `delta` cells, start and
/// destination footprints included, ordered along the travel axis.
pub fn movement_path(vehicle: &Vehicle, delta: i32) -> Vec<Position> {
    let start = delta.min(0);
    let end = delta.max(0) + vehicle.length - 1;
    (start..=end)
        .map(|offset| match vehicle.orientation {
            Orientation::Horizontal => Position::new(vehicle.x + offset, vehicle.y),
            Orientation::Vertical => Position::new(vehicle.x, vehicle.y + offset),
        })
        .collect()
}

/// Check if a vehicle can slide `delta` cells along its axis.
///
/// Rejects unknown ids, a zero delta, destinations outside the grid, and any
/// slide whose swept cells touch another vehicle's current cells. A vehicle
/// can never pass through a blocker to reach a free cell behind it.
pub fn can_move(vehicle_id: &str, delta: i32, vehicles: &[Vehicle], grid_size: i32) -> bool {
    let Some(vehicle) = vehicles.iter().find(|v| v.id == vehicle_id) else {
        return false;
    };

    // No legal slide is as long as the grid; also bounds the swept path
    if delta == 0 || i64::from(delta).abs() >= i64::from(grid_size) {
        return false;
    }
    if !vehicle.fits_at(delta, grid_size) {
        return false;
    }

    let others = occupied_by_others(vehicle_id, vehicles);
    movement_path(vehicle, delta)
        .iter()
        .all(|cell| !others.contains(cell))
}

/// Apply a move, returning the new vehicle set.
///
/// Does not check legality; callers confirm with [`can_move`] first. An
/// unknown id yields an unchanged copy.
pub fn apply_move(vehicle_id: &str, delta: i32, vehicles: &[Vehicle]) -> Vec<Vehicle> {
    vehicles
        .iter()
        .map(|v| {
            if v.id == vehicle_id {
                v.shifted(delta)
            } else {
                v.clone()
            }
        })
        .collect()
}

/// Check if the goal vehicle has reached the exit.
///
/// The goal vehicle's trailing cell must sit on the exit: for a horizontal
/// goal vehicle `x + length - 1 == exit.x` in the exit row, for a vertical
/// one `y + length - 1 == exit.y` in the exit column. Only exits on the
/// right or bottom edge can be reached this way.
pub fn is_solved(vehicles: &[Vehicle], exit: Position) -> bool {
    let Some(goal) = vehicles.iter().find(|v| v.is_goal()) else {
        return false;
    };

    let (exit_along, exit_across) = match goal.orientation {
        Orientation::Horizontal => (exit.x, exit.y),
        Orientation::Vertical => (exit.y, exit.x),
    };
    goal.cross_position() == exit_across && goal.trailing_position() == i64::from(exit_along)
}

/// Enumerate every legal move from a configuration.
///
/// Each vehicle contributes one move per reachable resting position, walking
/// outward from its current position in both directions until the grid edge
/// or the first blocker. Equivalent to testing [`can_move`] for every delta in
/// `[-distance_behind, distance_ahead]`.
pub fn legal_moves(vehicles: &[Vehicle], grid_size: i32) -> Vec<Move> {
    let mut moves = Vec::new();

    for vehicle in vehicles {
        let others = occupied_by_others(&vehicle.id, vehicles);

        for (direction, limit) in [
            (-1, vehicle.distance_behind()),
            (1, vehicle.distance_ahead(grid_size)),
        ] {
            for step in 1..=limit {
                let delta = direction * step;
                if !vehicle.fits_at(delta, grid_size) {
                    break;
                }
                if vehicle.cells_at(delta).iter().any(|c| others.contains(c)) {
                    break;
                }
                moves.push(Move::new(vehicle.id.clone(), delta));
            }
        }
    }

    moves
}

/// Canonical identity of a configuration for visited-state deduplication.
///
/// Holds `(id, x, y)` for every vehicle sorted by id, so the same vehicles
/// in any order produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey(Vec<(String, i32, i32)>);

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, x, y)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}:{},{}", id, x, y)?;
        }
        Ok(())
    }
}

/// Serialize a configuration to its canonical key
pub fn state_key(vehicles: &[Vehicle]) -> StateKey {
    let mut entries: Vec<(String, i32, i32)> =
        vehicles.iter().map(|v| (v.id.clone(), v.x, v.y)).collect();
    entries.sort_unstable();
    StateKey(entries)
}

/// Result status of replaying a move list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    /// Goal vehicle reached the exit
    Solved,
    /// Every move was legal but the level is not solved
    Unsolved,
    /// A move was rejected by [`can_move`]
    IllegalMove,
}

/// Result of replaying a move list from a level's start
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub status: ReplayStatus,
    /// Number of moves applied before stopping
    pub moves_applied: usize,
    /// Index of the rejected move, if any
    pub failed_at: Option<usize>,
    /// Configuration where the replay stopped
    pub vehicles: Vec<Vehicle>,
}

impl ReplayResult {
    pub fn solved(&self) -> bool {
        self.status == ReplayStatus::Solved
    }
}

/// Replay moves from the level's starting configuration.
///
/// Stops at the first illegal move, or as soon as the level is solved; moves
/// after that point are not applied.
pub fn replay(level: &Level, moves: &[Move]) -> ReplayResult {
    let mut vehicles = level.vehicles.clone();

    if is_solved(&vehicles, level.exit) {
        return ReplayResult {
            status: ReplayStatus::Solved,
            moves_applied: 0,
            failed_at: None,
            vehicles,
        };
    }

    for (index, mv) in moves.iter().enumerate() {
        if !can_move(&mv.vehicle_id, mv.delta, &vehicles, level.size) {
            return ReplayResult {
                status: ReplayStatus::IllegalMove,
                moves_applied: index,
                failed_at: Some(index),
                vehicles,
            };
        }

        vehicles = apply_move(&mv.vehicle_id, mv.delta, &vehicles);

        if is_solved(&vehicles, level.exit) {
            return ReplayResult {
                status: ReplayStatus::Solved,
                moves_applied: index + 1,
                failed_at: None,
                vehicles,
            };
        }
    }

    ReplayResult {
        status: ReplayStatus::Unsolved,
        moves_applied: moves.len(),
        failed_at: None,
        vehicles,
    }
}

/// Simple verification: does this exact move list solve the level?
pub fn verify_solution(level: &Level, moves: &[Move]) -> bool {
    let result = replay(level, moves);
    result.solved() && result.moves_applied == moves.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Orientation::{Horizontal, Vertical};

    fn create_test_vehicles() -> Vec<Vehicle> {
        vec![
            Vehicle::goal("R", Horizontal, 2, 2, 2),
            Vehicle::blocker("A", Vertical, 2, 4, 0),
            Vehicle::blocker("B", Vertical, 2, 5, 3),
        ]
    }

    fn create_test_level() -> Level {
        Level::new("test", 6, Position::new(5, 2), create_test_vehicles())
    }

    #[test]
    fn test_occupied_cells() {
        let occupied = occupied_cells(&create_test_vehicles());
        assert_eq!(occupied.len(), 6);
        assert!(occupied.contains(&Position::new(2, 2)));
        assert!(occupied.contains(&Position::new(3, 2)));
        assert!(occupied.contains(&Position::new(4, 0)));
        assert!(occupied.contains(&Position::new(4, 1)));
        assert!(!occupied.contains(&Position::new(4, 2)));
    }

    #[test]
    fn test_valid_moves() {
        let vehicles = create_test_vehicles();
        assert!(can_move("R", 1, &vehicles, 6));
        assert!(can_move("R", -1, &vehicles, 6));
        assert!(can_move("R", 2, &vehicles, 6));
        assert!(can_move("A", 1, &vehicles, 6));
    }

    #[test]
    fn test_out_of_bounds_moves() {
        let vehicles = create_test_vehicles();
        // 5 + 2 = 7 > 6
        assert!(!can_move("R", 3, &vehicles, 6));
        assert!(!can_move("R", -3, &vehicles, 6));
        assert!(!can_move("A", -1, &vehicles, 6));
        assert!(!can_move("B", 2, &vehicles, 6));
    }

    #[test]
    fn test_collision_moves() {
        let vehicles = create_test_vehicles();
        // A would land on (4,2)-(4,3), fine; B blocks nothing in column 4
        assert!(can_move("A", 2, &vehicles, 6));
        // B moving up two lands on (5,1)-(5,2), free
        assert!(can_move("B", -2, &vehicles, 6));

        let blocked = apply_move("A", 1, &vehicles);
        // A now covers (4,1)-(4,2), in front of R
        assert!(!can_move("R", 1, &blocked, 6));
        assert!(!can_move("R", 2, &blocked, 6));
        assert!(can_move("R", -2, &blocked, 6));
    }

    #[test]
    fn test_unknown_vehicle_and_zero_delta() {
        let vehicles = create_test_vehicles();
        assert!(!can_move("Z", 1, &vehicles, 6));
        assert!(!can_move("R", 0, &vehicles, 6));
    }

    #[test]
    fn test_cannot_jump_over_blocker() {
        let vehicles = vec![
            Vehicle::goal("R", Horizontal, 2, 0, 2),
            Vehicle::blocker("A", Vertical, 2, 2, 2),
        ];
        // Destination (4,2)-(5,2) is free but A sits in between
        assert!(!can_move("R", 4, &vehicles, 6));
        assert!(!can_move("R", 3, &vehicles, 6));
        assert!(!legal_moves(&vehicles, 6)
            .iter()
            .any(|m| m.vehicle_id == "R" && m.delta > 0));
    }

    #[test]
    fn test_movement_path() {
        let red = Vehicle::goal("R", Horizontal, 2, 2, 2);
        let path = movement_path(&red, 2);
        assert_eq!(
            path,
            vec![
                Position::new(2, 2),
                Position::new(3, 2),
                Position::new(4, 2),
                Position::new(5, 2)
            ]
        );

        let car = Vehicle::blocker("A", Vertical, 2, 4, 2);
        let path = movement_path(&car, -2);
        assert_eq!(path.first(), Some(&Position::new(4, 0)));
        assert_eq!(path.last(), Some(&Position::new(4, 3)));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_apply_move() {
        let vehicles = create_test_vehicles();
        let moved = apply_move("R", 1, &vehicles);

        let red = moved.iter().find(|v| v.id == "R").unwrap();
        assert_eq!(red.position(), Position::new(3, 2));
        // Input untouched, others untouched
        assert_eq!(vehicles[0].position(), Position::new(2, 2));
        assert_eq!(moved[1], vehicles[1]);
        assert_eq!(moved[2], vehicles[2]);

        let moved = apply_move("A", 2, &vehicles);
        assert_eq!(moved[1].position(), Position::new(4, 2));
    }

    #[test]
    fn test_is_solved() {
        let exit = Position::new(5, 2);
        assert!(!is_solved(&create_test_vehicles(), exit));

        let solved = vec![Vehicle::goal("R", Horizontal, 2, 4, 2)];
        assert!(is_solved(&solved, exit));

        let wrong_row = vec![Vehicle::goal("R", Horizontal, 2, 4, 3)];
        assert!(!is_solved(&wrong_row, exit));

        let no_goal = vec![Vehicle::blocker("A", Horizontal, 2, 4, 2)];
        assert!(!is_solved(&no_goal, exit));
    }

    #[test]
    fn test_is_solved_vertical_goal() {
        let exit = Position::new(2, 5);
        assert!(is_solved(&[Vehicle::goal("R", Vertical, 2, 2, 4)], exit));
        assert!(!is_solved(&[Vehicle::goal("R", Vertical, 2, 2, 3)], exit));
        assert!(!is_solved(&[Vehicle::goal("R", Vertical, 2, 3, 4)], exit));
    }

    #[test]
    fn test_is_solved_uses_trailing_cell() {
        // Covering the exit with the leading cell is not enough
        let exit = Position::new(0, 2);
        assert!(!is_solved(&[Vehicle::goal("R", Horizontal, 2, 0, 2)], exit));

        let exit = Position::new(5, 2);
        assert!(is_solved(&[Vehicle::goal("R", Horizontal, 3, 3, 2)], exit));
        assert!(!is_solved(&[Vehicle::goal("R", Horizontal, 3, 2, 2)], exit));
    }

    #[test]
    fn test_extreme_deltas_rejected() {
        let vehicles = vec![Vehicle::goal("R", Horizontal, 2, 2, 2)];
        assert!(!can_move("R", i32::MAX, &vehicles, 6));
        assert!(!can_move("R", i32::MIN, &vehicles, 6));
        assert!(!can_move("R", 6, &vehicles, 6));
        assert!(!can_move("R", -6, &vehicles, 6));

        let level = Level::new("huge", 6, Position::new(5, 2), vehicles);
        let result = replay(&level, &[Move::new("R", i32::MAX)]);
        assert_eq!(result.status, ReplayStatus::IllegalMove);
        assert_eq!(result.failed_at, Some(0));
    }

    #[test]
    fn test_legal_moves_matches_can_move() {
        let mut states = vec![create_test_vehicles()];
        states.push(vec![
            Vehicle::goal("R", Horizontal, 2, 0, 2),
            Vehicle::blocker("A", Vertical, 3, 2, 0),
            Vehicle::blocker("B", Vertical, 3, 3, 3),
            Vehicle::blocker("C", Horizontal, 3, 3, 0),
            Vehicle::blocker("D", Vertical, 2, 4, 3),
        ]);

        for vehicles in &states {
            let moves: HashSet<Move> = legal_moves(vehicles, 6).into_iter().collect();
            for v in vehicles {
                for delta in -6..=6 {
                    let expected = can_move(&v.id, delta, vehicles, 6);
                    let listed = moves.contains(&Move::new(v.id.clone(), delta));
                    assert_eq!(expected, listed, "vehicle {} delta {}", v.id, delta);
                }
            }
        }
    }

    #[test]
    fn test_legal_moves_keep_board_consistent() {
        let vehicles = create_test_vehicles();
        let total_cells: usize = vehicles.iter().map(|v| v.length as usize).sum();

        for mv in legal_moves(&vehicles, 6) {
            let next = apply_move(&mv.vehicle_id, mv.delta, &vehicles);
            let occupied = occupied_cells(&next);
            assert_eq!(occupied.len(), total_cells, "overlap after {}", mv);
            assert!(occupied
                .iter()
                .all(|c| c.x >= 0 && c.x < 6 && c.y >= 0 && c.y < 6));
        }
    }

    #[test]
    fn test_state_key_order_invariant() {
        let vehicles = create_test_vehicles();
        let mut reversed = vehicles.clone();
        reversed.reverse();

        assert_eq!(state_key(&vehicles), state_key(&reversed));
        assert_eq!(state_key(&vehicles).to_string(), "A:4,0|B:5,3|R:2,2");

        let moved = apply_move("B", -1, &vehicles);
        assert_ne!(state_key(&vehicles), state_key(&moved));

        let mut renamed = vehicles.clone();
        renamed[0].id = "Q".to_string();
        assert_ne!(state_key(&vehicles), state_key(&renamed));
    }

    #[test]
    fn test_replay() {
        let level = create_test_level();

        let result = replay(&level, &[Move::new("A", 2), Move::new("R", 2)]);
        assert_eq!(result.status, ReplayStatus::IllegalMove);
        assert_eq!(result.failed_at, Some(1));

        let result = replay(&level, &[Move::new("R", 1)]);
        assert_eq!(result.status, ReplayStatus::Unsolved);
        assert_eq!(result.moves_applied, 1);

        let result = replay(&level, &[Move::new("R", 2), Move::new("R", -1)]);
        assert!(result.solved());
        assert_eq!(result.moves_applied, 1);
    }

    #[test]
    fn test_verify_solution() {
        let level = create_test_level();
        assert!(verify_solution(&level, &[Move::new("R", 2)]));
        assert!(verify_solution(&level, &[Move::new("R", 1), Move::new("R", 1)]));
        assert!(!verify_solution(&level, &[Move::new("R", 1)]));
        assert!(!verify_solution(&level, &[Move::new("R", 2), Move::new("A", 1)]));
    }
}
