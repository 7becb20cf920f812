//! Load-time structural checks for level data.
//!
//! The move engine assumes well-formed levels and never re-checks them. These
//! rules catch authoring mistakes once, when a level file is read.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::puzzle::{Level, Orientation, Position};

/// A structural problem with a level definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("grid size {0} is too small")]
    GridTooSmall(i32),

    #[error("level has no goal vehicle")]
    MissingGoal,

    #[error("level has {0} goal vehicles, expected exactly one")]
    MultipleGoals(usize),

    #[error("vehicle id {0:?} is used more than once")]
    DuplicateId(String),

    #[error("vehicle {id:?} has length {length}, expected 2 or 3")]
    InvalidLength { id: String, length: i32 },

    #[error("vehicle {id:?} leaves the {size}x{size} grid")]
    OutOfBounds { id: String, size: i32 },

    #[error("vehicles {first:?} and {second:?} overlap at {cell}")]
    Overlap {
        first: String,
        second: String,
        cell: Position,
    },

    #[error("exit {0} is not on the grid boundary")]
    ExitNotOnBoundary(Position),

    #[error("exit {exit} cannot be reached by the trailing edge of goal vehicle {id:?}")]
    ExitNotOnGoalLine { id: String, exit: Position },
}

/// Check every structural rule, collecting all failures
pub fn validate_level(level: &Level) -> Result<(), Vec<LevelError>> {
    let errors = level_errors(level);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// All structural failures for a level, empty when the level is well formed
pub fn level_errors(level: &Level) -> Vec<LevelError> {
    let mut errors = Vec::new();

    if level.size < 2 {
        errors.push(LevelError::GridTooSmall(level.size));
        return errors;
    }

    // Goal vehicle count
    let goals = level.vehicles.iter().filter(|v| v.is_goal()).count();
    match goals {
        0 => errors.push(LevelError::MissingGoal),
        1 => {}
        n => errors.push(LevelError::MultipleGoals(n)),
    }

    // Unique ids
    let mut seen_ids = HashSet::new();
    for vehicle in &level.vehicles {
        if !seen_ids.insert(vehicle.id.as_str()) {
            errors.push(LevelError::DuplicateId(vehicle.id.clone()));
        }
    }

    // Shape and bounds; only well-shaped vehicles take part in the overlap pass
    let mut placed = Vec::with_capacity(level.vehicles.len());
    for vehicle in &level.vehicles {
        if !(2..=3).contains(&vehicle.length) {
            errors.push(LevelError::InvalidLength {
                id: vehicle.id.clone(),
                length: vehicle.length,
            });
        } else if !vehicle.fits_at(0, level.size) {
            errors.push(LevelError::OutOfBounds {
                id: vehicle.id.clone(),
                size: level.size,
            });
        } else {
            placed.push(vehicle);
        }
    }

    // Overlaps, reported once per pair
    let mut owners: HashMap<Position, &str> = HashMap::new();
    let mut reported = HashSet::new();
    for vehicle in placed {
        for cell in vehicle.cells() {
            match owners.entry(cell) {
                Entry::Occupied(entry) => {
                    let owner = *entry.get();
                    if owner != vehicle.id && reported.insert((owner, vehicle.id.as_str())) {
                        errors.push(LevelError::Overlap {
                            first: owner.to_string(),
                            second: vehicle.id.clone(),
                            cell,
                        });
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(vehicle.id.as_str());
                }
            }
        }
    }

    // Exit placement
    let exit = level.exit;
    let edge = level.size - 1;
    let in_grid = exit.x >= 0 && exit.x <= edge && exit.y >= 0 && exit.y <= edge;
    let on_boundary = exit.x == 0 || exit.y == 0 || exit.x == edge || exit.y == edge;
    if !in_grid || !on_boundary {
        errors.push(LevelError::ExitNotOnBoundary(exit));
    } else if let Some(goal) = level.goal_vehicle() {
        // The goal vehicle leaves through its trailing edge: right or bottom
        let reachable = match goal.orientation {
            Orientation::Horizontal => goal.y == exit.y && exit.x == edge,
            Orientation::Vertical => goal.x == exit.x && exit.y == edge,
        };
        if !reachable {
            errors.push(LevelError::ExitNotOnGoalLine {
                id: goal.id.clone(),
                exit,
            });
        }
    }

    errors
}

/// Validate a pack of levels, returning the failures keyed by level id
pub fn validate_levels(levels: &[Level]) -> Vec<(String, Vec<LevelError>)> {
    levels
        .iter()
        .filter_map(|level| {
            validate_level(level)
                .err()
                .map(|errors| (level.id.clone(), errors))
        })
        .collect()
}
