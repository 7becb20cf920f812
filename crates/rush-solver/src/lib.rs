//! Sliding-block parking puzzle engine.
//!
//! This crate provides the move rules for rush-hour style levels and a
//! bounded breadth-first solver used to find optimal move counts and hints.
//! Scoring turns a finished attempt into stars and points.

pub mod engine;
pub mod puzzle;
pub mod scoring;
pub mod session;
pub mod solver;
pub mod validation;

// Re-export main types
pub use engine::{
    apply_move, can_move, is_solved, legal_moves, movement_path, occupied_cells, replay,
    state_key, verify_solution, ReplayResult, ReplayStatus, StateKey,
};
pub use puzzle::{Level, LevelFile, Move, Orientation, Position, Vehicle, VehicleKind};
pub use scoring::{score, stars, Grade};
pub use session::{MoveOutcome, Session};
pub use solver::{
    get_hint, get_hint_within, solve, solve_from, solve_in_background, solve_min_moves,
    SolverConfig, SolverResult, FULL_SOLVE_DEPTH, HINT_DEPTH,
};
pub use validation::{validate_level, validate_levels, LevelError};
