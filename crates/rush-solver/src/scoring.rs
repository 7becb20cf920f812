//! Star rating and score for a completed level.
//!
//! Stars use additive thresholds over the optimal move count: at most
//! optimal for three stars, optimal + 2 for two, optimal + 5 for one.

use serde::{Deserialize, Serialize};

/// Starting score before penalties
pub const BASE_SCORE: u32 = 1000;
/// Penalty per move above optimal
pub const EXTRA_MOVE_PENALTY: u32 = 10;
/// Penalty per full ten seconds of play
pub const TIME_PENALTY: u32 = 5;
/// Penalty per hint requested
pub const HINT_PENALTY: u32 = 50;

/// Star rating from 0 to 3
pub fn stars(moves_taken: u32, optimal_moves: u32) -> u8 {
    if moves_taken <= optimal_moves {
        3
    } else if moves_taken <= optimal_moves.saturating_add(2) {
        2
    } else if moves_taken <= optimal_moves.saturating_add(5) {
        1
    } else {
        0
    }
}

/// Numeric score, floored at zero
pub fn score(moves_taken: u32, optimal_moves: u32, elapsed_seconds: u64, hints_used: u32) -> u32 {
    let moves_penalty = moves_taken
        .saturating_sub(optimal_moves)
        .saturating_mul(EXTRA_MOVE_PENALTY);
    let time_penalty = u32::try_from(elapsed_seconds / 10)
        .unwrap_or(u32::MAX)
        .saturating_mul(TIME_PENALTY);
    let hints_penalty = hints_used.saturating_mul(HINT_PENALTY);

    BASE_SCORE
        .saturating_sub(moves_penalty)
        .saturating_sub(time_penalty)
        .saturating_sub(hints_penalty)
}

/// Stars and score for one completed play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub stars: u8,
    pub score: u32,
}

impl Grade {
    pub fn new(
        moves_taken: u32,
        optimal_moves: u32,
        elapsed_seconds: u64,
        hints_used: u32,
    ) -> Self {
        Self {
            stars: stars(moves_taken, optimal_moves),
            score: score(moves_taken, optimal_moves, elapsed_seconds, hints_used),
        }
    }
}
