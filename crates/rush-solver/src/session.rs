//! In-memory play state for one attempt at a level.

use crate::engine::{apply_move, can_move, is_solved};
use crate::puzzle::{Level, Move, Vehicle};
use crate::scoring::Grade;
use crate::solver::get_hint;

/// Outcome of a move attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Illegal move, or the level was already complete
    Rejected,
    Moved,
    /// The move put the goal vehicle on the exit
    Solved,
}

/// One attempt at a level: current vehicles, move counter and hints used
#[derive(Debug, Clone)]
pub struct Session {
    level: Level,
    vehicles: Vec<Vehicle>,
    moves: u32,
    hints_used: u32,
    completed: bool,
}

impl Session {
    pub fn new(level: Level) -> Self {
        let vehicles = level.vehicles.clone();
        let completed = is_solved(&vehicles, level.exit);
        Self {
            level,
            vehicles,
            moves: 0,
            hints_used: 0,
            completed,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Validate and commit a move
    pub fn try_move(&mut self, vehicle_id: &str, delta: i32) -> MoveOutcome {
        if self.completed || !can_move(vehicle_id, delta, &self.vehicles, self.level.size) {
            return MoveOutcome::Rejected;
        }

        self.vehicles = apply_move(vehicle_id, delta, &self.vehicles);
        self.moves += 1;

        if is_solved(&self.vehicles, self.level.exit) {
            self.completed = true;
            MoveOutcome::Solved
        } else {
            MoveOutcome::Moved
        }
    }

    /// Back to the level's starting configuration
    pub fn restart(&mut self) {
        self.vehicles = self.level.vehicles.clone();
        self.moves = 0;
        self.hints_used = 0;
        self.completed = is_solved(&self.vehicles, self.level.exit);
    }

    /// Suggest the next move from the current configuration.
    ///
    /// Only counted against the score when a move is actually suggested.
    pub fn hint(&mut self) -> Option<Move> {
        if self.completed {
            return None;
        }
        let hint = get_hint(&self.level, &self.vehicles);
        if hint.is_some() {
            self.hints_used += 1;
        }
        hint
    }

    /// Grade the attempt once the level is complete.
    ///
    /// Without a precomputed optimum the move count itself stands in for it.
    pub fn grade(&self, elapsed_seconds: u64) -> Option<Grade> {
        if !self.completed {
            return None;
        }
        let optimal = self.level.optimal_moves.unwrap_or(self.moves);
        Some(Grade::new(self.moves, optimal, elapsed_seconds, self.hints_used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Orientation::{Horizontal, Vertical};
    use crate::puzzle::Position;

    fn create_test_level() -> Level {
        let mut level = Level::new(
            "three",
            6,
            Position::new(5, 2),
            vec![
                Vehicle::goal("R", Horizontal, 2, 0, 2),
                Vehicle::blocker("A", Vertical, 2, 2, 1),
                Vehicle::blocker("B", Vertical, 3, 4, 2),
            ],
        );
        level.optimal_moves = Some(3);
        level
    }

    #[test]
    fn test_play_through() {
        let mut session = Session::new(create_test_level());

        assert_eq!(session.try_move("R", 1), MoveOutcome::Rejected);
        assert_eq!(session.try_move("A", -1), MoveOutcome::Moved);
        assert_eq!(session.try_move("B", 1), MoveOutcome::Moved);
        assert_eq!(session.grade(0), None);
        assert_eq!(session.try_move("R", 4), MoveOutcome::Solved);

        assert!(session.is_completed());
        assert_eq!(session.moves(), 3);
        assert_eq!(session.grade(0), Some(Grade { stars: 3, score: 1000 }));

        // Nothing moves once the level is complete
        assert_eq!(session.try_move("R", -1), MoveOutcome::Rejected);
        assert_eq!(session.moves(), 3);
    }

    #[test]
    fn test_restart() {
        let mut session = Session::new(create_test_level());
        session.try_move("A", -1);
        session.hint();
        session.restart();

        assert_eq!(session.moves(), 0);
        assert_eq!(session.hints_used(), 0);
        assert_eq!(session.vehicles(), session.level().vehicles.as_slice());
    }

    #[test]
    fn test_hint_counts_and_applies() {
        let mut session = Session::new(create_test_level());

        for _ in 0..3 {
            let hint = session.hint().expect("hint expected");
            assert_ne!(session.try_move(&hint.vehicle_id, hint.delta), MoveOutcome::Rejected);
        }

        assert!(session.is_completed());
        assert_eq!(session.hints_used(), 3);
        assert_eq!(session.hint(), None);
        assert_eq!(session.grade(12).map(|g| g.score), Some(1000 - 5 - 150));
    }

    #[test]
    fn test_grade_without_precomputed_optimum() {
        let mut level = create_test_level();
        level.optimal_moves = None;
        let mut session = Session::new(level);

        session.try_move("A", -1);
        session.try_move("A", 3);
        session.try_move("B", 1);
        session.try_move("R", 4);

        assert_eq!(session.grade(0).map(|g| g.stars), Some(3));
    }
}
