//! Bounded breadth-first solver.
//!
//! Nodes are distinct vehicle configurations (identified by [`StateKey`]) and
//! edges are legal moves. Every edge costs one move and nodes are expanded in
//! non-decreasing depth order, so the first solved configuration dequeued is
//! a shortest solution.

use std::collections::{HashSet, VecDeque};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::engine::{apply_move, is_solved, legal_moves, state_key, StateKey};
use crate::puzzle::{Level, Move, Vehicle};

/// Depth budget for full solves
pub const FULL_SOLVE_DEPTH: usize = 50;

/// Depth budget for hint searches
pub const HINT_DEPTH: usize = 20;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Nodes at this depth are not expanded further
    pub max_depth: usize,
    /// Optional wall-clock limit for the whole search
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: FULL_SOLVE_DEPTH,
            timeout: None,
        }
    }
}

impl SolverConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

/// Result of the solver search
#[derive(Debug, Clone, Default)]
pub struct SolverResult {
    /// Shortest move sequence to a solved configuration, if one was found
    pub solution: Option<Vec<Move>>,
    /// Whether the frontier emptied without finding a solution
    pub search_exhausted: bool,
    /// Whether the search stopped on the timeout
    pub timed_out: bool,
    /// Number of configurations dequeued
    pub states_explored: usize,
    /// Number of distinct configurations discovered
    pub states_seen: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl SolverResult {
    /// Minimum move count, `Some(0)` when the start was already solved
    pub fn min_moves(&self) -> Option<usize> {
        self.solution.as_ref().map(Vec::len)
    }

    /// First move of the shortest solution
    pub fn first_move(&self) -> Option<&Move> {
        self.solution.as_ref().and_then(|path| path.first())
    }
}

/// A configuration waiting in the frontier
struct SearchNode {
    vehicles: Vec<Vehicle>,
    /// Index of the move that produced this node, `None` for the start
    trail_index: Option<usize>,
    depth: usize,
}

/// Back-pointer used to rebuild the path once a solution is dequeued
struct TrailEntry {
    parent: Option<usize>,
    mv: Move,
}

fn reconstruct_path(trail: &[TrailEntry], mut index: Option<usize>) -> Vec<Move> {
    let mut path = Vec::new();
    while let Some(i) = index {
        path.push(trail[i].mv.clone());
        index = trail[i].parent;
    }
    path.reverse();
    path
}

/// Solve a level from its starting configuration
pub fn solve(level: &Level, config: &SolverConfig) -> SolverResult {
    solve_from(level, &level.vehicles, config)
}

/// Solve a level from an arbitrary configuration.
///
/// A configuration without a goal vehicle has no solution; the result is
/// returned immediately with the search marked exhausted.
pub fn solve_from(level: &Level, vehicles: &[Vehicle], config: &SolverConfig) -> SolverResult {
    let start_time = Instant::now();
    let deadline = config.timeout.map(|timeout| start_time + timeout);

    if !vehicles.iter().any(|v| v.is_goal()) {
        return SolverResult {
            search_exhausted: true,
            ..SolverResult::default()
        };
    }

    let mut trail: Vec<TrailEntry> = Vec::new();
    let mut visited: HashSet<StateKey> = HashSet::new();
    visited.insert(state_key(vehicles));

    let mut queue: VecDeque<SearchNode> = VecDeque::new();
    queue.push_back(SearchNode {
        vehicles: vehicles.to_vec(),
        trail_index: None,
        depth: 0,
    });

    let mut states_explored: usize = 0;

    while let Some(node) = queue.pop_front() {
        // Check timeout
        if deadline.map_or(false, |deadline| Instant::now() > deadline) {
            return SolverResult {
                solution: None,
                search_exhausted: false,
                timed_out: true,
                states_explored,
                states_seen: visited.len(),
                time_elapsed_ms: start_time.elapsed().as_millis() as u64,
            };
        }

        states_explored += 1;

        if is_solved(&node.vehicles, level.exit) {
            return SolverResult {
                solution: Some(reconstruct_path(&trail, node.trail_index)),
                search_exhausted: false,
                timed_out: false,
                states_explored,
                states_seen: visited.len(),
                time_elapsed_ms: start_time.elapsed().as_millis() as u64,
            };
        }

        // Pruned, but siblings still get expanded
        if node.depth >= config.max_depth {
            continue;
        }

        for mv in legal_moves(&node.vehicles, level.size) {
            let next = apply_move(&mv.vehicle_id, mv.delta, &node.vehicles);
            if !visited.insert(state_key(&next)) {
                continue;
            }

            trail.push(TrailEntry {
                parent: node.trail_index,
                mv,
            });
            queue.push_back(SearchNode {
                vehicles: next,
                trail_index: Some(trail.len() - 1),
                depth: node.depth + 1,
            });
        }
    }

    // Frontier empty without a solution
    SolverResult {
        solution: None,
        search_exhausted: true,
        timed_out: false,
        states_explored,
        states_seen: visited.len(),
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    }
}

/// Minimum number of moves to solve the level within `max_depth`.
///
/// `Some(0)` means the level starts solved; `None` means no solution exists
/// within the budget (or the level has no goal vehicle).
pub fn solve_min_moves(level: &Level, max_depth: usize) -> Option<usize> {
    solve(level, &SolverConfig::with_max_depth(max_depth)).min_moves()
}

/// First move of a shortest solution from `current_vehicles`.
///
/// Returns `None` when the configuration is already solved or nothing is
/// found within [`HINT_DEPTH`] moves.
pub fn get_hint(level: &Level, current_vehicles: &[Vehicle]) -> Option<Move> {
    get_hint_within(level, current_vehicles, HINT_DEPTH)
}

/// [`get_hint`] with an explicit depth budget
pub fn get_hint_within(
    level: &Level,
    current_vehicles: &[Vehicle],
    max_depth: usize,
) -> Option<Move> {
    solve_from(level, current_vehicles, &SolverConfig::with_max_depth(max_depth))
        .first_move()
        .cloned()
}

/// Run a full solve on its own thread.
///
/// The search owns its inputs, so any number of these can run at once.
pub fn solve_in_background(level: Level, config: SolverConfig) -> JoinHandle<SolverResult> {
    thread::spawn(move || solve(&level, &config))
}
