//! CLI entry point for the rush-hour solver.
//!
//! Usage:
//!   rush-solver solve <levels.json> [options]
//!   rush-solver solve --stdin [options]
//!   rush-solver hint <levels.json> [--level ID] [--vehicles FILE]
//!   rush-solver replay <levels.json> --moves FILE [--level ID]
//!   rush-solver grade --moves N --optimal M [--time SECS] [--hints N]
//!
//! Results are printed to stdout as JSON; diagnostics go to stderr.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use rush_solver::{
    get_hint, replay, solve, validation::level_errors, Grade, Level, LevelFile, Move,
    ReplayStatus, SolverConfig, Vehicle, FULL_SOLVE_DEPTH,
};

#[derive(Parser)]
#[command(name = "rush-solver")]
#[command(about = "Move engine and bounded solver for rush-hour style puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the optimal move count for every level in a file
    Solve {
        /// Path to a level or level pack JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read levels from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Maximum search depth in moves
        #[arg(long, default_value_t = FULL_SOLVE_DEPTH)]
        max_depth: usize,

        /// Maximum search time per level in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print per-level progress to stderr
        #[arg(long)]
        verbose: bool,
    },

    /// Suggest the next move for a level
    Hint {
        /// Path to a level or level pack JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Level id within a pack (defaults to the first level)
        #[arg(long)]
        level: Option<String>,

        /// JSON file with the current vehicle list (defaults to the level start)
        #[arg(long)]
        vehicles: Option<PathBuf>,
    },

    /// Check a move list against a level
    Replay {
        /// Path to a level or level pack JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON file with the move list
        #[arg(long)]
        moves: PathBuf,

        /// Level id within a pack (defaults to the first level)
        #[arg(long)]
        level: Option<String>,
    },

    /// Compute stars and score for a finished attempt
    Grade {
        /// Moves taken by the player
        #[arg(long)]
        moves: u32,

        /// Optimal move count for the level
        #[arg(long)]
        optimal: u32,

        /// Elapsed time in seconds
        #[arg(long, default_value = "0")]
        time: u64,

        /// Hints used
        #[arg(long, default_value = "0")]
        hints: u32,
    },
}

/// Output format for one solved level
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    id: String,
    valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    solvable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    optimal_moves: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    declared_optimal_moves: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches_declared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Vec<Move>>,
    states_explored: usize,
    states_seen: usize,
    search_exhausted: bool,
    timed_out: bool,
    time_elapsed_ms: u64,
}

impl SolveOutput {
    fn passed(&self) -> bool {
        self.valid && self.solvable && self.matches_declared != Some(false)
    }
}

/// Output format for a hint request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HintOutput {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<Move>,
}

/// Output format for a replayed move list
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOutput {
    id: String,
    solved: bool,
    moves_applied: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    illegal_move_index: Option<usize>,
    vehicles: Vec<Vehicle>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve {
            file,
            stdin,
            max_depth,
            timeout,
            verbose,
        } => run_solve(file, stdin, max_depth, timeout, verbose),
        Commands::Hint {
            file,
            level,
            vehicles,
        } => run_hint(&file, level.as_deref(), vehicles.as_deref()),
        Commands::Replay { file, moves, level } => run_replay(&file, &moves, level.as_deref()),
        Commands::Grade {
            moves,
            optimal,
            time,
            hints,
        } => print_json(&Grade::new(moves, optimal, time, hints)).map(|()| true),
    };

    match result {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(message) => {
            eprintln!("Error: {}", message);
            process::exit(2);
        }
    }
}

fn run_solve(
    file: Option<PathBuf>,
    stdin: bool,
    max_depth: usize,
    timeout: Option<u64>,
    verbose: bool,
) -> Result<bool, String> {
    // Read level JSON
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("failed to read from stdin: {}", e))?;
        buffer
    } else if let Some(path) = file {
        read_file(&path)?
    } else {
        return Err("must provide either a file path or --stdin".to_string());
    };

    let levels = parse_json::<LevelFile>(&json_content, "level JSON")?.into_levels();

    let config = SolverConfig {
        max_depth,
        timeout: timeout.map(Duration::from_secs),
    };

    let outputs: Vec<SolveOutput> = levels
        .iter()
        .map(|level| {
            let output = solve_level(level, &config);
            if verbose {
                eprintln!(
                    "{}: {} ({} states, {} ms)",
                    output.id,
                    describe(&output),
                    output.states_explored,
                    output.time_elapsed_ms
                );
            }
            output
        })
        .collect();

    let passed = outputs.iter().all(SolveOutput::passed);
    print_json(&outputs)?;
    Ok(passed)
}

fn solve_level(level: &Level, config: &SolverConfig) -> SolveOutput {
    let errors: Vec<String> = level_errors(level).iter().map(ToString::to_string).collect();
    if !errors.is_empty() {
        return SolveOutput {
            id: level.id.clone(),
            valid: false,
            errors,
            solvable: false,
            optimal_moves: None,
            declared_optimal_moves: level.optimal_moves,
            matches_declared: None,
            solution: None,
            states_explored: 0,
            states_seen: 0,
            search_exhausted: false,
            timed_out: false,
            time_elapsed_ms: 0,
        };
    }

    let result = solve(level, config);
    let optimal_moves = result.min_moves();
    let matches_declared = level
        .optimal_moves
        .map(|declared| optimal_moves == Some(declared as usize));

    SolveOutput {
        id: level.id.clone(),
        valid: true,
        errors,
        solvable: result.solution.is_some(),
        optimal_moves,
        declared_optimal_moves: level.optimal_moves,
        matches_declared,
        solution: result.solution,
        states_explored: result.states_explored,
        states_seen: result.states_seen,
        search_exhausted: result.search_exhausted,
        timed_out: result.timed_out,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}

fn describe(output: &SolveOutput) -> String {
    if !output.valid {
        format!("invalid level: {}", output.errors.join("; "))
    } else if let Some(moves) = output.optimal_moves {
        match output.matches_declared {
            Some(false) => format!(
                "{} moves, declared {}",
                moves,
                output.declared_optimal_moves.unwrap_or_default()
            ),
            _ => format!("{} moves", moves),
        }
    } else if output.timed_out {
        "timed out".to_string()
    } else {
        "no solution within depth budget".to_string()
    }
}

fn run_hint(file: &Path, level_id: Option<&str>, vehicles: Option<&Path>) -> Result<bool, String> {
    let level = load_level(file, level_id)?;

    let current: Vec<Vehicle> = match vehicles {
        Some(path) => {
            let current: Vec<Vehicle> = parse_json(&read_file(path)?, "vehicle JSON")?;
            check_level(&Level {
                vehicles: current.clone(),
                ..level.clone()
            })?;
            current
        }
        None => level.vehicles.clone(),
    };

    let hint = get_hint(&level, &current);
    let found = hint.is_some();
    print_json(&HintOutput {
        id: level.id.clone(),
        hint,
    })?;
    Ok(found)
}

fn run_replay(file: &Path, moves: &Path, level_id: Option<&str>) -> Result<bool, String> {
    let level = load_level(file, level_id)?;
    let moves: Vec<Move> = parse_json(&read_file(moves)?, "move JSON")?;

    let result = replay(&level, &moves);
    let solved = result.status == ReplayStatus::Solved && result.moves_applied == moves.len();
    print_json(&ReplayOutput {
        id: level.id.clone(),
        solved,
        moves_applied: result.moves_applied,
        illegal_move_index: result.failed_at,
        vehicles: result.vehicles,
    })?;
    Ok(solved)
}

/// Pick one well-formed level out of a level file
fn load_level(file: &Path, level_id: Option<&str>) -> Result<Level, String> {
    let levels = parse_json::<LevelFile>(&read_file(file)?, "level JSON")?.into_levels();
    let level = match level_id {
        Some(id) => levels
            .into_iter()
            .find(|l| l.id == id)
            .ok_or_else(|| format!("level {:?} not found in {:?}", id, file)),
        None => levels
            .into_iter()
            .next()
            .ok_or_else(|| format!("no levels in {:?}", file)),
    }?;

    check_level(&level)?;
    Ok(level)
}

/// Reject malformed level data before it reaches the engine
fn check_level(level: &Level) -> Result<(), String> {
    let errors = level_errors(level);
    if errors.is_empty() {
        return Ok(());
    }
    let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
    Err(format!("invalid level {:?}: {}", level.id, reasons.join("; ")))
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read file {:?}: {}", path, e))
}

fn parse_json<T: DeserializeOwned>(content: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(content).map_err(|e| format!("error parsing {}: {}", what, e))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("failed to encode output: {}", e))?;
    println!("{}", json);
    Ok(())
}
