//! Command handlers for the board engine.
//!
//! Handlers validate the command, pick the random source (a command-local
//! seeded RNG, or the shared one), run the synchronous domain stages and
//! return the result for the session layer to broadcast.

use std::sync::Mutex;

use serde::Serialize;
use taleboard_core::command::Command;
use taleboard_core::error::DomainError;
use taleboard_core::rng::{RandomSource, SeededRng};
use tracing::{info, instrument, warn};

use crate::domain::commands::{GenerateBoard, ResolveMove};
use crate::domain::generator;
use crate::domain::graph::Graph;
use crate::domain::layout;
use crate::domain::movement::{self, MovePath};

/// A freshly generated, laid-out board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardGenerated {
    /// The authoritative board, coordinates included.
    pub graph: Graph,
    /// Topology problems found during layout, as display strings.
    pub inconsistencies: Vec<String>,
    /// Number of main-line spaces.
    pub main_line_length: usize,
}

/// The outcome of one roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResolved {
    /// The die result that was applied.
    pub roll: u32,
    /// Positions entered and where the token ends.
    pub path: MovePath,
}

/// Runs `f` against the command's seeded RNG, or the shared one.
///
/// The shared `Mutex` is held only for the duration of `f`.
fn with_rng<T>(
    seed: Option<u64>,
    shared: &Mutex<dyn RandomSource + Send>,
    f: impl FnOnce(&mut dyn RandomSource) -> T,
) -> Result<T, DomainError> {
    if let Some(seed) = seed {
        return Ok(f(&mut SeededRng::new(seed)));
    }
    let mut guard = shared
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
    Ok(f(&mut *guard))
}

/// Handles the `GenerateBoard` command: validates the settings, generates
/// the graph and lays it out.
///
/// # Errors
///
/// Returns `DomainError::InvalidSettings` if the settings fail validation,
/// or `DomainError::Infrastructure` if the shared RNG lock is poisoned.
#[instrument(
    skip_all,
    fields(command = command.command_type(), correlation_id = %command.correlation_id())
)]
pub fn handle_generate_board(
    command: &GenerateBoard,
    rng: &Mutex<dyn RandomSource + Send>,
) -> Result<BoardGenerated, DomainError> {
    command.settings.validate()?;

    let graph = with_rng(command.seed(), rng, |rng| {
        generator::generate(&command.settings, rng)
    })?;
    let laid_out = layout::layout(&graph, &command.layout);

    let main_line_length = laid_out.graph.main_line_len();
    if !laid_out.inconsistencies.is_empty() {
        warn!(
            count = laid_out.inconsistencies.len(),
            "generated board has topology inconsistencies"
        );
    }
    info!(
        spaces = laid_out.graph.len(),
        main_line_length, "board generated"
    );

    Ok(BoardGenerated {
        graph: laid_out.graph,
        inconsistencies: laid_out
            .inconsistencies
            .iter()
            .map(ToString::to_string)
            .collect(),
        main_line_length,
    })
}

/// Handles the `ResolveMove` command: rolls if needed and resolves the path.
///
/// Movement itself never fails; a bad fork choice falls back to a random
/// path and the end of the board shortens the move.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the shared RNG lock is poisoned.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        start = command.start_position,
    )
)]
pub fn handle_resolve_move(
    command: &ResolveMove,
    rng: &Mutex<dyn RandomSource + Send>,
) -> Result<MoveResolved, DomainError> {
    let resolved = with_rng(command.seed(), rng, |rng| {
        let roll = command
            .roll
            .unwrap_or_else(|| movement::roll_die(&mut *rng));
        let path = movement::resolve_with_mode(
            &command.graph,
            command.branch_selection_mode,
            command.start_position,
            roll,
            command.fork_choice,
            rng,
        );
        MoveResolved { roll, path }
    })?;

    info!(
        roll = resolved.roll,
        final_position = resolved.path.final_position,
        reached_end = resolved.path.reached_end,
        "move resolved"
    );
    Ok(resolved)
}
