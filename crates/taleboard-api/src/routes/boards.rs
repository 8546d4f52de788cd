//! Routes for board generation and movement resolution.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use taleboard_board::application::command_handlers::{self, BoardGenerated};
use taleboard_board::domain::commands;
use taleboard_board::domain::graph::Graph;
use taleboard_board::domain::settings::{BoardSettings, BranchSelectionMode};
use taleboard_board::domain::space::Space;
use taleboard_core::error::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct GenerateBoardRequest {
    /// Session board configuration.
    pub settings: BoardSettings,
    /// Optional seed for a reproducible board.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request body for POST /moves.
#[derive(Debug, Deserialize)]
pub struct ResolveMoveRequest {
    /// The session's board as previously returned by POST /.
    pub graph: Vec<Space>,
    /// Position the token starts from.
    pub start_position: usize,
    /// Die result; rolled by the server when absent.
    #[serde(default)]
    pub roll: Option<u32>,
    /// The player's path choice for the first split crossed.
    #[serde(default)]
    pub fork_choice: Option<usize>,
    /// Session fork resolution policy.
    #[serde(default)]
    pub branch_selection_mode: BranchSelectionMode,
    /// Optional seed for a reproducible move.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Response body for POST /moves.
#[derive(Debug, Serialize)]
pub struct MoveResponse {
    /// The die result that was applied.
    pub roll: u32,
    /// Every position entered, in order.
    pub path: Vec<usize>,
    /// Where the token ends.
    pub final_position: usize,
    /// Whether the end of the board cut the move short.
    pub reached_end: bool,
}

/// POST /
#[instrument(skip(state, request), fields(board_length = request.settings.board_length))]
async fn generate_board(
    State(state): State<AppState>,
    Json(request): Json<GenerateBoardRequest>,
) -> Result<Json<BoardGenerated>, ApiError> {
    let command = commands::GenerateBoard {
        correlation_id: Uuid::new_v4(),
        settings: request.settings,
        layout: state.layout,
        seed: request.seed,
    };

    info!(correlation_id = %command.correlation_id, "handling generate_board command");

    let board = command_handlers::handle_generate_board(&command, &state.rng)?;

    Ok(Json(board))
}

/// POST /moves
#[instrument(skip(state, request), fields(start_position = request.start_position))]
async fn resolve_move(
    State(state): State<AppState>,
    Json(request): Json<ResolveMoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let graph = Graph::from_spaces(request.graph)?;
    if graph.get(request.start_position).is_none() {
        return Err(DomainError::Validation(format!(
            "start_position {} is not on a board of {} spaces",
            request.start_position,
            graph.len()
        ))
        .into());
    }

    let command = commands::ResolveMove {
        correlation_id: Uuid::new_v4(),
        graph,
        start_position: request.start_position,
        roll: request.roll,
        fork_choice: request.fork_choice,
        branch_selection_mode: request.branch_selection_mode,
        seed: request.seed,
    };

    info!(correlation_id = %command.correlation_id, "handling resolve_move command");

    let resolved = command_handlers::handle_resolve_move(&command, &state.rng)?;

    Ok(Json(MoveResponse {
        roll: resolved.roll,
        final_position: resolved.path.final_position,
        reached_end: resolved.path.reached_end,
        path: resolved.path.positions,
    }))
}

/// Returns the router for the boards resource.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_board))
        .route("/moves", post(resolve_move))
}
