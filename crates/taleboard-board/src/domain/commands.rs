//! Commands accepted by the board engine.

use taleboard_core::command::Command;
use uuid::Uuid;

use super::graph::Graph;
use super::layout::LayoutConfig;
use super::settings::{BoardSettings, BranchSelectionMode};

/// Command to generate and lay out a new board for a session.
#[derive(Debug, Clone)]
pub struct GenerateBoard {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Session board configuration.
    pub settings: BoardSettings,
    /// Spacing used by the layout stage.
    pub layout: LayoutConfig,
    /// Seed for a reproducible board; the shared RNG is used when absent.
    pub seed: Option<u64>,
}

impl Command for GenerateBoard {
    fn command_type(&self) -> &'static str {
        "board.generate"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Command to resolve one player's roll on an existing board.
#[derive(Debug, Clone)]
pub struct ResolveMove {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session's board.
    pub graph: Graph,
    /// Position the token starts from.
    pub start_position: usize,
    /// Die result; the engine rolls one when absent.
    pub roll: Option<u32>,
    /// The player's path choice for the first split crossed.
    pub fork_choice: Option<usize>,
    /// Session fork resolution policy.
    pub branch_selection_mode: BranchSelectionMode,
    /// Seed for a reproducible move; the shared RNG is used when absent.
    pub seed: Option<u64>,
}

impl Command for ResolveMove {
    fn command_type(&self) -> &'static str {
        "board.resolve_move"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}
