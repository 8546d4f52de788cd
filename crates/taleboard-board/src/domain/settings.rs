//! Per-session board configuration.

use serde::{Deserialize, Serialize};
use taleboard_core::error::DomainError;
use tracing::warn;

/// Upper bound on main-line spaces the generator will emit.
pub const MAX_BOARD_LENGTH: i32 = 500;

/// Fewest parallel paths a fork can have.
pub const MIN_BRANCH_PATHS: i32 = 2;

/// Most parallel paths a fork can have.
pub const MAX_BRANCH_PATHS: i32 = 4;

/// How chaotic generation is: fork count and branch length spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RandomizationLevel {
    /// Fewer forks, similar path lengths.
    Low,
    /// Balanced.
    #[default]
    Medium,
    /// More forks, widely varying path lengths.
    High,
}

impl RandomizationLevel {
    /// Inclusive range of spaces on a single branch path.
    #[must_use]
    pub fn path_length_range(self) -> (u32, u32) {
        match self {
            RandomizationLevel::Low => (3, 5),
            RandomizationLevel::Medium => (2, 5),
            RandomizationLevel::High => (2, 7),
        }
    }
}

/// How a token picks its path at a fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BranchSelectionMode {
    /// The engine picks uniformly at random.
    #[default]
    Random,
    /// The moving player picks.
    PlayerChoice,
    /// A six-sided die picks.
    DiceRoll,
}

/// Immutable board configuration for one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSettings {
    /// Number of main-line spaces. Branch spaces and markers do not count.
    pub board_length: i32,
    /// Most paths a single fork may have (2–4).
    pub max_branch_paths: i32,
    /// Fork count and path length spread.
    #[serde(default)]
    pub randomization_level: RandomizationLevel,
    /// Fork resolution policy used at movement time.
    #[serde(default)]
    pub branch_selection_mode: BranchSelectionMode,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            board_length: 20,
            max_branch_paths: 3,
            randomization_level: RandomizationLevel::default(),
            branch_selection_mode: BranchSelectionMode::default(),
        }
    }
}

impl BoardSettings {
    /// Strict boundary check for callers that prefer rejecting bad input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` if `board_length` is not in
    /// `1..=MAX_BOARD_LENGTH` or `max_branch_paths` is outside `2..=4`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(1..=MAX_BOARD_LENGTH).contains(&self.board_length) {
            return Err(DomainError::InvalidSettings(format!(
                "board_length must be between 1 and {MAX_BOARD_LENGTH}, got {}",
                self.board_length
            )));
        }
        if !(MIN_BRANCH_PATHS..=MAX_BRANCH_PATHS).contains(&self.max_branch_paths) {
            return Err(DomainError::InvalidSettings(format!(
                "max_branch_paths must be between {MIN_BRANCH_PATHS} and {MAX_BRANCH_PATHS}, got {}",
                self.max_branch_paths
            )));
        }
        Ok(())
    }

    /// Clamps every field into the range the generator accepts.
    ///
    /// A non-positive `board_length` becomes `0`, which yields an empty board.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let board_length = self.board_length.clamp(0, MAX_BOARD_LENGTH);
        let max_branch_paths = self
            .max_branch_paths
            .clamp(MIN_BRANCH_PATHS, MAX_BRANCH_PATHS);

        if board_length != self.board_length || max_branch_paths != self.max_branch_paths {
            warn!(
                requested_length = self.board_length,
                board_length,
                requested_paths = self.max_branch_paths,
                max_branch_paths,
                "board settings clamped"
            );
        }

        Self {
            board_length,
            max_branch_paths,
            ..*self
        }
    }
}
