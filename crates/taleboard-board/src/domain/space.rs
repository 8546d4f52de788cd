//! Board spaces, the atomic nodes of a board graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taleboard_core::error::DomainError;

/// What landing on a space means for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpaceKind {
    /// A plain space.
    Normal,
    /// The story takes a sudden turn.
    PlotTwist,
    /// The player sits out the next turn.
    SkipTurn,
    /// The player contributes twice.
    DoubleContribution,
    /// The player picks any prompt type.
    Wildcard,
    /// The player moves back.
    Rewind,
    /// The player rolls again.
    BonusRoll,
    /// Players contribute together.
    Collaboration,
    /// Marker where the main line diverges into parallel paths.
    BranchSplit,
    /// Marker where the parallel paths of a split reconverge.
    BranchJoin,
}

impl SpaceKind {
    /// The seven kinds a drawn space can take besides `Normal`, in the
    /// order their probability buckets are laid out.
    pub const SPECIAL: [SpaceKind; 7] = [
        SpaceKind::PlotTwist,
        SpaceKind::SkipTurn,
        SpaceKind::DoubleContribution,
        SpaceKind::Wildcard,
        SpaceKind::Rewind,
        SpaceKind::BonusRoll,
        SpaceKind::Collaboration,
    ];

    /// Returns `true` for split and join markers.
    #[must_use]
    pub fn is_marker(self) -> bool {
        matches!(self, SpaceKind::BranchSplit | SpaceKind::BranchJoin)
    }
}

/// Identifies one parallel path: the split it leaves from and its index.
///
/// Rendered and serialized as `"{split_position}-{path_index}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchId {
    /// Position of the `branch-split` marker the path leaves from.
    pub split_position: usize,
    /// 0-based index of the path at that split.
    pub path_index: usize,
}

impl BranchId {
    /// Creates a branch id.
    #[must_use]
    pub fn new(split_position: usize, path_index: usize) -> Self {
        Self {
            split_position,
            path_index,
        }
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.split_position, self.path_index)
    }
}

impl FromStr for BranchId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::Validation(format!("malformed branch id: {s:?}"));
        let (split, path) = s.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            split_position: split.parse().map_err(|_| invalid())?,
            path_index: path.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for BranchId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BranchId> for String {
    fn from(id: BranchId) -> Self {
        id.to_string()
    }
}

/// Rendering coordinates assigned by the layout stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// A single space on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    /// Emission order; doubles as the array index and stable identity.
    pub position: usize,
    /// What the space does.
    pub kind: SpaceKind,
    /// Path this space lies on. Absent on main-line spaces and markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    /// Index of the path this space belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_index: Option<usize>,
    /// Number of paths at the fork. Present only on split and join markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_count: Option<usize>,
    /// Absent until the layout stage runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Space {
    /// A main-line space.
    #[must_use]
    pub fn main_line(position: usize, kind: SpaceKind) -> Self {
        Self {
            position,
            kind,
            branch_id: None,
            branch_index: None,
            branch_count: None,
            coordinates: None,
        }
    }

    /// A split or join marker for a fork with `branch_count` paths.
    #[must_use]
    pub fn marker(position: usize, kind: SpaceKind, branch_count: usize) -> Self {
        Self {
            branch_count: Some(branch_count),
            ..Self::main_line(position, kind)
        }
    }

    /// A space on the path identified by `branch_id`.
    #[must_use]
    pub fn on_branch(position: usize, kind: SpaceKind, branch_id: BranchId) -> Self {
        Self {
            branch_id: Some(branch_id),
            branch_index: Some(branch_id.path_index),
            ..Self::main_line(position, kind)
        }
    }

    /// Returns `true` for spaces that count toward the board length.
    #[must_use]
    pub fn is_main_line(&self) -> bool {
        self.branch_id.is_none() && !self.kind.is_marker()
    }
}
