//! The immutable board graph and its lookup index.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use taleboard_core::error::DomainError;

use super::space::{BranchId, Coordinates, Space, SpaceKind};

/// Lookups built once per graph so traversal never rescans the spaces.
#[derive(Debug, Clone, Default, PartialEq)]
struct GraphIndex {
    /// Member positions of each branch path, in emission order.
    paths: HashMap<BranchId, Vec<usize>>,
    /// Number of distinct paths found for each split position.
    paths_per_split: HashMap<usize, usize>,
    /// Positions of every `branch-join`, ascending.
    joins: Vec<usize>,
}

impl GraphIndex {
    fn build(spaces: &[Space]) -> Self {
        let mut index = Self::default();
        for space in spaces {
            if let Some(id) = space.branch_id {
                let members = index.paths.entry(id).or_default();
                if members.is_empty() {
                    *index.paths_per_split.entry(id.split_position).or_default() += 1;
                }
                members.push(space.position);
            }
            if space.kind == SpaceKind::BranchJoin {
                index.joins.push(space.position);
            }
        }
        index
    }
}

/// Ordered sequence of spaces making up one session's board.
///
/// Positions are contiguous from `0`, so a space's position is also its
/// index into [`Graph::spaces`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Space>", into = "Vec<Space>")]
pub struct Graph {
    spaces: Vec<Space>,
    index: GraphIndex,
}

impl Graph {
    /// Builds a graph from spaces the generator emitted in position order.
    pub(crate) fn from_emitted(spaces: Vec<Space>) -> Self {
        let index = GraphIndex::build(&spaces);
        Self { spaces, index }
    }

    /// Builds a graph from spaces received from outside the engine.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if positions are not `0..N` in
    /// order, or a space's `branch_index` disagrees with its `branch_id`.
    pub fn from_spaces(spaces: Vec<Space>) -> Result<Self, DomainError> {
        for (expected, space) in spaces.iter().enumerate() {
            if space.position != expected {
                return Err(DomainError::Validation(format!(
                    "space at index {expected} has position {}",
                    space.position
                )));
            }
            if let (Some(id), Some(branch_index)) = (space.branch_id, space.branch_index) {
                if id.path_index != branch_index {
                    return Err(DomainError::Validation(format!(
                        "space {expected} has branch_id {id} but branch_index {branch_index}"
                    )));
                }
            }
        }
        Ok(Self::from_emitted(spaces))
    }

    /// All spaces in position order.
    #[must_use]
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    /// Number of spaces, markers and branch spaces included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// Returns `true` for a board with no spaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// The space at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Space> {
        self.spaces.get(position)
    }

    /// Member positions of a branch path in traversal order.
    #[must_use]
    pub fn path(&self, id: BranchId) -> &[usize] {
        self.index.paths.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct paths leaving the split at `split_position`.
    #[must_use]
    pub fn paths_at(&self, split_position: usize) -> usize {
        self.index
            .paths_per_split
            .get(&split_position)
            .copied()
            .unwrap_or(0)
    }

    /// The nearest `branch-join` strictly after `position`.
    #[must_use]
    pub fn next_join_after(&self, position: usize) -> Option<usize> {
        let at = self.index.joins.partition_point(|&join| join <= position);
        self.index.joins.get(at).copied()
    }

    /// Count of main-line spaces, i.e. the effective board length.
    #[must_use]
    pub fn main_line_len(&self) -> usize {
        self.spaces.iter().filter(|s| s.is_main_line()).count()
    }

    pub(crate) fn set_coordinates(&mut self, position: usize, coordinates: Coordinates) {
        if let Some(space) = self.spaces.get_mut(position) {
            space.coordinates = Some(coordinates);
        }
    }

    /// Checks the split/join closure invariants and reports every violation.
    ///
    /// A well-formed graph has exactly one join per split, every path of a
    /// split is non-empty and leads to that join, `branch_count` on both
    /// markers matches the number of paths, and no main-line space sits
    /// between a split and its join.
    #[must_use]
    pub fn verify_topology(&self) -> Vec<DomainError> {
        struct OpenSplit {
            position: usize,
            branch_count: Option<usize>,
            seen: BTreeSet<usize>,
        }

        let mut issues = Vec::new();
        let mut open: Vec<OpenSplit> = Vec::new();

        for space in &self.spaces {
            match (space.kind, space.branch_id) {
                (SpaceKind::BranchSplit, _) => {
                    if space.branch_count.is_none() {
                        issues.push(DomainError::topology(
                            space.position,
                            "split without branch_count",
                        ));
                    }
                    open.push(OpenSplit {
                        position: space.position,
                        branch_count: space.branch_count,
                        seen: BTreeSet::new(),
                    });
                }
                (SpaceKind::BranchJoin, _) => {
                    let Some(split) = open.pop() else {
                        issues.push(DomainError::topology(
                            space.position,
                            "join without an open split",
                        ));
                        continue;
                    };
                    self.check_closed_split(
                        &split.seen,
                        split.position,
                        split.branch_count,
                        space,
                        &mut issues,
                    );
                }
                (_, Some(id)) => {
                    let split = open
                        .iter_mut()
                        .rev()
                        .find(|s| s.position == id.split_position);
                    let Some(split) = split else {
                        issues.push(DomainError::topology(
                            space.position,
                            format!("branch space {id} outside its split"),
                        ));
                        continue;
                    };
                    if split.branch_count.is_some_and(|count| id.path_index >= count) {
                        issues.push(DomainError::topology(
                            space.position,
                            format!(
                                "path index {} exceeds the split's branch_count",
                                id.path_index
                            ),
                        ));
                    }
                    split.seen.insert(id.path_index);
                }
                (_, None) => {
                    if let Some(split) = open.last() {
                        issues.push(DomainError::topology(
                            space.position,
                            format!("main-line space inside the fork opened at {}", split.position),
                        ));
                    }
                }
            }
        }

        for split in open {
            issues.push(DomainError::topology(split.position, "split is never joined"));
        }
        issues
    }

    fn check_closed_split(
        &self,
        seen: &BTreeSet<usize>,
        split_position: usize,
        branch_count: Option<usize>,
        join: &Space,
        issues: &mut Vec<DomainError>,
    ) {
        if join.branch_count != branch_count {
            issues.push(DomainError::topology(
                join.position,
                format!(
                    "join branch_count {:?} does not match split at {split_position} \
                     ({branch_count:?})",
                    join.branch_count
                ),
            ));
        }
        if let Some(count) = branch_count {
            if seen.len() != count || seen.iter().copied().ne(0..count) {
                issues.push(DomainError::topology(
                    split_position,
                    format!("split declares {count} paths but {} were found", seen.len()),
                ));
            }
        }
        for &path_index in seen {
            let id = BranchId::new(split_position, path_index);
            let last = self.path(id).last().copied();
            if last.and_then(|p| self.next_join_after(p)) != Some(join.position) {
                issues.push(DomainError::topology(
                    split_position,
                    format!("path {id} does not lead to the join at {}", join.position),
                ));
            }
        }
    }
}

impl TryFrom<Vec<Space>> for Graph {
    type Error = DomainError;

    fn try_from(spaces: Vec<Space>) -> Result<Self, Self::Error> {
        Self::from_spaces(spaces)
    }
}

impl From<Graph> for Vec<Space> {
    fn from(graph: Graph) -> Self {
        graph.spaces
    }
}
