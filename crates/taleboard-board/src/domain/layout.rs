//! 2D layout of a board graph for the rendering layer.
//!
//! The main line runs along the X axis at the baseline. Each fork fans its
//! paths out symmetrically in Y, starting one spacing right of the split,
//! and the join lands one spacing past the longest path so every path
//! visually completes before the main line continues.

use serde::{Deserialize, Serialize};
use taleboard_core::error::DomainError;
use tracing::warn;

use super::graph::Graph;
use super::space::{BranchId, Coordinates, Space, SpaceKind};

/// Spacing and baseline used when placing spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance between consecutive spaces.
    pub space_spacing: f64,
    /// Vertical distance between parallel paths of a fork.
    pub branch_spacing: f64,
    /// Y coordinate of the main line.
    pub baseline_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            space_spacing: 150.0,
            branch_spacing: 120.0,
            baseline_y: 0.0,
        }
    }
}

/// A graph with coordinates attached, plus anything that could not be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutBoard {
    /// The input graph with `coordinates` filled in.
    pub graph: Graph,
    /// Spaces skipped or placed with fallbacks because their branch metadata
    /// did not fit the surrounding forks.
    pub inconsistencies: Vec<DomainError>,
}

/// An open fork while walking the graph.
#[derive(Debug)]
struct BranchContext {
    split_position: usize,
    split_x: f64,
    path_count: usize,
    max_path_length: usize,
}

#[allow(clippy::cast_precision_loss)]
fn steps(count: usize) -> f64 {
    count as f64
}

struct Placer<'g> {
    graph: &'g Graph,
    config: LayoutConfig,
    placed: Graph,
    stack: Vec<BranchContext>,
    current_x: f64,
    issues: Vec<DomainError>,
}

impl Placer<'_> {
    fn place(&mut self, position: usize, x: f64, y: f64) {
        self.placed.set_coordinates(position, Coordinates { x, y });
    }

    fn place_on_main_line(&mut self, position: usize) {
        self.place(position, self.current_x, self.config.baseline_y);
        self.current_x += self.config.space_spacing;
    }

    fn open_split(&mut self, split: &Space) {
        let found = self.graph.paths_at(split.position);
        let path_count = split.branch_count.unwrap_or_else(|| {
            self.issues.push(DomainError::topology(
                split.position,
                format!("split without branch_count; using the {found} paths found"),
            ));
            found
        });
        let max_path_length = (0..path_count)
            .map(|i| self.graph.path(BranchId::new(split.position, i)).len())
            .max()
            .unwrap_or(0);

        self.stack.push(BranchContext {
            split_position: split.position,
            split_x: self.current_x,
            path_count,
            max_path_length,
        });
        self.place_on_main_line(split.position);
    }

    fn close_split(&mut self, join: &Space) {
        match self.stack.pop() {
            Some(context) => {
                self.current_x = context.split_x
                    + steps(context.max_path_length + 1) * self.config.space_spacing;
            }
            None => self.issues.push(DomainError::topology(
                join.position,
                "join without an open split",
            )),
        }
        self.place_on_main_line(join.position);
    }

    fn place_on_branch(&mut self, space: &Space, id: BranchId) {
        let Some(context) = self
            .stack
            .iter()
            .rev()
            .find(|c| c.split_position == id.split_position)
        else {
            self.issues.push(DomainError::topology(
                space.position,
                format!("branch space {id} has no open split"),
            ));
            return;
        };
        let Some(ordinal) = self
            .graph
            .path(id)
            .iter()
            .position(|&p| p == space.position)
        else {
            self.issues.push(DomainError::topology(
                space.position,
                format!("space is not indexed on path {id}"),
            ));
            return;
        };

        let branch_index = space.branch_index.unwrap_or(id.path_index);
        let spread = steps(context.path_count.saturating_sub(1)) * self.config.branch_spacing;
        let y = self.config.baseline_y - spread / 2.0
            + steps(branch_index) * self.config.branch_spacing;
        let x = context.split_x + steps(ordinal + 1) * self.config.space_spacing;
        self.place(space.position, x, y);
    }
}

/// Assigns coordinates to every space of `graph`.
///
/// Never fails: spaces whose branch context cannot be found are left
/// without coordinates and reported in [`LaidOutBoard::inconsistencies`].
pub fn layout(graph: &Graph, config: &LayoutConfig) -> LaidOutBoard {
    let mut placer = Placer {
        graph,
        config: *config,
        placed: graph.clone(),
        stack: Vec::new(),
        current_x: 0.0,
        issues: Vec::new(),
    };

    for space in graph.spaces() {
        match (space.kind, space.branch_id) {
            (SpaceKind::BranchSplit, _) => placer.open_split(space),
            (SpaceKind::BranchJoin, _) => placer.close_split(space),
            (_, Some(id)) => placer.place_on_branch(space, id),
            (_, None) => placer.place_on_main_line(space.position),
        }
    }

    let Placer {
        placed,
        stack,
        mut issues,
        ..
    } = placer;
    for context in stack {
        issues.push(DomainError::topology(
            context.split_position,
            "split is never joined",
        ));
    }
    for issue in &issues {
        warn!(%issue, "board layout found a topology inconsistency");
    }

    LaidOutBoard {
        graph: placed,
        inconsistencies: issues,
    }
}
