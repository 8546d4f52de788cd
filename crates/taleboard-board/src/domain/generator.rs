//! Board graph generation.
//!
//! Walks the main line emitting spaces, and at each scheduled fork point
//! emits a whole fork instead: a split marker, every path's spaces one path
//! after another, then the join marker. Positions are handed out by a
//! counter in emission order, so path spaces of a fork are numbered before
//! the join even though a token only ever visits one path.

use taleboard_core::rng::RandomSource;
use tracing::debug;

use super::graph::Graph;
use super::settings::{BoardSettings, RandomizationLevel};
use super::space::{BranchId, Space, SpaceKind};

/// Most forks a single board may contain.
pub const MAX_FORKS: usize = 8;

/// Fewest main-line spaces between two consecutive fork points.
pub const MIN_FORK_GAP: usize = 3;

/// No fork is scheduled before this many main-line spaces.
const FORK_MARGIN_START: usize = 5;

/// No fork is scheduled within this many spaces of the end of the main line.
const FORK_MARGIN_END: usize = 10;

/// Probability that a drawn space is `normal`.
const NORMAL_WEIGHT: f64 = 0.7;

/// Cumulative thresholds over `SpaceKind::SPECIAL` for the second draw.
const SPECIAL_THRESHOLDS: [f64; 7] = [0.15, 0.30, 0.45, 0.60, 0.75, 0.90, 1.0];

/// Generation-time bookkeeping for one fork.
#[derive(Debug)]
struct BranchInfo {
    split_position: usize,
    path_lengths: Vec<usize>,
}

impl BranchInfo {
    fn path_count(&self) -> usize {
        self.path_lengths.len()
    }

    /// The join comes right after the last space of the last path.
    fn join_position(&self) -> usize {
        self.split_position + self.path_lengths.iter().sum::<usize>() + 1
    }
}

/// Draws a `usize` in `[min, max]` through the `u32` interface.
#[allow(clippy::cast_possible_truncation)]
fn draw(rng: &mut dyn RandomSource, min: usize, max: usize) -> usize {
    let min = u32::try_from(min).unwrap_or(u32::MAX);
    let max = u32::try_from(max).unwrap_or(u32::MAX);
    rng.next_u32_range(min, max) as usize
}

/// Draws a space kind: 70% `normal`, the rest spread over the special kinds.
pub fn draw_kind(rng: &mut dyn RandomSource) -> SpaceKind {
    if rng.next_f64() < NORMAL_WEIGHT {
        return SpaceKind::Normal;
    }
    let roll = rng.next_f64();
    SpaceKind::SPECIAL
        .iter()
        .zip(SPECIAL_THRESHOLDS)
        .find(|&(_, threshold)| roll < threshold)
        .map_or(SpaceKind::Collaboration, |(&kind, _)| kind)
}

/// Number of forks for a board, before spacing removes any.
fn fork_count(
    board_length: usize,
    level: RandomizationLevel,
    rng: &mut dyn RandomSource,
) -> usize {
    let base = match board_length {
        0..=15 => 1,
        16..=20 => {
            if rng.next_f64() < 0.5 {
                1
            } else {
                2
            }
        }
        21..=30 => 2,
        _ => draw(rng, 3, 4),
    };
    let adjusted = match level {
        RandomizationLevel::Low => base.saturating_sub(1).max(1),
        RandomizationLevel::Medium => base,
        RandomizationLevel::High => base + draw(rng, 0, 1),
    };
    adjusted.min(MAX_FORKS)
}

/// Main-line counts at which forks are emitted, ascending and at least
/// `MIN_FORK_GAP` apart. Empty when the board is too short for a fork.
fn fork_points(
    board_length: usize,
    level: RandomizationLevel,
    rng: &mut dyn RandomSource,
) -> Vec<usize> {
    let earliest = FORK_MARGIN_START;
    let Some(latest) = board_length
        .checked_sub(FORK_MARGIN_END)
        .filter(|&latest| latest >= earliest)
    else {
        return Vec::new();
    };

    let count = fork_count(board_length, level, rng);
    let section = board_length / (count + 1);
    let variance = section * 3 / 10;

    let mut points: Vec<usize> = (1..=count)
        .map(|i| {
            let jitter = if variance > 0 {
                draw(rng, 0, 2 * variance - 1)
            } else {
                0
            };
            (section * i + jitter)
                .saturating_sub(variance)
                .clamp(earliest, latest)
        })
        .collect();
    points.sort_unstable();

    let mut spaced: Vec<usize> = Vec::with_capacity(points.len());
    for point in points {
        if spaced.last().is_none_or(|&last| point >= last + MIN_FORK_GAP) {
            spaced.push(point);
        }
    }
    spaced
}

/// Accumulates emitted spaces and owns the position counter.
struct Emitter<'r> {
    rng: &'r mut dyn RandomSource,
    spaces: Vec<Space>,
    next_position: usize,
}

impl Emitter<'_> {
    fn take_position(&mut self) -> usize {
        let position = self.next_position;
        self.next_position += 1;
        position
    }

    fn emit_main_line(&mut self) {
        let kind = draw_kind(self.rng);
        let position = self.take_position();
        self.spaces.push(Space::main_line(position, kind));
    }

    fn emit_fork(&mut self, max_paths: usize, level: RandomizationLevel) {
        let path_count = draw(self.rng, 2, max_paths);
        let (min_length, max_length) = level.path_length_range();
        let path_lengths = (0..path_count)
            .map(|_| draw(self.rng, min_length as usize, max_length as usize).max(1))
            .collect();

        let split_position = self.take_position();
        self.spaces
            .push(Space::marker(split_position, SpaceKind::BranchSplit, path_count));
        let branch = BranchInfo {
            split_position,
            path_lengths,
        };

        for (path_index, &length) in branch.path_lengths.iter().enumerate() {
            let id = BranchId::new(split_position, path_index);
            for _ in 0..length {
                let kind = draw_kind(self.rng);
                let position = self.take_position();
                self.spaces.push(Space::on_branch(position, kind, id));
            }
        }

        let join_position = self.take_position();
        debug_assert_eq!(join_position, branch.join_position());
        self.spaces.push(Space::marker(
            join_position,
            SpaceKind::BranchJoin,
            branch.path_count(),
        ));

        debug!(
            split_position,
            join_position,
            path_lengths = ?branch.path_lengths,
            "emitted fork"
        );
    }
}

/// Generates a board graph from `settings`.
///
/// Settings are clamped first (see [`BoardSettings::normalized`]); a
/// non-positive `board_length` yields an empty graph. The result is a pure
/// function of the sequence `rng` produces.
pub fn generate(settings: &BoardSettings, rng: &mut dyn RandomSource) -> Graph {
    let settings = settings.normalized();
    let board_length = usize::try_from(settings.board_length).unwrap_or(0);
    if board_length == 0 {
        return Graph::default();
    }
    let max_paths = usize::try_from(settings.max_branch_paths).unwrap_or(2);
    let level = settings.randomization_level;

    let points = fork_points(board_length, level, rng);
    debug!(board_length, fork_points = ?points, "scheduled forks");

    let mut emitter = Emitter {
        rng,
        spaces: Vec::with_capacity(board_length * 2),
        next_position: 0,
    };
    let mut main_line = 0;
    let mut next_fork = 0;

    while main_line < board_length {
        if points.get(next_fork).is_some_and(|&point| main_line >= point) {
            emitter.emit_fork(max_paths, level);
            next_fork += 1;
        } else {
            emitter.emit_main_line();
            main_line += 1;
        }
    }

    Graph::from_emitted(emitter.spaces)
}
