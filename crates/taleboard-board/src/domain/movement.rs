//! Movement resolution: the ordered positions a token passes through.

use serde::{Deserialize, Serialize};
use taleboard_core::error::DomainError;
use taleboard_core::rng::RandomSource;
use tracing::debug;

use super::graph::Graph;
use super::settings::BranchSelectionMode;
use super::space::{BranchId, Space, SpaceKind};

/// Most steps resolved for a single roll.
pub const MAX_ROLL: u32 = 64;

/// Number of faces on the movement die.
pub const DIE_FACES: u32 = 6;

/// Paths assumed at a split that carries no `branch_count`.
const DEFAULT_BRANCH_COUNT: usize = 2;

/// The resolved traversal for one roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePath {
    /// Every position entered, in order. At most `roll` entries.
    pub positions: Vec<usize>,
    /// Where the token ends: the last entered position, or the start.
    pub final_position: usize,
    /// `true` when the end of the board cut the move short.
    pub reached_end: bool,
}

/// How the first split crossed during a roll is resolved.
#[derive(Debug, Clone, Copy)]
enum FirstFork {
    Random,
    Chosen(usize),
    DiceRoll,
}

/// Rolls the movement die: `1..=6`.
pub fn roll_die(rng: &mut dyn RandomSource) -> u32 {
    rng.next_u32_range(1, DIE_FACES)
}

/// Checks a fork choice against the paths of the split at `split_position`.
///
/// # Errors
///
/// Returns `DomainError::OutOfRangeForkChoice` if `choice` names no path,
/// or `DomainError::Validation` if `split_position` is not a split.
pub fn check_fork_choice(
    graph: &Graph,
    split_position: usize,
    choice: usize,
) -> Result<(), DomainError> {
    let split = graph
        .get(split_position)
        .filter(|s| s.kind == SpaceKind::BranchSplit)
        .ok_or_else(|| {
            DomainError::Validation(format!("position {split_position} is not a branch split"))
        })?;
    let branch_count = split.branch_count.unwrap_or(DEFAULT_BRANCH_COUNT);
    if choice >= branch_count {
        return Err(DomainError::OutOfRangeForkChoice {
            choice,
            branch_count,
        });
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn random_path(rng: &mut dyn RandomSource, branch_count: usize) -> usize {
    let max = u32::try_from(branch_count.saturating_sub(1)).unwrap_or(u32::MAX);
    rng.next_u32_range(0, max) as usize
}

struct Walker<'a> {
    graph: &'a Graph,
    rng: &'a mut dyn RandomSource,
    first_fork: Option<FirstFork>,
}

impl Walker<'_> {
    fn pick_path(&mut self, split: &Space) -> usize {
        let branch_count = split.branch_count.unwrap_or(DEFAULT_BRANCH_COUNT).max(1);
        let policy = self.first_fork.take().unwrap_or(FirstFork::Random);

        let chosen = match policy {
            FirstFork::Chosen(choice) => {
                match check_fork_choice(self.graph, split.position, choice) {
                    Ok(()) => choice,
                    Err(err) => {
                        debug!(%err, "falling back to a random path");
                        random_path(&mut *self.rng, branch_count)
                    }
                }
            }
            FirstFork::DiceRoll => {
                let die = roll_die(&mut *self.rng) as usize;
                die.saturating_sub(1) % branch_count
            }
            FirstFork::Random => random_path(&mut *self.rng, branch_count),
        };
        debug!(split = split.position, chosen, branch_count, "fork resolved");
        chosen
    }

    /// The space a token enters when leaving `current`, if any.
    fn next(&mut self, current: &Space) -> Option<usize> {
        if current.kind == SpaceKind::BranchSplit {
            let chosen = self.pick_path(current);
            return self
                .graph
                .path(BranchId::new(current.position, chosen))
                .first()
                .copied();
        }
        if let Some(id) = current.branch_id {
            let members = self.graph.path(id);
            let ordinal = members.iter().position(|&p| p == current.position)?;
            return match members.get(ordinal + 1) {
                Some(&next) => Some(next),
                None => self.graph.next_join_after(current.position),
            };
        }
        let next = current.position + 1;
        (next < self.graph.len()).then_some(next)
    }
}

fn walk(
    graph: &Graph,
    start: usize,
    roll: u32,
    first_fork: FirstFork,
    rng: &mut dyn RandomSource,
) -> MovePath {
    let steps = roll.min(MAX_ROLL);
    if steps < roll {
        debug!(roll, steps, "roll clamped");
    }

    let mut walker = Walker {
        graph,
        rng,
        first_fork: Some(first_fork),
    };
    let mut positions = Vec::with_capacity(steps as usize);
    let mut current = start;
    let mut reached_end = false;

    for _ in 0..steps {
        let Some(space) = graph.get(current) else {
            reached_end = true;
            break;
        };
        let Some(next) = walker.next(space) else {
            reached_end = true;
            break;
        };
        positions.push(next);
        current = next;
    }

    MovePath {
        final_position: positions.last().copied().unwrap_or(start),
        positions,
        reached_end,
    }
}

/// Resolves a roll from `start`.
///
/// `fork_choice` applies to the first split crossed during this roll; an
/// out-of-range choice, and every later split, is resolved uniformly at
/// random from `rng`. The path stops early at the end of the board.
pub fn resolve(
    graph: &Graph,
    start: usize,
    roll: u32,
    fork_choice: Option<usize>,
    rng: &mut dyn RandomSource,
) -> MovePath {
    let first_fork = fork_choice.map_or(FirstFork::Random, FirstFork::Chosen);
    walk(graph, start, roll, first_fork, rng)
}

/// Resolves a roll honouring the session's `BranchSelectionMode`.
///
/// `random` ignores `player_choice`, `player-choice` behaves like
/// [`resolve`], and `dice-roll` rolls the die at the first split and takes
/// `(die - 1) % branch_count`.
pub fn resolve_with_mode(
    graph: &Graph,
    mode: BranchSelectionMode,
    start: usize,
    roll: u32,
    player_choice: Option<usize>,
    rng: &mut dyn RandomSource,
) -> MovePath {
    let first_fork = match mode {
        BranchSelectionMode::Random => FirstFork::Random,
        BranchSelectionMode::PlayerChoice => {
            player_choice.map_or(FirstFork::Random, FirstFork::Chosen)
        }
        BranchSelectionMode::DiceRoll => FirstFork::DiceRoll,
    };
    walk(graph, start, roll, first_fork, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generator::generate;
    use crate::domain::settings::{BoardSettings, RandomizationLevel};
    use crate::domain::space::SpaceKind::{BranchJoin, BranchSplit, Normal};
    use taleboard_core::rng::SeededRng;
    use taleboard_test_support::{MockRng, SequenceRng};

    /// 0-1 main, 2 split(3), 3-4 path 2-0, 5 path 2-1, 6-8 path 2-2,
    /// 9 join(3), 10-11 main, 12 split(2), 13 path 12-0, 14 path 12-1,
    /// 15 join(2), 16 main.
    fn two_fork_graph() -> Graph {
        Graph::from_spaces(vec![
            Space::main_line(0, Normal),
            Space::main_line(1, Normal),
            Space::marker(2, BranchSplit, 3),
            Space::on_branch(3, Normal, BranchId::new(2, 0)),
            Space::on_branch(4, Normal, BranchId::new(2, 0)),
            Space::on_branch(5, Normal, BranchId::new(2, 1)),
            Space::on_branch(6, Normal, BranchId::new(2, 2)),
            Space::on_branch(7, Normal, BranchId::new(2, 2)),
            Space::on_branch(8, Normal, BranchId::new(2, 2)),
            Space::marker(9, BranchJoin, 3),
            Space::main_line(10, Normal),
            Space::main_line(11, Normal),
            Space::marker(12, BranchSplit, 2),
            Space::on_branch(13, Normal, BranchId::new(12, 0)),
            Space::on_branch(14, Normal, BranchId::new(12, 1)),
            Space::marker(15, BranchJoin, 2),
            Space::main_line(16, Normal),
        ])
        .unwrap()
    }

    #[test]
    fn test_main_line_steps_advance_one_index() {
        let graph = two_fork_graph();

        let path = resolve(&graph, 0, 2, None, &mut SequenceRng::new(vec![]));

        assert_eq!(path.positions, vec![1, 2]);
        assert_eq!(path.final_position, 2);
        assert!(!path.reached_end);
    }

    #[test]
    fn test_fork_choice_lands_on_chosen_path() {
        let graph = two_fork_graph();

        let path = resolve(&graph, 2, 1, Some(1), &mut SequenceRng::new(vec![]));

        assert_eq!(path.positions, vec![5]);
        assert_eq!(graph.get(5).unwrap().branch_id, Some(BranchId::new(2, 1)));
    }

    #[test]
    fn test_last_path_space_advances_to_join() {
        let graph = two_fork_graph();

        let path = resolve(&graph, 1, 4, Some(1), &mut SequenceRng::new(vec![]));

        assert_eq!(path.positions, vec![2, 5, 9, 10]);
    }

    #[test]
    fn test_walks_whole_path_before_join() {
        let graph = two_fork_graph();

        let path = resolve(&graph, 2, 5, Some(2), &mut SequenceRng::new(vec![]));

        assert_eq!(path.positions, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_out_of_range_choice_falls_back_to_random() {
        let graph = two_fork_graph();
        let mut rng = SequenceRng::new(vec![2]);

        let path = resolve(&graph, 2, 1, Some(7), &mut rng);

        assert_eq!(path.positions, vec![6]);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_choice_applies_only_to_first_split() {
        let graph = two_fork_graph();
        // Second split resolved by the RNG: path 1.
        let mut rng = SequenceRng::new(vec![1]);

        let path = resolve(&graph, 1, 7, Some(0), &mut rng);

        assert_eq!(path.positions, vec![2, 3, 4, 9, 10, 11, 12]);
        let path = resolve(&graph, 11, 2, None, &mut SequenceRng::new(vec![1]));
        assert_eq!(path.positions, vec![12, 14]);

        let mut rng = SequenceRng::new(vec![1]);
        let path = resolve(&graph, 1, 9, Some(0), &mut rng);
        assert_eq!(path.positions, vec![2, 3, 4, 9, 10, 11, 12, 14, 15]);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_end_of_board_shortens_path() {
        let graph = two_fork_graph();
        let last = graph.len() - 1;

        let path = resolve(&graph, last - 1, 6, None, &mut MockRng);

        assert_eq!(path.positions, vec![last]);
        assert_eq!(path.final_position, last);
        assert!(path.reached_end);
    }

    #[test]
    fn test_unknown_start_yields_empty_path() {
        let graph = two_fork_graph();

        let path = resolve(&graph, 999, 3, None, &mut MockRng);

        assert!(path.positions.is_empty());
        assert_eq!(path.final_position, 999);
        assert!(path.reached_end);
    }

    #[test]
    fn test_zero_roll_stays_put() {
        let path = resolve(&two_fork_graph(), 4, 0, None, &mut MockRng);

        assert!(path.positions.is_empty());
        assert_eq!(path.final_position, 4);
        assert!(!path.reached_end);
    }

    #[test]
    fn test_roll_is_clamped() {
        let spaces = (0..200).map(|p| Space::main_line(p, Normal)).collect();
        let graph = Graph::from_spaces(spaces).unwrap();

        let path = resolve(&graph, 0, 1_000, None, &mut MockRng);

        assert_eq!(path.positions.len(), MAX_ROLL as usize);
    }

    #[test]
    fn test_random_mode_ignores_player_choice() {
        let graph = two_fork_graph();
        let mut rng = SequenceRng::new(vec![0]);

        let path = resolve_with_mode(
            &graph,
            BranchSelectionMode::Random,
            2,
            1,
            Some(2),
            &mut rng,
        );

        assert_eq!(path.positions, vec![3]);
    }

    #[test]
    fn test_player_choice_mode_uses_choice() {
        let graph = two_fork_graph();

        let path = resolve_with_mode(
            &graph,
            BranchSelectionMode::PlayerChoice,
            2,
            1,
            Some(2),
            &mut SequenceRng::new(vec![]),
        );

        assert_eq!(path.positions, vec![6]);
    }

    #[test]
    fn test_dice_roll_mode_maps_die_onto_paths() {
        let graph = two_fork_graph();

        // A five on a three-path split: (5 - 1) % 3 = 1.
        let path = resolve_with_mode(
            &graph,
            BranchSelectionMode::DiceRoll,
            2,
            1,
            None,
            &mut SequenceRng::new(vec![5]),
        );

        assert_eq!(path.positions, vec![5]);
    }

    #[test]
    fn test_check_fork_choice() {
        let graph = two_fork_graph();

        assert!(check_fork_choice(&graph, 2, 2).is_ok());
        assert_eq!(
            check_fork_choice(&graph, 12, 2),
            Err(DomainError::OutOfRangeForkChoice {
                choice: 2,
                branch_count: 2
            })
        );
        assert!(matches!(
            check_fork_choice(&graph, 0, 0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_roll_die_stays_on_faces() {
        let mut rng = SeededRng::new(5);

        for _ in 0..200 {
            assert!((1..=DIE_FACES).contains(&roll_die(&mut rng)));
        }
    }

    #[test]
    fn test_paths_on_generated_boards_are_bounded_and_valid() {
        let settings = BoardSettings {
            board_length: 30,
            max_branch_paths: 4,
            randomization_level: RandomizationLevel::High,
            ..BoardSettings::default()
        };
        for seed in 0..30 {
            let graph = generate(&settings, &mut SeededRng::new(seed));
            let mut rng = SeededRng::new(seed + 1_000);
            for start in 0..graph.len() {
                for roll in 1..=6 {
                    let path = resolve(&graph, start, roll, None, &mut rng);

                    assert!(path.positions.len() <= roll as usize);
                    assert!(path.positions.iter().all(|&p| p < graph.len()));
                    if !path.reached_end {
                        assert_eq!(path.positions.len(), roll as usize);
                    }
                }
            }
        }
    }

    #[test]
    fn test_resolution_is_deterministic_for_a_seed() {
        let settings = BoardSettings {
            board_length: 50,
            max_branch_paths: 4,
            randomization_level: RandomizationLevel::High,
            ..BoardSettings::default()
        };
        let graph = generate(&settings, &mut SeededRng::new(8));

        let run = || {
            let mut rng = SeededRng::new(77);
            (0..graph.len())
                .map(|start| resolve(&graph, start, 6, Some(1), &mut rng))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_walk_from_start_reaches_end_of_generated_board() {
        let settings = BoardSettings {
            board_length: 15,
            max_branch_paths: 3,
            randomization_level: RandomizationLevel::Low,
            ..BoardSettings::default()
        };
        let graph = generate(&settings, &mut SeededRng::new(15));
        let mut rng = SeededRng::new(16);

        // The only fork sits after five main-line spaces.
        let first = resolve(&graph, 0, 6, None, &mut rng);
        assert_eq!(first.positions.len(), 6);
        assert_eq!(first.positions[..5], [1, 2, 3, 4, 5]);
        let entered = graph.get(first.final_position).unwrap();
        assert_eq!(entered.branch_id.map(|id| id.split_position), Some(5));

        let mut position = first.final_position;
        let mut turns = 0;
        while position != graph.len() - 1 {
            position = resolve(&graph, position, 6, None, &mut rng).final_position;
            turns += 1;
            assert!(turns < 50, "token never reached the end");
        }
    }
}
