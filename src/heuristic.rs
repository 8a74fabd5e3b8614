use std::fmt::Debug;

use crate::goal::GoalDescription;
use crate::level::Level;
use crate::state::State;

/// Stand-in distance for a goal with no matching box left; large enough to
/// dominate any real distance on a level.
const APPROX_INFINITY: i32 = 1 << 20;

/// An estimate of the remaining cost, used only to order the frontier - never
/// for correctness.
pub trait Heuristic: Debug {
    /// Runs once before a search; may build lookup tables. Must be idempotent
    /// since frontiers can be reused across searches on the same level.
    fn preprocess(&mut self, _level: &Level) {}

    /// Estimated remaining cost, non-negative.
    fn h(&self, state: &State, goal_description: &GoalDescription) -> i32;

    fn name(&self) -> &'static str;
}

/// Number of unsatisfied sub-goals. Admissible but weak.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalCount;

impl Heuristic for GoalCount {
    fn h(&self, state: &State, goal_description: &GoalDescription) -> i32 {
        goal_description
            .sub_goals()
            .iter()
            .filter(|sub| !sub.is_satisfied(state))
            .count() as i32
    }

    fn name(&self) -> &'static str {
        "goal-count"
    }
}

/// Sum of Manhattan distances, greedily pairing each box goal with the
/// nearest still-unassigned box of the matching character, normalized by the
/// number of sub-goals considered.
///
/// The greedy assignment can overestimate the optimal matching, so this is an
/// approximate heuristic, not an admissible one. Good enough as an ordering
/// hint, which is all a heuristic is used for here.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceSum;

impl Heuristic for DistanceSum {
    fn h(&self, state: &State, goal_description: &GoalDescription) -> i32 {
        let mut assigned = vec![false; state.box_positions.len()];
        let mut total = 0;
        let mut counted = 0;

        for sub in goal_description.sub_goals() {
            if !sub.positive {
                continue;
            }
            counted += 1;
            if sub.character.is_ascii_digit() {
                match state
                    .agent_positions
                    .iter()
                    .find(|&&(_, ch)| ch == sub.character)
                {
                    Some(&(pos, _)) => total += pos.dist(sub.position),
                    None => total += APPROX_INFINITY,
                }
            } else {
                let nearest = state
                    .box_positions
                    .iter()
                    .enumerate()
                    .filter(|&(i, &(_, ch))| !assigned[i] && ch == sub.character)
                    .min_by_key(|&(_, &(pos, _))| pos.dist(sub.position));
                match nearest {
                    Some((i, &(pos, _))) => {
                        assigned[i] = true;
                        total += pos.dist(sub.position);
                    }
                    None => total += APPROX_INFINITY,
                }
            }
        }

        if counted == 0 {
            0
        } else {
            total / counted
        }
    }

    fn name(&self) -> &'static str {
        "distance-sum"
    }
}
