//! Decomposed search that solves a goal description one sub-goal at a time.
//!
//! Each sub-search runs from where the previous plan left off, so the
//! concatenated plan is valid from the original initial state. Earlier
//! sub-goals are not protected while later ones are being solved, which makes
//! this incomplete: a later sub-search can succeed while undoing earlier
//! work, and a solvable level can come back as unsolvable when the sub-goal
//! order is unlucky.

use std::rc::Rc;

use log::info;

use crate::actions::{ActionSet, Plan};
use crate::frontier::Frontier;
use crate::goal::GoalDescription;
use crate::search::{graph_search, SearchLimits, SearchOutcome, Stats};
use crate::state::State;

pub fn serial_graph_search(
    initial: &Rc<State>,
    action_library: &ActionSet,
    goal_description: &GoalDescription,
    frontier: &mut dyn Frontier,
    limits: &SearchLimits,
    print_status: bool,
) -> SearchOutcome {
    let mut stats = Stats::new();
    let mut plan: Plan = vec![];
    let mut state = Rc::clone(initial);

    for (index, &sub) in goal_description.sub_goals().iter().enumerate() {
        let sub_goal = goal_description.with_sub_goals(vec![sub]);
        info!(
            "solving sub-goal {} of {}",
            index + 1,
            goal_description.num_sub_goals()
        );

        let outcome = graph_search(
            &state,
            action_library,
            &sub_goal,
            frontier,
            limits,
            print_status,
        );
        stats.merge(&outcome.stats);

        let sub_plan = match outcome.plan {
            Some(sub_plan) => sub_plan,
            None => {
                info!("sub-goal {} has no solution, giving up", index + 1);
                return SearchOutcome { plan: None, stats };
            }
        };

        state = state.result_of_plan(&sub_plan);
        plan.extend(sub_plan);
    }

    SearchOutcome {
        plan: Some(plan),
        stats,
    }
}
