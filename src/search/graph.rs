//! Core best-effort graph search over joint-action state spaces.

use std::process;
use std::rc::Rc;

use fnv::FnvHashSet;
use log::{debug, info};

use crate::actions::ActionSet;
use crate::frontier::Frontier;
use crate::goal::GoalDescription;
use crate::memory;
use crate::search::{SearchLimits, SearchOutcome, Stats};
use crate::state::State;

/// Searches for a plan taking `initial` to a state satisfying
/// `goal_description`, exploring in the order the frontier dictates.
///
/// States are deduplicated by their agent and box positions, so each distinct
/// configuration is expanded at most once. When the initial state already
/// satisfies the goal the result is an empty plan with zero expansions.
pub fn graph_search(
    initial: &Rc<State>,
    action_library: &ActionSet,
    goal_description: &GoalDescription,
    frontier: &mut dyn Frontier,
    limits: &SearchLimits,
    print_status: bool,
) -> SearchOutcome {
    info!("starting {} search", frontier.name());

    let mut stats = Stats::new();
    let mut expanded: FnvHashSet<Rc<State>> = FnvHashSet::default();

    frontier.prepare(goal_description);

    // search owns its node graph; discard any parent chain from the caller
    let initial = initial.reroot();
    stats.add_created(initial.path_cost);
    frontier.add(Rc::clone(&initial));

    while let Some(state) = frontier.pop() {
        if goal_description.is_goal(&state) {
            let plan = state.extract_plan();
            info!("found plan of length {}", plan.len());
            return SearchOutcome {
                plan: Some(plan),
                stats,
            };
        }

        expanded.insert(Rc::clone(&state));
        if stats.add_expanded(state.path_cost) {
            debug!("reached depth {}", state.path_cost);
        }

        if print_status && stats.total_expanded() % limits.status_interval == 0 {
            eprintln!("#{}", stats.status_line(frontier.size()));
        }

        if memory::usage() > limits.max_memory {
            eprintln!("Maximum memory usage exceeded.");
            process::exit(1);
        }

        for joint_action in state.get_applicable_actions(action_library) {
            let successor = Rc::clone(&state).result(&joint_action);
            if !expanded.contains(&*successor) && !frontier.contains(&successor) {
                stats.add_created(successor.path_cost);
                frontier.add(successor);
            }
        }
    }

    info!("frontier exhausted, no plan exists");
    SearchOutcome { plan: None, stats }
}
