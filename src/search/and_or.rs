//! Search under a non-deterministic executor.
//!
//! The executor is assumed "broken": whenever it performs a joint action, it
//! may perform the same joint action a second time if it is still applicable.
//! A plan must therefore be conditional: after each step the executor reports
//! which outcome occurred and the plan branches on it.

use std::rc::Rc;

use fnv::FnvHashMap;
use log::info;

use crate::actions::{ActionSet, JointAction};
use crate::goal::GoalDescription;
use crate::state::State;

/// A strong plan: a tree of joint actions with a branch for every outcome the
/// executor can produce.
#[derive(Debug, Clone)]
pub enum ConditionalPlan {
    /// The goal is satisfied, nothing left to do.
    Done,
    Step {
        joint_action: JointAction,
        branches: FnvHashMap<Rc<State>, ConditionalPlan>,
    },
}

/// All states the broken executor can produce by performing `joint_action`:
/// the intended result, plus the result of performing it twice when the
/// repeat is still applicable.
pub fn broken_results(state: &Rc<State>, joint_action: &JointAction) -> Vec<Rc<State>> {
    let intended = Rc::clone(state).result(joint_action);
    let mut outcomes = vec![Rc::clone(&intended)];
    if intended.is_applicable(joint_action) {
        let repeated = intended.result(joint_action);
        if repeated != outcomes[0] {
            outcomes.push(repeated);
        }
    }
    outcomes
}

/// Looks for a plan guaranteed to reach the goal no matter which outcomes the
/// broken executor produces. Returns the worst-case number of joint actions
/// together with the plan, or `None` when no such guarantee exists.
pub fn and_or_graph_search(
    initial: &Rc<State>,
    action_library: &ActionSet,
    goal_description: &GoalDescription,
) -> Option<(usize, ConditionalPlan)> {
    info!("starting and-or search");
    let initial = initial.reroot();
    let mut path = vec![];
    let found = or_search(&initial, action_library, goal_description, &mut path);
    match &found {
        Some((worst_case, _)) => info!("strong plan found, worst case {} steps", worst_case),
        None => info!("no strong plan exists"),
    }
    found
}

fn or_search(
    state: &Rc<State>,
    action_library: &ActionSet,
    goal_description: &GoalDescription,
    path: &mut Vec<Rc<State>>,
) -> Option<(usize, ConditionalPlan)> {
    if goal_description.is_goal(state) {
        return Some((0, ConditionalPlan::Done));
    }
    // a plan that revisits a configuration on its own path cannot be strong
    if path.iter().any(|seen| seen == state) {
        return None;
    }

    path.push(Rc::clone(state));
    let mut found = None;
    for joint_action in state.get_applicable_actions(action_library) {
        let outcomes = broken_results(state, &joint_action);
        if let Some((worst_case, branches)) =
            and_search(&outcomes, action_library, goal_description, path)
        {
            found = Some((
                worst_case + 1,
                ConditionalPlan::Step {
                    joint_action,
                    branches,
                },
            ));
            break;
        }
    }
    path.pop();
    found
}

fn and_search(
    outcomes: &[Rc<State>],
    action_library: &ActionSet,
    goal_description: &GoalDescription,
    path: &mut Vec<Rc<State>>,
) -> Option<(usize, FnvHashMap<Rc<State>, ConditionalPlan>)> {
    let mut worst_case = 0;
    let mut branches = FnvHashMap::default();
    for outcome in outcomes {
        let (sub_worst, sub_plan) = or_search(outcome, action_library, goal_description, path)?;
        worst_case = worst_case.max(sub_worst);
        branches.insert(Rc::clone(outcome), sub_plan);
    }
    Some((worst_case, branches))
}
