use std::fmt;
use std::fmt::{Display, Formatter};

use crate::position::{Direction, Position};
use crate::state::State;

/// One agent's contribution to a joint action.
///
/// Every variant is a pure value. The contract mirrors the three capabilities
/// the search needs:
/// - `is_applicable` is a local precondition check, independent of what other
///   agents do in the same step,
/// - `apply` performs the effect and is only called after applicability and
///   conflict freedom have been established,
/// - `conflicts` reports which cells the action newly occupies and which box
///   cells it vacates, so the joint-action generator can reject cross-agent
///   conflicts.
///
/// The sticky variants additionally refuse to move an agent or box that
/// already sits on its own goal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NoOp,
    Move(Direction),
    Push(Direction, Direction),
    Pull(Direction, Direction),
    StickyMove(Direction),
    StickyPush(Direction, Direction),
    StickyPull(Direction, Direction),
}

/// One action per agent, executed simultaneously.
pub type JointAction = Vec<Action>;

/// A sequence of joint actions, oldest first.
pub type Plan = Vec<JointAction>;

/// Per-agent action libraries. `action_set[i]` lists what agent `i` may do.
pub type ActionSet = Vec<Vec<Action>>;

/// Cells relevant for cross-agent conflict detection within one joint step.
#[derive(Debug, Clone, Default)]
pub struct Conflicts {
    /// Cells occupied by this action after the step.
    pub destinations: Vec<Position>,
    /// Box positions (before the step) of boxes this action moves.
    pub moved_boxes: Vec<Position>,
}

impl Action {
    pub fn is_applicable(self, agent_index: usize, state: &State) -> bool {
        let (agent_pos, agent_char) = state.agent_positions[agent_index];
        match self {
            // NoOp can never change the state if there is only a single agent
            Action::NoOp => state.num_agents() > 1,
            Action::Move(dir) => state.free_at(agent_pos + dir),
            Action::StickyMove(dir) => {
                state.free_at(agent_pos + dir)
                    && state.level.agent_goal_at(agent_pos) != Some(agent_char)
            }
            Action::Push(agent_dir, box_dir) => {
                match push_box(state, agent_pos, agent_char, agent_dir) {
                    Some((_, box_pos, _)) => state.free_at(box_pos + box_dir),
                    None => false,
                }
            }
            Action::StickyPush(agent_dir, box_dir) => {
                match push_box(state, agent_pos, agent_char, agent_dir) {
                    Some((_, box_pos, box_char)) => {
                        state.free_at(box_pos + box_dir)
                            && state.level.agent_goal_at(agent_pos) != Some(agent_char)
                            && state.level.box_goal_at(box_pos) != Some(box_char)
                    }
                    None => false,
                }
            }
            Action::Pull(agent_dir, box_dir) => {
                match pull_box(state, agent_pos, agent_char, box_dir) {
                    Some(_) => state.free_at(agent_pos + agent_dir),
                    None => false,
                }
            }
            Action::StickyPull(agent_dir, box_dir) => {
                match pull_box(state, agent_pos, agent_char, box_dir) {
                    Some((_, box_pos, box_char)) => {
                        state.free_at(agent_pos + agent_dir)
                            && state.level.agent_goal_at(agent_pos) != Some(agent_char)
                            && state.level.box_goal_at(box_pos) != Some(box_char)
                    }
                    None => false,
                }
            }
        }
    }

    /// Applies the effect to the successor's position tables. Only valid after
    /// `is_applicable` and conflict checking have passed.
    pub(crate) fn apply(
        self,
        agent_index: usize,
        agents: &mut [(Position, char)],
        boxes: &mut [(Position, char)],
    ) {
        let agent_pos = agents[agent_index].0;
        match self {
            Action::NoOp => {}
            Action::Move(dir) | Action::StickyMove(dir) => {
                agents[agent_index].0 = agent_pos + dir;
            }
            Action::Push(agent_dir, box_dir) | Action::StickyPush(agent_dir, box_dir) => {
                let box_pos = agent_pos + agent_dir;
                let box_index = box_index_at(boxes, box_pos).expect("push without a box ahead");
                boxes[box_index].0 = box_pos + box_dir;
                agents[agent_index].0 = box_pos;
            }
            Action::Pull(agent_dir, box_dir) | Action::StickyPull(agent_dir, box_dir) => {
                let box_pos = agent_pos - box_dir;
                let box_index = box_index_at(boxes, box_pos).expect("pull without a box behind");
                boxes[box_index].0 = agent_pos;
                agents[agent_index].0 = agent_pos + agent_dir;
            }
        }
    }

    pub fn conflicts(self, agent_index: usize, state: &State) -> Conflicts {
        let (agent_pos, _) = state.agent_positions[agent_index];
        match self {
            // an agent standing still still occupies its cell
            Action::NoOp => Conflicts {
                destinations: vec![agent_pos],
                moved_boxes: vec![],
            },
            Action::Move(dir) | Action::StickyMove(dir) => Conflicts {
                destinations: vec![agent_pos + dir],
                moved_boxes: vec![],
            },
            Action::Push(agent_dir, box_dir) | Action::StickyPush(agent_dir, box_dir) => {
                let box_pos = agent_pos + agent_dir;
                Conflicts {
                    // the agent takes the box's cell, the box takes a new one
                    destinations: vec![box_pos, box_pos + box_dir],
                    moved_boxes: vec![box_pos],
                }
            }
            Action::Pull(agent_dir, box_dir) | Action::StickyPull(agent_dir, box_dir) => {
                let box_pos = agent_pos - box_dir;
                Conflicts {
                    destinations: vec![agent_pos + agent_dir, agent_pos],
                    moved_boxes: vec![box_pos],
                }
            }
        }
    }
}

/// Looks up the box an agent facing `agent_dir` would push and checks it is
/// color-matched. Returns (box index, box position, box character).
fn push_box(
    state: &State,
    agent_pos: Position,
    agent_char: char,
    agent_dir: Direction,
) -> Option<(usize, Position, char)> {
    let box_pos = agent_pos + agent_dir;
    let (box_index, box_char) = state.box_at(box_pos)?;
    if state.level.color_of(box_char) != state.level.color_of(agent_char) {
        return None;
    }
    Some((box_index, box_pos, box_char))
}

/// Same lookup for pulls, where `box_dir` points from the box towards the agent.
fn pull_box(
    state: &State,
    agent_pos: Position,
    agent_char: char,
    box_dir: Direction,
) -> Option<(usize, Position, char)> {
    let box_pos = agent_pos - box_dir;
    let (box_index, box_char) = state.box_at(box_pos)?;
    if state.level.color_of(box_char) != state.level.color_of(agent_char) {
        return None;
    }
    Some((box_index, box_pos, box_char))
}

fn box_index_at(boxes: &[(Position, char)], pos: Position) -> Option<usize> {
    boxes.iter().position(|&(p, _)| p == pos)
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // sticky variants share the wire names of their plain counterparts
        match *self {
            Action::NoOp => write!(f, "NoOp"),
            Action::Move(d) | Action::StickyMove(d) => write!(f, "Move({})", d),
            Action::Push(a, b) | Action::StickyPush(a, b) => write!(f, "Push({},{})", a, b),
            Action::Pull(a, b) | Action::StickyPull(a, b) => write!(f, "Pull({},{})", a, b),
        }
    }
}

/// Movement only - the multi-agent pathfinding domain.
pub fn mapf_action_library() -> Vec<Action> {
    let mut library = vec![Action::NoOp];
    library.extend(Direction::ALL.iter().map(|&d| Action::Move(d)));
    library
}

/// The full hospital domain: Move, Push and Pull in all direction pairs.
pub fn hospital_action_library() -> Vec<Action> {
    let mut library = mapf_action_library();
    for &agent_dir in &Direction::ALL {
        for &box_dir in &Direction::ALL {
            library.push(Action::Push(agent_dir, box_dir));
        }
    }
    for &agent_dir in &Direction::ALL {
        for &box_dir in &Direction::ALL {
            library.push(Action::Pull(agent_dir, box_dir));
        }
    }
    library
}

/// The hospital domain where satisfied goals lock their occupants in place.
pub fn sticky_action_library() -> Vec<Action> {
    let mut library = vec![Action::NoOp];
    library.extend(Direction::ALL.iter().map(|&d| Action::StickyMove(d)));
    for &agent_dir in &Direction::ALL {
        for &box_dir in &Direction::ALL {
            library.push(Action::StickyPush(agent_dir, box_dir));
        }
    }
    for &agent_dir in &Direction::ALL {
        for &box_dir in &Direction::ALL {
            library.push(Action::StickyPull(agent_dir, box_dir));
        }
    }
    library
}

/// An action set giving every agent the same library.
pub fn uniform_action_set(library: &[Action], num_agents: usize) -> ActionSet {
    vec![library.to_vec(); num_agents]
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::level::Level;
    use crate::state::State;

    fn state_of(level: &str) -> Rc<State> {
        let level: Level = level.parse().unwrap();
        State::initial(&Rc::new(level))
    }

    #[test]
    fn wire_names() {
        assert_eq!(Action::NoOp.to_string(), "NoOp");
        assert_eq!(Action::Move(Direction::North).to_string(), "Move(N)");
        assert_eq!(
            Action::Push(Direction::East, Direction::South).to_string(),
            "Push(E,S)"
        );
        assert_eq!(
            Action::StickyPull(Direction::West, Direction::West).to_string(),
            "Pull(W,W)"
        );
    }

    #[test]
    fn library_sizes() {
        assert_eq!(mapf_action_library().len(), 5);
        assert_eq!(hospital_action_library().len(), 37);
        assert_eq!(sticky_action_library().len(), 37);
    }

    #[test]
    fn move_applicability() {
        let state = state_of(
            r"
#domain
hospital
#levelname
move
#colors
red: 0
#initial
++++
+0 +
++++
#goal
++++
+  +
++++
#end
",
        );
        assert!(Action::Move(Direction::East).is_applicable(0, &state));
        assert!(!Action::Move(Direction::West).is_applicable(0, &state));
        assert!(!Action::Move(Direction::North).is_applicable(0, &state));
        // single agent, so NoOp is pointless
        assert!(!Action::NoOp.is_applicable(0, &state));
    }

    #[test]
    fn push_needs_color_match() {
        let state = state_of(
            r"
#domain
hospital
#levelname
colors
#colors
red: 0
blue: A
#initial
+++++
+0A +
+++++
#goal
+++++
+   +
+++++
#end
",
        );
        assert!(!Action::Push(Direction::East, Direction::East).is_applicable(0, &state));
    }

    #[test]
    fn push_and_pull() {
        let state = state_of(
            r"
#domain
hospital
#levelname
pushpull
#colors
red: 0, A
#initial
++++++
+ 0A +
++++++
#goal
++++++
+    +
++++++
#end
",
        );
        let push = Action::Push(Direction::East, Direction::East);
        assert!(push.is_applicable(0, &state));
        // box direction points from the box towards the agent
        let pull = Action::Pull(Direction::West, Direction::West);
        assert!(pull.is_applicable(0, &state));
        assert!(!Action::Pull(Direction::West, Direction::East).is_applicable(0, &state));
        // no box to the north
        assert!(!Action::Push(Direction::North, Direction::North).is_applicable(0, &state));

        let next = state.clone().result(&[push]);
        assert_eq!(next.agent_positions[0].0, Position::new(1, 3));
        assert_eq!(next.box_positions[0].0, Position::new(1, 4));

        let next = state.clone().result(&[pull]);
        assert_eq!(next.agent_positions[0].0, Position::new(1, 1));
        assert_eq!(next.box_positions[0].0, Position::new(1, 2));
    }

    #[test]
    fn sticky_goal_locks_box() {
        // box A already on its goal cell
        let state = state_of(
            r"
#domain
hospital
#levelname
sticky
#colors
red: 0, A
#initial
++++++
+ 0A +
++++++
#goal
++++++
+  A +
++++++
#end
",
        );
        assert!(Action::Push(Direction::East, Direction::East).is_applicable(0, &state));
        assert!(!Action::StickyPush(Direction::East, Direction::East).is_applicable(0, &state));
        // moving without touching the box is still allowed
        assert!(Action::StickyMove(Direction::West).is_applicable(0, &state));
    }

    #[test]
    fn sticky_goal_locks_agent() {
        let state = state_of(
            r"
#domain
hospital
#levelname
sticky-agent
#colors
red: 0
#initial
++++
+0 +
++++
#goal
++++
+0 +
++++
#end
",
        );
        assert!(!Action::StickyMove(Direction::East).is_applicable(0, &state));
        assert!(Action::Move(Direction::East).is_applicable(0, &state));
    }

    #[test]
    fn conflict_cells() {
        let state = state_of(
            r"
#domain
hospital
#levelname
conflicts
#colors
red: 0, A
#initial
++++++
+ 0A +
++++++
#goal
++++++
+    +
++++++
#end
",
        );
        let c = Action::Push(Direction::East, Direction::East).conflicts(0, &state);
        assert_eq!(c.destinations, vec![Position::new(1, 3), Position::new(1, 4)]);
        assert_eq!(c.moved_boxes, vec![Position::new(1, 3)]);

        let c = Action::Move(Direction::West).conflicts(0, &state);
        assert_eq!(c.destinations, vec![Position::new(1, 1)]);
        assert!(c.moved_boxes.is_empty());

        let c = Action::NoOp.conflicts(0, &state);
        assert_eq!(c.destinations, vec![Position::new(1, 2)]);
    }
}
