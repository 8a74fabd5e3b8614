use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use fnv::FnvHashSet;

use crate::actions::{Action, ActionSet, JointAction, Plan};
use crate::color::Color;
use crate::level::Level;
use crate::position::Position;

/// A search node: where every agent and box stands, plus the bookkeeping
/// needed to reconstruct the plan that reached it.
///
/// Equality and hashing cover only the agent and box placements, so two states
/// reached along different paths collapse into one entry in the visited set.
/// The cost, parent and joint action are deliberately excluded. States are
/// immutable once constructed; successors are fresh allocations chained to
/// their parent through `Rc` backpointers.
#[derive(Clone)]
pub struct State {
    /// Index = agent index, stable for the whole search.
    pub agent_positions: Vec<(Position, char)>,
    pub box_positions: Vec<(Position, char)>,
    pub level: Rc<Level>,
    pub path_cost: u32,
    parent: Option<Rc<State>>,
    joint_action: Option<JointAction>,
}

impl State {
    /// The state the level was loaded with.
    pub fn initial(level: &Rc<Level>) -> Rc<State> {
        Rc::new(State {
            agent_positions: level.initial_agents().to_vec(),
            box_positions: level.initial_boxes().to_vec(),
            level: Rc::clone(level),
            path_cost: 0,
            parent: None,
            joint_action: None,
        })
    }

    /// A copy of this configuration with cost zero and no parent, suitable as
    /// the root of a fresh search.
    pub fn reroot(&self) -> Rc<State> {
        Rc::new(State {
            agent_positions: self.agent_positions.clone(),
            box_positions: self.box_positions.clone(),
            level: Rc::clone(&self.level),
            path_cost: 0,
            parent: None,
            joint_action: None,
        })
    }

    /// Projects the state onto a single color: only agents and boxes of that
    /// color survive. Used to decompose a multi-color problem into mono-color
    /// sub-problems.
    pub fn color_filter(&self, color: Color) -> Rc<State> {
        let agent_positions = self
            .agent_positions
            .iter()
            .filter(|&&(_, ch)| self.level.color_of(ch) == Some(color))
            .cloned()
            .collect();
        let box_positions = self
            .box_positions
            .iter()
            .filter(|&&(_, ch)| self.level.color_of(ch) == Some(color))
            .cloned()
            .collect();
        Rc::new(State {
            agent_positions,
            box_positions,
            level: Rc::clone(&self.level),
            path_cost: 0,
            parent: None,
            joint_action: None,
        })
    }

    pub fn num_agents(&self) -> usize {
        self.agent_positions.len()
    }

    pub fn agent_at(&self, pos: Position) -> Option<(usize, char)> {
        self.agent_positions
            .iter()
            .position(|&(p, _)| p == pos)
            .map(|i| (i, self.agent_positions[i].1))
    }

    pub fn box_at(&self, pos: Position) -> Option<(usize, char)> {
        self.box_positions
            .iter()
            .position(|&(p, _)| p == pos)
            .map(|i| (i, self.box_positions[i].1))
    }

    /// Free of walls, agents and boxes.
    pub fn free_at(&self, pos: Position) -> bool {
        !self.level.is_wall(pos) && self.agent_at(pos).is_none() && self.box_at(pos).is_none()
    }

    /// Whether the whole joint action could execute here: every agent's action
    /// is locally applicable and no two agents conflict.
    pub fn is_applicable(&self, joint_action: &[Action]) -> bool {
        joint_action
            .iter()
            .enumerate()
            .all(|(agent, action)| action.is_applicable(agent, self))
            && !self.is_conflicting(joint_action)
    }

    /// Two agents conflict if their actions share a destination cell or move
    /// the same box.
    fn is_conflicting(&self, joint_action: &[Action]) -> bool {
        let mut destinations = FnvHashSet::default();
        let mut moved_boxes = FnvHashSet::default();
        for (agent, action) in joint_action.iter().enumerate() {
            let conflicts = action.conflicts(agent, self);
            for dest in conflicts.destinations {
                if !destinations.insert(dest) {
                    return true;
                }
            }
            for box_pos in conflicts.moved_boxes {
                if !moved_boxes.insert(box_pos) {
                    return true;
                }
            }
        }
        false
    }

    /// The successor reached by executing `joint_action`. Caller must have
    /// established applicability and conflict freedom; conflict-free actions
    /// commute, so applying them in agent order is as good as simultaneously.
    pub fn result(self: Rc<Self>, joint_action: &[Action]) -> Rc<State> {
        let mut agent_positions = self.agent_positions.clone();
        let mut box_positions = self.box_positions.clone();
        for (agent, action) in joint_action.iter().enumerate() {
            action.apply(agent, &mut agent_positions, &mut box_positions);
        }
        Rc::new(State {
            agent_positions,
            box_positions,
            level: Rc::clone(&self.level),
            path_cost: self.path_cost + 1,
            joint_action: Some(joint_action.to_vec()),
            parent: Some(self),
        })
    }

    /// Replays a plan from this state.
    pub fn result_of_plan(self: Rc<Self>, plan: &[JointAction]) -> Rc<State> {
        plan.iter().fold(self, |state, joint_action| state.result(joint_action))
    }

    /// All conflict-free joint actions available here.
    ///
    /// The joint space is the cross-product of the per-agent libraries, so
    /// infeasible single-agent actions are filtered out before combining.
    pub fn get_applicable_actions(&self, action_set: &ActionSet) -> Vec<JointAction> {
        let num_agents = self.num_agents();
        // color filtering can leave a state with boxes but no agents
        if num_agents == 0 {
            return Vec::new();
        }

        let mut per_agent: Vec<Vec<Action>> = Vec::with_capacity(num_agents);
        for agent in 0..num_agents {
            let applicable: Vec<Action> = action_set[agent]
                .iter()
                .copied()
                .filter(|action| action.is_applicable(agent, self))
                .collect();
            if applicable.is_empty() {
                // this agent cannot act at all, so no joint action exists
                return Vec::new();
            }
            per_agent.push(applicable);
        }

        let mut joint_actions = Vec::new();
        let mut indices = vec![0; num_agents];
        loop {
            let candidate: JointAction = indices
                .iter()
                .enumerate()
                .map(|(agent, &i)| per_agent[agent][i])
                .collect();
            if !self.is_conflicting(&candidate) {
                joint_actions.push(candidate);
            }

            // odometer over the per-agent choices
            let mut agent = 0;
            loop {
                indices[agent] += 1;
                if indices[agent] < per_agent[agent].len() {
                    break;
                }
                indices[agent] = 0;
                agent += 1;
                if agent == num_agents {
                    return joint_actions;
                }
            }
        }
    }

    /// The joint actions that led here, oldest first, by walking the parent
    /// chain back to the root.
    pub fn extract_plan(&self) -> Plan {
        let mut plan = Vec::new();
        let mut node = self;
        while let Some(parent) = &node.parent {
            if let Some(joint_action) = &node.joint_action {
                plan.push(joint_action.clone());
            }
            node = &**parent;
        }
        plan.reverse();
        plan
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.agent_positions == other.agent_positions && self.box_positions == other.box_positions
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.agent_positions.hash(hasher);
        self.box_positions.hash(hasher);
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..self.level.rows() {
            for col in 0..self.level.cols() {
                let pos = Position::new(row as i16, col as i16);
                let cell = if let Some((_, ch)) = self.agent_at(pos) {
                    ch
                } else if let Some((_, ch)) = self.box_at(pos) {
                    ch
                } else if self.level.is_wall(pos) {
                    '+'
                } else {
                    ' '
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Debug for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{hospital_action_library, uniform_action_set};
    use crate::position::Direction;

    fn load(level: &str) -> Rc<State> {
        let level: Level = level.parse().unwrap();
        State::initial(&Rc::new(level))
    }

    const TWO_AGENTS: &str = r"
#domain
hospital
#levelname
two agents
#colors
red: 0, 1, A
#initial
+++++++
+0 A 1+
+     +
+++++++
#goal
+++++++
+     +
+     +
+++++++
#end
";

    #[test]
    fn structural_equality_ignores_bookkeeping() {
        let initial = load(TWO_AGENTS);
        let east = vec![
            Action::Move(Direction::East),
            Action::Move(Direction::West),
        ];
        let back = vec![
            Action::Move(Direction::West),
            Action::Move(Direction::East),
        ];
        let round_trip = initial.clone().result(&east).result(&back);

        assert_eq!(*initial, *round_trip);
        assert_ne!(initial.path_cost, round_trip.path_cost);

        let mut set = FnvHashSet::default();
        set.insert(Rc::clone(&initial));
        assert!(set.contains(&*round_trip));
    }

    #[test]
    fn joint_result_moves_everyone() {
        let initial = load(TWO_AGENTS);
        let joint = vec![
            Action::Move(Direction::South),
            Action::Push(Direction::West, Direction::West),
        ];
        // agent 1 at (1,5) pushing the box at (1,4)? there is no box there
        assert!(!initial.is_applicable(&joint));

        let joint = vec![
            Action::Move(Direction::South),
            Action::Move(Direction::West),
        ];
        assert!(initial.is_applicable(&joint));
        let next = initial.clone().result(&joint);
        assert_eq!(next.agent_positions[0].0, Position::new(2, 1));
        assert_eq!(next.agent_positions[1].0, Position::new(1, 4));
        assert_eq!(next.path_cost, 1);
    }

    #[test]
    fn same_destination_is_excluded() {
        // both agents adjacent to the same free cell (2,3)
        let state = load(
            r"
#domain
hospital
#levelname
collision
#colors
red: 0, 1
#initial
+++++++
+ 0 1 +
+     +
+++++++
#goal
+++++++
+     +
+     +
+++++++
#end
",
        );
        let collide = vec![
            Action::Move(Direction::East),
            Action::Move(Direction::West),
        ];
        // both would land on (1,3)
        assert!(Action::Move(Direction::East).is_applicable(0, &state));
        assert!(Action::Move(Direction::West).is_applicable(1, &state));
        assert!(!state.is_applicable(&collide));

        let action_set = uniform_action_set(&hospital_action_library(), 2);
        for joint_action in state.get_applicable_actions(&action_set) {
            assert!(state.is_applicable(&joint_action));
        }
        assert!(!state
            .get_applicable_actions(&action_set)
            .contains(&collide));
    }

    #[test]
    fn same_box_is_excluded() {
        // 0A1 - both agents could pull the box in opposite directions
        let state = load(
            r"
#domain
hospital
#levelname
tug of war
#colors
red: 0, 1, A
#initial
+++++++
+ 0A1 +
+++++++
#goal
+++++++
+     +
+++++++
#end
",
        );
        let tug = vec![
            Action::Pull(Direction::West, Direction::West),
            Action::Pull(Direction::East, Direction::East),
        ];
        assert!(Action::Pull(Direction::West, Direction::West).is_applicable(0, &state));
        assert!(Action::Pull(Direction::East, Direction::East).is_applicable(1, &state));
        assert!(!state.is_applicable(&tug));

        let action_set = uniform_action_set(&hospital_action_library(), 2);
        assert!(!state.get_applicable_actions(&action_set).contains(&tug));
    }

    #[test]
    fn applicable_joint_actions_respect_local_applicability() {
        let state = load(TWO_AGENTS);
        let action_set = uniform_action_set(&hospital_action_library(), 2);
        for joint_action in state.get_applicable_actions(&action_set) {
            for (agent, action) in joint_action.iter().enumerate() {
                assert!(action.is_applicable(agent, &state));
            }
        }
    }

    #[test]
    fn order_independence_of_nonconflicting_actions() {
        let initial = load(TWO_AGENTS);
        let a = Action::Move(Direction::East);
        let b = Action::Move(Direction::West);

        let joint = initial.clone().result(&vec![a, b]);
        // agent 0 first, then agent 1, via two sequential solo steps
        let seq_01 = initial
            .clone()
            .result(&vec![a, Action::NoOp])
            .result(&vec![Action::NoOp, b]);
        let seq_10 = initial
            .clone()
            .result(&vec![Action::NoOp, b])
            .result(&vec![a, Action::NoOp]);

        assert_eq!(*joint, *seq_01);
        assert_eq!(*joint, *seq_10);
    }

    #[test]
    fn extract_plan_walks_back_to_root() {
        let initial = load(TWO_AGENTS);
        assert!(initial.extract_plan().is_empty());

        let step1 = vec![Action::Move(Direction::South), Action::NoOp];
        let step2 = vec![Action::Move(Direction::East), Action::NoOp];
        let end = initial.clone().result(&step1).result(&step2);
        assert_eq!(end.extract_plan(), vec![step1, step2]);
    }

    #[test]
    fn color_filter_drops_other_colors() {
        let state = load(
            r"
#domain
hospital
#levelname
mixed
#colors
red: 0, A
blue: 1, B
#initial
+++++++
+0A B1+
+++++++
#goal
+++++++
+     +
+++++++
#end
",
        );
        let red = state.color_filter(Color::Red);
        assert_eq!(red.num_agents(), 1);
        assert_eq!(red.agent_positions[0].1, '0');
        assert_eq!(red.box_positions.len(), 1);
        assert_eq!(red.box_positions[0].1, 'A');
    }

    #[test]
    fn color_filter_without_agents_has_no_actions() {
        // blue owns only a box, so the blue projection has no agents
        let state = load(
            r"
#domain
hospital
#levelname
boxes only
#colors
red: 0
blue: B
#initial
+++++
+0B +
+++++
#goal
+++++
+   +
+++++
#end
",
        );
        let blue = state.color_filter(Color::Blue);
        assert_eq!(blue.num_agents(), 0);
        assert_eq!(blue.box_positions.len(), 1);

        let action_set = uniform_action_set(&hospital_action_library(), blue.num_agents());
        assert!(blue.get_applicable_actions(&action_set).is_empty());
    }

    #[test]
    fn rendering() {
        let state = load(TWO_AGENTS);
        let rendered = state.to_string();
        assert_eq!(
            rendered,
            "+++++++\n+0 A 1+\n+     +\n+++++++\n"
        );
    }
}
