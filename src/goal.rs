use crate::color::Color;
use crate::level::Level;
use crate::position::Position;
use crate::state::State;

/// An atomic positional constraint: `character` must (or, with `positive` set
/// to false, must not) occupy `position`. Negative sub-goals are used to carve
/// corridors free of moving obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubGoal {
    pub position: Position,
    pub character: char,
    pub positive: bool,
}

impl SubGoal {
    pub fn new(position: Position, character: char, positive: bool) -> Self {
        SubGoal {
            position,
            character,
            positive,
        }
    }

    pub fn is_satisfied(&self, state: &State) -> bool {
        let occupant = if self.character.is_ascii_digit() {
            state.agent_at(self.position).map(|(_, ch)| ch)
        } else {
            state.box_at(self.position).map(|(_, ch)| ch)
        };
        let present = occupant == Some(self.character);
        if self.positive {
            present
        } else {
            !present
        }
    }
}

/// An ordered conjunction of sub-goals. The order matters to the serial
/// search, which solves them one at a time by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDescription {
    sub_goals: Vec<SubGoal>,
}

impl GoalDescription {
    pub fn new(sub_goals: Vec<SubGoal>) -> Self {
        GoalDescription { sub_goals }
    }

    /// The level's static goal markers as positive sub-goals, box goals
    /// first, in reading order. Agents park last so a serial solve does not
    /// have to move a parked agent to place remaining boxes.
    pub fn from_level(level: &Level) -> Self {
        let mut sub_goals = Vec::new();
        for &(pos, ch) in level.box_goals() {
            sub_goals.push(SubGoal::new(pos, ch, true));
        }
        for &(pos, ch) in level.agent_goals() {
            sub_goals.push(SubGoal::new(pos, ch, true));
        }
        GoalDescription { sub_goals }
    }

    pub fn is_goal(&self, state: &State) -> bool {
        self.sub_goals.iter().all(|sub| sub.is_satisfied(state))
    }

    pub fn num_sub_goals(&self) -> usize {
        self.sub_goals.len()
    }

    /// A goal description containing only the `index`-th sub-goal, or `None`
    /// when the index is out of range.
    pub fn sub_goal(&self, index: usize) -> Option<GoalDescription> {
        let sub = *self.sub_goals.get(index)?;
        Some(self.with_sub_goals(vec![sub]))
    }

    pub fn sub_goals(&self) -> &[SubGoal] {
        &self.sub_goals
    }

    /// Only the sub-goals whose character belongs to `color`, preserving
    /// order. Pairs with `State::color_filter` for mono-color decomposition.
    pub fn color_filter(&self, color: Color, level: &Level) -> GoalDescription {
        let sub_goals = self
            .sub_goals
            .iter()
            .filter(|sub| level.color_of(sub.character) == Some(color))
            .cloned()
            .collect();
        self.with_sub_goals(sub_goals)
    }

    /// Builder preserving the goal-description kind.
    pub fn with_sub_goals(&self, sub_goals: Vec<SubGoal>) -> GoalDescription {
        GoalDescription { sub_goals }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn load(level: &str) -> (Rc<Level>, Rc<State>) {
        let level: Rc<Level> = Rc::new(level.parse().unwrap());
        let state = State::initial(&level);
        (level, state)
    }

    const LEVEL: &str = r"
#domain
hospital
#levelname
goals
#colors
red: 0, A
blue: 1, B
#initial
+++++++
+0A B1+
+++++++
#goal
+++++++
+A0 1B+
+++++++
#end
";

    #[test]
    fn satisfaction_and_projection() {
        let (level, state) = load(LEVEL);
        let goal = GoalDescription::from_level(&level);
        // box goals first, then agent goals
        assert_eq!(goal.num_sub_goals(), 4);
        assert!(!goal.is_goal(&state));

        // (1,1) must hold box A; currently holds agent 0
        let box_goal = goal.sub_goal(0).unwrap();
        assert_eq!(box_goal.num_sub_goals(), 1);
        assert!(!box_goal.is_goal(&state));

        // (1,2) must hold agent 0; currently holds box A
        let agent_goal = goal.sub_goal(2).unwrap();
        assert!(!agent_goal.is_goal(&state));

        assert!(goal.sub_goal(4).is_none());
    }

    #[test]
    fn negative_sub_goal() {
        let (_, state) = load(LEVEL);
        // box A must NOT be at (1,2) - it is, so unsatisfied
        let keep_out = GoalDescription::new(vec![SubGoal::new(Position::new(1, 2), 'A', false)]);
        assert!(!keep_out.is_goal(&state));
        // but the cell next to it is fine
        let elsewhere = GoalDescription::new(vec![SubGoal::new(Position::new(1, 3), 'A', false)]);
        assert!(elsewhere.is_goal(&state));
    }

    #[test]
    fn color_filtering() {
        let (level, _) = load(LEVEL);
        let goal = GoalDescription::from_level(&level);
        let red = goal.color_filter(Color::Red, &level);
        assert_eq!(red.num_sub_goals(), 2);
        assert!(red.sub_goals().iter().all(|s| s.character == '0' || s.character == 'A'));
    }

    #[test]
    fn trivially_satisfied() {
        let (_, state) = load(LEVEL);
        let empty = GoalDescription::new(vec![]);
        assert!(empty.is_goal(&state));

        let already = GoalDescription::new(vec![SubGoal::new(Position::new(1, 1), '0', true)]);
        assert!(already.is_goal(&state));
    }
}
