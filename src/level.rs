use std::str::FromStr;

use fnv::FnvHashMap;

use crate::color::Color;
use crate::parser::{self, ParseErr};
use crate::position::Position;
use crate::vec2d::Vec2d;

/// The immutable part of a planning problem: walls, the color table and the
/// static goal markers. Shared behind `Rc` by every search state, which is why
/// it also records the initial agent/box placements captured at load time.
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    walls: Vec2d<bool>,
    colors: FnvHashMap<char, Color>,
    agent_goals: Vec<(Position, char)>,
    box_goals: Vec<(Position, char)>,
    agent_goal_grid: Vec2d<Option<char>>,
    box_goal_grid: Vec2d<Option<char>>,
    initial_agents: Vec<(Position, char)>,
    initial_boxes: Vec<(Position, char)>,
}

impl Level {
    pub(crate) fn new(
        name: String,
        walls: Vec2d<bool>,
        colors: FnvHashMap<char, Color>,
        agent_goals: Vec<(Position, char)>,
        box_goals: Vec<(Position, char)>,
        initial_agents: Vec<(Position, char)>,
        initial_boxes: Vec<(Position, char)>,
    ) -> Self {
        let mut agent_goal_grid = walls.create_scratchpad(None);
        for &(pos, ch) in &agent_goals {
            agent_goal_grid[pos] = Some(ch);
        }
        let mut box_goal_grid = walls.create_scratchpad(None);
        for &(pos, ch) in &box_goals {
            box_goal_grid[pos] = Some(ch);
        }
        Level {
            name,
            walls,
            colors,
            agent_goals,
            box_goals,
            agent_goal_grid,
            box_goal_grid,
            initial_agents,
            initial_boxes,
        }
    }

    pub fn rows(&self) -> u16 {
        self.walls.rows()
    }

    pub fn cols(&self) -> u16 {
        self.walls.cols()
    }

    pub fn num_agents(&self) -> usize {
        self.initial_agents.len()
    }

    /// Out-of-bounds cells count as walls so position arithmetic never needs
    /// a separate bounds check.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.get(pos).copied().unwrap_or(true)
    }

    pub fn color_of(&self, character: char) -> Option<Color> {
        self.colors.get(&character).copied()
    }

    pub fn agent_goal_at(&self, pos: Position) -> Option<char> {
        self.agent_goal_grid.get(pos).copied().flatten()
    }

    pub fn box_goal_at(&self, pos: Position) -> Option<char> {
        self.box_goal_grid.get(pos).copied().flatten()
    }

    pub fn agent_goals(&self) -> &[(Position, char)] {
        &self.agent_goals
    }

    pub fn box_goals(&self) -> &[(Position, char)] {
        &self.box_goals
    }

    pub fn initial_agents(&self) -> &[(Position, char)] {
        &self.initial_agents
    }

    pub fn initial_boxes(&self) -> &[(Position, char)] {
        &self.initial_boxes
    }
}

impl FromStr for Level {
    type Err = ParseErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}
