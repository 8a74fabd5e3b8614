use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

use fnv::FnvHashMap;

use crate::color::Color;
use crate::level::Level;
use crate::position::Position;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErr {
    MissingSection(&'static str),
    UnknownColor(String),
    MalformedColorLine(String),
    InvalidCell(char, usize, usize),
    UncoloredCharacter(char),
    DuplicateAgent(char),
    GoalOutsideGrid(char, usize, usize),
    NoAgents,
}

impl Display for ParseErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParseErr::MissingSection(name) => write!(f, "Missing #{} section", name),
            ParseErr::UnknownColor(ref name) => write!(f, "Unknown color: {}", name),
            ParseErr::MalformedColorLine(ref line) => write!(f, "Malformed color line: {}", line),
            ParseErr::InvalidCell(ch, r, c) => {
                write!(f, "Invalid character {:?} at [{}, {}]", ch, r, c)
            }
            ParseErr::UncoloredCharacter(ch) => {
                write!(f, "Character {:?} has no color assigned", ch)
            }
            ParseErr::DuplicateAgent(ch) => write!(f, "Agent {:?} appears more than once", ch),
            ParseErr::GoalOutsideGrid(ch, r, c) => {
                write!(f, "Goal {:?} at [{}, {}] lies outside the initial grid", ch, r, c)
            }
            ParseErr::NoAgents => write!(f, "Level has no agents"),
        }
    }
}

impl Error for ParseErr {}

/// Parses the sectioned hospital level format:
/// `#domain` / `#levelname` / `#colors` / `#initial` / `#goal` / `#end`,
/// with `+` for walls, digits for agents and uppercase letters for boxes.
pub fn parse(text: &str) -> Result<Level, ParseErr> {
    // trim so levels can be written as raw strings in tests
    let text = text.trim_matches('\n');

    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(header) = line.strip_prefix('#') {
            sections.push((header.trim().to_lowercase(), Vec::new()));
        } else if let Some(last) = sections.last_mut() {
            last.1.push(line);
        }
    }
    let section = |name: &'static str| -> Result<&Vec<&str>, ParseErr> {
        sections
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, lines)| lines)
            .ok_or(ParseErr::MissingSection(name))
    };

    section("domain")?;
    let name = section("levelname")?
        .iter()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().to_string())
        .unwrap_or_default();

    let colors = parse_colors(section("colors")?)?;
    let (walls, initial_agents, initial_boxes) = parse_initial(section("initial")?, &colors)?;
    let (agent_goals, box_goals) = parse_goals(section("goal")?, &walls)?;

    if initial_agents.is_empty() {
        return Err(ParseErr::NoAgents);
    }

    Ok(Level::new(
        name,
        walls,
        colors,
        agent_goals,
        box_goals,
        initial_agents,
        initial_boxes,
    ))
}

fn parse_colors(lines: &[&str]) -> Result<FnvHashMap<char, Color>, ParseErr> {
    let mut colors = FnvHashMap::default();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, ':');
        let color_name = parts.next().unwrap_or("");
        let characters = parts
            .next()
            .ok_or_else(|| ParseErr::MalformedColorLine(line.to_string()))?;
        let color = Color::from_name(color_name)
            .ok_or_else(|| ParseErr::UnknownColor(color_name.trim().to_string()))?;
        for token in characters.split(',') {
            let token = token.trim();
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_digit() || ch.is_ascii_uppercase() => {
                    colors.insert(ch, color);
                }
                _ => return Err(ParseErr::MalformedColorLine(line.to_string())),
            }
        }
    }
    Ok(colors)
}

type Placements = (Vec<(Position, char)>, Vec<(Position, char)>);

fn parse_initial(
    lines: &[&str],
    colors: &FnvHashMap<char, Color>,
) -> Result<(Vec2d<bool>, Vec<(Position, char)>, Vec<(Position, char)>), ParseErr> {
    let mut grid: Vec<Vec<bool>> = Vec::new();
    let mut agents: Vec<(Position, char)> = Vec::new();
    let mut boxes: Vec<(Position, char)> = Vec::new();

    for (r, line) in lines.iter().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (c, ch) in line.chars().enumerate() {
            let pos = Position::new(r as i16, c as i16);
            match ch {
                '+' => {
                    row.push(true);
                    continue;
                }
                ' ' => {}
                '0'..='9' => {
                    if !colors.contains_key(&ch) {
                        return Err(ParseErr::UncoloredCharacter(ch));
                    }
                    if agents.iter().any(|&(_, a)| a == ch) {
                        return Err(ParseErr::DuplicateAgent(ch));
                    }
                    agents.push((pos, ch));
                }
                'A'..='Z' => {
                    if !colors.contains_key(&ch) {
                        return Err(ParseErr::UncoloredCharacter(ch));
                    }
                    boxes.push((pos, ch));
                }
                _ => return Err(ParseErr::InvalidCell(ch, r, c)),
            }
            row.push(false);
        }
        grid.push(row);
    }

    // agent index must match the agent's numeral
    agents.sort_by_key(|&(_, ch)| ch);

    // short rows are padded with wall, same as everything outside the grid
    Ok((Vec2d::new(&grid, true), agents, boxes))
}

fn parse_goals(lines: &[&str], walls: &Vec2d<bool>) -> Result<Placements, ParseErr> {
    let mut agent_goals = Vec::new();
    let mut box_goals = Vec::new();

    for (r, line) in lines.iter().enumerate() {
        for (c, ch) in line.chars().enumerate() {
            let pos = Position::new(r as i16, c as i16);
            match ch {
                '+' | ' ' => {}
                '0'..='9' | 'A'..='Z' => {
                    if walls.get(pos).copied().unwrap_or(true) {
                        return Err(ParseErr::GoalOutsideGrid(ch, r, c));
                    }
                    if ch.is_ascii_digit() {
                        agent_goals.push((pos, ch));
                    } else {
                        box_goals.push((pos, ch));
                    }
                }
                _ => return Err(ParseErr::InvalidCell(ch, r, c)),
            }
        }
    }

    Ok((agent_goals, box_goals))
}
