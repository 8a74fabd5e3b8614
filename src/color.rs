use std::fmt;
use std::fmt::{Display, Formatter};

/// Agent/box colors. An agent can only move boxes of its own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
    Cyan,
    Purple,
    Green,
    Orange,
    Pink,
    Grey,
    Lightblue,
    Brown,
}

impl Color {
    pub fn from_name(name: &str) -> Option<Color> {
        match name.trim().to_lowercase().as_str() {
            "blue" => Some(Color::Blue),
            "red" => Some(Color::Red),
            "cyan" => Some(Color::Cyan),
            "purple" => Some(Color::Purple),
            "green" => Some(Color::Green),
            "orange" => Some(Color::Orange),
            "pink" => Some(Color::Pink),
            "grey" => Some(Color::Grey),
            "lightblue" => Some(Color::Lightblue),
            "brown" => Some(Color::Brown),
            _ => None,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Cyan => "cyan",
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Pink => "pink",
            Color::Grey => "grey",
            Color::Lightblue => "lightblue",
            Color::Brown => "brown",
        };
        write!(f, "{}", name)
    }
}
