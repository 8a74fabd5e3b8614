// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]

//! A solver for the multi-agent hospital domain: agents move through a
//! grid-world hospital and push or pull boxes onto goal cells. Levels are
//! text files, plans are sequences of joint actions, and search strategies
//! are pluggable through the [`frontier::Frontier`] trait.

pub mod actions;
pub mod color;
pub mod frontier;
pub mod goal;
pub mod heuristic;
pub mod level;
pub mod memory;
pub mod parser;
pub mod position;
pub mod protocol;
pub mod search;
pub mod state;

mod vec2d;
