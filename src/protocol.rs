//! Client side of the server protocol: plans go out one joint action per
//! line, the server answers with per-agent success flags.

use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;
use std::io::{BufRead, Write};
use std::rc::Rc;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::actions::{JointAction, Plan};
use crate::search::ConditionalPlan;
use crate::state::State;

#[derive(Debug)]
pub enum ProtocolError {
    Io(io::Error),
    /// The server's response did not contain one `true`/`false` per agent.
    MalformedResponse(String),
    /// The executor produced a state the conditional plan has no branch for.
    UncoveredState(String),
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Io(err) => write!(f, "i/o error: {}", err),
            ProtocolError::MalformedResponse(line) => {
                write!(f, "malformed server response: {:?}", line)
            }
            ProtocolError::UncoveredState(state) => {
                write!(f, "no branch covers the resulting state:\n{}", state)
            }
        }
    }
}

impl Error for ProtocolError {}

impl From<io::Error> for ProtocolError {
    fn from(err: io::Error) -> Self {
        ProtocolError::Io(err)
    }
}

/// One line of the wire format: agent actions joined by `|`.
pub fn joint_action_to_string(joint_action: &JointAction) -> String {
    let names: Vec<String> = joint_action
        .iter()
        .map(|action| action.to_string())
        .collect();
    names.join("|")
}

fn parse_response(line: &str, num_agents: usize) -> Result<Vec<bool>, ProtocolError> {
    let flags: Result<Vec<bool>, ()> = line
        .trim()
        .split('|')
        .map(|token| match token {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(()),
        })
        .collect();
    match flags {
        Ok(flags) if flags.len() == num_agents => Ok(flags),
        _ => Err(ProtocolError::MalformedResponse(line.to_string())),
    }
}

fn send_joint_action<W: Write, R: BufRead>(
    joint_action: &JointAction,
    writer: &mut W,
    reader: &mut R,
) -> Result<Vec<bool>, ProtocolError> {
    writeln!(writer, "{}", joint_action_to_string(joint_action))?;
    writer.flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    parse_response(&line, joint_action.len())
}

/// Sends a sequential plan to the server and mirrors its effect locally.
/// Returns the state the execution ended in.
pub fn execute_plan<W: Write, R: BufRead>(
    initial: &Rc<State>,
    plan: &Plan,
    writer: &mut W,
    reader: &mut R,
) -> Result<Rc<State>, ProtocolError> {
    let mut state = Rc::clone(initial);
    for joint_action in plan {
        let flags = send_joint_action(joint_action, writer, reader)?;
        debug!("server response: {:?}", flags);
        state = state.result(joint_action);
    }
    Ok(state)
}

/// Executes a conditional plan against a broken executor that repeats each
/// joint action with probability `chance_of_extra_action` when the repeat is
/// still applicable. After each step the branch matching the actual resulting
/// state is followed.
pub fn execute_conditional_plan<W: Write, R: BufRead>(
    initial: &Rc<State>,
    plan: &ConditionalPlan,
    chance_of_extra_action: f64,
    writer: &mut W,
    reader: &mut R,
) -> Result<Rc<State>, ProtocolError> {
    let mut rng = SmallRng::from_entropy();
    let mut state = Rc::clone(initial);
    let mut plan = plan;
    loop {
        match plan {
            ConditionalPlan::Done => return Ok(state),
            ConditionalPlan::Step {
                joint_action,
                branches,
            } => {
                send_joint_action(joint_action, writer, reader)?;
                state = state.result(joint_action);
                if rng.gen_bool(chance_of_extra_action) && state.is_applicable(joint_action) {
                    debug!("executor repeated {}", joint_action_to_string(joint_action));
                    send_joint_action(joint_action, writer, reader)?;
                    state = state.result(joint_action);
                }
                plan = match branches.get(&*state) {
                    Some(branch) => branch,
                    None => return Err(ProtocolError::UncoveredState(state.to_string())),
                };
            }
        }
    }
}
