use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use fnv::FnvHashSet;

use crate::goal::GoalDescription;
use crate::heuristic::Heuristic;
use crate::state::State;

/// The open set of generated but not yet expanded states. Concrete strategies
/// differ only in ordering policy; all of them support fast membership tests
/// so graph search can avoid re-adding known states.
pub trait Frontier {
    /// Called at the beginning of every search. Frontiers are reused between
    /// searches, so this must clear leftover state; goal-aware strategies
    /// capture the goal description here.
    fn prepare(&mut self, goal_description: &GoalDescription);
    fn add(&mut self, state: Rc<State>);
    fn pop(&mut self) -> Option<Rc<State>>;
    fn contains(&self, state: &State) -> bool;
    fn is_empty(&self) -> bool;
    fn size(&self) -> usize;
    fn name(&self) -> String;
}

/// Depth-first exploration.
#[derive(Debug, Default)]
pub struct FrontierLifo {
    stack: Vec<Rc<State>>,
    members: FnvHashSet<Rc<State>>,
}

impl FrontierLifo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for FrontierLifo {
    fn prepare(&mut self, _goal_description: &GoalDescription) {
        self.stack.clear();
        self.members.clear();
    }

    fn add(&mut self, state: Rc<State>) {
        self.members.insert(Rc::clone(&state));
        self.stack.push(state);
    }

    fn pop(&mut self) -> Option<Rc<State>> {
        let state = self.stack.pop()?;
        self.members.remove(&*state);
        Some(state)
    }

    fn contains(&self, state: &State) -> bool {
        self.members.contains(state)
    }

    fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn size(&self) -> usize {
        self.stack.len()
    }

    fn name(&self) -> String {
        "depth-first".to_string()
    }
}

/// Breadth-first exploration; optimal in plan length for unit costs.
#[derive(Debug, Default)]
pub struct FrontierFifo {
    queue: VecDeque<Rc<State>>,
    members: FnvHashSet<Rc<State>>,
}

impl FrontierFifo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for FrontierFifo {
    fn prepare(&mut self, _goal_description: &GoalDescription) {
        self.queue.clear();
        self.members.clear();
    }

    fn add(&mut self, state: Rc<State>) {
        self.members.insert(Rc::clone(&state));
        self.queue.push_back(state);
    }

    fn pop(&mut self) -> Option<Rc<State>> {
        let state = self.queue.pop_front()?;
        self.members.remove(&*state);
        Some(state)
    }

    fn contains(&self, state: &State) -> bool {
        self.members.contains(state)
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn size(&self) -> usize {
        self.queue.len()
    }

    fn name(&self) -> String {
        "breadth-first".to_string()
    }
}

struct PrioritizedState {
    priority: i32,
    /// Insertion counter; keeps pops FIFO among equal priorities and gives
    /// the heap a total order.
    seq: u64,
    state: Rc<State>,
}

impl Ord for PrioritizedState {
    fn cmp(&self, other: &Self) -> Ordering {
        // intentionally reversed so BinaryHeap pops the lowest priority first
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PrioritizedState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PrioritizedState {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for PrioritizedState {}

/// Pops the state with the lowest heuristic value (greedy best-first), or the
/// lowest cost-plus-heuristic when constructed with [`FrontierBestFirst::a_star`].
pub struct FrontierBestFirst {
    heuristic: Box<dyn Heuristic>,
    include_cost: bool,
    goal_description: Option<GoalDescription>,
    heap: BinaryHeap<PrioritizedState>,
    members: FnvHashSet<Rc<State>>,
    seq: u64,
}

impl FrontierBestFirst {
    pub fn greedy(heuristic: Box<dyn Heuristic>) -> Self {
        Self {
            heuristic,
            include_cost: false,
            goal_description: None,
            heap: BinaryHeap::new(),
            members: FnvHashSet::default(),
            seq: 0,
        }
    }

    pub fn a_star(heuristic: Box<dyn Heuristic>) -> Self {
        Self {
            include_cost: true,
            ..Self::greedy(heuristic)
        }
    }
}

impl Frontier for FrontierBestFirst {
    fn prepare(&mut self, goal_description: &GoalDescription) {
        self.goal_description = Some(goal_description.clone());
        self.heap.clear();
        self.members.clear();
        self.seq = 0;
    }

    fn add(&mut self, state: Rc<State>) {
        let goal_description = self
            .goal_description
            .as_ref()
            .expect("frontier used without prepare");
        let mut priority = self.heuristic.h(&state, goal_description);
        if self.include_cost {
            priority += state.path_cost as i32;
        }
        self.members.insert(Rc::clone(&state));
        self.heap.push(PrioritizedState {
            priority,
            seq: self.seq,
            state,
        });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<Rc<State>> {
        let entry = self.heap.pop()?;
        self.members.remove(&*entry.state);
        Some(entry.state)
    }

    fn contains(&self, state: &State) -> bool {
        self.members.contains(state)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn size(&self) -> usize {
        self.heap.len()
    }

    fn name(&self) -> String {
        if self.include_cost {
            format!("astar({})", self.heuristic.name())
        } else {
            format!("greedy({})", self.heuristic.name())
        }
    }
}

impl Debug for FrontierBestFirst {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} with {} states", self.name(), self.size())
    }
}
