#![warn(rust_2018_idioms)]

use std::fs;
use std::process;
use std::rc::Rc;

use clap::{App, Arg};

use hospital_solver::actions::{
    hospital_action_library, mapf_action_library, sticky_action_library, uniform_action_set,
};
use hospital_solver::frontier::{Frontier, FrontierBestFirst, FrontierFifo, FrontierLifo};
use hospital_solver::goal::GoalDescription;
use hospital_solver::heuristic::{DistanceSum, GoalCount, Heuristic};
use hospital_solver::level::Level;
use hospital_solver::protocol::joint_action_to_string;
use hospital_solver::search::{
    and_or_graph_search, graph_search, serial_graph_search, SearchLimits,
};
use hospital_solver::state::State;

fn main() {
    env_logger::init();

    let matches = App::new("hospital-solver")
        .version("0.1")
        .about("Multi-agent hospital domain solver")
        .arg(Arg::with_name("file").required(true).help("level file"))
        .arg(
            Arg::with_name("strategy")
                .short("s")
                .long("strategy")
                .takes_value(true)
                .possible_values(&["bfs", "dfs", "greedy", "astar"])
                .default_value("bfs")
                .help("frontier ordering"),
        )
        .arg(
            Arg::with_name("heuristic")
                .long("heuristic")
                .takes_value(true)
                .possible_values(&["goal-count", "distance-sum"])
                .default_value("distance-sum")
                .help("heuristic for greedy and astar"),
        )
        .arg(
            Arg::with_name("actions")
                .short("a")
                .long("actions")
                .takes_value(true)
                .possible_values(&["mapf", "hospital", "sticky"])
                .default_value("hospital")
                .help("action library"),
        )
        .arg(
            Arg::with_name("serial")
                .long("serial")
                .help("solve sub-goals one at a time"),
        )
        .arg(
            Arg::with_name("and-or")
                .long("and-or")
                .conflicts_with("serial")
                .help("search for a strong plan against a broken executor"),
        )
        .arg(
            Arg::with_name("status")
                .long("status")
                .help("print progress while searching"),
        )
        .arg(
            Arg::with_name("max-memory")
                .long("max-memory")
                .takes_value(true)
                .help("abort when resident memory exceeds this many MiB"),
        )
        .get_matches();

    let path = matches.value_of("file").unwrap();
    let text = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Can't read file {}: {}", path, err);
        process::exit(1);
    });
    let level: Rc<Level> = Rc::new(text.parse().unwrap_or_else(|err| {
        eprintln!("Failed to parse {}: {}", path, err);
        process::exit(1);
    }));

    let library = match matches.value_of("actions").unwrap() {
        "mapf" => mapf_action_library(),
        "hospital" => hospital_action_library(),
        "sticky" => sticky_action_library(),
        _ => unreachable!(),
    };
    let action_set = uniform_action_set(&library, level.num_agents());

    let mut heuristic: Box<dyn Heuristic> = match matches.value_of("heuristic").unwrap() {
        "goal-count" => Box::new(GoalCount),
        "distance-sum" => Box::new(DistanceSum),
        _ => unreachable!(),
    };
    heuristic.preprocess(&level);

    let mut frontier: Box<dyn Frontier> = match matches.value_of("strategy").unwrap() {
        "bfs" => Box::new(FrontierFifo::new()),
        "dfs" => Box::new(FrontierLifo::new()),
        "greedy" => Box::new(FrontierBestFirst::greedy(heuristic)),
        "astar" => Box::new(FrontierBestFirst::a_star(heuristic)),
        _ => unreachable!(),
    };

    let mut limits = SearchLimits::default();
    if let Some(mebibytes) = matches.value_of("max-memory") {
        let mebibytes: u64 = mebibytes.parse().unwrap_or_else(|err| {
            eprintln!("Invalid --max-memory value {:?}: {}", mebibytes, err);
            process::exit(1);
        });
        limits.max_memory = mebibytes * 1024 * 1024;
    }
    let print_status = matches.is_present("status");

    let initial = State::initial(&level);
    let goal_description = GoalDescription::from_level(&level);

    if matches.is_present("and-or") {
        match and_or_graph_search(&initial, &action_set, &goal_description) {
            Some((worst_case, _plan)) => {
                println!("Strong plan with worst case {} actions", worst_case)
            }
            None => println!("No strong plan"),
        }
        return;
    }

    let outcome = if matches.is_present("serial") {
        serial_graph_search(
            &initial,
            &action_set,
            &goal_description,
            &mut *frontier,
            &limits,
            print_status,
        )
    } else {
        graph_search(
            &initial,
            &action_set,
            &goal_description,
            &mut *frontier,
            &limits,
            print_status,
        )
    };

    eprintln!("{}", outcome.stats);
    match outcome.plan {
        Some(plan) => {
            for joint_action in &plan {
                println!("{}", joint_action_to_string(joint_action));
            }
        }
        None => println!("No solution"),
    }
}
