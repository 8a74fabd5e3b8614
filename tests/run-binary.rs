use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn run_corridor_bfs() {
    // one-wide corridor, the only applicable actions walk east
    Command::main_binary()
        .unwrap()
        .arg("levels/corridor.lvl")
        .assert()
        .success()
        .stdout("Move(E)\nMove(E)\nMove(E)\n");
}

#[test]
fn run_push_astar() {
    // the box has to move three cells east, so every optimal plan is pushes
    Command::main_binary()
        .unwrap()
        .arg("--strategy")
        .arg("astar")
        .arg("levels/push.lvl")
        .assert()
        .success()
        .stdout("Push(E,E)\nPush(E,E)\nPush(E,E)\n");
}

#[test]
fn run_and_or_corridor() {
    Command::main_binary()
        .unwrap()
        .arg("--and-or")
        .arg("--actions")
        .arg("mapf")
        .arg("levels/corridor.lvl")
        .assert()
        .success()
        .stdout("Strong plan with worst case 3 actions\n");
}

#[test]
fn run_missing_file() {
    // doesn't check stderr - the OS error message wording varies

    Command::main_binary()
        .unwrap()
        .arg("levels/does-not-exist.lvl")
        .assert()
        .failure()
        .stdout("");
}

#[test]
fn run_bad_strategy() {
    Command::main_binary()
        .unwrap()
        .arg("--strategy")
        .arg("guess")
        .arg("levels/corridor.lvl")
        .assert()
        .failure()
        .stdout("");
}
