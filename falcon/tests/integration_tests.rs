//! End-to-end runs of the command pipeline against a real file.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use falcon::app::Falcon;
use falcon::config::AppConfig;
use falcon::error::ErrorKind;
use falcon::parser::CommandParser;
use falcon::presenter::Presenter;
use falcon::shell;
use falcon::storage::Storage;
use falcon::task_list::TaskList;
use log::LevelFilter;
use tempfile::TempDir;

fn config_for(data_file: PathBuf) -> AppConfig {
    AppConfig {
        data_file,
        log_file: None,
        log_level: LevelFilter::Off,
    }
}

fn start(dir: &TempDir) -> (Falcon, PathBuf) {
    let path = dir.path().join("data").join("falcon.txt");
    let app = Falcon::new(&config_for(path.clone())).unwrap();
    (app, path)
}

fn task_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn rendered(tasks: &TaskList) -> Vec<String> {
    tasks.iter().map(|t| t.render()).collect()
}

/// Runs a command directly so the error kind can be inspected.
fn run_kind(storage: &Storage, tasks: &mut TaskList, input: &str) -> Result<String, ErrorKind> {
    let parser = CommandParser::new().unwrap();
    let mut presenter = Presenter::new();
    presenter.set_current_input(input);
    let command = parser.parse(input).map_err(|e| e.kind())?;
    command
        .execute(tasks, &mut presenter, storage)
        .map_err(|e| e.kind())?;
    Ok(presenter.get_response())
}

#[test]
fn empty_file_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let (mut app, path) = start(&dir);
    assert!(path.is_file());
    let reply = app.get_response("list");
    assert!(reply.text.contains("Total: 0"));
}

#[test]
fn todo_is_written_and_listed() {
    let dir = TempDir::new().unwrap();
    let (mut app, path) = start(&dir);
    app.get_response("todo read book");
    assert_eq!(fs::read_to_string(&path).unwrap(), "[T][ ] read book\n");

    let reply = app.get_response("list");
    assert!(reply.text.contains("1. [T][ ] read book"));
    assert!(reply.text.contains("Total: 1"));
}

#[test]
fn marking_a_deadline_rewrites_its_line() {
    let dir = TempDir::new().unwrap();
    let (mut app, path) = start(&dir);
    app.get_response("deadline submit report /by 2024-05-01");
    app.get_response("mark 1");
    assert_eq!(
        task_lines(&path),
        vec!["[D][X] submit report (by: 2024-05-01)"]
    );
    assert_eq!(
        app.tasks().get(1).unwrap().render(),
        "[D][X] submit report (by: 2024-05-01)"
    );
}

#[test]
fn find_returns_event_as_first_item() {
    let dir = TempDir::new().unwrap();
    let (mut app, _) = start(&dir);
    app.get_response("todo buy groceries");
    app.get_response("event party /at 2024-12-31");
    let reply = app.get_response("find part");
    assert!(reply.text.contains("1. [E][ ] party (at: 2024-12-31)"));
    assert!(reply.text.contains("Total: 1"));
}

#[test]
fn deadline_without_marker_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let (app, path) = start(&dir);
    let before = fs::read_to_string(&path).unwrap();
    let mut tasks = app.tasks().clone();
    let result = run_kind(app.storage(), &mut tasks, "deadline missing date");
    assert_eq!(result, Err(ErrorKind::MissingDateMarker));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert!(tasks.is_empty());
}

#[test]
fn out_of_range_mark_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let (mut app, path) = start(&dir);
    for name in ["one", "two", "three"] {
        app.get_response(&format!("todo {name}"));
    }
    let before = fs::read_to_string(&path).unwrap();

    let mut tasks = app.tasks().clone();
    let result = run_kind(app.storage(), &mut tasks, "mark 99");
    assert_eq!(result, Err(ErrorKind::OutOfRange));
    assert_eq!(&tasks, app.tasks());

    let reply = app.get_response("mark 99");
    assert!(reply.text.starts_with("Oops!"));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert!(app.get_response("list").text.contains("Total: 3"));
}

#[test]
fn file_and_list_stay_in_sync() {
    let dir = TempDir::new().unwrap();
    let (mut app, path) = start(&dir);
    let script = [
        "todo read book",
        "d submit report /by 2024-05-01",
        "event party /at 2024-12-31",
        "t water plants",
        "m 2",
        "delete 1",
        "um 1",
        "mark 3",
        "deadline broken",
        "delete 42",
        "event conference (day 1) /at 2025-03-10",
        "unmark 3",
        "delete 2",
    ];
    for input in script {
        app.get_response(input);
        assert_eq!(task_lines(&path), rendered(app.tasks()), "after {input:?}");
    }

    let (reloaded, _) = start(&dir);
    assert_eq!(reloaded.tasks(), app.tasks());
}

#[test]
fn reload_drops_corrupted_lines_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(
        &path,
        "[T][ ] first\nnot a task\n\n[D][ ] second (by: 2024-05-01)\n",
    )
    .unwrap();
    let mut app = Falcon::new(&config_for(path.clone())).unwrap();
    assert_eq!(app.tasks().size(), 2);
    assert_eq!(task_lines(&path), rendered(app.tasks()));

    app.get_response("mark 2");
    app.get_response("delete 1");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "[D][X] second (by: 2024-05-01)\n"
    );
}

#[test]
fn file_matches_list_after_adding_past_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(&path, "garbage\n[T][ ] one\n").unwrap();
    let mut app = Falcon::new(&config_for(path.clone())).unwrap();

    app.get_response("todo two");
    assert_eq!(task_lines(&path), vec!["[T][ ] one", "[T][ ] two"]);
    assert_eq!(task_lines(&path), rendered(app.tasks()));
}

#[test]
fn spacing_in_descriptions_survives_reload() {
    let dir = TempDir::new().unwrap();
    let (mut app, path) = start(&dir);
    app.get_response("todo read  the\tbook");
    assert_eq!(task_lines(&path), vec!["[T][ ] read  the\tbook"]);

    let (reloaded, _) = start(&dir);
    assert_eq!(reloaded.tasks().get(1).unwrap().description(), "read  the\tbook");
}

#[test]
fn shell_session_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (mut app, path) = start(&dir);
    let mut input = Cursor::new("t read book\nlist\nnonsense\nq\n");
    let mut output = Vec::new();
    shell::run(&mut app, &mut input, &mut output).unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.starts_with(">> "));
    assert!(output.contains("1. [T][ ] read book\nTotal: 1"));
    assert!(output.contains("Oops! 'nonsense' is not a command I know."));
    assert!(output.ends_with("Thank you for swinging by :)\n"));
    assert_eq!(task_lines(&path), vec!["[T][ ] read book"]);
}
