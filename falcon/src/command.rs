use chrono::{Local, NaiveDate};
use log::{debug, trace};

use crate::error::FalconError;
use crate::parser::CommandKind;
use crate::presenter::Presenter;
use crate::serializer;
use crate::storage::Storage;
use crate::task::Task;
use crate::task_list::TaskList;

pub const FAREWELL: &str = "Thank you for swinging by :)";

/// A parsed line of input, ready to run against the list, the presenter
/// and the storage file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    input: String,
    tokens: Vec<String>,
}

impl Command {
    pub fn new(kind: CommandKind, input: impl Into<String>) -> Self {
        let input = input.into();
        let tokens = input.split_whitespace().map(str::to_string).collect();
        Self {
            kind,
            input,
            tokens,
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The line as typed, command word included.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_exit(&self) -> bool {
        self.kind == CommandKind::Bye
    }

    pub fn execute(
        &self,
        tasks: &mut TaskList,
        presenter: &mut Presenter,
        storage: &Storage,
    ) -> Result<(), FalconError> {
        self.execute_at(tasks, presenter, storage, Local::now().date_naive())
    }

    /// Same as [`Command::execute`] with an explicit notion of today.
    pub fn execute_at(
        &self,
        tasks: &mut TaskList,
        presenter: &mut Presenter,
        storage: &Storage,
        today: NaiveDate,
    ) -> Result<(), FalconError> {
        trace!(
            "Executing {} with {} token(s)",
            self.kind.canonical(),
            self.tokens.len()
        );
        match self.kind {
            CommandKind::Todo | CommandKind::Deadline | CommandKind::Event => {
                let task = serializer::parse_user_input(self.kind.canonical(), &self.input)?;
                let (task, size) = Mutation::Append(task).commit(tasks, storage)?;
                presenter.show_message(format!(
                    "Noted down: {task}\nThere are {size} items on your list now."
                ));
            }
            CommandKind::Mark | CommandKind::Unmark => {
                let index = task_number(&self.tokens, tasks.size())?;
                let done = self.kind == CommandKind::Mark;
                let (task, _) = Mutation::SetDone { index, done }.commit(tasks, storage)?;
                let verb = if done { "Marked" } else { "Unmarked" };
                presenter.show_message(format!("{verb} task {index}\n{task}"));
            }
            CommandKind::Delete => {
                let index = task_number(&self.tokens, tasks.size())?;
                let (task, size) = Mutation::Delete { index }.commit(tasks, storage)?;
                presenter.show_message(format!(
                    "Deleted task {index}\n{task}\nThere are {size} items on your list now."
                ));
            }
            CommandKind::List => presenter.show_message(tasks.render_listing()),
            CommandKind::Find => {
                let keyword = find_keyword(&self.input);
                debug!("Finding tasks matching '{}'", keyword);
                presenter.show_message(tasks.find(keyword).render_listing());
            }
            CommandKind::IsToday => {
                debug!("Looking for tasks due on {}", today);
                presenter.show_message(tasks.due_on(today).render_listing());
            }
            CommandKind::LongDesc => {
                let index = task_number(&self.tokens, tasks.size())?;
                presenter.show_message(tasks.get(index)?.render());
            }
            CommandKind::Help => presenter.show_message(help_text()),
            CommandKind::Bye => presenter.show_message(FAREWELL),
        }
        Ok(())
    }
}

/// A change that has to reach the file and the list at the same index.
/// The file is written first; the list only changes once that succeeded.
enum Mutation {
    Append(Task),
    SetDone { index: usize, done: bool },
    Delete { index: usize },
}

impl Mutation {
    /// Returns the affected task and the list size afterwards.
    fn commit(
        self,
        tasks: &mut TaskList,
        storage: &Storage,
    ) -> Result<(Task, usize), FalconError> {
        match self {
            Mutation::Append(task) => {
                storage.append(&task.render())?;
                let size = tasks.add(task.clone());
                Ok((task, size))
            }
            Mutation::SetDone { index, done } => {
                let mut updated = tasks.get(index)?.clone();
                updated.set_done(done);
                storage.replace_line(index, &updated.render())?;
                let task = if done {
                    tasks.mark(index)?.clone()
                } else {
                    tasks.unmark(index)?.clone()
                };
                Ok((task, tasks.size()))
            }
            Mutation::Delete { index } => {
                tasks.get(index)?;
                storage.delete_line(index)?;
                let task = tasks.delete(index)?;
                Ok((task, tasks.size()))
            }
        }
    }
}

/// Digits of the arguments read as a 1-based task number. Anything that is
/// not a digit is ignored, so `mark #2` means `mark 2`.
fn task_number(tokens: &[String], size: usize) -> Result<usize, FalconError> {
    let digits: String = tokens
        .iter()
        .skip(1)
        .flat_map(|token| token.chars())
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return Err(FalconError::NoNumber);
    }
    match digits.parse::<usize>() {
        Ok(n) if (1..=size).contains(&n) => Ok(n),
        _ => Err(FalconError::out_of_range(digits, size)),
    }
}

/// Everything after the command word and the single separator that
/// follows it, spaces included.
fn find_keyword(input: &str) -> &str {
    let mut rest = serializer::after_command_word(input).chars();
    rest.next();
    rest.as_str()
}

fn help_text() -> String {
    let mut out = String::from("Here is what I understand:");
    for kind in CommandKind::ALL {
        out.push_str(&format!(
            "\n  {:<42} aliases: {}",
            kind.usage(),
            kind.aliases().join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::CommandParser;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        storage: Storage,
        tasks: TaskList,
        presenter: Presenter,
        parser: CommandParser,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let storage = Storage::new(dir.path().join("tasks.txt"));
            let tasks = storage.load().unwrap();
            Self {
                dir,
                storage,
                tasks,
                presenter: Presenter::new(),
                parser: CommandParser::new().unwrap(),
            }
        }

        fn run(&mut self, input: &str) -> Result<String, FalconError> {
            self.run_on(input, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        }

        fn run_on(&mut self, input: &str, today: NaiveDate) -> Result<String, FalconError> {
            self.presenter.set_current_input(input);
            let command = self.parser.parse(input)?;
            command.execute_at(&mut self.tasks, &mut self.presenter, &self.storage, today)?;
            Ok(self.presenter.get_response())
        }

        fn file(&self) -> String {
            fs::read_to_string(self.storage.path()).unwrap()
        }
    }

    #[test]
    fn add_writes_file_then_list() {
        let mut fx = Fixture::new();
        let reply = fx.run("todo read book").unwrap();
        assert_eq!(
            reply,
            "Noted down: [T][ ] read book\nThere are 1 items on your list now."
        );
        assert_eq!(fx.file(), "[T][ ] read book\n");
        assert_eq!(fx.tasks.size(), 1);
    }

    #[test]
    fn added_descriptions_keep_inner_spacing() {
        let mut fx = Fixture::new();
        fx.run("t  two  spaces\tand a tab ").unwrap();
        fx.run("d  pay  rent /by 2024-06-01").unwrap();
        assert_eq!(
            fx.file(),
            "[T][ ] two  spaces\tand a tab\n[D][ ] pay  rent (by: 2024-06-01)\n"
        );
        assert_eq!(fx.tasks.get(1).unwrap().description(), "two  spaces\tand a tab");
    }

    #[test]
    fn failed_append_leaves_list_alone() {
        let mut fx = Fixture::new();
        fx.storage = Storage::new(fx.dir.path().join("missing").join("tasks.txt"));
        let err = fx.run("todo read book").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageIo);
        assert!(fx.tasks.is_empty());
    }

    #[test]
    fn mark_and_unmark_rewrite_the_line() {
        let mut fx = Fixture::new();
        fx.run("deadline submit report /by 2024-05-01").unwrap();
        let reply = fx.run("MARK 1").unwrap();
        assert_eq!(reply, "Marked task 1\n[D][X] submit report (by: 2024-05-01)");
        assert_eq!(fx.file(), "[D][X] submit report (by: 2024-05-01)\n");
        fx.run("um 1").unwrap();
        assert_eq!(fx.file(), "[D][ ] submit report (by: 2024-05-01)\n");
        assert!(!fx.tasks.get(1).unwrap().is_done());
    }

    #[test]
    fn delete_removes_matching_line() {
        let mut fx = Fixture::new();
        fx.run("todo one").unwrap();
        fx.run("todo two").unwrap();
        fx.run("todo three").unwrap();
        let reply = fx.run("delete 2").unwrap();
        assert!(reply.starts_with("Deleted task 2\n[T][ ] two"));
        assert!(reply.ends_with("There are 2 items on your list now."));
        assert_eq!(fx.file(), "[T][ ] one\n[T][ ] three\n");
    }

    #[test]
    fn index_errors() {
        let mut fx = Fixture::new();
        for name in ["a", "b", "c"] {
            fx.run(&format!("todo {name}")).unwrap();
        }
        assert_eq!(fx.run("mark 99").unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(fx.run("mark 0").unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(fx.run("delete").unwrap_err().kind(), ErrorKind::NoNumber);
        assert_eq!(fx.run("unmark two").unwrap_err().kind(), ErrorKind::NoNumber);
        assert_eq!(
            fx.run("longdesc 99999999999999999999999").unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(fx.tasks.size(), 3);
        assert!(fx.tasks.iter().all(|t| !t.is_done()));
    }

    #[test]
    fn task_number_ignores_non_digits() {
        let tokens: Vec<String> = ["mark", "abc1def"].iter().map(|s| s.to_string()).collect();
        assert_eq!(task_number(&tokens, 3).unwrap(), 1);
    }

    #[test]
    fn find_works_with_aliases_and_spaces() {
        let mut fx = Fixture::new();
        fx.run("todo buy milk").unwrap();
        fx.run("event party /at 2024-12-31").unwrap();
        let reply = fx.run("find part").unwrap();
        assert!(reply.contains("1. [E][ ] party (at: 2024-12-31)"));
        assert!(reply.ends_with("Total: 1"));

        let reply = fx.run("F buy milk").unwrap();
        assert!(reply.contains("1. [T][ ] buy milk"));
        assert!(reply.ends_with("Total: 1"));

        let reply = fx.run("find  buy").unwrap();
        assert!(reply.ends_with("Total: 0"));
    }

    #[test]
    fn find_keyword_extraction() {
        assert_eq!(find_keyword("find book"), "book");
        assert_eq!(find_keyword("  f two words "), "two words ");
        assert_eq!(find_keyword("find"), "");
    }

    #[test]
    fn istoday_lists_dated_tasks_due_today() {
        let mut fx = Fixture::new();
        fx.run("todo undated").unwrap();
        fx.run("deadline report /by 2024-05-01").unwrap();
        fx.run("event party /at 2024-05-02").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let reply = fx.run_on("istoday", today).unwrap();
        assert!(reply.contains("1. [D][ ] report (by: 2024-05-01)"));
        assert!(reply.ends_with("Total: 1"));
    }

    #[test]
    fn longdesc_shows_canonical_form() {
        let mut fx = Fixture::new();
        fx.run("event a very long party description /at 2024-12-31").unwrap();
        assert_eq!(
            fx.run("longdesc 1").unwrap(),
            "[E][ ] a very long party description (at: 2024-12-31)"
        );
    }

    #[test]
    fn help_lists_every_command() {
        let mut fx = Fixture::new();
        let reply = fx.run("h").unwrap();
        for kind in CommandKind::ALL {
            assert!(reply.contains(kind.usage()), "missing {}", kind.canonical());
        }
        assert!(reply.contains("b, bye, q, quit, exit"));
    }

    #[test]
    fn bye_does_not_mutate() {
        let mut fx = Fixture::new();
        fx.run("todo stay").unwrap();
        assert_eq!(fx.run("exit").unwrap(), FAREWELL);
        assert_eq!(fx.file(), "[T][ ] stay\n");
    }
}
