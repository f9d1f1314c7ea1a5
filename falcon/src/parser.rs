use anyhow::{Result, anyhow};
use log::{debug, trace};
use regex::Regex;

use crate::command::Command;
use crate::error::FalconError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Todo,
    List,
    Deadline,
    Event,
    Mark,
    Unmark,
    Delete,
    Bye,
    Find,
    LongDesc,
    IsToday,
    Help,
}

impl CommandKind {
    /// Resolution order of the alias table.
    pub const ALL: [CommandKind; 12] = [
        CommandKind::Todo,
        CommandKind::List,
        CommandKind::Deadline,
        CommandKind::Event,
        CommandKind::Mark,
        CommandKind::Unmark,
        CommandKind::Delete,
        CommandKind::Bye,
        CommandKind::Find,
        CommandKind::LongDesc,
        CommandKind::IsToday,
        CommandKind::Help,
    ];

    pub fn canonical(&self) -> &'static str {
        match self {
            CommandKind::Todo => "todo",
            CommandKind::List => "list",
            CommandKind::Deadline => "deadline",
            CommandKind::Event => "event",
            CommandKind::Mark => "mark",
            CommandKind::Unmark => "unmark",
            CommandKind::Delete => "delete",
            CommandKind::Bye => "bye",
            CommandKind::Find => "find",
            CommandKind::LongDesc => "longdesc",
            CommandKind::IsToday => "istoday",
            CommandKind::Help => "help",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CommandKind::Todo => &["t", "todo"],
            CommandKind::List => &["l", "list"],
            CommandKind::Deadline => &["d", "deadline"],
            CommandKind::Event => &["event"],
            CommandKind::Mark => &["m", "mark"],
            CommandKind::Unmark => &["um", "unmark"],
            CommandKind::Delete => &["delete"],
            CommandKind::Bye => &["b", "bye", "q", "quit", "exit"],
            CommandKind::Find => &["f", "find"],
            CommandKind::LongDesc => &["longdesc"],
            CommandKind::IsToday => &["istoday"],
            CommandKind::Help => &["h", "help"],
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            CommandKind::Todo => "todo <description>",
            CommandKind::List => "list",
            CommandKind::Deadline => "deadline <description> /by <YYYY-MM-DD>",
            CommandKind::Event => "event <description> /at <YYYY-MM-DD>",
            CommandKind::Mark => "mark <n>",
            CommandKind::Unmark => "unmark <n>",
            CommandKind::Delete => "delete <n>",
            CommandKind::Bye => "bye",
            CommandKind::Find => "find <keyword>",
            CommandKind::LongDesc => "longdesc <n>",
            CommandKind::IsToday => "istoday",
            CommandKind::Help => "help",
        }
    }

    fn pattern(&self) -> String {
        format!("^(?i:{})$", self.aliases().join("|"))
    }
}

/// Turns raw input lines into [`Command`]s. Only the command word is
/// checked here; arguments are validated when the command runs.
#[derive(Debug, Clone)]
pub struct CommandParser {
    table: Vec<(CommandKind, Regex)>,
}

impl CommandParser {
    pub fn new() -> Result<Self> {
        let table = CommandKind::ALL
            .iter()
            .map(|kind| {
                let pat = kind.pattern();
                Regex::new(&pat)
                    .map(|re| (*kind, re))
                    .map_err(|err| anyhow!("invalid alias regex '{}': {err}", pat))
            })
            .collect::<Result<Vec<_>>>()?;
        trace!("Compiled {} command alias patterns", table.len());
        Ok(Self { table })
    }

    /// First entry whose pattern fully matches `word` wins.
    pub fn resolve(&self, word: &str) -> Option<CommandKind> {
        self.table
            .iter()
            .find(|(_, re)| re.is_match(word))
            .map(|(kind, _)| *kind)
    }

    pub fn parse(&self, input: &str) -> Result<Command, FalconError> {
        let word = input.split_whitespace().next().unwrap_or_default();
        let kind = self
            .resolve(word)
            .ok_or_else(|| FalconError::UnknownCommand(word.to_string()))?;
        debug!("Parsed '{}' as {}", word, kind.canonical());
        Ok(Command::new(kind, input))
    }
}
