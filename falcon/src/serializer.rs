//! Conversion between tasks and their two textual forms: the canonical
//! line kept on disk and the command a user types to create a task.

use chrono::NaiveDate;

use crate::error::FalconError;
use crate::task::{DATE_FORMAT, Task};

const DATE_LEN: usize = 10;
const DESCRIPTION_START: usize = 7;

/// Parses one canonical line, e.g. `[D][X] submit report (by: 2024-05-01)`.
pub fn parse_storage_line(line: &str) -> Result<Task, FalconError> {
    let corrupted = || FalconError::CorruptedLine(line.to_string());
    let bytes = line.as_bytes();
    if bytes.len() <= DESCRIPTION_START
        || bytes[0] != b'['
        || bytes[2] != b']'
        || bytes[3] != b'['
        || !bytes[4].is_ascii()
        || bytes[5] != b']'
        || bytes[6] != b' '
    {
        return Err(corrupted());
    }
    let done = bytes[4] != b' ';
    let rest = &line[DESCRIPTION_START..];

    let mut task = match bytes[1] {
        b'T' => Task::todo(rest),
        b'D' => {
            let (description, by) = split_dated(rest, " (by: ").ok_or_else(corrupted)?;
            Task::deadline(description, by)
        }
        b'E' => {
            let (description, at) = split_dated(rest, " (at: ").ok_or_else(corrupted)?;
            Task::event(description, at)
        }
        _ => return Err(corrupted()),
    }
    .map_err(|_| corrupted())?;
    task.set_done(done);
    Ok(task)
}

/// Splits `description (by: YYYY-MM-DD)` at the last marker.
fn split_dated<'a>(rest: &'a str, marker: &str) -> Option<(&'a str, NaiveDate)> {
    let idx = rest.rfind(marker)?;
    let tail = rest[idx + marker.len()..].strip_suffix(')')?;
    if tail.len() != DATE_LEN {
        return None;
    }
    let date = parse_date(tail).ok()?;
    Some((&rest[..idx], date))
}

/// Builds a task from a raw `todo`, `deadline` or `event` line. The command
/// word may be any alias; `keyword` is its canonical name. Descriptions are
/// sliced from the input, so inner whitespace survives as typed.
pub fn parse_user_input(keyword: &str, input: &str) -> Result<Task, FalconError> {
    let args = after_command_word(input);
    match keyword {
        "todo" => Task::todo(args.trim()),
        "deadline" => {
            let (description, by) = split_user_dated(args, "deadline", "/by")?;
            Task::deadline(description, by)
        }
        "event" => {
            let (description, at) = split_user_dated(args, "event", "/at")?;
            Task::event(description, at)
        }
        other => Err(FalconError::UnknownCommand(other.to_string())),
    }
}

/// The input with its first word removed; leading whitespace is kept.
pub(crate) fn after_command_word(input: &str) -> &str {
    let input = input.trim_start();
    input.find(char::is_whitespace).map_or("", |end| &input[end..])
}

fn split_user_dated<'a>(
    args: &'a str,
    command: &'static str,
    marker: &'static str,
) -> Result<(&'a str, NaiveDate), FalconError> {
    if args.trim().is_empty() {
        return Err(FalconError::EmptyDescription(command));
    }
    // The description runs up to the first word starting with `/`, which
    // has to be the marker this command expects.
    let pos = args
        .char_indices()
        .zip(std::iter::once(' ').chain(args.chars()))
        .find(|&((_, c), prev)| c == '/' && prev.is_whitespace())
        .map(|((pos, _), _)| pos)
        .filter(|&pos| args[pos..].split(char::is_whitespace).next() == Some(marker))
        .ok_or(FalconError::MissingDateMarker { command, marker })?;
    let description = args[..pos].trim();
    if description.is_empty() {
        return Err(FalconError::EmptyDescription(command));
    }
    let date = parse_date(args[pos + marker.len()..].trim())?;
    Ok((description, date))
}

/// Strict `YYYY-MM-DD`; chrono alone would accept unpadded fields.
pub fn parse_date(raw: &str) -> Result<NaiveDate, FalconError> {
    let invalid = || FalconError::InvalidDate(raw.to_string());
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == DATE_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}
