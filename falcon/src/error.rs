use std::path::PathBuf;

/// Fieldless discriminant of [`FalconError`], handy for logs and assertions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownCommand,
    EmptyDescription,
    MissingDateMarker,
    InvalidDate,
    NoNumber,
    OutOfRange,
    CorruptedLine,
    StorageIo,
    Load,
}

#[derive(Debug, thiserror::Error)]
pub enum FalconError {
    #[error("'{0}' is not a command I know. Type help to see what I can do.")]
    UnknownCommand(String),
    #[error("the description of a {0} cannot be empty")]
    EmptyDescription(&'static str),
    #[error("a {command} needs a date: {command} <description> {marker} <YYYY-MM-DD>")]
    MissingDateMarker {
        command: &'static str,
        marker: &'static str,
    },
    #[error("'{0}' is not a valid date, use the format YYYY-MM-DD")]
    InvalidDate(String),
    #[error("no task number given")]
    NoNumber,
    #[error("task {index} does not exist, the list has {size} item(s)")]
    OutOfRange { index: String, size: usize },
    #[error("corrupted line in storage: '{0}'")]
    CorruptedLine(String),
    #[error("failed to {action} {}: {source}", .path.display())]
    StorageIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not load tasks from {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FalconError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FalconError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            FalconError::EmptyDescription(_) => ErrorKind::EmptyDescription,
            FalconError::MissingDateMarker { .. } => ErrorKind::MissingDateMarker,
            FalconError::InvalidDate(_) => ErrorKind::InvalidDate,
            FalconError::NoNumber => ErrorKind::NoNumber,
            FalconError::OutOfRange { .. } => ErrorKind::OutOfRange,
            FalconError::CorruptedLine(_) => ErrorKind::CorruptedLine,
            FalconError::StorageIo { .. } => ErrorKind::StorageIo,
            FalconError::Load { .. } => ErrorKind::Load,
        }
    }

    pub(crate) fn out_of_range(index: impl ToString, size: usize) -> Self {
        FalconError::OutOfRange {
            index: index.to_string(),
            size,
        }
    }
}
