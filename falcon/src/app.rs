use anyhow::Result;
use log::{debug, info, warn};

use crate::config::AppConfig;
use crate::parser::CommandParser;
use crate::presenter::Presenter;
use crate::storage::Storage;
use crate::task_list::TaskList;

/// What the shell shows after one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub exit: bool,
}

pub struct Falcon {
    tasks: TaskList,
    presenter: Presenter,
    storage: Storage,
    parser: CommandParser,
}

impl Falcon {
    pub fn new(config: &AppConfig) -> Result<Self> {
        info!("Starting with storage at {}", config.data_file.display());
        let parser = CommandParser::new()?;
        let storage = Storage::new(config.data_file.clone());
        let mut presenter = Presenter::new();
        let tasks = match storage.load() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!("Starting with an empty list: {}", err);
                presenter.show_loading_error(&err);
                TaskList::new()
            }
        };
        Ok(Self {
            tasks,
            presenter,
            storage,
            parser,
        })
    }

    /// Anything reported while starting up, such as a load warning.
    pub fn startup_message(&mut self) -> String {
        self.presenter.get_response()
    }

    /// Runs one line of input. User mistakes end up in the reply text and
    /// never abort the session.
    pub fn get_response(&mut self, input: &str) -> Reply {
        self.presenter.set_current_input(input);
        let exit = match self.parser.parse(input) {
            Ok(command) => {
                match command.execute(&mut self.tasks, &mut self.presenter, &self.storage) {
                    Ok(()) => command.is_exit(),
                    Err(err) => {
                        self.presenter.show_error(&err);
                        false
                    }
                }
            }
            Err(err) => {
                self.presenter.show_error(&err);
                false
            }
        };
        if exit {
            debug!("Exit requested");
        }
        Reply {
            text: self.presenter.get_response(),
            exit,
        }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
