use log::info;

use crate::error::FalconError;

/// Collects the reply for one round of input.
#[derive(Debug, Default)]
pub struct Presenter {
    current_input: String,
    response: String,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_input(&mut self, input: impl Into<String>) {
        self.current_input = input.into();
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn show_message(&mut self, message: impl AsRef<str>) {
        self.push(message.as_ref());
    }

    pub fn show_error(&mut self, err: &FalconError) {
        info!("Reporting {:?} error: {}", err.kind(), err);
        self.push(&format!("Oops! {}", capitalize(&err.to_string())));
    }

    pub fn show_loading_error(&mut self, err: &FalconError) {
        self.push(&format!("Warning: {err}\nStarting with an empty task list."));
    }

    /// Returns the accumulated reply and starts a fresh one.
    pub fn get_response(&mut self) -> String {
        std::mem::take(&mut self.response)
    }

    fn push(&mut self, text: &str) {
        if !self.response.is_empty() {
            self.response.push('\n');
        }
        self.response.push_str(text);
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
