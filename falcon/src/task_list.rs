use chrono::NaiveDate;

use crate::error::FalconError;
use crate::task::Task;

/// Ordered tasks, addressed 1-based from the outside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends and returns the new size.
    pub fn add(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.tasks.len()
    }

    pub fn delete(&mut self, n: usize) -> Result<Task, FalconError> {
        let idx = self.position(n)?;
        Ok(self.tasks.remove(idx))
    }

    pub fn mark(&mut self, n: usize) -> Result<&Task, FalconError> {
        self.set_done(n, true)
    }

    pub fn unmark(&mut self, n: usize) -> Result<&Task, FalconError> {
        self.set_done(n, false)
    }

    fn set_done(&mut self, n: usize, done: bool) -> Result<&Task, FalconError> {
        let idx = self.position(n)?;
        let task = &mut self.tasks[idx];
        task.set_done(done);
        Ok(task)
    }

    pub fn get(&self, n: usize) -> Result<&Task, FalconError> {
        let idx = self.position(n)?;
        Ok(&self.tasks[idx])
    }

    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Tasks whose description contains `keyword`, in list order.
    pub fn find(&self, keyword: &str) -> TaskList {
        self.filtered(|task| task.matches(keyword))
    }

    /// Deadlines and events falling on `date`, in list order.
    pub fn due_on(&self, date: NaiveDate) -> TaskList {
        self.filtered(|task| task.kind().date() == Some(date))
    }

    fn filtered(&self, keep: impl Fn(&Task) -> bool) -> TaskList {
        TaskList {
            tasks: self.tasks.iter().filter(|&t| keep(t)).cloned().collect(),
        }
    }

    /// Listing shared by `list`, `find` and `istoday`.
    pub fn render_listing(&self) -> String {
        let mut out = String::from("Tasks in your list are:\n");
        for (idx, task) in self.tasks.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", idx + 1, task));
        }
        out.push_str(&format!("Total: {}", self.tasks.len()));
        out
    }

    fn position(&self, n: usize) -> Result<usize, FalconError> {
        if n < 1 || n > self.tasks.len() {
            return Err(FalconError::out_of_range(n, self.tasks.len()));
        }
        Ok(n - 1)
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}
