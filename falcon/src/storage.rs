use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use crate::error::FalconError;
use crate::serializer;
use crate::task_list::TaskList;

/// Plain-text mirror of the task list, one canonical line per task.
///
/// [`Storage::load`] drops lines it cannot read from the file, so afterwards
/// the non-blank lines are exactly the loaded tasks in canonical form.
/// Indices handed to [`Storage::delete_line`] and [`Storage::replace_line`]
/// are 1-based and count non-blank lines.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates missing parent directories one segment at a time, then the
    /// file itself. The last segment must look like a file name.
    fn bootstrap(&self) -> io::Result<()> {
        let is_file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains('.'));
        if !is_file_name {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "storage path must end in a file name such as tasks.txt",
            ));
        }

        let mut current = PathBuf::new();
        if let Some(parent) = self.path.parent() {
            for component in parent.components() {
                current.push(component);
                if !current.exists() {
                    debug!("Creating storage directory {}", current.display());
                    fs::create_dir(&current)?;
                }
            }
        }

        if !self.path.exists() {
            info!("Creating storage file {}", self.path.display());
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
        }
        Ok(())
    }

    /// Reads every task line. Corrupted lines are logged, skipped and then
    /// removed from the file, which is rewritten in canonical form.
    pub fn load(&self) -> Result<TaskList, FalconError> {
        let load_err = |source: io::Error| FalconError::Load {
            path: self.path.clone(),
            source,
        };
        self.bootstrap().map_err(load_err)?;
        let contents = fs::read_to_string(&self.path).map_err(load_err)?;

        let mut tasks = TaskList::new();
        let mut skipped = 0;
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serializer::parse_storage_line(line) {
                Ok(task) => {
                    tasks.add(task);
                }
                Err(err) => {
                    skipped += 1;
                    warn!(
                        "Skipping line {} of {}: {}",
                        lineno + 1,
                        self.path.display(),
                        err
                    );
                }
            }
        }

        let canonical: Vec<String> = tasks.iter().map(|task| task.render()).collect();
        let on_disk = contents.lines().filter(|line| !line.trim().is_empty());
        if !on_disk.eq(canonical.iter().map(String::as_str)) {
            self.write_lines(&canonical).map_err(|err| match err {
                FalconError::StorageIo { source, .. } => load_err(source),
                other => other,
            })?;
            info!(
                "Rewrote {} in canonical form, dropping {} unreadable line(s)",
                self.path.display(),
                skipped
            );
        }
        info!("Loaded {} task(s) from {}", tasks.size(), self.path.display());
        Ok(tasks)
    }

    /// Appends one line; a trailing newline on `line` is optional.
    pub fn append(&self, line: &str) -> Result<(), FalconError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|source| self.io_err("open", source))?;
        let needs_separator =
            ends_without_newline(&mut file).map_err(|source| self.io_err("read", source))?;
        let separator = if needs_separator { "\n" } else { "" };
        writeln!(file, "{separator}{line}")
            .and_then(|_| file.flush())
            .map_err(|source| self.io_err("append to", source))?;
        debug!("Appended '{}' to {}", line, self.path.display());
        Ok(())
    }

    pub fn delete_line(&self, index: usize) -> Result<(), FalconError> {
        self.rewrite(index, |lines, pos| {
            lines.remove(pos);
        })?;
        debug!("Deleted task line {} from {}", index, self.path.display());
        Ok(())
    }

    pub fn replace_line(&self, index: usize, new_line: &str) -> Result<(), FalconError> {
        let new_line = new_line.trim_end_matches(['\r', '\n']);
        self.rewrite(index, |lines, pos| {
            lines[pos] = new_line.to_string();
        })?;
        debug!(
            "Replaced task line {} in {} with '{}'",
            index,
            self.path.display(),
            new_line
        );
        Ok(())
    }

    /// Raw file lines, blank ones included.
    pub fn lines(&self) -> Result<Vec<String>, FalconError> {
        let contents =
            fs::read_to_string(&self.path).map_err(|source| self.io_err("read", source))?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    fn rewrite(
        &self,
        index: usize,
        edit: impl FnOnce(&mut Vec<String>, usize),
    ) -> Result<(), FalconError> {
        let mut lines = self.lines()?;
        let task_lines: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(pos, _)| pos)
            .collect();
        let pos = index
            .checked_sub(1)
            .and_then(|i| task_lines.get(i).copied())
            .ok_or_else(|| FalconError::out_of_range(index, task_lines.len()))?;
        trace!("Task line {} is physical line {}", index, pos + 1);

        edit(&mut lines, pos);
        self.write_lines(&lines)
    }

    /// Writes a sibling temp file and renames it over the original so a
    /// failed write leaves the old contents in place.
    fn write_lines(&self, lines: &[String]) -> Result<(), FalconError> {
        let mut contents = lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        let tmp = self.temp_path();
        let written = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(contents.as_bytes())?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, &self.path));
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_err("rewrite", source));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    fn io_err(&self, action: &'static str, source: io::Error) -> FalconError {
        FalconError::StorageIo {
            action,
            path: self.path.clone(),
            source,
        }
    }
}

fn ends_without_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
