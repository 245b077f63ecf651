use crate::activity::ActivityLog;
use crate::interpreter::FsEffect;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create file {path}: {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to append to file {path}: {source}")]
    Append {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Applies one effect under `root` and returns the activity-log line.
/// Directory and file creation are idempotent; whole-file writes truncate.
pub fn apply(effect: &FsEffect, root: &Path) -> Result<String, WriterError> {
    match effect {
        FsEffect::CreateDir { path } => {
            let full = root.join(path);
            fs::create_dir_all(&full).map_err(|source| WriterError::CreateDir {
                path: full.display().to_string(),
                source,
            })?;
            Ok(format!("Directory created: {}", full.display()))
        }
        FsEffect::TouchFile { path } => {
            let full = root.join(path);
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&full)
                .map_err(|source| WriterError::CreateFile {
                    path: full.display().to_string(),
                    source,
                })?;
            Ok(format!("File created: {}", full.display()))
        }
        FsEffect::AppendLine { path, text } => {
            let full = root.join(path);
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&full)
                .map_err(|source| WriterError::Append {
                    path: full.display().to_string(),
                    source,
                })?;
            writeln!(file, "{text}").map_err(|source| WriterError::Append {
                path: full.display().to_string(),
                source,
            })?;
            Ok(format!("Content written to {}", full.display()))
        }
        FsEffect::WriteFile { path, content } => {
            let full = root.join(path);
            fs::write(&full, content).map_err(|source| WriterError::Write {
                path: full.display().to_string(),
                source,
            })?;
            Ok(format!("File written: {}", full.display()))
        }
    }
}

/// Applies a whole batch in order. A failed effect becomes a log line and
/// the batch continues; nothing here aborts the run.
pub fn apply_all(effects: &[FsEffect], root: &Path, log: &mut ActivityLog) {
    for effect in effects {
        match apply(effect, root) {
            Ok(line) => log.push(line),
            Err(err) => log.push(err.to_string()),
        }
    }
}
