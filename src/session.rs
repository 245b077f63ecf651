use crate::activity::ActivityLog;
use crate::prompts::PromptTree;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read workflow file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid workflow file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid workflow record: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode workflow record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write workflow file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorBuffer {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// The full session record: everything needed to restore the tool to where
/// the user left it. Every field defaults so old or sparse workflow files
/// still load; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub url_references: Vec<String>,
    #[serde(default)]
    pub file_references: Vec<String>,
    #[serde(default)]
    pub use_urls: bool,
    #[serde(default)]
    pub use_files: bool,
    #[serde(default)]
    pub selected_model: String,
    #[serde(default)]
    pub prompts: PromptTree,
    #[serde(default)]
    pub workspace_path: Option<PathBuf>,
    #[serde(default)]
    pub open_tabs: Vec<EditorBuffer>,
    #[serde(default, rename = "terminal_output")]
    pub activity: ActivityLog,
}

impl Session {
    pub fn open_buffers(&self) -> &[EditorBuffer] {
        &self.open_tabs
    }

    pub fn set_open_buffers(&mut self, buffers: Vec<EditorBuffer>) {
        self.open_tabs = buffers;
    }

    /// Pure function of the struct; no hidden state is read.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SessionError> {
        serde_json::to_vec_pretty(self).map_err(SessionError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SessionError> {
        serde_json::from_slice(bytes).map_err(SessionError::Decode)
    }
}

pub fn save_session(path: &Path, session: &Session) -> Result<(), SessionError> {
    let bytes = session.to_bytes()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SessionError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| SessionError::Write {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_session(path: &Path) -> Result<Session, SessionError> {
    let bytes = fs::read(path).map_err(|source| SessionError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SessionError::Parse {
        path: path.display().to_string(),
        source,
    })
}
