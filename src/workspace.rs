use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("workspace root must be an absolute path, got {path}")]
    NotAbsolute { path: String },
    #[error("path escapes workspace: {path}")]
    Escape { path: String },
}

/// The single directory all file mutations are confined to.
///
/// Every path argument taken from generated text is interpreted relative to
/// this root; `resolve` refuses anything that would land outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let root = root.into();
        if !root.is_absolute() {
            return Err(WorkspaceError::NotAbsolute {
                path: root.display().to_string(),
            });
        }
        fs::create_dir_all(&root).map_err(|source| WorkspaceError::CreateDir {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalizes a raw path from generated text into a workspace-relative
    /// path. Leading separators are stripped, `.` segments dropped and `..`
    /// segments popped; a `..` that would climb above the root is refused.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, WorkspaceError> {
        let trimmed = raw.trim().trim_start_matches(['/', '\\']);
        let mut resolved = PathBuf::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() {
                        return Err(WorkspaceError::Escape {
                            path: raw.trim().to_string(),
                        });
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(WorkspaceError::Escape {
                        path: raw.trim().to_string(),
                    });
                }
            }
        }
        Ok(resolved)
    }
}
