use crate::config::Config;
use crate::interpreter;
use crate::provider::{Completion, CompletionClient, ProviderError};
use crate::session::{load_session, save_session, Session, SessionError};
use crate::workspace::{Workspace, WorkspaceError};
use crate::writer;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAIN_PROMPT: &str =
    "You are a coding assistant that creates and edits files inside the user's project workspace.";

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("no workspace has been created yet")]
    NoWorkspace,
    #[error("no model selected")]
    NoModel,
    #[error("task text is empty")]
    EmptyTask,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Live session aggregate: configuration, session state, the workspace
/// boundary and the main prompt. One explicit struct, no process-wide state.
#[derive(Debug)]
pub struct Desk {
    pub config: Config,
    pub session: Session,
    workspace: Option<Workspace>,
    main_prompt: String,
}

impl Desk {
    pub fn new(config: Config) -> Self {
        let mut session = Session::default();
        session.selected_model = config.selected_model.clone();
        Self {
            config,
            session,
            workspace: None,
            main_prompt: DEFAULT_MAIN_PROMPT.to_string(),
        }
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn main_prompt(&self) -> &str {
        &self.main_prompt
    }

    pub fn set_main_prompt(&mut self, prompt: impl Into<String>) {
        self.main_prompt = prompt.into();
    }

    pub fn reset_main_prompt(&mut self) {
        self.main_prompt = DEFAULT_MAIN_PROMPT.to_string();
    }

    /// Establishes (or explicitly re-points) the workspace boundary.
    pub fn create_workspace(
        &mut self,
        root: impl Into<PathBuf>,
    ) -> Result<&Workspace, WorkspaceError> {
        let workspace = Workspace::create(root)?;
        self.session.workspace_path = Some(workspace.root().to_path_buf());
        self.session
            .activity
            .push(format!("Workspace created: {}", workspace.root().display()));
        Ok(self.workspace.insert(workspace))
    }

    /// A client for the configured endpoints, speaking for whichever model
    /// the session currently selects.
    pub fn client(&self) -> CompletionClient {
        CompletionClient::from_config(&self.config).with_model(&self.session.selected_model)
    }

    /// The full pipeline for one task: compose the prompt, ask the provider,
    /// interpret the reply and apply the effects. Only provider failure
    /// propagates; everything the interpreter or writer hits degrades to
    /// activity-log lines.
    pub fn run_task(&mut self, provider: &dyn Completion, task: &str) -> Result<(), TaskError> {
        let workspace = self.workspace.as_ref().ok_or(TaskError::NoWorkspace)?;
        if self.session.selected_model.trim().is_empty() {
            return Err(TaskError::NoModel);
        }
        let task = task.trim();
        if task.is_empty() {
            return Err(TaskError::EmptyTask);
        }

        let prompt = compose_prompt(&self.main_prompt, workspace.root(), &self.session, task);
        let reply = provider.complete(&prompt)?;

        let interpretation = interpreter::interpret(&reply, workspace);
        for warning in &interpretation.warnings {
            self.session.activity.push(warning.clone());
        }
        writer::apply_all(
            &interpretation.effects,
            workspace.root(),
            &mut self.session.activity,
        );
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        save_session(path, &self.session)
    }

    /// Replaces the whole session with the loaded record and rebuilds the
    /// workspace boundary from its stored path. A boundary that cannot be
    /// re-established degrades to a warning line.
    pub fn load(&mut self, path: &Path) -> Result<(), SessionError> {
        self.session = load_session(path)?;
        self.workspace = None;
        if let Some(root) = self.session.workspace_path.clone() {
            match Workspace::create(root) {
                Ok(workspace) => self.workspace = Some(workspace),
                Err(err) => self.session.activity.push(format!("Warning: {err}")),
            }
        }
        Ok(())
    }
}

/// Builds the provider prompt around the user's task: main prompt, workspace
/// location, enabled reference lists (file references contribute their
/// basenames) and the instruction to answer with file-system commands.
pub fn compose_prompt(
    main_prompt: &str,
    workspace_root: &Path,
    session: &Session,
    task: &str,
) -> String {
    let mut references = String::new();
    if session.use_urls && !session.url_references.is_empty() {
        references.push_str("Using the following URLs as references: ");
        references.push_str(&session.url_references.join(", "));
        references.push_str(". ");
    }
    if session.use_files && !session.file_references.is_empty() {
        let names = session
            .file_references
            .iter()
            .map(|file| {
                Path::new(file)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(file.as_str())
            })
            .collect::<Vec<_>>();
        references.push_str("Using content from the following files: ");
        references.push_str(&names.join(", "));
        references.push_str(". ");
    }

    format!(
        "{main_prompt}\n\
         Analyze the existing project structure, including files and directories, \
         in the workspace at: {root}. {references}The task is: {task}. \
         You must decide where each part of the code should go, create or modify \
         files and directories using the file system commands, and ensure \
         everything fits together. Log each step you take in the terminal.",
        root = workspace_root.display()
    )
}
