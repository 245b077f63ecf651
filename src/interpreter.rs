use crate::workspace::{Workspace, WorkspaceError};
use std::path::PathBuf;

/// One file-system mutation distilled from the model's reply. Paths are
/// workspace-relative and already normalized; the writer joins them with the
/// root before touching disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEffect {
    CreateDir { path: PathBuf },
    TouchFile { path: PathBuf },
    AppendLine { path: PathBuf, text: String },
    WriteFile { path: PathBuf, content: String },
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Interpretation {
    pub effects: Vec<FsEffect>,
    pub warnings: Vec<String>,
}

/// Classification of a single trimmed line. Precedence is fixed: `mkdir `,
/// then `touch `, then `echo `, then `# File:`, then plain text.
#[derive(Debug, PartialEq, Eq)]
enum LineClass<'a> {
    MakeDirectory { path: &'a str },
    TouchFile { path: &'a str },
    AppendLine { target: &'a str, text: &'a str },
    /// `echo ` with no `>` delimiter; consumed and dropped.
    Malformed,
    BeginFile { path: &'a str },
    Plain,
}

fn classify(trimmed: &str) -> LineClass<'_> {
    if let Some(rest) = trimmed.strip_prefix("mkdir ") {
        return LineClass::MakeDirectory { path: rest };
    }
    if let Some(rest) = trimmed.strip_prefix("touch ") {
        return LineClass::TouchFile { path: rest };
    }
    if let Some(rest) = trimmed.strip_prefix("echo ") {
        return match rest.split_once('>') {
            Some((text, target)) => LineClass::AppendLine {
                target,
                text: text.trim(),
            },
            None => LineClass::Malformed,
        };
    }
    if let Some(rest) = trimmed.strip_prefix("# File:") {
        return LineClass::BeginFile { path: rest };
    }
    LineClass::Plain
}

struct OpenFile {
    path: PathBuf,
    lines: Vec<String>,
}

/// Turns a block of generated text into an ordered effect sequence.
///
/// Never fails: unrecognized lines outside a file-context are ignored,
/// malformed `echo` lines are dropped, and paths that resolve outside the
/// workspace become warnings instead of effects.
pub fn interpret(text: &str, workspace: &Workspace) -> Interpretation {
    let mut out = Interpretation::default();
    let mut open: Option<OpenFile> = None;

    for raw in text.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        match classify(trimmed) {
            LineClass::MakeDirectory { path } => match workspace.resolve(path) {
                Ok(path) => out.effects.push(FsEffect::CreateDir { path }),
                Err(err) => out.warnings.push(escape_warning(err)),
            },
            LineClass::TouchFile { path } => match workspace.resolve(path) {
                Ok(path) => out.effects.push(FsEffect::TouchFile { path }),
                Err(err) => out.warnings.push(escape_warning(err)),
            },
            LineClass::AppendLine { target, text } => match workspace.resolve(target) {
                Ok(path) => out.effects.push(FsEffect::AppendLine {
                    path,
                    text: text.to_string(),
                }),
                Err(err) => out.warnings.push(escape_warning(err)),
            },
            LineClass::Malformed => {}
            LineClass::BeginFile { path } => {
                flush(&mut open, &mut out.effects);
                match workspace.resolve(path) {
                    Ok(path) => {
                        open = Some(OpenFile {
                            path,
                            lines: Vec::new(),
                        });
                    }
                    Err(err) => out.warnings.push(escape_warning(err)),
                }
            }
            LineClass::Plain => {
                if let Some(file) = open.as_mut() {
                    // Content keeps the raw line so indentation survives.
                    file.lines.push(raw.to_string());
                }
            }
        }
    }

    flush(&mut open, &mut out.effects);
    out
}

fn flush(open: &mut Option<OpenFile>, effects: &mut Vec<FsEffect>) {
    if let Some(file) = open.take() {
        if !file.lines.is_empty() {
            effects.push(FsEffect::WriteFile {
                path: file.path,
                content: file.lines.join("\n") + "\n",
            });
        }
    }
}

fn escape_warning(err: WorkspaceError) -> String {
    format!("Warning: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let temp = tempdir().expect("tempdir");
        let workspace = Workspace::create(temp.path().join("ws")).expect("create workspace");
        (temp, workspace)
    }

    #[test]
    fn unrecognized_text_yields_no_effects() {
        let (_temp, ws) = workspace();
        let reply = "Sure, here is what I would do.\nFirst consider the layout.\n\nDone.";
        let result = interpret(reply, &ws);
        assert!(result.effects.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn mkdir_touch_and_echo_lines_become_effects_in_order() {
        let (_temp, ws) = workspace();
        let reply = "mkdir src\ntouch src/lib.txt\necho hello > notes.txt";
        let result = interpret(reply, &ws);
        assert_eq!(
            result.effects,
            vec![
                FsEffect::CreateDir {
                    path: PathBuf::from("src")
                },
                FsEffect::TouchFile {
                    path: PathBuf::from("src/lib.txt")
                },
                FsEffect::AppendLine {
                    path: PathBuf::from("notes.txt"),
                    text: "hello".to_string()
                },
            ]
        );
    }

    #[test]
    fn echo_without_delimiter_is_dropped() {
        let (_temp, ws) = workspace();
        let result = interpret("echo no target here", &ws);
        assert!(result.effects.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn echo_splits_on_first_delimiter_only() {
        let (_temp, ws) = workspace();
        let result = interpret("echo a > b > c.txt", &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::AppendLine {
                path: PathBuf::from("b > c.txt"),
                text: "a".to_string()
            }]
        );
    }

    #[test]
    fn file_marker_switch_flushes_previous_block_first() {
        let (_temp, ws) = workspace();
        let reply = "# File: x.txt\nline1\nline2\n# File: y.txt\nother";
        let result = interpret(reply, &ws);
        assert_eq!(
            result.effects,
            vec![
                FsEffect::WriteFile {
                    path: PathBuf::from("x.txt"),
                    content: "line1\nline2\n".to_string()
                },
                FsEffect::WriteFile {
                    path: PathBuf::from("y.txt"),
                    content: "other\n".to_string()
                },
            ]
        );
    }

    #[test]
    fn open_block_is_flushed_exactly_once_at_end_of_input() {
        let (_temp, ws) = workspace();
        let result = interpret("# File: app.txt\nbody", &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::WriteFile {
                path: PathBuf::from("app.txt"),
                content: "body\n".to_string()
            }]
        );
    }

    #[test]
    fn empty_block_is_never_flushed() {
        let (_temp, ws) = workspace();
        let reply = "# File: empty.txt\n# File: full.txt\ncontent";
        let result = interpret(reply, &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::WriteFile {
                path: PathBuf::from("full.txt"),
                content: "content\n".to_string()
            }]
        );
    }

    #[test]
    fn content_lines_keep_indentation_and_skip_blanks() {
        let (_temp, ws) = workspace();
        let reply = "# File: code.txt\nfn main() {\n    body();\n\n}";
        let result = interpret(reply, &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::WriteFile {
                path: PathBuf::from("code.txt"),
                content: "fn main() {\n    body();\n}\n".to_string()
            }]
        );
    }

    #[test]
    fn content_before_any_marker_is_ignored() {
        let (_temp, ws) = workspace();
        let result = interpret("stray line\nmkdir src", &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::CreateDir {
                path: PathBuf::from("src")
            }]
        );
    }

    #[test]
    fn malformed_echo_inside_block_never_becomes_content() {
        let (_temp, ws) = workspace();
        let reply = "# File: out.txt\nkeep\necho dropped line\nalso keep";
        let result = interpret(reply, &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::WriteFile {
                path: PathBuf::from("out.txt"),
                content: "keep\nalso keep\n".to_string()
            }]
        );
    }

    #[test]
    fn escaping_paths_become_warnings_not_effects() {
        let (_temp, ws) = workspace();
        let reply = "mkdir ../outside\ntouch ../../etc/passwd\nmkdir inside";
        let result = interpret(reply, &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::CreateDir {
                path: PathBuf::from("inside")
            }]
        );
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("escapes workspace"));
    }

    #[test]
    fn escaping_file_marker_opens_no_block() {
        let (_temp, ws) = workspace();
        let reply = "# File: ../leak.txt\nsecret\n# File: ok.txt\nfine";
        let result = interpret(reply, &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::WriteFile {
                path: PathBuf::from("ok.txt"),
                content: "fine\n".to_string()
            }]
        );
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn absolute_paths_are_treated_as_workspace_relative() {
        let (_temp, ws) = workspace();
        let result = interpret("mkdir /src/deep", &ws);
        assert_eq!(
            result.effects,
            vec![FsEffect::CreateDir {
                path: PathBuf::from("src/deep")
            }]
        );
    }
}
