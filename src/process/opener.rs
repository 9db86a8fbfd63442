//! process::opener
//!
//! Open a file for the user to edit.
//!
//! Editor detection prefers Cursor, then VS Code: first as commands on
//! `PATH`, then through the environment variables those editors inject
//! into their integrated terminals, checked against known install paths.
//! When no editor is found, or it fails to start, the OS default handler
//! is used instead.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::RunError;

/// How the file was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    /// In the named editor.
    Editor(String),
    /// With the OS default handler.
    System,
}

/// Queries about the host, so detection can be tested without one.
pub trait Host {
    /// Value of an environment variable.
    fn var(&self, key: &str) -> Option<String>;
    /// Whether a command is resolvable on `PATH`.
    fn on_path(&self, command: &str) -> bool;
    /// Whether a file exists.
    fn exists(&self, path: &Path) -> bool;
}

/// The real host environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn on_path(&self, command: &str) -> bool {
        Command::new("which")
            .arg(command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

struct EditorHint {
    command: &'static str,
    env_vars: &'static [&'static str],
    term_program: &'static str,
    install_paths: &'static [&'static str],
}

const EDITORS: &[EditorHint] = &[
    EditorHint {
        command: "cursor",
        env_vars: &["CURSOR_INJECTION", "CURSOR_PID", "CURSOR"],
        term_program: "cursor",
        install_paths: &[
            "/Applications/Cursor.app/Contents/Resources/app/bin/cursor",
            "/usr/local/bin/cursor",
        ],
    },
    EditorHint {
        command: "code",
        env_vars: &["VSCODE_INJECTION", "VSCODE_PID", "VSCODE"],
        term_program: "vscode",
        install_paths: &[
            "/Applications/Visual Studio Code.app/Contents/Resources/app/bin/code",
            "/usr/local/bin/code",
        ],
    },
];

/// Pick an editor command, or `None` to use the system opener.
///
/// A non-empty `configured` editor always wins.
pub fn detect_editor(configured: Option<&str>, host: &dyn Host) -> Option<String> {
    if let Some(editor) = configured.map(str::trim).filter(|e| !e.is_empty()) {
        return Some(editor.to_string());
    }

    for hint in EDITORS {
        if host.on_path(hint.command) {
            return Some(hint.command.to_string());
        }
    }

    for hint in EDITORS {
        let in_editor_terminal = hint
            .env_vars
            .iter()
            .any(|key| host.var(key).is_some_and(|v| !v.is_empty()))
            || host.var("TERM_PROGRAM").as_deref() == Some(hint.term_program);
        if !in_editor_terminal {
            continue;
        }
        if let Some(path) = hint
            .install_paths
            .iter()
            .map(PathBuf::from)
            .find(|p| host.exists(p))
        {
            return Some(path.display().to_string());
        }
    }

    None
}

/// The OS default opener command for `path` on `os` (as in `std::env::consts::OS`).
pub fn system_open_command(os: &str, path: &Path) -> (String, Vec<String>) {
    let path = path.display().to_string();
    match os {
        "macos" => ("open".to_string(), vec![path]),
        "windows" => (
            "cmd".to_string(),
            vec!["/c".into(), "start".into(), String::new(), path],
        ),
        _ => ("xdg-open".to_string(), vec![path]),
    }
}

/// Start a program detached from the terminal without waiting for it.
///
/// On unix the child leads its own process group, so terminal signals
/// aimed at `sp` (Ctrl-C, hangup) do not reach it.
fn spawn_detached(program: &str, args: &[String]) -> Result<(), RunError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    command
        .spawn()
        .map(drop)
        .map_err(|source| RunError::Spawn {
            program: program.to_string(),
            source,
        })
}

/// Open `path` in `editor` if given, falling back to the OS default handler.
pub fn open_path(path: &Path, editor: Option<&str>) -> Result<Opened, RunError> {
    if let Some(editor) = editor {
        if spawn_detached(editor, &[path.display().to_string()]).is_ok() {
            return Ok(Opened::Editor(editor.to_string()));
        }
    }

    let (program, args) = system_open_command(std::env::consts::OS, path);
    spawn_detached(&program, &args)?;
    Ok(Opened::System)
}
