//! process
//!
//! Running external programs.
//!
//! # Modules
//!
//! - [`opener`]: Opening files in a code editor or the OS default handler
//!
//! # Design
//!
//! Commands build an [`Invocation`] and hand it to a [`ProcessRunner`].
//! The system runner inherits the terminal's stdio and environment, waits
//! for the child, and returns its exit code. Failing to start the program
//! at all is a [`RunError`], kept distinct from a child that ran and exited
//! non-zero.

pub mod opener;

use std::fmt;
use std::process::Command;

use thiserror::Error;

/// Errors from running a program.
#[derive(Debug, Error)]
pub enum RunError {
    /// The program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A program to run, with arguments and environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Variables set on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs programs to completion.
pub trait ProcessRunner {
    /// Run the invocation and return the child's exit code.
    fn run(&self, invocation: &Invocation) -> Result<i32, RunError>;
}

/// Runner that spawns real processes with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32, RunError> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .status()
            .map_err(|source| RunError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        // No code means the child was killed by a signal.
        Ok(status.code().unwrap_or(1))
    }
}
