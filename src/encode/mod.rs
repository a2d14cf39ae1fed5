//! External encoder plumbing.
//!
//! `ffmpeg` is driven through the [`ProcessRunner`] seam so the driver can be exercised with a
//! scripted runner. The animated-image fallback is pure library code and needs no subprocess.

/// `ffmpeg` invocation builders and the encoder facade.
pub mod ffmpeg;
/// Looping GIF written with the `image` crate.
pub mod gif;
mod process;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub use process::SystemProcessRunner;

/// Diagnostic text kept from a failed invocation.
pub const STDERR_LIMIT: usize = 4000;

/// One subprocess call: program, arguments and working directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, a: impl Into<String>) -> Self {
        self.args.push(a.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for a in &self.args {
            if a.contains(' ') {
                write!(f, " \"{a}\"")?;
            } else {
                write!(f, " {a}")?;
            }
        }
        Ok(())
    }
}

/// What a finished (or killed) subprocess left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code; `None` when killed by a signal or by the timeout.
    pub code: Option<i32>,
    pub stderr: String,
    pub timed_out: bool,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        !self.timed_out && self.code == Some(0)
    }
}

/// Runs one invocation to completion, killing it past `timeout`.
///
/// `Err` means the process could not be started or waited on at all.
pub trait ProcessRunner {
    fn run(&mut self, invocation: &Invocation, timeout: Duration) -> anyhow::Result<ProcessOutcome>;
}

/// Clip diagnostic text to [`STDERR_LIMIT`] characters.
pub fn truncate_stderr(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(STDERR_LIMIT) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/invocation.rs"]
mod tests;
