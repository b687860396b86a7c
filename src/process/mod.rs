use std::fmt;
use std::io;
use std::os::unix::process::ExitStatusExt;

pub mod launcher;
pub mod reaper;
pub mod redirect;
pub mod signal;

pub use launcher::{Launch, ProcessLauncher};
pub use reaper::{Reaped, Reaper};
pub use redirect::RedirectPlan;
pub use signal::ModeController;

#[derive(Debug)]
pub enum ProcessError {
    SpawnFailed { program: String, source: io::Error },
    SignalError(String),
    InvalidArgument(String),
    Io(io::Error),
}

impl ProcessError {
    /// The shell cannot keep going after failing to create a process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProcessError::SpawnFailed { .. } | ProcessError::Io(_))
    }
}

impl From<io::Error> for ProcessError {
    fn from(e: io::Error) -> Self {
        ProcessError::Io(e)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::SpawnFailed { program, source } => {
                write!(f, "cannot create a process for {}: {}", program, source)
            }
            ProcessError::SignalError(msg) => write!(f, "Signal error: {}", msg),
            ProcessError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            ProcessError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::SpawnFailed { source, .. } => Some(source),
            ProcessError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// How a child finished: the part of a wait status the shell reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Exited(i32),
    Signaled(i32),
}

impl Default for ProcessStatus {
    fn default() -> Self {
        ProcessStatus::Exited(0)
    }
}

impl ProcessStatus {
    /// Decodes a raw `waitpid` status.
    pub fn from_raw(raw: libc::c_int) -> Self {
        if libc::WIFSIGNALED(raw) {
            ProcessStatus::Signaled(libc::WTERMSIG(raw))
        } else {
            ProcessStatus::Exited(libc::WEXITSTATUS(raw))
        }
    }

    pub fn signal(&self) -> Option<i32> {
        match self {
            ProcessStatus::Signaled(signo) => Some(*signo),
            ProcessStatus::Exited(_) => None,
        }
    }

    pub fn success(&self) -> bool {
        *self == ProcessStatus::Exited(0)
    }
}

impl From<std::process::ExitStatus> for ProcessStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        ProcessStatus::from_raw(status.into_raw())
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::Exited(code) => write!(f, "exit value {}", code),
            ProcessStatus::Signaled(signo) => write!(f, "terminated by signal {}", signo),
        }
    }
}
