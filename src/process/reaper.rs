use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Write};

use super::ProcessStatus;

/// A finished background child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaped {
    pub pid: u32,
    pub status: ProcessStatus,
}

impl fmt::Display for Reaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "background pid {} is done: {}", self.pid, self.status)
    }
}

/// Collects finished children without ever blocking.
#[derive(Debug, Default)]
pub struct Reaper {
    // Already waited on elsewhere, not yet reported.
    pending: VecDeque<Reaped>,
}

impl Reaper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pid: u32, status: ProcessStatus) {
        self.pending.push_back(Reaped { pid, status });
    }

    /// Reports every child that has finished so far, each exactly once.
    pub fn sweep<W: Write>(&mut self, out: &mut W) -> io::Result<Vec<Reaped>> {
        let mut reaped: Vec<Reaped> = self.pending.drain(..).collect();
        while let Some(done) = Self::try_wait_any() {
            reaped.push(done);
        }

        for done in &reaped {
            log::debug!("reaped {}: {}", done.pid, done.status);
            writeln!(out, "{}", done)?;
        }
        if !reaped.is_empty() {
            out.flush()?;
        }
        Ok(reaped)
    }

    fn try_wait_any() -> Option<Reaped> {
        let mut raw: libc::c_int = 0;
        // SAFETY: `raw` is a valid out-pointer for the duration of the call.
        let pid = unsafe { libc::waitpid(-1, &mut raw, libc::WNOHANG) };
        if pid > 0 {
            Some(Reaped {
                pid: pid as u32,
                status: ProcessStatus::from_raw(raw),
            })
        } else {
            None
        }
    }
}
