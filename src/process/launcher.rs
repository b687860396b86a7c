use std::ffi::CString;
use std::io::{self, Write};
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use super::redirect::RedirectPlan;
use super::signal::{prepare_child, write_stdout};
use super::{ProcessError, ProcessStatus, Reaper};
use crate::core::state::ShellState;
use crate::parser::ParsedCommand;

pub const DEFAULT_NULL_DEVICE: &str = "/dev/null";

/// What happened to a launched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    Foreground(ProcessStatus),
    Background(u32),
}

/// A background command's exec, prepared before forking.
///
/// Background children exec themselves from the `pre_exec` hook, so a
/// program that cannot be run still leaves a child with a pid that exits 1
/// and is reported by the reaper like any other.
struct BackgroundExec {
    program: CString,
    _argv: Vec<CString>,
    argv_ptrs: Vec<*const libc::c_char>,
    not_found: Vec<u8>,
}

// SAFETY: `argv_ptrs` points into the heap buffers of `_argv`, which is owned
// by the same value and never mutated.
unsafe impl Send for BackgroundExec {}
unsafe impl Sync for BackgroundExec {}

impl BackgroundExec {
    fn new(command: &ParsedCommand) -> Result<Self, ProcessError> {
        let c_string = |text: &str| {
            CString::new(text).map_err(|_| {
                ProcessError::InvalidArgument(format!("{:?} contains a NUL byte", text))
            })
        };

        let program = c_string(command.name.as_str())?;
        let argv = command
            .arguments
            .iter()
            .map(|arg| c_string(arg.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let mut argv_ptrs: Vec<*const libc::c_char> =
            argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(std::ptr::null());

        Ok(Self {
            program,
            _argv: argv,
            argv_ptrs,
            not_found: format!("{}: no such file or directory\n", command.name).into_bytes(),
        })
    }

    /// Replaces the child image. Returns the message to report only if exec failed.
    fn exec(&self) -> &[u8] {
        // SAFETY: both arrays are NUL-terminated and outlive the call.
        unsafe { libc::execvp(self.program.as_ptr(), self.argv_ptrs.as_ptr()) };
        &self.not_found
    }
}

#[derive(Clone)]
pub struct ProcessLauncher {
    state: Arc<ShellState>,
    null_device: PathBuf,
}

impl ProcessLauncher {
    pub fn new(state: Arc<ShellState>, null_device: impl Into<PathBuf>) -> Self {
        Self {
            state,
            null_device: null_device.into(),
        }
    }

    /// Spawns `command`, waiting for it unless it really runs in the background.
    pub fn launch<W: Write>(
        &self,
        command: &ParsedCommand,
        reaper: &mut Reaper,
        out: &mut W,
    ) -> Result<Launch, ProcessError> {
        let background = self.state.effective_background(command.background);
        if command.background && !background {
            log::debug!("foreground-only mode: running {} in the foreground", command.name);
        }

        let plan = RedirectPlan::resolve(command, background, &self.null_device)?;
        let exec = background.then(|| BackgroundExec::new(command)).transpose()?;
        let mut process = Command::new(&command.name);
        process.args(command.args());

        // SAFETY: the hook runs in the forked child and only makes
        // async-signal-safe calls on data prepared above.
        unsafe {
            process.pre_exec(move || {
                prepare_child(!background);
                if let Err(message) = plan.apply() {
                    write_stdout(message);
                    libc::_exit(1);
                }
                if let Some(exec) = &exec {
                    write_stdout(exec.exec());
                    libc::_exit(1);
                }
                Ok(())
            });
        }

        if background {
            self.spawn_background(command, process, reaper, out)
        } else {
            self.run_foreground(command, process, out)
        }
    }

    fn run_foreground<W: Write>(
        &self,
        command: &ParsedCommand,
        mut process: Command,
        out: &mut W,
    ) -> Result<Launch, ProcessError> {
        let foreground = self.state.begin_foreground();
        let mut child = match process.spawn() {
            Ok(child) => child,
            Err(e) => {
                Self::spawn_failed(command, e, out)?;
                return Ok(Launch::Foreground(ProcessStatus::Exited(1)));
            }
        };
        foreground.running(child.id());
        log::debug!("foreground pid {} running {}", child.id(), command.name);

        let status = ProcessStatus::from(child.wait()?);
        log::debug!("foreground pid {} finished: {}", child.id(), status);

        if let Some(signo) = status.signal() {
            writeln!(out, "terminated by signal {}", signo)?;
            out.flush()?;
        }
        drop(foreground);

        Ok(Launch::Foreground(status))
    }

    fn spawn_background<W: Write>(
        &self,
        command: &ParsedCommand,
        mut process: Command,
        reaper: &mut Reaper,
        out: &mut W,
    ) -> Result<Launch, ProcessError> {
        // The child execs on its own, so any error here is from fork itself.
        let mut child = process.spawn().map_err(|source| {
            log::error!("cannot create a process for {}: {}", command.name, source);
            ProcessError::SpawnFailed {
                program: command.name.clone(),
                source,
            }
        })?;
        let pid = child.id();
        log::debug!("background pid {} running {}", pid, command.name);

        // If the child is already gone the reaper still owes a report.
        if let Some(status) = child.try_wait()? {
            reaper.record(pid, status.into());
        }

        writeln!(out, "background pid is {}", pid)?;
        out.flush()?;
        Ok(Launch::Background(pid))
    }

    /// Reports a foreground program that cannot be executed; anything else is fatal.
    fn spawn_failed<W: Write>(
        command: &ParsedCommand,
        err: io::Error,
        out: &mut W,
    ) -> Result<(), ProcessError> {
        if !is_exec_failure(&err) {
            log::error!("cannot create a process for {}: {}", command.name, err);
            return Err(ProcessError::SpawnFailed {
                program: command.name.clone(),
                source: err,
            });
        }

        log::debug!("exec {} failed: {}", command.name, err);
        writeln!(out, "{}: no such file or directory", command.name)?;
        out.flush()?;
        Ok(())
    }
}

/// Errors that come from exec rather than from creating the process.
fn is_exec_failure(err: &io::Error) -> bool {
    match err.raw_os_error() {
        Some(
            libc::ENOENT
            | libc::EACCES
            | libc::EPERM
            | libc::ENOEXEC
            | libc::ENOTDIR
            | libc::EISDIR
            | libc::ELOOP
            | libc::ENAMETOOLONG
            | libc::ETXTBSY
            | libc::E2BIG,
        ) => true,
        Some(_) => false,
        None => matches!(
            err.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidInput
        ),
    }
}
