use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use signal_hook::consts::signal::SIGTSTP;
use signal_hook::iterator::{Handle, Signals};

use crate::core::state::ShellState;
use crate::process::ProcessError;

pub const ENTERING_FOREGROUND_ONLY: &str = "\nEntering foreground-only mode (& is now ignored)\n";
pub const EXITING_FOREGROUND_ONLY: &str = "\nExiting foreground-only mode\n";

/// The shell itself never dies from an interactive interrupt.
pub fn ignore_interrupts() -> Result<(), ProcessError> {
    // SAFETY: SIG_IGN is a valid disposition for SIGINT.
    let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };
    if previous == libc::SIG_ERR {
        return Err(ProcessError::SignalError(format!(
            "cannot ignore SIGINT: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}

/// Signal dispositions for a freshly forked child.
///
/// Runs between fork and exec, so it only calls `signal(2)`. Background
/// children keep the shell's ignored SIGINT.
pub(crate) fn prepare_child(foreground: bool) {
    // SAFETY: async-signal-safe calls with valid dispositions.
    unsafe {
        libc::signal(libc::SIGTSTP, libc::SIG_IGN);
        if foreground {
            libc::signal(libc::SIGINT, libc::SIG_DFL);
        }
    }
}

/// Unbuffered write of the whole slice to fd 1. Safe to call in a forked
/// child and from the controller thread while the main loop holds stdout.
pub(crate) fn write_stdout(mut bytes: &[u8]) {
    while !bytes.is_empty() {
        // SAFETY: the pointer and length come from a live slice.
        let written = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                bytes.as_ptr().cast::<libc::c_void>(),
                bytes.len(),
            )
        };
        if written < 0 {
            if io::Error::last_os_error().kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return;
        }
        bytes = &bytes[written as usize..];
    }
}

/// Toggles foreground-only mode whenever the shell receives SIGTSTP.
///
/// Signals arrive on a dedicated thread through `signal_hook`, so the
/// handler proper only records the delivery and the toggle runs as ordinary
/// code, one delivery at a time. The registration uses `SA_RESTART`, so a
/// pending readline or foreground wait on the main thread just resumes.
pub struct ModeController {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl ModeController {
    pub fn spawn(state: Arc<ShellState>, prompt: String) -> Result<Self, ProcessError> {
        let mut signals = Signals::new([SIGTSTP])
            .map_err(|e| ProcessError::SignalError(format!("cannot watch SIGTSTP: {}", e)))?;
        let handle = signals.handle();

        let thread = thread::Builder::new()
            .name("mode-controller".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    let message = Self::toggle(&state, &prompt);
                    write_stdout(message.as_bytes());
                }
            })?;

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// Flips the mode, waits out the running foreground child, and returns
    /// the notification to print.
    pub fn toggle(state: &ShellState, prompt: &str) -> String {
        let entering = state.toggle_foreground_only();
        log::debug!("foreground-only mode {}", if entering { "on" } else { "off" });

        if state.has_foreground() {
            log::debug!(
                "holding the notice until foreground pid {:?} finishes",
                state.current_foreground_pid()
            );
        }
        state.wait_foreground_idle();
        Self::notification(entering, state.is_at_prompt(), prompt)
    }

    pub fn notification(entering: bool, at_prompt: bool, prompt: &str) -> String {
        let mut message = if entering {
            ENTERING_FOREGROUND_ONLY.to_string()
        } else {
            EXITING_FOREGROUND_ONLY.to_string()
        };
        if at_prompt {
            message.push_str(prompt);
        }
        message
    }

    pub fn shutdown(mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("mode controller thread panicked");
            }
        }
    }
}

impl Drop for ModeController {
    fn drop(&mut self) {
        self.handle.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_notification_text() {
        assert_eq!(
            ModeController::notification(true, true, ": "),
            "\nEntering foreground-only mode (& is now ignored)\n: "
        );
        assert_eq!(
            ModeController::notification(true, false, ": "),
            "\nEntering foreground-only mode (& is now ignored)\n"
        );
        assert_eq!(
            ModeController::notification(false, true, ": "),
            "\nExiting foreground-only mode\n: "
        );
        assert_eq!(
            ModeController::notification(false, false, ": "),
            "\nExiting foreground-only mode\n"
        );
    }

    #[test]
    fn test_toggle_round_trip() {
        let state = ShellState::new();
        state.set_at_prompt(true);

        let message = ModeController::toggle(&state, "> ");
        assert!(state.is_foreground_only());
        assert_eq!(message, format!("{}> ", ENTERING_FOREGROUND_ONLY));

        state.set_at_prompt(false);
        let message = ModeController::toggle(&state, "> ");
        assert!(!state.is_foreground_only());
        assert_eq!(message, EXITING_FOREGROUND_ONLY);
    }

    #[test]
    fn test_toggle_waits_for_foreground_child() {
        let state = Arc::new(ShellState::new());
        let guard = state.begin_foreground();
        guard.running(7);

        let toggler = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                let message = ModeController::toggle(&state, ": ");
                (Instant::now(), message)
            })
        };

        thread::sleep(Duration::from_millis(100));
        // mode flips right away even though the message is held back
        assert!(state.is_foreground_only());
        assert!(!toggler.is_finished());

        let released = Instant::now();
        drop(guard);
        let (printed, message) = toggler.join().unwrap();
        assert!(printed >= released);
        assert_eq!(message, ENTERING_FOREGROUND_ONLY);
    }

    #[test]
    fn test_sigtstp_toggles_mode() {
        let state = Arc::new(ShellState::new());
        let controller = ModeController::spawn(Arc::clone(&state), String::new()).unwrap();

        // SAFETY: SIGTSTP is handled by the controller registration.
        unsafe { libc::raise(libc::SIGTSTP) };

        let deadline = Instant::now() + Duration::from_secs(5);
        while !state.is_foreground_only() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(state.is_foreground_only());
        controller.shutdown();
    }
}
