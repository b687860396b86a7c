use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Foreground {
    Idle,
    Launching,
    Running(u32),
}

/// State shared between the main loop and the mode controller thread.
///
/// The flags are plain atomics. The foreground slot sits behind a mutex so
/// the controller can sleep on the condvar until the main loop has waited
/// on its foreground child; releasing the slot happens-before the controller
/// prints anything.
#[derive(Debug)]
pub struct ShellState {
    foreground_only: AtomicBool,
    at_prompt: AtomicBool,
    foreground: Mutex<Foreground>,
    foreground_released: Condvar,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            foreground_only: AtomicBool::new(false),
            at_prompt: AtomicBool::new(false),
            foreground: Mutex::new(Foreground::Idle),
            foreground_released: Condvar::new(),
        }
    }

    pub fn is_foreground_only(&self) -> bool {
        self.foreground_only.load(Ordering::SeqCst)
    }

    /// Returns the new value.
    pub fn toggle_foreground_only(&self) -> bool {
        !self.foreground_only.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn effective_background(&self, requested: bool) -> bool {
        requested && !self.is_foreground_only()
    }

    pub fn is_at_prompt(&self) -> bool {
        self.at_prompt.load(Ordering::SeqCst)
    }

    pub fn set_at_prompt(&self, at_prompt: bool) {
        self.at_prompt.store(at_prompt, Ordering::SeqCst);
    }

    /// Marks a foreground launch as in progress until the guard is dropped.
    pub fn begin_foreground(&self) -> ForegroundGuard<'_> {
        *self.slot() = Foreground::Launching;
        ForegroundGuard { state: self }
    }

    pub fn current_foreground_pid(&self) -> Option<u32> {
        match *self.slot() {
            Foreground::Running(pid) => Some(pid),
            _ => None,
        }
    }

    pub fn has_foreground(&self) -> bool {
        *self.slot() != Foreground::Idle
    }

    /// Blocks until no foreground command is running.
    pub fn wait_foreground_idle(&self) {
        let slot = self.slot();
        let _idle = self
            .foreground_released
            .wait_while(slot, |fg| *fg != Foreground::Idle)
            .unwrap_or_else(PoisonError::into_inner);
    }

    fn slot(&self) -> MutexGuard<'_, Foreground> {
        self.foreground.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct ForegroundGuard<'a> {
    state: &'a ShellState,
}

impl ForegroundGuard<'_> {
    pub fn running(&self, pid: u32) {
        *self.state.slot() = Foreground::Running(pid);
    }
}

impl Drop for ForegroundGuard<'_> {
    fn drop(&mut self) {
        *self.state.slot() = Foreground::Idle;
        self.state.foreground_released.notify_all();
    }
}
