use std::io::Write;
use std::sync::Arc;

use crate::core::commands::{Builtins, CommandContext, Flow};
use crate::core::config::ShellConfig;
use crate::core::state::ShellState;
use crate::error::ShellError;
use crate::expand::PidExpander;
use crate::parser::{self, Parser};
use crate::process::{Launch, ProcessLauncher, ProcessStatus, Reaper};

/// Runs one input line: expand, parse, then a built-in or a child process.
pub struct LineExecutor {
    expander: PidExpander,
    parser: Parser,
    builtins: Builtins,
    launcher: ProcessLauncher,
    reaper: Reaper,
    last_status: ProcessStatus,
}

impl LineExecutor {
    pub fn new(state: Arc<ShellState>, config: &ShellConfig) -> Self {
        Self {
            expander: PidExpander::new(),
            parser: config.parser(),
            builtins: Builtins::new(),
            launcher: ProcessLauncher::new(state, config.null_device.clone()),
            reaper: Reaper::new(),
            last_status: ProcessStatus::default(),
        }
    }

    pub fn last_status(&self) -> ProcessStatus {
        self.last_status
    }

    /// Comment and blank lines are skipped without touching the last status.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, ShellError> {
        if parser::is_noop(line) {
            return Ok(Flow::Continue);
        }

        self.parser.check_line(line)?;
        let expanded = self.expander.expand(line);
        let command = self.parser.parse(&expanded)?;
        log::debug!("parsed {:?}", command);

        let mut ctx = CommandContext::new(self.last_status, &mut *out);
        if let Some(result) = self.builtins.execute(&command.name, command.args(), &mut ctx) {
            return Ok(result?);
        }

        match self.launcher.launch(&command, &mut self.reaper, out)? {
            Launch::Foreground(status) => self.last_status = status,
            Launch::Background(_) => {}
        }
        Ok(Flow::Continue)
    }

    /// Reports finished background children; runs after every line.
    pub fn reap<W: Write>(&mut self, out: &mut W) -> Result<(), ShellError> {
        self.reaper.sweep(out)?;
        Ok(())
    }
}
