use super::{Command, CommandContext, CommandError, Flow};

/// Leaves the read loop. Background children are left running.
#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, _args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        Ok(Flow::Exit)
    }
}
