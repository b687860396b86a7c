use super::{Command, CommandContext, CommandError, Flow};
use std::io::Write;

/// Prints how the last foreground command finished.
#[derive(Clone)]
pub struct StatusCommand;

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for StatusCommand {
    fn execute(&self, _args: &[String], ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        writeln!(ctx.out, "{}", ctx.last_status)?;
        ctx.out.flush()?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessStatus;

    fn status_output(status: ProcessStatus) -> String {
        let mut out = Vec::new();
        let mut ctx = CommandContext::new(status, &mut out);
        assert_eq!(StatusCommand::new().execute(&[], &mut ctx).unwrap(), Flow::Continue);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_status_output() {
        assert_eq!(status_output(ProcessStatus::default()), "exit value 0\n");
        assert_eq!(status_output(ProcessStatus::Exited(2)), "exit value 2\n");
        assert_eq!(
            status_output(ProcessStatus::Signaled(2)),
            "terminated by signal 2\n"
        );
    }
}
