use super::{Command, CommandContext, CommandError, Flow};
use std::env;
use std::path::PathBuf;

/// `cd [dir]`; no argument means the home directory.
#[derive(Clone)]
pub struct CdCommand;

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self
    }

    fn target(args: &[String]) -> Result<PathBuf, CommandError> {
        match args.first() {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => dirs::home_dir().ok_or(CommandError::HomeDirNotFound),
        }
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], _ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        let target = Self::target(args)?;
        env::set_current_dir(&target).map_err(|e| {
            CommandError::ExecutionError(format!("cd: {}: {}", target.display(), e))
        })?;
        log::debug!("changed directory to {}", target.display());
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target() {
        assert_eq!(
            CdCommand::target(&["/tmp".to_string(), "ignored".to_string()]).unwrap(),
            PathBuf::from("/tmp")
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(CdCommand::target(&[]).unwrap(), home);
        }
    }

    #[test]
    fn test_cd_invalid() {
        let mut out = Vec::new();
        let mut ctx = CommandContext::new(Default::default(), &mut out);
        let result = CdCommand::new().execute(&["/nonexistent/path".to_string()], &mut ctx);
        match result {
            Err(CommandError::ExecutionError(msg)) => {
                assert!(msg.starts_with("cd: /nonexistent/path: "))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
