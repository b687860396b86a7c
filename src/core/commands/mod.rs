use std::collections::BTreeMap;
use std::io::Write;

mod cd;
mod exit;
mod status;

pub use cd::CdCommand;
pub use exit::ExitCommand;
pub use status::StatusCommand;

use crate::process::ProcessStatus;

#[derive(Debug)]
pub enum CommandError {
    ExecutionError(String),
    HomeDirNotFound,
    IoError(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::ExecutionError(msg) => write!(f, "{}", msg),
            CommandError::HomeDirNotFound => write!(f, "Home directory not found"),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

/// What the read loop does after a built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct CommandContext<'a> {
    pub last_status: ProcessStatus,
    pub out: &'a mut dyn Write,
}

impl<'a> CommandContext<'a> {
    pub fn new(last_status: ProcessStatus, out: &'a mut dyn Write) -> Self {
        Self { last_status, out }
    }
}

pub trait Command {
    /// `args` excludes the command name.
    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Cd(CdCommand),
    Status(StatusCommand),
    Exit(ExitCommand),
}

impl Command for CommandType {
    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        match self {
            CommandType::Cd(cmd) => cmd.execute(args, ctx),
            CommandType::Status(cmd) => cmd.execute(args, ctx),
            CommandType::Exit(cmd) => cmd.execute(args, ctx),
        }
    }
}

/// Commands the shell runs itself. They ignore redirections and `&`.
#[derive(Clone)]
pub struct Builtins {
    commands: BTreeMap<&'static str, CommandType>,
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

impl Builtins {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("cd", CommandType::Cd(CdCommand::new()));
        commands.insert("status", CommandType::Status(StatusCommand::new()));
        commands.insert("exit", CommandType::Exit(ExitCommand::new()));
        Self { commands }
    }

    #[cfg(test)]
    fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// `None` when `name` is not a built-in.
    pub fn execute(
        &self,
        name: &str,
        args: &[String],
        ctx: &mut CommandContext<'_>,
    ) -> Option<Result<Flow, CommandError>> {
        self.commands.get(name).map(|cmd| cmd.execute(args, ctx))
    }
}
