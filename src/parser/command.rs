use std::path::{Path, PathBuf};

/// One input line, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    /// `name` first, like argv.
    pub arguments: Vec<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub background: bool,
}

impl ParsedCommand {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            arguments: vec![name.clone()],
            name,
            input: None,
            output: None,
            background: false,
        }
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or(&[])
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}
