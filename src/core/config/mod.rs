use std::{fmt, path::Path, path::PathBuf};

mod loader;
mod paths;

pub use loader::ConfigLoader;
pub use paths::ConfigPaths;

use crate::flags::Flags;
use crate::parser::{Parser, DEFAULT_MAX_ARGS, DEFAULT_MAX_LINE_LENGTH};
use crate::process::launcher::DEFAULT_NULL_DEVICE;

pub const DEFAULT_PROMPT: &str = ": ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub max_line_length: usize,
    pub max_args: usize,
    pub null_device: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_args: DEFAULT_MAX_ARGS,
            null_device: PathBuf::from(DEFAULT_NULL_DEVICE),
        }
    }
}

impl ShellConfig {
    /// `--config <path>` must exist; otherwise `~/.smallshrc` is read if present.
    pub fn load(flags: &Flags) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match flags.get_value("config") {
            Some(path) => ConfigLoader::source(Path::new(path), &mut config)?,
            None => {
                if let Some(paths) = ConfigPaths::new() {
                    ConfigLoader::source_if_exists(&paths.rc_path, &mut config)?;
                }
            }
        }
        Ok(config)
    }

    pub fn parser(&self) -> Parser {
        Parser::new(self.max_line_length, self.max_args)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ConfigFileNotFound(String),
    InvalidValue { line: usize, message: String },
    UnknownKey { line: usize, key: String },
    IoError(std::io::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigFileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::InvalidValue { line, message } => {
                write!(f, "line {}: {}", line, message)
            }
            ConfigError::UnknownKey { line, key } => {
                write!(f, "line {}: unknown setting {:?}", line, key)
            }
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
