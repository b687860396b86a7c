use std::{fs, path::Path};

use super::{ConfigError, ShellConfig};

/// Reads `key = value` lines into a [`ShellConfig`].
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn source_if_exists(path: &Path, config: &mut ShellConfig) -> Result<(), ConfigError> {
        if path.exists() {
            Self::source(path, config)?;
        }
        Ok(())
    }

    pub fn source(path: &Path, config: &mut ShellConfig) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::ConfigFileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let content = fs::read_to_string(path)?;
        for (index, line) in content.lines().enumerate() {
            Self::process_line(index + 1, line, config)?;
        }
        log::debug!("loaded config from {}", path.display());
        Ok(())
    }

    fn process_line(line_no: usize, line: &str, config: &mut ShellConfig) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
            line: line_no,
            message: format!("expected key = value, found {:?}", line),
        })?;
        let key = key.trim();
        let value = unquote(value.trim());

        match key {
            "prompt" => config.prompt = value.to_string(),
            "max_line_length" => config.max_line_length = parse_limit(line_no, key, value)?,
            "max_args" => config.max_args = parse_limit(line_no, key, value)?,
            "null_device" => config.null_device = value.into(),
            _ => {
                return Err(ConfigError::UnknownKey {
                    line: line_no,
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_limit(line_no: usize, key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidValue {
            line: line_no,
            message: format!("{} must be a positive integer, found {:?}", key, value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("smallshrc");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            # shell settings
            prompt = "$ "
            max_line_length = 4096
            max_args=64
            null_device = '/dev/null'
            "#,
        );

        let mut config = ShellConfig::default();
        ConfigLoader::source(&path, &mut config).unwrap();

        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.max_line_length, 4096);
        assert_eq!(config.max_args, 64);
        assert_eq!(config.null_device, PathBuf::from("/dev/null"));
    }

    #[test]
    fn test_source_if_exists_skips_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ShellConfig::default();
        ConfigLoader::source_if_exists(&dir.path().join("absent"), &mut config).unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ShellConfig::default();
        let result = ConfigLoader::source(&dir.path().join("absent"), &mut config);
        assert!(matches!(result, Err(ConfigError::ConfigFileNotFound(_))));
    }

    #[test]
    fn test_invalid_lines() {
        let mut config = ShellConfig::default();
        assert!(matches!(
            ConfigLoader::process_line(3, "max_args = -1", &mut config),
            Err(ConfigError::InvalidValue { line: 3, .. })
        ));
        assert!(matches!(
            ConfigLoader::process_line(4, "max_args = 0", &mut config),
            Err(ConfigError::InvalidValue { line: 4, .. })
        ));
        assert!(matches!(
            ConfigLoader::process_line(5, "colour = red", &mut config),
            Err(ConfigError::UnknownKey { line: 5, .. })
        ));
        assert!(matches!(
            ConfigLoader::process_line(6, "just words", &mut config),
            Err(ConfigError::InvalidValue { line: 6, .. })
        ));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\": \""), ": ");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("plain"), "plain");
    }
}
