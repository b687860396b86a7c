use crate::error::ShellError;
use std::collections::BTreeMap;

pub const TOO_MANY_ARGUMENTS: &str = "Program is taking too many arguments";

#[derive(Debug, Clone)]
pub struct Flags {
    flags: BTreeMap<&'static str, Flag>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub short: &'static str,
    pub long: &'static str,
    pub description: &'static str,
    pub takes_value: bool,
    pub value: Option<String>,
}

impl Flag {
    fn switch(short: &'static str, long: &'static str, description: &'static str) -> Self {
        Flag {
            short,
            long,
            description,
            takes_value: false,
            value: None,
        }
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let mut flags = BTreeMap::new();

        flags.insert("help", Flag::switch("-h", "--help", "Print this help message"));
        flags.insert(
            "version",
            Flag::switch("-v", "--version", "Show version information"),
        );
        flags.insert(
            "quiet",
            Flag::switch("-q", "--quiet", "Suppress shell diagnostics"),
        );
        flags.insert("debug", Flag::switch("-d", "--debug", "Enable debug logging"));
        flags.insert(
            "config",
            Flag {
                takes_value: true,
                ..Flag::switch("-c", "--config", "Read settings from this file")
            },
        );

        Flags { flags }
    }

    /// The shell takes no positional arguments.
    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            let flag = self
                .flags
                .values_mut()
                .find(|flag| arg == flag.short || arg == flag.long);

            match flag {
                Some(flag) if flag.takes_value => match args.next() {
                    Some(value) => flag.value = Some(value.clone()),
                    None => {
                        return Err(ShellError::FlagError(format!(
                            "Flag {} requires a value",
                            arg
                        )))
                    }
                },
                Some(flag) => flag.value = Some("true".to_string()),
                None if arg.starts_with('-') => {
                    return Err(ShellError::FlagError(format!("Unknown flag {}", arg)))
                }
                None => return Err(ShellError::FlagError(TOO_MANY_ARGUMENTS.to_string())),
            }
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get_value(name).is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags.get(name).and_then(|f| f.value.as_ref())
    }

    pub fn print_help(&self) {
        println!("Usage: smallsh [OPTIONS]");
        println!("\nOptions:");
        for flag in self.flags.values() {
            println!("  {}, {:<15} {}", flag.short, flag.long, flag.description);
        }
    }
}
