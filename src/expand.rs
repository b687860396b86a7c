/// The only variable the shell knows about.
pub const PID_PLACEHOLDER: &str = "$$";

/// Replaces `$$` with the shell's own process id.
#[derive(Debug, Clone)]
pub struct PidExpander {
    pid: String,
}

impl Default for PidExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl PidExpander {
    pub fn new() -> Self {
        Self::with_pid(std::process::id())
    }

    pub fn with_pid(pid: u32) -> Self {
        Self {
            pid: pid.to_string(),
        }
    }

    /// Left to right, non-overlapping. Substituted text is never scanned again.
    pub fn expand(&self, line: &str) -> String {
        let mut expanded = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(pos) = rest.find(PID_PLACEHOLDER) {
            expanded.push_str(&rest[..pos]);
            expanded.push_str(&self.pid);
            rest = &rest[pos + PID_PLACEHOLDER.len()..];
        }
        expanded.push_str(rest);

        expanded
    }
}
