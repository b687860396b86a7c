use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use super::ProcessError;
use crate::parser::ParsedCommand;

const FILE_MODE: libc::c_uint = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Input,
    Output,
}

impl Stream {
    fn fd(self) -> libc::c_int {
        match self {
            Stream::Input => libc::STDIN_FILENO,
            Stream::Output => libc::STDOUT_FILENO,
        }
    }

    fn flags(self) -> libc::c_int {
        match self {
            Stream::Input => libc::O_RDONLY,
            Stream::Output => libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
        }
    }

    fn direction(self) -> &'static str {
        match self {
            Stream::Input => "input",
            Stream::Output => "output",
        }
    }

    fn dup_failed(self) -> &'static [u8] {
        match self {
            Stream::Input => b"input dup2() error\n",
            Stream::Output => b"output dup2() error\n",
        }
    }
}

/// A single file to open and move onto fd 0 or 1.
#[derive(Debug)]
pub struct Redirect {
    stream: Stream,
    path: CString,
    open_failed: Vec<u8>,
}

impl Redirect {
    fn new(stream: Stream, path: &Path) -> Result<Self, ProcessError> {
        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            ProcessError::InvalidArgument(format!("{} contains a NUL byte", path.display()))
        })?;
        let open_failed =
            format!("cannot open {} for {}\n", path.display(), stream.direction()).into_bytes();

        Ok(Self {
            stream,
            path: c_path,
            open_failed,
        })
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    pub fn path(&self) -> &CString {
        &self.path
    }

    pub fn failure_message(&self) -> &[u8] {
        &self.open_failed
    }

    /// Only calls async-signal-safe functions.
    fn apply(&self) -> Result<(), &[u8]> {
        // SAFETY: `path` is a valid NUL-terminated string owned by self.
        let fd = unsafe { libc::open(self.path.as_ptr(), self.stream.flags(), FILE_MODE) };
        if fd == -1 {
            return Err(&self.open_failed);
        }

        let target = self.stream.fd();
        if fd != target {
            // SAFETY: both descriptors are valid, fd was just opened.
            if unsafe { libc::dup2(fd, target) } == -1 {
                return Err(self.stream.dup_failed());
            }
            unsafe { libc::close(fd) };
        }
        Ok(())
    }
}

/// Everything the child needs to set up fds 0 and 1, built before forking.
#[derive(Debug, Default)]
pub struct RedirectPlan {
    input: Option<Redirect>,
    output: Option<Redirect>,
}

impl RedirectPlan {
    /// Background commands read from and write to the null device unless told
    /// otherwise; foreground commands keep the shell's streams.
    pub fn resolve(
        command: &ParsedCommand,
        background: bool,
        null_device: &Path,
    ) -> Result<Self, ProcessError> {
        let fallback = background.then_some(null_device);

        let input = command
            .input()
            .or(fallback)
            .map(|path| Redirect::new(Stream::Input, path))
            .transpose()?;
        let output = command
            .output()
            .or(fallback)
            .map(|path| Redirect::new(Stream::Output, path))
            .transpose()?;

        Ok(Self { input, output })
    }

    pub fn input(&self) -> Option<&Redirect> {
        self.input.as_ref()
    }

    pub fn output(&self) -> Option<&Redirect> {
        self.output.as_ref()
    }

    /// Input first, then output. On failure the message to report is returned.
    pub(crate) fn apply(&self) -> Result<(), &[u8]> {
        for redirect in [&self.input, &self.output].into_iter().flatten() {
            redirect.apply()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    const NULL: &str = "/dev/null";

    fn plan(line: &str, background: bool) -> RedirectPlan {
        let cmd = Parser::default().parse(line).unwrap();
        RedirectPlan::resolve(&cmd, background, Path::new(NULL)).unwrap()
    }

    #[test]
    fn test_foreground_without_redirects_touches_nothing() {
        let plan = plan("ls -l", false);
        assert!(plan.input().is_none());
        assert!(plan.output().is_none());
    }

    #[test]
    fn test_foreground_explicit_paths() {
        let plan = plan("sort < in.txt > out.txt", false);
        let input = plan.input().unwrap();
        let output = plan.output().unwrap();
        assert_eq!(input.stream(), Stream::Input);
        assert_eq!(input.path().to_str().unwrap(), "in.txt");
        assert_eq!(output.stream(), Stream::Output);
        assert_eq!(output.path().to_str().unwrap(), "out.txt");
    }

    #[test]
    fn test_background_defaults_to_null_device() {
        let plan = plan("sleep 5 &", true);
        assert_eq!(plan.input().unwrap().path().to_str().unwrap(), NULL);
        assert_eq!(plan.output().unwrap().path().to_str().unwrap(), NULL);
    }

    #[test]
    fn test_background_keeps_explicit_paths() {
        let plan = plan("sort < in.txt &", true);
        assert_eq!(plan.input().unwrap().path().to_str().unwrap(), "in.txt");
        assert_eq!(plan.output().unwrap().path().to_str().unwrap(), NULL);
    }

    #[test]
    fn test_failure_messages() {
        let plan = plan("cat < missing.txt > /root/nope.txt", false);
        assert_eq!(
            plan.input().unwrap().failure_message(),
            b"cannot open missing.txt for input\n"
        );
        assert_eq!(
            plan.output().unwrap().failure_message(),
            b"cannot open /root/nope.txt for output\n"
        );
    }

    #[test]
    fn test_nul_byte_is_rejected() {
        let mut cmd = Parser::default().parse("cat").unwrap();
        cmd.input = Some("bad\0name".into());
        let result = RedirectPlan::resolve(&cmd, false, Path::new(NULL));
        assert!(matches!(result, Err(ProcessError::InvalidArgument(_))));
    }
}
