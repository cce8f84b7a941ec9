use std::error::Error as StdError;
use std::fmt;

/// Classification of an invocation failure.
///
/// Errors are never recovered locally; every kind is surfaced to the caller
/// as-is. `Process` failures are never retried: the library has no basis
/// for assuming a retry would help.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// No resolvable executable for the requested variant, or the resolved
    /// target could not be started. Remedy: set the environment variable or
    /// the in-process override.
    Configuration,
    /// The external tool ran and exited non-zero. Carries the exit code and
    /// both output streams verbatim for diagnostics.
    Process,
    /// The external tool exited zero but stdout was not valid JSON. A
    /// contract breach between this library and the tool, distinct from a
    /// reported failure.
    Decode,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    command: Option<Vec<String>>,
    exit_code: Option<i32>,
    stdout: Option<String>,
    stderr: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            command: None,
            exit_code: None,
            stdout: None,
            stderr: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The full command line that was (or would have been) invoked.
    pub fn command(&self) -> Option<&[String]> {
        self.command.as_deref()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    pub fn stderr(&self) -> Option<&str> {
        self.stderr.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<Vec<String>>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(code) = self.exit_code {
            write!(f, " (exit code: {code})")?;
        }
        if let Some(command) = &self.command {
            write!(f, " (command: {})", command.join(" "))?;
        }
        if let Some(stderr) = &self.stderr {
            if !stderr.is_empty() {
                write!(f, " (stderr: {stderr})")?;
            }
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}
