//! Purpose: Resolve the external das element CLI and run encoded commands.
//! Exports: `Variant`, `Toolchain`, and the environment variable names.
//! Role: The single execution choke point; every operation passes through
//! `Toolchain::invoke`.
//! Invariants: Executable references are re-read and re-resolved on every
//! invocation, so configuration changes take effect immediately.
//! Invariants: The child is never started through a shell; tokens reach the
//! process verbatim as its argument vector.
//! Invariants: No timeout is imposed; a hung external process blocks the
//! calling thread for its lifetime.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::encode::CommandLine;
use crate::core::error::{Error, ErrorKind};

/// Environment variable naming the standard CLI build.
pub const STANDARD_CLI_ENV: &str = "DASELEMENT_CLI";
/// Environment variable naming the full-featured CLI build.
pub const FULL_CLI_ENV: &str = "DASELEMENT_CLI_FULL";

/// Which external executable build to run.
///
/// The standard build covers database reads and writes; the full build adds
/// the transcoding and prediction capable operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Variant {
    Standard,
    Full,
}

impl Variant {
    pub fn env_var(self) -> &'static str {
        match self {
            Variant::Standard => STANDARD_CLI_ENV,
            Variant::Full => FULL_CLI_ENV,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Full => "full",
        }
    }
}

/// Configured executable references for both CLI variants.
///
/// Overrides set here win; otherwise the per-variant environment variable is
/// consulted. Both are read fresh on every invocation, never cached.
#[derive(Clone, Debug, Default)]
pub struct Toolchain {
    standard: Option<String>,
    full: Option<String>,
}

impl Toolchain {
    /// A toolchain that resolves purely from the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the standard CLI reference (path or command name).
    pub fn with_standard(mut self, reference: impl Into<String>) -> Self {
        self.standard = Some(reference.into());
        self
    }

    /// Override the full-featured CLI reference (path or command name).
    pub fn with_full(mut self, reference: impl Into<String>) -> Self {
        self.full = Some(reference.into());
        self
    }

    fn reference(&self, variant: Variant) -> Option<String> {
        let configured = match variant {
            Variant::Standard => self.standard.clone(),
            Variant::Full => self.full.clone(),
        };
        configured
            .or_else(|| env::var(variant.env_var()).ok())
            .filter(|reference| !reference.trim().is_empty())
    }

    /// Determine the runnable path for a variant without spawning anything.
    pub fn resolve(&self, variant: Variant) -> Result<PathBuf, Error> {
        let reference = self.reference(variant).ok_or_else(|| {
            Error::new(ErrorKind::Configuration).with_message(format!(
                "no {} CLI executable configured; set {} or the in-process override",
                variant.describe(),
                variant.env_var()
            ))
        })?;
        resolve_reference(&reference).ok_or_else(|| {
            Error::new(ErrorKind::Configuration).with_message(format!(
                "{} CLI reference '{}' does not resolve to a runnable executable",
                variant.describe(),
                reference
            ))
        })
    }

    /// Run one encoded command against the selected variant and decode its
    /// stdout as a single JSON document.
    ///
    /// Blocks until the child exits; stdout and stderr are fully captured.
    pub fn invoke(&self, variant: Variant, command: CommandLine) -> Result<Value, Error> {
        let executable = self.resolve(variant)?;
        let tokens = command.into_tokens();
        let mut invoked: Vec<String> = Vec::with_capacity(tokens.len() + 1);
        invoked.push(executable.display().to_string());
        invoked.extend(tokens.iter().cloned());

        debug!(
            executable = %executable.display(),
            arguments = ?tokens,
            "invoking das element CLI"
        );

        let output = Command::new(&executable)
            .args(&tokens)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| {
                Error::new(ErrorKind::Configuration)
                    .with_message(format!(
                        "failed to start {} CLI executable",
                        variant.describe()
                    ))
                    .with_command(invoked.clone())
                    .with_source(err)
            })?;

        let stdout = decode_stream(&output.stdout);
        let stderr = decode_stream(&output.stderr);

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, stderr = %stderr, "das element CLI reported a failure");
            return Err(Error::new(ErrorKind::Process)
                .with_message("das element CLI exited with a failure status")
                .with_exit_code(exit_code)
                .with_stdout(stdout)
                .with_stderr(stderr)
                .with_command(invoked));
        }

        debug!(bytes = stdout.len(), "das element CLI finished");

        serde_json::from_str(&stdout).map_err(|err| {
            Error::new(ErrorKind::Decode)
                .with_message("das element CLI produced output that is not valid JSON")
                .with_stdout(stdout)
                .with_command(invoked)
                .with_source(err)
        })
    }
}

/// Interpret a captured stream as UTF-8 and trim one trailing newline.
/// Invalid byte sequences are dropped, never substituted and never fatal.
fn decode_stream(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                if let Ok(prefix) = std::str::from_utf8(valid) {
                    text.push_str(prefix);
                }
                match err.error_len() {
                    Some(skip) => rest = &after[skip..],
                    // Truncated sequence at the end of the stream.
                    None => break,
                }
            }
        }
    }
    if text.ends_with('\n') {
        text.pop();
    }
    if text.ends_with('\r') {
        text.pop();
    }
    text
}

/// Turn a configured reference into a runnable path, or nothing.
///
/// Wrapping quotes and whitespace are stripped and `~` / `$VAR` placeholders
/// expanded before the lookup. A reference naming an existing file wins;
/// a bare command name falls back to a PATH search.
fn resolve_reference(reference: &str) -> Option<PathBuf> {
    let cleaned = reference.trim().trim_matches('"').trim();
    if cleaned.is_empty() {
        return None;
    }
    let expanded = expand_placeholders(cleaned);
    let literal = Path::new(&expanded);
    if literal.is_file() {
        return Some(literal.to_path_buf());
    }
    if expanded.contains(['/', '\\']) {
        return None;
    }
    search_dirs(&expanded, env::split_paths(&env::var_os("PATH")?))
}

fn search_dirs(name: &str, dirs: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !env::consts::EXE_EXTENSION.is_empty() {
            let candidate = candidate.with_extension(env::consts::EXE_EXTENSION);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Expand a leading `~` and `$VAR` / `${VAR}` placeholders.
///
/// Unset variables are left as-is, matching the behavior callers expect from
/// shell-adjacent configuration values.
fn expand_placeholders(input: &str) -> String {
    let mut text = input.to_string();
    if let Some(rest) = text.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') {
            if let Some(home) = home_dir() {
                text = format!("{home}{rest}");
            }
        }
    }

    if !text.contains('$') {
        return text;
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some((_, '{')) => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    name.push(inner);
                }
                match env::var(&name) {
                    Ok(value) if closed => out.push_str(&value),
                    _ => {
                        out.push_str("${");
                        out.push_str(&name);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            Some((_, next)) if next.is_ascii_alphanumeric() || *next == '_' => {
                let mut name = String::new();
                while let Some((_, inner)) = chars.peek() {
                    if inner.is_ascii_alphanumeric() || *inner == '_' {
                        name.push(*inner);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match env::var(&name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push('$');
                        out.push_str(&name);
                    }
                }
            }
            _ => out.push('$'),
        }
    }
    out
}

fn home_dir() -> Option<String> {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .ok()
        .filter(|home| !home.is_empty())
}
