//! Purpose: Encode heterogeneous caller values into CLI argument tokens.
//! Exports: `quote`, `encode_mapping`, and the `CommandLine` token builder.
//! Role: Single seam between typed API calls and the external tool's grammar.
//! Invariants: Tokens keep caller order; nothing is silently dropped.
//! Invariants: Absent optional values emit no tokens; empty strings are a
//! valid payload and emit a quoted empty token.

use std::fmt::Display;

use serde_json::{Map, Value};

/// Wrap a scalar value in double quotes.
///
/// Pre-existing leading/trailing quote or space characters are stripped
/// first, so a value is never double-quoted: `quote(quote(x))` has the same
/// visible content as `quote(x)`. Non-string scalars are accepted through
/// their canonical `Display` form.
pub fn quote(value: impl Display) -> String {
    let text = value.to_string();
    format!("\"{}\"", text.trim_matches(|c| c == ' ' || c == '"'))
}

/// Serialize a string-keyed mapping to a compact JSON token.
///
/// Used for bulk update payloads. All entries are preserved and key order is
/// stable (insertion order) so encoded payloads are reproducible.
pub fn encode_mapping(map: &Map<String, Value>) -> String {
    Value::Object(map.clone()).to_string()
}

/// Ordered sequence of tokens to pass to the external process.
#[derive(Clone, Debug, Default)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw token as-is.
    pub fn push(mut self, token: impl Into<String>) -> Self {
        self.tokens.push(token.into());
        self
    }

    /// Append the quoted form of a scalar value.
    pub fn push_quoted(mut self, value: impl Display) -> Self {
        self.tokens.push(quote(value));
        self
    }

    /// Append a bare `--name` flag when `condition` holds.
    pub fn flag(mut self, name: &str, condition: bool) -> Self {
        if condition {
            self.tokens.push(format!("--{name}"));
        }
        self
    }

    /// Append `--name` plus the quoted value when a value is present.
    ///
    /// An absent value contributes zero tokens. `Some("")` is a valid
    /// payload and contributes a quoted empty token.
    pub fn option<T: Display>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.option_if(name, value, true),
            None => self,
        }
    }

    /// Append `--name` plus the quoted value only when `condition` holds.
    pub fn option_if(mut self, name: &str, value: impl Display, condition: bool) -> Self {
        if condition {
            self.tokens.push(format!("--{name}"));
            self.tokens.push(quote(value));
        }
        self
    }

    /// Append one repeated-group run: a `--marker` flag followed by a fixed
    /// number of quoted fields.
    ///
    /// Absent optional fields still occupy their slot as a quoted empty
    /// string so field alignment is preserved for the receiving parser.
    pub fn group(mut self, marker: &str, fields: &[Option<&str>]) -> Self {
        self.tokens.push(format!("--{marker}"));
        for field in fields {
            self.tokens.push(quote(field.unwrap_or("")));
        }
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}
