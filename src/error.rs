//! Error types for TOML conversion.
//!
//! Errors fall into two tiers:
//!
//! - **Boundary errors** are reported to the caller: TOML syntax errors
//!   ([`ErrorKind::Parse`]) and values with no TOML representation
//!   ([`ErrorKind::Encode`]).
//! - **Contract violations** ([`ErrorKind::Contract`]) come from a document
//!   tree that breaks the converter's assumptions: a node kind it cannot
//!   express, or a key written twice into the same table. They are only
//!   returned under [`FaultPolicy::Strict`](crate::FaultPolicy::Strict);
//!   the default policy logs and skips them.
//!
//! ## Examples
//!
//! ```rust
//! use tomlutil::{from_str, ErrorKind};
//!
//! let err = from_str("key = ").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Parse);
//! assert!(err.to_string().contains("line 1"));
//! ```

use std::fmt;
use thiserror::Error;

/// Identifier of the error space every [`Error`] belongs to.
pub const ERROR_DOMAIN: &str = "tomlutil";

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed TOML input.
    Parse,
    /// A value that cannot be written as TOML.
    Encode,
    /// The document tree violated the converter's contract.
    Contract,
    /// Reading or writing failed.
    Io,
    /// Anything raised through serde's `custom` hooks.
    Custom,
}

impl ErrorKind {
    /// Stable numeric code for this kind within [`ERROR_DOMAIN`].
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            ErrorKind::Parse => 1,
            ErrorKind::Encode => 2,
            ErrorKind::Contract => 3,
            ErrorKind::Io => 4,
            ErrorKind::Custom => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse",
            ErrorKind::Encode => "encode",
            ErrorKind::Contract => "contract",
            ErrorKind::Io => "io",
            ErrorKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents all possible errors raised while parsing, converting, or
/// writing TOML.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// TOML syntax error with the offending line
    #[error("Parse error at line {line}, column {col}:\n{context}\n{msg}")]
    Parse {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// A value with no TOML representation
    #[error("Encode error: {0}")]
    Encode(String),

    /// `None` or `()` reached the encoder outside of a struct field
    #[error("Encode error: TOML has no representation for null")]
    UnsupportedNone,

    /// A document node the converter cannot express as a value
    #[error("Unsupported node at `{path}`: {node}")]
    UnsupportedNode { path: String, node: String },

    /// The same key was written twice into one table
    #[error("Duplicate key `{key}` at `{path}`")]
    DuplicateKey { path: String, key: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a parse error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tomlutil::Error;
    ///
    /// let err = Error::parse(3, 7, "expected `=`", "name \"x\"");
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn parse(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::Parse {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Builds a parse error from a `toml_edit` failure, resolving its byte
    /// span against `input` into a 1-based line and column.
    pub(crate) fn from_toml(input: &str, err: &toml_edit::TomlError) -> Self {
        let offset = err.span().map(|span| span.start).unwrap_or(0);
        let (line, col) = line_col(input, offset);
        let context = input.lines().nth(line - 1).unwrap_or_default();
        Error::parse(line, col, err.message().trim_end(), context)
    }

    /// Creates an encode error for values that TOML cannot represent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tomlutil::{Error, ErrorKind};
    ///
    /// let err = Error::encode("integer 18446744073709551615 is out of range");
    /// assert_eq!(err.kind(), ErrorKind::Encode);
    /// ```
    pub fn encode<T: fmt::Display>(msg: T) -> Self {
        Error::Encode(msg.to_string())
    }

    pub fn unsupported_node(path: &str, node: &str) -> Self {
        Error::UnsupportedNode {
            path: path.to_string(),
            node: node.to_string(),
        }
    }

    pub fn duplicate_key(path: &str, key: &str) -> Self {
        Error::DuplicateKey {
            path: path.to_string(),
            key: key.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Encode(_) | Error::UnsupportedNone => ErrorKind::Encode,
            Error::UnsupportedNode { .. } | Error::DuplicateKey { .. } => ErrorKind::Contract,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Shorthand for `self.kind().code()`.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.kind().code()
    }
}

fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(input.len());
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
