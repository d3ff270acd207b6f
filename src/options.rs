//! Configuration for conversion and TOML output.
//!
//! - [`Options`]: main configuration struct
//! - [`FaultPolicy`]: what the converter does with nodes it cannot express
//!
//! ## Examples
//!
//! ```rust
//! use tomlutil::{from_str_with_options, FaultPolicy, Options};
//!
//! let options = Options::new().with_fault_policy(FaultPolicy::Strict);
//! let map = from_str_with_options("a = 1", &options).unwrap();
//! assert_eq!(map.len(), 1);
//! ```

/// How the converter treats internal contract violations: a node with no
/// value representation, or a key written twice into the same table.
///
/// Documents parsed by [`crate::from_str`] only produce these if the parser
/// hands over a node kind the converter does not know.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Log the node, skip it, and keep converting its siblings. The caller
    /// receives a tree without the offending branch.
    #[default]
    BestEffort,
    /// Stop and return the fault as an error.
    Strict,
}

/// Configuration options for conversion and TOML output.
///
/// # Examples
///
/// ```rust
/// use tomlutil::{FaultPolicy, Options};
///
/// let options = Options::new();
/// assert_eq!(options.fault_policy, FaultPolicy::BestEffort);
/// assert!(!options.pretty);
///
/// let options = Options::pretty().with_indent(2);
/// assert!(options.pretty);
/// ```
#[derive(Clone, Debug)]
pub struct Options {
    pub fault_policy: FaultPolicy,
    /// Write arrays one element per line.
    pub pretty: bool,
    /// Spaces before each element of a pretty array.
    pub indent: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            fault_policy: FaultPolicy::default(),
            pretty: false,
            indent: 4,
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for multi-line array output.
    #[must_use]
    pub fn pretty() -> Self {
        Options {
            pretty: true,
            ..Default::default()
        }
    }

    /// Options that fail on the first contract violation.
    #[must_use]
    pub fn strict() -> Self {
        Options {
            fault_policy: FaultPolicy::Strict,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}
