//! Structured failure reasons carried by [`Outcome::Failure`](crate::Outcome::Failure)
//!
//! Instead of a plain string error channel, failures are drawn from a small
//! closed set of variants. Each variant carries a structured payload (the
//! offending value, the violated condition, the transport detail) while the
//! `Display` implementation preserves a human-readable reason for terminal
//! callbacks and logs.
//!
//! # Examples
//!
//! ```
//! use confluence::Reason;
//!
//! let reason = Reason::Validation {
//!     value: "38".to_string(),
//!     condition: "multiple of 13".to_string(),
//! };
//! assert_eq!(reason.to_string(), "invalid value 38: expected multiple of 13");
//! ```

use std::fmt;

/// Why a computation failed.
///
/// This is the single error currency of the crate: every pipeline stage that
/// fails produces one of these, and every stage downstream forwards it
/// verbatim. Only `retry` ever reacts to a `Reason`, and its sole reaction is
/// to re-attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The payload could not be interpreted as the expected text encoding.
    Decode {
        /// Name of the expected encoding, e.g. `"UTF-8"`.
        encoding: &'static str,
    },
    /// An expected sub-structure was absent from the input.
    PatternNotFound {
        /// The pattern that produced no match.
        pattern: String,
    },
    /// A value failed a caller-supplied predicate.
    Validation {
        /// The offending value, rendered for diagnostics.
        value: String,
        /// The relation the value was expected to satisfy.
        condition: String,
    },
    /// The effect boundary could not complete its request, or the response
    /// fell outside the accepted range.
    Transport {
        /// Human-readable description of what went wrong on the wire.
        detail: String,
    },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Decode { encoding } => {
                write!(f, "payload is not valid {encoding}")
            }
            Reason::PatternNotFound { pattern } => {
                write!(f, "no match for pattern {pattern}")
            }
            Reason::Validation { value, condition } => {
                write!(f, "invalid value {value}: expected {condition}")
            }
            Reason::Transport { detail } => {
                write!(f, "transport failure: {detail}")
            }
        }
    }
}

impl std::error::Error for Reason {}
