//! Outcome type for synchronous fallible computations
//!
//! This module provides the `Outcome` type, a two-variant result that either
//! succeeds with a value or fails with a [`Reason`]. Unlike an
//! error-accumulating validation type, `Outcome` short-circuits: combining two
//! outcomes with [`Outcome::zip`] reports the *first* failure in a fixed
//! left-to-right precedence rather than collecting both.
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```
//! use confluence::{Outcome, Reason};
//!
//! let success = Outcome::success(42);
//! let failure = Outcome::<i32>::failure(Reason::Transport {
//!     detail: "connection refused".to_string(),
//! });
//!
//! assert!(success.is_success());
//! assert!(failure.is_failure());
//! ```
//!
//! ## Short-circuiting transforms
//!
//! ```
//! use confluence::{Outcome, Reason};
//!
//! let doubled = Outcome::success(21).map(|x| x * 2);
//! assert_eq!(doubled, Outcome::Success(42));
//!
//! // Failures pass through untouched; the function is never invoked.
//! let failure = Outcome::<i32>::failure(Reason::Decode { encoding: "UTF-8" });
//! assert_eq!(
//!     failure.map(|x| x * 2),
//!     Outcome::Failure(Reason::Decode { encoding: "UTF-8" }),
//! );
//! ```
//!
//! ## Joining independent outcomes
//!
//! ```
//! use confluence::Outcome;
//!
//! let joined = Outcome::success(1).zip(Outcome::success("one"));
//! assert_eq!(joined, Outcome::Success((1, "one")));
//! ```

use crate::reason::Reason;

/// A computation result that either succeeded with a value or failed with a
/// [`Reason`].
///
/// Exactly one variant is active; the value is immutable once constructed.
/// All combinators short-circuit: once an outcome is a failure, no downstream
/// function sees it except as an opaque reason to forward.
///
/// # Examples
///
/// ```
/// use confluence::{Outcome, Reason};
///
/// let outcome = Outcome::success(5)
///     .map(|x| x * 2)
///     .and_then(|x| {
///         if x < 100 {
///             Outcome::success(x)
///         } else {
///             Outcome::failure(Reason::Validation {
///                 value: x.to_string(),
///                 condition: "less than 100".to_string(),
///             })
///         }
///     });
/// assert_eq!(outcome, Outcome::Success(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The computation produced a value.
    Success(T),
    /// The computation failed with a reason.
    Failure(Reason),
}

impl<T> Outcome<T> {
    /// Create a successful outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::Outcome;
    ///
    /// let outcome = Outcome::success(42);
    /// assert!(outcome.is_success());
    /// ```
    #[inline]
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    /// Create a failed outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{Outcome, Reason};
    ///
    /// let outcome = Outcome::<i32>::failure(Reason::Decode { encoding: "UTF-8" });
    /// assert!(outcome.is_failure());
    /// ```
    #[inline]
    pub fn failure(reason: Reason) -> Self {
        Outcome::Failure(reason)
    }

    /// Create an outcome from a `Result` carrying a [`Reason`] error.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::Outcome;
    ///
    /// let outcome = Outcome::from_result(Ok(42));
    /// assert_eq!(outcome, Outcome::Success(42));
    /// ```
    #[inline]
    pub fn from_result(result: Result<T, Reason>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(reason) => Outcome::Failure(reason),
        }
    }

    /// Convert this outcome into a `Result`.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{Outcome, Reason};
    ///
    /// let outcome = Outcome::success(42);
    /// assert_eq!(outcome.into_result(), Ok(42));
    /// ```
    #[inline]
    pub fn into_result(self) -> Result<T, Reason> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(reason) => Err(reason),
        }
    }

    /// Check whether this outcome is a success.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Check whether this outcome is a failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Transform the success value, leaving failures untouched.
    ///
    /// The function is never invoked on a failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::Outcome;
    ///
    /// assert_eq!(Outcome::success(5).map(|x| x * 2), Outcome::Success(10));
    /// ```
    #[inline]
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(reason) => Outcome::Failure(reason),
        }
    }

    /// Chain a fallible transform, leaving failures untouched.
    ///
    /// On success the function decides the combined outcome; on failure the
    /// original reason is forwarded and the function is never invoked.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{Outcome, Reason};
    ///
    /// let checked = Outcome::success(10).and_then(|x| {
    ///     if x % 2 == 0 {
    ///         Outcome::success(x)
    ///     } else {
    ///         Outcome::failure(Reason::Validation {
    ///             value: x.to_string(),
    ///             condition: "even".to_string(),
    ///         })
    ///     }
    /// });
    /// assert_eq!(checked, Outcome::Success(10));
    /// ```
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure(reason) => Outcome::Failure(reason),
        }
    }

    /// Join two independent outcomes into a tuple.
    ///
    /// If either operand failed, the first failure in left-to-right order
    /// wins. This is a deterministic tie-break, not an accumulation: when both
    /// operands failed, only `self`'s reason is reported.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{Outcome, Reason};
    ///
    /// let left = Reason::Decode { encoding: "UTF-8" };
    /// let right = Reason::Transport { detail: "timeout".to_string() };
    ///
    /// let joined = Outcome::<i32>::failure(left.clone())
    ///     .zip(Outcome::<i32>::failure(right));
    /// assert_eq!(joined, Outcome::Failure(left));
    /// ```
    #[inline]
    pub fn zip<U>(self, other: Outcome<U>) -> Outcome<(T, U)> {
        match (self, other) {
            (Outcome::Failure(reason), _) => Outcome::Failure(reason),
            (_, Outcome::Failure(reason)) => Outcome::Failure(reason),
            (Outcome::Success(a), Outcome::Success(b)) => Outcome::Success((a, b)),
        }
    }
}
