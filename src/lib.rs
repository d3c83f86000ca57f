//! # Confluence
//!
//! > *Where independent streams meet, one result flows out*
//!
//! A Rust library for callback-driven future composition.
//!
//! ## Philosophy
//!
//! **Confluence** separates *describing* a computation from *running* it:
//! - [`Outcome`] is the synchronous half: a value or a structured failure
//!   reason, with short-circuiting `map`/`and_then`/`zip`.
//! - [`FutureResult`] is the asynchronous half: a deferred computation that,
//!   when run, hands a terminal callback exactly one `Outcome`. Pipelines are
//!   built by composition (`map`, `and_then`, `zip`, `retry`) and nothing
//!   executes until `run`.
//!
//! The effectful leaves — fetching bytes, decoding, validating — stay outside
//! the core behind the [`Fetch`] boundary and plain `T -> Outcome<U>`
//! functions; the combinators only ever see their shape.
//!
//! ## Quick Example
//!
//! ```rust
//! use confluence::compose::kleisli;
//! use confluence::steps::{multiple_of, to_utf8, word_count};
//! use confluence::testing::await_outcome;
//! use confluence::{FutureResult, Outcome};
//!
//! # tokio_test::block_on(async {
//! // Two independent "fetches" (canned here), each decoded and counted.
//! let left = FutureResult::pure(b"many words in this doc".to_vec())
//!     .map_outcome(kleisli(to_utf8, word_count));
//! let right = FutureResult::pure(b"three more words".to_vec())
//!     .map_outcome(kleisli(to_utf8, word_count));
//!
//! // Join deterministically, sum, validate, retry on failure.
//! let pipeline = left
//!     .zip(right)
//!     .map(|(a, b)| a + b)
//!     .map_outcome(multiple_of(4))
//!     .retry(2);
//!
//! assert_eq!(await_outcome(&pipeline).await, Outcome::Success(8));
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod compose;
pub mod fetch;
pub mod future;
pub mod outcome;
pub mod reason;
pub mod steps;
pub mod testing;

// Re-exports
pub use fetch::Fetch;
pub use future::{Callback, FutureResult};
pub use outcome::Outcome;
pub use reason::Reason;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::compose::{compose, kleisli};
    pub use crate::fetch::Fetch;
    pub use crate::future::{Callback, FutureResult};
    pub use crate::outcome::Outcome;
    pub use crate::reason::Reason;
}
