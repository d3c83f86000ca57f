//! The effect boundary: asynchronous byte fetching
//!
//! The combinator core never performs network I/O itself. It consumes a
//! [`Fetch`] collaborator — "give me the bytes behind this URL, eventually" —
//! and only ever observes an [`Outcome<Vec<u8>>`](crate::Outcome). Transport
//! details are classified into a single outcome *inside* the collaborator via
//! [`classify`]: a transport-level error, an out-of-range status, or a
//! successful (possibly empty) payload.
//!
//! A production implementation would wrap an HTTP client here; tests use
//! [`StaticFetch`](crate::testing::StaticFetch).

use std::fmt;
use std::ops::Range;

use crate::future::FutureResult;
use crate::outcome::Outcome;
use crate::reason::Reason;

/// Status codes accepted by [`classify`]: inclusive lower bound, exclusive
/// upper bound.
pub const ACCEPTED_STATUS: Range<u16> = 200..400;

/// An external fetch capability consumed by pipelines.
///
/// Implementations resolve a URL to its payload bytes, classifying every
/// transport detail into the returned future's outcome. Callers must be able
/// to re-run the returned future (retry does), so each run performs the fetch
/// from scratch.
pub trait Fetch: Send + Sync {
    /// Fetch the payload behind `url`.
    fn fetch(&self, url: &str) -> FutureResult<Vec<u8>>;
}

/// A raw response as seen at the effect boundary, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Protocol status code.
    pub status: u16,
    /// Payload bytes; may be empty.
    pub body: Vec<u8>,
}

/// Classify a raw fetch result into exactly one [`Outcome`].
///
/// - A transport-level error (no response obtained) becomes
///   [`Reason::Transport`] with the error's description.
/// - A response with a status outside [`ACCEPTED_STATUS`] becomes
///   [`Reason::Transport`] naming the status.
/// - Anything else is a success carrying the payload, even when empty.
///
/// # Examples
///
/// ```
/// use confluence::fetch::{classify, Response};
/// use confluence::Outcome;
///
/// let ok = classify::<&str>(Ok(Response { status: 200, body: b"hi".to_vec() }));
/// assert_eq!(ok, Outcome::Success(b"hi".to_vec()));
///
/// let missing = classify::<&str>(Ok(Response { status: 404, body: Vec::new() }));
/// assert!(missing.is_failure());
///
/// let refused = classify(Err("connection refused"));
/// assert!(refused.is_failure());
/// ```
pub fn classify<E: fmt::Display>(result: Result<Response, E>) -> Outcome<Vec<u8>> {
    match result {
        Err(error) => Outcome::Failure(Reason::Transport {
            detail: error.to_string(),
        }),
        Ok(response) if !ACCEPTED_STATUS.contains(&response.status) => {
            Outcome::Failure(Reason::Transport {
                detail: format!(
                    "status {} outside accepted range {}..{}",
                    response.status, ACCEPTED_STATUS.start, ACCEPTED_STATUS.end
                ),
            })
        }
        Ok(response) => Outcome::Success(response.body),
    }
}
