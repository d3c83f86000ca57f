//! Testing utilities and helpers
//!
//! This module provides the pieces tests need to exercise callback-driven
//! pipelines deterministically: assertion macros over [`Outcome`], an
//! in-memory [`Fetch`] implementation with canned pages and a hit counter,
//! a timer-backed future for race and sequencing tests, and a bridge from
//! the terminal callback to something awaitable.
//!
//! # Examples
//!
//! ```
//! use confluence::testing::{await_outcome, StaticFetch};
//! use confluence::fetch::Fetch;
//! use confluence::{assert_success, Outcome};
//!
//! # tokio_test::block_on(async {
//! let session = StaticFetch::new().page("http://x/a", "hello world");
//! let outcome = await_outcome(&session.fetch("http://x/a")).await;
//! assert_success!(outcome);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::channel::oneshot;

use crate::fetch::{classify, Fetch, Response};
use crate::future::FutureResult;
use crate::outcome::Outcome;

/// Assert that an outcome is a success.
///
/// Panics with the failure reason otherwise.
///
/// # Example
///
/// ```rust
/// use confluence::{assert_success, Outcome};
///
/// let outcome = Outcome::success(42);
/// assert_success!(outcome);
/// ```
#[macro_export]
macro_rules! assert_success {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Success(_) => {}
            $crate::Outcome::Failure(reason) => {
                panic!("Expected Success, got Failure: {reason}");
            }
        }
    };
}

/// Assert that an outcome is a failure.
///
/// Panics with the success value otherwise.
///
/// # Example
///
/// ```rust
/// use confluence::{assert_failure, Outcome, Reason};
///
/// let outcome = Outcome::<i32>::failure(Reason::Decode { encoding: "UTF-8" });
/// assert_failure!(outcome);
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Failure(_) => {}
            $crate::Outcome::Success(value) => {
                panic!("Expected Failure, got Success: {value:?}");
            }
        }
    };
}

/// Run a future and await its terminal callback.
///
/// Bridges the callback to a oneshot channel so tests can `.await` a run
/// without reaching for a synchronous accessor the library deliberately does
/// not offer.
///
/// # Panics
///
/// Panics if the future drops its callback without completing, which is a
/// contract violation worth failing a test over.
pub async fn await_outcome<T: Send + 'static>(future: &FutureResult<T>) -> Outcome<T> {
    let (tx, rx) = oneshot::channel();
    future.run(move |outcome| {
        let _ = tx.send(outcome);
    });
    rx.await
        .expect("future dropped its callback without completing")
}

/// A future that completes with `outcome` after `delay`.
///
/// The timer runs on its own task, so completions arrive asynchronously on a
/// runtime thread; exactly what race and sequencing tests need.
pub fn delayed<T>(outcome: Outcome<T>, delay: Duration) -> FutureResult<T>
where
    T: Clone + Send + Sync + 'static,
{
    FutureResult::new(move |done| {
        let outcome = outcome.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            done(outcome);
        });
    })
}

/// An in-memory [`Fetch`] with canned pages.
///
/// Each registered URL resolves to a successful page, a response with a
/// chosen status, or a transport error; unknown URLs fail with a transport
/// error. Every *run* of a returned future counts as a hit, so
/// [`hits`](StaticFetch::hits) reveals whether a retried pipeline truly
/// re-ran its fetches from scratch.
#[derive(Debug, Clone, Default)]
pub struct StaticFetch {
    pages: HashMap<String, Result<Response, String>>,
    hits: Arc<AtomicUsize>,
}

impl StaticFetch {
    /// Create an empty fetcher; every URL fails until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page served with status 200.
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Ok(Response {
                status: 200,
                body: body.as_bytes().to_vec(),
            }),
        );
        self
    }

    /// Register a page served with an explicit status code.
    pub fn status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Ok(Response {
                status,
                body: body.as_bytes().to_vec(),
            }),
        );
        self
    }

    /// Register a URL that fails at the transport level.
    pub fn broken(mut self, url: &str, detail: &str) -> Self {
        self.pages.insert(url.to_string(), Err(detail.to_string()));
        self
    }

    /// Number of fetch runs performed so far, across all clones.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Fetch for StaticFetch {
    fn fetch(&self, url: &str) -> FutureResult<Vec<u8>> {
        let result = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(format!("no route to {url}")));
        let hits = Arc::clone(&self.hits);
        FutureResult::new(move |done| {
            // Counted per run, not per construction: a retried pipeline that
            // re-runs this future registers a fresh hit each attempt.
            hits.fetch_add(1, Ordering::SeqCst);
            let outcome = classify(result.clone());
            tokio::spawn(async move {
                done(outcome);
            });
        })
    }
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl<T> Arbitrary for Outcome<T>
where
    T: Arbitrary + std::fmt::Debug,
{
    type Parameters = T::Parameters;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        use crate::reason::Reason;

        let reason = prop_oneof![
            Just(Reason::Decode { encoding: "UTF-8" }),
            any::<String>().prop_map(|detail| Reason::Transport { detail }),
            any::<String>().prop_map(|pattern| Reason::PatternNotFound { pattern }),
            (any::<String>(), any::<String>())
                .prop_map(|(value, condition)| Reason::Validation { value, condition }),
        ];
        prop_oneof![
            any_with::<T>(args).prop_map(Outcome::success),
            reason.prop_map(Outcome::<T>::failure),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reason::Reason;

    #[test]
    fn assert_success_macro_accepts_success() {
        assert_success!(Outcome::success(1));
    }

    #[test]
    #[should_panic(expected = "Expected Success, got Failure")]
    fn assert_success_macro_panics_on_failure() {
        assert_success!(Outcome::<i32>::failure(Reason::Decode {
            encoding: "UTF-8"
        }));
    }

    #[test]
    fn assert_failure_macro_accepts_failure() {
        assert_failure!(Outcome::<i32>::failure(Reason::Decode {
            encoding: "UTF-8"
        }));
    }

    #[test]
    #[should_panic(expected = "Expected Failure, got Success")]
    fn assert_failure_macro_panics_on_success() {
        assert_failure!(Outcome::success(1));
    }

    #[tokio::test]
    async fn static_fetch_serves_registered_pages() {
        let session = StaticFetch::new().page("http://x/a", "hello");
        let outcome = await_outcome(&session.fetch("http://x/a")).await;
        assert_eq!(outcome, Outcome::Success(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn static_fetch_fails_unknown_urls() {
        let session = StaticFetch::new();
        let outcome = await_outcome(&session.fetch("http://nowhere")).await;
        assert_failure!(outcome);
    }

    #[tokio::test]
    async fn static_fetch_counts_runs_not_constructions() {
        let session = StaticFetch::new().page("http://x/a", "hi");
        let future = session.fetch("http://x/a");
        assert_eq!(session.hits(), 0);
        let _ = await_outcome(&future).await;
        let _ = await_outcome(&future).await;
        assert_eq!(session.hits(), 2);
    }

    #[tokio::test]
    async fn delayed_resolves_after_its_timer() {
        let future = delayed(Outcome::success(9), Duration::from_millis(5));
        let started = std::time::Instant::now();
        let outcome = await_outcome(&future).await;
        assert_eq!(outcome, Outcome::Success(9));
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}
