//! Callback-driven one-shot futures
//!
//! This module provides [`FutureResult`], a deferred asynchronous computation:
//! "run me, and when I am done I will hand your callback exactly one
//! [`Outcome`]". A `FutureResult` holds no value, only the wrapped action;
//! nothing executes until [`FutureResult::run`] is called with a terminal
//! callback, and every run re-executes the action from scratch.
//!
//! # Design
//!
//! Each combinator is a distinct variant implementing the internal run
//! interface, owning its upstream future explicitly rather than capturing
//! ambient state. Most combinators (`map`, `map_outcome`, `and_then`) add no
//! concurrency of their own: they execute on whatever context invokes the
//! upstream callback. [`FutureResult::zip`] is the one place true parallelism
//! happens, and [`FutureResult::retry`] dispatches its attempt loop as an
//! independent task; both therefore need to run inside a Tokio runtime.
//!
//! # Callback contract
//!
//! Each run invokes the supplied callback exactly once, with either variant.
//! The callback is a [`Callback`], a boxed `FnOnce`, so invoking it twice is
//! unrepresentable; actions passed to [`FutureResult::new`] are trusted to
//! invoke theirs exactly once in return.
//!
//! # Examples
//!
//! ```
//! use confluence::{FutureResult, Outcome};
//! use confluence::testing::await_outcome;
//!
//! # tokio_test::block_on(async {
//! let pipeline = FutureResult::pure(5)
//!     .map(|x| x * 2)
//!     .and_then(|x| FutureResult::pure(x + 32));
//!
//! assert_eq!(await_outcome(&pipeline).await, Outcome::Success(42));
//! # });
//! ```

mod join;
mod retry;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use crate::outcome::Outcome;
use crate::reason::Reason;

use self::join::Join;
use self::retry::Retry;

/// A single-use completion sink for an [`Outcome`].
///
/// Each run of a [`FutureResult`] receives one of these and must invoke it
/// exactly once. Being `FnOnce`, a callback cannot be invoked twice.
pub type Callback<T> = Box<dyn FnOnce(Outcome<T>) + Send>;

/// The one operation every future variant implements: run once, eventually
/// hand exactly one outcome to the sink. Variants own their upstream future
/// so composition never relies on captured ambient state.
pub(crate) trait RunFuture<T>: Send + Sync {
    fn run(&self, done: Callback<T>);
}

/// A deferred, callback-driven asynchronous computation.
///
/// `FutureResult<T>` wraps a single action: "given a completion callback,
/// eventually invoke it exactly once with an [`Outcome<T>`]". Combinators
/// return a *new* `FutureResult` wrapping the composition without running
/// anything; work only starts when [`run`](FutureResult::run) is called.
///
/// Cloning is cheap (the wrapped action is shared and immutable) and exists
/// so `zip` and `retry` can resubmit the same computation; no state is ever
/// cached between runs.
///
/// # Examples
///
/// ```
/// use confluence::{FutureResult, Outcome};
/// use confluence::testing::await_outcome;
///
/// # tokio_test::block_on(async {
/// // Wrap a concrete async action.
/// let answer = FutureResult::new(|done| {
///     tokio::spawn(async move { done(Outcome::Success(42)) });
/// });
/// assert_eq!(await_outcome(&answer).await, Outcome::Success(42));
/// # });
/// ```
pub struct FutureResult<T> {
    action: Arc<dyn RunFuture<T>>,
}

impl<T> Clone for FutureResult<T> {
    fn clone(&self) -> Self {
        FutureResult {
            action: Arc::clone(&self.action),
        }
    }
}

// The wrapped action is opaque; there is nothing more useful to show.
impl<T> fmt::Debug for FutureResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureResult")
            .field("action", &"<deferred>")
            .finish()
    }
}

impl<T> FutureResult<T>
where
    T: Send + 'static,
{
    /// Wrap a concrete asynchronous action.
    ///
    /// The action receives the completion callback and must invoke it exactly
    /// once, on whatever execution context it finishes on. The action may be
    /// invoked again for every subsequent [`run`](FutureResult::run) (and for
    /// every `retry` attempt), each time from scratch.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{FutureResult, Outcome};
    /// use confluence::testing::await_outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let ticks = FutureResult::new(|done| {
    ///     tokio::spawn(async move {
    ///         tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    ///         done(Outcome::Success("tick"));
    ///     });
    /// });
    /// assert_eq!(await_outcome(&ticks).await, Outcome::Success("tick"));
    /// # });
    /// ```
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(Callback<T>) + Send + Sync + 'static,
    {
        FutureResult {
            action: Arc::new(FromFn { action }),
        }
    }

    /// A future that immediately succeeds with `value` on every run.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{FutureResult, Outcome};
    /// use confluence::testing::await_outcome;
    ///
    /// # tokio_test::block_on(async {
    /// assert_eq!(await_outcome(&FutureResult::pure(7)).await, Outcome::Success(7));
    /// # });
    /// ```
    pub fn pure(value: T) -> Self
    where
        T: Clone + Sync,
    {
        FutureResult {
            action: Arc::new(Pure { value }),
        }
    }

    /// A future that immediately fails with `reason` on every run.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{FutureResult, Outcome, Reason};
    /// use confluence::testing::await_outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let broken = FutureResult::<i32>::fail(Reason::Decode { encoding: "UTF-8" });
    /// assert_eq!(
    ///     await_outcome(&broken).await,
    ///     Outcome::Failure(Reason::Decode { encoding: "UTF-8" }),
    /// );
    /// # });
    /// ```
    pub fn fail(reason: Reason) -> Self {
        FutureResult {
            action: Arc::new(Fail { reason }),
        }
    }

    /// Lift an already-computed [`Outcome`] into a future.
    pub fn from_outcome(outcome: Outcome<T>) -> Self
    where
        T: Clone + Sync,
    {
        FutureResult {
            action: Arc::new(FromOutcome { outcome }),
        }
    }

    /// Run the wrapped action, delivering the eventual outcome to `done`.
    ///
    /// Returns immediately after scheduling work; the outcome arrives later
    /// via the callback, possibly on a different execution context. There is
    /// deliberately no synchronous accessor: the callback is the only way to
    /// observe a result, which structurally rules out blocking reads.
    pub fn run<F>(&self, done: F)
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        self.action.run(Box::new(done));
    }

    pub(crate) fn run_boxed(&self, done: Callback<T>) {
        self.action.run(done);
    }

    /// Transform the eventual success value.
    ///
    /// The new future runs `self` and applies [`Outcome::map`] to whatever
    /// arrives: failures are forwarded untouched and `f` is never invoked for
    /// them.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{FutureResult, Outcome};
    /// use confluence::testing::await_outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let doubled = FutureResult::pure(21).map(|x| x * 2);
    /// assert_eq!(await_outcome(&doubled).await, Outcome::Success(42));
    /// # });
    /// ```
    pub fn map<U, F>(self, f: F) -> FutureResult<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        FutureResult {
            action: Arc::new(Map {
                inner: self,
                f: Arc::new(f),
            }),
        }
    }

    /// Splice a synchronous fallible step into the pipeline.
    ///
    /// Like [`map`](FutureResult::map), but `f` itself may fail: the received
    /// outcome is combined with [`Outcome::and_then`], so a validating step
    /// can sit inside an asynchronous chain without a full
    /// [`and_then`](FutureResult::and_then) at the use site.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{FutureResult, Outcome, Reason};
    /// use confluence::testing::await_outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let checked = FutureResult::pure(9).map_outcome(|x| {
    ///     if x % 2 == 0 {
    ///         Outcome::success(x)
    ///     } else {
    ///         Outcome::failure(Reason::Validation {
    ///             value: x.to_string(),
    ///             condition: "even".to_string(),
    ///         })
    ///     }
    /// });
    /// assert!(await_outcome(&checked).await.is_failure());
    /// # });
    /// ```
    pub fn map_outcome<U, F>(self, f: F) -> FutureResult<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Outcome<U> + Send + Sync + 'static,
    {
        FutureResult {
            action: Arc::new(MapOutcome {
                inner: self,
                f: Arc::new(f),
            }),
        }
    }

    /// Sequence a dependent asynchronous step.
    ///
    /// The new future runs `self`; on success it invokes `f` to obtain the
    /// next future and runs *that*, forwarding its eventual outcome. On
    /// failure the reason is forwarded immediately and `f` is never invoked.
    /// The second future's action is guaranteed not to start before the
    /// first's callback has fired.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{FutureResult, Outcome};
    /// use confluence::testing::await_outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let chained = FutureResult::pure(40).and_then(|x| FutureResult::pure(x + 2));
    /// assert_eq!(await_outcome(&chained).await, Outcome::Success(42));
    /// # });
    /// ```
    pub fn and_then<U, F>(self, f: F) -> FutureResult<U>
    where
        U: Send + 'static,
        F: Fn(T) -> FutureResult<U> + Send + Sync + 'static,
    {
        FutureResult {
            action: Arc::new(AndThen {
                inner: self,
                f: Arc::new(f),
            }),
        }
    }

    /// Join this future with an independent one, running both concurrently.
    ///
    /// Both sides are started as separate tasks; their completions may arrive
    /// on different execution contexts, in either order, or simultaneously.
    /// The joined callback fires exactly once, only after *both* sides have
    /// completed, with [`Outcome::zip`] precedence: if both fail, `self`'s
    /// reason wins. A failed side never cancels its sibling; the join waits
    /// for the pending side before reporting.
    ///
    /// Must be run from within a Tokio runtime.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{FutureResult, Outcome};
    /// use confluence::testing::await_outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let joined = FutureResult::pure(1).zip(FutureResult::pure("one"));
    /// assert_eq!(await_outcome(&joined).await, Outcome::Success((1, "one")));
    /// # });
    /// ```
    pub fn zip<U>(self, other: FutureResult<U>) -> FutureResult<(T, U)>
    where
        U: Send + 'static,
    {
        FutureResult {
            action: Arc::new(Join::new(self, other)),
        }
    }

    /// Resubmit this computation on failure, up to `up_to` extra attempts.
    ///
    /// Each attempt re-runs the whole wrapped computation from scratch;
    /// nothing is cached between attempts. Success forwards immediately.
    /// Every intermediate failure is logged as a non-fatal diagnostic; once
    /// the budget is exhausted the final failure is forwarded. The terminal
    /// callback fires exactly once either way, after at most `up_to + 1`
    /// total attempts.
    ///
    /// The attempt loop runs as its own scheduled task and awaits each
    /// completion through a channel, so the stack footprint stays constant
    /// no matter how many attempts are made. Must be run from within a Tokio
    /// runtime.
    ///
    /// # Examples
    ///
    /// ```
    /// use confluence::{FutureResult, Outcome, Reason};
    /// use confluence::testing::await_outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let stubborn = FutureResult::<i32>::fail(Reason::Transport {
    ///     detail: "refused".to_string(),
    /// })
    /// .retry(2);
    ///
    /// // Three attempts in total, then the failure is surfaced once.
    /// assert!(await_outcome(&stubborn).await.is_failure());
    /// # });
    /// ```
    pub fn retry(self, up_to: usize) -> FutureResult<T> {
        FutureResult {
            action: Arc::new(Retry::new(self, up_to)),
        }
    }
}

struct FromFn<F> {
    action: F,
}

impl<T, F> RunFuture<T> for FromFn<F>
where
    T: Send + 'static,
    F: Fn(Callback<T>) + Send + Sync + 'static,
{
    fn run(&self, done: Callback<T>) {
        (self.action)(done);
    }
}

struct Pure<T> {
    value: T,
}

impl<T> RunFuture<T> for Pure<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn run(&self, done: Callback<T>) {
        done(Outcome::Success(self.value.clone()));
    }
}

struct Fail {
    reason: Reason,
}

impl<T> RunFuture<T> for Fail
where
    T: Send + 'static,
{
    fn run(&self, done: Callback<T>) {
        done(Outcome::Failure(self.reason.clone()));
    }
}

struct FromOutcome<T> {
    outcome: Outcome<T>,
}

impl<T> RunFuture<T> for FromOutcome<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn run(&self, done: Callback<T>) {
        done(self.outcome.clone());
    }
}

struct Map<T, F> {
    inner: FutureResult<T>,
    f: Arc<F>,
}

impl<T, U, F> RunFuture<U> for Map<T, F>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    fn run(&self, done: Callback<U>) {
        let f = Arc::clone(&self.f);
        self.inner
            .run_boxed(Box::new(move |outcome| done(outcome.map(|value| (*f)(value)))));
    }
}

struct MapOutcome<T, F> {
    inner: FutureResult<T>,
    f: Arc<F>,
}

impl<T, U, F> RunFuture<U> for MapOutcome<T, F>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Outcome<U> + Send + Sync + 'static,
{
    fn run(&self, done: Callback<U>) {
        let f = Arc::clone(&self.f);
        self.inner.run_boxed(Box::new(move |outcome| {
            done(outcome.and_then(|value| (*f)(value)))
        }));
    }
}

struct AndThen<T, F> {
    inner: FutureResult<T>,
    f: Arc<F>,
}

impl<T, U, F> RunFuture<U> for AndThen<T, F>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> FutureResult<U> + Send + Sync + 'static,
{
    fn run(&self, done: Callback<U>) {
        let f = Arc::clone(&self.f);
        self.inner.run_boxed(Box::new(move |outcome| match outcome {
            // The next step only exists, let alone starts, after this
            // callback has fired with a success.
            Outcome::Success(value) => (*f)(value).run_boxed(done),
            Outcome::Failure(reason) => done(Outcome::Failure(reason)),
        }));
    }
}
