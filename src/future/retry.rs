//! Stack-safe resubmission of failed computations.
//!
//! The retry loop lives in its own task and awaits every attempt through a
//! oneshot channel, so resubmission never grows the call stack: budgets in
//! the hundreds or thousands cost the same stack as a single attempt.
//!
//! State machine: *Attempting* self-loops on failure while budget remains,
//! moves to *Succeeded* on any success and to *Exhausted* on a failure with
//! zero budget left. Both terminal states fire the callback exactly once.

use futures::channel::oneshot;

use crate::outcome::Outcome;

use super::{Callback, FutureResult, RunFuture};

pub(crate) struct Retry<T> {
    inner: FutureResult<T>,
    budget: usize,
}

impl<T> Retry<T> {
    pub(crate) fn new(inner: FutureResult<T>, budget: usize) -> Self {
        Retry { inner, budget }
    }
}

impl<T> RunFuture<T> for Retry<T>
where
    T: Send + 'static,
{
    fn run(&self, done: Callback<T>) {
        let attempt = self.inner.clone();
        let mut remaining = self.budget;

        tokio::spawn(async move {
            loop {
                let (tx, rx) = oneshot::channel();
                attempt.run_boxed(Box::new(move |outcome| {
                    // The receiver only disappears if this task is dropped.
                    let _ = tx.send(outcome);
                }));

                let outcome = match rx.await {
                    Ok(outcome) => outcome,
                    Err(oneshot::Canceled) => {
                        // The attempt dropped its callback without completing,
                        // violating the single-completion contract upstream.
                        // There is no outcome to forward, fabricated or real.
                        tracing::error!("attempt dropped its callback without completing");
                        return;
                    }
                };

                match outcome {
                    Outcome::Success(value) => {
                        done(Outcome::Success(value));
                        return;
                    }
                    Outcome::Failure(reason) if remaining == 0 => {
                        tracing::warn!(%reason, "attempt failed, budget exhausted");
                        done(Outcome::Failure(reason));
                        return;
                    }
                    Outcome::Failure(reason) => {
                        tracing::warn!(%reason, remaining, "attempt failed, resubmitting");
                        remaining -= 1;
                    }
                }
            }
        });
    }
}
