//! Concurrent join of two independent futures.
//!
//! Both sides start as separate tasks and complete on whatever execution
//! context their actions finish on. Their outcomes land in a two-slot barrier
//! guarded by a mutex; the joined callback fires exactly once, after both
//! slots are populated, with the left operand's failure taking precedence
//! when both fail.

use std::sync::{Arc, Mutex};

use crate::outcome::Outcome;

use super::{Callback, FutureResult, RunFuture};

pub(crate) struct Join<A, B> {
    left: FutureResult<A>,
    right: FutureResult<B>,
}

impl<A, B> Join<A, B> {
    pub(crate) fn new(left: FutureResult<A>, right: FutureResult<B>) -> Self {
        Join { left, right }
    }
}

impl<A, B> RunFuture<(A, B)> for Join<A, B>
where
    A: Send + 'static,
    B: Send + 'static,
{
    fn run(&self, done: Callback<(A, B)>) {
        let barrier = Arc::new(Barrier::new(done));
        let left = self.left.clone();
        let right = self.right.clone();

        let for_left = Arc::clone(&barrier);
        tokio::spawn(async move {
            left.run_boxed(Box::new(move |outcome| for_left.complete_left(outcome)));
        });

        let for_right = barrier;
        tokio::spawn(async move {
            right.run_boxed(Box::new(move |outcome| for_right.complete_right(outcome)));
        });
    }
}

/// Two write-once slots plus the pending callback, private to one join
/// invocation. Completions may race from different threads; the mutex
/// serialises them and the `Option` takes make a second fire unrepresentable.
struct Barrier<A, B> {
    slots: Mutex<Slots<A, B>>,
}

struct Slots<A, B> {
    left: Option<Outcome<A>>,
    right: Option<Outcome<B>>,
    done: Option<Callback<(A, B)>>,
}

impl<A, B> Barrier<A, B> {
    fn new(done: Callback<(A, B)>) -> Self {
        Barrier {
            slots: Mutex::new(Slots {
                left: None,
                right: None,
                done: Some(done),
            }),
        }
    }

    fn complete_left(&self, outcome: Outcome<A>) {
        let ready = {
            let mut slots = self.lock();
            if slots.left.is_some() {
                return;
            }
            slots.left = Some(outcome);
            slots.take_ready()
        };
        // Fire outside the lock: the callback may run arbitrary user code.
        if let Some((done, joined)) = ready {
            done(joined);
        }
    }

    fn complete_right(&self, outcome: Outcome<B>) {
        let ready = {
            let mut slots = self.lock();
            if slots.right.is_some() {
                return;
            }
            slots.right = Some(outcome);
            slots.take_ready()
        };
        if let Some((done, joined)) = ready {
            done(joined);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots<A, B>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<A, B> Slots<A, B> {
    /// Take the callback and both outcomes once both sides have reported.
    /// Returns `None` while a side is still pending or after the join has
    /// already fired.
    fn take_ready(&mut self) -> Option<(Callback<(A, B)>, Outcome<(A, B)>)> {
        if self.left.is_none() || self.right.is_none() {
            return None;
        }
        let done = self.done.take()?;
        let left = self.left.take()?;
        let right = self.right.take()?;
        Some((done, left.zip(right)))
    }
}
