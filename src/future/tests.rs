use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::*;
use crate::testing::{await_outcome, delayed};

fn boom() -> Reason {
    Reason::Transport {
        detail: "boom".to_string(),
    }
}

// Constructor tests

#[tokio::test]
async fn pure_succeeds() {
    let future = FutureResult::pure(42);
    assert_eq!(await_outcome(&future).await, Outcome::Success(42));
}

#[tokio::test]
async fn fail_fails() {
    let future = FutureResult::<i32>::fail(boom());
    assert_eq!(await_outcome(&future).await, Outcome::Failure(boom()));
}

#[tokio::test]
async fn from_outcome_lifts_either_variant() {
    let success = FutureResult::from_outcome(Outcome::success(1));
    assert_eq!(await_outcome(&success).await, Outcome::Success(1));

    let failure = FutureResult::<i32>::from_outcome(Outcome::failure(boom()));
    assert_eq!(await_outcome(&failure).await, Outcome::Failure(boom()));
}

#[tokio::test]
async fn every_run_reexecutes_the_action_from_scratch() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let future = FutureResult::new(move |done| {
        let run = counter.fetch_add(1, Ordering::SeqCst) + 1;
        done(Outcome::Success(run));
    });

    assert_eq!(await_outcome(&future).await, Outcome::Success(1));
    assert_eq!(await_outcome(&future).await, Outcome::Success(2));
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

// map / map_outcome

#[tokio::test]
async fn map_transforms_success() {
    let future = FutureResult::pure(5).map(|x| x * 2);
    assert_eq!(await_outcome(&future).await, Outcome::Success(10));
}

#[tokio::test]
async fn map_forwards_failure_without_invoking_f() {
    let touched = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&touched);
    let future = FutureResult::<i32>::fail(boom()).map(move |x| {
        flag.store(true, Ordering::SeqCst);
        x * 2
    });

    assert_eq!(await_outcome(&future).await, Outcome::Failure(boom()));
    assert!(!touched.load(Ordering::SeqCst));
}

#[tokio::test]
async fn map_outcome_splices_a_passing_check() {
    let future = FutureResult::pure(10).map_outcome(|x| Outcome::success(x + 1));
    assert_eq!(await_outcome(&future).await, Outcome::Success(11));
}

#[tokio::test]
async fn map_outcome_splices_a_failing_check() {
    let future = FutureResult::pure(9).map_outcome(|x| {
        Outcome::<i32>::failure(Reason::Validation {
            value: x.to_string(),
            condition: "even".to_string(),
        })
    });
    assert!(await_outcome(&future).await.is_failure());
}

// and_then

#[tokio::test]
async fn and_then_sequences_on_success() {
    let future = FutureResult::pure(5).and_then(|x| FutureResult::pure(x * 2));
    assert_eq!(await_outcome(&future).await, Outcome::Success(10));
}

#[tokio::test]
async fn and_then_forwards_failure_without_invoking_f() {
    let touched = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&touched);
    let future = FutureResult::<i32>::fail(boom()).and_then(move |x| {
        flag.store(true, Ordering::SeqCst);
        FutureResult::pure(x)
    });

    assert_eq!(await_outcome(&future).await, Outcome::Failure(boom()));
    assert!(!touched.load(Ordering::SeqCst));
}

#[tokio::test]
async fn and_then_never_starts_the_second_before_the_first_completes() {
    let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let first_log = Arc::clone(&log);
    let first = FutureResult::new(move |done| {
        let log = Arc::clone(&first_log);
        tokio::spawn(async move {
            log.lock().unwrap().push("first:running");
            tokio::time::sleep(Duration::from_millis(5)).await;
            log.lock().unwrap().push("first:done");
            done(Outcome::Success(1));
        });
    });

    let second_log = Arc::clone(&log);
    let chained = first.and_then(move |x| {
        let log = Arc::clone(&second_log);
        FutureResult::new(move |done| {
            log.lock().unwrap().push("second:running");
            done(Outcome::Success(x + 1));
        })
    });

    assert_eq!(await_outcome(&chained).await, Outcome::Success(2));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["first:running", "first:done", "second:running"]
    );
}

// zip

#[tokio::test]
async fn zip_joins_two_successes_regardless_of_completion_order() {
    // Left finishes last.
    let joined = delayed(Outcome::success(1), Duration::from_millis(10))
        .zip(delayed(Outcome::success(2), Duration::from_millis(1)));
    assert_eq!(await_outcome(&joined).await, Outcome::Success((1, 2)));

    // Right finishes last.
    let joined = delayed(Outcome::success(1), Duration::from_millis(1))
        .zip(delayed(Outcome::success(2), Duration::from_millis(10)));
    assert_eq!(await_outcome(&joined).await, Outcome::Success((1, 2)));
}

#[tokio::test]
async fn zip_left_failure_wins_even_when_right_fails_first() {
    let left = Reason::Decode { encoding: "UTF-8" };
    let right = Reason::Transport {
        detail: "right".to_string(),
    };

    let joined = delayed(Outcome::<i32>::failure(left.clone()), Duration::from_millis(10))
        .zip(delayed(Outcome::<i32>::failure(right), Duration::from_millis(1)));
    assert_eq!(await_outcome(&joined).await, Outcome::Failure(left));
}

#[tokio::test]
async fn zip_waits_for_the_pending_side_after_a_failure() {
    let joined = FutureResult::<i32>::fail(boom())
        .zip(delayed(Outcome::success(2), Duration::from_millis(20)));

    let started = Instant::now();
    let outcome = await_outcome(&joined).await;
    assert_eq!(outcome, Outcome::Failure(boom()));
    // No early short-circuit: the failed side's report is held until the
    // sibling completes.
    assert!(started.elapsed() >= Duration::from_millis(20));
}

#[tokio::test]
async fn zip_fires_exactly_once_when_both_sides_complete_together() {
    let completions = Arc::new(AtomicUsize::new(0));
    let joined = delayed(Outcome::success(1), Duration::from_millis(1))
        .zip(delayed(Outcome::success(2), Duration::from_millis(1)));

    let counter = Arc::clone(&completions);
    let (tx, rx) = futures::channel::oneshot::channel();
    joined.run(move |outcome| {
        counter.fetch_add(1, Ordering::SeqCst);
        let _ = tx.send(outcome);
    });

    assert_eq!(rx.await.unwrap(), Outcome::Success((1, 2)));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

// retry

fn always_failing(attempts: &Arc<AtomicUsize>) -> FutureResult<i32> {
    let counter = Arc::clone(attempts);
    FutureResult::new(move |done| {
        counter.fetch_add(1, Ordering::SeqCst);
        done(Outcome::Failure(boom()));
    })
}

#[tokio::test]
async fn retry_exhaustion_makes_budget_plus_one_attempts() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let future = always_failing(&attempts).retry(3);

    assert_eq!(await_outcome(&future).await, Outcome::Failure(boom()));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn retry_zero_budget_attempts_exactly_once() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let future = always_failing(&attempts).retry(0);

    assert_eq!(await_outcome(&future).await, Outcome::Failure(boom()));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retry_stops_after_transient_failures_clear() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let flaky = FutureResult::new(move |done| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt < 3 {
            done(Outcome::Failure(boom()));
        } else {
            done(Outcome::Success(attempt));
        }
    });

    let future = flaky.retry(5);
    assert_eq!(await_outcome(&future).await, Outcome::Success(3));

    // No further attempts after the terminal success.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_with_a_large_budget_keeps_the_stack_flat() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let future = always_failing(&attempts).retry(2000);

    assert_eq!(await_outcome(&future).await, Outcome::Failure(boom()));
    assert_eq!(attempts.load(Ordering::SeqCst), 2001);
}

#[tracing_test::traced_test]
#[tokio::test]
async fn retry_logs_each_intermediate_failure() {
    let future = FutureResult::<i32>::fail(boom()).retry(2);
    assert!(await_outcome(&future).await.is_failure());
    assert!(logs_contain("attempt failed, resubmitting"));
    assert!(logs_contain("attempt failed, budget exhausted"));
}
