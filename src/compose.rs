//! Function composition for pipeline building
//!
//! Two composition shapes cover everything the pipeline syntax needs:
//!
//! - [`compose`] chains plain functions left to right: `compose(f, g)` is
//!   `|x| g(f(x))`.
//! - [`kleisli`] chains [`Outcome`]-returning functions, short-circuiting on
//!   the first failing stage so no branching is needed at the call site.
//!
//! The variadic [`compose!`](crate::compose!) and [`kleisli!`](crate::kleisli!)
//! macros flatten longer chains.
//!
//! # Examples
//!
//! ```
//! use confluence::compose::compose;
//!
//! fn double(x: i32) -> i32 { x * 2 }
//! fn add_one(x: i32) -> i32 { x + 1 }
//!
//! let pipeline = compose(double, add_one);
//! assert_eq!(pipeline(5), 11); // add_one(double(5))
//! ```

use crate::outcome::Outcome;

/// Compose two functions left to right.
///
/// `compose(f, g)` applies `f` first, then feeds its output to `g`.
///
/// # Examples
///
/// ```
/// use confluence::compose::compose;
///
/// let shout = compose(str::to_uppercase, |s: String| format!("{s}!"));
/// assert_eq!(shout("hey"), "HEY!");
/// ```
pub fn compose<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> C
where
    F: Fn(A) -> B,
    G: Fn(B) -> C,
{
    move |a| g(f(a))
}

/// Compose two [`Outcome`]-returning functions, short-circuiting on failure.
///
/// `kleisli(f, g)` runs `f` and, only on success, feeds the value to `g`.
/// A failure from `f` is forwarded verbatim and `g` is never invoked.
///
/// # Examples
///
/// ```
/// use confluence::compose::kleisli;
/// use confluence::{Outcome, Reason};
///
/// fn parse(s: &str) -> Outcome<i32> {
///     match s.parse() {
///         Ok(n) => Outcome::success(n),
///         Err(_) => Outcome::failure(Reason::Validation {
///             value: s.to_string(),
///             condition: "an integer".to_string(),
///         }),
///     }
/// }
///
/// fn positive(n: i32) -> Outcome<i32> {
///     if n > 0 {
///         Outcome::success(n)
///     } else {
///         Outcome::failure(Reason::Validation {
///             value: n.to_string(),
///             condition: "positive".to_string(),
///         })
///     }
/// }
///
/// let parse_positive = kleisli(parse, positive);
/// assert_eq!(parse_positive("7"), Outcome::Success(7));
/// assert!(parse_positive("nope").is_failure());
/// assert!(parse_positive("-3").is_failure());
/// ```
pub fn kleisli<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> Outcome<C>
where
    F: Fn(A) -> Outcome<B>,
    G: Fn(B) -> Outcome<C>,
{
    move |a| f(a).and_then(&g)
}

/// Compose any number of plain functions left to right.
///
/// `compose!(f, g, h)` is `|x| h(g(f(x)))`. Composition is associative, so
/// the grouping the macro picks is unobservable.
///
/// # Examples
///
/// ```
/// fn double(x: i32) -> i32 { x * 2 }
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn square(x: i32) -> i32 { x * x }
///
/// let pipeline = confluence::compose!(double, add_one, square);
/// assert_eq!(pipeline(2), 25); // square(add_one(double(2)))
/// ```
#[macro_export]
macro_rules! compose {
    ($f:expr $(,)?) => { $f };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        $crate::compose::compose($f, $crate::compose!($($rest),+))
    };
}

/// Compose any number of [`Outcome`]-returning functions left to right.
///
/// The chain short-circuits on the first failing stage.
///
/// # Examples
///
/// ```
/// use confluence::Outcome;
///
/// fn half(x: i32) -> Outcome<i32> { Outcome::success(x / 2) }
/// fn show(x: i32) -> Outcome<String> { Outcome::success(x.to_string()) }
///
/// let pipeline = confluence::kleisli!(half, half, show);
/// assert_eq!(pipeline(20), Outcome::Success("5".to_string()));
/// ```
#[macro_export]
macro_rules! kleisli {
    ($f:expr $(,)?) => { $f };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        $crate::compose::kleisli($f, $crate::kleisli!($($rest),+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reason::Reason;

    fn double(x: i32) -> i32 {
        x * 2
    }

    fn add_ten(x: i32) -> i32 {
        x + 10
    }

    fn negate(x: i32) -> i32 {
        -x
    }

    #[test]
    fn compose_applies_left_to_right() {
        let pipeline = compose(double, add_ten);
        assert_eq!(pipeline(5), 20);
    }

    #[test]
    fn compose_is_associative() {
        let left = compose(compose(double, add_ten), negate);
        let right = compose(double, compose(add_ten, negate));
        for x in [-3, 0, 7, 100] {
            assert_eq!(left(x), right(x));
        }
    }

    #[test]
    fn kleisli_short_circuits_on_first_failure() {
        use std::cell::Cell;

        let reached = Cell::new(false);
        let fail_stage = |_: i32| {
            Outcome::<i32>::failure(Reason::Validation {
                value: "x".to_string(),
                condition: "anything".to_string(),
            })
        };
        let second_stage = |x: i32| {
            reached.set(true);
            Outcome::success(x)
        };
        let chained = kleisli(fail_stage, second_stage);
        assert!(chained(1).is_failure());
        assert!(!reached.get());
    }

    #[test]
    fn kleisli_is_associative() {
        let a = |x: i32| Outcome::success(x * 2);
        let b = |x: i32| Outcome::success(x + 10);
        let c = |x: i32| Outcome::success(x - 1);
        let left = kleisli(kleisli(a, b), c);
        let right = kleisli(a, kleisli(b, c));
        for x in [-5, 0, 9] {
            assert_eq!(left(x), right(x));
        }
    }

    #[test]
    fn compose_macro_chains_three_stages() {
        let pipeline = crate::compose!(double, add_ten, negate);
        assert_eq!(pipeline(1), -12);
    }

    #[test]
    fn kleisli_macro_chains_three_stages() {
        let half = |x: i32| Outcome::success(x / 2);
        let pipeline = crate::kleisli!(half, half, |x: i32| Outcome::success(x + 1));
        assert_eq!(pipeline(8), Outcome::Success(3));
    }
}
