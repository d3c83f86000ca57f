//! Pure leaf computations for building pipelines
//!
//! Everything here is illustrative glue with the shape `T -> Outcome<U>`, so
//! it composes through [`kleisli`](crate::compose::kleisli) and splices into
//! asynchronous chains via
//! [`FutureResult::map_outcome`](crate::FutureResult::map_outcome). The
//! combinator core never looks inside these; it only sees their shape.

use std::sync::{Arc, Mutex, OnceLock};

use rand::rngs::StdRng;
use rand::Rng;
use regex::Regex;

use crate::outcome::Outcome;
use crate::reason::Reason;

const LINK_PATTERN: &str = r#"href="(http[^"]+)""#;

fn link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(LINK_PATTERN).expect("link pattern is a valid regex"))
}

/// Decode a byte payload as UTF-8 text.
///
/// # Examples
///
/// ```
/// use confluence::steps::to_utf8;
/// use confluence::Outcome;
///
/// assert_eq!(to_utf8(b"hello".to_vec()), Outcome::Success("hello".to_string()));
/// assert!(to_utf8(vec![0xff, 0xfe]).is_failure());
/// ```
pub fn to_utf8(bytes: Vec<u8>) -> Outcome<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Outcome::Success(text),
        Err(_) => Outcome::Failure(Reason::Decode { encoding: "UTF-8" }),
    }
}

/// Count whitespace-separated words.
///
/// # Examples
///
/// ```
/// use confluence::steps::word_count;
/// use confluence::Outcome;
///
/// assert_eq!(word_count("one two three".to_string()), Outcome::Success(3));
/// assert_eq!(word_count(String::new()), Outcome::Success(0));
/// ```
pub fn word_count(text: String) -> Outcome<usize> {
    Outcome::Success(text.split_whitespace().count())
}

/// Extract the first `href="http..."` link target from a document.
///
/// Fails with [`Reason::PatternNotFound`] when no link is present, and with
/// [`Reason::Validation`] when the captured target is not an absolute
/// http(s) URL.
///
/// # Examples
///
/// ```
/// use confluence::steps::first_link;
/// use confluence::Outcome;
///
/// let page = r#"<a href="http://example.com/a">first</a>"#.to_string();
/// assert_eq!(
///     first_link(page),
///     Outcome::Success("http://example.com/a".to_string()),
/// );
/// assert!(first_link("no links here".to_string()).is_failure());
/// ```
pub fn first_link(text: String) -> Outcome<String> {
    let Some(captures) = link_regex().captures(&text) else {
        return Outcome::Failure(Reason::PatternNotFound {
            pattern: LINK_PATTERN.to_string(),
        });
    };
    let Some(target) = captures.get(1) else {
        return Outcome::Failure(Reason::PatternNotFound {
            pattern: LINK_PATTERN.to_string(),
        });
    };
    let target = target.as_str().to_string();
    if target.starts_with("http://") || target.starts_with("https://") {
        Outcome::Success(target)
    } else {
        Outcome::Failure(Reason::Validation {
            value: target,
            condition: "absolute http(s) URL".to_string(),
        })
    }
}

/// Build a validator accepting only multiples of `n`.
///
/// The failure embeds the offending value and the violated relation so the
/// terminal callback can report precisely what went wrong. `n == 0` rejects
/// every value rather than dividing by zero.
///
/// # Examples
///
/// ```
/// use confluence::steps::multiple_of;
/// use confluence::Outcome;
///
/// let check = multiple_of(13);
/// assert_eq!(check(39), Outcome::Success(39));
/// assert!(check(38).is_failure());
/// ```
pub fn multiple_of(n: usize) -> impl Fn(usize) -> Outcome<usize> + Clone + Send + Sync + 'static {
    move |value| {
        if n != 0 && value % n == 0 {
            Outcome::Success(value)
        } else {
            Outcome::Failure(Reason::Validation {
                value: value.to_string(),
                condition: format!("multiple of {n}"),
            })
        }
    }
}

/// Build a sampler drawing uniformly from `0..bound`.
///
/// Randomness is threaded in explicitly as a shared, seedable generator, so
/// callers (and especially tests) decide determinism; nothing here touches
/// ambient global state. An empty range (`bound == 0`) is a validation
/// failure rather than a panic.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use confluence::steps::sample_up_to;
/// use confluence::Outcome;
///
/// let rng = Arc::new(Mutex::new(StdRng::seed_from_u64(7)));
/// let sample = sample_up_to(rng);
/// assert!(matches!(sample(10), Outcome::Success(n) if n < 10));
/// assert!(sample(0).is_failure());
/// ```
pub fn sample_up_to(
    rng: Arc<Mutex<StdRng>>,
) -> impl Fn(usize) -> Outcome<usize> + Clone + Send + Sync + 'static {
    move |bound| {
        if bound == 0 {
            return Outcome::Failure(Reason::Validation {
                value: bound.to_string(),
                condition: "non-empty sampling range".to_string(),
            });
        }
        let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Outcome::Success(rng.random_range(0..bound))
    }
}
