//! Caller-supplied lookups that replace the default substring filter.
//!
//! A [`SearchFunction`] receives the search text and the full option list and
//! returns a [`LookupOutcome`]: either a result available right away, or a
//! future that resolves later (for example a remote query). Pending outcomes are
//! tracked by the control in a [`LookupQueue`] and come back to it as
//! [`crate::Event::LookupCompleted`].
//!
//! # Example
//!
//! ```rust
//! use dropsearch::lookup::{async_lookup, sync_lookup, LookupOutcome, SearchFunction};
//!
//! let prefix = sync_lookup(|term: &str, options: &[String]| -> dropsearch::Result<Vec<String>> {
//!     Ok(options.iter().filter(|o| o.starts_with(term)).cloned().collect())
//! });
//! let options = vec!["Kyiv".to_string(), "Kharkiv".to_string()];
//! assert!(matches!(prefix.search("Ky", &options), LookupOutcome::Ready(Ok(ref v)) if v.len() == 1));
//!
//! let remote = async_lookup(|term: &str, _options: &[String]| {
//!     let term = term.to_string();
//!     async move { Ok::<_, dropsearch::DropdownError>(vec![term]) }
//! });
//! assert!(matches!(remote.search("x", &options), LookupOutcome::Pending(_)));
//! ```

pub mod fuzzy;
pub mod messages;

pub use fuzzy::{highlight_ranges, FuzzyLookup};
pub use messages::{LookupCompletion, LookupQueue, LookupRequest};

use crate::domain::Result;
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use std::fmt;
use std::future::Future;

/// Future produced by an asynchronous lookup.
pub type LookupFuture<T> = LocalBoxFuture<'static, Result<Vec<T>>>;

/// What a lookup hands back: a finished result or a future for one.
pub enum LookupOutcome<T> {
    Ready(Result<Vec<T>>),
    Pending(LookupFuture<T>),
}

impl<T: fmt::Debug> fmt::Debug for LookupOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Host-supplied lookup computing the shown options from the search text.
///
/// Only called with non-empty search text; an empty search always shows the
/// full option list.
pub trait SearchFunction<T> {
    fn search(&self, term: &str, options: &[T]) -> LookupOutcome<T>;
}

/// Adapter for a synchronous closure.
pub struct SyncLookup<F>(F);

impl<T, F> SearchFunction<T> for SyncLookup<F>
where
    F: Fn(&str, &[T]) -> Result<Vec<T>>,
{
    fn search(&self, term: &str, options: &[T]) -> LookupOutcome<T> {
        LookupOutcome::Ready((self.0)(term, options))
    }
}

/// Adapter for a closure returning a future.
pub struct AsyncLookup<F>(F);

impl<T, F, Fut> SearchFunction<T> for AsyncLookup<F>
where
    F: Fn(&str, &[T]) -> Fut,
    Fut: Future<Output = Result<Vec<T>>> + 'static,
{
    fn search(&self, term: &str, options: &[T]) -> LookupOutcome<T> {
        LookupOutcome::Pending((self.0)(term, options).boxed_local())
    }
}

/// Wraps a synchronous closure as a [`SearchFunction`].
pub fn sync_lookup<T, F>(f: F) -> SyncLookup<F>
where
    F: Fn(&str, &[T]) -> Result<Vec<T>>,
{
    SyncLookup(f)
}

/// Wraps a future-returning closure as a [`SearchFunction`].
pub fn async_lookup<T, F, Fut>(f: F) -> AsyncLookup<F>
where
    F: Fn(&str, &[T]) -> Fut,
    Fut: Future<Output = Result<Vec<T>>> + 'static,
{
    AsyncLookup(f)
}
