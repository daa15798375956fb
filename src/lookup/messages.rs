//! Request tagging for lookups and the queue of in-flight lookups.
//!
//! Every pending lookup carries a [`LookupRequest`] tag: a sequence number that
//! grows with each request, plus the search text that triggered it. A
//! [`LookupCompletion`] is only applied when its tag matches both the latest
//! request and the current search text, so a slow early query can never
//! overwrite a fast later one. There is no cancellation; stale completions are
//! simply discarded.

use crate::domain::Result;
use futures_util::future::LocalBoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use std::fmt;
use std::task::{Context, Poll};

/// Tag identifying one lookup invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Monotonically increasing per control instance, starting at 1.
    pub seq: u64,
    /// Search text the lookup was issued for.
    pub query: String,
}

/// A finished lookup, delivered back to the control as an event.
#[derive(Debug)]
pub struct LookupCompletion<T> {
    pub request: LookupRequest,
    pub result: Result<Vec<T>>,
}

/// Issued requests and the futures still running for them.
pub struct LookupQueue<T> {
    last_seq: u64,
    latest: Option<LookupRequest>,
    pending: FuturesUnordered<LocalBoxFuture<'static, LookupCompletion<T>>>,
}

impl<T: 'static> LookupQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_seq: 0,
            latest: None,
            pending: FuturesUnordered::new(),
        }
    }

    /// Allocates the next tag for `query` and marks it as the latest request.
    pub fn issue(&mut self, query: &str) -> LookupRequest {
        self.last_seq += 1;
        let request = LookupRequest {
            seq: self.last_seq,
            query: query.to_string(),
        };
        self.latest = Some(request.clone());
        request
    }

    /// Supersedes every issued request without issuing a new one.
    ///
    /// Used when the result no longer comes from a lookup (empty search text).
    pub fn supersede(&mut self) {
        self.latest = None;
    }

    /// Tracks `future` as the in-flight lookup for `request`.
    pub fn track<F>(&mut self, request: LookupRequest, future: F)
    where
        F: std::future::Future<Output = Result<Vec<T>>> + 'static,
    {
        self.pending.push(
            future
                .map(move |result| LookupCompletion { request, result })
                .boxed_local(),
        );
    }

    /// Whether `request` is still the one whose result should be displayed.
    #[must_use]
    pub fn is_current(&self, request: &LookupRequest, search_text: &str) -> bool {
        self.latest.as_ref() == Some(request) && request.query == search_text
    }

    #[must_use]
    pub fn latest(&self) -> Option<&LookupRequest> {
        self.latest.as_ref()
    }

    /// Number of lookups whose futures have not resolved yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Polls for the next resolved lookup, in completion order.
    ///
    /// Returns `Poll::Ready(None)` when nothing is in flight.
    pub fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Option<LookupCompletion<T>>> {
        self.pending.poll_next_unpin(cx)
    }

    /// Waits for the next resolved lookup.
    pub async fn next(&mut self) -> Option<LookupCompletion<T>> {
        self.pending.next().await
    }
}

impl<T: 'static> Default for LookupQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for LookupQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupQueue")
            .field("last_seq", &self.last_seq)
            .field("latest", &self.latest)
            .field("in_flight", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::ready;
    use futures_util::task::noop_waker_ref;

    #[test]
    fn issue_increments_and_tracks_latest() {
        let mut queue: LookupQueue<String> = LookupQueue::new();
        let a = queue.issue("a");
        let ab = queue.issue("ab");

        assert_eq!(a.seq, 1);
        assert_eq!(ab.seq, 2);
        assert!(!queue.is_current(&a, "ab"));
        assert!(queue.is_current(&ab, "ab"));
        assert!(!queue.is_current(&ab, "abc"));
    }

    #[test]
    fn supersede_invalidates_every_request() {
        let mut queue: LookupQueue<String> = LookupQueue::new();
        let a = queue.issue("a");
        queue.supersede();
        assert!(!queue.is_current(&a, "a"));
        assert!(queue.latest().is_none());
    }

    #[test]
    fn poll_next_yields_tagged_completions() {
        let mut queue: LookupQueue<String> = LookupQueue::new();
        let request = queue.issue("k");
        queue.track(request.clone(), ready(Ok(vec!["Kyiv".to_string()])));
        assert_eq!(queue.in_flight(), 1);

        let mut cx = Context::from_waker(noop_waker_ref());
        let Poll::Ready(Some(completion)) = queue.poll_next(&mut cx) else {
            panic!("ready future should complete on first poll");
        };
        assert_eq!(completion.request, request);
        assert_eq!(completion.result.unwrap(), vec!["Kyiv".to_string()]);
        assert!(matches!(queue.poll_next(&mut cx), Poll::Ready(None)));
    }
}
