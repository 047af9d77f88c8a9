//! Cooperative cancellation
//!
//! The session polls its continuation once per read iteration, before the
//! read.  There is no mid-read interruption.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Decides whether the read loop keeps going.
pub trait Continuation {
    /// `false` ends the loop without an error.
    fn keep_going(&mut self) -> bool;
}

impl<F: FnMut() -> bool> Continuation for F {
    fn keep_going(&mut self) -> bool {
        self()
    }
}

/// Clonable stop flag shared between the session and whoever stops it.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session to stop at its next iteration
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl Continuation for StopToken {
    fn keep_going(&mut self) -> bool {
        !self.is_stopped()
    }
}

/// Stops after `limit` iterations, or earlier when `inner` says so.
#[derive(Debug, Clone)]
pub struct Limit<C> {
    inner: C,
    remaining: u64,
}

impl<C: Continuation> Limit<C> {
    pub fn new(inner: C, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<C: Continuation> Continuation for Limit<C> {
    fn keep_going(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.inner.keep_going()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_continuation() {
        let mut calls = 0;
        let mut c = || {
            calls += 1;
            calls <= 2
        };
        assert!(c.keep_going());
        assert!(c.keep_going());
        assert!(!c.keep_going());
    }

    #[test]
    fn test_stop_token() {
        let token = StopToken::new();
        let mut session_side = token.clone();
        assert!(session_side.keep_going());
        token.stop();
        assert!(token.is_stopped());
        assert!(!session_side.keep_going());
    }

    #[test]
    fn test_limit() {
        let mut c = Limit::new(|| true, 2);
        assert!(c.keep_going());
        assert!(c.keep_going());
        assert!(!c.keep_going());
        assert!(!c.keep_going());
    }

    #[test]
    fn test_limit_respects_inner_stop() {
        let token = StopToken::new();
        let mut c = Limit::new(token.clone(), 10);
        token.stop();
        assert!(!c.keep_going());
    }
}
