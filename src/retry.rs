//! Bounded retry for calls against a player that may still be starting up.

use std::fmt::Display;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

/// Retry at a fixed interval until a wall-clock budget or an attempt cap runs out,
/// whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub budget: Duration,
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub const fn new(interval: Duration, budget: Duration) -> Self {
        Self {
            interval,
            budget,
            max_attempts: None,
        }
    }

    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

/// Returned when every attempt allowed by the policy failed.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Runs `attempt` until it succeeds or `policy` is exhausted. Always attempts at least once.
pub fn retry_within<T, E, F>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt: F,
) -> Result<T, RetryExhausted<E>>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    let started = Instant::now();
    let mut attempts = 0;
    loop {
        attempts += 1;
        let err = match attempt() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        debug!("{} attempt {} failed: {}", operation, attempts, err);

        let out_of_attempts = policy.max_attempts.is_some_and(|max| attempts >= max);
        let out_of_time = started.elapsed() + policy.interval > policy.budget;
        if out_of_attempts || out_of_time {
            return Err(RetryExhausted {
                attempts,
                last_error: err,
            });
        }
        thread::sleep(policy.interval);
    }
}
