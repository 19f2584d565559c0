//! Retry with exponential backoff for remote calls.
//!
//! [`Retry`] wraps a single fallible operation. Failures are classified by an
//! injected predicate: transient failures are retried after a delay of
//! `base_delay * 2^attempt`, permanent failures are returned at once.
//!
//! # Example
//!
//! ```no_run
//! use version_sweep::error::RemoteError;
//! use version_sweep::retry::Retry;
//!
//! let retry = Retry::for_remote().max_retries(3).build();
//! let value: Result<u32, RemoteError> = retry.execute("fetch answer", || Ok(42));
//! assert_eq!(value.unwrap(), 42);
//! ```

use std::fmt::Display;
use std::time::Duration;

use log::{error, warn};

use crate::error::RemoteError;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default base for the backoff delay
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

type Classifier<E> = Box<dyn Fn(&E) -> bool>;
type Sleeper = Box<dyn Fn(Duration)>;

/// Retry strategy
pub struct Retry<E> {
    max_retries: u32,
    base_delay: Duration,
    is_transient: Classifier<E>,
    sleeper: Sleeper,
}

impl<E> std::fmt::Debug for Retry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retry")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .finish_non_exhaustive()
    }
}

impl Retry<RemoteError> {
    /// Builder preconfigured with [`RemoteError::is_transient`]
    pub fn for_remote() -> RetryBuilder<RemoteError> {
        RetryBuilder::new(RemoteError::is_transient)
    }
}

impl<E: Display> Retry<E> {
    /// Creates a new builder using `is_transient` to classify failures
    pub fn builder(is_transient: impl Fn(&E) -> bool + 'static) -> RetryBuilder<E> {
        RetryBuilder::new(is_transient)
    }

    /// Get the retry budget
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `attempt` (starting at 1)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `operation`, retrying transient failures.
    ///
    /// `description` only feeds the log lines.
    ///
    /// # Errors
    ///
    /// Returns the first permanent failure, or the last transient failure
    /// once `max_retries` retries have been spent.
    pub fn execute<T, F>(&self, description: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 0u32;

        loop {
            let err = match operation() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !(self.is_transient)(&err) {
                error!("{description} failed: {err}");
                return Err(err);
            }

            if attempt >= self.max_retries {
                error!(
                    "{description} still throttled after {} retries, giving up: {err}",
                    self.max_retries
                );
                return Err(err);
            }

            attempt += 1;
            let delay = self.delay_for(attempt);
            warn!(
                "{description} throttled ({err}); retry {attempt}/{} in {}s",
                self.max_retries,
                delay.as_secs_f64()
            );
            (self.sleeper)(delay);
        }
    }
}

/// Builder for [`Retry`]
pub struct RetryBuilder<E> {
    max_retries: u32,
    base_delay: Duration,
    is_transient: Classifier<E>,
    sleeper: Option<Sleeper>,
}

impl<E> RetryBuilder<E> {
    fn new(is_transient: impl Fn(&E) -> bool + 'static) -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            is_transient: Box::new(is_transient),
            sleeper: None,
        }
    }

    /// Set the number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base of the exponential delay
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Replace the function used to wait between attempts
    pub fn sleeper(mut self, sleeper: impl Fn(Duration) + 'static) -> Self {
        self.sleeper = Some(Box::new(sleeper));
        self
    }

    /// Build the [`Retry`] strategy
    pub fn build(self) -> Retry<E> {
        Retry {
            max_retries: self.max_retries,
            base_delay: self.base_delay,
            is_transient: self.is_transient,
            sleeper: self
                .sleeper
                .unwrap_or_else(|| Box::new(std::thread::sleep) as Sleeper),
        }
    }
}
