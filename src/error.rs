//! Error types for version-sweep.
//!
//! This module defines all error types used throughout version-sweep, using
//! a combination of `thiserror` for ergonomic error definitions and `miette`
//! for rich diagnostic output.
//!
//! # Error Handling Strategy
//!
//! - Failures of a single remote call are a [`RemoteError`], which knows
//!   whether retrying it makes sense ([`RemoteError::is_transient`])
//! - Everything that can abort a run is a [`SweepError`]
//! - Per-file and per-version failures are counted and logged by the walker,
//!   they never surface as a `SweepError`
//! - Errors are automatically converted to `miette::Result` for CLI output
//!
//! # Example
//!
//! ```no_run
//! use version_sweep::error::{Result, SweepError};
//!
//! fn check_folder(exists: bool, folder: &str) -> Result<()> {
//!     if !exists {
//!         return Err(SweepError::FolderNotFound(folder.to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

/// Failure of a single call into the remote document library.
#[derive(Error, Debug, Diagnostic)]
pub enum RemoteError {
    /// The service answered with a non-success HTTP status.
    #[error("Remote call failed with HTTP {status}: {message}")]
    #[diagnostic(code(version_sweep::remote::status))]
    Status {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The service signalled throttling without an HTTP status we could see.
    #[error("Remote call throttled: {0}")]
    #[diagnostic(
        code(version_sweep::remote::throttled),
        help("The service is rate limiting requests. Retry later or lower the request rate.")
    )]
    Throttled(String),

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Transport error: {0}")]
    #[diagnostic(code(version_sweep::remote::transport))]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("Failed to decode remote response: {0}")]
    #[diagnostic(code(version_sweep::remote::decode))]
    Decode(String),

    /// Any other failure reported by a gateway implementation.
    #[error("{0}")]
    #[diagnostic(code(version_sweep::remote::other))]
    Other(String),
}

impl RemoteError {
    /// Whether the failure is rate limiting and therefore worth retrying.
    ///
    /// A status error is transient for HTTP 429 and 503, or when its body
    /// says in words that the request was throttled. Bare status digits in a
    /// body or a transport message are ignored since both echo request
    /// paths. Errors without a status also accept a bare 429 or 503.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Status { status, message } => {
                matches!(status, 429 | 503) || mentions_throttling(message)
            }
            RemoteError::Throttled(_) => true,
            RemoteError::Transport(message) => mentions_throttling(message),
            RemoteError::Decode(message) | RemoteError::Other(message) => {
                mentions_throttling(message) || mentions_throttling_status(message)
            }
        }
    }
}

/// Check a free-form error message for a worded rate-limiting signal.
fn mentions_throttling(message: &str) -> bool {
    static THROTTLE_RE: OnceLock<Regex> = OnceLock::new();

    let re = THROTTLE_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(throttl\w*|too many requests|server too busy)\b")
            .expect("throttling regex should compile")
    });
    re.is_match(message)
}

/// Check a free-form error message for a throttling status code.
fn mentions_throttling_status(message: &str) -> bool {
    static STATUS_RE: OnceLock<Regex> = OnceLock::new();

    let re = STATUS_RE.get_or_init(|| {
        Regex::new(r"\b(429|503)\b").expect("status regex should compile")
    });
    re.is_match(message)
}

/// Error types that can abort a version-sweep run
#[derive(Error, Debug, Diagnostic)]
pub enum SweepError {
    /// A remote call failed after the retry budget was spent (or failed
    /// permanently).
    ///
    /// Raised when enumerating a folder fails. Failures on individual files
    /// or versions are absorbed by the walker and never take this path.
    #[error("Remote operation '{operation}' failed")]
    #[diagnostic(
        code(version_sweep::remote::error),
        help("Check the site URL, folder path and access token, then try again.")
    )]
    Remote {
        /// Human-readable description of the call that failed
        operation: String,
        /// The underlying remote error
        #[source]
        source: RemoteError,
    },

    /// The requested root folder does not exist in the library.
    #[error("Folder '{0}' was not found in the document library")]
    #[diagnostic(
        code(version_sweep::folder::not_found),
        help("Folder paths are site-relative, e.g. 'Shared Documents/Reports'.")
    )]
    FolderNotFound(
        /// The site-relative folder path that was looked up
        String,
    ),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(version_sweep::config::error),
        help("Check the required configuration parameters.")
    )]
    ConfigError(
        /// Description of the configuration error
        String,
    ),

    /// The remote session could not be established.
    #[error("Failed to create remote client: {0}")]
    #[diagnostic(code(version_sweep::client::error))]
    ClientError(
        /// Description of the client construction failure
        String,
    ),

    /// File system I/O error (log file handling).
    #[error("I/O error accessing '{path}'")]
    #[diagnostic(code(version_sweep::io_error))]
    IoError {
        /// The path that caused the I/O error
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    /// Wrap a remote failure with the operation it belongs to.
    pub fn remote(operation: impl Into<String>, source: RemoteError) -> Self {
        SweepError::Remote {
            operation: operation.into(),
            source,
        }
    }
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SweepError>;

/// Render an error with its sources on one line, for log output.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
