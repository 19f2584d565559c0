//! # version-sweep
//!
//! Purges obsolete file-version history from a cloud document library.
//!
//! ## Overview
//!
//! Document libraries keep every saved version of every file, and that
//! history quietly eats storage quota. version-sweep walks a folder tree,
//! and for each file keeps the newest version while deleting the rest, or
//! only the versions older than a configurable number of days.
//!
//! ## Key Features
//!
//! - **Latest version always kept**: selection never touches the newest
//!   version, even when it is older than the age threshold
//! - **Throttling aware**: every remote call is retried with exponential
//!   backoff when the service rate-limits
//! - **Fault tolerant**: a failing file, version or subfolder is counted and
//!   skipped, the run carries on
//! - **Dry run**: walks and selects exactly like a real run without deleting
//!
//! ## Architecture
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`commands`]: Wiring from CLI to the purge engine
//! - [`error`]: Error types and handling with thiserror + miette
//! - [`purge`]: Version selection, folder walker and run statistics
//! - [`remote`]: Document library access (trait + SharePoint REST client)
//! - [`retry`]: Exponential backoff for throttled calls
//! - [`logging`]: Console and file log sink
//!
//! ## Library Usage
//!
//! ```no_run
//! use version_sweep::cli::Cli;
//! use version_sweep::commands;
//!
//! let cli = Cli::builder()
//!     .site_url("https://contoso.sharepoint.com/sites/team")
//!     .folder("Shared Documents")
//!     .access_token("token")
//!     .recurse(true)
//!     .dry_run(true)
//!     .build()?;
//!
//! commands::execute(&cli)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod purge;
pub mod remote;
pub mod retry;
