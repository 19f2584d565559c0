//! Traversal-and-purge engine.
//!
//! This module removes old file versions from a document library:
//! - [`select_versions_for_removal`] picks the versions of one file to delete,
//!   always keeping the latest
//! - [`Walker`] walks a folder tree and applies the selection to every file
//! - [`RunStats`] counts what happened for the end-of-run summary
//!
//! # Example
//!
//! ```no_run
//! use version_sweep::purge::{PurgePolicy, RunStats, Walker};
//! use version_sweep::remote::SharePointClient;
//! use version_sweep::retry::Retry;
//!
//! let client = SharePointClient::builder()
//!     .site_url("https://contoso.sharepoint.com/sites/team")
//!     .access_token("token")
//!     .build()?;
//! let retry = Retry::for_remote().build();
//! let policy = PurgePolicy::builder()
//!     .recurse(true)
//!     .max_age_days(30)
//!     .exclude_note_files(true)
//!     .build();
//!
//! let mut stats = RunStats::start();
//! let outcome = Walker::new(&client, &retry, &policy)
//!     .dry_run(true)
//!     .run("Shared Documents", &mut stats);
//! stats.report(true);
//! outcome?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod policy;
mod select;
mod stats;
mod walker;

pub use policy::{NOTE_FILE_EXTENSIONS, PurgePolicy, PurgePolicyBuilder};
pub use select::{latest_version, select_versions_for_removal};
pub use stats::RunStats;
pub use walker::Walker;
