//! Command-line interface definitions for version-sweep.
//!
//! This module defines the CLI structure using clap. The main entry point is
//! the [`Cli`] struct. Every option can also be set through a
//! `VERSION_SWEEP_*` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use version_sweep::cli::Cli;
//!
//! let cli = Cli::parse_args();
//! println!("Purging {} on {}", cli.folder(), cli.site_url());
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::error::{Result, SweepError};
use crate::purge::PurgePolicy;
use crate::remote::paths::normalize_folder;
use crate::retry::DEFAULT_MAX_RETRIES;

/// Main command-line interface for version-sweep.
#[derive(Debug, Parser)]
#[command(
    name = "version-sweep",
    bin_name = "version-sweep",
    author,
    version,
    about = "Purge obsolete file-version history from a document library",
    long_about = "Walks a folder of a document library and deletes old file versions.\n\nThe \
                  newest version of every file is always kept. With --max-age-days only versions \
                  older than the given number of days are deleted."
)]
pub struct Cli {
    /// Absolute URL of the site, e.g. https://contoso.sharepoint.com/sites/team
    #[arg(long, env = "VERSION_SWEEP_SITE_URL")]
    site_url: String,

    /// Site-relative folder to purge, e.g. "Shared Documents/Reports"
    #[arg(long, env = "VERSION_SWEEP_FOLDER")]
    folder: String,

    /// OAuth bearer token used to authenticate against the site
    #[arg(long, env = "VERSION_SWEEP_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Also purge all subfolders
    #[arg(short, long, env = "VERSION_SWEEP_RECURSE")]
    recurse: bool,

    /// Only delete versions older than this many days (0 = all but the latest)
    #[arg(long, default_value = "0", env = "VERSION_SWEEP_MAX_AGE_DAYS")]
    max_age_days: u32,

    /// Skip note-taking files (.one, .onetoc2)
    #[arg(long, env = "VERSION_SWEEP_EXCLUDE_NOTE_FILES")]
    exclude_note_files: bool,

    /// Additional file extensions to skip (comma-separated)
    #[arg(long, value_delimiter = ',', env = "VERSION_SWEEP_EXCLUDE_EXTENSIONS")]
    exclude_extension: Vec<String>,

    /// Show what would be deleted without actually deleting
    #[arg(long, env = "VERSION_SWEEP_DRY_RUN")]
    dry_run: bool,

    /// Append log output to this file as well as the console
    #[arg(long, env = "VERSION_SWEEP_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Retries for throttled requests (delay doubles each time, from 2s)
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES, env = "VERSION_SWEEP_MAX_RETRIES")]
    max_retries: u32,

    /// Timeout for a single HTTP request, in seconds
    #[arg(long, default_value = "60", env = "VERSION_SWEEP_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, env = "VERSION_SWEEP_VERBOSE")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose", env = "VERSION_SWEEP_QUIET")]
    quiet: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a builder for programmatic construction
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    /// Get the site URL
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Get the folder, normalized to a clean site-relative path
    pub fn folder(&self) -> String {
        normalize_folder(&self.folder)
    }

    /// Get the access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Check if recursion is enabled
    pub fn recurse(&self) -> bool {
        self.recurse
    }

    /// Get the age threshold in days
    pub fn max_age_days(&self) -> u32 {
        self.max_age_days
    }

    /// Check if note-taking files are skipped
    pub fn exclude_note_files(&self) -> bool {
        self.exclude_note_files
    }

    /// Get the additional excluded extensions
    pub fn exclude_extensions(&self) -> &[String] {
        &self.exclude_extension
    }

    /// Check if dry run mode is enabled
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Get the log file path
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Get the retry budget
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the verbose level
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// The purge policy described by the flags
    pub fn purge_policy(&self) -> PurgePolicy {
        PurgePolicy::builder()
            .recurse(self.recurse)
            .max_age_days(self.max_age_days)
            .exclude_note_files(self.exclude_note_files)
            .exclude_extensions(&self.exclude_extension)
            .build()
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    site_url: Option<String>,
    folder: Option<String>,
    access_token: Option<String>,
    recurse: bool,
    max_age_days: u32,
    exclude_note_files: bool,
    exclude_extensions: Vec<String>,
    dry_run: bool,
    log_file: Option<PathBuf>,
    max_retries: Option<u32>,
    timeout_secs: Option<u64>,
    verbose: u8,
    quiet: bool,
}

impl CliBuilder {
    /// Set the site URL
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    /// Set the site-relative folder
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Set the access token
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Enable or disable recursion
    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Set the age threshold in days
    pub fn max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    /// Skip note-taking files
    pub fn exclude_note_files(mut self, enabled: bool) -> Self {
        self.exclude_note_files = enabled;
        self
    }

    /// Add an excluded extension
    pub fn exclude_extension(mut self, extension: impl Into<String>) -> Self {
        self.exclude_extensions.push(extension.into());
        self
    }

    /// Enable or disable dry run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the log file path
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Set the retry budget
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the HTTP timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the verbose level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable quiet mode
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Build the Cli instance
    pub fn build(self) -> Result<Cli> {
        let required = |value: Option<String>, name: &str| {
            value.ok_or_else(|| SweepError::ConfigError(format!("{name} is required")))
        };

        Ok(Cli {
            site_url: required(self.site_url, "site URL")?,
            folder: required(self.folder, "folder")?,
            access_token: required(self.access_token, "access token")?,
            recurse: self.recurse,
            max_age_days: self.max_age_days,
            exclude_note_files: self.exclude_note_files,
            exclude_extension: self.exclude_extensions,
            dry_run: self.dry_run,
            log_file: self.log_file,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            timeout_secs: self.timeout_secs.unwrap_or(60),
            verbose: self.verbose,
            quiet: self.quiet,
        })
    }
}
