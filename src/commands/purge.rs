//! Purge command implementation.

use chrono::{DateTime, Utc};
use log::{error, info};

use crate::error::{RemoteError, Result, SweepError, error_chain};
use crate::purge::{PurgePolicy, RunStats, Walker};
use crate::remote::RemoteLibrary;
use crate::retry::Retry;

/// A configured purge run
pub struct Purge {
    folder: String,
    policy: PurgePolicy,
    dry_run: bool,
    retry: Retry<RemoteError>,
    now: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct PurgeBuilder {
    folder: Option<String>,
    policy: PurgePolicy,
    dry_run: bool,
    retry: Option<Retry<RemoteError>>,
    now: Option<DateTime<Utc>>,
}

impl PurgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn policy(mut self, policy: PurgePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn retry(mut self, retry: Retry<RemoteError>) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Pin "now" for the age filter instead of reading the clock
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn build(self) -> Result<Purge> {
        Ok(Purge {
            folder: self
                .folder
                .ok_or_else(|| SweepError::ConfigError("folder is required".to_string()))?,
            policy: self.policy,
            dry_run: self.dry_run,
            retry: self.retry.unwrap_or_else(|| Retry::for_remote().build()),
            now: self.now,
        })
    }
}

impl Purge {
    pub fn builder() -> PurgeBuilder {
        PurgeBuilder::new()
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn policy(&self) -> &PurgePolicy {
        &self.policy
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Connect, walk the folder, and report.
    ///
    /// `connect` establishes the remote session. The summary in `stats` is
    /// reported exactly once, whether the run completes, the session cannot
    /// be established, or the traversal aborts.
    pub fn run<R, F>(&self, connect: F, stats: &mut RunStats) -> Result<()>
    where
        R: RemoteLibrary,
        F: FnOnce() -> Result<R>,
    {
        self.log_criteria();

        let outcome = connect().and_then(|remote| self.walk(&remote, stats));

        stats.report(self.dry_run);
        if let Err(err) = &outcome {
            error!("Purge aborted: {}", error_chain(err));
        }

        outcome
    }

    fn walk<R: RemoteLibrary + ?Sized>(&self, remote: &R, stats: &mut RunStats) -> Result<()> {
        let mut walker = Walker::new(remote, &self.retry, &self.policy).dry_run(self.dry_run);
        if let Some(now) = self.now {
            walker = walker.now(now);
        }
        walker.run(&self.folder, stats)
    }

    fn log_criteria(&self) {
        info!("Purging file versions in '{}'", self.folder);
        if self.policy.max_age_days() > 0 {
            info!(
                "  - Remove versions older than {} days (latest version always kept)",
                self.policy.max_age_days()
            );
        } else {
            info!("  - Remove all versions except the latest");
        }
        if self.policy.recurse() {
            info!("  - Including subfolders");
        }
        if !self.policy.excluded_extensions().is_empty() {
            let excluded: Vec<&str> = self
                .policy
                .excluded_extensions()
                .iter()
                .map(String::as_str)
                .collect();
            info!("  - Skipping extensions: {}", excluded.join(", "));
        }
        if self.dry_run {
            info!("  - DRY RUN: nothing will be deleted");
        }
    }
}
