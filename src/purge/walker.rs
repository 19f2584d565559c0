use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use super::policy::PurgePolicy;
use super::select::{latest_version, select_versions_for_removal};
use super::stats::RunStats;
use crate::error::{RemoteError, Result, SweepError, error_chain};
use crate::remote::{FileDescriptor, RemoteLibrary, paths};
use crate::retry::Retry;

/// Depth-first traversal of a folder tree, purging versions file by file.
///
/// Every remote call goes through the [`Retry`] strategy. Errors are absorbed
/// at the smallest unit that can carry on: a failed version delete skips that
/// version, a failed file skips that file, a failed subfolder skips that
/// subtree. Only failures to enumerate the folder being processed propagate.
pub struct Walker<'a, R: RemoteLibrary + ?Sized> {
    remote: &'a R,
    retry: &'a Retry<RemoteError>,
    policy: &'a PurgePolicy,
    dry_run: bool,
    now: DateTime<Utc>,
}

impl<'a, R: RemoteLibrary + ?Sized> Walker<'a, R> {
    pub fn new(remote: &'a R, retry: &'a Retry<RemoteError>, policy: &'a PurgePolicy) -> Self {
        Self {
            remote,
            retry,
            policy,
            dry_run: false,
            now: Utc::now(),
        }
    }

    /// Log intended deletions instead of performing them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reference instant for the age filter (defaults to the time of
    /// construction)
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Check that `root` exists, then purge it.
    ///
    /// # Errors
    ///
    /// Fails when the root folder is missing or cannot be enumerated.
    pub fn run(&self, root: &str, stats: &mut RunStats) -> Result<()> {
        let operation = format!("check folder '{root}'");
        let exists = self
            .retry
            .execute(&operation, || self.remote.folder_exists(root))
            .map_err(|e| SweepError::remote(&operation, e))?;

        if !exists {
            return Err(SweepError::FolderNotFound(root.to_string()));
        }

        self.process(root, stats)
    }

    /// Purge one folder and, if the policy says so, its subfolders.
    ///
    /// # Errors
    ///
    /// Fails when the files or subfolders of `folder` cannot be listed.
    pub fn process(&self, folder: &str, stats: &mut RunStats) -> Result<()> {
        stats.record_folder();
        info!("Processing folder '{folder}'");

        let operation = format!("list files in '{folder}'");
        let files = self
            .retry
            .execute(&operation, || self.remote.list_files(folder))
            .map_err(|e| SweepError::remote(&operation, e))?;

        for file in &files {
            stats.record_file_scanned();

            if self.policy.is_excluded(file) {
                debug!("Skipping excluded file '{}'", file.name);
                continue;
            }

            if let Err(err) = self.process_file(folder, file, stats) {
                stats.record_error();
                error!("Failed to process file '{}': {}", file.name, error_chain(&err));
            }
        }

        if !self.policy.recurse() {
            return Ok(());
        }

        let operation = format!("list subfolders of '{folder}'");
        let subfolders = self
            .retry
            .execute(&operation, || self.remote.list_subfolders(folder))
            .map_err(|e| SweepError::remote(&operation, e))?;

        for subfolder in &subfolders {
            let path = paths::subfolder_path(self.remote.site_path(), folder, subfolder);
            if let Err(err) = self.process(&path, stats) {
                stats.record_error();
                error!("Failed to process folder '{path}': {}", error_chain(&err));
            }
        }

        Ok(())
    }

    fn process_file(
        &self,
        folder: &str,
        file: &FileDescriptor,
        stats: &mut RunStats,
    ) -> std::result::Result<(), RemoteError> {
        let url = paths::file_url(self.remote.site_path(), folder, file);

        let versions = self
            .retry
            .execute(&format!("get versions of '{url}'"), || {
                self.remote.get_versions(&url)
            })?;

        if versions.len() <= 1 {
            stats.record_file_without_versions();
            debug!("'{}' has no version history", file.name);
            return Ok(());
        }

        let to_delete = select_versions_for_removal(&versions, self.policy, self.now);
        if to_delete.is_empty() {
            debug!(
                "'{}' has no versions older than {} days",
                file.name,
                self.policy.max_age_days()
            );
            return Ok(());
        }

        if let Some(latest) = latest_version(&versions) {
            info!(
                "'{}': keeping version {} ({}), removing {} older version(s)",
                file.name,
                latest.label,
                latest.created_at.to_rfc3339(),
                to_delete.len()
            );
        }

        for version in to_delete {
            if self.dry_run {
                info!(
                    "[dry run] Would delete version {} ({}) of '{}'",
                    version.label,
                    version.created_at.to_rfc3339(),
                    file.name
                );
                stats.record_version_removed();
                continue;
            }

            let operation = format!("delete version {} of '{url}'", version.label);
            match self
                .retry
                .execute(&operation, || self.remote.delete_version(&url, &version.id))
            {
                Ok(()) => {
                    stats.record_version_removed();
                    debug!("Deleted version {} of '{}'", version.label, file.name);
                }
                Err(err) => {
                    stats.record_error();
                    warn!(
                        "Failed to delete version {} of '{}': {err}",
                        version.label, file.name
                    );
                }
            }
        }

        Ok(())
    }
}
