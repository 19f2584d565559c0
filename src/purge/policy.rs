use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};

use crate::remote::FileDescriptor;

/// Extensions of note-taking files, skipped when `exclude_note_files` is set
pub const NOTE_FILE_EXTENSIONS: &[&str] = &["one", "onetoc2"];

/// Which versions are eligible for deletion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgePolicy {
    /// Descend into subfolders
    recurse: bool,
    /// Only delete versions older than this many days (0 = no age filter)
    max_age_days: u32,
    /// Lower-cased extensions (without the dot) of files to skip
    excluded_extensions: BTreeSet<String>,
}

impl PurgePolicy {
    /// Creates a new builder for [`PurgePolicy`]
    pub fn builder() -> PurgePolicyBuilder {
        PurgePolicyBuilder::default()
    }

    /// Check if subfolders are processed
    pub fn recurse(&self) -> bool {
        self.recurse
    }

    /// Get the age threshold in days
    pub fn max_age_days(&self) -> u32 {
        self.max_age_days
    }

    /// Get the excluded extensions
    pub fn excluded_extensions(&self) -> &BTreeSet<String> {
        &self.excluded_extensions
    }

    /// Whether `file` is skipped entirely
    pub fn is_excluded(&self, file: &FileDescriptor) -> bool {
        file.extension()
            .is_some_and(|ext| self.excluded_extensions.contains(&ext))
    }

    /// Cutoff instant for the age filter, `None` when the filter is disabled.
    ///
    /// Versions created strictly before the cutoff are eligible.
    pub fn age_threshold(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.max_age_days == 0 {
            return None;
        }
        let age = TimeDelta::days(i64::from(self.max_age_days));
        Some(now.checked_sub_signed(age).unwrap_or(DateTime::<Utc>::MIN_UTC))
    }
}

/// Builder for [`PurgePolicy`]
#[derive(Debug, Default)]
pub struct PurgePolicyBuilder {
    recurse: bool,
    max_age_days: u32,
    excluded_extensions: BTreeSet<String>,
}

impl PurgePolicyBuilder {
    /// Enable or disable recursion into subfolders
    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Set the age threshold in days (0 disables the age filter)
    pub fn max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    /// Skip files with this extension (leading dot and case are ignored)
    pub fn exclude_extension(mut self, extension: &str) -> Self {
        let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        if !ext.is_empty() {
            self.excluded_extensions.insert(ext);
        }
        self
    }

    /// Skip files with any of these extensions
    pub fn exclude_extensions<I, S>(self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extensions
            .into_iter()
            .fold(self, |builder, ext| builder.exclude_extension(ext.as_ref()))
    }

    /// Skip note-taking files ([`NOTE_FILE_EXTENSIONS`])
    pub fn exclude_note_files(self, enabled: bool) -> Self {
        if enabled {
            self.exclude_extensions(NOTE_FILE_EXTENSIONS)
        } else {
            self
        }
    }

    /// Build the [`PurgePolicy`]
    pub fn build(self) -> PurgePolicy {
        PurgePolicy {
            recurse: self.recurse,
            max_age_days: self.max_age_days,
            excluded_extensions: self.excluded_extensions,
        }
    }
}
