use std::time::{Duration, Instant};

use log::info;

/// Counters for a single purge run.
///
/// Counters only ever go up. The walker updates them while it traverses; the
/// command reads them once at the end via [`RunStats::report`].
#[derive(Debug, Clone)]
pub struct RunStats {
    folders_visited: u64,
    files_scanned: u64,
    files_without_versions: u64,
    versions_removed: u64,
    errors: u64,
    started: Instant,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::start()
    }
}

impl RunStats {
    /// Fresh counters, with the clock started now
    pub fn start() -> Self {
        Self {
            folders_visited: 0,
            files_scanned: 0,
            files_without_versions: 0,
            versions_removed: 0,
            errors: 0,
            started: Instant::now(),
        }
    }

    pub fn folders_visited(&self) -> u64 {
        self.folders_visited
    }

    pub fn files_scanned(&self) -> u64 {
        self.files_scanned
    }

    pub fn files_without_versions(&self) -> u64 {
        self.files_without_versions
    }

    pub fn versions_removed(&self) -> u64 {
        self.versions_removed
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn record_folder(&mut self) {
        self.folders_visited += 1;
    }

    pub(crate) fn record_file_scanned(&mut self) {
        self.files_scanned += 1;
    }

    pub(crate) fn record_file_without_versions(&mut self) {
        self.files_without_versions += 1;
    }

    pub(crate) fn record_version_removed(&mut self) {
        self.versions_removed += 1;
    }

    pub(crate) fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Summary lines, in reporting order
    pub fn summary_lines(&self, dry_run: bool) -> Vec<String> {
        let removed_label = if dry_run {
            "Versions to remove"
        } else {
            "Versions removed"
        };

        let mut lines = vec![
            "Version purge complete:".to_string(),
            format!("  Folders visited: {}", self.folders_visited),
            format!("  Files scanned: {}", self.files_scanned),
            format!(
                "  Files with no purgeable versions: {}",
                self.files_without_versions
            ),
            format!("  {removed_label}: {}", self.versions_removed),
            format!("  Errors: {}", self.errors),
            format!("  Elapsed: {}", format_elapsed(self.elapsed())),
        ];

        if dry_run {
            lines.push("  (DRY RUN - no versions were actually deleted)".to_string());
        }

        lines
    }

    /// Log the end-of-run summary at INFO
    pub fn report(&self, dry_run: bool) {
        for line in self.summary_lines(dry_run) {
            info!("{line}");
        }
    }
}

/// Format a duration as `1h 02m 03s`, `4m 05s` or `6.7s`
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}
