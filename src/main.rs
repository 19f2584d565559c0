//! # version-sweep CLI
//!
//! Purges obsolete file-version history from a document library. The newest
//! version of every file is always kept; optionally only versions older than
//! a number of days are deleted.
//!
//! ## Quick Start
//!
//! ```bash
//! # See what would be removed
//! version-sweep --site-url https://contoso.sharepoint.com/sites/team \
//!     --folder "Shared Documents" --access-token "$TOKEN" --recurse --dry-run
//!
//! # Remove versions older than 90 days, skipping OneNote files
//! version-sweep --site-url https://contoso.sharepoint.com/sites/team \
//!     --folder "Shared Documents" --access-token "$TOKEN" --recurse \
//!     --max-age-days 90 --exclude-note-files --log-file purge.log
//! ```
//!
//! ## Environment Variables
//!
//! Every flag has a `VERSION_SWEEP_*` counterpart, e.g.
//! `VERSION_SWEEP_SITE_URL`, `VERSION_SWEEP_ACCESS_TOKEN`,
//! `VERSION_SWEEP_MAX_AGE_DAYS`, `VERSION_SWEEP_DRY_RUN`.
//!
//! ## Exit Status
//!
//! Non-zero only when the run itself failed (session setup, missing root
//! folder, root listing). Failures on individual files or versions are
//! counted in the summary.

use std::io::IsTerminal;

use version_sweep::cli::Cli;

fn main() -> miette::Result<()> {
    miette::set_panic_hook();

    // Plain output when stderr is not a terminal (CI, log capture)
    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = Cli::parse_args();

    version_sweep::commands::execute(&cli).map_err(Into::into)
}
