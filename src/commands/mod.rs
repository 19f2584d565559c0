//! Implementation of the version-sweep command.
//!
//! `mod.rs` wires the parsed CLI to the purge engine: it installs logging,
//! builds the purge configuration and connects to the site. The run itself
//! lives in [`purge`].

use crate::cli::Cli;
use crate::error::Result;
use crate::logging::init_logging;
use crate::purge::RunStats;
use crate::remote::SharePointClient;
use crate::retry::Retry;

pub(crate) mod purge;

pub use purge::{Purge, PurgeBuilder};

/// Execute a purge run based on the parsed CLI arguments.
///
/// # Errors
///
/// Fails when the session cannot be established or the root folder cannot be
/// enumerated. Per-file and per-version failures are only counted.
pub fn execute(cli: &Cli) -> Result<()> {
    init_logging(cli.verbose(), cli.quiet(), cli.log_file());

    let purge = Purge::builder()
        .folder(cli.folder())
        .policy(cli.purge_policy())
        .dry_run(cli.dry_run())
        .retry(Retry::for_remote().max_retries(cli.max_retries()).build())
        .build()?;

    let mut stats = RunStats::start();
    purge.run(
        || {
            SharePointClient::builder()
                .site_url(cli.site_url())
                .access_token(cli.access_token())
                .timeout(cli.timeout())
                .build()
        },
        &mut stats,
    )
}
