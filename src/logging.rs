//! Log sink setup.
//!
//! All output goes through the `log` facade. [`init_logging`] installs a
//! `simplelog` logger that always writes timestamped, leveled lines to
//! stderr and optionally mirrors them to a file.

use std::fs::{File, OpenOptions};
use std::path::Path;

use log::{LevelFilter, warn};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::error::{Result, SweepError, error_chain};

/// Map `-v`/`-q` flags to a level filter.
///
/// Quiet keeps warnings and errors, the default is INFO, one `-v` enables
/// DEBUG and two or more enable TRACE.
pub fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .add_filter_allow_str("version_sweep")
        .build()
}

fn open_log_file(path: &Path) -> Result<File> {
    let io_error = |source| SweepError::IoError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)
}

/// Install the global logger.
///
/// A log file that cannot be opened is reported as a warning and the run
/// continues with console output only. Installing a second logger in the same
/// process is a no-op.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) {
    let level = level_filter(verbose, quiet);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let mut file_error = None;
    if let Some(path) = log_file {
        match open_log_file(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, log_config(), file)),
            Err(err) => file_error = Some(err),
        }
    }

    if CombinedLogger::init(loggers).is_err() {
        return;
    }

    if let Some(err) = file_error {
        warn!("{}; logging to console only", error_chain(&err));
    }
}
