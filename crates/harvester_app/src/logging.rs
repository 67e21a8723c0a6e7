//! Logging initialization for the `harvester` binary.
//!
//! Logs go to stderr, keeping stdout for results, and to `<log dir>/harvester.log`.
//! The file is rotated at startup once it reaches `MAX_LOG_BYTES`, keeping
//! `LOG_BACKUPS` older files as `harvester.log.1` (newest) and up.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILENAME: &str = "harvester.log";
const MAX_LOG_BYTES: u64 = 1_000_000;
const LOG_BACKUPS: usize = 5;

/// Chatty dependency targets kept out of `--verbose` output.
const QUIET_TARGETS: &[&str] = &["hyper", "reqwest", "rustls", "html5ever", "selectors"];

pub fn initialize(verbose: bool, log_dir: &Path) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));
    if let Some(file_logger) = create_file_logger(level, config, log_dir) {
        loggers.push(file_logger);
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error);
    for target in QUIET_TARGETS.iter().copied() {
        builder.add_filter_ignore_str(target);
    }
    builder.build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_dir: &Path,
) -> Option<Box<WriteLogger<File>>> {
    let log_path = log_dir.join(LOG_FILENAME);
    let file = fs::create_dir_all(log_dir)
        .and_then(|()| rotate_if_full(&log_path, MAX_LOG_BYTES, LOG_BACKUPS))
        .and_then(|()| File::options().create(true).append(true).open(&log_path));
    match file {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not open log file at {:?}: {}", log_path, err);
            None
        }
    }
}

fn backup_path(log_path: &Path, index: usize) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Shifts `log.1 .. log.{backups-1}` up by one and moves a full `log` to `log.1`.
/// The oldest backup is overwritten.
fn rotate_if_full(log_path: &Path, max_bytes: u64, backups: usize) -> io::Result<()> {
    let len = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if len < max_bytes {
        return Ok(());
    }
    if backups == 0 {
        return fs::remove_file(log_path);
    }
    for index in (1..backups).rev() {
        let from = backup_path(log_path, index);
        if from.exists() {
            fs::rename(&from, backup_path(log_path, index + 1))?;
        }
    }
    fs::rename(log_path, backup_path(log_path, 1))
}
