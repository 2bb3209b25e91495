//! File logging for sniffer runs
//!
//! A process-wide logger that is a no-op until `init_logger` is called.
//! Records configuration, pass starts, rejected changesets and fix
//! convergence so a run can be traced after the fact.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::fixer::FixerError;

/// Global logger instance
static LOGGER: Mutex<Option<SnifferLogger>> = Mutex::new(None);

/// Logger writing timestamped lines to a file
pub struct SnifferLogger {
    file: File,
    path: PathBuf,
}

impl SnifferLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self {
            file,
            path: log_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
///
/// Without a path, logs go to a timestamped file in the temp directory.
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(Path::to_path_buf).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        std::env::temp_dir().join(format!("sniffer-{}.log", timestamp))
    });

    let logger = SnifferLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log the start of a pass over a file
pub fn log_pass_start(path: &str, pass: usize, fixing: bool) {
    let mode = if fixing { "fix" } else { "check" };
    log(&format!("{}: pass {} ({})", path, pass, mode));
}

/// Log a changeset that was discarded
pub fn log_rejected_changeset(path: &str, rule: &str, error: &FixerError) {
    log(&format!("REJECTED: {} [{}] {}", path, rule, error));
}

/// Log the outcome of a fix run
pub fn log_fix_result(path: &str, passes: usize, fixes: usize, converged: bool) {
    if converged {
        log(&format!(
            "{}: converged after {} pass(es), {} fix(es) applied",
            path, passes, fixes
        ));
    } else {
        log(&format!(
            "{}: NOT converged after {} pass(es), {} fix(es) applied",
            path, passes, fixes
        ));
    }
}

/// Log per-file diagnostics summary
pub fn log_file_summary(path: &str, errors: usize, warnings: usize, fixable: usize) {
    log(&format!(
        "{}: {} error(s), {} warning(s), {} fixable",
        path, errors, warnings, fixable
    ));
}

/// Log run start
pub fn log_run_start(files_count: usize, rules: &[&str]) {
    section("RUN START");
    log(&format!("Processing {} files", files_count));
    log(&format!("Enabled rules: {}", rules.join(", ")));
}

/// Log run complete
pub fn log_run_complete(total_errors: usize, total_warnings: usize, files_fixed: usize) {
    section("RUN COMPLETE");
    log(&format!("Errors: {}", total_errors));
    log(&format!("Warnings: {}", total_warnings));
    log(&format!("Files fixed: {}", files_fixed));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_writes_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sniffer.log");

        let mut logger = SnifferLogger::new(&path).unwrap();
        logger.section("TITLE");
        logger.log("hello");
        assert_eq!(logger.path(), path.as_path());

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with('['));
        assert!(lines[1].ends_with("] TITLE"));
        assert!(lines[3].ends_with("] hello"));
    }
}
