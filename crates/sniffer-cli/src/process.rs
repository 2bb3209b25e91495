//! File discovery and per-file processing for sniffer

use anyhow::{Context, Result};
use sniffer_core::{logging, CheckReport, Runner};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Files found on disk and arguments that did not exist
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

/// Collect the `.php` files named by or below the given paths
///
/// Files named explicitly are always kept; files found while walking a
/// directory are subject to the config's exclude patterns.
pub fn discover_files(paths: &[PathBuf], config: &Config) -> Discovery {
    let mut discovery = Discovery::default();

    for path in paths {
        if path.is_file() {
            discovery.files.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
            {
                let file_path = entry.path();
                if !config.should_exclude(file_path) {
                    discovery.files.push(file_path.to_path_buf());
                }
            }
        } else {
            discovery.missing.push(path.clone());
        }
    }

    discovery.files.sort();
    discovery.files.dedup();
    discovery
}

/// Result of processing a single file
pub struct ProcessResult {
    /// Diagnostics still present after processing
    pub report: CheckReport,
    /// Original source code
    pub old_source: String,
    /// Fixed source code (fix mode only, when anything changed)
    pub new_source: Option<String>,
    /// Changesets committed in fix mode
    pub fixes_applied: usize,
    /// Whether the fix loop settled before the pass ceiling
    pub converged: bool,
}

/// Check or fix a single PHP file without writing it
pub fn process_file(path: &Path, runner: &mut Runner, fix_mode: bool) -> Result<ProcessResult> {
    let source_code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let display = path.display().to_string();

    let result = if fix_mode {
        let fixed = runner.fix(&display, &source_code);
        let new_source = fixed.changed().then_some(fixed.source);
        ProcessResult {
            report: fixed.remaining,
            old_source: source_code,
            new_source,
            fixes_applied: fixed.fixes_applied,
            converged: fixed.converged,
        }
    } else {
        ProcessResult {
            report: runner.check(&display, &source_code),
            old_source: source_code,
            new_source: None,
            fixes_applied: 0,
            converged: true,
        }
    };

    logging::log_file_summary(
        &display,
        result.report.error_count(),
        result.report.warning_count(),
        result.report.fixable_count(),
    );

    Ok(result)
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_rules::RuleRegistry;
    use std::fs;
    use tempfile::TempDir;

    fn runner() -> Runner {
        Runner::new(RuleRegistry::default_ruleset())
    }

    #[test]
    fn test_discover_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::create_dir_all(temp.path().join("vendor/lib")).unwrap();
        fs::write(temp.path().join("src/A.php"), "<?php\n").unwrap();
        fs::write(temp.path().join("src/notes.txt"), "").unwrap();
        fs::write(temp.path().join("vendor/lib/B.php"), "<?php\n").unwrap();

        let config: Config = toml::from_str("[paths]\nexclude = [\"vendor/\"]\n").unwrap();
        let missing = temp.path().join("nope");
        let discovery = discover_files(&[temp.path().to_path_buf(), missing.clone()], &config);

        assert_eq!(discovery.files, vec![temp.path().join("src/A.php")]);
        assert_eq!(discovery.missing, vec![missing]);
    }

    #[test]
    fn test_check_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        let source = "<?php\n$a = array(\n    1\n);\n";
        fs::write(&path, source).unwrap();

        let result = process_file(&path, &mut runner(), false).unwrap();
        assert_eq!(result.report.fixable_count(), 1);
        assert!(result.new_source.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
    }

    #[test]
    fn test_fix_produces_new_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        fs::write(&path, "<?php\n$a = array(\n    1\n);\n").unwrap();

        let result = process_file(&path, &mut runner(), true).unwrap();
        assert_eq!(result.fixes_applied, 1);
        assert!(result.converged);
        assert!(result.report.is_clean());
        assert_eq!(
            result.new_source.as_deref(),
            Some("<?php\n$a = array(\n    1,\n);\n")
        );

        write_file(&path, result.new_source.as_deref().unwrap()).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<?php\n$a = array(\n    1,\n);\n"
        );
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = process_file(&temp.path().join("missing.php"), &mut runner(), false)
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("Failed to read file"));
    }
}
