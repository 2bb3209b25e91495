//! Output formatting for sniffer
//!
//! Supports text (colored terminal), JSON and GitHub Actions annotations.

use colored::*;
use serde::Serialize;
use sniffer_core::{Diagnostic, Severity};
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Github,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "github" => Some(OutputFormat::Github),
            _ => None,
        }
    }
}

/// A single reported message
#[derive(Debug, Clone, Serialize)]
pub struct MessageInfo {
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub fixable: bool,
}

impl From<&Diagnostic> for MessageInfo {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            line: diagnostic.line,
            column: diagnostic.column,
            severity: diagnostic.severity,
            code: diagnostic.code.clone(),
            message: diagnostic.message.clone(),
            fixable: diagnostic.fixable,
        }
    }
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageInfo>,
    #[serde(skip_serializing_if = "is_zero")]
    pub fixes_applied: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl FileResult {
    pub fn success(path: &Path, messages: Vec<MessageInfo>, fixes_applied: usize) -> Self {
        Self {
            path: path.display().to_string(),
            messages,
            fixes_applied,
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            messages: Vec::new(),
            fixes_applied: 0,
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_messages: usize,
    pub files_fixed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub fixable: usize,
    pub fixes_applied: usize,
    /// Files that could not be processed
    pub failures: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub generated_at: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report the diagnostics of one file, plus the fixes applied to it
    pub fn report_file(&mut self, path: &Path, diagnostics: &[Diagnostic], fixes_applied: usize) {
        self.summary.files_processed += 1;
        self.summary.fixes_applied += fixes_applied;
        if fixes_applied > 0 {
            self.summary.files_fixed += 1;
        }

        let messages: Vec<MessageInfo> = diagnostics.iter().map(MessageInfo::from).collect();
        if !messages.is_empty() {
            self.summary.files_with_messages += 1;
        }
        for message in &messages {
            match message.severity {
                Severity::Error => self.summary.errors += 1,
                Severity::Warning => self.summary.warnings += 1,
            }
            if message.fixable {
                self.summary.fixable += 1;
            }
        }

        match self.format {
            OutputFormat::Text => print_text(path, &messages, fixes_applied, self.verbose),
            OutputFormat::Github => {
                for message in &messages {
                    println!("{}", github_annotation(path, message));
                }
            }
            OutputFormat::Json => {
                // JSON output is handled in finish()
            }
        }

        self.results
            .push(FileResult::success(path, messages, fixes_applied));
    }

    /// Report an error processing a file
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.failures += 1;

        match self.format {
            OutputFormat::Text => {
                eprintln!("{}: {} - {}", "Warning".yellow(), path.display(), error);
            }
            OutputFormat::Github => {
                println!("::error file={}::{}", path.display(), escape_annotation(error));
            }
            OutputFormat::Json => {}
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Print final summary/output
    pub fn finish(self, fix_mode: bool) {
        match self.format {
            OutputFormat::Text => {
                let summary = &self.summary;
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", summary.files_processed);
                println!(
                    "  Found {} error(s) and {} warning(s) in {} file(s)",
                    summary.errors, summary.warnings, summary.files_with_messages
                );
                if fix_mode {
                    println!(
                        "  Applied {} fix(es) to {} file(s)",
                        summary.fixes_applied, summary.files_fixed
                    );
                }
                if summary.failures > 0 {
                    println!("  Files with errors: {}", summary.failures);
                }

                if !fix_mode && summary.fixable > 0 {
                    println!();
                    println!(
                        "{}",
                        format!(
                            "{} violation(s) marked [x] can be fixed with --fix",
                            summary.fixable
                        )
                        .yellow()
                    );
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    generated_at: chrono::Local::now().to_rfc3339(),
                    summary: self.summary,
                    files: self.results,
                };
                match serde_json::to_string_pretty(&output) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("{}: {}", "Error".red(), e),
                }
            }
            OutputFormat::Github => {
                // Annotations are printed per file
            }
        }
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

fn print_text(path: &Path, messages: &[MessageInfo], fixes_applied: usize, verbose: bool) {
    if messages.is_empty() && fixes_applied == 0 {
        if verbose {
            println!("{}: No violations", path.display());
        }
        return;
    }

    println!("{}", path.display().to_string().bold());
    if fixes_applied > 0 {
        println!("  {} Applied {} fix(es)", "OK".green(), fixes_applied);
    }
    for message in messages {
        println!("  {}", text_line(message));
    }
    println!();
}

/// One text-format line: position, severity, fixable marker, message and code
fn text_line(message: &MessageInfo) -> String {
    let severity = match message.severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warning => "WARNING".yellow().bold(),
    };
    let marker = if message.fixable { "[x]" } else { "[ ]" };
    format!(
        "{:>4}:{:<3} | {} | {} {} ({})",
        message.line,
        message.column,
        severity,
        marker,
        message.message,
        message.code.dimmed()
    )
}

fn github_annotation(path: &Path, message: &MessageInfo) -> String {
    let level = match message.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    format!(
        "::{} file={},line={},col={},title={}::{}",
        level,
        path.display(),
        message.line,
        message.column,
        message.code,
        escape_annotation(&message.message)
    )
}

/// Escape annotation data the way the GitHub workflow command parser expects
fn escape_annotation(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Print unified diff format (standard diff -u compatible)
pub fn print_unified_diff(path: &Path, old: &str, new: &str) {
    print!("{}", unified_diff(path, old, new));
}

fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(old, new);
    let path_str = path.display().to_string();
    let mut out = format!("--- a/{}\n+++ b/{}\n", path_str, path_str);

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        out.push_str(&format!("{}\n", hunk.header()));
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            out.push_str(&format!("{}{}", sign, change));
            if change.missing_newline() {
                out.push('\n');
            }
        }
    }

    out
}
