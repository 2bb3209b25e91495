//! sniffer CLI - PHP coding standard checker
//!
//! Available rules:
//! - class_comment: Classes need a doc comment without @package or @subpackage tags
//! - function_comment: Public functions need a doc comment whose @return tag matches the body
//! - method_visibility_order: Methods ordered public, protected, private
//! - property_and_method_order: Class properties declared before methods
//! - multi_line_array_comma: Trailing comma after the last item of a multi-line array

mod config;
mod output;
mod process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

use config::Config;
use output::{print_unified_diff, OutputFormat, Reporter};
use process::{discover_files, process_file, write_file};
use sniffer_core::{logging, Runner, DEFAULT_MAX_PASSES};
use sniffer_rules::RuleRegistry;

#[derive(Parser)]
#[command(name = "sniffer")]
#[command(version)]
#[command(about = "Check PHP sources against the Symfony coding standard")]
struct Cli {
    /// Files or directories to process
    #[arg(required_unless_present = "list_rules")]
    paths: Vec<PathBuf>,

    /// Apply fixes to files
    #[arg(long)]
    fix: bool,

    /// Print the fixes as a unified diff instead of writing files
    #[arg(long, requires = "fix")]
    diff: bool,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Rules to run (can be specified multiple times). Overrides config file.
    #[arg(long, short = 'r', value_name = "RULE")]
    rule: Vec<String>,

    /// Output format: text, json, github
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Path to config file (default: auto-detect .sniffer.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// Write a debug log to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let registry = RuleRegistry::new();

    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        for info in registry.list_rules() {
            println!("  {} - {}", info.name.green(), info.description);
            println!("    {}", info.code.dimmed());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        Config::default()
    } else if let Some(config_path) = &cli.config {
        Config::load_path(config_path)?
    } else {
        Config::load()?.map(|(cfg, _)| cfg).unwrap_or_default()
    };

    let format_name = cli
        .format
        .as_deref()
        .or(config.output.format.as_deref())
        .unwrap_or("text");
    let output_format = OutputFormat::from_str(format_name).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid output format '{}'. Valid options: text, json, github",
            format_name
        )
    })?;
    let text = output_format == OutputFormat::Text;

    if let Some(log_path) = &cli.log_file {
        let path = logging::init_logger(Some(log_path.as_path()))
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        if cli.verbose && text {
            println!("{}: {}", "Logging to".bold(), path.display());
        }
    }

    let all_rules = registry.all_names();

    for rule in &cli.rule {
        if !registry.contains(rule) {
            eprintln!(
                "{}: Unknown rule '{}'. Use --list-rules to see available rules.",
                "Error".red(),
                rule
            );
            return Ok(ExitCode::from(1));
        }
    }
    for rule in config.unknown_rules(&all_rules) {
        eprintln!("{}: Unknown rule '{}' in config", "Warning".yellow(), rule);
    }

    let enabled_rules = config.effective_rules(&all_rules, &cli.rule);
    if enabled_rules.is_empty() {
        eprintln!("{}: No rules enabled", "Error".red());
        return Ok(ExitCode::from(1));
    }

    let max_passes = config.fixer.max_passes.unwrap_or(DEFAULT_MAX_PASSES);
    let mut runner = Runner::new(registry.into_ruleset(&enabled_rules)).with_max_passes(max_passes);
    let rule_names = runner.ruleset().names();

    if cli.verbose && text {
        println!("{}: {}", "Mode".bold(), if cli.fix { "fix" } else { "check" });
        println!("{}: {}", "Rules".bold(), rule_names.join(", "));
        println!();
    }

    let discovery = discover_files(&cli.paths, &config);
    for path in &discovery.missing {
        eprintln!(
            "{}: Path does not exist: {}",
            "Warning".yellow(),
            path.display()
        );
    }

    logging::log_run_start(discovery.files.len(), &rule_names);

    let mut reporter = Reporter::new(output_format, cli.verbose);
    for path in &discovery.files {
        let result = match process_file(path, &mut runner, cli.fix) {
            Ok(result) => result,
            Err(e) => {
                reporter.report_error(path, &format!("{:#}", e));
                continue;
            }
        };

        if !result.converged && text {
            eprintln!(
                "{}: {} did not settle after {} fix passes",
                "Warning".yellow(),
                path.display(),
                runner.max_passes()
            );
        }

        if let Some(new_source) = &result.new_source {
            if cli.diff {
                print_unified_diff(path, &result.old_source, new_source);
            } else if let Err(e) = write_file(path, new_source) {
                reporter.report_error(path, &format!("{:#}", e));
                continue;
            }
        }

        reporter.report_file(path, &result.report.diagnostics, result.fixes_applied);
    }

    let summary = reporter.summary();
    let exit_code = if summary.errors + summary.warnings + summary.failures > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    };
    logging::log_run_complete(summary.errors, summary.warnings, summary.files_fixed);

    reporter.finish(cli.fix);

    Ok(exit_code)
}
