//! Check and fix runs over a single source text
//!
//! A fix run repeats tokenize-dispatch-commit until a pass commits no
//! changeset or the pass ceiling is reached, then reports what a final
//! check-only pass still finds.

use crate::fixer::Fixer;
use crate::logging;
use crate::report::{Diagnostic, Metric, Reporter};
use crate::ruleset::Ruleset;
use crate::stream::TokenStream;

/// Default ceiling on fix passes per file
pub const DEFAULT_MAX_PASSES: usize = 50;

/// Result of a check-only pass
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub diagnostics: Vec<Diagnostic>,
    pub metrics: Vec<Metric>,
}

impl CheckReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == crate::report::Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.fixable).count()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Result of a fix run
#[derive(Debug, Clone)]
pub struct FixReport {
    /// The fixed source text
    pub source: String,
    /// Number of fix passes run
    pub passes: usize,
    /// Number of changesets committed across all passes
    pub fixes_applied: usize,
    /// Whether the last pass committed nothing
    pub converged: bool,
    /// Diagnostics remaining in the fixed source
    pub remaining: CheckReport,
}

impl FixReport {
    pub fn changed(&self) -> bool {
        self.fixes_applied > 0
    }
}

/// Runs a ruleset over source texts
pub struct Runner {
    ruleset: Ruleset,
    max_passes: usize,
}

impl Runner {
    pub fn new(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Set the fix pass ceiling (at least one pass always runs)
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// One check-only pass
    pub fn check(&mut self, path: &str, source: &str) -> CheckReport {
        logging::log_pass_start(path, 1, false);

        let tokens = TokenStream::tokenize(source);
        let mut reporter = Reporter::new();
        let mut fixer = Fixer::new(&tokens, false);
        self.ruleset
            .process(path, &tokens, &mut reporter, &mut fixer);

        reporter.sort();
        let (diagnostics, metrics) = reporter.into_parts();
        CheckReport {
            diagnostics,
            metrics,
        }
    }

    /// Fix until convergence or the pass ceiling
    pub fn fix(&mut self, path: &str, source: &str) -> FixReport {
        let mut current = source.to_string();
        let mut passes = 0;
        let mut fixes_applied = 0;
        let mut converged = false;

        while passes < self.max_passes {
            passes += 1;
            logging::log_pass_start(path, passes, true);

            let tokens = TokenStream::tokenize(&current);
            let mut reporter = Reporter::new();
            let mut fixer = Fixer::new(&tokens, true);
            self.ruleset
                .process(path, &tokens, &mut reporter, &mut fixer);

            if fixer.rejected_count() > 0 {
                logging::log(&format!(
                    "{}: {} changeset(s) rejected in pass {}",
                    path,
                    fixer.rejected_count(),
                    passes
                ));
            }

            if fixer.fix_count() == 0 {
                converged = true;
                break;
            }

            fixes_applied += fixer.fix_count();
            current = fixer.contents();
        }

        logging::log_fix_result(path, passes, fixes_applied, converged);

        let remaining = self.check(path, &current);
        FixReport {
            source: current,
            passes,
            fixes_applied,
            converged,
            remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniff::{Pass, Sniff};
    use crate::token::TokenKind;

    /// Appends a semicolon to variables that lack one
    struct Semicolons;

    impl Sniff for Semicolons {
        fn name(&self) -> &'static str {
            "semicolons"
        }
        fn code(&self) -> &'static str {
            "Test.Semicolons"
        }
        fn description(&self) -> &'static str {
            "Variables must be followed by a semicolon"
        }
        fn register(&self) -> &'static [TokenKind] {
            &[TokenKind::Variable]
        }
        fn process(&mut self, pass: &mut Pass<'_>, ptr: usize) {
            let next = pass.tokens.get(ptr + 1).map(|t| t.kind);
            if next == Some(TokenKind::Semicolon) {
                return;
            }
            if pass.add_fixable_error("Missing semicolon", ptr, "Missing") {
                pass.fixer.begin_changeset();
                let _ = pass.fixer.add_content(ptr, ";");
                let _ = pass.fixer.end_changeset();
            }
        }
    }

    /// Flips a variable name on every pass and never settles
    struct Flipper;

    impl Sniff for Flipper {
        fn name(&self) -> &'static str {
            "flipper"
        }
        fn code(&self) -> &'static str {
            "Test.Flipper"
        }
        fn description(&self) -> &'static str {
            "Never converges"
        }
        fn register(&self) -> &'static [TokenKind] {
            &[TokenKind::Variable]
        }
        fn process(&mut self, pass: &mut Pass<'_>, ptr: usize) {
            let flipped = if pass.tokens[ptr].text == "$a" { "$b" } else { "$a" };
            if pass.add_fixable_error("Flip", ptr, "Flip") {
                let _ = pass.fixer.replace_token(ptr, flipped);
            }
        }
    }

    fn runner(sniff: Box<dyn Sniff>) -> Runner {
        let mut ruleset = Ruleset::new();
        ruleset.register(sniff);
        Runner::new(ruleset)
    }

    #[test]
    fn test_check_leaves_source_alone() {
        let mut runner = runner(Box::new(Semicolons));
        let report = runner.check("a.php", "<?php $a $b;");
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.fixable_count(), 1);
        assert_eq!(report.diagnostics[0].code, "Test.Semicolons.Missing");
    }

    #[test]
    fn test_fix_converges() {
        let mut runner = runner(Box::new(Semicolons));
        let report = runner.fix("a.php", "<?php $a $b");
        assert_eq!(report.source, "<?php $a; $b;");
        assert!(report.converged);
        assert_eq!(report.passes, 2);
        assert_eq!(report.fixes_applied, 2);
        assert!(report.remaining.is_clean());
    }

    #[test]
    fn test_fix_stops_at_ceiling() {
        let mut runner = runner(Box::new(Flipper)).with_max_passes(3);
        let report = runner.fix("a.php", "<?php $a;");
        assert!(!report.converged);
        assert_eq!(report.passes, 3);
        assert_eq!(report.source, "<?php $b;");
        assert_eq!(report.remaining.diagnostics.len(), 1);
    }

    #[test]
    fn test_clean_source_converges_in_one_pass() {
        let mut runner = runner(Box::new(Semicolons));
        let report = runner.fix("a.php", "<?php $a;");
        assert!(report.converged);
        assert_eq!(report.passes, 1);
        assert!(!report.changed());
    }
}
