//! The rule trait and the per-invocation context handed to rules

use crate::fixer::Fixer;
use crate::report::{Diagnostic, Reporter, Severity};
use crate::stream::TokenStream;
use crate::token::TokenKind;

/// Identity of the file a pass runs over
///
/// The generation changes on every pass, so a fix pass over the same path
/// is a new file as far as per-file rule state is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub path: String,
    pub generation: u64,
}

/// A rule that inspects the token stream
pub trait Sniff: Send {
    /// The unique identifier for this rule (e.g., "class_comment")
    fn name(&self) -> &'static str;

    /// Code prefix of the diagnostics it raises (e.g., "Symfony.Commenting.ClassComment")
    fn code(&self) -> &'static str;

    /// A short description of what this rule checks
    fn description(&self) -> &'static str;

    /// Token kinds this rule wants to be invoked for
    fn register(&self) -> &'static [TokenKind];

    /// Process the token at `ptr`
    fn process(&mut self, pass: &mut Pass<'_>, ptr: usize);
}

/// Everything a rule may touch while processing one token
pub struct Pass<'a> {
    pub file: &'a FileIdentity,
    pub tokens: &'a TokenStream,
    pub fixer: &'a mut Fixer,
    reporter: &'a mut Reporter,
    code_prefix: &'static str,
}

impl<'a> Pass<'a> {
    pub fn new(
        file: &'a FileIdentity,
        tokens: &'a TokenStream,
        reporter: &'a mut Reporter,
        fixer: &'a mut Fixer,
        code_prefix: &'static str,
    ) -> Self {
        Self {
            file,
            tokens,
            fixer,
            reporter,
            code_prefix,
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>, anchor: usize, code: &str) {
        self.add(message.into(), anchor, code, Severity::Error, false);
    }

    pub fn add_warning(&mut self, message: impl Into<String>, anchor: usize, code: &str) {
        self.add(message.into(), anchor, code, Severity::Warning, false);
    }

    /// Record a fixable error
    ///
    /// Returns true when the caller should go on and stage its fix.
    pub fn add_fixable_error(&mut self, message: impl Into<String>, anchor: usize, code: &str) -> bool {
        self.add(message.into(), anchor, code, Severity::Error, true);
        self.fixer.is_enabled()
    }

    pub fn record_metric(&mut self, anchor: usize, name: &str, value: &str) {
        self.reporter.record_metric(anchor, name, value);
    }

    fn add(&mut self, message: String, anchor: usize, code: &str, severity: Severity, fixable: bool) {
        let (line, column) = self
            .tokens
            .get(anchor)
            .map_or((0, 0), |t| (t.line, t.column));

        self.reporter.add(Diagnostic {
            code: format!("{}.{}", self.code_prefix, code),
            message,
            severity,
            anchor,
            line,
            column,
            fixable,
        });
    }
}
