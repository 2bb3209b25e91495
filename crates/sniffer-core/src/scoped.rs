//! Rules that fire only inside an enclosing scope
//!
//! A `ScopedRule` names the scope kinds it lives in and the tokens it
//! wants; `ScopedSniff` adapts it to the dispatcher. The adapter keeps
//! an explicit per-file context: rule state is reset whenever the file
//! identity or the enclosing scope changes, and tokens before the
//! skip-ahead pointer returned by the previous invocation are ignored.

use crate::scope::Scope;
use crate::sniff::{FileIdentity, Pass, Sniff};
use crate::token::{ScopeKind, TokenKind};

/// A rule applied to tokens nested inside a scope of a given kind
pub trait ScopedRule: Send {
    /// Per-scope state, created fresh for every file and every scope
    type State: Default + Send;

    fn name(&self) -> &'static str;

    fn code(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Scope kinds that enclose the tokens this rule processes
    fn scope_kinds(&self) -> &'static [ScopeKind];

    /// Token kinds to process inside those scopes
    fn listen(&self) -> &'static [TokenKind];

    /// Process `ptr` inside `scope`
    ///
    /// Returning `Some(end)` skips every later token before `end`.
    fn process_within_scope(
        &self,
        pass: &mut Pass<'_>,
        ptr: usize,
        scope: &Scope,
        state: &mut Self::State,
    ) -> Option<usize>;
}

/// Context of the scope currently being processed
#[derive(Debug)]
struct ScopeContext<S> {
    file: FileIdentity,
    scope_owner: usize,
    skip_until: Option<usize>,
    state: S,
}

/// Adapts a `ScopedRule` to the `Sniff` dispatcher interface
pub struct ScopedSniff<R: ScopedRule> {
    rule: R,
    context: Option<ScopeContext<R::State>>,
}

impl<R: ScopedRule> ScopedSniff<R> {
    pub fn new(rule: R) -> Self {
        Self {
            rule,
            context: None,
        }
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// The context for `scope` in the current file, resetting it if stale
    fn context_for<'c>(
        slot: &'c mut Option<ScopeContext<R::State>>,
        file: &FileIdentity,
        scope: &Scope,
    ) -> &'c mut ScopeContext<R::State> {
        let stale = slot
            .as_ref()
            .map_or(true, |c| c.file != *file || c.scope_owner != scope.owner);

        if stale {
            *slot = None;
        }

        slot.get_or_insert_with(|| ScopeContext {
            file: file.clone(),
            scope_owner: scope.owner,
            skip_until: None,
            state: R::State::default(),
        })
    }
}

impl<R: ScopedRule> Sniff for ScopedSniff<R> {
    fn name(&self) -> &'static str {
        self.rule.name()
    }

    fn code(&self) -> &'static str {
        self.rule.code()
    }

    fn description(&self) -> &'static str {
        self.rule.description()
    }

    fn register(&self) -> &'static [TokenKind] {
        self.rule.listen()
    }

    fn process(&mut self, pass: &mut Pass<'_>, ptr: usize) {
        let Some(scope) = pass.tokens.enclosing_scope(ptr, self.rule.scope_kinds()) else {
            return;
        };

        let context = Self::context_for(&mut self.context, pass.file, &scope);
        if context.skip_until.is_some_and(|end| ptr < end) {
            return;
        }

        context.skip_until = self
            .rule
            .process_within_scope(pass, ptr, &scope, &mut context.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixer::Fixer;
    use crate::report::Reporter;
    use crate::ruleset::Ruleset;
    use crate::stream::TokenStream;

    /// Reports every function and variable it sees, numbering them per scope
    struct Counter;

    impl ScopedRule for Counter {
        type State = usize;

        fn name(&self) -> &'static str {
            "counter"
        }
        fn code(&self) -> &'static str {
            "Test.Counter"
        }
        fn description(&self) -> &'static str {
            "Counts tokens per class"
        }
        fn scope_kinds(&self) -> &'static [ScopeKind] {
            &[ScopeKind::Class]
        }
        fn listen(&self) -> &'static [TokenKind] {
            &[TokenKind::Function, TokenKind::Variable]
        }
        fn process_within_scope(
            &self,
            pass: &mut Pass<'_>,
            ptr: usize,
            _scope: &Scope,
            seen: &mut usize,
        ) -> Option<usize> {
            *seen += 1;
            pass.add_error(format!("{} #{}", pass.tokens[ptr].text, seen), ptr, "Seen");
            if pass.tokens[ptr].kind == TokenKind::Function {
                return pass.tokens.declaration_end(ptr);
            }
            None
        }
    }

    fn run(ruleset: &mut Ruleset, source: &str) -> Vec<String> {
        let tokens = TokenStream::tokenize(source);
        let mut reporter = Reporter::new();
        let mut fixer = Fixer::new(&tokens, false);
        ruleset.process("a.php", &tokens, &mut reporter, &mut fixer);
        reporter
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    #[test]
    fn test_skip_ahead_and_scope_reset() {
        let mut ruleset = Ruleset::new();
        ruleset.register(Box::new(ScopedSniff::new(Counter)));

        let source = "<?php\n$outside = 1;\nclass A {\n    public $a;\n    function f($x) { $y = 1; }\n    abstract function g($z);\n    public $b;\n}\nclass B {\n    public $c;\n}\n";
        let messages = run(&mut ruleset, source);
        assert_eq!(
            messages,
            vec!["$a #1", "function #2", "function #3", "$b #4", "$c #1"]
        );
    }

    #[test]
    fn test_state_resets_between_passes() {
        let mut ruleset = Ruleset::new();
        ruleset.register(Box::new(ScopedSniff::new(Counter)));

        let source = "<?php class A { public $a; }";
        assert_eq!(run(&mut ruleset, source), vec!["$a #1"]);
        assert_eq!(run(&mut ruleset, source), vec!["$a #1"]);
    }
}
