//! Class properties declared before methods

use sniffer_core::{Pass, Scope, ScopeKind, ScopedRule, TokenKind};

pub struct PropertyAndMethodOrder;

/// Per-class progress
#[derive(Debug, Default)]
pub struct MemberState {
    method_seen: bool,
}

impl ScopedRule for PropertyAndMethodOrder {
    type State = MemberState;

    fn name(&self) -> &'static str {
        "property_and_method_order"
    }

    fn code(&self) -> &'static str {
        "Symfony.Formatting.PropertyAndMethodOrder"
    }

    fn description(&self) -> &'static str {
        "Declare class properties before methods"
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
        state: &mut MemberState,
    ) -> Option<usize> {
        if pass.tokens[ptr].kind == TokenKind::Function {
            state.method_seen = true;
            return pass.tokens.declaration_end(ptr);
        }

        if state.method_seen {
            pass.add_error(
                "Class properties must be declared before methods",
                ptr,
                "DeclarePropertiesBeforeMethods",
            );
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_core::{Ruleset, Runner, ScopedSniff};

    fn flagged(source: &str) -> Vec<String> {
        let mut ruleset = Ruleset::new();
        ruleset.register(Box::new(ScopedSniff::new(PropertyAndMethodOrder)));
        let report = Runner::new(ruleset).check("a.php", source);
        report
            .diagnostics
            .iter()
            .map(|d| source_text(source, d.line))
            .collect()
    }

    fn source_text(source: &str, line: usize) -> String {
        source.lines().nth(line - 1).unwrap_or_default().trim().to_string()
    }

    #[test]
    fn test_properties_first() {
        let source = "<?php\nclass A\n{\n    public $a;\n    private static $b = 1;\n\n    public function f($x)\n    {\n        $y = $x;\n    }\n}\n";
        assert!(flagged(source).is_empty());
    }

    #[test]
    fn test_property_after_method() {
        let source = "<?php\nclass A\n{\n    public $a;\n    public function f($x)\n    {\n        $y = $x;\n    }\n    protected $b;\n    abstract function g($z);\n    private $c;\n}\n";
        assert_eq!(flagged(source), vec!["protected $b;", "private $c;"]);
    }

    #[test]
    fn test_variables_outside_classes_ignored() {
        let source = "<?php\nfunction f() {}\n$a = 1;\n";
        assert!(flagged(source).is_empty());
    }

    #[test]
    fn test_each_class_tracked_separately() {
        let source = "<?php\nclass A\n{\n    public function f() {}\n}\nclass B\n{\n    public $b;\n}\n";
        assert!(flagged(source).is_empty());
    }
}
