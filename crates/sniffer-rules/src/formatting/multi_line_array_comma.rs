//! Trailing comma after the last item of a multi-line array

use sniffer_core::{logging, Pass, Sniff, TokenKind};

const NAME: &str = "multi_line_array_comma";

pub struct MultiLineArrayCommaSniff;

impl Sniff for MultiLineArrayCommaSniff {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        "Symfony.Formatting.MultiLineArrayCommaAfterLastElement"
    }

    fn description(&self) -> &'static str {
        "Add a comma after each item in a multi-line array"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Array, TokenKind::OpenShortArray]
    }

    fn process(&mut self, pass: &mut Pass<'_>, ptr: usize) {
        let tokens = pass.tokens;
        // `array` used as a type has no literal
        let Some(scope) = tokens.scope_of(ptr) else {
            return;
        };

        if tokens[scope.opener].line == tokens[scope.closer].line {
            return;
        }

        let Some(last) = scope
            .closer
            .checked_sub(1)
            .and_then(|start| tokens.prev_significant(start, Some(scope.opener + 1)))
        else {
            return;
        };

        if tokens[last].kind == TokenKind::Comma {
            return;
        }

        if pass.add_fixable_error("Comma missing after last array item", last, "CommaMissing") {
            pass.fixer.begin_changeset();
            let staged = pass.fixer.add_content(last, ",");
            let result = staged.and_then(|_| pass.fixer.end_changeset());
            if let Err(err) = result {
                pass.fixer.rollback_changeset();
                logging::log_rejected_changeset(&pass.file.path, NAME, &err);
            }
        }
    }
}
