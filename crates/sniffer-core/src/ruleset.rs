//! Rule registry and dispatcher
//!
//! The ruleset maps token kinds to the rules listening for them and walks
//! a token stream once per pass, invoking every interested rule for each
//! token in document order. Rules at the same token run in registration
//! order.

use std::collections::HashMap;

use crate::fixer::Fixer;
use crate::logging;
use crate::report::Reporter;
use crate::sniff::{FileIdentity, Pass, Sniff};
use crate::stream::TokenStream;
use crate::token::TokenKind;

/// Information about a registered rule
#[derive(Debug, Clone)]
pub struct SniffInfo {
    pub name: &'static str,
    pub code: &'static str,
    pub description: &'static str,
}

/// An ordered set of rules with a token-kind dispatch table
#[derive(Default)]
pub struct Ruleset {
    sniffs: Vec<Box<dyn Sniff>>,
    listeners: HashMap<TokenKind, Vec<usize>>,
    generation: u64,
}

impl Ruleset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule; it is invoked after every rule registered before it
    pub fn register(&mut self, sniff: Box<dyn Sniff>) {
        let idx = self.sniffs.len();
        for &kind in sniff.register() {
            let listeners = self.listeners.entry(kind).or_default();
            if !listeners.contains(&idx) {
                listeners.push(idx);
            }
        }
        self.sniffs.push(sniff);
    }

    /// Get all rule names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|s| s.name()).collect()
    }

    /// Get information about all rules
    pub fn list(&self) -> Vec<SniffInfo> {
        self.sniffs
            .iter()
            .map(|s| SniffInfo {
                name: s.name(),
                code: s.code(),
                description: s.description(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sniffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sniffs.is_empty()
    }

    /// Run one pass over `tokens`
    ///
    /// Every call is a fresh file identity, so rule state from an earlier
    /// pass is never carried into this one.
    pub fn process(
        &mut self,
        path: &str,
        tokens: &TokenStream,
        reporter: &mut Reporter,
        fixer: &mut Fixer,
    ) {
        self.generation += 1;
        let file = FileIdentity {
            path: path.to_string(),
            generation: self.generation,
        };

        for token in tokens {
            let Some(listeners) = self.listeners.get(&token.kind) else {
                continue;
            };

            for &idx in listeners {
                let sniff = &mut self.sniffs[idx];
                let mut pass = Pass::new(&file, tokens, reporter, fixer, sniff.code());
                sniff.process(&mut pass, token.index);

                if fixer.in_changeset() {
                    fixer.rollback_changeset();
                    logging::log(&format!(
                        "{}: [{}] left a changeset open at token {}, discarded",
                        path,
                        sniff.name(),
                        token.index
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every invocation into a shared log
    struct Recorder {
        name: &'static str,
        kinds: &'static [TokenKind],
        seen: std::sync::Arc<std::sync::Mutex<Vec<(&'static str, usize)>>>,
    }

    impl Sniff for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }
        fn code(&self) -> &'static str {
            "Test.Recorder"
        }
        fn description(&self) -> &'static str {
            "Records invocations"
        }
        fn register(&self) -> &'static [TokenKind] {
            self.kinds
        }
        fn process(&mut self, _pass: &mut Pass<'_>, ptr: usize) {
            self.seen.lock().unwrap().push((self.name, ptr));
        }
    }

    #[test]
    fn test_dispatch_in_document_and_registration_order() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut ruleset = Ruleset::new();
        ruleset.register(Box::new(Recorder {
            name: "first",
            kinds: &[TokenKind::Variable],
            seen: seen.clone(),
        }));
        ruleset.register(Box::new(Recorder {
            name: "second",
            kinds: &[TokenKind::Variable, TokenKind::Semicolon, TokenKind::Variable],
            seen: seen.clone(),
        }));

        let tokens = TokenStream::tokenize("<?php $a; $b;");
        let mut reporter = Reporter::new();
        let mut fixer = Fixer::new(&tokens, false);
        ruleset.process("a.php", &tokens, &mut reporter, &mut fixer);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("first", 2),
                ("second", 2),
                ("second", 3),
                ("first", 5),
                ("second", 5),
                ("second", 6),
            ]
        );
    }

    #[test]
    fn test_list_rules() {
        let mut ruleset = Ruleset::new();
        assert!(ruleset.is_empty());
        ruleset.register(Box::new(Recorder {
            name: "first",
            kinds: &[],
            seen: Default::default(),
        }));
        assert_eq!(ruleset.len(), 1);
        assert_eq!(ruleset.names(), vec!["first"]);
        assert_eq!(ruleset.list()[0].code, "Test.Recorder");
    }
}
