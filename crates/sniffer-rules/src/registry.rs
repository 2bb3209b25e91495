//! Registry of the built-in rules

use std::collections::HashSet;

use serde::Serialize;
use sniffer_core::{Ruleset, ScopedSniff, Sniff};

use crate::commenting::{ClassCommentSniff, FunctionCommentSniff};
use crate::formatting::{MethodVisibilityOrder, MultiLineArrayCommaSniff, PropertyAndMethodOrder};

/// Information about a registered rule (for --list-rules)
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub name: &'static str,
    pub code: &'static str,
    pub description: &'static str,
}

/// Registry of all available rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn Sniff>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        let mut registry = Self { rules: Vec::new() };

        // Commenting
        registry.register(Box::new(ClassCommentSniff));
        registry.register(Box::new(FunctionCommentSniff));

        // Formatting
        registry.register(Box::new(ScopedSniff::new(MethodVisibilityOrder)));
        registry.register(Box::new(ScopedSniff::new(PropertyAndMethodOrder)));
        registry.register(Box::new(MultiLineArrayCommaSniff));

        registry
    }

    /// Register a new rule
    pub fn register(&mut self, rule: Box<dyn Sniff>) {
        self.rules.push(rule);
    }

    /// Get all rule names
    pub fn all_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name() == name)
    }

    /// Get all rules with their codes and descriptions (for --list-rules)
    pub fn list_rules(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|r| RuleInfo {
                name: r.name(),
                code: r.code(),
                description: r.description(),
            })
            .collect()
    }

    /// Build a ruleset from the enabled rules, keeping registration order
    pub fn into_ruleset(self, enabled: &HashSet<String>) -> Ruleset {
        let mut ruleset = Ruleset::new();
        for rule in self.rules {
            if enabled.contains(rule.name()) {
                ruleset.register(rule);
            }
        }
        ruleset
    }

    /// A ruleset with every built-in rule
    pub fn default_ruleset() -> Ruleset {
        let registry = Self::new();
        let all: HashSet<String> = registry.all_names().into_iter().map(String::from).collect();
        registry.into_ruleset(&all)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
