//! sniffer-core: Rule engine core for PHP coding standard checks
//!
//! This crate provides:
//! - `TokenStream`: an annotated, randomly addressable PHP token stream
//!   with bidirectional search and scope navigation
//! - `Sniff`: the rule trait, and `Ruleset`: the token-kind dispatcher
//! - `ScopedRule` / `ScopedSniff`: rules that fire inside class or function
//!   bodies with per-file state and skip-ahead
//! - `Fixer`: transactional, all-or-nothing token rewriting
//! - `Runner`: check passes and fix-until-convergence runs
//!
//! # Example
//!
//! ```ignore
//! use sniffer_core::{Ruleset, Runner};
//!
//! let mut ruleset = Ruleset::new();
//! ruleset.register(Box::new(MySniff));
//! let mut runner = Runner::new(ruleset);
//! let report = runner.fix("src/Foo.php", &source);
//! ```

mod annotate;
pub mod declaration;
pub mod fixer;
pub mod lexer;
pub mod logging;
pub mod report;
pub mod ruleset;
pub mod runner;
pub mod scope;
pub mod scoped;
pub mod sniff;
pub mod stream;
pub mod token;

pub use declaration::{MethodProperties, Visibility};
pub use fixer::{Change, Fixer, FixerError};
pub use report::{Diagnostic, Metric, Reporter, Severity};
pub use ruleset::{Ruleset, SniffInfo};
pub use runner::{CheckReport, FixReport, Runner, DEFAULT_MAX_PASSES};
pub use scope::{CommentBlock, Scope, Tag};
pub use scoped::{ScopedRule, ScopedSniff};
pub use sniff::{FileIdentity, Pass, Sniff};
pub use stream::TokenStream;
pub use token::{Condition, ScopeKind, Token, TokenKind};
