//! Transactional token rewriting
//!
//! Rules stage edits inside a changeset; a changeset is validated as a
//! whole when it ends and either every operation lands in the working
//! buffer or none does. Staged edits are invisible until committed.

use thiserror::Error;

use crate::stream::TokenStream;

/// Errors that can occur while committing a changeset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixerError {
    #[error("No changeset is open")]
    NoOpenChangeset,

    #[error("Token {index} out of bounds for stream length {len}")]
    TokenOutOfBounds { index: usize, len: usize },

    #[error("Token {index} was already changed by another fix in this pass")]
    Conflict { index: usize },

    #[error("Fixing is disabled")]
    Disabled,
}

/// A single staged operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Replace the whole text of a token; empty text deletes it
    Replace { index: usize, text: String },
    /// Append text right after a token, keeping its existing text
    AppendSuffix { index: usize, text: String },
}

impl Change {
    pub fn index(&self) -> usize {
        match self {
            Change::Replace { index, .. } | Change::AppendSuffix { index, .. } => *index,
        }
    }
}

/// Working buffer of token texts for one pass
#[derive(Debug)]
pub struct Fixer {
    enabled: bool,
    contents: Vec<String>,
    /// Tokens touched by a committed changeset in this pass
    changed: Vec<bool>,
    changeset: Option<Vec<Change>>,
    fix_count: usize,
    rejected: usize,
}

impl Fixer {
    /// A fixer over `tokens`; when disabled every fix is declined
    pub fn new(tokens: &TokenStream, enabled: bool) -> Self {
        let contents: Vec<String> = tokens.iter().map(|t| t.text.clone()).collect();
        let changed = vec![false; contents.len()];
        Self {
            enabled,
            contents,
            changed,
            changeset: None,
            fix_count: 0,
            rejected: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of changesets committed in this pass
    pub fn fix_count(&self) -> usize {
        self.fix_count
    }

    /// Number of changesets discarded in this pass
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    pub fn in_changeset(&self) -> bool {
        self.changeset.is_some()
    }

    /// Open a changeset, discarding any stale one left open
    pub fn begin_changeset(&mut self) {
        if self.changeset.replace(Vec::new()).is_some() {
            self.rejected += 1;
        }
    }

    /// Stage a full replacement of token `index`
    ///
    /// Outside a changeset the replacement is committed on its own.
    pub fn replace_token(&mut self, index: usize, text: impl Into<String>) -> Result<(), FixerError> {
        self.stage(Change::Replace {
            index,
            text: text.into(),
        })
    }

    /// Stage appending `text` immediately after token `index`
    pub fn add_content(&mut self, index: usize, text: impl Into<String>) -> Result<(), FixerError> {
        self.stage(Change::AppendSuffix {
            index,
            text: text.into(),
        })
    }

    fn stage(&mut self, change: Change) -> Result<(), FixerError> {
        match self.changeset.as_mut() {
            Some(changeset) => {
                changeset.push(change);
                Ok(())
            }
            None => self.commit(vec![change]).map(|_| ()),
        }
    }

    /// Commit every staged operation, or none of them
    ///
    /// Returns the number of operations applied.
    pub fn end_changeset(&mut self) -> Result<usize, FixerError> {
        let changeset = self.changeset.take().ok_or(FixerError::NoOpenChangeset)?;
        self.commit(changeset)
    }

    /// Drop the open changeset without applying it
    pub fn rollback_changeset(&mut self) {
        if self.changeset.take().is_some() {
            self.rejected += 1;
        }
    }

    fn commit(&mut self, changeset: Vec<Change>) -> Result<usize, FixerError> {
        if let Err(err) = self.validate(&changeset) {
            self.rejected += 1;
            return Err(err);
        }

        if changeset.is_empty() {
            return Ok(0);
        }

        for change in &changeset {
            match change {
                Change::Replace { index, text } => self.contents[*index] = text.clone(),
                Change::AppendSuffix { index, text } => self.contents[*index].push_str(text),
            }
        }
        for change in &changeset {
            self.changed[change.index()] = true;
        }

        self.fix_count += 1;
        Ok(changeset.len())
    }

    fn validate(&self, changeset: &[Change]) -> Result<(), FixerError> {
        if !self.enabled {
            return Err(FixerError::Disabled);
        }

        let len = self.contents.len();
        for change in changeset {
            let index = change.index();
            if index >= len {
                return Err(FixerError::TokenOutOfBounds { index, len });
            }
            if self.changed[index] {
                return Err(FixerError::Conflict { index });
            }
        }
        Ok(())
    }

    /// Index range `(first, last)` of the tokens sharing `anchor`'s line
    pub fn line_span(tokens: &TokenStream, anchor: usize) -> Option<(usize, usize)> {
        let line = tokens.get(anchor)?.line;

        let mut first = anchor;
        while first > 0 && tokens[first - 1].line == line {
            first -= 1;
        }
        let mut last = anchor;
        while last + 1 < tokens.len() && tokens[last + 1].line == line {
            last += 1;
        }

        Some((first, last))
    }

    /// Delete the physical line of token `anchor` in one changeset
    ///
    /// Every token sharing the anchor's line is replaced with empty text.
    /// Whitespace tokens never span lines, so the line's newline goes too.
    pub fn delete_line(&mut self, tokens: &TokenStream, anchor: usize) -> Result<usize, FixerError> {
        let (first, last) = Self::line_span(tokens, anchor).ok_or(FixerError::TokenOutOfBounds {
            index: anchor,
            len: tokens.len(),
        })?;
        self.delete_range(first, last)
    }

    /// Empty tokens `first..=last` in one changeset
    pub fn delete_range(&mut self, first: usize, last: usize) -> Result<usize, FixerError> {
        self.begin_changeset();
        for i in first..=last {
            self.replace_token(i, "")?;
        }
        self.end_changeset()
    }

    /// Current text of token `index`, including committed edits
    pub fn token_content(&self, index: usize) -> Option<&str> {
        self.contents.get(index).map(String::as_str)
    }

    /// The working buffer as source text
    pub fn contents(&self) -> String {
        self.contents.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixer(source: &str) -> (TokenStream, Fixer) {
        let tokens = TokenStream::tokenize(source);
        let fixer = Fixer::new(&tokens, true);
        (tokens, fixer)
    }

    #[test]
    fn test_changeset_is_invisible_until_committed() {
        let (_, mut fixer) = fixer("<?php $a;");
        fixer.begin_changeset();
        fixer.replace_token(2, "$b").unwrap();
        assert_eq!(fixer.contents(), "<?php $a;");

        assert_eq!(fixer.end_changeset().unwrap(), 1);
        assert_eq!(fixer.contents(), "<?php $b;");
        assert_eq!(fixer.fix_count(), 1);
    }

    #[test]
    fn test_append_suffix_keeps_text() {
        let (_, mut fixer) = fixer("<?php $a");
        fixer.begin_changeset();
        fixer.add_content(2, ";").unwrap();
        fixer.end_changeset().unwrap();
        assert_eq!(fixer.contents(), "<?php $a;");
    }

    #[test]
    fn test_out_of_bounds_rejects_whole_changeset() {
        let (_, mut fixer) = fixer("<?php $a;");
        fixer.begin_changeset();
        fixer.replace_token(2, "$b").unwrap();
        fixer.replace_token(99, "x").unwrap();
        let result = fixer.end_changeset();

        assert!(matches!(result, Err(FixerError::TokenOutOfBounds { index: 99, .. })));
        assert_eq!(fixer.contents(), "<?php $a;");
        assert_eq!(fixer.fix_count(), 0);
        assert_eq!(fixer.rejected_count(), 1);
    }

    #[test]
    fn test_conflicting_changesets() {
        let (_, mut fixer) = fixer("<?php $a;");
        fixer.begin_changeset();
        fixer.add_content(2, " ").unwrap();
        fixer.end_changeset().unwrap();

        fixer.begin_changeset();
        fixer.replace_token(2, "$c").unwrap();
        assert_eq!(fixer.end_changeset(), Err(FixerError::Conflict { index: 2 }));
        assert_eq!(fixer.contents(), "<?php $a ;");
    }

    #[test]
    fn test_disabled_fixer_declines() {
        let tokens = TokenStream::tokenize("<?php $a;");
        let mut fixer = Fixer::new(&tokens, false);
        assert_eq!(fixer.replace_token(2, "$b"), Err(FixerError::Disabled));
        assert_eq!(fixer.contents(), "<?php $a;");
    }

    #[test]
    fn test_end_without_begin() {
        let (_, mut fixer) = fixer("<?php");
        assert_eq!(fixer.end_changeset(), Err(FixerError::NoOpenChangeset));
    }

    #[test]
    fn test_rollback() {
        let (_, mut fixer) = fixer("<?php $a;");
        fixer.begin_changeset();
        fixer.replace_token(2, "$b").unwrap();
        fixer.rollback_changeset();
        assert!(!fixer.in_changeset());
        assert_eq!(fixer.contents(), "<?php $a;");
    }

    #[test]
    fn test_delete_line() {
        let source = "<?php\n/**\n * Summary.\n * @package Foo\n * @author Me\n */\nclass A {}\n";
        let (tokens, mut fixer) = fixer(source);
        let tag = tokens.iter().find(|t| t.text == "@package").unwrap().index;

        fixer.delete_line(&tokens, tag).unwrap();
        assert_eq!(
            fixer.contents(),
            "<?php\n/**\n * Summary.\n * @author Me\n */\nclass A {}\n"
        );
    }

    #[test]
    fn test_line_span_and_delete_range() {
        let source = "<?php\n$a = 1; $b = 2;\n$c = 3;\n";
        let (tokens, mut fixer) = fixer(source);
        let b = tokens.iter().find(|t| t.text == "$b").unwrap().index;

        let (first, last) = Fixer::line_span(&tokens, b).unwrap();
        assert_eq!(tokens[first].text, "$a");
        assert_eq!(tokens[last].text, "\n");
        assert!(Fixer::line_span(&tokens, 999).is_none());

        fixer.delete_range(b, last - 1).unwrap();
        assert_eq!(fixer.contents(), "<?php\n$a = 1; \n$c = 3;\n");
    }
}
