//! Randomly addressable token stream with bidirectional search

use std::ops::Index;

use crate::annotate::annotate;
use crate::lexer::lex;
use crate::token::{Token, TokenKind};

/// The tokens of one file for one pass
///
/// Indices are stable for the lifetime of the stream. A new stream is
/// built for every pass, so rules must never keep indices across files.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Tokenize and annotate PHP source text
    pub fn tokenize(source: &str) -> Self {
        Self::from_tokens(lex(source))
    }

    /// Build a stream from already lexed tokens, running the annotation pass
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        annotate(&mut tokens);
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// First index in `start..=end` whose kind is in `kinds`
    ///
    /// With `exclude`, the first index whose kind is *not* in `kinds`.
    /// `end` defaults to the last token and is clamped to it.
    pub fn find_next(
        &self,
        kinds: &[TokenKind],
        start: usize,
        end: Option<usize>,
        exclude: bool,
    ) -> Option<usize> {
        let last = self.tokens.len().checked_sub(1)?;
        let end = end.unwrap_or(last).min(last);
        if start > end {
            return None;
        }

        (start..=end).find(|&i| kinds.contains(&self.tokens[i].kind) != exclude)
    }

    /// Last index in `end..=start` whose kind is in `kinds`, searching backwards
    ///
    /// With `exclude`, the last index whose kind is *not* in `kinds`.
    /// `end` defaults to the first token.
    pub fn find_previous(
        &self,
        kinds: &[TokenKind],
        start: usize,
        end: Option<usize>,
        exclude: bool,
    ) -> Option<usize> {
        let last = self.tokens.len().checked_sub(1)?;
        let start = start.min(last);
        let end = end.unwrap_or(0);
        if end > start {
            return None;
        }

        (end..=start)
            .rev()
            .find(|&i| kinds.contains(&self.tokens[i].kind) != exclude)
    }

    /// Next token that is not whitespace or a comment
    pub fn next_significant(&self, start: usize, end: Option<usize>) -> Option<usize> {
        self.find_next(TokenKind::EMPTY, start, end, true)
    }

    /// Previous token that is not whitespace or a comment
    pub fn prev_significant(&self, start: usize, end: Option<usize>) -> Option<usize> {
        self.find_previous(TokenKind::EMPTY, start, end, true)
    }

    /// Concatenated text of `start..=end`
    pub fn content(&self, start: usize, end: usize) -> String {
        if self.tokens.is_empty() || start > end {
            return String::new();
        }
        let end = end.min(self.tokens.len() - 1);
        self.tokens[start..=end]
            .iter()
            .map(|t| t.text.as_str())
            .collect()
    }

    /// The full source text the stream was built from
    pub fn source(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
