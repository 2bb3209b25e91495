//! Scope navigation over an annotated token stream
//!
//! Resolves the bounded region a token opens or sits in: class and
//! function bodies, array literals and doc comment blocks.

use crate::stream::TokenStream;
use crate::token::{ScopeKind, TokenKind};

/// A bounded region of the token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Index of the token that owns the scope (keyword, `[` or `/**`)
    pub owner: usize,
    pub opener: usize,
    pub closer: usize,
}

impl Scope {
    /// Whether `index` lies strictly between opener and closer
    pub fn contains(&self, index: usize) -> bool {
        index > self.opener && index < self.closer
    }
}

/// A doc comment tag and its inline content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Index of the `@name` token
    pub token: usize,
    /// Tag name including the `@`
    pub name: String,
    /// Text following the tag on the same line, if any
    pub content: Option<String>,
    /// 0-based position among the block's tags
    pub position: usize,
}

/// A `/** ... */` block with its tags in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    pub opener: usize,
    pub closer: usize,
    pub tags: Vec<Tag>,
}

impl CommentBlock {
    /// Tags with the given name, in source order
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| t.name.eq_ignore_ascii_case(name))
    }
}

impl TokenStream {
    /// The scope opened by the token at `index`, if it opens one
    ///
    /// Declarations without a body (abstract methods) and unterminated
    /// constructs have no scope.
    pub fn scope_of(&self, index: usize) -> Option<Scope> {
        let token = self.get(index)?;
        let kind = ScopeKind::of_owner(token.kind)?;

        let (opener, closer) = match kind {
            ScopeKind::Array if token.kind == TokenKind::Array => {
                (token.paren_opener?, token.paren_closer?)
            }
            ScopeKind::Array => (token.bracket_opener?, token.bracket_closer?),
            ScopeKind::DocComment => (token.comment_opener?, token.comment_closer?),
            _ => (token.scope_opener?, token.scope_closer?),
        };

        Some(Scope {
            kind,
            owner: index,
            opener,
            closer,
        })
    }

    /// The kinds of every scope strictly containing `index`, outermost first
    ///
    /// Brace scopes come from the token's conditions. Array literals and doc
    /// comment blocks are found through their opener and closer pointers.
    pub fn enclosing_conditions(&self, index: usize) -> Vec<ScopeKind> {
        let Some(token) = self.get(index) else {
            return Vec::new();
        };

        let mut found: Vec<(usize, ScopeKind)> =
            token.conditions.iter().map(|c| (c.owner, c.kind)).collect();
        for candidate in &self.tokens()[..index] {
            let (bounds, kind) = match candidate.kind {
                TokenKind::Array => {
                    (candidate.paren_opener.zip(candidate.paren_closer), ScopeKind::Array)
                }
                TokenKind::OpenShortArray => {
                    (candidate.bracket_opener.zip(candidate.bracket_closer), ScopeKind::Array)
                }
                TokenKind::DocCommentOpenTag => {
                    (candidate.comment_opener.zip(candidate.comment_closer), ScopeKind::DocComment)
                }
                _ => continue,
            };
            if bounds.is_some_and(|(opener, closer)| opener < index && index < closer) {
                found.push((candidate.index, kind));
            }
        }

        found.sort_by_key(|&(owner, _)| owner);
        found.into_iter().map(|(_, kind)| kind).collect()
    }

    /// Innermost enclosing scope of one of `kinds`
    pub fn enclosing_scope(&self, index: usize, kinds: &[ScopeKind]) -> Option<Scope> {
        let condition = self.get(index)?.innermost_condition(kinds)?;
        self.scope_of(condition.owner)
    }

    /// Whether `index` is nested inside a closure
    pub fn in_closure(&self, index: usize) -> bool {
        self.get(index)
            .is_some_and(|t| t.has_condition(ScopeKind::Closure))
    }

    /// Index of the function or closure whose body directly contains `index`
    pub fn owning_function(&self, index: usize) -> Option<usize> {
        self.get(index)?
            .innermost_condition(&[ScopeKind::Function, ScopeKind::Closure])
            .map(|c| c.owner)
    }

    /// The doc comment block opened or closed at `index`
    pub fn comment_block(&self, index: usize) -> Option<CommentBlock> {
        let token = self.get(index)?;
        let opener = token.comment_opener?;
        let closer = self.get(opener)?.comment_closer?;

        let tags = self[opener]
            .comment_tags
            .iter()
            .enumerate()
            .map(|(position, &tag)| Tag {
                token: tag,
                name: self[tag].text.clone(),
                content: self.tag_content(tag),
                position,
            })
            .collect();

        Some(CommentBlock {
            opener,
            closer,
            tags,
        })
    }

    /// The string after a tag: `@return int` yields `int`
    fn tag_content(&self, tag: usize) -> Option<String> {
        let line = self[tag].line;
        let whitespace = self.get(tag + 1)?;
        let string = self.get(tag + 2)?;
        if whitespace.kind != TokenKind::DocCommentWhitespace
            || string.kind != TokenKind::DocCommentString
            || string.line != line
        {
            return None;
        }
        Some(string.text.clone())
    }
}
