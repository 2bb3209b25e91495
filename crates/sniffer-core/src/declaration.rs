//! Declaration helpers: names, modifiers and extents

use std::fmt;

use serde::Serialize;

use crate::stream::TokenStream;
use crate::token::TokenKind;

/// Member visibility, ordered public < protected < private
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn rank(self) -> u8 {
        match self {
            Visibility::Public => 0,
            Visibility::Protected => 1,
            Visibility::Private => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifiers of a function or method declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodProperties {
    pub visibility: Visibility,
    /// Whether the visibility was written out
    pub explicit_visibility: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_static: bool,
    pub has_body: bool,
}

/// Tokens allowed between modifiers and the `function` keyword
const MODIFIER_FILLER: &[TokenKind] = &[
    TokenKind::Public,
    TokenKind::Protected,
    TokenKind::Private,
    TokenKind::Static,
    TokenKind::Abstract,
    TokenKind::Final,
    TokenKind::Whitespace,
    TokenKind::Comment,
];

impl TokenStream {
    /// Name of the class, interface, trait or function declared at `index`
    pub fn declaration_name(&self, index: usize) -> Option<&str> {
        let token = self.get(index)?;
        if !matches!(
            token.kind,
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait | TokenKind::Function
        ) {
            return None;
        }

        let mut next = self.next_significant(index + 1, None)?;
        if self[next].kind == TokenKind::BitwiseAnd {
            next = self.next_significant(next + 1, None)?;
        }
        (self[next].kind == TokenKind::String).then(|| self[next].text.as_str())
    }

    /// Modifiers of the function declared at `index`
    pub fn method_properties(&self, index: usize) -> MethodProperties {
        let mut props = MethodProperties {
            visibility: Visibility::Public,
            explicit_visibility: false,
            is_abstract: false,
            is_final: false,
            is_static: false,
            has_body: self.get(index).is_some_and(|t| t.scope_opener.is_some()),
        };

        let Some(start) = index.checked_sub(1) else {
            return props;
        };
        let first = self
            .find_previous(MODIFIER_FILLER, start, None, true)
            .map_or(0, |i| i + 1);

        for token in &self.tokens()[first..index] {
            match token.kind {
                TokenKind::Public => {
                    props.visibility = Visibility::Public;
                    props.explicit_visibility = true;
                }
                TokenKind::Protected => {
                    props.visibility = Visibility::Protected;
                    props.explicit_visibility = true;
                }
                TokenKind::Private => {
                    props.visibility = Visibility::Private;
                    props.explicit_visibility = true;
                }
                TokenKind::Static => props.is_static = true,
                TokenKind::Abstract => props.is_abstract = true,
                TokenKind::Final => props.is_final = true,
                _ => {}
            }
        }

        props
    }

    /// First token before the declaration at `index` that is neither one
    /// of `skip` nor part of an attribute group
    ///
    /// This is where a comment documenting the declaration ends.
    pub fn preceding_comment_end(&self, index: usize, skip: &[TokenKind]) -> Option<usize> {
        let mut start = index.checked_sub(1)?;
        loop {
            let found = self.find_previous(skip, start, None, true)?;
            if self[found].kind != TokenKind::AttributeEnd {
                return Some(found);
            }
            start = self[found].bracket_opener?.checked_sub(1)?;
        }
    }

    /// Last token of the declaration at `index`
    ///
    /// The scope closer for declarations with a body, otherwise the
    /// terminating semicolon.
    pub fn declaration_end(&self, index: usize) -> Option<usize> {
        let token = self.get(index)?;
        if let Some(closer) = token.scope_closer {
            return Some(closer);
        }

        let start = token.paren_closer.unwrap_or(index);
        self.find_next(&[TokenKind::Semicolon], start, None, false)
    }
}
