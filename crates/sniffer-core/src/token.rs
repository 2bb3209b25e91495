//! Token records produced by the tokenizer

use std::fmt;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Text outside of PHP tags
    InlineHtml,
    /// `<?php` or `<?`
    OpenTag,
    /// `<?=`
    OpenTagWithEcho,
    /// `?>`
    CloseTag,
    /// Spaces and tabs, terminated by (and including) at most one newline
    Whitespace,
    /// `//`, `#` or `/* */` comment (one token per physical line)
    Comment,

    // Doc comment parts
    DocCommentOpenTag,
    DocCommentCloseTag,
    DocCommentStar,
    DocCommentWhitespace,
    DocCommentTag,
    DocCommentString,

    Variable,
    /// Identifier or (qualified) name
    String,
    ConstantEncapsedString,
    DoubleQuotedString,
    Heredoc,
    LNumber,
    DNumber,

    // Declarations
    Class,
    Interface,
    Trait,
    AnonClass,
    Function,
    Closure,
    Fn,

    // Modifiers
    Abstract,
    Final,
    Static,
    Public,
    Protected,
    Private,
    Var,
    Const,
    Readonly,

    Return,
    Array,
    New,
    Extends,
    Implements,
    Namespace,
    Use,

    OpenParenthesis,
    CloseParenthesis,
    OpenCurlyBracket,
    CloseCurlyBracket,
    OpenSquareBracket,
    CloseSquareBracket,
    OpenShortArray,
    CloseShortArray,
    /// `#[`
    AttributeStart,
    /// The `]` closing an attribute group
    AttributeEnd,

    Semicolon,
    Comma,
    Colon,
    DoubleColon,
    ObjectOperator,
    DoubleArrow,
    Equal,
    BitwiseAnd,
    /// Any other operator or punctuation
    Operator,
}

impl TokenKind {
    /// Tokens that carry no code meaning
    pub const EMPTY: &'static [TokenKind] = &[
        TokenKind::Whitespace,
        TokenKind::Comment,
        TokenKind::DocCommentOpenTag,
        TokenKind::DocCommentCloseTag,
        TokenKind::DocCommentStar,
        TokenKind::DocCommentWhitespace,
        TokenKind::DocCommentTag,
        TokenKind::DocCommentString,
    ];

    /// Keywords that may precede a method or class declaration
    pub const METHOD_PREFIXES: &'static [TokenKind] = &[
        TokenKind::Abstract,
        TokenKind::Final,
        TokenKind::Static,
        TokenKind::Public,
        TokenKind::Protected,
        TokenKind::Private,
        TokenKind::Readonly,
    ];

    /// Keywords that own a brace-delimited scope
    pub const SCOPE_OWNERS: &'static [TokenKind] = &[
        TokenKind::Class,
        TokenKind::Interface,
        TokenKind::Trait,
        TokenKind::AnonClass,
        TokenKind::Function,
        TokenKind::Closure,
    ];

    pub fn is_empty(self) -> bool {
        Self::EMPTY.contains(&self)
    }

    pub fn is_scope_owner(self) -> bool {
        Self::SCOPE_OWNERS.contains(&self)
    }

    /// PHPCS-style constant name, used in diagnostics and debug dumps
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::InlineHtml => "T_INLINE_HTML",
            TokenKind::OpenTag => "T_OPEN_TAG",
            TokenKind::OpenTagWithEcho => "T_OPEN_TAG_WITH_ECHO",
            TokenKind::CloseTag => "T_CLOSE_TAG",
            TokenKind::Whitespace => "T_WHITESPACE",
            TokenKind::Comment => "T_COMMENT",
            TokenKind::DocCommentOpenTag => "T_DOC_COMMENT_OPEN_TAG",
            TokenKind::DocCommentCloseTag => "T_DOC_COMMENT_CLOSE_TAG",
            TokenKind::DocCommentStar => "T_DOC_COMMENT_STAR",
            TokenKind::DocCommentWhitespace => "T_DOC_COMMENT_WHITESPACE",
            TokenKind::DocCommentTag => "T_DOC_COMMENT_TAG",
            TokenKind::DocCommentString => "T_DOC_COMMENT_STRING",
            TokenKind::Variable => "T_VARIABLE",
            TokenKind::String => "T_STRING",
            TokenKind::ConstantEncapsedString => "T_CONSTANT_ENCAPSED_STRING",
            TokenKind::DoubleQuotedString => "T_DOUBLE_QUOTED_STRING",
            TokenKind::Heredoc => "T_HEREDOC",
            TokenKind::LNumber => "T_LNUMBER",
            TokenKind::DNumber => "T_DNUMBER",
            TokenKind::Class => "T_CLASS",
            TokenKind::Interface => "T_INTERFACE",
            TokenKind::Trait => "T_TRAIT",
            TokenKind::AnonClass => "T_ANON_CLASS",
            TokenKind::Function => "T_FUNCTION",
            TokenKind::Closure => "T_CLOSURE",
            TokenKind::Fn => "T_FN",
            TokenKind::Abstract => "T_ABSTRACT",
            TokenKind::Final => "T_FINAL",
            TokenKind::Static => "T_STATIC",
            TokenKind::Public => "T_PUBLIC",
            TokenKind::Protected => "T_PROTECTED",
            TokenKind::Private => "T_PRIVATE",
            TokenKind::Var => "T_VAR",
            TokenKind::Const => "T_CONST",
            TokenKind::Readonly => "T_READONLY",
            TokenKind::Return => "T_RETURN",
            TokenKind::Array => "T_ARRAY",
            TokenKind::New => "T_NEW",
            TokenKind::Extends => "T_EXTENDS",
            TokenKind::Implements => "T_IMPLEMENTS",
            TokenKind::Namespace => "T_NAMESPACE",
            TokenKind::Use => "T_USE",
            TokenKind::OpenParenthesis => "T_OPEN_PARENTHESIS",
            TokenKind::CloseParenthesis => "T_CLOSE_PARENTHESIS",
            TokenKind::OpenCurlyBracket => "T_OPEN_CURLY_BRACKET",
            TokenKind::CloseCurlyBracket => "T_CLOSE_CURLY_BRACKET",
            TokenKind::OpenSquareBracket => "T_OPEN_SQUARE_BRACKET",
            TokenKind::CloseSquareBracket => "T_CLOSE_SQUARE_BRACKET",
            TokenKind::OpenShortArray => "T_OPEN_SHORT_ARRAY",
            TokenKind::CloseShortArray => "T_CLOSE_SHORT_ARRAY",
            TokenKind::AttributeStart => "T_ATTRIBUTE",
            TokenKind::AttributeEnd => "T_ATTRIBUTE_END",
            TokenKind::Semicolon => "T_SEMICOLON",
            TokenKind::Comma => "T_COMMA",
            TokenKind::Colon => "T_COLON",
            TokenKind::DoubleColon => "T_DOUBLE_COLON",
            TokenKind::ObjectOperator => "T_OBJECT_OPERATOR",
            TokenKind::DoubleArrow => "T_DOUBLE_ARROW",
            TokenKind::Equal => "T_EQUAL",
            TokenKind::BitwiseAnd => "T_BITWISE_AND",
            TokenKind::Operator => "T_OPERATOR",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of a bounded region of the token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Class,
    Interface,
    Trait,
    AnonClass,
    Function,
    Closure,
    Array,
    DocComment,
}

impl ScopeKind {
    /// Scope kind owned by a keyword token, if it opens one
    pub fn of_owner(kind: TokenKind) -> Option<ScopeKind> {
        match kind {
            TokenKind::Class => Some(ScopeKind::Class),
            TokenKind::Interface => Some(ScopeKind::Interface),
            TokenKind::Trait => Some(ScopeKind::Trait),
            TokenKind::AnonClass => Some(ScopeKind::AnonClass),
            TokenKind::Function => Some(ScopeKind::Function),
            TokenKind::Closure => Some(ScopeKind::Closure),
            TokenKind::Array | TokenKind::OpenShortArray => Some(ScopeKind::Array),
            TokenKind::DocCommentOpenTag => Some(ScopeKind::DocComment),
            _ => None,
        }
    }

    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            ScopeKind::Class | ScopeKind::Interface | ScopeKind::Trait | ScopeKind::AnonClass
        )
    }

    pub fn is_function_like(self) -> bool {
        matches!(self, ScopeKind::Function | ScopeKind::Closure)
    }
}

/// An enclosing brace scope of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    /// Index of the owning keyword token
    pub owner: usize,
    pub kind: ScopeKind,
}

/// A single token with its scope annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: usize,
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based column of the first character
    pub column: usize,
    pub scope_opener: Option<usize>,
    pub scope_closer: Option<usize>,
    pub paren_opener: Option<usize>,
    pub paren_closer: Option<usize>,
    pub bracket_opener: Option<usize>,
    pub bracket_closer: Option<usize>,
    pub comment_opener: Option<usize>,
    pub comment_closer: Option<usize>,
    /// Doc comment tag tokens, set on the comment opener
    pub comment_tags: Vec<usize>,
    /// Enclosing scopes, outermost first
    pub conditions: Vec<Condition>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            index: 0,
            kind,
            text: text.into(),
            line,
            column,
            scope_opener: None,
            scope_closer: None,
            paren_opener: None,
            paren_closer: None,
            bracket_opener: None,
            bracket_closer: None,
            comment_opener: None,
            comment_closer: None,
            comment_tags: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Whether any enclosing scope is of the given kind
    pub fn has_condition(&self, kind: ScopeKind) -> bool {
        self.conditions.iter().any(|c| c.kind == kind)
    }

    /// Innermost enclosing scope matching one of `kinds`
    pub fn innermost_condition(&self, kinds: &[ScopeKind]) -> Option<Condition> {
        self.conditions
            .iter()
            .rev()
            .find(|c| kinds.contains(&c.kind))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_kind_of_owner() {
        assert_eq!(ScopeKind::of_owner(TokenKind::Class), Some(ScopeKind::Class));
        assert_eq!(ScopeKind::of_owner(TokenKind::OpenShortArray), Some(ScopeKind::Array));
        assert_eq!(ScopeKind::of_owner(TokenKind::Return), None);
    }

    #[test]
    fn test_innermost_condition() {
        let mut token = Token::new(TokenKind::Return, "return", 1, 1);
        token.conditions = vec![
            Condition { owner: 2, kind: ScopeKind::Class },
            Condition { owner: 8, kind: ScopeKind::Function },
            Condition { owner: 20, kind: ScopeKind::Closure },
        ];

        let inner = token
            .innermost_condition(&[ScopeKind::Function, ScopeKind::Closure])
            .unwrap();
        assert_eq!(inner.owner, 20);
        assert!(token.has_condition(ScopeKind::Class));
        assert!(!token.has_condition(ScopeKind::Trait));
    }
}
