//! PHP lexer - turns source text into a flat token list
//!
//! This is not a grammar-aware tokenizer. It recognises exactly the
//! lexical categories the rules need and never fails: anything it does
//! not understand becomes an operator token. Concatenating the text of
//! every token reproduces the input byte-for-byte.
//!
//! Whitespace, comments and doc comment whitespace are split so that no
//! such token spans more than one physical line; the newline belongs to
//! the token on the line it terminates.

use crate::token::{Token, TokenKind};

/// Three-character operators, checked before shorter ones
const OPERATORS_3: &[&str] = &["===", "!==", "<=>", "**=", "...", "<<=", ">>=", "??=", "?->"];

/// Two-character operators
const OPERATORS_2: &[&str] = &[
    "::", "->", "=>", "==", "!=", "<>", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=",
    "/=", ".=", "%=", "&=", "|=", "^=", "<<", ">>", "??", "**",
];

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    in_php: bool,
    tokens: Vec<Token>,
}

/// Start of a token being lexed
#[derive(Clone, Copy)]
struct Mark {
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
            in_php: false,
            tokens: Vec::new(),
        }
    }

    /// Lex the whole input
    pub fn tokenize(mut self) -> Vec<Token> {
        while self.position < self.input.len() {
            if self.in_php {
                self.lex_php();
            } else {
                self.lex_inline_html();
            }
        }
        self.tokens
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn advance_by(&mut self, chars: usize) {
        for _ in 0..chars {
            if self.advance().is_none() {
                break;
            }
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn emit(&mut self, kind: TokenKind, start: Mark) {
        if self.position == start.position {
            return;
        }
        let text = &self.input[start.position..self.position];
        self.tokens.push(Token::new(kind, text, start.line, start.column));
    }

    fn lex_inline_html(&mut self) {
        let start = self.mark();
        let offset = self.rest().find("<?").unwrap_or(self.rest().len());
        let html: Vec<char> = self.rest()[..offset].chars().collect();
        self.advance_by(html.len());
        self.emit(TokenKind::InlineHtml, start);

        if self.position >= self.input.len() {
            return;
        }

        let start = self.mark();
        let long_tag = self
            .rest()
            .get(..5)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("<?php"));
        let kind = if long_tag {
            self.advance_by(5);
            TokenKind::OpenTag
        } else if self.starts_with("<?=") {
            self.advance_by(3);
            TokenKind::OpenTagWithEcho
        } else {
            self.advance_by(2);
            TokenKind::OpenTag
        };
        self.emit(kind, start);
        self.in_php = true;
    }

    fn lex_php(&mut self) {
        let Some(ch) = self.peek() else {
            return;
        };

        match ch {
            ' ' | '\t' | '\r' | '\n' => self.lex_whitespace(TokenKind::Whitespace),
            '#' if self.peek_at(1) == Some('[') => {
                let start = self.mark();
                self.advance_by(2);
                self.emit(TokenKind::AttributeStart, start);
            }
            '#' => self.lex_line_comment(),
            '/' if self.peek_at(1) == Some('/') => self.lex_line_comment(),
            '/' if self.starts_with("/**")
                && self.peek_at(3).is_some_and(|c| c.is_whitespace()) =>
            {
                self.lex_doc_comment()
            }
            '/' if self.peek_at(1) == Some('*') => self.lex_block_comment(),
            '$' if self.peek_at(1).is_some_and(is_ident_start) => {
                let start = self.mark();
                self.advance();
                self.read_identifier();
                self.emit(TokenKind::Variable, start);
            }
            '\'' => self.lex_quoted('\'', TokenKind::ConstantEncapsedString),
            '"' => self.lex_quoted('"', TokenKind::DoubleQuotedString),
            '`' => self.lex_quoted('`', TokenKind::DoubleQuotedString),
            '<' if self.starts_with("<<<") => self.lex_heredoc(),
            '?' if self.peek_at(1) == Some('>') => {
                let start = self.mark();
                self.advance_by(2);
                if self.peek() == Some('\n') {
                    self.advance();
                }
                self.emit(TokenKind::CloseTag, start);
                self.in_php = false;
            }
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            '\\' if self.peek_at(1).is_some_and(is_ident_start) => self.lex_name(),
            c if is_ident_start(c) => self.lex_name(),
            _ => self.lex_operator(),
        }
    }

    /// Spaces and tabs up to and including one newline
    fn lex_whitespace(&mut self, kind: TokenKind) {
        let start = self.mark();
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    break;
                }
                _ => break,
            }
        }
        self.emit(kind, start);
    }

    fn lex_line_comment(&mut self) {
        let start = self.mark();
        while let Some(ch) = self.peek() {
            if self.starts_with("?>") {
                break;
            }
            self.advance();
            if ch == '\n' {
                break;
            }
        }
        self.emit(TokenKind::Comment, start);
    }

    fn lex_block_comment(&mut self) {
        let mut start = self.mark();
        self.advance_by(2);

        loop {
            if self.starts_with("*/") {
                self.advance_by(2);
                self.emit(TokenKind::Comment, start);
                return;
            }
            match self.advance() {
                Some('\n') => {
                    self.emit(TokenKind::Comment, start);
                    start = self.mark();
                }
                Some(_) => {}
                None => {
                    self.emit(TokenKind::Comment, start);
                    return;
                }
            }
        }
    }

    fn lex_doc_comment(&mut self) {
        let start = self.mark();
        self.advance_by(3);
        self.emit(TokenKind::DocCommentOpenTag, start);

        let mut at_line_start = false;
        let mut expect_tag = true;

        while let Some(ch) = self.peek() {
            if self.starts_with("*/") {
                let start = self.mark();
                self.advance_by(2);
                self.emit(TokenKind::DocCommentCloseTag, start);
                return;
            }

            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.lex_whitespace(TokenKind::DocCommentWhitespace);
                    if self.column == 1 {
                        at_line_start = true;
                        expect_tag = true;
                    }
                }
                '*' if at_line_start => {
                    let start = self.mark();
                    self.advance();
                    self.emit(TokenKind::DocCommentStar, start);
                    at_line_start = false;
                    expect_tag = true;
                }
                '@' if expect_tag && self.peek_at(1).is_some_and(is_tag_char) => {
                    let start = self.mark();
                    self.advance();
                    while self.peek().is_some_and(is_tag_char) {
                        self.advance();
                    }
                    self.emit(TokenKind::DocCommentTag, start);
                    at_line_start = false;
                    expect_tag = false;
                }
                _ => {
                    self.lex_doc_comment_string();
                    at_line_start = false;
                    expect_tag = false;
                }
            }
        }
    }

    /// Text up to the end of the line or comment, without trailing blanks
    fn lex_doc_comment_string(&mut self) {
        let start = self.mark();
        let rest = self.rest();
        let line_end = rest.find('\n').unwrap_or(rest.len());
        let close = rest.find("*/").unwrap_or(rest.len());
        let end = line_end.min(close);
        let text = rest[..end].trim_end_matches([' ', '\t', '\r']);
        let chars = text.chars().count().max(1);
        self.advance_by(chars);
        self.emit(TokenKind::DocCommentString, start);
    }

    fn lex_quoted(&mut self, quote: char, kind: TokenKind) {
        let start = self.mark();
        self.advance();
        while let Some(ch) = self.advance() {
            if ch == '\\' {
                self.advance();
            } else if ch == quote {
                break;
            }
        }
        self.emit(kind, start);
    }

    fn lex_heredoc(&mut self) {
        let start = self.mark();
        self.advance_by(3);
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.advance();
        }
        if matches!(self.peek(), Some('\'') | Some('"')) {
            self.advance();
        }
        let label_start = self.position;
        while self.peek().is_some_and(is_ident_char) {
            self.advance();
        }
        let label = self.input[label_start..self.position].to_string();

        if label.is_empty() {
            self.emit(TokenKind::Operator, start);
            return;
        }

        // Skip to the end of the opening line
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }

        while self.position < self.input.len() {
            let line = self.rest();
            let trimmed = line.trim_start_matches([' ', '\t']);
            if let Some(after) = trimmed.strip_prefix(label.as_str()) {
                if !after.chars().next().is_some_and(is_ident_char) {
                    let indent = line.len() - trimmed.len();
                    self.advance_by(indent + label.chars().count());
                    break;
                }
            }
            while let Some(ch) = self.advance() {
                if ch == '\n' {
                    break;
                }
            }
        }

        self.emit(TokenKind::Heredoc, start);
    }

    fn lex_number(&mut self) {
        let start = self.mark();
        let mut is_float = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else if ch == '.' && !is_float && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.advance();
            } else if ch == '.' && !is_float && self.position > start.position {
                // `1.` is a float as well
                is_float = true;
                self.advance();
            } else {
                break;
            }
        }
        let kind = if is_float {
            TokenKind::DNumber
        } else {
            TokenKind::LNumber
        };
        self.emit(kind, start);
    }

    fn read_identifier(&mut self) {
        while self.peek().is_some_and(is_ident_char) {
            self.advance();
        }
    }

    fn lex_name(&mut self) {
        let start = self.mark();
        loop {
            if self.peek() == Some('\\') {
                self.advance();
            }
            self.read_identifier();
            if !(self.peek() == Some('\\') && self.peek_at(1).is_some_and(is_ident_start)) {
                break;
            }
        }

        let text = &self.input[start.position..self.position];
        let kind = keyword(text).unwrap_or(TokenKind::String);
        self.emit(kind, start);
    }

    fn lex_operator(&mut self) {
        let start = self.mark();

        if let Some(op) = OPERATORS_3.iter().find(|op| self.starts_with(op)) {
            self.advance_by(3);
            let kind = if *op == "?->" {
                TokenKind::ObjectOperator
            } else {
                TokenKind::Operator
            };
            self.emit(kind, start);
            return;
        }

        if let Some(op) = OPERATORS_2.iter().find(|op| self.starts_with(op)) {
            self.advance_by(2);
            let kind = match *op {
                "::" => TokenKind::DoubleColon,
                "->" => TokenKind::ObjectOperator,
                "=>" => TokenKind::DoubleArrow,
                _ => TokenKind::Operator,
            };
            self.emit(kind, start);
            return;
        }

        let Some(ch) = self.advance() else {
            return;
        };
        let kind = match ch {
            '(' => TokenKind::OpenParenthesis,
            ')' => TokenKind::CloseParenthesis,
            '{' => TokenKind::OpenCurlyBracket,
            '}' => TokenKind::CloseCurlyBracket,
            '[' => TokenKind::OpenSquareBracket,
            ']' => TokenKind::CloseSquareBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '=' => TokenKind::Equal,
            '&' => TokenKind::BitwiseAnd,
            _ => TokenKind::Operator,
        };
        self.emit(kind, start);
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || !ch.is_ascii()
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '\\' | ':')
}

/// Keyword kind for a bare identifier (keywords are case-insensitive)
fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text.to_ascii_lowercase().as_str() {
        "class" => TokenKind::Class,
        "interface" => TokenKind::Interface,
        "trait" => TokenKind::Trait,
        "function" => TokenKind::Function,
        "fn" => TokenKind::Fn,
        "abstract" => TokenKind::Abstract,
        "final" => TokenKind::Final,
        "static" => TokenKind::Static,
        "public" => TokenKind::Public,
        "protected" => TokenKind::Protected,
        "private" => TokenKind::Private,
        "var" => TokenKind::Var,
        "const" => TokenKind::Const,
        "readonly" => TokenKind::Readonly,
        "return" => TokenKind::Return,
        "array" => TokenKind::Array,
        "new" => TokenKind::New,
        "extends" => TokenKind::Extends,
        "implements" => TokenKind::Implements,
        "namespace" => TokenKind::Namespace,
        "use" => TokenKind::Use,
        _ => return None,
    };
    Some(kind)
}

/// Lex `source` into tokens without scope annotations
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex(source).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_round_trip() {
        let source = "<h1>x</h1>\n<?php\n/**\n * @return int\n */\nfunction a() { return $b->c ?? 'd'; } ?>\ntail";
        let joined: String = texts(source).concat();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_short_open_tag_before_multibyte_text() {
        let source = "<p>Préface <?é€ x</p>";
        let tokens = lex(source);
        assert_eq!(tokens[0].kind, TokenKind::InlineHtml);
        assert_eq!(tokens[1].kind, TokenKind::OpenTag);
        assert_eq!(tokens[1].text, "<?");
        assert_eq!(texts(source).concat(), source);

        assert_eq!(texts("<?ph").concat(), "<?ph");
    }

    #[test]
    fn test_attribute_start() {
        let tokens = lex("<?php #[Pure] # note");
        assert_eq!(tokens[2].kind, TokenKind::AttributeStart);
        assert_eq!(tokens[2].text, "#[");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Comment));
    }

    #[test]
    fn test_whitespace_split_per_line() {
        let tokens = lex("<?php\n\n  $a;");
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[1].text, "\n");
        assert_eq!(tokens[2].text, "\n");
        assert_eq!(tokens[3].text, "  ");
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_doc_comment_parts() {
        let tokens = lex("<?php\n/**\n * @return int the value\n */");
        let parts: Vec<(TokenKind, &str)> = tokens
            .iter()
            .skip(2)
            .map(|t| (t.kind, t.text.as_str()))
            .collect();
        assert_eq!(
            parts,
            vec![
                (TokenKind::DocCommentOpenTag, "/**"),
                (TokenKind::DocCommentWhitespace, "\n"),
                (TokenKind::DocCommentWhitespace, " "),
                (TokenKind::DocCommentStar, "*"),
                (TokenKind::DocCommentWhitespace, " "),
                (TokenKind::DocCommentTag, "@return"),
                (TokenKind::DocCommentWhitespace, " "),
                (TokenKind::DocCommentString, "int the value"),
                (TokenKind::DocCommentWhitespace, "\n"),
                (TokenKind::DocCommentWhitespace, " "),
                (TokenKind::DocCommentCloseTag, "*/"),
            ]
        );
    }

    #[test]
    fn test_inline_doc_comment_tag() {
        let k = kinds("<?php /** @var int */");
        assert_eq!(
            k,
            vec![
                TokenKind::OpenTag,
                TokenKind::Whitespace,
                TokenKind::DocCommentOpenTag,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentTag,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentString,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentCloseTag,
            ]
        );
    }

    #[test]
    fn test_email_is_not_a_tag() {
        let tokens = lex("<?php\n/**\n * Mail me@example.com\n */");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::DocCommentString && t.text == "Mail me@example.com"));
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::DocCommentTag));
    }

    #[test]
    fn test_block_comment_split_per_line() {
        let tokens = lex("<?php /* a\nb */");
        let comments: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comment)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(comments, vec!["/* a\n", "b */"]);
    }

    #[test]
    fn test_line_comment_includes_newline() {
        let tokens = lex("<?php\n// hello\n$a;");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].text, "// hello\n");
        assert_eq!(tokens[3].kind, TokenKind::Variable);
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let k = kinds("<?php Public FUNCTION foo");
        assert_eq!(k[2], TokenKind::Public);
        assert_eq!(k[4], TokenKind::Function);
        assert_eq!(k[6], TokenKind::String);
    }

    #[test]
    fn test_operators() {
        let k = kinds("<?php $a?->b::c => [1];");
        assert!(k.contains(&TokenKind::ObjectOperator));
        assert!(k.contains(&TokenKind::DoubleColon));
        assert!(k.contains(&TokenKind::DoubleArrow));
        assert!(k.contains(&TokenKind::OpenSquareBracket));
    }

    #[test]
    fn test_heredoc() {
        let source = "<?php\n$a = <<<EOT\nline {$x}\nEOT;\n";
        let tokens = lex(source);
        let heredoc = tokens.iter().find(|t| t.kind == TokenKind::Heredoc).unwrap();
        assert_eq!(heredoc.text, "<<<EOT\nline {$x}\nEOT");
        assert_eq!(texts(source).concat(), source);
    }

    #[test]
    fn test_strings_with_escapes() {
        let tokens = lex(r#"<?php 'it\'s' "a \"b\"";"#);
        assert_eq!(tokens[2].text, r"'it\'s'");
        assert_eq!(tokens[4].text, r#""a \"b\"""#);
    }

    #[test]
    fn test_unterminated_input_is_total() {
        let source = "<?php /** @return";
        assert_eq!(texts(source).concat(), source);
        let source = "<?php 'open";
        assert_eq!(texts(source).concat(), source);
    }
}
