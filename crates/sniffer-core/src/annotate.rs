//! Scope annotation pass over a lexed token list
//!
//! Resolves parenthesis, bracket and brace pairs, assigns scope owners,
//! records the enclosing conditions of every token and links doc comment
//! openers, closers and tags.

use std::collections::HashMap;

use crate::token::{Condition, ScopeKind, Token, TokenKind};

/// Tokens after which `[` is an offset access rather than a short array
const OFFSET_PRECEDERS: &[TokenKind] = &[
    TokenKind::Variable,
    TokenKind::String,
    TokenKind::CloseSquareBracket,
    TokenKind::CloseShortArray,
    TokenKind::CloseParenthesis,
    TokenKind::CloseCurlyBracket,
    TokenKind::ConstantEncapsedString,
    TokenKind::DoubleQuotedString,
];

/// Keywords that read as plain names after these tokens
const NAME_CONTEXT: &[TokenKind] = &[
    TokenKind::ObjectOperator,
    TokenKind::DoubleColon,
    TokenKind::Function,
    TokenKind::Const,
];

/// Run every annotation step in order
pub fn annotate(tokens: &mut [Token]) {
    for (index, token) in tokens.iter_mut().enumerate() {
        token.index = index;
    }

    retype_keywords(tokens);
    pair_parentheses(tokens);
    pair_brackets(tokens);
    let owners = assign_scope_owners(tokens);
    pair_braces(tokens, &owners);
    assign_conditions(tokens, &owners);
    link_doc_comments(tokens);
}

fn is_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Trait
            | TokenKind::Function
            | TokenKind::Fn
            | TokenKind::Abstract
            | TokenKind::Final
            | TokenKind::Static
            | TokenKind::Public
            | TokenKind::Protected
            | TokenKind::Private
            | TokenKind::Var
            | TokenKind::Const
            | TokenKind::Readonly
            | TokenKind::Return
            | TokenKind::Array
            | TokenKind::New
            | TokenKind::Extends
            | TokenKind::Implements
            | TokenKind::Namespace
            | TokenKind::Use
    )
}

fn prev_significant(tokens: &[Token], index: usize) -> Option<usize> {
    (0..index).rev().find(|&i| !tokens[i].kind.is_empty())
}

fn next_significant(tokens: &[Token], index: usize) -> Option<usize> {
    (index + 1..tokens.len()).find(|&i| !tokens[i].kind.is_empty())
}

/// Resolve keywords whose meaning depends on their neighbours
fn retype_keywords(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        let kind = tokens[i].kind;
        if !is_keyword(kind) {
            continue;
        }

        let prev = prev_significant(tokens, i).map(|p| tokens[p].kind);

        // `static::`, `self::` style uses are names but `static` keeps its kind
        if prev.is_some_and(|p| NAME_CONTEXT.contains(&p)) && kind != TokenKind::Static {
            tokens[i].kind = TokenKind::String;
            continue;
        }

        match kind {
            // `use function Foo\bar;` imports, it does not declare
            TokenKind::Function | TokenKind::Const if prev == Some(TokenKind::Use) => {
                tokens[i].kind = TokenKind::String;
            }
            TokenKind::Class if prev == Some(TokenKind::New) => {
                tokens[i].kind = TokenKind::AnonClass;
            }
            TokenKind::Function => {
                let mut next = next_significant(tokens, i);
                if next.is_some_and(|n| tokens[n].kind == TokenKind::BitwiseAnd) {
                    next = next.and_then(|n| next_significant(tokens, n));
                }
                if next.is_some_and(|n| tokens[n].kind == TokenKind::OpenParenthesis) {
                    tokens[i].kind = TokenKind::Closure;
                }
            }
            _ => {}
        }
    }
}

fn pair_parentheses(tokens: &mut [Token]) {
    let mut stack = Vec::new();
    for i in 0..tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenParenthesis => stack.push(i),
            TokenKind::CloseParenthesis => {
                if let Some(opener) = stack.pop() {
                    tokens[opener].paren_opener = Some(opener);
                    tokens[opener].paren_closer = Some(i);
                    tokens[i].paren_opener = Some(opener);
                    tokens[i].paren_closer = Some(i);
                }
            }
            _ => {}
        }
    }

    // Owners of a parenthesised list: `array(...)` and function parameters
    for i in 0..tokens.len() {
        let kind = tokens[i].kind;
        if !matches!(
            kind,
            TokenKind::Array | TokenKind::Function | TokenKind::Closure | TokenKind::Fn
        ) {
            continue;
        }

        let mut next = next_significant(tokens, i);
        if kind != TokenKind::Array {
            if next.is_some_and(|n| tokens[n].kind == TokenKind::BitwiseAnd) {
                next = next.and_then(|n| next_significant(tokens, n));
            }
            if kind == TokenKind::Function
                && next.is_some_and(|n| tokens[n].kind == TokenKind::String)
            {
                next = next.and_then(|n| next_significant(tokens, n));
            }
        }

        if let Some(open) = next {
            if tokens[open].kind == TokenKind::OpenParenthesis {
                tokens[i].paren_opener = tokens[open].paren_opener;
                tokens[i].paren_closer = tokens[open].paren_closer;
            }
        }
    }
}

fn pair_brackets(tokens: &mut [Token]) {
    let mut stack: Vec<usize> = Vec::new();
    for i in 0..tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenSquareBracket => {
                let prev = prev_significant(tokens, i).map(|p| tokens[p].kind);
                if !prev.is_some_and(|p| OFFSET_PRECEDERS.contains(&p)) {
                    tokens[i].kind = TokenKind::OpenShortArray;
                }
                stack.push(i);
            }
            TokenKind::AttributeStart => stack.push(i),
            TokenKind::CloseSquareBracket => {
                let Some(opener) = stack.pop() else {
                    continue;
                };
                match tokens[opener].kind {
                    TokenKind::OpenShortArray => tokens[i].kind = TokenKind::CloseShortArray,
                    TokenKind::AttributeStart => tokens[i].kind = TokenKind::AttributeEnd,
                    _ => {}
                }
                tokens[opener].bracket_opener = Some(opener);
                tokens[opener].bracket_closer = Some(i);
                tokens[i].bracket_opener = Some(opener);
                tokens[i].bracket_closer = Some(i);
            }
            _ => {}
        }
    }
}

/// Map each owned `{` to the keyword that owns it
fn assign_scope_owners(tokens: &[Token]) -> HashMap<usize, usize> {
    let mut owners = HashMap::new();

    for (i, token) in tokens.iter().enumerate() {
        if !token.kind.is_scope_owner() {
            continue;
        }

        let mut j = i + 1;
        while j < tokens.len() {
            match tokens[j].kind {
                TokenKind::OpenParenthesis => match tokens[j].paren_closer {
                    Some(closer) => j = closer,
                    None => break,
                },
                TokenKind::OpenCurlyBracket => {
                    owners.entry(j).or_insert(i);
                    break;
                }
                TokenKind::Semicolon | TokenKind::CloseCurlyBracket => break,
                _ => {}
            }
            j += 1;
        }
    }

    owners
}

fn pair_braces(tokens: &mut [Token], owners: &HashMap<usize, usize>) {
    let mut stack = Vec::new();
    for i in 0..tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenCurlyBracket => stack.push(i),
            TokenKind::CloseCurlyBracket => {
                let Some(opener) = stack.pop() else {
                    continue;
                };
                for index in [opener, i] {
                    tokens[index].scope_opener = Some(opener);
                    tokens[index].scope_closer = Some(i);
                }
                if let Some(&owner) = owners.get(&opener) {
                    tokens[owner].scope_opener = Some(opener);
                    tokens[owner].scope_closer = Some(i);
                }
            }
            _ => {}
        }
    }
}

fn assign_conditions(tokens: &mut [Token], owners: &HashMap<usize, usize>) {
    let mut stack: Vec<Condition> = Vec::new();

    for i in 0..tokens.len() {
        if tokens[i].kind == TokenKind::CloseCurlyBracket {
            let owner = tokens[i]
                .scope_opener
                .and_then(|opener| owners.get(&opener).copied());
            if owner.is_some() && stack.last().map(|c| c.owner) == owner {
                stack.pop();
            }
        }

        tokens[i].conditions = stack.clone();

        if tokens[i].kind == TokenKind::OpenCurlyBracket {
            if let Some(&owner) = owners.get(&i) {
                if let Some(kind) = ScopeKind::of_owner(tokens[owner].kind) {
                    stack.push(Condition { owner, kind });
                }
            }
        }
    }
}

fn link_doc_comments(tokens: &mut [Token]) {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind != TokenKind::DocCommentOpenTag {
            i += 1;
            continue;
        }

        let opener = i;
        let mut tags = Vec::new();
        let mut closer = None;
        let mut j = i + 1;
        while j < tokens.len() {
            match tokens[j].kind {
                TokenKind::DocCommentTag => tags.push(j),
                TokenKind::DocCommentCloseTag => {
                    closer = Some(j);
                    break;
                }
                kind if !kind.is_empty() => break,
                _ => {}
            }
            j += 1;
        }

        tokens[opener].comment_opener = Some(opener);
        tokens[opener].comment_closer = closer;
        tokens[opener].comment_tags = tags;
        if let Some(closer) = closer {
            tokens[closer].comment_opener = Some(opener);
            tokens[closer].comment_closer = Some(closer);
        }

        i = j.max(i + 1);
    }
}
