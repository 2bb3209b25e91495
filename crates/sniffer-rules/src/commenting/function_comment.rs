//! Function doc comments and their @return tag
//!
//! Public functions need a doc comment. Comments containing
//! `{@inheritdoc}` are skipped. The @return tag must match the body:
//!
//! | @return tag | value-bearing return | outcome                       |
//! |-------------|----------------------|-------------------------------|
//! | yes         | yes                  | tag needs a type              |
//! | yes         | no                   | tag should be omitted (fix)   |
//! | no          | yes                  | missing tag, at comment close |
//! | no          | no                   | valid                         |

use sniffer_core::{CommentBlock, Pass, Sniff, TokenKind, TokenStream, Visibility};

use super::delete_tag;
use super::validator::{CommentValidator, TagHooks, TagSpec};

const NAME: &str = "function_comment";

/// Known function comment tags in canonical order
const FUNCTION_TAGS: &[TagSpec] = &[
    TagSpec::multiple("@param"),
    TagSpec::optional("@return"),
    TagSpec::multiple("@throws"),
    TagSpec::multiple("@see"),
    TagSpec::optional("@since"),
    TagSpec::optional("@deprecated"),
];

const VALIDATOR: CommentValidator = CommentValidator::new("function", FUNCTION_TAGS);

/// Tokens the comment search stops at
const COMMENT_BOUNDARIES: &[TokenKind] = &[
    TokenKind::Comment,
    TokenKind::DocCommentCloseTag,
    TokenKind::Class,
    TokenKind::Interface,
    TokenKind::Trait,
    TokenKind::AnonClass,
    TokenKind::Function,
    TokenKind::Closure,
    TokenKind::OpenTag,
];

const INHERITDOC: &str = "{@inheritdoc}";

/// Whether the comment text carries an inheritance marker
fn has_inheritdoc(content: &str) -> bool {
    content.to_ascii_lowercase().contains(INHERITDOC)
}

pub struct FunctionCommentSniff;

impl Sniff for FunctionCommentSniff {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        "Symfony.Commenting.FunctionComment"
    }

    fn description(&self) -> &'static str {
        "Public functions need a doc comment whose @return tag matches the body"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn process(&mut self, pass: &mut Pass<'_>, ptr: usize) {
        let tokens = pass.tokens;
        let Some(boundary) = ptr
            .checked_sub(1)
            .and_then(|start| tokens.find_previous(COMMENT_BOUNDARIES, start, None, false))
        else {
            return;
        };

        let has_doc_comment = tokens[boundary].kind == TokenKind::DocCommentCloseTag;
        if has_doc_comment {
            if let Some(opener) = tokens[boundary].comment_opener {
                if has_inheritdoc(&tokens.content(opener, boundary)) {
                    return;
                }
            }
        }

        let required = tokens.method_properties(ptr).visibility == Visibility::Public;
        if !required && !has_doc_comment {
            return;
        }

        let Some(block) = presence(pass, ptr, required) else {
            return;
        };
        VALIDATOR.validate(pass, ptr, &block, &ReturnTag);
    }
}

/// Check the comment directly above the declaration at `ptr`
///
/// Returns the comment block when there is one to validate.
fn presence(pass: &mut Pass<'_>, ptr: usize, required: bool) -> Option<CommentBlock> {
    let tokens = pass.tokens;
    let mut skip = TokenKind::METHOD_PREFIXES.to_vec();
    skip.push(TokenKind::Whitespace);

    let comment_end = tokens.preceding_comment_end(ptr, &skip);

    match comment_end.map(|end| tokens[end].kind) {
        Some(TokenKind::DocCommentCloseTag) => {}
        Some(TokenKind::Comment) if required => {
            pass.record_metric(ptr, "Function has doc comment", "yes");
            pass.add_error(
                "You must use \"/**\" style comments for a function comment",
                ptr,
                "WrongStyle",
            );
            return None;
        }
        _ if required => {
            pass.add_error("Missing function doc comment", ptr, "Missing");
            pass.record_metric(ptr, "Function has doc comment", "no");
            return None;
        }
        _ => return None,
    }

    let comment_end = comment_end?;
    pass.record_metric(ptr, "Function has doc comment", "yes");

    let declaration_start = tokens.next_significant(comment_end + 1, Some(ptr))?;
    if tokens[comment_end].line + 1 != tokens[declaration_start].line {
        pass.add_error(
            "There must be no blank lines after the function comment",
            comment_end,
            "SpacingAfter",
        );
    }

    tokens.comment_block(comment_end)
}

/// The @return tag checks
struct ReturnTag;

impl TagHooks for ReturnTag {
    fn claims(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case("@return")
    }

    fn handle_return(&self, pass: &mut Pass<'_>, ptr: usize, block: &CommentBlock) {
        let tokens = pass.tokens;
        if matches!(
            tokens.declaration_name(ptr),
            Some("__construct") | Some("__destruct")
        ) {
            return;
        }

        let mut return_tag = None;
        for tag in block.tags_named("@return") {
            if return_tag.is_some() {
                let fix = pass.add_fixable_error(
                    "Only 1 @return tag is allowed in a function comment",
                    tag.token,
                    "DuplicateReturn",
                );
                if fix {
                    delete_tag(pass, NAME, block, tag);
                }
                return;
            }
            return_tag = Some(tag);
        }

        // Abstract and interface methods have no body to compare against
        if tokens[ptr].scope_opener.is_none() {
            return;
        }

        match (return_tag, returns_value(tokens, ptr)) {
            (Some(tag), true) => {
                if tag.content.as_deref().map_or(true, str::is_empty) {
                    pass.add_error(
                        "Return type missing for @return tag in function comment",
                        tag.token,
                        "MissingReturnType",
                    );
                }
            }
            (Some(tag), false) => {
                let fix = pass.add_fixable_error(
                    "Omit @return tag if the method does not return anything",
                    tag.token,
                    "OmitReturn",
                );
                if fix {
                    delete_tag(pass, NAME, block, tag);
                }
            }
            (None, true) => {
                pass.add_error(
                    "Missing @return tag in function comment",
                    block.closer,
                    "MissingReturn",
                );
            }
            (None, false) => {}
        }
    }
}

/// Whether the body of the function at `ptr` returns a value
///
/// Returns belonging to nested closures or functions do not count.
fn returns_value(tokens: &TokenStream, ptr: usize) -> bool {
    let Some(scope) = tokens.scope_of(ptr) else {
        return false;
    };

    let mut start = scope.opener + 1;
    while let Some(found) = tokens.find_next(&[TokenKind::Return], start, Some(scope.closer), false) {
        start = found + 1;

        if tokens.owning_function(found) != Some(ptr) {
            continue;
        }

        let next = tokens.next_significant(found + 1, Some(scope.closer));
        if next.is_some_and(|n| tokens[n].kind != TokenKind::Semicolon) {
            return true;
        }
    }

    false
}
