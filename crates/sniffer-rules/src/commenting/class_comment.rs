//! Require a `/** */` comment on classes and reject @package annotations

use sniffer_core::{CommentBlock, Pass, Sniff, Tag, TokenKind};

use super::delete_tag;
use super::validator::{CommentValidator, TagHooks, TagSpec};

const NAME: &str = "class_comment";

/// Known class comment tags in canonical order
const CLASS_TAGS: &[TagSpec] = &[
    TagSpec::optional("@category"),
    TagSpec::optional("@package"),
    TagSpec::optional("@subpackage"),
    TagSpec::multiple("@author"),
    TagSpec::multiple("@copyright"),
    TagSpec::optional("@license"),
    TagSpec::optional("@version"),
    TagSpec::multiple("@link"),
    TagSpec::multiple("@see"),
    TagSpec::optional("@since"),
    TagSpec::optional("@deprecated"),
];

const VALIDATOR: CommentValidator = CommentValidator::new("class", CLASS_TAGS);

/// Tokens that may sit between a class comment and the class keyword
const CLASS_PREFIXES: &[TokenKind] = &[
    TokenKind::Abstract,
    TokenKind::Final,
    TokenKind::Readonly,
    TokenKind::Whitespace,
];

pub struct ClassCommentSniff;

impl Sniff for ClassCommentSniff {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        "Symfony.Commenting.ClassComment"
    }

    fn description(&self) -> &'static str {
        "Classes need a doc comment without @package or @subpackage tags"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Class, TokenKind::Interface, TokenKind::Trait]
    }

    fn process(&mut self, pass: &mut Pass<'_>, ptr: usize) {
        let comment_end = pass.tokens.preceding_comment_end(ptr, CLASS_PREFIXES);

        let kind = comment_end.map(|end| pass.tokens[end].kind);
        match kind {
            Some(TokenKind::DocCommentCloseTag) => {
                pass.record_metric(ptr, "Class has doc comment", "yes");
            }
            Some(TokenKind::Comment) => {
                pass.record_metric(ptr, "Class has doc comment", "yes");
                pass.add_error(
                    "You must use \"/**\" style comments for a class comment",
                    ptr,
                    "WrongStyle",
                );
                return;
            }
            _ => {
                pass.add_error("Missing class doc comment", ptr, "Missing");
                pass.record_metric(ptr, "Class has doc comment", "no");
                return;
            }
        }

        let Some(block) = comment_end.and_then(|end| pass.tokens.comment_block(end)) else {
            return;
        };
        VALIDATOR.validate(pass, ptr, &block, &UnusedAnnotations);
    }
}

/// Reports every @package and @subpackage tag and deletes its line
struct UnusedAnnotations;

impl TagHooks for UnusedAnnotations {
    fn claims(&self, name: &str) -> bool {
        matches!(name, "@package" | "@subpackage")
    }

    fn handle_tag(&self, pass: &mut Pass<'_>, block: &CommentBlock, tag: &Tag) {
        let code = if tag.name == "@package" {
            "InvalidPackage"
        } else {
            "InvalidSubpackage"
        };

        let fix = pass.add_fixable_error(
            format!("The {} annotation is not used", tag.name),
            tag.token,
            code,
        );
        if fix {
            delete_tag(pass, NAME, block, tag);
        }
    }
}
