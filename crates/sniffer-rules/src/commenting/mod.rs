//! Doc comment rules

pub mod class_comment;
pub mod function_comment;
pub mod validator;

pub use class_comment::ClassCommentSniff;
pub use function_comment::FunctionCommentSniff;
pub use validator::{CommentValidator, TagHooks, TagSpec};

use sniffer_core::{logging, CommentBlock, Fixer, Pass, Tag, TokenKind};

/// Delete `tag` from its comment, logging a rejected changeset
///
/// A line made only of comment body tokens goes whole. On a line shared with
/// the comment delimiters or with code, only the tag and its text up to the
/// next tag, the closer or the line break are removed.
pub(crate) fn delete_tag(pass: &mut Pass<'_>, rule: &str, block: &CommentBlock, tag: &Tag) {
    let tokens = pass.tokens;
    let result = match Fixer::line_span(tokens, tag.token) {
        Some((first, last)) if first > block.opener && last < block.closer => {
            pass.fixer.delete_range(first, last)
        }
        _ => {
            let line = tokens[tag.token].line;
            let mut end = tag.token;
            while end + 1 < block.closer
                && tokens[end + 1].line == line
                && tokens[end + 1].kind != TokenKind::DocCommentTag
                && !tokens[end + 1].text.contains('\n')
            {
                end += 1;
            }
            pass.fixer.delete_range(tag.token, end)
        }
    };

    if let Err(err) = result {
        logging::log_rejected_changeset(&pass.file.path, rule, &err);
    }
}
