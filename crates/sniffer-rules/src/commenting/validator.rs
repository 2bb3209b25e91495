//! Generic doc comment tag validation
//!
//! A `CommentValidator` checks a comment block against an ordered table of
//! known tags. Rules customise it through `TagHooks`: claimed tags bypass
//! the table and go to `handle_tag`, and `handle_return` runs once after
//! all tags have been seen.

use std::collections::HashMap;

use sniffer_core::{CommentBlock, Pass, Tag};

/// A known tag and its constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    pub name: &'static str,
    pub required: bool,
    pub allow_multiple: bool,
}

impl TagSpec {
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            allow_multiple: false,
        }
    }

    pub const fn multiple(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            allow_multiple: true,
        }
    }
}

/// Rule-specific behaviour plugged into the validator
pub trait TagHooks {
    /// Whether the hook handles `name` itself
    fn claims(&self, _name: &str) -> bool {
        false
    }

    /// Called for every occurrence of a claimed tag, in source order
    fn handle_tag(&self, _pass: &mut Pass<'_>, _block: &CommentBlock, _tag: &Tag) {}

    /// Called once per comment, after every tag was processed
    fn handle_return(&self, _pass: &mut Pass<'_>, _ptr: usize, _block: &CommentBlock) {}
}

/// Hooks that claim nothing
pub struct NoHooks;

impl TagHooks for NoHooks {}

/// Validates comment blocks against a tag table
pub struct CommentValidator {
    /// What the comment documents, used in messages ("class", "function")
    subject: &'static str,
    tags: &'static [TagSpec],
}

impl CommentValidator {
    pub const fn new(subject: &'static str, tags: &'static [TagSpec]) -> Self {
        Self { subject, tags }
    }

    pub fn tags(&self) -> &'static [TagSpec] {
        self.tags
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tags.iter().position(|spec| spec.name == name)
    }

    /// Validate the comment `block` documenting the declaration at `ptr`
    pub fn validate(&self, pass: &mut Pass<'_>, ptr: usize, block: &CommentBlock, hooks: &dyn TagHooks) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut furthest: Option<(usize, &str)> = None;

        for tag in &block.tags {
            if hooks.claims(&tag.name) {
                hooks.handle_tag(pass, block, tag);
                continue;
            }

            if tag.name == "@see" && tag.content.is_none() {
                pass.add_error(
                    format!("Content missing for @see tag in {} comment", self.subject),
                    tag.token,
                    "EmptySees",
                );
            }

            let Some(position) = self.position(&tag.name) else {
                continue;
            };
            let spec = self.tags[position];

            let count = counts.entry(spec.name).or_insert(0);
            *count += 1;
            if *count > 1 && !spec.allow_multiple {
                pass.add_error(
                    format!(
                        "Only one {} tag is allowed in a {} comment",
                        spec.name, self.subject
                    ),
                    tag.token,
                    &format!("Duplicate{}Tag", tag_code(spec.name)),
                );
            }

            match furthest {
                Some((seen, seen_name)) if position < seen => {
                    pass.add_error(
                        format!(
                            "The {} tag is in the wrong order; the tag precedes {}",
                            spec.name, seen_name
                        ),
                        tag.token,
                        &format!("{}TagOrder", tag_code(spec.name)),
                    );
                }
                _ => furthest = Some((position, spec.name)),
            }
        }

        for spec in self.tags.iter().filter(|spec| spec.required) {
            if !block.tags.iter().any(|tag| tag.name == spec.name) {
                pass.add_error(
                    format!("Missing {} tag in {} comment", spec.name, self.subject),
                    block.closer,
                    &format!("Missing{}Tag", tag_code(spec.name)),
                );
            }
        }

        hooks.handle_return(pass, ptr, block);
    }
}

/// `@author` becomes `Author`
fn tag_code(name: &str) -> String {
    let bare = name.trim_start_matches('@');
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
