//! sniffer-rules: Symfony coding standard rules
//!
//! Available rules:
//! - class_comment: Classes need a `/** */` comment; @package and
//!   @subpackage tags are removed
//! - function_comment: Public functions need a doc comment whose @return
//!   tag matches what the body returns
//! - method_visibility_order: Public methods first, then protected, then private
//! - property_and_method_order: Properties before methods
//! - multi_line_array_comma: Trailing comma after the last item of a
//!   multi-line array

pub mod commenting;
pub mod formatting;
pub mod registry;

pub use commenting::{ClassCommentSniff, FunctionCommentSniff};
pub use formatting::{MethodVisibilityOrder, MultiLineArrayCommaSniff, PropertyAndMethodOrder};
pub use registry::{RuleInfo, RuleRegistry};
