//! Member ordering and array layout rules

pub mod method_visibility_order;
pub mod multi_line_array_comma;
pub mod property_and_method_order;

pub use method_visibility_order::MethodVisibilityOrder;
pub use multi_line_array_comma::MultiLineArrayCommaSniff;
pub use property_and_method_order::PropertyAndMethodOrder;
