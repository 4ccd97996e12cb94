//! Unknown-field container: per-field value accumulation and the
//! field-number-ordered set with its copy-on-write builder.

mod field;
mod set;

pub use field::{UnknownField, UnknownFieldBuilder};
pub use set::{UnknownFields, UnknownFieldsBuilder};
