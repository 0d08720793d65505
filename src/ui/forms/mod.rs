//! Form rendering module
//!
//! - `field_renderer`: bordered text fields with cursor and validation message

mod field_renderer;

pub use field_renderer::{draw_field, draw_help_text, FieldView};
