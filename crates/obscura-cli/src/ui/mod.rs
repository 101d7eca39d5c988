//! Terminal output helpers.

pub mod table;
pub mod theme;

pub use theme::{Theme, format_size};
