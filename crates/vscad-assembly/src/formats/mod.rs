//! Built-in exchange formats.

pub mod json;
