//! Serialization of resolved trees into output artifacts.

pub mod css;
pub mod json;
