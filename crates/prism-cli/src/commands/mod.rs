pub mod build;
pub mod order;
pub mod validate;
