//! # Prism Core
//!
//! The token engine behind the `prism` command: layered design-token sets
//! in, resolved per-target trees out.
//!
//! ## Pipeline
//!
//! ```text
//! LayerStore              ← loaded layers + base order ($metadata or lexical)
//!     │
//! select_layers           ← effective order for one (alias, theme) target
//!     │
//! merge                   ← one tree, later layers win at the leaf
//!     │
//! resolve                 ← {path.to.token} references → literals
//!     │
//! normalize               ← opacity and font-weight canonical forms
//!     │
//! TokenTree               ← resolved tree, one per target
//! ```
//!
//! Every stage is a pure tree-in/tree-out transformation; targets share
//! nothing but the immutable layer store. Warnings travel as returned
//! [`Diagnostic`] values, never as a logger side channel, so callers decide
//! how to surface them.

pub mod emit;
pub mod error;
pub mod layer;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod select;
pub mod token;
pub mod validate;

pub use error::{BuildError, Diagnostic, LoadError};
pub use layer::{LayerStore, TokenSet};
pub use pipeline::{Compiler, TargetOutcome};
pub use select::{BuildTarget, Theme, select_layers};
pub use token::{Scalar, Token, TokenKind, TokenNode, TokenPath, TokenTree, TokenValue};
pub use validate::{ValidationReport, validate_css};
