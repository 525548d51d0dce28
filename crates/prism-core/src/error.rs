//! Error and diagnostic taxonomy for the token engine.
//!
//! Errors are fatal for the build target that produced them and never leak
//! into other targets. Diagnostics are non-fatal: they accumulate per target
//! and are returned alongside the result, never thrown.

use std::fmt;

/// A build target cannot be resolved. Fatal for that target only.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    /// The effective layer order cannot satisfy the target.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A reference chain revisits a path already in progress.
    #[error("cyclic reference: {chain}")]
    CyclicReference { chain: String },
}

/// Errors while loading token layers from disk or splitting a combined
/// document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{path}: I/O error: {message}")]
    Io { path: String, message: String },

    #[error("{path}: parse error: {message}")]
    Parse { path: String, message: String },

    #[error("no token layers found under {0}")]
    Empty(String),
}

/// A non-fatal condition observed during merge, resolution, or
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    /// A reference points at a path that does not exist in the merged tree.
    /// The original reference string is preserved verbatim in the output.
    UnresolvedReference { path: String, reference: String },

    /// A normalizer could not interpret a value; the original value is
    /// preserved verbatim.
    Normalization {
        path: String,
        value: String,
        reason: String,
    },

    /// Two layers define the same path with different kinds. Last writer
    /// wins; this is surfaced for observability only.
    KindConflict {
        path: String,
        earlier: String,
        later: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedReference { path, reference } => {
                write!(f, "{path}: unresolved reference {{{reference}}}")
            }
            Diagnostic::Normalization {
                path,
                value,
                reason,
            } => {
                write!(f, "{path}: could not normalize {value:?}: {reason}")
            }
            Diagnostic::KindConflict {
                path,
                earlier,
                later,
            } => {
                write!(f, "{path}: kind changed across layers ({earlier} -> {later})")
            }
        }
    }
}
