//! Composition Engine: one resolved tree per build target.
//!
//! The compiler is an explicit value: layer store in, resolved trees out.
//! There is no ambient registry and no shared mutable state between targets;
//! each target merges, resolves, and normalizes its own fresh tree from the
//! immutable store. Targets are independent: one target failing never stops
//! the others, and its warnings collected up to the failure are kept.

use crate::error::{BuildError, Diagnostic};
use crate::layer::LayerStore;
use crate::merge::merge;
use crate::normalize::normalize;
use crate::resolve::resolve;
use crate::select::{BuildTarget, select_layers};
use crate::token::TokenTree;

/// Result of building one target: a resolved tree or a fatal error, plus
/// every non-fatal diagnostic observed along the way.
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: BuildTarget,
    pub result: Result<TokenTree, BuildError>,
    pub warnings: Vec<Diagnostic>,
}

impl TargetOutcome {
    pub fn tree(&self) -> Option<&TokenTree> {
        self.result.as_ref().ok()
    }
}

/// The token compiler for one loaded layer set.
#[derive(Debug, Clone)]
pub struct Compiler {
    store: LayerStore,
}

impl Compiler {
    pub fn new(store: LayerStore) -> Self {
        Compiler { store }
    }

    pub fn base_order(&self) -> &[String] {
        self.store.base_order()
    }

    /// The effective layer order for one target (selection semantics only,
    /// no merge).
    pub fn effective_order(&self, target: &BuildTarget) -> Result<Vec<String>, BuildError> {
        select_layers(self.store.base_order(), target)
    }

    /// Select, merge, resolve, and normalize one target.
    pub fn build(&self, target: &BuildTarget) -> TargetOutcome {
        let mut warnings = Vec::new();
        let result = self.build_tree(target, &mut warnings);
        TargetOutcome {
            target: target.clone(),
            result,
            warnings,
        }
    }

    /// Build every target, collecting per-target outcomes. A failed target
    /// does not abort the rest.
    pub fn build_all(&self, targets: &[BuildTarget]) -> Vec<TargetOutcome> {
        targets.iter().map(|target| self.build(target)).collect()
    }

    fn build_tree(
        &self,
        target: &BuildTarget,
        warnings: &mut Vec<Diagnostic>,
    ) -> Result<TokenTree, BuildError> {
        let order = self.effective_order(target)?;
        let mut layers = Vec::with_capacity(order.len());
        for name in &order {
            let set = self.store.get(name).ok_or_else(|| {
                BuildError::Configuration(format!(
                    "target {target}: layer {name:?} appears in the order but is not loaded"
                ))
            })?;
            layers.push(set);
        }

        let (merged, merge_warnings) = merge(&layers);
        warnings.extend(merge_warnings);

        let (resolved, resolve_warnings) = resolve(&merged)?;
        warnings.extend(resolve_warnings);

        let (normalized, normalize_warnings) = normalize(&resolved);
        warnings.extend(normalize_warnings);
        Ok(normalized)
    }
}
