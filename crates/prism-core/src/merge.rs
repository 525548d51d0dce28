//! Tree Merger: an ordered sequence of layers into one tree.
//!
//! Later layers win at the leaf level: a token defined by two layers is
//! replaced wholesale (kind, value, composite members) by the later one,
//! never field-merged. Groups accumulate the union of children across
//! layers. Inputs are never mutated; the merge builds a fresh tree.

use crate::error::Diagnostic;
use crate::layer::TokenSet;
use crate::token::{TokenNode, TokenPath, TokenTree};

/// Merge layers strictly in sequence order. Returns the merged tree plus
/// kind-conflict diagnostics (last-writer-wins is still applied; the
/// diagnostic exists for observability only).
pub fn merge(layers: &[&TokenSet]) -> (TokenTree, Vec<Diagnostic>) {
    let mut merged = TokenTree::new();
    let mut diagnostics = Vec::new();
    for layer in layers {
        merge_into(&mut merged, &layer.tree, &TokenPath::root(), &mut diagnostics);
    }
    (merged, diagnostics)
}

fn merge_into(
    dst: &mut TokenTree,
    src: &TokenTree,
    path: &TokenPath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (name, incoming) in &src.children {
        let child_path = path.child(name);
        match (dst.children.get_mut(name), incoming) {
            (Some(TokenNode::Group(existing)), TokenNode::Group(group)) => {
                merge_into(existing, group, &child_path, diagnostics);
            }
            (Some(TokenNode::Token(existing)), TokenNode::Token(token)) => {
                if existing.kind != token.kind {
                    diagnostics.push(Diagnostic::KindConflict {
                        path: child_path.dotted(),
                        earlier: existing.kind.to_string(),
                        later: token.kind.to_string(),
                    });
                }
                *existing = token.clone();
            }
            // Token replacing a group or group replacing a token: the later
            // layer wins wholesale.
            (Some(slot), node) => {
                *slot = node.clone();
            }
            (None, node) => {
                dst.children.insert(name.clone(), node.clone());
            }
        }
    }
}
