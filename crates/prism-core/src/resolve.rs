//! Reference Resolver.
//!
//! A value of the exact shape `{path.to.token}` resolves against the fully
//! merged tree, transitively, until a literal is reached. A path revisited
//! within one resolution chain is a cycle and fails the whole target. A
//! reference to a path that does not exist is not fatal: the reference
//! string survives verbatim and the condition is reported as a diagnostic,
//! so downstream validation can flag the defect without aborting the build.

use crate::error::{BuildError, Diagnostic};
use crate::token::{Token, TokenNode, TokenPath, TokenTree, TokenValue};

/// Resolve every reference in `tree`, returning a new tree. The input is
/// not mutated; re-running resolution on an already-resolved tree is a
/// no-op.
pub fn resolve(tree: &TokenTree) -> Result<(TokenTree, Vec<Diagnostic>), BuildError> {
    let mut diagnostics = Vec::new();
    let resolved = resolve_group(tree, tree, &TokenPath::root(), &mut diagnostics)?;
    Ok((resolved, diagnostics))
}

fn resolve_group(
    full: &TokenTree,
    tree: &TokenTree,
    path: &TokenPath,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<TokenTree, BuildError> {
    let mut out = TokenTree::new();
    for (name, node) in &tree.children {
        let child_path = path.child(name);
        let resolved = match node {
            TokenNode::Group(group) => {
                TokenNode::Group(resolve_group(full, group, &child_path, diagnostics)?)
            }
            TokenNode::Token(token) => {
                let mut chain = vec![child_path.dotted()];
                let value = resolve_value(full, &token.value, &mut chain, diagnostics)?;
                TokenNode::Token(Token {
                    kind: token.kind.clone(),
                    value,
                    description: token.description.clone(),
                })
            }
        };
        out.children.insert(name.clone(), resolved);
    }
    Ok(out)
}

fn resolve_value(
    full: &TokenTree,
    value: &TokenValue,
    chain: &mut Vec<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<TokenValue, BuildError> {
    match value {
        TokenValue::Literal(_) => Ok(value.clone()),
        TokenValue::Reference(target) => {
            if chain.iter().any(|visited| visited == target) {
                chain.push(target.clone());
                return Err(BuildError::CyclicReference {
                    chain: chain.join(" -> "),
                });
            }
            let Some(referenced) = full.get(target) else {
                diagnostics.push(Diagnostic::UnresolvedReference {
                    path: chain[0].clone(),
                    reference: target.clone(),
                });
                return Ok(value.clone());
            };
            chain.push(target.clone());
            let resolved = resolve_value(full, &referenced.value, chain, diagnostics)?;
            chain.pop();
            Ok(resolved)
        }
        TokenValue::Composite(members) => {
            let mut resolved = std::collections::BTreeMap::new();
            for (name, member) in members {
                resolved.insert(name.clone(), resolve_value(full, member, chain, diagnostics)?);
            }
            Ok(TokenValue::Composite(resolved))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Scalar, parse_tree};
    use serde_json::json;

    #[test]
    fn resolves_transitive_chains_to_literals() {
        let tree = parse_tree(&json!({
            "primitive": { "blue": { "$type": "color", "$value": "#0055ff" } },
            "alias": { "primary": { "$type": "color", "$value": "{primitive.blue}" } },
            "mapped": { "action": { "$type": "color", "$value": "{alias.primary}" } }
        }));

        let (resolved, diagnostics) = resolve(&tree).expect("resolution");
        assert_eq!(
            resolved.get("mapped.action").expect("token").value,
            TokenValue::Literal(Scalar::String("#0055ff".to_string()))
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unresolved_reference_survives_verbatim_with_diagnostic() {
        let tree = parse_tree(&json!({
            "alias": { "primary": { "$type": "color", "$value": "{primitive.missing}" } }
        }));

        let (resolved, diagnostics) = resolve(&tree).expect("resolution");
        assert_eq!(
            resolved.get("alias.primary").expect("token").value,
            TokenValue::Reference("primitive.missing".to_string())
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::UnresolvedReference { path, reference }
                if path == "alias.primary" && reference == "primitive.missing"
        ));
    }

    #[test]
    fn cycle_detection_fails_instead_of_hanging() {
        let tree = parse_tree(&json!({
            "a": { "$value": "{b}" },
            "b": { "$value": "{a}" }
        }));

        match resolve(&tree) {
            Err(BuildError::CyclicReference { chain }) => {
                assert!(chain.contains("a") && chain.contains("b"));
            }
            other => panic!("expected cyclic reference error, got {other:?}"),
        }
    }

    #[test]
    fn composite_members_resolve_independently() {
        let tree = parse_tree(&json!({
            "weight": { "$type": "fontWeights", "$value": "700" },
            "text": {
                "body": {
                    "$type": "typography",
                    "$value": { "fontSize": "16px", "fontWeight": "{weight}" }
                }
            }
        }));

        let (resolved, diagnostics) = resolve(&tree).expect("resolution");
        let TokenValue::Composite(members) =
            &resolved.get("text.body").expect("token").value
        else {
            panic!("composite value expected");
        };
        assert_eq!(
            members.get("fontWeight"),
            Some(&TokenValue::Literal(Scalar::String("700".to_string())))
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let tree = parse_tree(&json!({
            "primitive": { "blue": { "$value": "#0055ff" } },
            "alias": { "primary": { "$value": "{primitive.blue}" } }
        }));

        let (once, _) = resolve(&tree).expect("first pass");
        let (twice, diagnostics) = resolve(&once).expect("second pass");
        assert_eq!(once, twice);
        assert!(diagnostics.is_empty());
    }
}
