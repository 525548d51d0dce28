//! Value Normalizers.
//!
//! Applied after reference resolution, dispatched on the token's kind tag
//! (never on path text). Both normalizers are transitive: a value reached
//! through a reference chain is normalized the same as a literal, and
//! composite members are normalized by sub-property name at any depth.
//! A value a normalizer cannot interpret passes through unchanged with a
//! diagnostic; normalization never fails a build.

use crate::error::Diagnostic;
use crate::token::{Scalar, Token, TokenKind, TokenPath, TokenTree, TokenValue};
use std::collections::BTreeMap;

/// Normalize every opacity and font-weight value in `tree`, returning a new
/// tree plus the diagnostics for values that could not be interpreted.
pub fn normalize(tree: &TokenTree) -> (TokenTree, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let normalized = tree.map_tokens(|path, token| normalize_token(path, token, &mut diagnostics));
    (normalized, diagnostics)
}

fn normalize_token(path: &TokenPath, token: &Token, diagnostics: &mut Vec<Diagnostic>) -> Token {
    let value = match (&token.kind, &token.value) {
        (TokenKind::Opacity, value) => normalize_opacity(path, value, diagnostics),
        (TokenKind::FontWeight, value) => normalize_font_weight(path, value, diagnostics),
        (_, TokenValue::Composite(members)) => {
            normalize_composite(path, members, diagnostics)
        }
        _ => token.value.clone(),
    };
    Token {
        kind: token.kind.clone(),
        value,
        description: token.description.clone(),
    }
}

/// Composite members carry no kind tag of their own; the sub-property name
/// selects the normalizer.
fn normalize_composite(
    path: &TokenPath,
    members: &BTreeMap<String, TokenValue>,
    diagnostics: &mut Vec<Diagnostic>,
) -> TokenValue {
    let normalized = members
        .iter()
        .map(|(name, member)| {
            let member_path = path.child(name);
            let folded: String = name
                .chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .collect::<String>()
                .to_ascii_lowercase();
            let value = if folded.contains("fontweight") {
                normalize_font_weight(&member_path, member, diagnostics)
            } else if folded.contains("opacity") {
                normalize_opacity(&member_path, member, diagnostics)
            } else if let TokenValue::Composite(nested) = member {
                normalize_composite(&member_path, nested, diagnostics)
            } else {
                member.clone()
            };
            (name.clone(), value)
        })
        .collect();
    TokenValue::Composite(normalized)
}

/// Opacity: strip a unit suffix, parse, rescale 0-100 inputs to 0-1, format
/// to exactly two decimals.
fn normalize_opacity(
    path: &TokenPath,
    value: &TokenValue,
    diagnostics: &mut Vec<Diagnostic>,
) -> TokenValue {
    let numeric = match value {
        TokenValue::Literal(Scalar::Number(n)) => Some(*n),
        TokenValue::Literal(Scalar::String(s)) => strip_units(s).parse::<f64>().ok(),
        _ => None,
    };
    let Some(numeric) = numeric else {
        diagnostics.push(Diagnostic::Normalization {
            path: path.dotted(),
            value: value.render(),
            reason: "not a number after stripping units".to_string(),
        });
        return value.clone();
    };
    let scaled = if numeric > 1.0 { numeric / 100.0 } else { numeric };
    TokenValue::Literal(Scalar::String(format!("{scaled:.2}")))
}

fn strip_units(raw: &str) -> String {
    let mut out = raw.to_ascii_lowercase();
    // Alternation order matches the upstream pattern: `rem` before `em`.
    for unit in ["px", "rem", "em", "%"] {
        out = out.replace(unit, "");
    }
    out.trim().to_string()
}

/// Font weight: numbers pass through, numeric strings parse, keywords map
/// through the canonical table (case- and spacing-insensitive).
fn normalize_font_weight(
    path: &TokenPath,
    value: &TokenValue,
    diagnostics: &mut Vec<Diagnostic>,
) -> TokenValue {
    let raw = match value {
        TokenValue::Literal(Scalar::Number(_)) => return value.clone(),
        TokenValue::Literal(Scalar::String(s)) => s,
        _ => {
            diagnostics.push(Diagnostic::Normalization {
                path: path.dotted(),
                value: value.render(),
                reason: "not a font-weight literal".to_string(),
            });
            return value.clone();
        }
    };
    if let Ok(numeric) = raw.trim().parse::<i64>() {
        return TokenValue::Literal(Scalar::Number(numeric as f64));
    }
    match keyword_weight(raw) {
        Some(weight) => TokenValue::Literal(Scalar::Number(weight as f64)),
        None => {
            diagnostics.push(Diagnostic::Normalization {
                path: path.dotted(),
                value: raw.clone(),
                reason: "unknown font-weight keyword".to_string(),
            });
            value.clone()
        }
    }
}

fn keyword_weight(raw: &str) -> Option<u32> {
    let folded: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let weight = match folded.as_str() {
        "thin" | "hairline" => 100,
        "extralight" | "ultralight" => 200,
        "light" => 300,
        "normal" | "regular" => 400,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" => 700,
        "extrabold" | "ultrabold" => 800,
        "black" | "heavy" => 900,
        "extrablack" | "ultrablack" => 950,
        _ => return None,
    };
    Some(weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::parse_tree;
    use serde_json::json;

    fn literal(tree: &TokenTree, path: &str) -> String {
        tree.get(path).expect("token").value.render()
    }

    #[test]
    fn opacity_vectors() {
        let tree = parse_tree(&json!({
            "opacity": {
                "$type": "opacity",
                "px": { "$value": "56px" },
                "scale": { "$value": 32 },
                "fraction": { "$value": 0.7 },
                "full": { "$value": 1 }
            }
        }));
        let (normalized, diagnostics) = normalize(&tree);
        assert_eq!(literal(&normalized, "opacity.px"), "0.56");
        assert_eq!(literal(&normalized, "opacity.scale"), "0.32");
        assert_eq!(literal(&normalized, "opacity.fraction"), "0.70");
        assert_eq!(literal(&normalized, "opacity.full"), "1.00");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn opacity_units_and_percent_strip() {
        let tree = parse_tree(&json!({
            "o": {
                "$type": "opacity",
                "rem": { "$value": "0.4rem" },
                "percent": { "$value": "80%" }
            }
        }));
        let (normalized, diagnostics) = normalize(&tree);
        assert_eq!(literal(&normalized, "o.rem"), "0.40");
        assert_eq!(literal(&normalized, "o.percent"), "0.80");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unparsable_opacity_passes_through_with_diagnostic() {
        let tree = parse_tree(&json!({
            "o": { "$type": "opacity", "bad": { "$value": "mostly opaque" } }
        }));
        let (normalized, diagnostics) = normalize(&tree);
        assert_eq!(literal(&normalized, "o.bad"), "mostly opaque");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn font_weight_vectors() {
        let tree = parse_tree(&json!({
            "w": {
                "$type": "fontWeights",
                "keyword": { "$value": "Semibold" },
                "spaced": { "$value": "semi bold" },
                "numeric_string": { "$value": "400" },
                "numeric": { "$value": 500 },
                "unknown": { "$value": "unknown-weight" }
            }
        }));
        let (normalized, diagnostics) = normalize(&tree);
        assert_eq!(literal(&normalized, "w.keyword"), "600");
        assert_eq!(literal(&normalized, "w.spaced"), "600");
        assert_eq!(literal(&normalized, "w.numeric_string"), "400");
        assert_eq!(literal(&normalized, "w.numeric"), "500");
        assert_eq!(literal(&normalized, "w.unknown"), "unknown-weight");
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::Normalization { path, .. } if path == "w.unknown"
        ));
    }

    #[test]
    fn composite_members_normalize_by_name() {
        let tree = parse_tree(&json!({
            "text": {
                "body": {
                    "$type": "typography",
                    "$value": { "fontSize": "16px", "fontWeight": "Bold" }
                }
            }
        }));
        let (normalized, diagnostics) = normalize(&tree);
        let TokenValue::Composite(members) =
            &normalized.get("text.body").expect("token").value
        else {
            panic!("composite expected");
        };
        assert_eq!(
            members.get("fontWeight"),
            Some(&TokenValue::Literal(Scalar::Number(700.0)))
        );
        // Untouched member survives as-is.
        assert_eq!(
            members.get("fontSize"),
            Some(&TokenValue::Literal(Scalar::String("16px".to_string())))
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn still_symbolic_value_passes_through_with_diagnostic() {
        let tree = parse_tree(&json!({
            "o": { "$type": "opacity", "ref": { "$value": "{missing.opacity}" } }
        }));
        let (normalized, diagnostics) = normalize(&tree);
        assert_eq!(literal(&normalized, "o.ref"), "{missing.opacity}");
        assert_eq!(diagnostics.len(), 1);
    }
}
