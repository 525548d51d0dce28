//! CSS custom-property emission.
//!
//! A resolved tree flattens into `--kebab-cased-path: value;` lines inside a
//! `:root` block. References are always emitted fully resolved; an
//! unresolved one keeps its brace form so the validation report can catch
//! it. Typography composites are excluded unless decomposition is requested;
//! other composites always emit member-by-member.

use crate::token::{TokenKind, TokenTree, TokenValue};
use std::fmt::Write;

#[derive(Debug, Clone, Default)]
pub struct CssOptions {
    /// Emit typography composites member-by-member instead of skipping them.
    pub decompose_composites: bool,
}

/// Render one resolved tree as a CSS custom-property sheet.
pub fn render_css(tree: &TokenTree, options: &CssOptions) -> String {
    let mut out = String::from("/**\n * Generated file. Do not edit directly.\n */\n\n:root {\n");
    tree.walk(|path, token| {
        if token.kind == TokenKind::Typography && !options.decompose_composites {
            return;
        }
        let name = kebab_name(path.segments());
        emit_value(&mut out, &name, &token.value);
    });
    out.push_str("}\n");
    out
}

fn emit_value(out: &mut String, name: &str, value: &TokenValue) {
    match value {
        TokenValue::Composite(members) => {
            for (member, member_value) in members {
                let member_name = format!("{name}-{}", kebab_name(&[member.clone()]));
                emit_value(out, &member_name, member_value);
            }
        }
        _ => {
            let _ = writeln!(out, "  --{name}: {};", value.render());
        }
    }
}

/// Kebab-case a path: camelCase splits, spaces and punctuation collapse to
/// hyphens, everything lowercases.
pub fn kebab_name(segments: &[String]) -> String {
    let mut words: Vec<String> = Vec::new();
    for segment in segments {
        let mut current = String::new();
        let mut prev_lower = false;
        for ch in segment.chars() {
            if ch.is_alphanumeric() {
                if ch.is_uppercase() && prev_lower && !current.is_empty() {
                    words.push(current.clone());
                    current.clear();
                }
                prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
                current.extend(ch.to_lowercase());
            } else {
                if !current.is_empty() {
                    words.push(current.clone());
                    current.clear();
                }
                prev_lower = false;
            }
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::parse_tree;
    use serde_json::json;

    #[test]
    fn kebab_splits_camel_case_and_spaces() {
        let segments = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        assert_eq!(kebab_name(&segments(&["font", "fontWeight"])), "font-font-weight");
        assert_eq!(kebab_name(&segments(&["Border Radius", "lg"])), "border-radius-lg");
        assert_eq!(kebab_name(&segments(&["scale", "100"])), "scale-100");
    }

    #[test]
    fn renders_flat_custom_properties() {
        let tree = parse_tree(&json!({
            "color": {
                "$type": "color",
                "brand": { "primary": { "$value": "#0055ff" } }
            },
            "fontWeight": { "$type": "fontWeights", "body": { "$value": 400 } }
        }));
        let css = render_css(&tree, &CssOptions::default());
        assert!(css.contains("--color-brand-primary: #0055ff;"));
        assert!(css.contains("--font-weight-body: 400;"));
        assert!(css.starts_with("/**"));
        assert!(css.contains(":root {"));
    }

    #[test]
    fn typography_composites_are_skipped_by_default() {
        let tree = parse_tree(&json!({
            "text": {
                "body": {
                    "$type": "typography",
                    "$value": { "fontSize": "16px", "fontWeight": 400 }
                }
            },
            "surface": {
                "card": {
                    "$type": "surface",
                    "$value": { "fill": "#ffffff", "overlay": "0.20" }
                }
            }
        }));

        let css = render_css(&tree, &CssOptions::default());
        assert!(!css.contains("--text-body"));
        assert!(css.contains("--surface-card-fill: #ffffff;"));
        assert!(css.contains("--surface-card-overlay: 0.20;"));

        let decomposed = render_css(
            &tree,
            &CssOptions {
                decompose_composites: true,
            },
        );
        assert!(decomposed.contains("--text-body-font-size: 16px;"));
        assert!(decomposed.contains("--text-body-font-weight: 400;"));
    }

    #[test]
    fn unresolved_reference_keeps_brace_form() {
        let tree = parse_tree(&json!({
            "action": { "$type": "color", "$value": "{missing.path}" }
        }));
        let css = render_css(&tree, &CssOptions::default());
        assert!(css.contains("--action: {missing.path};"));
    }
}
