//! Structured JSON emission: the resolved tree kept nested, composites
//! intact, each token as a `{"$type", "$value"}` record.

use crate::token::{Scalar, TokenNode, TokenTree, TokenValue};
use serde_json::{Map, Value, json};

/// Render a resolved tree as a nested JSON value.
pub fn tree_to_json(tree: &TokenTree) -> Value {
    let mut members = Map::new();
    for (name, node) in &tree.children {
        let rendered = match node {
            TokenNode::Group(group) => tree_to_json(group),
            TokenNode::Token(token) => {
                let mut record = Map::new();
                record.insert("$type".to_string(), json!(token.kind.to_string()));
                record.insert("$value".to_string(), value_to_json(&token.value));
                if let Some(description) = &token.description {
                    record.insert("$description".to_string(), json!(description));
                }
                Value::Object(record)
            }
        };
        members.insert(name.clone(), rendered);
    }
    Value::Object(members)
}

/// Render a resolved tree as pretty-printed JSON text.
pub fn render_json(tree: &TokenTree) -> String {
    let mut text = serde_json::to_string_pretty(&tree_to_json(tree))
        .unwrap_or_else(|_| "{}".to_string());
    text.push('\n');
    text
}

fn value_to_json(value: &TokenValue) -> Value {
    match value {
        TokenValue::Literal(Scalar::String(s)) => json!(s),
        TokenValue::Literal(Scalar::Number(n)) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                json!(*n as i64)
            } else {
                json!(n)
            }
        }
        TokenValue::Literal(Scalar::Bool(b)) => json!(b),
        TokenValue::Reference(target) => json!(format!("{{{target}}}")),
        TokenValue::Composite(composite) => Value::Object(
            composite
                .iter()
                .map(|(name, member)| (name.clone(), value_to_json(member)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::parse_tree;
    use serde_json::json;

    #[test]
    fn nested_structure_and_composites_survive() {
        let tree = parse_tree(&json!({
            "color": {
                "$type": "color",
                "brand": { "primary": { "$value": "#0055ff" } }
            },
            "text": {
                "body": {
                    "$type": "typography",
                    "$value": { "fontSize": "16px", "fontWeight": 400 }
                }
            }
        }));

        let rendered = tree_to_json(&tree);
        assert_eq!(
            rendered["color"]["brand"]["primary"],
            json!({ "$type": "color", "$value": "#0055ff" })
        );
        assert_eq!(
            rendered["text"]["body"]["$value"],
            json!({ "fontSize": "16px", "fontWeight": 400 })
        );
    }

    #[test]
    fn unresolved_reference_round_trips_as_brace_string() {
        let tree = parse_tree(&json!({
            "action": { "$type": "color", "$value": "{missing.path}" }
        }));
        let rendered = tree_to_json(&tree);
        assert_eq!(rendered["action"]["$value"], json!("{missing.path}"));
    }
}
