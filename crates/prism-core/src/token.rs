//! Token data model.
//!
//! A token layer is a nested tree of groups whose leaves are tokens. Every
//! token carries an explicit [`TokenKind`] tag; all later dispatch (notably
//! normalizer selection) goes through that tag, never through path-text
//! matching. The kind comes from the `$type` field of the source document,
//! inherited from enclosing groups where a token omits it, with a one-time
//! path-segment fallback at load for documents that declare no type at all.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A token path: the ordered segment names from the tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenPath(Vec<String>);

impl TokenPath {
    pub fn root() -> Self {
        TokenPath(Vec::new())
    }

    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        TokenPath(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// The declared kind of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Color,
    Dimension,
    Opacity,
    FontFamily,
    FontWeight,
    Number,
    Typography,
    Surface,
    Other(String),
    Unspecified,
}

impl TokenKind {
    /// Map a source-document `$type` string to a kind.
    pub fn from_type(raw: &str) -> TokenKind {
        let folded: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "color" => TokenKind::Color,
            "dimension" | "spacing" | "sizing" | "borderradius" | "borderwidth" => {
                TokenKind::Dimension
            }
            "opacity" => TokenKind::Opacity,
            "fontfamily" | "fontfamilies" => TokenKind::FontFamily,
            "fontweight" | "fontweights" => TokenKind::FontWeight,
            "number" => TokenKind::Number,
            "typography" => TokenKind::Typography,
            "surface" => TokenKind::Surface,
            "" => TokenKind::Unspecified,
            _ => TokenKind::Other(raw.trim().to_string()),
        }
    }

    /// Load-time fallback for documents that declare no `$type` anywhere on
    /// the path: infer the kind from the path text once, so that everything
    /// downstream can dispatch on the tag.
    pub fn infer_from_path(path: &TokenPath) -> TokenKind {
        for segment in path.segments() {
            let lower = segment.to_ascii_lowercase();
            if lower.contains("opacity") {
                return TokenKind::Opacity;
            }
            if lower.replace([' ', '-', '_'], "").contains("fontweight") {
                return TokenKind::FontWeight;
            }
        }
        TokenKind::Unspecified
    }

    /// `true` for kinds whose value is a structured group of sub-properties.
    pub fn is_composite(&self) -> bool {
        matches!(self, TokenKind::Typography | TokenKind::Surface)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TokenKind::Color => "color",
            TokenKind::Dimension => "dimension",
            TokenKind::Opacity => "opacity",
            TokenKind::FontFamily => "fontFamily",
            TokenKind::FontWeight => "fontWeight",
            TokenKind::Number => "number",
            TokenKind::Typography => "typography",
            TokenKind::Surface => "surface",
            TokenKind::Other(raw) => raw,
            TokenKind::Unspecified => "unspecified",
        };
        write!(f, "{label}")
    }
}

/// A literal scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{s}"),
            Scalar::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A token's raw or resolved value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Literal(Scalar),
    /// A symbolic reference to another token, stored without braces
    /// (`"color.brand.primary"`).
    Reference(String),
    /// Composite sub-properties (typography, surface), each a literal or a
    /// reference in its own right.
    Composite(BTreeMap<String, TokenValue>),
}

impl TokenValue {
    /// Parse a `$value` JSON payload. A string of the exact shape
    /// `{dot.separated.path}` is a reference; an object is a composite;
    /// anything else is a literal.
    pub fn from_json(value: &Value) -> TokenValue {
        match value {
            Value::String(s) => match reference_target(s) {
                Some(target) => TokenValue::Reference(target.to_string()),
                None => TokenValue::Literal(Scalar::String(s.clone())),
            },
            Value::Number(n) => {
                TokenValue::Literal(Scalar::Number(n.as_f64().unwrap_or_default()))
            }
            Value::Bool(b) => TokenValue::Literal(Scalar::Bool(*b)),
            Value::Object(members) => TokenValue::Composite(
                members
                    .iter()
                    .map(|(name, member)| (name.clone(), TokenValue::from_json(member)))
                    .collect(),
            ),
            other => TokenValue::Literal(Scalar::String(other.to_string())),
        }
    }

    /// Render the value the way it appears in output artifacts. References
    /// render with their braces restored so an unresolved one survives
    /// verbatim.
    pub fn render(&self) -> String {
        match self {
            TokenValue::Literal(scalar) => scalar.to_string(),
            TokenValue::Reference(target) => format!("{{{target}}}"),
            TokenValue::Composite(members) => {
                let rendered: Vec<String> = members
                    .iter()
                    .map(|(name, member)| format!("{name}: {}", member.render()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
        }
    }
}

/// Returns the reference target if `raw` matches the exact pattern
/// `{<dot-separated path>}`.
fn reference_target(raw: &str) -> Option<&str> {
    let inner = raw.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains(['{', '}']) {
        return None;
    }
    Some(inner)
}

/// A leaf token: kind tag plus raw (or resolved) value.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub description: Option<String>,
}

/// One node of a token tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Group(TokenTree),
    Token(Token),
}

/// A nested tree of groups and tokens. Keys sort lexically, which makes
/// every walk deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    pub children: BTreeMap<String, TokenNode>,
}

impl TokenTree {
    pub fn new() -> Self {
        TokenTree::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Look up a token by dotted path.
    pub fn get(&self, dotted: &str) -> Option<&Token> {
        let segments: Vec<&str> = dotted.split('.').collect();
        let (last, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            match current.children.get(*segment) {
                Some(TokenNode::Group(group)) => current = group,
                _ => return None,
            }
        }
        match current.children.get(*last) {
            Some(TokenNode::Token(token)) => Some(token),
            _ => None,
        }
    }

    /// Visit every token in the tree, depth-first, keys in lexical order.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&TokenPath, &'a Token)) {
        fn inner<'a>(
            tree: &'a TokenTree,
            path: &TokenPath,
            visit: &mut impl FnMut(&TokenPath, &'a Token),
        ) {
            for (name, node) in &tree.children {
                let child = path.child(name);
                match node {
                    TokenNode::Group(group) => inner(group, &child, visit),
                    TokenNode::Token(token) => visit(&child, token),
                }
            }
        }
        inner(self, &TokenPath::root(), &mut visit);
    }

    /// Number of tokens in the tree.
    pub fn token_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    /// Produce a new tree with every token rewritten through `map`. Group
    /// structure is preserved; the input is not mutated.
    pub fn map_tokens(&self, mut map: impl FnMut(&TokenPath, &Token) -> Token) -> TokenTree {
        fn inner(
            tree: &TokenTree,
            path: &TokenPath,
            map: &mut impl FnMut(&TokenPath, &Token) -> Token,
        ) -> TokenTree {
            let children = tree
                .children
                .iter()
                .map(|(name, node)| {
                    let child = path.child(name);
                    let mapped = match node {
                        TokenNode::Group(group) => TokenNode::Group(inner(group, &child, map)),
                        TokenNode::Token(token) => TokenNode::Token(map(&child, token)),
                    };
                    (name.clone(), mapped)
                })
                .collect();
            TokenTree { children }
        }
        inner(self, &TokenPath::root(), &mut map)
    }
}

/// Parse one layer's nested mapping into a token tree.
///
/// An object carrying `$value` (or the legacy `value`) is a token; any other
/// object is a group. `$`-prefixed keys at group level are metadata, not
/// children.
pub fn parse_tree(value: &Value) -> TokenTree {
    fn parse_group(members: &serde_json::Map<String, Value>, path: &TokenPath, inherited: &TokenKind) -> TokenTree {
        let group_kind = members
            .get("$type")
            .or_else(|| members.get("type"))
            .and_then(Value::as_str)
            .map(TokenKind::from_type)
            .unwrap_or_else(|| inherited.clone());

        let mut tree = TokenTree::new();
        for (name, child) in members {
            if name.starts_with('$') {
                continue;
            }
            let child_path = path.child(name);
            let Some(child_members) = child.as_object() else {
                continue;
            };
            let node = if let Some(raw) = child_members.get("$value").or_else(|| child_members.get("value")) {
                TokenNode::Token(parse_token(child_members, raw, &child_path, &group_kind))
            } else {
                TokenNode::Group(parse_group(child_members, &child_path, &group_kind))
            };
            tree.children.insert(name.clone(), node);
        }
        tree
    }

    fn parse_token(
        members: &serde_json::Map<String, Value>,
        raw: &Value,
        path: &TokenPath,
        inherited: &TokenKind,
    ) -> Token {
        let declared = members
            .get("$type")
            .or_else(|| members.get("type"))
            .and_then(Value::as_str)
            .map(TokenKind::from_type);
        let kind = match declared {
            Some(kind) => kind,
            None if *inherited != TokenKind::Unspecified => inherited.clone(),
            None => TokenKind::infer_from_path(path),
        };
        let description = members
            .get("$description")
            .or_else(|| members.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Token {
            kind,
            value: TokenValue::from_json(raw),
            description,
        }
    }

    match value.as_object() {
        Some(members) => parse_group(members, &TokenPath::root(), &TokenKind::Unspecified),
        None => TokenTree::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tokens_groups_and_references() {
        let tree = parse_tree(&json!({
            "color": {
                "$type": "color",
                "brand": {
                    "primary": { "$value": "#0055ff" },
                    "accent": { "$value": "{color.brand.primary}" }
                }
            },
            "$metadata": { "ignored": true }
        }));

        let primary = tree.get("color.brand.primary").expect("primary token");
        assert_eq!(primary.kind, TokenKind::Color);
        assert_eq!(
            primary.value,
            TokenValue::Literal(Scalar::String("#0055ff".to_string()))
        );

        let accent = tree.get("color.brand.accent").expect("accent token");
        assert_eq!(
            accent.value,
            TokenValue::Reference("color.brand.primary".to_string())
        );
        assert!(tree.get("$metadata").is_none());
    }

    #[test]
    fn group_type_is_inherited_and_token_type_overrides() {
        let tree = parse_tree(&json!({
            "text": {
                "$type": "typography",
                "weight": { "$type": "fontWeights", "$value": "Bold" },
                "body": { "$value": { "fontSize": "16px", "fontWeight": "{text.weight}" } }
            }
        }));

        assert_eq!(tree.get("text.weight").expect("weight").kind, TokenKind::FontWeight);
        let body = tree.get("text.body").expect("body");
        assert_eq!(body.kind, TokenKind::Typography);
        assert!(matches!(body.value, TokenValue::Composite(_)));
    }

    #[test]
    fn kind_falls_back_to_path_inference_without_any_type() {
        let tree = parse_tree(&json!({
            "effect": { "opacityStrong": { "value": "56px" } },
            "font": { "fontWeight": { "value": "Semibold" } }
        }));

        assert_eq!(
            tree.get("effect.opacityStrong").expect("opacity").kind,
            TokenKind::Opacity
        );
        assert_eq!(
            tree.get("font.fontWeight").expect("weight").kind,
            TokenKind::FontWeight
        );
    }

    #[test]
    fn reference_detection_requires_exact_braces() {
        assert_eq!(
            TokenValue::from_json(&json!("{a.b}")),
            TokenValue::Reference("a.b".to_string())
        );
        assert_eq!(
            TokenValue::from_json(&json!("prefix {a.b}")),
            TokenValue::Literal(Scalar::String("prefix {a.b}".to_string()))
        );
        assert_eq!(
            TokenValue::from_json(&json!("{}")),
            TokenValue::Literal(Scalar::String("{}".to_string()))
        );
    }

    #[test]
    fn render_restores_reference_braces() {
        let value = TokenValue::Reference("color.missing".to_string());
        assert_eq!(value.render(), "{color.missing}");
        assert_eq!(TokenValue::Literal(Scalar::Number(400.0)).render(), "400");
        assert_eq!(TokenValue::Literal(Scalar::Number(0.56)).render(), "0.56");
    }
}
