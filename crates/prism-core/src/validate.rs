//! Post-build validation report over an emitted CSS artifact.
//!
//! Works on the serialized text rather than the resolved tree: the report
//! checks what shipped, including anything a normalizer passed through
//! verbatim. Issues are build-breaking defects (a caller should exit
//! nonzero); warnings are advisory.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// One extracted `--name: value;` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssToken {
    pub name: String,
    pub value: String,
}

/// Token count per report category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// The full validation result for one CSS artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub token_count: usize,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub breakdown: Vec<CategoryCount>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

fn custom_property_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"--([^:]+):\s*([^;]+);").expect("custom-property regex must compile")
    })
}

fn color_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(#[0-9a-fA-F]{3,8}|rgba?\([^)]+\))$").expect("color regex must compile")
    })
}

fn sized_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(0|[\d.]+(px|rem|em|%))$").expect("sized-value regex must compile")
    })
}

fn leading_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)").expect("leading-number regex must compile")
    })
}

/// Parse the numeric prefix of a value, the way the checks expect
/// (`"0.56px"` still reads as `0.56` so the unit check can fire).
fn leading_number(value: &str) -> Option<f64> {
    leading_number_re()
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract every custom property declared in a CSS text.
pub fn extract_tokens(css: &str) -> Vec<CssToken> {
    custom_property_re()
        .captures_iter(css)
        .map(|captures| CssToken {
            name: format!("--{}", captures[1].trim()),
            value: captures[2].trim().to_string(),
        })
        .collect()
}

/// Run every check over a CSS artifact.
pub fn validate_css(css: &str) -> ValidationReport {
    let tokens = extract_tokens(css);
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    let opacity_count = check_opacity(&tokens, &mut issues);
    let font_weight_count = check_font_weights(&tokens, &mut issues, &mut warnings);
    let color_count = check_colors(&tokens, &mut issues);
    check_sizing(&tokens, &mut warnings);
    check_invalid_values(&tokens, &mut issues);

    let breakdown = breakdown(&tokens, color_count, opacity_count, font_weight_count);
    ValidationReport {
        token_count: tokens.len(),
        issues,
        warnings,
        breakdown,
    }
}

/// Opacity values must be unit-free numbers in [0, 1].
fn check_opacity(tokens: &[CssToken], issues: &mut Vec<String>) -> usize {
    let mut count = 0;
    for token in tokens.iter().filter(|t| t.name.contains("opacity")) {
        count += 1;
        match leading_number(&token.value) {
            None => issues.push(format!(
                "{}: not a valid number ({})",
                token.name, token.value
            )),
            Some(value) if !(0.0..=1.0).contains(&value) => issues.push(format!(
                "{}: out of range 0-1 ({value})",
                token.name
            )),
            Some(_) if token.value.contains("px") => issues.push(format!(
                "{}: contains 'px' unit ({})",
                token.name, token.value
            )),
            Some(_) => {}
        }
    }
    count
}

const INTERMEDIATE_WEIGHTS: [f64; 8] = [250.0, 350.0, 450.0, 550.0, 650.0, 750.0, 850.0, 950.0];

/// Font weights must be numeric; unusual or non-standard values warn.
fn check_font_weights(
    tokens: &[CssToken],
    issues: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> usize {
    let mut count = 0;
    for token in tokens.iter().filter(|t| t.name.contains("font-weight")) {
        count += 1;
        match leading_number(&token.value) {
            None => issues.push(format!(
                "{}: not a valid number ({})",
                token.name, token.value
            )),
            Some(value) if !(100.0..=900.0).contains(&value) => warnings.push(format!(
                "{}: unusual font weight ({value})",
                token.name
            )),
            Some(value)
                if value % 100.0 != 0.0 && !INTERMEDIATE_WEIGHTS.contains(&value) =>
            {
                warnings.push(format!(
                    "{}: non-standard font weight ({value})",
                    token.name
                ));
            }
            Some(_) => {}
        }
    }
    count
}

/// Colors must be hex or rgb()/rgba().
fn check_colors(tokens: &[CssToken], issues: &mut Vec<String>) -> usize {
    let mut count = 0;
    for token in tokens.iter().filter(|t| t.name.contains("color")) {
        count += 1;
        if !color_value_re().is_match(&token.value) {
            issues.push(format!(
                "{}: invalid color format ({})",
                token.name, token.value
            ));
        }
    }
    count
}

const SIZING_KEYWORDS: [&str; 3] = ["auto", "inherit", "initial"];

/// Sizing-like tokens should carry a unit or be zero/a layout keyword.
fn check_sizing(tokens: &[CssToken], warnings: &mut Vec<String>) {
    let sizing = tokens.iter().filter(|t| {
        t.name.contains("sizing")
            || t.name.contains("spacing")
            || t.name.contains("border-radius")
            || t.name.contains("border-width")
    });
    for token in sizing {
        if !sized_value_re().is_match(&token.value)
            && !SIZING_KEYWORDS.contains(&token.value.as_str())
        {
            warnings.push(format!(
                "{}: sizing without unit ({})",
                token.name, token.value
            ));
        }
    }
}

/// Empty, null-ish, or still-symbolic values are always defects.
fn check_invalid_values(tokens: &[CssToken], issues: &mut Vec<String>) {
    for token in tokens {
        if token.value == "undefined"
            || token.value == "null"
            || token.value.is_empty()
            || token.value.contains('{')
        {
            issues.push(format!(
                "{}: invalid value ({})",
                token.name, token.value
            ));
        }
    }
}

fn breakdown(
    tokens: &[CssToken],
    colors: usize,
    opacity: usize,
    font_weights: usize,
) -> Vec<CategoryCount> {
    let count_where = |pred: &dyn Fn(&&CssToken) -> bool| tokens.iter().filter(pred).count();
    let mut categories = vec![
        CategoryCount {
            category: "colors".to_string(),
            count: colors,
        },
        CategoryCount {
            category: "opacity".to_string(),
            count: opacity,
        },
        CategoryCount {
            category: "fontWeights".to_string(),
            count: font_weights,
        },
        CategoryCount {
            category: "fontFamilies".to_string(),
            count: count_where(&|t| t.name.contains("font-family")),
        },
        CategoryCount {
            category: "sizingRem".to_string(),
            count: count_where(&|t| t.name.contains("sizing") && t.value.contains("rem")),
        },
        CategoryCount {
            category: "sizingScale".to_string(),
            count: count_where(&|t| t.name.contains("sizing-scale")),
        },
        CategoryCount {
            category: "spacing".to_string(),
            count: count_where(&|t| t.name.contains("spacing")),
        },
        CategoryCount {
            category: "borderRadius".to_string(),
            count: count_where(&|t| t.name.contains("border-radius")),
        },
        CategoryCount {
            category: "borderWidth".to_string(),
            count: count_where(&|t| t.name.contains("border-width")),
        },
    ];
    let categorized: usize = categories.iter().map(|c| c.count).sum();
    categories.push(CategoryCount {
        category: "other".to_string(),
        count: tokens.len().saturating_sub(categorized),
    });
    categories
}
