//! Layer Selector: base order → effective order for one build target.
//!
//! Layer names carry their role in the name itself: the group component
//! (everything before the first `/`) classifies the layer, the variant
//! component selects the alias or theme. `02 Alias/myQ` is the alias layer
//! for brand `myQ`; `03 Palette/light` is the light palette. A variant of
//! `Mode` (the upstream export writes `Mode 1`) marks the neutral layer that
//! applies to every alias.

use crate::error::BuildError;
use std::fmt;
use std::str::FromStr;

/// Light or dark palette selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn opposite(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme {other:?} (expected light or dark)")),
        }
    }
}

/// One (alias, theme) pair to build.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildTarget {
    pub alias: String,
    pub theme: Theme,
}

impl BuildTarget {
    pub fn new(alias: impl Into<String>, theme: Theme) -> Self {
        BuildTarget {
            alias: alias.into(),
            theme,
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.alias, self.theme)
    }
}

/// The role a layer name declares for itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerRole {
    /// Alias-scoped layer; `neutral` marks the distinguished `Mode` variant.
    Alias { variant: String, neutral: bool },
    /// Palette layer; `theme` is `None` when the variant names no known
    /// theme.
    Palette { theme: Option<Theme> },
    /// Applies to every target.
    Universal,
}

/// Classify a layer name into its selection role.
pub fn layer_role(name: &str) -> LayerRole {
    let (group, variant) = match name.split_once('/') {
        Some((group, variant)) => (group, variant),
        None => (name, ""),
    };
    let group_lower = group.to_ascii_lowercase();
    if group_lower.contains("palette") {
        return LayerRole::Palette {
            theme: variant.parse().ok(),
        };
    }
    if group_lower.contains("alias") {
        return LayerRole::Alias {
            variant: variant.to_string(),
            neutral: is_neutral_variant(variant),
        };
    }
    LayerRole::Universal
}

fn is_neutral_variant(variant: &str) -> bool {
    let trimmed = variant.trim();
    trimmed.eq_ignore_ascii_case("mode") || {
        let lower = trimmed.to_ascii_lowercase();
        lower.starts_with("mode ")
    }
}

/// Filter and reorder the base layer order for one target.
///
/// - Palette layers for the opposite theme are removed.
/// - Alias layers whose variant is neither the target alias nor the neutral
///   `Mode` variant are removed.
/// - If the neutral alias layer appears after the target's alias layer, the
///   two swap positions so the brand-specific override always wins. This is
///   a point fix: no other layer moves. Re-applying the selector to an
///   already-correct order changes nothing.
///
/// Fails with a configuration error when no palette layer survives, or when
/// the target theme's own palette is missing.
pub fn select_layers(base_order: &[String], target: &BuildTarget) -> Result<Vec<String>, BuildError> {
    let mut selected: Vec<String> = Vec::new();
    let mut neutral_at: Option<usize> = None;
    let mut alias_at: Option<usize> = None;
    let mut palette_count = 0usize;
    let mut target_palette = false;

    for name in base_order {
        match layer_role(name) {
            LayerRole::Palette { theme } => {
                if theme == Some(target.theme.opposite()) {
                    continue;
                }
                palette_count += 1;
                if theme == Some(target.theme) {
                    target_palette = true;
                }
            }
            LayerRole::Alias { variant, neutral } => {
                if neutral {
                    neutral_at.get_or_insert(selected.len());
                } else if variant == target.alias {
                    alias_at.get_or_insert(selected.len());
                } else {
                    continue;
                }
            }
            LayerRole::Universal => {}
        }
        selected.push(name.clone());
    }

    if palette_count == 0 {
        return Err(BuildError::Configuration(format!(
            "target {target}: no palette layer in base order"
        )));
    }
    if !target_palette {
        return Err(BuildError::Configuration(format!(
            "target {target}: no palette layer for theme {}",
            target.theme
        )));
    }

    if let (Some(neutral), Some(alias)) = (neutral_at, alias_at)
        && neutral > alias
    {
        selected.swap(neutral, alias);
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn filters_opposite_palette_and_foreign_aliases() {
        let base = order(&[
            "01 Primitive/Mode 1",
            "02 Alias/Mode 1",
            "02 Alias/myQ",
            "02 Alias/otherBrand",
            "03 Palette/light",
            "03 Palette/dark",
            "03 Mapped/Mode 1",
        ]);
        let effective =
            select_layers(&base, &BuildTarget::new("myQ", Theme::Light)).expect("selection");
        assert_eq!(
            effective,
            order(&[
                "01 Primitive/Mode 1",
                "02 Alias/Mode 1",
                "02 Alias/myQ",
                "03 Palette/light",
                "03 Mapped/Mode 1",
            ])
        );
    }

    #[test]
    fn neutral_alias_moves_before_target_alias() {
        let base = order(&["02 Alias/BrandX", "02 Alias/Mode", "03 Palette/dark"]);
        let effective =
            select_layers(&base, &BuildTarget::new("BrandX", Theme::Dark)).expect("selection");
        assert_eq!(
            effective,
            order(&["02 Alias/Mode", "02 Alias/BrandX", "03 Palette/dark"])
        );
    }

    #[test]
    fn selector_is_idempotent_on_correct_order() {
        let base = order(&["02 Alias/Mode", "02 Alias/BrandX", "03 Palette/light"]);
        let target = BuildTarget::new("BrandX", Theme::Light);
        let once = select_layers(&base, &target).expect("first pass");
        let twice = select_layers(&once, &target).expect("second pass");
        assert_eq!(once, base);
        assert_eq!(twice, once);
    }

    #[test]
    fn missing_target_palette_is_a_configuration_error() {
        let base = order(&["01 Primitive", "03 Palette/light"]);
        let result = select_layers(&base, &BuildTarget::new("myQ", Theme::Dark));
        match result {
            Err(BuildError::Configuration(message)) => {
                assert!(message.contains("dark"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn order_with_no_palette_at_all_is_rejected() {
        let base = order(&["01 Primitive", "02 Alias/myQ"]);
        let result = select_layers(&base, &BuildTarget::new("myQ", Theme::Light));
        assert!(matches!(result, Err(BuildError::Configuration(_))));
    }

    #[test]
    fn unknown_palette_variant_counts_as_no_theme() {
        // A palette with an unrecognized variant is kept but cannot satisfy
        // the mandatory-palette check on its own.
        let base = order(&["03 Palette/sepia"]);
        let result = select_layers(&base, &BuildTarget::new("myQ", Theme::Light));
        assert!(matches!(result, Err(BuildError::Configuration(_))));
    }
}
