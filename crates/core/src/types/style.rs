//! Visual style attributes of a vitrine.
//!
//! Every value here ends up inside an inline `style` attribute or a `<style>`
//! element on the public page, so each type only admits inert values.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// =============================================================================
// Colors
// =============================================================================

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #rgb or #rrggbb")]
pub struct ColorError(String);

/// A CSS hex color, stored lower-cased (`#rrggbb` or `#rgb`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// # Errors
    ///
    /// Returns [`ColorError`] unless the input is `#` followed by 3 or 6 hex digits.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let s = s.trim();
        let valid = s
            .strip_prefix('#')
            .is_some_and(|hex| {
                matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
            });
        if !valid {
            return Err(ColorError(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Build from a known-good literal. Only used for the built-in palettes.
    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

// =============================================================================
// Font & layout
// =============================================================================

/// Font family offered by the style editor and the themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Inter,
    Roboto,
    #[serde(rename = "Open Sans")]
    OpenSans,
    Lato,
    Poppins,
    Montserrat,
    Nunito,
    #[serde(rename = "Playfair Display")]
    PlayfairDisplay,
}

impl FontFamily {
    pub const ALL: [Self; 8] = [
        Self::Inter,
        Self::Roboto,
        Self::OpenSans,
        Self::Lato,
        Self::Poppins,
        Self::Montserrat,
        Self::Nunito,
        Self::PlayfairDisplay,
    ];

    /// The CSS family name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inter => "Inter",
            Self::Roboto => "Roboto",
            Self::OpenSans => "Open Sans",
            Self::Lato => "Lato",
            Self::Poppins => "Poppins",
            Self::Montserrat => "Montserrat",
            Self::Nunito => "Nunito",
            Self::PlayfairDisplay => "Playfair Display",
        }
    }
}

impl std::fmt::Display for FontFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown font family: {s}"))
    }
}

/// Layout identifier. The first four come from the style editor, the rest are
/// set by the matching theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStyle {
    #[default]
    Minimal,
    Modern,
    Creative,
    Elegant,
    Vibrant,
    Dark,
    Influencer,
}

impl LayoutStyle {
    pub const ALL: [Self; 7] = [
        Self::Minimal,
        Self::Modern,
        Self::Creative,
        Self::Elegant,
        Self::Vibrant,
        Self::Dark,
        Self::Influencer,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Modern => "modern",
            Self::Creative => "creative",
            Self::Elegant => "elegant",
            Self::Vibrant => "vibrant",
            Self::Dark => "dark",
            Self::Influencer => "influencer",
        }
    }
}

impl std::fmt::Display for LayoutStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for LayoutStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.key() == s)
            .ok_or_else(|| format!("unknown layout style: {s}"))
    }
}

// =============================================================================
// Style overrides (sanitized custom CSS)
// =============================================================================

/// Properties an owner may override on their page container.
const ALLOWED_PROPERTIES: &[&str] = &[
    "background-color",
    "border-radius",
    "color",
    "font-size",
    "font-style",
    "font-weight",
    "letter-spacing",
    "line-height",
    "margin",
    "max-width",
    "padding",
    "text-align",
    "text-transform",
];

const MAX_DECLARATIONS: usize = 32;
const MAX_VALUE_LENGTH: usize = 100;

static VALUE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9#%.,()\s-]+$").expect("Invalid regex"));

/// Why a custom override was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleOverrideError {
    #[error("declaration {0:?} is not of the form `property: value`")]
    Malformed(String),
    #[error("property {0:?} cannot be overridden")]
    PropertyNotAllowed(String),
    #[error("value for {property:?} is not allowed: {value:?}")]
    ValueNotAllowed { property: String, value: String },
    #[error("at most {max} declarations are allowed")]
    TooMany { max: usize },
}

/// A single `property: value` pair that passed sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDeclaration {
    pub property: String,
    pub value: String,
}

/// Owner-supplied style overrides, restricted to inert declarations.
///
/// Input is a `;`-separated declaration list (no selectors, braces, at-rules,
/// comments, escapes or `url(...)`). Rendering scopes the declarations under
/// `.vitrine-container`, so they cannot reach the rest of the page.
///
/// ```
/// use vitrine_core::StyleOverrides;
///
/// let css = StyleOverrides::parse("font-size: 18px; color: #222").unwrap();
/// assert_eq!(css.scoped().as_deref(), Some(".vitrine-container { font-size: 18px; color: #222; }"));
/// assert!(StyleOverrides::parse("background: url(https://evil)").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StyleOverrides(Vec<StyleDeclaration>);

impl StyleOverrides {
    /// # Errors
    ///
    /// Returns the first [`StyleOverrideError`] found in `raw`.
    pub fn parse(raw: &str) -> Result<Self, StyleOverrideError> {
        let mut declarations = Vec::new();
        for chunk in raw.split(';') {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            let (property, value) = chunk
                .split_once(':')
                .ok_or_else(|| StyleOverrideError::Malformed(chunk.to_string()))?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();

            if !ALLOWED_PROPERTIES.contains(&property.as_str()) {
                return Err(StyleOverrideError::PropertyNotAllowed(property));
            }
            if !is_inert_value(value) {
                return Err(StyleOverrideError::ValueNotAllowed {
                    property,
                    value: value.to_string(),
                });
            }
            declarations.push(StyleDeclaration {
                property,
                value: value.to_string(),
            });
            if declarations.len() > MAX_DECLARATIONS {
                return Err(StyleOverrideError::TooMany {
                    max: MAX_DECLARATIONS,
                });
            }
        }
        Ok(Self(declarations))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn declarations(&self) -> &[StyleDeclaration] {
        &self.0
    }

    /// Declarations as a single `a: b; c: d;` string, the stored form.
    #[must_use]
    pub fn to_declaration_list(&self) -> String {
        self.0
            .iter()
            .map(|d| format!("{}: {};", d.property, d.value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The rule to emit inside a `<style>` element, if any.
    #[must_use]
    pub fn scoped(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        Some(format!(
            ".vitrine-container {{ {} }}",
            self.to_declaration_list()
        ))
    }
}

fn is_inert_value(value: &str) -> bool {
    if value.is_empty() || value.len() > MAX_VALUE_LENGTH || !VALUE_PATTERN.is_match(value) {
        return false;
    }
    let lower = value.to_ascii_lowercase();
    // Parentheses are only for color functions; anything else could fetch or run.
    if lower.contains('(') {
        let allowed = ["rgb(", "rgba(", "hsl(", "hsla("];
        return lower
            .match_indices('(')
            .all(|(i, _)| {
                lower
                    .get(..=i)
                    .is_some_and(|head| allowed.iter().any(|f| head.ends_with(f)))
            });
    }
    true
}

impl TryFrom<String> for StyleOverrides {
    type Error = StyleOverrideError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StyleOverrides> for String {
    fn from(overrides: StyleOverrides) -> Self {
        overrides.to_declaration_list()
    }
}

// =============================================================================
// StyleAttributes
// =============================================================================

/// The full set of style fields stored on a vitrine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleAttributes {
    pub background_color: HexColor,
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    pub text_color: HexColor,
    pub font_family: FontFamily,
    pub layout_style: LayoutStyle,
    pub custom_css: StyleOverrides,
}

impl Default for StyleAttributes {
    fn default() -> Self {
        Self {
            background_color: HexColor::from_static("#ffffff"),
            primary_color: HexColor::from_static("#000000"),
            secondary_color: HexColor::from_static("#666666"),
            text_color: HexColor::from_static("#333333"),
            font_family: FontFamily::default(),
            layout_style: LayoutStyle::default(),
            custom_css: StyleOverrides::default(),
        }
    }
}
