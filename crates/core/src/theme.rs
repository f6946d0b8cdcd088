//! Color presets and full themes.
//!
//! Applying either is pure substitution: a preset replaces the four colors, a
//! theme replaces the colors plus font and layout. Custom overrides are never
//! touched.

use serde::{Deserialize, Serialize};

use crate::models::VitrineChanges;
use crate::types::{FontFamily, HexColor, LayoutStyle, StyleAttributes};

/// The four colors of a vitrine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: HexColor,
    pub primary: HexColor,
    pub secondary: HexColor,
    pub text: HexColor,
}

impl Palette {
    fn from_static(colors: [&'static str; 4]) -> Self {
        let [background, primary, secondary, text] = colors;
        Self {
            background: HexColor::from_static(background),
            primary: HexColor::from_static(primary),
            secondary: HexColor::from_static(secondary),
            text: HexColor::from_static(text),
        }
    }

    /// Whether `style` currently uses exactly these colors.
    #[must_use]
    pub fn matches(&self, style: &StyleAttributes) -> bool {
        style.background_color == self.background
            && style.primary_color == self.primary
            && style.secondary_color == self.secondary
            && style.text_color == self.text
    }

    fn changes(&self) -> VitrineChanges {
        VitrineChanges {
            background_color: Some(self.background.clone()),
            primary_color: Some(self.primary.clone()),
            secondary_color: Some(self.secondary.clone()),
            text_color: Some(self.text.clone()),
            ..VitrineChanges::default()
        }
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Color-only preset offered by the style editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPreset {
    Classico,
    AzulModerno,
    VerdeNatural,
    RosaElegante,
    LaranjaVibrante,
    RoxoPremium,
    Escuro,
}

impl ColorPreset {
    pub const ALL: [Self; 7] = [
        Self::Classico,
        Self::AzulModerno,
        Self::VerdeNatural,
        Self::RosaElegante,
        Self::LaranjaVibrante,
        Self::RoxoPremium,
        Self::Escuro,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Classico => "Clássico",
            Self::AzulModerno => "Azul Moderno",
            Self::VerdeNatural => "Verde Natural",
            Self::RosaElegante => "Rosa Elegante",
            Self::LaranjaVibrante => "Laranja Vibrante",
            Self::RoxoPremium => "Roxo Premium",
            Self::Escuro => "Escuro",
        }
    }

    /// Background, primary, secondary, text.
    const fn colors(self) -> [&'static str; 4] {
        match self {
            Self::Classico => ["#ffffff", "#000000", "#666666", "#333333"],
            Self::AzulModerno => ["#f8fafc", "#3b82f6", "#64748b", "#1e293b"],
            Self::VerdeNatural => ["#f6fdf6", "#16a34a", "#65a30d", "#15803d"],
            Self::RosaElegante => ["#fdf2f8", "#ec4899", "#f472b6", "#be185d"],
            Self::LaranjaVibrante => ["#fff7ed", "#ea580c", "#fb923c", "#c2410c"],
            Self::RoxoPremium => ["#faf5ff", "#9333ea", "#a855f7", "#7c3aed"],
            Self::Escuro => ["#0f172a", "#60a5fa", "#94a3b8", "#f1f5f9"],
        }
    }

    #[must_use]
    pub fn palette(self) -> Palette {
        Palette::from_static(self.colors())
    }

    /// Change set that applies this preset.
    #[must_use]
    pub fn changes(self) -> VitrineChanges {
        self.palette().changes()
    }

    /// Replace the four colors of `style` in place.
    pub fn apply(self, style: &mut StyleAttributes) {
        let palette = self.palette();
        style.background_color = palette.background;
        style.primary_color = palette.primary;
        style.secondary_color = palette.secondary;
        style.text_color = palette.text;
    }
}

// =============================================================================
// Themes
// =============================================================================

/// A complete look: palette, font and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Minimal,
    Vibrant,
    Dark,
    Influencer,
}

impl Theme {
    pub const ALL: [Self; 4] = [Self::Minimal, Self::Vibrant, Self::Dark, Self::Influencer];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Vibrant => "vibrant",
            Self::Dark => "dark",
            Self::Influencer => "influencer",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "Loja Minimalista",
            Self::Vibrant => "Estilo TikTok/Pop",
            Self::Dark => "Estética Dark",
            Self::Influencer => "Estilo Influenciador",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Minimal => "Clean e elegante para produtos premium",
            Self::Vibrant => "Cores vibrantes para criar vitrines que chamam atenção",
            Self::Dark => "Visual moderno em tons escuros",
            Self::Influencer => "Perfeito para criadores de conteúdo",
        }
    }

    #[must_use]
    pub fn palette(self) -> Palette {
        Palette::from_static(match self {
            Self::Minimal => ["#ffffff", "#000000", "#666666", "#333333"],
            Self::Vibrant => ["#ff6b6b", "#4ecdc4", "#45b7d1", "#ffffff"],
            Self::Dark => ["#1a1a1a", "#bb86fc", "#03dac6", "#ffffff"],
            Self::Influencer => ["#ffeaa7", "#fd79a8", "#fdcb6e", "#2d3436"],
        })
    }

    #[must_use]
    pub const fn font_family(self) -> FontFamily {
        match self {
            Self::Minimal => FontFamily::Inter,
            Self::Vibrant => FontFamily::Poppins,
            Self::Dark => FontFamily::Roboto,
            Self::Influencer => FontFamily::PlayfairDisplay,
        }
    }

    #[must_use]
    pub const fn layout_style(self) -> LayoutStyle {
        match self {
            Self::Minimal => LayoutStyle::Minimal,
            Self::Vibrant => LayoutStyle::Vibrant,
            Self::Dark => LayoutStyle::Dark,
            Self::Influencer => LayoutStyle::Influencer,
        }
    }

    /// Change set that applies this theme.
    #[must_use]
    pub fn changes(self) -> VitrineChanges {
        VitrineChanges {
            font_family: Some(self.font_family()),
            layout_style: Some(self.layout_style()),
            ..self.palette().changes()
        }
    }

    /// Replace colors, font and layout of `style` in place.
    pub fn apply(self, style: &mut StyleAttributes) {
        let palette = self.palette();
        style.background_color = palette.background;
        style.primary_color = palette.primary;
        style.secondary_color = palette.secondary;
        style.text_color = palette.text;
        style.font_family = self.font_family();
        style.layout_style = self.layout_style();
    }

    /// The theme `style` is currently dressed in, if any.
    ///
    /// Custom overrides are ignored.
    #[must_use]
    pub fn matching(style: &StyleAttributes) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| {
            theme.palette().matches(style)
                && style.font_family == theme.font_family()
                && style.layout_style == theme.layout_style()
        })
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
