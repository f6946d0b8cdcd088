//! Small status enums shared by the editor and the public page.

use serde::{Deserialize, Serialize};

/// Viewport the preview is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    #[default]
    Mobile,
    Desktop,
}

impl ViewportMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

/// Published state of a slug check, as shown next to the slug field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlugStatus {
    /// Nothing to check: empty input or the slug already saved.
    #[default]
    Neutral,
    /// A check is waiting for its settling delay.
    Pending,
    Available,
    Unavailable,
}

impl SlugStatus {
    /// Whether a save that changes the slug may go ahead.
    #[must_use]
    pub const fn allows_save(self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_default_is_mobile() {
        assert_eq!(ViewportMode::default(), ViewportMode::Mobile);
    }

    #[test]
    fn test_only_unavailable_blocks_save() {
        assert!(SlugStatus::Neutral.allows_save());
        assert!(SlugStatus::Pending.allows_save());
        assert!(SlugStatus::Available.allows_save());
        assert!(!SlugStatus::Unavailable.allows_save());
    }
}
