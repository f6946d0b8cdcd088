//! Social and contact links shown on a vitrine header.
//!
//! The platform set is closed. Values are whatever the owner typed (a handle,
//! a phone number, an address); [`social_url`] turns them into outbound links.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A supported social/contact platform.
///
/// Variant order is the display order on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    Instagram,
    Whatsapp,
    Tiktok,
    Youtube,
    Email,
}

impl SocialPlatform {
    pub const ALL: [Self; 5] = [
        Self::Instagram,
        Self::Whatsapp,
        Self::Tiktok,
        Self::Youtube,
        Self::Email,
    ];

    /// Key used in storage and on the wire.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Whatsapp => "whatsapp",
            Self::Tiktok => "tiktok",
            Self::Youtube => "youtube",
            Self::Email => "email",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::Whatsapp => "WhatsApp",
            Self::Tiktok => "TikTok",
            Self::Youtube => "YouTube",
            Self::Email => "E-mail",
        }
    }

    /// Outbound link for `value` on this platform.
    #[must_use]
    pub fn url_for(self, value: &str) -> String {
        social_url(self.key(), value)
    }
}

impl std::fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for SocialPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| format!("unknown social platform: {s}"))
    }
}

/// Build the outbound URL for a platform key and the value the owner entered.
///
/// Only the first `@` is dropped from handles. Unknown keys are treated as a
/// plain website.
///
/// ```
/// use vitrine_core::social_url;
///
/// assert_eq!(social_url("whatsapp", "+55 11 99999-9999"), "https://wa.me/5511999999999");
/// assert_eq!(social_url("instagram", "@shop"), "https://instagram.com/shop");
/// assert_eq!(social_url("email", "a@b.com"), "mailto:a@b.com");
/// ```
#[must_use]
pub fn social_url(platform: &str, value: &str) -> String {
    match platform {
        "instagram" => format!("https://instagram.com/{}", strip_first_at(value)),
        "whatsapp" => {
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            format!("https://wa.me/{digits}")
        }
        "tiktok" => format!("https://tiktok.com/@{}", strip_first_at(value)),
        "youtube" if value.starts_with("http") => value.to_string(),
        "youtube" => format!("https://youtube.com/@{}", strip_first_at(value)),
        "email" => format!("mailto:{value}"),
        _ if value.starts_with("http") => value.to_string(),
        _ => format!("https://{value}"),
    }
}

fn strip_first_at(value: &str) -> String {
    value.replacen('@', "", 1)
}

/// The links a vitrine shows, at most one per platform.
///
/// Blank values are never stored: setting a platform to an empty (or
/// whitespace-only) value removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<SocialPlatform, String>", into = "BTreeMap<SocialPlatform, String>")]
pub struct SocialLinks(BTreeMap<SocialPlatform, String>);

impl SocialLinks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the value for `platform`.
    pub fn set(&mut self, platform: SocialPlatform, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.0.remove(&platform);
        } else {
            self.0.insert(platform, value);
        }
    }

    #[must_use]
    pub fn with(mut self, platform: SocialPlatform, value: impl Into<String>) -> Self {
        self.set(platform, value);
        self
    }

    #[must_use]
    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        self.0.get(&platform).map(String::as_str)
    }

    /// Present entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SocialPlatform, &str)> {
        self.0.iter().map(|(p, v)| (*p, v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<BTreeMap<SocialPlatform, String>> for SocialLinks {
    fn from(map: BTreeMap<SocialPlatform, String>) -> Self {
        let mut links = Self::new();
        for (platform, value) in map {
            links.set(platform, value);
        }
        links
    }
}

impl From<SocialLinks> for BTreeMap<SocialPlatform, String> {
    fn from(links: SocialLinks) -> Self {
        links.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_social_url_per_platform() {
        assert_eq!(
            social_url("whatsapp", "+55 11 99999-9999"),
            "https://wa.me/5511999999999"
        );
        assert_eq!(social_url("instagram", "@shop"), "https://instagram.com/shop");
        assert_eq!(social_url("instagram", "shop"), "https://instagram.com/shop");
        assert_eq!(social_url("tiktok", "@dance"), "https://tiktok.com/@dance");
        assert_eq!(social_url("email", "a@b.com"), "mailto:a@b.com");
    }

    #[test]
    fn test_social_url_only_strips_first_at() {
        assert_eq!(social_url("instagram", "@@x"), "https://instagram.com/@x");
        assert_eq!(social_url("tiktok", "a@b"), "https://tiktok.com/@ab");
    }

    #[test]
    fn test_social_url_youtube() {
        assert_eq!(
            social_url("youtube", "https://youtube.com/c/loja"),
            "https://youtube.com/c/loja"
        );
        assert_eq!(social_url("youtube", "@canal"), "https://youtube.com/@canal");
        assert_eq!(social_url("youtube", "canal"), "https://youtube.com/@canal");
    }

    #[test]
    fn test_social_url_unknown_platform() {
        assert_eq!(social_url("site", "loja.com"), "https://loja.com");
        assert_eq!(social_url("site", "http://loja.com"), "http://loja.com");
    }

    #[test]
    fn test_platform_url_for_matches_free_function() {
        for platform in SocialPlatform::ALL {
            assert_eq!(
                platform.url_for("@value"),
                social_url(platform.key(), "@value")
            );
        }
    }

    #[test]
    fn test_blank_values_are_dropped() {
        let mut links = SocialLinks::new().with(SocialPlatform::Instagram, "@loja");
        links.set(SocialPlatform::Instagram, "   ");
        assert!(links.is_empty());
    }

    #[test]
    fn test_iteration_is_in_platform_order() {
        let links = SocialLinks::new()
            .with(SocialPlatform::Email, "a@b.com")
            .with(SocialPlatform::Instagram, "@loja");
        let order: Vec<_> = links.iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec![SocialPlatform::Instagram, SocialPlatform::Email]);
    }

    #[test]
    fn test_deserialize_rejects_unknown_platform() {
        let ok: SocialLinks =
            serde_json::from_str(r#"{"instagram":"@loja","email":""}"#).unwrap();
        assert_eq!(ok.len(), 1);
        assert!(serde_json::from_str::<SocialLinks>(r#"{"myspace":"x"}"#).is_err());
    }
}
