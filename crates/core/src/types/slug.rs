//! URL slugs selecting a vitrine's public path (`/v/<slug>`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors returned by [`Slug::parse`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug cannot be empty")]
    Empty,
    #[error("slug may only contain a-z, 0-9 and single hyphens (try \"{suggestion}\")")]
    NotNormalized { suggestion: String },
}

/// Normalize arbitrary user input into slug form.
///
/// Lower-cases the input, replaces every character outside `[a-z0-9-]` with
/// `-`, then collapses runs of `-` into one. Total and idempotent. The result
/// may be empty (for empty input) and may start or end with `-`.
///
/// ```
/// use vitrine_core::normalize_slug;
///
/// assert_eq!(normalize_slug("Minha Loja!!"), "minha-loja-");
/// assert_eq!(normalize_slug("Café"), "caf-");
/// ```
#[must_use]
pub fn normalize_slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if mapped == '-' && out.ends_with('-') {
            continue;
        }
        out.push(mapped);
    }
    out
}

/// Placeholder availability rule used by the editor's slug checker.
///
/// A slug counts as available when it is longer than three characters and has
/// no space. This does not consult existing vitrines; the store's unique
/// constraint is what actually rejects a duplicate on save.
#[must_use]
pub fn slug_looks_available(slug: &str) -> bool {
    slug.len() > 3 && !slug.contains(' ')
}

/// A validated slug: non-empty and already in [`normalize_slug`] form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Accept `s` only if it is non-empty and normalization leaves it unchanged.
    ///
    /// # Errors
    ///
    /// [`SlugError::Empty`] for empty input, [`SlugError::NotNormalized`]
    /// (carrying the normalized suggestion) otherwise.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        let normalized = normalize_slug(s);
        if normalized != s {
            return Err(SlugError::NotNormalized {
                suggestion: normalized,
            });
        }
        Ok(Self(normalized))
    }

    /// Normalize `raw` and wrap it, failing only when the result is empty.
    ///
    /// # Errors
    ///
    /// [`SlugError::Empty`] if `raw` normalizes to an empty string.
    pub fn from_raw(raw: &str) -> Result<Self, SlugError> {
        let normalized = normalize_slug(raw);
        if normalized.is_empty() {
            return Err(SlugError::Empty);
        }
        Ok(Self(normalized))
    }

    /// Wrap a string the caller built in normalized form.
    pub(crate) const fn new_unchecked(normalized: String) -> Self {
        Self(normalized)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The public page URL for this slug under `origin`.
    ///
    /// ```
    /// use vitrine_core::Slug;
    ///
    /// let slug = Slug::parse("minha-loja").unwrap();
    /// assert_eq!(slug.public_url("https://vitrine.bio/"), "https://vitrine.bio/v/minha-loja");
    /// ```
    #[must_use]
    pub fn public_url(&self, origin: &str) -> String {
        format!("{}/v/{}", origin.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn is_clean(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !s.contains("--")
    }

    #[test]
    fn test_normalize_lowercases_and_replaces() {
        assert_eq!(normalize_slug("Loja da Ana"), "loja-da-ana");
        assert_eq!(normalize_slug("a__b"), "a-b");
        assert_eq!(normalize_slug("--x--"), "-x-");
        assert_eq!(normalize_slug(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent_and_clean() {
        let samples = [
            "",
            " ",
            "Hello World",
            "já é São João",
            "ß-ẞ-İ",
            "a---b",
            "UPPER_case-123",
            "emoji 🎉 shop",
            "\t\n--\r",
            "ǅemal",
        ];
        for s in samples {
            let once = normalize_slug(s);
            assert_eq!(normalize_slug(&once), once, "not idempotent for {s:?}");
            assert!(is_clean(&once), "dirty output {once:?} for {s:?}");
        }
    }

    #[test]
    fn test_availability_placeholder_rule() {
        assert!(!slug_looks_available("ab"));
        assert!(!slug_looks_available("abc"));
        assert!(slug_looks_available("abcd"));
        assert!(!slug_looks_available("ab cd"));
    }

    #[test]
    fn test_parse_requires_normalized_form() {
        assert_eq!(Slug::parse("minha-loja").unwrap().as_str(), "minha-loja");
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert_eq!(
            Slug::parse("Minha Loja"),
            Err(SlugError::NotNormalized {
                suggestion: "minha-loja".to_string()
            })
        );
    }

    #[test]
    fn test_from_raw_normalizes() {
        assert_eq!(Slug::from_raw("Minha Loja").unwrap().as_str(), "minha-loja");
        assert_eq!(Slug::from_raw(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_deserialize_rejects_unnormalized() {
        assert!(serde_json::from_str::<Slug>("\"ok-slug\"").is_ok());
        assert!(serde_json::from_str::<Slug>("\"Not Ok\"").is_err());
    }
}
