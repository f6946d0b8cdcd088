//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Uppercased first letter of a title, shown when a vitrine has no avatar.
///
/// Usage in templates: `{{ layout.header.title|initial }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn initial(title: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(first_letter(&title.to_string()))
}

fn first_letter(title: &str) -> String {
    title
        .trim()
        .chars()
        .next()
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_letter() {
        assert_eq!(first_letter("loja da ana"), "L");
        assert_eq!(first_letter("  ébano"), "É");
        assert_eq!(first_letter("   "), "?");
    }
}
