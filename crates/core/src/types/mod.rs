//! Core types for Vitrine.
//!
//! Newtype wrappers and closed enums for the values a vitrine is built from.

pub mod email;
pub mod id;
pub mod mode;
pub mod price;
pub mod slug;
pub mod social;
pub mod style;

pub use email::{Email, EmailError};
pub use id::*;
pub use mode::{SlugStatus, ViewportMode};
pub use price::{Price, PriceError};
pub use slug::{Slug, SlugError, normalize_slug, slug_looks_available};
pub use social::{SocialLinks, SocialPlatform, social_url};
pub use style::{
    ColorError, FontFamily, HexColor, LayoutStyle, StyleAttributes, StyleDeclaration, StyleOverrideError,
    StyleOverrides,
};
