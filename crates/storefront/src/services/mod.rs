//! Business logic services for storefront.
//!
//! - [`auth`] - Email/password accounts (argon2)
//! - [`editor`] - Draft sessions, debounced slug checks and the session registry

pub mod auth;
pub mod editor;

pub use auth::{AuthError, AuthService};
pub use editor::{DraftError, DraftSession, EditorRegistry};
