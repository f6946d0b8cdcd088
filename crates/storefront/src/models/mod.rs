//! Domain models for the storefront.
//!
//! Vitrine entities live in `vitrine_core::models`; this module only holds
//! what is specific to the HTTP service (accounts and session state).

pub mod session;
pub mod user;

pub use session::{SessionContext, keys as session_keys};
pub use user::User;
