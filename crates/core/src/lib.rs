//! Vitrine Core - Domain library for the Vitrine link-in-bio editor.
//!
//! This crate holds everything about a vitrine that does not touch I/O:
//! - [`types`] - Newtypes for ids, slugs, colors, prices and social links
//! - [`models`] - Vitrine, product and analytics entities plus form inputs
//! - [`theme`] - Color presets and full themes
//! - [`preview`] - The layout shared by the editor preview and the public page
//! - [`gateway`] - The persistence trait implemented by the storefront crate
//!
//! # Features
//!
//! - `postgres` - `sqlx` encode/decode impls for the id types
//! - `memory` - [`memory::MemoryGateway`], an in-memory gateway for tests

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod gateway;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod models;
pub mod preview;
pub mod theme;
pub mod types;

pub use gateway::{GatewayError, VitrineGateway};
pub use models::*;
pub use preview::{Layout, render};
pub use theme::{ColorPreset, Palette, Theme};
pub use types::*;
