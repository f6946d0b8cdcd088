//! Editor sessions: draft state, slug checks and the session registry.

mod draft;
mod registry;
mod slug_check;

pub use draft::{DraftError, DraftSession, DraftSnapshot};
pub use registry::EditorRegistry;
pub use slug_check::{CheckOutcome, SlugChecker};
