//! Debounced slug availability checks.
//!
//! Each check waits a settling delay before publishing its verdict, and only
//! the most recently issued check may publish. Older checks still run to
//! completion but report [`CheckOutcome::Superseded`].

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use vitrine_core::{Slug, SlugStatus, normalize_slug, slug_looks_available};

/// Result of one [`SlugChecker::check`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// This check published `status` for the normalized `slug`.
    Settled { slug: String, status: SlugStatus },
    /// A newer check was issued during the settling delay.
    Superseded { slug: String },
}

impl CheckOutcome {
    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            Self::Settled { slug, .. } | Self::Superseded { slug } => slug,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CheckState {
    generation: u64,
    /// Normalized slug the status belongs to. Empty while neutral.
    slug: String,
    status: SlugStatus,
}

/// Availability checker for one editor session.
#[derive(Debug)]
pub struct SlugChecker {
    delay: Duration,
    state: watch::Sender<CheckState>,
}

impl SlugChecker {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: watch::Sender::new(CheckState::default()),
        }
    }

    /// The last published status.
    #[must_use]
    pub fn status(&self) -> SlugStatus {
        self.state.borrow().status
    }

    /// Whether a save that moves the vitrine to `slug` may go ahead.
    ///
    /// The published status only gates the slug it was issued for. A slug
    /// that was never checked is judged by [`slug_looks_available`].
    #[must_use]
    pub fn allows_save(&self, slug: &Slug) -> bool {
        let state = self.state.borrow();
        if state.slug == slug.as_str() {
            state.status.allows_save()
        } else {
            slug_looks_available(slug.as_str())
        }
    }

    /// Forget any result and return to [`SlugStatus::Neutral`].
    ///
    /// Checks still waiting become superseded.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.generation += 1;
            state.slug.clear();
            state.status = SlugStatus::Neutral;
        });
    }

    /// Check `candidate` against the vitrine's `persisted` slug.
    ///
    /// An empty candidate, or one that normalizes to the persisted slug, is
    /// `Neutral` without waiting.
    pub async fn check(&self, candidate: &str, persisted: &Slug) -> CheckOutcome {
        let slug = normalize_slug(candidate);

        if slug.is_empty() || slug == persisted.as_str() {
            self.reset();
            return CheckOutcome::Settled {
                slug,
                status: SlugStatus::Neutral,
            };
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.slug.clone_from(&slug);
            state.status = SlugStatus::Pending;
            generation = state.generation;
        });

        tokio::time::sleep(self.delay).await;

        let status = if slug_looks_available(&slug) {
            SlugStatus::Available
        } else {
            SlugStatus::Unavailable
        };

        let published = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.status = status;
            true
        });

        if published {
            debug!(slug = %slug, ?status, "slug check settled");
            CheckOutcome::Settled { slug, status }
        } else {
            debug!(slug = %slug, "slug check superseded");
            CheckOutcome::Superseded { slug }
        }
    }
}
