//! Dashboard route handlers.
//!
//! Lists the user's vitrines with their visit counters and handles creating
//! and deleting vitrines.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

use vitrine_core::{
    DashboardSummary, NewVitrine, Theme, Vitrine, VitrineAnalytics, VitrineGateway, VitrineId,
};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// One row of the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardEntry {
    pub vitrine: Vitrine,
    pub public_url: String,
    pub visits_count: i64,
    pub active_theme: Option<Theme>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub vitrines: Vec<DashboardEntry>,
    pub summary: DashboardSummary,
}

impl DashboardView {
    fn build(vitrines: Vec<Vitrine>, analytics: &[VitrineAnalytics], origin: &str) -> Self {
        let summary = DashboardSummary::compute(&vitrines, analytics);
        let vitrines = vitrines
            .into_iter()
            .map(|vitrine| {
                let visits_count = analytics
                    .iter()
                    .find(|a| a.vitrine_id == vitrine.id)
                    .map_or(0, |a| a.visits_count);
                DashboardEntry {
                    public_url: vitrine.public_url(origin),
                    active_theme: Theme::matching(&vitrine.style),
                    visits_count,
                    vitrine,
                }
            })
            .collect();
        Self { vitrines, summary }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedVitrine {
    pub vitrine: Vitrine,
    pub public_url: String,
}

/// GET /api/vitrines
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
) -> Result<Json<DashboardView>> {
    let gateway = state.gateway();
    let (vitrines, analytics) = tokio::try_join!(
        gateway.list_vitrines(context.user_id),
        gateway.list_analytics(context.user_id),
    )?;

    Ok(Json(DashboardView::build(
        vitrines,
        &analytics,
        &state.config().base_url,
    )))
}

/// POST /api/vitrines
///
/// Creates an unpublished vitrine with a generated title and slug; the owner
/// renames it in the editor.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
) -> Result<Response> {
    let vitrine = state
        .gateway()
        .create_vitrine(context.user_id, NewVitrine::placeholder(Utc::now()))
        .await?;

    tracing::info!(vitrine_id = %vitrine.id, slug = %vitrine.slug, "vitrine created");
    let body = CreatedVitrine {
        public_url: vitrine.public_url(&state.config().base_url),
        vitrine,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// DELETE /api/vitrines/{id}
///
/// Any editor session on the vitrine is closed.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
) -> Result<StatusCode> {
    state.gateway().delete_vitrine(context.user_id, id).await?;
    state.editors().close_vitrine(id).await;

    tracing::info!(vitrine_id = %id, "vitrine deleted");
    Ok(StatusCode::NO_CONTENT)
}
