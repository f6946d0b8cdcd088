//! Editor route handlers.
//!
//! `GET /api/editor/{id}` opens (or resumes) the draft session of a vitrine;
//! every mutation after that goes through the open session. A mutation on a
//! vitrine without an open session answers 410 Gone.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use vitrine_core::{
    ColorPreset, Layout, Product, ProductFields, ProductId, SharePreview, SlugStatus, Theme,
    ViewportMode, VitrineChanges, VitrineId, render,
};

use crate::db::PgGateway;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::SessionContext;
use crate::services::editor::{CheckOutcome, DraftSession, DraftSnapshot};
use crate::state::AppState;

/// The editor screen: the draft plus what is derived from it.
#[derive(Debug, Serialize)]
pub struct EditorView {
    #[serde(flatten)]
    pub draft: DraftSnapshot,
    pub public_url: String,
    pub share: SharePreview,
    /// The theme whose values the style matches exactly, if any.
    pub active_theme: Option<Theme>,
    pub slug_status: SlugStatus,
}

impl EditorView {
    fn new(draft: DraftSnapshot, slug_status: SlugStatus, origin: &str) -> Self {
        Self {
            public_url: draft.vitrine.public_url(origin),
            share: draft.vitrine.share_preview(origin),
            active_theme: Theme::matching(&draft.vitrine.style),
            slug_status,
            draft,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub preset: ColorPreset,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: Theme,
}

#[derive(Debug, Deserialize)]
pub struct SlugCheckRequest {
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct SlugCheckResponse {
    pub slug: String,
    pub status: SlugStatus,
    /// A newer check replaced this one before it settled.
    pub superseded: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub mode: ViewportMode,
}

/// Preview fragment, swapped into the editor's preview pane.
#[derive(Template, WebTemplate)]
#[template(path = "partials/preview.html")]
pub struct PreviewTemplate {
    pub layout: Layout,
}

type Session = Arc<DraftSession<PgGateway>>;

async fn open_session(
    state: &AppState,
    context: &SessionContext,
    id: VitrineId,
) -> Result<Session> {
    Ok(state.editors().session(context.user_id, id).await?)
}

fn view(state: &AppState, session: &Session, draft: DraftSnapshot) -> EditorView {
    EditorView::new(
        draft,
        session.slug_checker().status(),
        &state.config().base_url,
    )
}

/// GET /api/editor/{id}
pub async fn open(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
) -> Result<Json<EditorView>> {
    let session = state.editors().open(&context, id).await?;
    let draft = session.snapshot().await?;
    Ok(Json(view(&state, &session, draft)))
}

/// DELETE /api/editor/{id}
pub async fn close(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
) -> StatusCode {
    state.editors().close(context.user_id, id).await;
    StatusCode::NO_CONTENT
}

/// PATCH /api/editor/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
    Json(changes): Json<VitrineChanges>,
) -> Result<Json<EditorView>> {
    let session = open_session(&state, &context, id).await?;
    let draft = session.update_vitrine(&changes).await?;
    Ok(Json(view(&state, &session, draft)))
}

/// POST /api/editor/{id}/preset
pub async fn apply_preset(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
    Json(body): Json<PresetRequest>,
) -> Result<Json<EditorView>> {
    let session = open_session(&state, &context, id).await?;
    let draft = session.apply_preset(body.preset).await?;
    add_breadcrumb("editor", "Applied color preset", Some(&[("preset", body.preset.label())]));
    Ok(Json(view(&state, &session, draft)))
}

/// POST /api/editor/{id}/theme
pub async fn apply_theme(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
    Json(body): Json<ThemeRequest>,
) -> Result<Json<EditorView>> {
    let session = open_session(&state, &context, id).await?;
    let draft = session.apply_theme(body.theme).await?;
    add_breadcrumb("editor", "Applied theme", Some(&[("theme", body.theme.key())]));
    Ok(Json(view(&state, &session, draft)))
}

/// POST /api/editor/{id}/publish
pub async fn toggle_publish(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
) -> Result<Json<EditorView>> {
    let session = open_session(&state, &context, id).await?;
    let draft = session.toggle_publish().await?;
    tracing::info!(
        vitrine_id = %id,
        is_published = draft.vitrine.is_published,
        "publish state changed"
    );
    Ok(Json(view(&state, &session, draft)))
}

/// POST /api/editor/{id}/slug-check
///
/// Resolves after the settling delay, superseded or not. A request replaced
/// by a newer one during the delay answers with `superseded` set and the
/// status current at that point.
pub async fn check_slug(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
    Json(body): Json<SlugCheckRequest>,
) -> Result<Json<SlugCheckResponse>> {
    let session = open_session(&state, &context, id).await?;
    let response = match session.check_slug(&body.slug).await? {
        CheckOutcome::Settled { slug, status } => SlugCheckResponse {
            slug,
            status,
            superseded: false,
        },
        CheckOutcome::Superseded { slug } => SlugCheckResponse {
            slug,
            status: session.slug_checker().status(),
            superseded: true,
        },
    };
    Ok(Json(response))
}

/// POST /api/editor/{id}/products
pub async fn add_product(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
    Json(fields): Json<ProductFields>,
) -> Result<Response> {
    let session = open_session(&state, &context, id).await?;
    let product = session.add_product(fields).await?;
    Ok((StatusCode::CREATED, Json(product)).into_response())
}

/// PUT /api/editor/{id}/products/{product_id}
pub async fn update_product(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path((id, product_id)): Path<(VitrineId, ProductId)>,
    Json(fields): Json<ProductFields>,
) -> Result<Json<Product>> {
    let session = open_session(&state, &context, id).await?;
    Ok(Json(session.update_product(product_id, fields).await?))
}

/// DELETE /api/editor/{id}/products/{product_id}
pub async fn remove_product(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path((id, product_id)): Path<(VitrineId, ProductId)>,
) -> Result<StatusCode> {
    let session = open_session(&state, &context, id).await?;
    session.remove_product(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn layout(
    state: &AppState,
    context: &SessionContext,
    id: VitrineId,
    mode: ViewportMode,
) -> Result<Layout> {
    let session = open_session(state, context, id).await?;
    let draft = session.snapshot().await?;
    Ok(render(&draft.vitrine, &draft.products, mode))
}

/// GET /api/editor/{id}/preview
pub async fn preview(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
    Query(query): Query<PreviewQuery>,
) -> Result<PreviewTemplate> {
    Ok(PreviewTemplate {
        layout: layout(&state, &context, id, query.mode).await?,
    })
}

/// GET /api/editor/{id}/preview.json
pub async fn preview_json(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<VitrineId>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<Layout>> {
    Ok(Json(layout(&state, &context, id, query.mode).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use vitrine_core::{NewVitrine, Slug, UserId, Vitrine};

    use super::*;

    fn draft() -> DraftSnapshot {
        let vitrine = Vitrine::from_new(
            VitrineId::generate(),
            UserId::generate(),
            NewVitrine {
                title: "Loja".to_string(),
                slug: Slug::parse("loja").unwrap(),
                description: None,
            },
            Utc::now(),
        );
        DraftSnapshot {
            vitrine,
            products: Vec::new(),
            last_saved: Utc::now(),
        }
    }

    #[test]
    fn test_editor_view_json_shape() {
        let view = EditorView::new(draft(), SlugStatus::Pending, "https://vitrine.bio");
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["vitrine"]["title"], "Loja");
        assert_eq!(json["products"], serde_json::json!([]));
        assert!(json["last_saved"].is_string());
        assert_eq!(json["public_url"], "https://vitrine.bio/v/loja");
        assert_eq!(json["share"]["title"], "Loja");
        assert_eq!(json["active_theme"], "minimal");
        assert_eq!(json["slug_status"], "pending");
    }

    #[test]
    fn test_preview_fragment_empty_state() {
        let draft = draft();
        let html = PreviewTemplate {
            layout: render(&draft.vitrine, &draft.products, ViewportMode::Mobile),
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"data-mode="mobile""#));
        assert!(html.contains("Nenhum produto ainda."));
        assert!(!html.contains("<html"));
    }
}
