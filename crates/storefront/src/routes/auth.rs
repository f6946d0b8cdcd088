//! Authentication route handlers.
//!
//! JSON endpoints for email/password accounts. A successful login or
//! registration stores a [`SessionContext`] in the session; logout also closes
//! the user's editor sessions.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{SessionContext, User, session_keys};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login and registration body.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The logged-in user.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
}

impl From<&SessionContext> for SessionResponse {
    fn from(context: &SessionContext) -> Self {
        Self {
            user_id: context.user_id.to_string(),
            email: context.email.as_str().to_string(),
        }
    }
}

async fn start_session(session: &Session, user: &User) -> Result<SessionContext> {
    let context = SessionContext::from(user);
    set_current_user(session, &context)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&context.user_id, Some(context.email.as_str()));
    Ok(context)
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.password)
        .await?;
    let context = start_session(&session, &user).await?;

    tracing::info!(user_id = %context.user_id, "user registered");
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&context))).into_response())
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<Json<SessionResponse>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await
        .inspect_err(|e| tracing::warn!("Login failed: {}", e))?;
    let context = start_session(&session, &user).await?;

    Ok(Json(SessionResponse::from(&context)))
}

/// POST /api/auth/logout
///
/// Closes every editor session of the user; drafts with writes in flight
/// discard their results.
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<StatusCode> {
    let current: Option<SessionContext> = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten();

    if let Some(context) = current {
        state.editors().close_user(context.user_id).await;
        tracing::info!(user_id = %context.user_id, "user logged out");
    }

    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}
