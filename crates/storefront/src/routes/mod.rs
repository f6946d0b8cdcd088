//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness check
//! GET    /health/ready                        - Readiness check (database)
//! GET    /v/{slug}                            - Public vitrine page (?mode=desktop)
//!
//! # Auth (rate limited)
//! POST   /api/auth/register                   - Create account and log in
//! POST   /api/auth/login                      - Log in
//! POST   /api/auth/logout                     - Log out, closing editor sessions
//!
//! # Dashboard (requires auth)
//! GET    /api/vitrines                        - Vitrines, visit counters, totals
//! POST   /api/vitrines                        - Create a placeholder vitrine
//! DELETE /api/vitrines/{id}                   - Delete a vitrine
//!
//! # Editor (requires auth)
//! GET    /api/editor/{id}                     - Open or resume the draft session
//! DELETE /api/editor/{id}                     - Close the draft session
//! PATCH  /api/editor/{id}                     - Save vitrine fields
//! POST   /api/editor/{id}/preset              - Apply a color preset
//! POST   /api/editor/{id}/theme               - Apply a theme
//! POST   /api/editor/{id}/publish             - Toggle published state
//! POST   /api/editor/{id}/slug-check          - Debounced slug availability
//! POST   /api/editor/{id}/products            - Add a product
//! PUT    /api/editor/{id}/products/{pid}      - Update a product
//! DELETE /api/editor/{id}/products/{pid}      - Remove a product
//! GET    /api/editor/{id}/preview             - Preview fragment (?mode=desktop)
//! GET    /api/editor/{id}/preview.json        - Preview layout as JSON
//! ```

pub mod auth;
pub mod dashboard;
pub mod editor;
pub mod health;
pub mod public;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index).post(dashboard::create))
        .route("/{id}", delete(dashboard::delete))
}

/// Create the editor routes router.
pub fn editor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(editor::open).patch(editor::update).delete(editor::close),
        )
        .route("/{id}/preset", post(editor::apply_preset))
        .route("/{id}/theme", post(editor::apply_theme))
        .route("/{id}/publish", post(editor::toggle_publish))
        .route("/{id}/slug-check", post(editor::check_slug))
        .route("/{id}/products", post(editor::add_product))
        .route(
            "/{id}/products/{product_id}",
            put(editor::update_product).delete(editor::remove_product),
        )
        .route("/{id}/preview", get(editor::preview))
        .route("/{id}/preview.json", get(editor::preview_json))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/vitrines", dashboard_routes())
        .nest("/editor", editor_routes())
        .layer(api_rate_limiter())
        .nest("/auth", auth_routes().layer(auth_rate_limiter()));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/v/{slug}", get(public::show))
        .nest("/api", api)
}
