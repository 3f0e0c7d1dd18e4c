use axum::{middleware, response::IntoResponse, routing::get, routing::post, Router};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config;
use crate::handlers::{api, pages};
use crate::middleware::session::{require_session, session_guard};

pub fn app() -> Router {
    // Navigable pages, all behind the session guard (which also lets
    // unauthenticated users through to the auth pages)
    let page_routes = Router::new()
        .route("/", get(pages::dashboard::home))
        .route("/dashboard", get(pages::dashboard::dashboard))
        .route("/dashboard/properties", get(pages::properties::index))
        .route(
            "/dashboard/properties/new",
            get(pages::properties::new_form).post(pages::properties::create),
        )
        .route("/dashboard/leads", get(pages::leads::index))
        .route(
            "/dashboard/leads/new",
            get(pages::leads::capture).post(pages::leads::submit),
        )
        .route(
            "/sign-in",
            get(pages::auth::sign_in_page).post(pages::auth::sign_in_submit),
        )
        .route(
            "/sign-up",
            get(pages::auth::sign_up_page).post(pages::auth::sign_up_submit),
        )
        .route(
            "/forgot-password",
            get(pages::auth::forgot_password_page).post(pages::auth::forgot_password_submit),
        )
        .route(
            "/reset-password",
            get(pages::auth::reset_password_page).post(pages::auth::reset_password_submit),
        )
        .route("/email-verified", get(pages::auth::email_verified_page))
        .layer(middleware::from_fn(session_guard));

    // Token acquisition and account management, outside the guard
    let auth_api_routes = Router::new()
        .route("/api/auth/sign-up", post(api::auth::sign_up))
        .route("/api/auth/sign-in", post(api::auth::sign_in))
        .route("/api/auth/sign-out", post(api::auth::sign_out))
        .route("/api/auth/get-session", get(api::auth::get_session))
        .route("/api/auth/verify-email", get(api::auth::verify_email))
        .route("/api/auth/forgot-password", post(api::auth::forgot_password))
        .route("/api/auth/reset-password", post(api::auth::reset_password));

    // Data API: 401 without a session instead of a redirect
    let data_api_routes = Router::new()
        .route(
            "/api/properties",
            get(api::properties::list).post(api::properties::create),
        )
        .route("/api/leads", get(api::leads::list).post(api::leads::create))
        .layer(middleware::from_fn(require_session));

    Router::new()
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .merge(page_routes)
        .merge(auth_api_routes)
        .merge(data_api_routes)
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until shutdown. Shared by the server binary and `estate serve`.
pub async fn serve() -> anyhow::Result<()> {
    let port = config::config().http.port;
    let bind_addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    println!("🚀 Estate API server listening on http://{}", bind_addr);

    axum::serve(listener, app()).await?;
    Ok(())
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<_> = config::config()
        .http
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
