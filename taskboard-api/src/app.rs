/// Application state and router builder
///
/// This module defines the shared application state, the router with all
/// routes and middleware, and the bearer-token auth gate that protects the
/// task endpoints.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::{auth::jwt, models::user::User};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Owner context injected by the auth gate
///
/// Carries the authenticated user's identifier; every task operation is
/// scoped to it. Handlers extract it with Axum's `Extension` extractor.
#[derive(Debug, Clone, Copy)]
pub struct OwnerContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                    # Health probe (public)
/// ├── POST /register            # Create account + token (public)
/// ├── POST /login               # Verify credentials + token (public)
/// └── /tasks/                   # Task CRUD (bearer token required)
///     ├── POST   /
///     ├── GET    /
///     ├── PATCH  /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Panic recovery (tower-http CatchPanicLayer) - a faulting handler
///    becomes a logged 500 while the process keeps serving
/// 2. CORS (permissive; the browser client is a separate origin)
/// 3. Request logging (tower-http TraceLayer)
/// 4. Authentication (on the /tasks subtree only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Task routes (require a bearer token)
    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/:id",
            patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    Router::new()
        .route("/", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// Bearer-token authentication middleware
///
/// Extracts the token from the Authorization header, validates its
/// signature, resolves the subject claim to a live user, and injects an
/// [`OwnerContext`] into request extensions. Any failure along the way
/// short-circuits with 401 before the handler runs, so a failed
/// authentication can never leave partial side effects.
async fn auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    use crate::error::ApiError;

    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthenticated("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthenticated("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    // The token only proves the claim was signed; the account must still
    // exist for the request to proceed.
    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| ApiError::InternalError(format!("User lookup failed: {}", e)))?
        .ok_or_else(|| ApiError::Unauthenticated("Unknown user".to_string()))?;

    req.extensions_mut().insert(OwnerContext { user_id: user.id });

    Ok(next.run(req).await)
}
