//! API handlers for Bookshelf REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;
pub mod stats;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    routing::{get, MethodRouter},
    Router,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// Query string extractor for listing parameters.
///
/// A repeated key keeps its last value, and every failure is rejected as a
/// JSON validation error instead of axum's plain-text rejection.
pub struct Params<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let fields: Map<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        serde_json::from_value(Value::Object(fields))
            .map(Params)
            .map_err(|e| AppError::Validation(format!("Invalid query parameters: {}", e)))
    }
}

/// Register `handler` for `path` with and without a trailing slash
fn route_both(
    router: Router<AppState>,
    path: &str,
    handler: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, handler.clone())
        .route(&format!("{}/", path), handler)
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    for (path, handler) in [
        // Books
        ("/books", get(books::list_books)),
        ("/books/recent", get(books::recent_books)),
        ("/books/stats", get(stats::get_stats)),
        ("/books/by-year", get(stats::books_by_year)),
        ("/books/:id", get(books::get_book)),
        // Authors
        ("/authors", get(authors::list_authors)),
        ("/authors/popular", get(authors::popular_authors)),
    ] {
        api = route_both(api, path, handler);
    }

    api.with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
