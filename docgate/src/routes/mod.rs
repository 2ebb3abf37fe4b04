mod documents;
mod health;

use axum::{Router, middleware, routing::get};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::{auth::require_api_key, state::AppState};

/// Body of a successful single-document response.
#[derive(Debug, Serialize)]
struct Data<T> {
    data: T,
}

/// Body of a successful informational response.
#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

pub fn router(state: AppState) -> Router {
    let documents = Router::new()
        .route(
            "/documents/{collection}",
            get(documents::query).post(documents::create),
        )
        .route(
            "/documents/{collection}/{id}",
            get(documents::read)
                .put(documents::update)
                .delete(documents::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(documents)
        .fallback(health::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
