pub mod config;
pub mod error;
pub mod routes;

use axum::Router;
use db::DBService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct Deployment {
    db: DBService,
}

impl Deployment {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }
}

pub fn api_router(deployment: Deployment) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(routes::reports::router())
                .merge(routes::tax_rules::router()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(deployment)
}
