use std::path::Path;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tower_http::services::ServeDir;

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
///
/// `body_limit` caps the whole request body, photo included.
pub fn routes(report_service: Arc<ReportService>, body_limit: usize) -> Router {
    Router::new()
        .route("/api/reports", post(handlers::create_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(report_service)
}

/// Serve stored report images read-only under `public_route`
pub fn uploads_routes(public_route: &str, upload_dir: &Path) -> Router {
    Router::new().nest_service(public_route, ServeDir::new(upload_dir))
}
