//! Routes for the report catalog.

use axum::{
    Router,
    extract::{Path, Query},
    response::Json as ResponseJson,
    routing::get,
};
use services::services::{
    report_registry::{self, CatalogQuery},
    report_types::{ReportFilterSpec, ReportSource, ReportSpec},
};
use utils::response::ApiResponse;

use crate::{Deployment, error::ApiError};

/// GET /api/reports/catalog?category=&search=&include_heavy=
pub async fn list_catalog(
    Query(query): Query<CatalogQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<&'static ReportSpec>>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(report_registry::get_catalog(&query))))
}

/// GET /api/reports/catalog/{id}
pub async fn get_report_spec(
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<&'static ReportSpec>>, ApiError> {
    let spec = report_registry::get_report_spec(&id).ok_or(ApiError::NotFound("report template"))?;
    Ok(ResponseJson(ApiResponse::success(spec)))
}

/// GET /api/reports/sources/{source}/filters
///
/// Unknown sources reject at the path-extractor level; a known source with
/// no filters returns an empty list.
pub async fn list_source_filters(
    Path(source): Path<ReportSource>,
) -> Result<ResponseJson<ApiResponse<&'static [ReportFilterSpec]>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(
        report_registry::resolve_filters(source),
    )))
}

pub fn router() -> Router<Deployment> {
    Router::new().nest(
        "/reports",
        Router::new()
            .route("/catalog", get(list_catalog))
            .route("/catalog/{id}", get(get_report_spec))
            .route("/sources/{source}/filters", get(list_source_filters)),
    )
}
