//! CRUD routes for campground tax rules.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::tax_rule::{CreateTaxRule, TaxRule, UpdateTaxRule};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{Deployment, error::ApiError};

/// POST /api/tax-rules
pub async fn create_tax_rule(
    State(deployment): State<Deployment>,
    axum::Json(payload): axum::Json<CreateTaxRule>,
) -> Result<ResponseJson<ApiResponse<TaxRule>>, ApiError> {
    let rule = TaxRule::create(&deployment.db().pool, &payload, Uuid::new_v4()).await?;
    tracing::info!(rule_id = %rule.id, campground_id = %rule.campground_id, "tax rule created");
    Ok(ResponseJson(ApiResponse::success(rule)))
}

/// GET /api/tax-rules/campground/{campground_id}
pub async fn list_tax_rules(
    State(deployment): State<Deployment>,
    Path(campground_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<TaxRule>>>, ApiError> {
    let rules = TaxRule::find_by_campground_id(&deployment.db().pool, campground_id).await?;
    Ok(ResponseJson(ApiResponse::success(rules)))
}

/// GET /api/tax-rules/{id}
pub async fn get_tax_rule(
    State(deployment): State<Deployment>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<TaxRule>>, ApiError> {
    let rule = TaxRule::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound("tax rule"))?;
    Ok(ResponseJson(ApiResponse::success(rule)))
}

/// PATCH /api/tax-rules/{id}
pub async fn update_tax_rule(
    State(deployment): State<Deployment>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateTaxRule>,
) -> Result<ResponseJson<ApiResponse<TaxRule>>, ApiError> {
    let rule = TaxRule::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("tax rule"))?;
    Ok(ResponseJson(ApiResponse::success(rule)))
}

/// DELETE /api/tax-rules/{id}
pub async fn delete_tax_rule(
    State(deployment): State<Deployment>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = TaxRule::delete(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("tax rule"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<Deployment> {
    Router::new().nest(
        "/tax-rules",
        Router::new()
            .route("/", post(create_tax_rule))
            .route("/campground/{campground_id}", get(list_tax_rules))
            .route(
                "/{id}",
                get(get_tax_rule).patch(update_tax_rule).delete(delete_tax_rule),
            ),
    )
}
