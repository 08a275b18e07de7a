use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use spendwise_core::budgets::{BudgetCategory, BudgetCategoryUpdate, CategoryStatus};

use crate::{error::ApiResult, main_lib::AppState, owner::Owner};

async fn get_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<BudgetCategory>> {
    let category = state.budget_service.get_category(owner.as_str(), &id)?;
    Ok(Json(category))
}

async fn update_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(update): Json<BudgetCategoryUpdate>,
) -> ApiResult<Json<BudgetCategory>> {
    let category = state
        .budget_service
        .update_category(owner.as_str(), &id, update)
        .await?;
    Ok(Json(category))
}

async fn delete_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<StatusCode> {
    state
        .budget_service
        .delete_category(owner.as_str(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn category_status(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<CategoryStatus>> {
    let status = state.budget_service.category_status(owner.as_str(), &id)?;
    Ok(Json(status))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/categories/{id}/status", get(category_status))
}
