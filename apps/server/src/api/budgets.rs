use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use spendwise_core::budgets::{
    BudgetCategory, BudgetStatus, BudgetUpdate, BudgetWithCategories, NewBudget,
    NewBudgetCategory,
};

use crate::{error::ApiResult, main_lib::AppState, owner::Owner};

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Vec<BudgetWithCategories>>> {
    let budgets = state.budget_service.list_budgets(owner.as_str())?;
    Ok(Json(budgets))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(budget): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<BudgetWithCategories>)> {
    let created = state
        .budget_service
        .create_budget(owner.as_str(), budget)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<BudgetWithCategories>> {
    let budget = state.budget_service.get_budget(owner.as_str(), &id)?;
    Ok(Json(budget))
}

async fn update_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(update): Json<BudgetUpdate>,
) -> ApiResult<Json<BudgetWithCategories>> {
    let budget = state
        .budget_service
        .update_budget(owner.as_str(), &id, update)
        .await?;
    Ok(Json(budget))
}

async fn delete_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<StatusCode> {
    state
        .budget_service
        .delete_budget(owner.as_str(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn budget_status(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<BudgetStatus>> {
    let status = state.budget_service.budget_status(owner.as_str(), &id)?;
    Ok(Json(status))
}

/// Creates (or returns) the next generation of the budget.
async fn rollover_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<(StatusCode, Json<BudgetWithCategories>)> {
    let next = state.budget_service.rollover(owner.as_str(), &id).await?;
    Ok((StatusCode::CREATED, Json(next)))
}

async fn list_categories(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Vec<BudgetCategory>>> {
    let categories = state.budget_service.list_categories(owner.as_str(), &id)?;
    Ok(Json(categories))
}

async fn add_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(category): Json<NewBudgetCategory>,
) -> ApiResult<(StatusCode, Json<BudgetCategory>)> {
    let created = state
        .budget_service
        .add_category(owner.as_str(), &id, category)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{id}/status", get(budget_status))
        .route("/budgets/{id}/rollover", post(rollover_budget))
        .route(
            "/budgets/{id}/categories",
            get(list_categories).post(add_category),
        )
}
