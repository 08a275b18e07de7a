use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use spendwise_core::expenses::{Expense, ExpenseFilter, ExpenseUpdate, NewExpense};

use crate::{error::ApiResult, main_lib::AppState, owner::Owner};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseListQuery {
    filter: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

async fn list_expenses(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Query(query): Query<ExpenseListQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    let filter =
        ExpenseFilter::from_query(query.filter.as_deref(), query.start_date, query.end_date)?;
    let expenses = state
        .expense_service
        .list_expenses(owner.as_str(), filter)?;
    Ok(Json(expenses))
}

async fn create_expense(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(expense): Json<NewExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let created = state
        .expense_service
        .create_expense(owner.as_str(), expense)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Expense>> {
    let expense = state.expense_service.get_expense(owner.as_str(), &id)?;
    Ok(Json(expense))
}

async fn update_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(update): Json<ExpenseUpdate>,
) -> ApiResult<Json<Expense>> {
    let expense = state
        .expense_service
        .update_expense(owner.as_str(), &id, update)
        .await?;
    Ok(Json(expense))
}

async fn delete_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<StatusCode> {
    state
        .expense_service
        .delete_expense(owner.as_str(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}
