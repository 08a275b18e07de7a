use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use spendwise_core::income::{
    Income, IncomeOrdering, IncomeQuery, IncomeType, IncomeTypeSummary, IncomeUpdate,
    MonthlyIncome, NewIncome,
};

use crate::{error::ApiResult, main_lib::AppState, owner::Owner};

const DEFAULT_PERIOD_MONTHS: u32 = 12;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct IncomeListQuery {
    income_type: Option<IncomeType>,
    recurring: Option<bool>,
    date: Option<NaiveDate>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    search: Option<String>,
    ordering: Option<String>,
}

impl IncomeListQuery {
    fn into_query(self) -> ApiResult<IncomeQuery> {
        let ordering = match self.ordering.as_deref() {
            Some(raw) if !raw.is_empty() => raw.parse::<IncomeOrdering>()?,
            _ => IncomeOrdering::default(),
        };
        Ok(IncomeQuery {
            income_type: self.income_type,
            recurring: self.recurring,
            date: self.date,
            date_from: self.date_from,
            date_to: self.date_to,
            search: self.search,
            ordering,
        })
    }
}

#[derive(Deserialize)]
struct AnalyticsQuery {
    period: Option<u32>,
}

#[derive(Deserialize)]
struct MonthlyQuery {
    months: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryQuery {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

async fn list_incomes(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Query(query): Query<IncomeListQuery>,
) -> ApiResult<Json<Vec<Income>>> {
    let query = query.into_query()?;
    let incomes = state.income_service.list_incomes(owner.as_str(), &query)?;
    Ok(Json(incomes))
}

async fn create_income(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(income): Json<NewIncome>,
) -> ApiResult<(StatusCode, Json<Income>)> {
    let created = state
        .income_service
        .create_income(owner.as_str(), income)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_income(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Income>> {
    let income = state.income_service.get_income(owner.as_str(), &id)?;
    Ok(Json(income))
}

async fn update_income(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(update): Json<IncomeUpdate>,
) -> ApiResult<Json<Income>> {
    let income = state
        .income_service
        .update_income(owner.as_str(), &id, update)
        .await?;
    Ok(Json(income))
}

async fn delete_income(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<StatusCode> {
    state
        .income_service
        .delete_income(owner.as_str(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Per-type totals over the last `period` months.
async fn income_analytics(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<Vec<IncomeTypeSummary>>> {
    let period = query.period.unwrap_or(DEFAULT_PERIOD_MONTHS);
    let summary = state.income_service.analytics(owner.as_str(), period)?;
    Ok(Json(summary))
}

async fn income_summary(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<Vec<IncomeTypeSummary>>> {
    let summary = state.income_service.summary_by_type(
        owner.as_str(),
        query.start_date,
        query.end_date,
    )?;
    Ok(Json(summary))
}

async fn monthly_summary(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<Json<Vec<MonthlyIncome>>> {
    let months = query.months.unwrap_or(DEFAULT_PERIOD_MONTHS);
    let summary = state
        .income_service
        .monthly_summary(owner.as_str(), months)?;
    Ok(Json(summary))
}

async fn recurring_incomes(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Vec<Income>>> {
    let incomes = state.income_service.recurring_incomes(owner.as_str())?;
    Ok(Json(incomes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/income", get(list_incomes).post(create_income))
        .route("/income/analytics", get(income_analytics))
        .route("/income/summary", get(income_summary))
        .route("/income/monthly-summary", get(monthly_summary))
        .route("/income/recurring", get(recurring_incomes))
        .route(
            "/income/{id}",
            get(get_income).put(update_income).delete(delete_income),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ordering_is_rejected() {
        let query = IncomeListQuery {
            ordering: Some("salary".to_string()),
            ..Default::default()
        };
        assert!(query.into_query().is_err());
    }

    #[test]
    fn empty_ordering_defaults_to_newest_first() {
        let query = IncomeListQuery {
            ordering: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.into_query().unwrap().ordering, IncomeOrdering::DateDesc);
    }
}
