use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use spendwise_core::notifications::BudgetNotification;

use crate::{error::ApiResult, main_lib::AppState, owner::Owner};

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    unread: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkAllReadResponse {
    updated: usize,
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<BudgetNotification>>> {
    let notifications = state
        .notification_service
        .list_notifications(owner.as_str(), query.unread)?;
    Ok(Json(notifications))
}

async fn mark_read(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<StatusCode> {
    state
        .notification_service
        .mark_read(owner.as_str(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_unread(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<StatusCode> {
    state
        .notification_service
        .mark_unread(owner.as_str(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let updated = state
        .notification_service
        .mark_all_read(owner.as_str())
        .await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/{id}/read", post(mark_read))
        .route("/notifications/{id}/unread", post(mark_unread))
}
