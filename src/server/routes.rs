use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::{error::AppError, state::AppState};
use crate::storage::{Entry, NewEntry};
use crate::tasks::AnnotatedEntry;

#[derive(Serialize)]
pub struct AddResponse {
    pub status: &'static str,
    pub added: String,
    pub entry: Entry,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
    pub deleted: bool,
}

/// Calendar date on the server's local clock
fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Today's practice set. Stays the same for the whole day.
pub async fn daily_tasks_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AnnotatedEntry>>, AppError> {
    let tasks = state.selector.get_tasks(today()).await?;
    Ok(Json(tasks.as_ref().clone()))
}

pub async fn list_entries_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let entries = state.db.list_all().await?;
    Ok(Json(entries))
}

pub async fn add_entry_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewEntry>,
) -> Result<Json<AddResponse>, AppError> {
    let entry = state.db.insert(&payload).await?;
    state.selector.invalidate().await;

    info!(id = entry.id, category = %entry.category, "Added dictionary entry");

    Ok(Json(AddResponse {
        status: "success",
        added: entry.source_text.clone(),
        entry,
    }))
}

/// Deleting an unknown id succeeds with `deleted: false` and keeps today's set.
pub async fn delete_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    let outcome = state.db.delete(id).await?;

    if outcome.removed() {
        state.selector.invalidate().await;
        info!(id, "Deleted dictionary entry");
    }

    Ok(Json(DeleteResponse {
        status: "success",
        deleted: outcome.removed(),
    }))
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
