//! Record HTTP Routes
//!
//! The REST surface over the phase hierarchy:
//!
//! - `GET    /records`            → full tree
//! - `GET    /records/search`     → filtered tree
//! - `POST   /records`            → add a phase or sub-phase
//! - `PUT    /records/:serial_no` → partial update at any depth
//! - `DELETE /records/:serial_no` → recursive delete at any depth

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::engine::{filter_records, FilterCriteria};
use crate::model::{Record, RecordPatch, SerialNo};
use crate::observability::Logger;
use crate::store::PhaseStore;

use super::errors::ApiError;

// ==================
// Shared State
// ==================

/// Record state shared across handlers.
pub struct RecordState {
    pub store: Arc<dyn PhaseStore>,
}

impl RecordState {
    pub fn new(store: Arc<dyn PhaseStore>) -> Self {
        Self { store }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPhaseRequest {
    /// When present, the new record becomes a sub-phase of the
    /// top-level phase with this serial number.
    #[serde(default)]
    pub parent_serial_no: Option<SerialNo>,
    pub new_phase: Record,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPhaseResponse {
    pub message: String,
    pub new_phase: Record,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhaseResponse {
    pub message: String,
    pub updated_data: RecordPatch,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================
// Record Routes
// ==================

/// Create the record routes.
pub fn record_routes(state: Arc<RecordState>) -> Router {
    Router::new()
        .route("/records", get(list_records_handler))
        .route("/records", post(add_phase_handler))
        .route("/records/search", get(search_records_handler))
        .route("/records/:serial_no", put(update_phase_handler))
        .route("/records/:serial_no", delete(delete_phase_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_records_handler(
    State(state): State<Arc<RecordState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .store
        .fetch_all()
        .map_err(|e| ApiError::from_store("fetch records", e))?;
    Ok(Json(records))
}

async fn search_records_handler(
    State(state): State<Arc<RecordState>>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .store
        .fetch_all()
        .map_err(|e| ApiError::from_store("search records", e))?;
    Ok(Json(filter_records(&records, &criteria)))
}

async fn add_phase_handler(
    State(state): State<Arc<RecordState>>,
    Json(request): Json<AddPhaseRequest>,
) -> Result<(StatusCode, Json<AddPhaseResponse>), ApiError> {
    let inserted = state
        .store
        .insert(request.parent_serial_no.as_ref(), request.new_phase)
        .map_err(|e| ApiError::from_store("add phase", e))?;

    Ok((
        StatusCode::CREATED,
        Json(AddPhaseResponse {
            message: "Phase added successfully".to_string(),
            new_phase: inserted,
        }),
    ))
}

async fn update_phase_handler(
    State(state): State<Arc<RecordState>>,
    Path(serial_no): Path<String>,
    Json(patch): Json<RecordPatch>,
) -> Result<Json<UpdatePhaseResponse>, ApiError> {
    let affected = state
        .store
        .update(&serial_no, &patch)
        .map_err(|e| ApiError::from_store("update phase", e))?;

    // Zero matches is still a success.
    if affected == 0 {
        Logger::warn("UPDATE_NO_MATCH", &[("serial_no", &serial_no)]);
    }

    Ok(Json(UpdatePhaseResponse {
        message: "Phase updated successfully".to_string(),
        updated_data: patch,
    }))
}

async fn delete_phase_handler(
    State(state): State<Arc<RecordState>>,
    Path(serial_no): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let affected = state
        .store
        .delete(&serial_no)
        .map_err(|e| ApiError::from_store("delete phase", e))?;

    if affected == 0 {
        Logger::warn("DELETE_NO_MATCH", &[("serial_no", &serial_no)]);
    }

    Ok(Json(MessageResponse {
        message: "Phase deleted successfully".to_string(),
    }))
}
