use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::certification;
use crate::db::{self, NewOffice, OfficeUpdate};
use crate::state::AppState;

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Office not found." })),
    )
        .into_response()
}

fn server_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Database error." })),
    )
        .into_response()
}

pub async fn list_offices(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match db::list_offices(state.pool.as_ref()).await {
        Ok(offices) => Json(offices).into_response(),
        Err(e) => {
            tracing::error!("Failed to list offices: {}", e);
            server_error()
        }
    }
}

pub async fn get_office(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match db::get_office(state.pool.as_ref(), id).await {
        Ok(Some(office)) => Json(office).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            tracing::error!("Failed to fetch office {}: {}", id, e);
            server_error()
        }
    }
}

pub async fn create_office(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewOffice>,
) -> impl IntoResponse {
    let (percent, tier) = certification::evaluate(&payload.checklist, &state.tiers);

    match db::insert_office(state.pool.as_ref(), &payload, percent, tier).await {
        Ok(office) => (StatusCode::CREATED, Json(office)).into_response(),
        Err(e) => {
            tracing::error!("Failed to create office: {}", e);
            server_error()
        }
    }
}

pub async fn update_office(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<OfficeUpdate>,
) -> impl IntoResponse {
    let existing = match db::get_office(state.pool.as_ref(), id).await {
        Ok(Some(office)) => office,
        Ok(None) => return not_found(),
        Err(e) => {
            tracing::error!("Failed to fetch office {}: {}", id, e);
            return server_error();
        }
    };

    let draft = NewOffice {
        office_name: update.office_name.unwrap_or(existing.office_name),
        department: update.department.or(existing.department),
        contact_person: update.contact_person.or(existing.contact_person),
        contact_email: update.contact_email.or(existing.contact_email),
        total_employees: update.total_employees.or(existing.total_employees),
        checklist: update.checklist.unwrap_or(existing.checklist.0),
        certificate_date: update.certificate_date.or(existing.certificate_date),
        notes: update.notes.or(existing.notes),
    };

    // Score and tier are recomputed on every write, never patched in place.
    let (percent, tier) = certification::evaluate(&draft.checklist, &state.tiers);

    match db::update_office(state.pool.as_ref(), id, &draft, percent, tier).await {
        Ok(Some(office)) => Json(office).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            tracing::error!("Failed to update office {}: {}", id, e);
            server_error()
        }
    }
}

pub async fn delete_office(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match db::delete_office(state.pool.as_ref(), id).await {
        Ok(true) => Json(serde_json::json!({ "message": "Deleted" })).into_response(),
        Ok(false) => not_found(),
        Err(e) => {
            tracing::error!("Failed to delete office {}: {}", id, e);
            server_error()
        }
    }
}
