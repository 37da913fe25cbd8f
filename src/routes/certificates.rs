use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::certification::CertificationTier;
use crate::db;
use crate::pdf::{CertificateData, CertificateError, RenderedCertificate};
use crate::state::AppState;

pub async fn check_eligibility(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let office = match db::get_office(state.pool.as_ref(), id).await {
        Ok(Some(office)) => office,
        Ok(None) => return certificate_error(&CertificateError::NotFound),
        Err(e) => {
            tracing::error!("Failed to fetch office {}: {}", id, e);
            return database_error();
        }
    };

    let percent = office.completion_percent.clamp(0, 100) as u8;
    Json(serde_json::json!({
        "eligible": state.eligibility.is_eligible(percent),
        "percent": percent,
        "required": state.eligibility.min_percent(),
        "message": state.eligibility.message(percent),
    }))
    .into_response()
}

pub async fn download_certificate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let office = match db::get_office(state.pool.as_ref(), id).await {
        Ok(Some(office)) => office,
        Ok(None) => return certificate_error(&CertificateError::NotFound),
        Err(e) => {
            tracing::error!("Failed to fetch office {}: {}", id, e);
            return database_error();
        }
    };

    let percent = office.completion_percent.clamp(0, 100) as u8;
    let data = CertificateData {
        office_name: office.office_name,
        department: office.department,
        tier: CertificationTier::from_label(&office.certification_tier),
        percent,
        issue_date: office.certificate_date,
    };

    match state.certificate.render(&data) {
        Ok(rendered) => axum::response::Response::builder()
            .header("Content-Type", RenderedCertificate::CONTENT_TYPE)
            .header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", rendered.filename),
            )
            .body(axum::body::Body::from(rendered.bytes))
            .unwrap()
            .into_response(),
        Err(e) => certificate_error(&e),
    }
}

fn database_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Database error." })),
    )
        .into_response()
}

fn certificate_error(error: &CertificateError) -> axum::response::Response {
    let (status, message) = match error {
        CertificateError::NotFound => (StatusCode::NOT_FOUND, error.to_string()),
        CertificateError::Ineligible(_) => (StatusCode::CONFLICT, error.to_string()),
        CertificateError::TemplateUnavailable(_) | CertificateError::Render(_) => {
            tracing::error!("Certificate rendering failed: {}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Certificate generation failed.".to_string(),
            )
        }
    };
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
