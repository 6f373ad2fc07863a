use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::itinerary::{CreateItineraryRequest, Itinerary, UpdateItineraryRequest};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct GeneratedReport {
    pub filepath: String,
    pub filename: String,
}

#[derive(Serialize)]
pub struct GenerateReportResponse {
    pub message: String,
    pub data: GeneratedReport,
}

/// POST /api/v1/itineraries
pub async fn handle_create(
    State(state): State<AppState>,
    body: Result<Json<CreateItineraryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Itinerary>), AppError> {
    let Json(req) = body?;
    let itinerary = state.itineraries.create(req).await?;
    Ok((StatusCode::CREATED, Json(itinerary)))
}

/// GET /api/v1/itineraries
pub async fn handle_list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Itinerary>>, AppError> {
    let Query(params) = query?;
    let itineraries = state.itineraries.list(params.user_id.as_deref()).await?;
    Ok(Json(itineraries))
}

/// GET /api/v1/itineraries/:id
pub async fn handle_get(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Itinerary>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.itineraries.get(id).await?))
}

/// PUT /api/v1/itineraries/:id
pub async fn handle_update(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateItineraryRequest>, JsonRejection>,
) -> Result<Json<Itinerary>, AppError> {
    let Path(id) = id?;
    let Json(req) = body?;
    Ok(Json(state.itineraries.update(id, req).await?))
}

/// DELETE /api/v1/itineraries/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id?;
    state.itineraries.delete(id).await?;
    Ok(Json(json!({ "message": "Itinerary deleted successfully" })))
}

/// POST /api/v1/itineraries/:id/pdf
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<GenerateReportResponse>, AppError> {
    let Path(id) = id?;
    let path = state.itineraries.render_report(id).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(GenerateReportResponse {
        message: "PDF generated successfully".to_string(),
        data: GeneratedReport {
            filepath: path.display().to_string(),
            filename,
        },
    }))
}

/// GET /api/v1/itineraries/:id/pdf/download
///
/// Renders a fresh report and returns it as an attachment.
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let path = state.itineraries.render_report(id).await?;
    let body = tokio::fs::read(&path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read report {}: {e}", path.display()))?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("itinerary_{id}.pdf"));
    let disposition = format!("attachment; filename=\"{filename}\"");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(body),
    )
        .into_response())
}
