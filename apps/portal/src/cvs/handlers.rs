use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{BackendError, CvUpload, ProfileQuery, UploadResponse};
use crate::cvs::profile::{annotate_profile, ProfileView};
use crate::errors::AppError;
use crate::session::{Role, Session};
use crate::state::AppState;

const PROFILE_FAILED: &str = "No se pudo cargar el perfil";
const PRIMARY_FAILED: &str = "No se pudo marcar como principal";
const UPLOAD_FAILED: &str = "Error al subir el CV";
const PDF_REQUIRED: &str = "Seleccioná un archivo PDF";
const DOWNLOAD_REFUSED: &str = "No se pudo descargar el archivo";
const DOWNLOAD_FAILED: &str = "Error descargando archivo";
const DEFAULT_CATEGORY: &str = "it";
const DEFAULT_DOWNLOAD_NAME: &str = "cv.pdf";

#[derive(Debug, Deserialize)]
pub struct PrimaryQuery {
    /// Candidate whose profile is returned after the change.
    pub candidate: Option<String>,
    #[serde(flatten)]
    pub filters: ProfileQuery,
}

#[derive(Debug, Serialize)]
pub struct PrimaryResponse {
    pub cv_id: i64,
    pub profile: Option<ProfileView>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub filename: Option<String>,
}

async fn load_profile(
    state: &AppState,
    session: &Session,
    candidate_id: &str,
    query: &ProfileQuery,
) -> Result<ProfileView, AppError> {
    let data = state
        .backend
        .candidate_profile(&session.token, candidate_id, query)
        .await
        .map_err(AppError::upstream(PROFILE_FAILED))?;
    Ok(annotate_profile(data, query))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ProfileView>, AppError> {
    let session = state.session.current().await?;
    Ok(Json(load_profile(&state, &session, &candidate_id, &query).await?))
}

/// PATCH /api/v1/cvs/:id/primary
pub async fn handle_set_primary(
    State(state): State<AppState>,
    Path(cv_id): Path<i64>,
    Query(query): Query<PrimaryQuery>,
) -> Result<Json<PrimaryResponse>, AppError> {
    let session = state.session.current().await?;
    state
        .backend
        .set_primary(&session.token, cv_id)
        .await
        .map_err(AppError::upstream(PRIMARY_FAILED))?;
    info!("CV {cv_id} marked as primary");

    let profile = match query.candidate.as_deref().filter(|c| !c.is_empty()) {
        Some(candidate_id) => {
            Some(load_profile(&state, &session, candidate_id, &query.filters).await?)
        }
        None => None,
    };
    Ok(Json(PrimaryResponse { cv_id, profile }))
}

fn is_pdf(filename: &str, content_type: Option<&str>) -> bool {
    content_type == Some("application/pdf") || filename.to_lowercase().ends_with(".pdf")
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "on" | "yes")
}

/// Reads the upload form: a `cv` PDF file, an optional `category` and an optional
/// `setPrimary` flag.
async fn read_upload(mut multipart: Multipart) -> Result<CvUpload, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut category = DEFAULT_CATEGORY.to_string();
    let mut set_primary = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if !is_pdf(&filename, field.content_type()) {
                    return Err(AppError::Validation(PDF_REQUIRED.to_string()));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                file = Some((filename, bytes));
            }
            "category" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                if !value.trim().is_empty() {
                    category = value.trim().to_string();
                }
            }
            "setPrimary" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                set_primary = parse_flag(&value);
            }
            _ => {}
        }
    }

    match file {
        Some((filename, bytes)) if !bytes.is_empty() => Ok(CvUpload {
            filename,
            bytes,
            category,
            set_primary,
        }),
        _ => Err(AppError::Validation(PDF_REQUIRED.to_string())),
    }
}

/// POST /api/v1/cvs/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let session = state.session.require_role(&[Role::Candidate]).await?;
    let upload = read_upload(multipart).await?;
    let filename = upload.filename.clone();

    let response = state
        .backend
        .upload_cv(&session.token, upload)
        .await
        .map_err(AppError::upstream(UPLOAD_FAILED))?;
    info!("Uploaded CV {filename} as {:?}", response.cv_id);
    Ok(Json(response))
}

/// Keeps the suggested name safe to place inside a quoted header parameter.
fn attachment_name(requested: Option<&str>) -> String {
    let cleaned: String = requested
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\' && *c != '/')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_DOWNLOAD_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// GET /api/v1/cvs/:id/download
pub async fn handle_download(
    State(state): State<AppState>,
    Path(cv_id): Path<i64>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let session = state.session.current().await?;
    let download = state
        .backend
        .download_cv(&session.token, cv_id)
        .await
        .map_err(|e| match e {
            BackendError::Status { .. } => AppError::upstream(DOWNLOAD_REFUSED)(e),
            other => AppError::upstream(DOWNLOAD_FAILED)(other),
        })?;

    let content_type = download
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or(HeaderValue::from_static("application/pdf"));
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        attachment_name(query.filename.as_deref())
    ))
    .unwrap_or(HeaderValue::from_static("attachment; filename=\"cv.pdf\""));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}
