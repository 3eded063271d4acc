use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::ranking::analytics::{aggregate, AggregateStats};
use crate::ranking::classifier::{visible_skill_tags, SkillTags, VISIBLE_SKILL_TAGS};
use crate::ranking::export::{export, save_report, share_summary, Report, ReportFormat};
use crate::ranking::filters::{FilterQuery, ParsedFilters};
use crate::ranking::presets::{find_preset, suggest, SearchPreset, SuggestionKind, SEARCH_PRESETS};
use crate::ranking::sorter::{SortDirection, SortKey, SortSpec};
use crate::ranking::workspace::{ResultsView, Snapshot};
use crate::session::{Role, Session};
use crate::state::AppState;

const RANKING_FAILED: &str = "Error generando ranking";
const COUNT_FAILED: &str = "No se pudo obtener el total de CVs";
pub const NO_RESULTS: &str = "No se encontraron candidatos con los filtros actuales. \
     Probá quitar alguna skill requerida o bajar el mínimo de experiencia.";
const NO_SEARCH_YET: &str = "Todavía no se ejecutó ninguna búsqueda";

/// Matched count against the number of tokens the recruiter asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchIndicator {
    pub matched: u32,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateCard {
    /// 1-based position in the sorted set.
    pub position: usize,
    #[serde(flatten)]
    pub candidate: Candidate,
    pub skill_tags: SkillTags,
    pub required: MatchIndicator,
    pub preferred: MatchIndicator,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsResponse {
    pub search_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub count: usize,
    pub view: ResultsView,
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub candidates: Vec<CandidateCard>,
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    pub stats: Option<AggregateStats>,
    pub message: Option<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub sort: Option<SortKey>,
    pub dir: Option<SortDirection>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub kind: SuggestionKind,
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SavedReport {
    pub filename: String,
    pub path: String,
    pub bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct CvCountResponse {
    pub count: u64,
}

fn card(position: usize, candidate: Candidate, filters: &ParsedFilters) -> CandidateCard {
    CandidateCard {
        position,
        skill_tags: visible_skill_tags(&candidate.skills, filters, VISIBLE_SKILL_TAGS),
        required: MatchIndicator {
            matched: candidate.reasons.required_matches,
            total: filters.required_total,
        },
        preferred: MatchIndicator {
            matched: candidate.reasons.preferred_matches,
            total: filters.preferred_total,
        },
        candidate,
    }
}

/// Renders the visible page of a snapshot.
pub fn results_response(snapshot: &Snapshot) -> ResultsResponse {
    let filters = snapshot.results.query.parse();
    let page = snapshot.page();
    let offset = (page.page_number - 1) * page.page_size;

    ResultsResponse {
        search_id: snapshot.results.search_id,
        received_at: snapshot.results.received_at,
        count: snapshot.results.count,
        view: snapshot.view,
        page_number: page.page_number,
        page_size: page.page_size,
        total_pages: page.total_pages,
        candidates: page
            .items
            .into_iter()
            .enumerate()
            .map(|(i, c)| card(offset + i + 1, c, &filters))
            .collect(),
        message: (snapshot.results.count == 0).then_some(NO_RESULTS),
    }
}

async fn recruiter(state: &AppState) -> Result<Session, AppError> {
    state.session.require_role(&[Role::Recruiter]).await
}

async fn current_snapshot(state: &AppState) -> Result<Snapshot, AppError> {
    state
        .workspace
        .snapshot()
        .await
        .ok_or_else(|| AppError::NotFound(NO_SEARCH_YET.to_string()))
}

/// POST /api/v1/ranking
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(query): Json<FilterQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let session = recruiter(&state).await?;
    let ticket = state.workspace.issue_ticket();
    let request = query.to_request();
    info!(
        "Ranking with {} required, {} preferred skills, min experience {}",
        request.required_skills.len(),
        request.preferred_skills.len(),
        request.min_experience
    );

    let response = state
        .backend
        .rank(&session.token, &request)
        .await
        .map_err(AppError::upstream(RANKING_FAILED))?;

    if state.workspace.store(ticket, query, response).await.is_none() {
        warn!("Ranking response superseded by a later search");
    }
    let snapshot = current_snapshot(&state).await?;
    Ok(Json(results_response(&snapshot)))
}

/// GET /api/v1/ranking/results
pub async fn handle_results(
    State(state): State<AppState>,
    Query(params): Query<ViewQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    recruiter(&state).await?;
    let snapshot = state
        .workspace
        .update_view(|view, total| {
            if let Some(size) = params.page_size {
                view.set_page_size(size)?;
            }
            if params.sort.is_some() || params.dir.is_some() {
                view.set_sort(SortSpec {
                    key: params.sort.unwrap_or(view.sort.key),
                    direction: params.dir.unwrap_or(view.sort.direction),
                });
            }
            if let Some(page) = params.page {
                view.set_page(page, total);
            }
            Ok(())
        })
        .await
        .map_err(AppError::Validation)?
        .ok_or_else(|| AppError::NotFound(NO_SEARCH_YET.to_string()))?;
    Ok(Json(results_response(&snapshot)))
}

/// GET /api/v1/ranking/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    recruiter(&state).await?;
    let response = match state.workspace.snapshot().await {
        Some(snapshot) if !snapshot.results.is_empty() => AnalyticsResponse {
            stats: Some(aggregate(&snapshot.sorted)),
            message: None,
        },
        _ => AnalyticsResponse {
            stats: None,
            message: Some(NO_RESULTS),
        },
    };
    Ok(Json(response))
}

/// The stored result set, provided it has candidates to report on.
async fn reportable_snapshot(state: &AppState) -> Result<Snapshot, AppError> {
    let snapshot = current_snapshot(state).await?;
    if snapshot.results.is_empty() {
        return Err(AppError::NotFound(NO_RESULTS.to_string()));
    }
    Ok(snapshot)
}

async fn build_report(state: &AppState, format: ReportFormat) -> Result<Report, AppError> {
    recruiter(state).await?;
    let snapshot = reportable_snapshot(state).await?;
    Ok(export(
        format,
        &snapshot.sorted,
        &snapshot.results.query,
        Utc::now(),
    )?)
}

fn attachment(report: Report) -> Response {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        report.filename
    ))
    .unwrap_or(HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(report.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.body,
    )
        .into_response()
}

/// GET /api/v1/ranking/export.csv
pub async fn handle_export_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let report = build_report(&state, ReportFormat::Csv).await?;
    info!("Exported {} ({} bytes)", report.filename, report.body.len());
    Ok(attachment(report))
}

/// GET /api/v1/ranking/export.pdf
///
/// Answers "coming soon" whether or not a search has run.
pub async fn handle_export_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    recruiter(&state).await?;
    let (candidates, query) = state
        .workspace
        .snapshot()
        .await
        .map(|s| (s.sorted, s.results.query))
        .unwrap_or_default();
    let report = export(ReportFormat::Pdf, &candidates, &query, Utc::now())?;
    Ok(attachment(report))
}

/// POST /api/v1/ranking/export/save
pub async fn handle_export_save(
    State(state): State<AppState>,
) -> Result<Json<SavedReport>, AppError> {
    recruiter(&state).await?;
    let dir = state
        .config
        .export_dir
        .clone()
        .ok_or(AppError::NotImplemented("EXPORT_DIR is not configured"))?;
    let report = build_report(&state, ReportFormat::Csv).await?;

    let bytes = report.body.len();
    let filename = report.filename.clone();
    let path = tokio::task::spawn_blocking(move || save_report(&dir, &report))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok(Json(SavedReport {
        filename,
        path: path.display().to_string(),
        bytes,
    }))
}

/// GET /api/v1/ranking/share
pub async fn handle_share(State(state): State<AppState>) -> Result<String, AppError> {
    recruiter(&state).await?;
    let snapshot = reportable_snapshot(&state).await?;
    Ok(share_summary(&snapshot.sorted, &snapshot.results.query))
}

/// GET /api/v1/ranking/presets
pub async fn handle_presets() -> Json<&'static [SearchPreset]> {
    Json(SEARCH_PRESETS.as_slice())
}

/// GET /api/v1/ranking/presets/:name
///
/// The form fields a preset fills in, ready to post to `/api/v1/ranking`.
pub async fn handle_preset(Path(name): Path<String>) -> Result<Json<FilterQuery>, AppError> {
    find_preset(&name)
        .map(|preset| Json(preset.to_query()))
        .ok_or_else(|| AppError::NotFound(format!("Preset '{name}' not found")))
}

/// GET /api/v1/suggestions
pub async fn handle_suggestions(Query(params): Query<SuggestionQuery>) -> Json<Vec<&'static str>> {
    Json(suggest(params.kind, &params.q))
}

/// GET /api/v1/cvs/count
pub async fn handle_cv_count(
    State(state): State<AppState>,
) -> Result<Json<CvCountResponse>, AppError> {
    let session = recruiter(&state).await?;
    let count = state
        .backend
        .cv_count(&session.token)
        .await
        .map_err(AppError::upstream(COUNT_FAILED))?;
    Ok(Json(CvCountResponse { count }))
}
