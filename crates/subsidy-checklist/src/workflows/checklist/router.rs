use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ReviewerUpdate};
use super::repository::{
    ApplicationDataSource, ChecklistRepository, DataSourceError, EligibilityCalculator,
    RepositoryError,
};
use super::service::{ChecklistService, ChecklistServiceError};
use super::synthesis::MergeMode;

/// Optional body of a regeneration request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegenerateRequest {
    #[serde(default)]
    pub purge_orphans: Option<bool>,
}

impl RegenerateRequest {
    fn merge_mode(&self) -> Option<MergeMode> {
        self.purge_orphans.map(|purge| {
            if purge {
                MergeMode::PurgeOrphans
            } else {
                MergeMode::Retain
            }
        })
    }
}

/// Router exposing checklist retrieval, regeneration and reviewer edits.
pub fn checklist_router<D, E, R>(service: Arc<ChecklistService<D, E, R>>) -> Router
where
    D: ApplicationDataSource + 'static,
    E: EligibilityCalculator + 'static,
    R: ChecklistRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications/:application_id/checklist",
            get(checklist_handler::<D, E, R>),
        )
        .route(
            "/api/v1/applications/:application_id/checklist/regenerate",
            post(regenerate_handler::<D, E, R>),
        )
        .route(
            "/api/v1/applications/:application_id/checklist/items/:item_id",
            patch(update_item_handler::<D, E, R>),
        )
        .with_state(service)
}

pub(crate) async fn checklist_handler<D, E, R>(
    State(service): State<Arc<ChecklistService<D, E, R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    D: ApplicationDataSource + 'static,
    E: EligibilityCalculator + 'static,
    R: ChecklistRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.open(&id).await {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn regenerate_handler<D, E, R>(
    State(service): State<Arc<ChecklistService<D, E, R>>>,
    Path(application_id): Path<String>,
    request: Option<axum::Json<RegenerateRequest>>,
) -> Response
where
    D: ApplicationDataSource + 'static,
    E: EligibilityCalculator + 'static,
    R: ChecklistRepository + 'static,
{
    let id = ApplicationId(application_id);
    let mode = request.and_then(|axum::Json(request)| request.merge_mode());
    match service.regenerate(&id, mode).await {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_item_handler<D, E, R>(
    State(service): State<Arc<ChecklistService<D, E, R>>>,
    Path((application_id, item_id)): Path<(String, String)>,
    axum::Json(update): axum::Json<ReviewerUpdate>,
) -> Response
where
    D: ApplicationDataSource + 'static,
    E: EligibilityCalculator + 'static,
    R: ChecklistRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.update_item(&id, &item_id, update).await {
        Ok(item) => (StatusCode::OK, axum::Json(item)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ChecklistServiceError) -> Response {
    let status = match &error {
        ChecklistServiceError::ApplicationUnavailable {
            source: DataSourceError::NotFound,
            ..
        } => StatusCode::NOT_FOUND,
        ChecklistServiceError::ApplicationUnavailable { .. } => StatusCode::BAD_GATEWAY,
        ChecklistServiceError::ItemNotFound(_)
        | ChecklistServiceError::Repository(RepositoryError::NotFound)
        | ChecklistServiceError::Repository(RepositoryError::ItemNotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        ChecklistServiceError::MissingReviewer | ChecklistServiceError::EmptyUpdate => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ChecklistServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    if status.is_server_error() {
        tracing::warn!(%error, status = status.as_u16(), "checklist request failed");
    }

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
