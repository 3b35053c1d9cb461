use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    auth::dto::MessageResponse,
    auth::extractors::CurrentUser,
    datasets::{dto::SaveRequest, repo, schema::DatasetKind},
    error::ApiError,
    state::AppState,
};

pub fn dataset_routes() -> Router<AppState> {
    Router::new().route("/:dataset", get(get_records).post(save_records))
}

fn resolve(slug: &str) -> Result<DatasetKind, ApiError> {
    DatasetKind::from_slug(slug)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown dataset: {slug}")))
}

#[instrument(skip(state))]
pub async fn get_records(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let kind = resolve(&slug)?;
    let records = repo::fetch_all(&state.db, kind)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch data", e))?;
    Ok(Json(records))
}

#[instrument(skip(state, claims, payload))]
pub async fn save_records(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(slug): Path<String>,
    Json(payload): Json<SaveRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let kind = resolve(&slug)?;
    repo::replace_all(&state.db, kind, &payload.records, claims.user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to save data", e))?;

    info!(
        dataset = kind.slug(),
        count = payload.records.len(),
        user_id = claims.user_id,
        "dataset replaced"
    );
    Ok(Json(MessageResponse::ok("Data saved successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn resolve_maps_known_slugs() {
        assert_eq!(resolve("epbg").unwrap(), DatasetKind::Epbg);
        assert_eq!(resolve("bill-tracker").unwrap(), DatasetKind::BillTracker);
        assert_eq!(
            resolve("contractor-list").unwrap(),
            DatasetKind::ContractorList
        );
    }

    #[test]
    fn resolve_rejects_unknown_slug_with_not_found() {
        let err = resolve("payroll").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
