use axum::{
    extract::{Form, Query, State},
    routing::get,
    Json, Router,
};

use super::error::ApiError;
use crate::{
    controller::AppState,
    domain::{LoadParams, LoadReport},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/performHighServerLoad",
            get(perform_from_query).post(perform_from_form),
        )
        .with_state(state)
}

type Pairs = Vec<(String, String)>;

/// GET /api/performHighServerLoad?duration=&workers=&memMB=&io=
///
/// Blocks for the whole effective duration. Keys are read independently and
/// the first value wins; a query string that does not decode at all is
/// treated as empty rather than rejected.
pub async fn perform_from_query(
    State(st): State<AppState>,
    pairs: Option<Query<Pairs>>,
) -> Result<Json<LoadReport>, ApiError> {
    let params = pairs
        .map(|Query(pairs)| LoadParams::from_pairs(pairs))
        .unwrap_or_default();
    perform(&st, params).await
}

/// POST /api/performHighServerLoad with an urlencoded form body
pub async fn perform_from_form(
    State(st): State<AppState>,
    pairs: Option<Form<Pairs>>,
) -> Result<Json<LoadReport>, ApiError> {
    let params = pairs
        .map(|Form(pairs)| LoadParams::from_pairs(pairs))
        .unwrap_or_default();
    perform(&st, params).await
}

async fn perform(st: &AppState, params: LoadParams) -> Result<Json<LoadReport>, ApiError> {
    let report = st.controller.perform(&params).await?;
    Ok(Json(report))
}
