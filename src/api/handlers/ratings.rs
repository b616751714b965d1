use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{connection_error, error_response, parse_kind, AppState};

pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return connection_error(),
    };

    match state.recompute.breakdown(&conn, kind, id) {
        Ok(Some(breakdown)) => Json(breakdown).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, format!("{} {} not found", kind, id)).into_response(),
        Err(e) => error_response(e),
    }
}
