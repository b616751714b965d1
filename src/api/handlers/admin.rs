use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;

use super::{connection_error, error_response, is_admin, parse_kind, AppState};
use crate::api::models::{AdminRatingRequest, CreateEntityRequest, RecalculateParams, RecalculateResponse};
use crate::database;
use crate::rating::EntityKind;
use crate::services::reviews::Actor;

pub async fn create_entity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(kind): Path<String>,
    Json(body): Json<CreateEntityRequest>,
) -> impl IntoResponse {
    if !is_admin(&headers, &state.config.server) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return connection_error(),
    };

    match state
        .catalog
        .create_entity(&mut conn, kind, &body.name, body.admin_rating, body.rating)
    {
        Ok(entity) => (StatusCode::CREATED, Json(entity)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_entity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, i64)>,
) -> impl IntoResponse {
    if !is_admin(&headers, &state.config.server) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return connection_error(),
    };

    match state.catalog.delete_entity(&mut conn, kind, id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn moderate_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(review_id): Path<i64>,
) -> impl IntoResponse {
    if !is_admin(&headers, &state.config.server) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return connection_error(),
    };

    match state.reviews.delete_review(&mut conn, review_id, Actor::Moderator) {
        Ok(update) => Json(update).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn set_admin_rating(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((kind, entity_id)): Path<(String, i64)>,
    Json(body): Json<AdminRatingRequest>,
) -> impl IntoResponse {
    if !is_admin(&headers, &state.config.server) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return connection_error(),
    };

    match state
        .reviews
        .set_admin_rating(&mut conn, kind, entity_id, body.admin_rating)
    {
        Ok(update) => Json(update).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn admin_recalculate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<RecalculateParams>,
) -> impl IntoResponse {
    if !is_admin(&headers, &state.config.server) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let kinds: Vec<EntityKind> = match params.kind.as_deref() {
        None | Some("all") => EntityKind::ALL.to_vec(),
        Some(kind) => match parse_kind(kind) {
            Ok(kind) => vec![kind],
            Err(response) => return response,
        },
    };

    log::info!("Admin triggered recalculation for {:?}", kinds);
    let job_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        let conn = database::get_connection(&job_state.pool)?;
        let now = Utc::now().naive_utc();
        kinds
            .into_iter()
            .map(|kind| job_state.recompute.recalculate_kind(&conn, kind, now))
            .collect::<anyhow::Result<Vec<_>>>()
    })
    .await;

    match result {
        Ok(Ok(reports)) => Json(RecalculateResponse::from_reports(reports)).into_response(),
        Ok(Err(e)) if e.is::<r2d2::Error>() => connection_error(),
        Ok(Err(e)) => error_response(e),
        Err(e) => {
            log::error!("Recalculation task panicked: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
