use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{connection_error, error_response, parse_kind, AppState};
use crate::api::models::{CreateReviewRequest, DeleteReviewParams, EditReviewRequest};
use crate::database;
use crate::services::reviews::Actor;

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path((kind, entity_id)): Path<(String, i64)>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return connection_error(),
    };

    match database::entities::find_by_id(&conn, kind, entity_id) {
        Ok(Some(_)) => {}
        Ok(None) => return (StatusCode::NOT_FOUND, format!("{} {} not found", kind, entity_id)).into_response(),
        Err(e) => return error_response(e),
    }

    match database::reviews::list_by_entity(&conn, kind, entity_id) {
        Ok(reviews) => Json(reviews).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Path((kind, entity_id)): Path<(String, i64)>,
    Json(body): Json<CreateReviewRequest>,
) -> impl IntoResponse {
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
        .create_review(&mut conn, kind, entity_id, body.user_id, body.rating, &body.content)
    {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn edit_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<i64>,
    Json(body): Json<EditReviewRequest>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return connection_error(),
    };

    match state
        .reviews
        .edit_review(&mut conn, review_id, body.user_id, body.rating, &body.content)
    {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_own_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<i64>,
    Query(params): Query<DeleteReviewParams>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return connection_error(),
    };

    match state
        .reviews
        .delete_review(&mut conn, review_id, Actor::User(params.user_id))
    {
        Ok(update) => Json(update).into_response(),
        Err(e) => error_response(e),
    }
}
