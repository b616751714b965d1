use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::settings::{AppConfig, ServerSettings};
use crate::database::DbPool;
use crate::errors::ReviewError;
use crate::rating::EntityKind;
use crate::services::catalog::CatalogService;
use crate::services::recompute::RecomputeService;
use crate::services::reviews::ReviewService;

pub mod admin;
pub mod ratings;
pub mod reviews;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub reviews: ReviewService,
    pub recompute: RecomputeService,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self {
            reviews: ReviewService::new(config.rating.clone()),
            recompute: RecomputeService::new(config.rating.clone()),
            catalog: CatalogService::new(config.rating.clone()),
            pool,
            config,
        }
    }
}

fn parse_kind(kind: &str) -> Result<EntityKind, Response> {
    kind.parse()
        .map_err(|e: anyhow::Error| (StatusCode::NOT_FOUND, e.to_string()).into_response())
}

fn is_admin(headers: &HeaderMap, settings: &ServerSettings) -> bool {
    let Some(token) = settings.admin_token.as_deref() else {
        return false;
    };
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    auth_header == Some(format!("Bearer {}", token).as_str())
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let status = match self {
            ReviewError::RatingOutOfRange { .. } => StatusCode::BAD_REQUEST,
            ReviewError::EntityNotFound { .. } | ReviewError::ReviewNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ReviewError::AlreadyReviewed { .. } => StatusCode::CONFLICT,
            ReviewError::NotAuthor { .. } => StatusCode::FORBIDDEN,
        };

        (status, self.to_string()).into_response()
    }
}

/// Refused writes keep their own status; anything else is a 500.
fn error_response(error: anyhow::Error) -> Response {
    match error.downcast::<ReviewError>() {
        Ok(refused) => refused.into_response(),
        Err(error) => {
            log::error!("Request failed: {:#}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
        }
    }
}

fn connection_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{AdminRatingRequest, CreateEntityRequest, CreateReviewRequest, RecalculateParams};
    use crate::database::{self, entities};
    use axum::extract::{Path, Query, State};
    use axum::http::HeaderValue;
    use axum::Json;
    use std::sync::Arc;

    fn memory_state() -> Arc<AppState> {
        admin_state(None)
    }

    fn admin_state(admin_token: Option<&str>) -> Arc<AppState> {
        let pool = database::create_memory_pool().unwrap();
        let conn = database::get_connection(&pool).unwrap();
        database::setup::init_database(&conn).unwrap();
        drop(conn);

        let mut config = AppConfig::new();
        config.server.admin_token = admin_token.map(str::to_string);
        Arc::new(AppState::new(pool, config))
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());
        headers
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_admin_routes_manage_catalog_and_ratings() {
        let state = admin_state(Some("letmein"));
        let new_movie = || CreateEntityRequest {
            name: "Heat".to_string(),
            admin_rating: Some(8.0),
            rating: None,
        };

        let refused = admin::create_entity(
            State(state.clone()),
            bearer("guess"),
            Path("movies".to_string()),
            Json(new_movie()),
        )
        .await
        .into_response();
        assert_eq!(refused.status(), StatusCode::UNAUTHORIZED);

        let created = admin::create_entity(
            State(state.clone()),
            bearer("letmein"),
            Path("movies".to_string()),
            Json(new_movie()),
        )
        .await
        .into_response();
        assert_eq!(created.status(), StatusCode::CREATED);
        let movie = body_json(created).await;
        assert_eq!(movie["dynamicRating"], 8.0);
        let movie_id = movie["id"].as_i64().unwrap();

        let review = reviews::create_review(
            State(state.clone()),
            Path(("movies".to_string(), movie_id)),
            Json(CreateReviewRequest { user_id: 1, rating: 6.0, content: String::new() }),
        )
        .await
        .into_response();
        let review_id = body_json(review).await["review"]["id"].as_i64().unwrap();

        let rerated = admin::set_admin_rating(
            State(state.clone()),
            bearer("letmein"),
            Path(("movies".to_string(), movie_id)),
            Json(AdminRatingRequest { admin_rating: Some(10.0) }),
        )
        .await
        .into_response();
        assert_eq!(rerated.status(), StatusCode::OK);
        // 0.909 * 10 + 0.091 * 6 ≈ 9.64
        assert_eq!(body_json(rerated).await["dynamicRating"], 9.6);

        let recalculated = admin::admin_recalculate(
            State(state.clone()),
            bearer("letmein"),
            Query(RecalculateParams { kind: None }),
        )
        .await
        .into_response();
        assert_eq!(recalculated.status(), StatusCode::OK);
        let totals = body_json(recalculated).await;
        assert_eq!(totals["updatedCount"], 1);
        assert_eq!(totals["errorCount"], 0);
        assert_eq!(totals["reports"].as_array().unwrap().len(), 2);

        let moderated = admin::moderate_review(State(state.clone()), bearer("letmein"), Path(review_id))
            .await
            .into_response();
        assert_eq!(moderated.status(), StatusCode::OK);
        assert_eq!(body_json(moderated).await["userRatingCount"], 0);

        let deleted = admin::delete_entity(
            State(state.clone()),
            bearer("letmein"),
            Path(("movies".to_string(), movie_id)),
        )
        .await
        .into_response();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let gone = ratings::get_rating(State(state), Path(("movies".to_string(), movie_id)))
            .await
            .into_response();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_routes_closed_without_configured_token() {
        let state = memory_state();
        let response = admin::admin_recalculate(
            State(state),
            bearer("anything"),
            Query(RecalculateParams { kind: None }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_review_then_read_rating() {
        let state = memory_state();
        let movie_id = {
            let conn = database::get_connection(&state.pool).unwrap();
            entities::insert_entity(&conn, EntityKind::Movie, "Heat", Some(8.0), None)
                .unwrap()
                .id
        };

        let created = reviews::create_review(
            State(state.clone()),
            Path(("movies".to_string(), movie_id)),
            Json(CreateReviewRequest { user_id: 1, rating: 6.0, content: String::new() }),
        )
        .await
        .into_response();
        assert_eq!(created.status(), StatusCode::CREATED);

        let duplicate = reviews::create_review(
            State(state.clone()),
            Path(("movies".to_string(), movie_id)),
            Json(CreateReviewRequest { user_id: 1, rating: 9.0, content: String::new() }),
        )
        .await
        .into_response();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let listed = reviews::list_reviews(State(state.clone()), Path(("movies".to_string(), movie_id)))
            .await
            .into_response();
        assert_eq!(listed.status(), StatusCode::OK);
        assert_eq!(body_json(listed).await.as_array().unwrap().len(), 1);

        let rating = ratings::get_rating(State(state.clone()), Path(("movies".to_string(), movie_id)))
            .await
            .into_response();
        assert_eq!(rating.status(), StatusCode::OK);

        let missing = ratings::get_rating(State(state), Path(("people".to_string(), movie_id)))
            .await
            .into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_admin_check_requires_configured_token() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer letmein"));

        assert!(!is_admin(&headers, &ServerSettings { admin_token: None }));
        assert!(is_admin(&headers, &ServerSettings { admin_token: Some("letmein".to_string()) }));
        assert!(!is_admin(&headers, &ServerSettings { admin_token: Some("other".to_string()) }));
    }

    #[test]
    fn test_review_errors_map_to_client_statuses() {
        let cases = [
            (ReviewError::RatingOutOfRange { rating: 11.0, min: 1.0, max: 10.0 }, StatusCode::BAD_REQUEST),
            (ReviewError::ReviewNotFound(1), StatusCode::NOT_FOUND),
            (ReviewError::AlreadyReviewed { kind: EntityKind::Movie, id: 1, user_id: 1 }, StatusCode::CONFLICT),
            (ReviewError::NotAuthor { review_id: 1, user_id: 2 }, StatusCode::FORBIDDEN),
        ];

        for (error, status) in cases {
            assert_eq!(error_response(error.into()).status(), status);
        }
        assert_eq!(
            error_response(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unknown_kind_is_not_found() {
        let response = parse_kind("shows").unwrap_err();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(parse_kind("people").unwrap(), EntityKind::Person);
    }
}
