use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use crate::api::handlers::{
    admin::{admin_recalculate, create_entity, delete_entity, moderate_review, set_admin_rating},
    ratings::get_rating,
    reviews::{create_review, delete_own_review, edit_review, list_reviews},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/:kind/:id/rating", get(get_rating))
        .route("/api/:kind/:id/reviews", get(list_reviews).post(create_review))
        .route("/api/reviews/:id", put(edit_review).delete(delete_own_review))
        .route("/api/admin/reviews/:id", delete(moderate_review))
        .route("/api/admin/:kind", post(create_entity))
        .route("/api/admin/:kind/:id", delete(delete_entity))
        .route("/api/admin/:kind/:id/admin-rating", put(set_admin_rating))
        .route("/api/admin/recalculate", post(admin_recalculate))
        .with_state(state)
}
