use thiserror::Error;

use crate::rating::{EntityId, EntityKind, RatingValue};

/// Context line for failures while recomputing one entity
pub fn recompute_context(kind: EntityKind, id: EntityId) -> String {
    format!("Failed to recompute rating of {} {}", kind, id)
}

/// Context line for failures while writing a review
pub fn review_context(operation: &str, review_id: i64) -> String {
    format!("Failed to {} review {}", operation, review_id)
}

/// Line recorded in a bulk report when one entity could not be recomputed
pub fn bulk_failure_line(kind: EntityKind, id: EntityId, name: &str, error: &anyhow::Error) -> String {
    format!("{} {} ({}): {:#}", kind, id, name, error)
}

/// Reasons a review write is refused before anything is stored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    #[error("Rating {rating} is outside {min}..={max}")]
    RatingOutOfRange {
        rating: RatingValue,
        min: RatingValue,
        max: RatingValue,
    },

    #[error("{kind} {id} not found")]
    EntityNotFound { kind: EntityKind, id: EntityId },

    #[error("Review {0} not found")]
    ReviewNotFound(i64),

    #[error("User {user_id} already reviewed {kind} {id}")]
    AlreadyReviewed {
        kind: EntityKind,
        id: EntityId,
        user_id: i64,
    },

    #[error("User {user_id} is not the author of review {review_id}")]
    NotAuthor { review_id: i64, user_id: i64 },
}
