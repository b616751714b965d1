use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use rusqlite::Connection;
use serde::Serialize;

use super::recompute::RecomputeService;
use crate::config::settings::RatingSettings;
use crate::database::{entities, reviews, Review};
use crate::errors::{review_context, ReviewError};
use crate::rating::{EntityId, EntityKind, RatingUpdate, RatingValue};

/// Who is asking for a review change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User(i64),
    Moderator,
}

/// A stored review together with the entity rating it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub review: Review,
    pub rating: RatingUpdate,
}

/// Review writes. Every write recomputes the owning entity in the same
/// transaction, so the stored rating always matches the stored reviews.
#[derive(Debug, Clone)]
pub struct ReviewService {
    settings: RatingSettings,
    recompute: RecomputeService,
}

impl ReviewService {
    pub fn new(settings: RatingSettings) -> Self {
        Self {
            recompute: RecomputeService::new(settings.clone()),
            settings,
        }
    }

    pub fn create_review(
        &self,
        conn: &mut Connection,
        kind: EntityKind,
        entity_id: EntityId,
        user_id: i64,
        rating: RatingValue,
        content: &str,
    ) -> Result<ReviewOutcome> {
        self.validate_rating(rating)?;
        let now = Utc::now().naive_utc();
        let tx = conn.transaction()?;

        if entities::find_by_id(&tx, kind, entity_id)?.is_none() {
            return Err(ReviewError::EntityNotFound { kind, id: entity_id }.into());
        }
        if reviews::find_by_user(&tx, kind, entity_id, user_id)?.is_some() {
            return Err(ReviewError::AlreadyReviewed { kind, id: entity_id, user_id }.into());
        }

        let review = reviews::insert_review(&tx, kind, entity_id, user_id, rating, content, now)?;
        let update = self.recompute.recompute_entity(&tx, kind, entity_id, now)?;
        tx.commit().context("Failed to commit new review")?;

        info!("User {} reviewed {} {} with {}", user_id, kind, entity_id, rating);
        Ok(ReviewOutcome { review, rating: update })
    }

    /// Authors may edit their own review; nobody else may.
    pub fn edit_review(
        &self,
        conn: &mut Connection,
        review_id: i64,
        user_id: i64,
        rating: RatingValue,
        content: &str,
    ) -> Result<ReviewOutcome> {
        self.validate_rating(rating)?;
        let now = Utc::now().naive_utc();
        let tx = conn.transaction()?;

        let existing = self.load_review(&tx, review_id)?;
        if existing.user_id != user_id {
            return Err(ReviewError::NotAuthor { review_id, user_id }.into());
        }

        let review = reviews::update_review(&tx, review_id, rating, content, now)
            .with_context(|| review_context("edit", review_id))?;
        let update = self
            .recompute
            .recompute_entity(&tx, review.entity_kind, review.entity_id, now)?;
        tx.commit().context("Failed to commit review edit")?;

        info!("Review {} edited, new rating {}", review_id, rating);
        Ok(ReviewOutcome { review, rating: update })
    }

    /// Authors may delete their own review; moderators may delete any.
    pub fn delete_review(&self, conn: &mut Connection, review_id: i64, actor: Actor) -> Result<RatingUpdate> {
        let now = Utc::now().naive_utc();
        let tx = conn.transaction()?;

        let existing = self.load_review(&tx, review_id)?;
        if let Actor::User(user_id) = actor {
            if user_id != existing.user_id {
                return Err(ReviewError::NotAuthor { review_id, user_id }.into());
            }
        }

        reviews::delete_review(&tx, review_id).with_context(|| review_context("delete", review_id))?;
        let update = self
            .recompute
            .recompute_entity(&tx, existing.entity_kind, existing.entity_id, now)?;
        tx.commit().context("Failed to commit review deletion")?;

        info!(
            "Review {} on {} {} deleted by {:?}",
            review_id, existing.entity_kind, existing.entity_id, actor
        );
        Ok(update)
    }

    /// Sets or clears the admin baseline and recomputes the entity.
    pub fn set_admin_rating(
        &self,
        conn: &mut Connection,
        kind: EntityKind,
        entity_id: EntityId,
        admin_rating: Option<RatingValue>,
    ) -> Result<RatingUpdate> {
        let now = Utc::now().naive_utc();
        let tx = conn.transaction()?;

        if !entities::set_admin_rating(&tx, kind, entity_id, admin_rating)? {
            return Err(ReviewError::EntityNotFound { kind, id: entity_id }.into());
        }
        let update = self.recompute.recompute_entity(&tx, kind, entity_id, now)?;
        tx.commit().context("Failed to commit admin rating")?;

        info!("Admin rating of {} {} set to {:?}", kind, entity_id, admin_rating);
        Ok(update)
    }

    fn load_review(&self, conn: &Connection, review_id: i64) -> Result<Review> {
        reviews::find_by_id(conn, review_id)?
            .ok_or_else(|| ReviewError::ReviewNotFound(review_id).into())
    }

    fn validate_rating(&self, rating: RatingValue) -> Result<()> {
        let min = self.settings.min_review_rating;
        let max = self.settings.max_review_rating;
        if rating.is_nan() || rating < min || rating > max {
            return Err(ReviewError::RatingOutOfRange { rating, min, max }.into());
        }
        Ok(())
    }
}
