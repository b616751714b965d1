use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{error, info};
use rusqlite::Connection;
use serde::Serialize;

use crate::config::settings::RatingSettings;
use crate::database::{entities, reviews, EntityTarget};
use crate::errors::{bulk_failure_line, recompute_context, ReviewError};
use crate::rating::{self, EntityId, EntityKind, RatingBreakdown, RatingUpdate};

/// Recomputes and stores the derived rating fields of entities.
#[derive(Debug, Clone)]
pub struct RecomputeService {
    settings: RatingSettings,
}

/// Rating written for one entity during a bulk run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityOutcome {
    pub id: EntityId,
    pub name: String,
    pub rating: RatingUpdate,
}

/// Accumulated result of a bulk recalculation over one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRecalcReport {
    pub kind: EntityKind,
    pub results: Vec<EntityOutcome>,
    pub updated_count: usize,
    pub errors: Vec<String>,
}

impl BulkRecalcReport {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            results: Vec::new(),
            updated_count: 0,
            errors: Vec::new(),
        }
    }

    fn record_success(&mut self, target: &EntityTarget, rating: RatingUpdate) {
        self.results.push(EntityOutcome {
            id: target.id,
            name: target.name.clone(),
            rating,
        });
        self.updated_count += 1;
    }

    fn record_failure(&mut self, line: String) {
        self.errors.push(line);
    }
}

impl RecomputeService {
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }

    /// Re-reads the reviews of one entity and stores its fresh rating fields.
    pub fn recompute_entity(
        &self,
        conn: &Connection,
        kind: EntityKind,
        id: EntityId,
        now: NaiveDateTime,
    ) -> Result<RatingUpdate> {
        let entity = entities::find_by_id(conn, kind, id)
            .with_context(|| recompute_context(kind, id))?
            .ok_or(ReviewError::EntityNotFound { kind, id })?;

        let ratings = reviews::list_ratings_by_entity(conn, kind, id)
            .with_context(|| recompute_context(kind, id))?;
        let summary = rating::summarize_reviews(&ratings);
        let admin_rating = entity.resolved_admin_rating();

        let update = RatingUpdate {
            admin_rating,
            user_rating_average: summary.average,
            user_rating_count: summary.count,
            dynamic_rating: rating::compute_dynamic_rating(
                admin_rating,
                summary.average,
                summary.count,
                &self.settings,
            ),
            last_rating_update: now,
        };

        entities::save_rating_update(conn, kind, id, &update)
            .with_context(|| recompute_context(kind, id))?;
        Ok(update)
    }

    /// Recalculates every entity of `kind`, one after another.
    pub fn recalculate_kind(
        &self,
        conn: &Connection,
        kind: EntityKind,
        now: NaiveDateTime,
    ) -> Result<BulkRecalcReport> {
        let targets = entities::list_targets(conn, kind)?;
        info!("Recalculating ratings for {} {} records", targets.len(), kind);
        Ok(self.recalculate_targets(conn, kind, &targets, now))
    }

    /// Recalculates the given entities. A failing entity is logged and
    /// recorded in the report; the remaining ones are still processed.
    pub fn recalculate_targets(
        &self,
        conn: &Connection,
        kind: EntityKind,
        targets: &[EntityTarget],
        now: NaiveDateTime,
    ) -> BulkRecalcReport {
        let mut report = BulkRecalcReport::new(kind);

        for (idx, target) in targets.iter().enumerate() {
            match self.recompute_entity(conn, kind, target.id, now) {
                Ok(update) => report.record_success(target, update),
                Err(e) => {
                    error!("Error recalculating {} {} ({}): {:#}", kind, target.id, target.name, e);
                    report.record_failure(bulk_failure_line(kind, target.id, &target.name, &e));
                }
            }

            if self.should_log_progress(idx + 1, targets.len()) {
                info!("  Recalculated {}/{} {} records", idx + 1, targets.len(), kind);
            }
        }

        info!(
            "  → Updated {} {} ratings, {} errors",
            report.updated_count,
            kind,
            report.errors.len()
        );
        report
    }

    /// Movies first, then people.
    pub fn recalculate_all(&self, conn: &Connection, now: NaiveDateTime) -> Result<Vec<BulkRecalcReport>> {
        EntityKind::ALL
            .iter()
            .map(|kind| self.recalculate_kind(conn, *kind, now))
            .collect()
    }

    pub fn breakdown(
        &self,
        conn: &Connection,
        kind: EntityKind,
        id: EntityId,
    ) -> Result<Option<RatingBreakdown>> {
        let Some(entity) = entities::find_by_id(conn, kind, id)? else {
            return Ok(None);
        };

        let admin_rating = entity.resolved_admin_rating();
        Ok(Some(RatingBreakdown {
            entity_kind: kind,
            entity_id: entity.id,
            admin_influence: rating::applied_influence(
                admin_rating,
                entity.user_rating_average,
                entity.user_rating_count,
                &self.settings,
            ),
            name: entity.name,
            admin_rating,
            user_rating_average: entity.user_rating_average,
            user_rating_count: entity.user_rating_count,
            dynamic_rating: entity.dynamic_rating,
            last_rating_update: entity.last_rating_update,
        }))
    }

    fn should_log_progress(&self, done: usize, total: usize) -> bool {
        let every = self.settings.progress_every.max(1);
        done % every == 0 || done == total
    }
}
