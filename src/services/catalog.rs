use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use rusqlite::Connection;

use super::recompute::RecomputeService;
use crate::config::settings::RatingSettings;
use crate::database::{entities, RatableEntity};
use crate::errors::ReviewError;
use crate::rating::{EntityId, EntityKind, RatingValue};

/// Adds and removes ratable records. New records get their rating fields
/// filled in straight away.
#[derive(Debug, Clone)]
pub struct CatalogService {
    recompute: RecomputeService,
}

impl CatalogService {
    pub fn new(settings: RatingSettings) -> Self {
        Self {
            recompute: RecomputeService::new(settings),
        }
    }

    pub fn create_entity(
        &self,
        conn: &mut Connection,
        kind: EntityKind,
        name: &str,
        admin_rating: Option<RatingValue>,
        legacy_rating: Option<RatingValue>,
    ) -> Result<RatableEntity> {
        let now = Utc::now().naive_utc();
        let tx = conn.transaction()?;

        let inserted = entities::insert_entity(&tx, kind, name, admin_rating, legacy_rating)?;
        self.recompute.recompute_entity(&tx, kind, inserted.id, now)?;
        let entity = entities::find_by_id(&tx, kind, inserted.id)?
            .ok_or(ReviewError::EntityNotFound { kind, id: inserted.id })?;
        tx.commit().context("Failed to commit new entity")?;

        info!("Created {} {} ({})", kind, entity.id, entity.name);
        Ok(entity)
    }

    /// Deletes the record and every review attached to it.
    pub fn delete_entity(&self, conn: &mut Connection, kind: EntityKind, id: EntityId) -> Result<()> {
        let tx = conn.transaction()?;
        if !entities::delete_entity(&tx, kind, id)? {
            return Err(ReviewError::EntityNotFound { kind, id }.into());
        }
        tx.commit().context("Failed to commit entity deletion")?;

        info!("Deleted {} {} with its reviews", kind, id);
        Ok(())
    }
}
