use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{EntityTarget, RatableEntity};
use crate::rating::{EntityId, EntityKind, RatingUpdate, RatingValue};

fn select_columns(kind: EntityKind) -> String {
    format!(
        "id, {}, admin_rating, rating, user_rating_average, user_rating_count, dynamic_rating, last_rating_update",
        kind.name_column()
    )
}

pub fn insert_entity(
    conn: &Connection,
    kind: EntityKind,
    name: &str,
    admin_rating: Option<RatingValue>,
    legacy_rating: Option<RatingValue>,
) -> Result<RatableEntity> {
    let sql = format!(
        "INSERT INTO {} ({}, admin_rating, rating) VALUES (?1, ?2, ?3) RETURNING {}",
        kind.table(),
        kind.name_column(),
        select_columns(kind)
    );

    conn.query_row(&sql, params![name, admin_rating, legacy_rating], |row| {
        parse_entity_row(kind, row)
    })
    .with_context(|| format!("Failed to insert {}", kind))
}

fn parse_entity_row(kind: EntityKind, row: &rusqlite::Row) -> rusqlite::Result<RatableEntity> {
    Ok(RatableEntity {
        kind,
        id: row.get(0)?,
        name: row.get(1)?,
        admin_rating: row.get(2)?,
        legacy_rating: row.get(3)?,
        user_rating_average: row.get(4)?,
        user_rating_count: row.get(5)?,
        dynamic_rating: row.get(6)?,
        last_rating_update: row.get(7)?,
    })
}

pub fn find_by_id(conn: &Connection, kind: EntityKind, id: EntityId) -> Result<Option<RatableEntity>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        select_columns(kind),
        kind.table()
    );

    conn.query_row(&sql, params![id], |row| parse_entity_row(kind, row))
        .optional()
        .with_context(|| format!("Failed to query {} by id", kind))
}

pub fn list_targets(conn: &Connection, kind: EntityKind) -> Result<Vec<EntityTarget>> {
    let sql = format!(
        "SELECT id, {} FROM {} ORDER BY id",
        kind.name_column(),
        kind.table()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(EntityTarget {
                kind,
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Removes the entity together with its reviews. Returns false if it did not exist.
pub fn delete_entity(conn: &Connection, kind: EntityKind, id: EntityId) -> Result<bool> {
    conn.execute(
        "DELETE FROM reviews WHERE entity_kind = ?1 AND entity_id = ?2",
        params![kind, id],
    )
    .with_context(|| format!("Failed to delete reviews of {} {}", kind, id))?;

    let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
    let deleted = conn
        .execute(&sql, params![id])
        .with_context(|| format!("Failed to delete {} {}", kind, id))?;

    Ok(deleted > 0)
}

/// Overwrites the admin baseline. Returns false if the entity does not exist.
pub fn set_admin_rating(
    conn: &Connection,
    kind: EntityKind,
    id: EntityId,
    admin_rating: Option<RatingValue>,
) -> Result<bool> {
    let sql = format!("UPDATE {} SET admin_rating = ?1 WHERE id = ?2", kind.table());
    let updated = conn
        .execute(&sql, params![admin_rating, id])
        .with_context(|| format!("Failed to set admin rating of {} {}", kind, id))?;

    Ok(updated > 0)
}

pub fn save_rating_update(
    conn: &Connection,
    kind: EntityKind,
    id: EntityId,
    update: &RatingUpdate,
) -> Result<()> {
    let sql = format!(
        "UPDATE {} SET admin_rating = ?1, user_rating_average = ?2, user_rating_count = ?3, dynamic_rating = ?4, last_rating_update = ?5 WHERE id = ?6",
        kind.table()
    );

    let updated = conn
        .execute(
            &sql,
            params![
                update.admin_rating,
                update.user_rating_average,
                update.user_rating_count,
                update.dynamic_rating,
                update.last_rating_update,
                id
            ],
        )
        .with_context(|| format!("Failed to save rating of {} {}", kind, id))?;

    if updated == 0 {
        anyhow::bail!("{} {} disappeared before its rating was saved", kind, id);
    }

    Ok(())
}
