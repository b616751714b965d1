use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Review;
use crate::rating::{EntityId, EntityKind, RatingValue};

const REVIEW_COLUMNS: &str =
    "id, entity_kind, entity_id, user_id, rating, content, created_at, updated_at";

pub fn insert_review(
    conn: &Connection,
    kind: EntityKind,
    entity_id: EntityId,
    user_id: i64,
    rating: RatingValue,
    content: &str,
    created_at: NaiveDateTime,
) -> Result<Review> {
    let sql = format!(
        "INSERT INTO reviews (entity_kind, entity_id, user_id, rating, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING {}",
        REVIEW_COLUMNS
    );

    conn.query_row(
        &sql,
        params![kind, entity_id, user_id, rating, content, created_at],
        parse_review_row,
    )
    .context("Failed to insert review")
}

fn parse_review_row(row: &rusqlite::Row) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        entity_kind: row.get(1)?,
        entity_id: row.get(2)?,
        user_id: row.get(3)?,
        rating: row.get(4)?,
        content: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Review>> {
    let sql = format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLUMNS);

    conn.query_row(&sql, params![id], parse_review_row)
        .optional()
        .context("Failed to query review by id")
}

pub fn find_by_user(
    conn: &Connection,
    kind: EntityKind,
    entity_id: EntityId,
    user_id: i64,
) -> Result<Option<Review>> {
    let sql = format!(
        "SELECT {} FROM reviews WHERE entity_kind = ?1 AND entity_id = ?2 AND user_id = ?3",
        REVIEW_COLUMNS
    );

    conn.query_row(&sql, params![kind, entity_id, user_id], parse_review_row)
        .optional()
        .context("Failed to query review by user")
}

pub fn update_review(
    conn: &Connection,
    id: i64,
    rating: RatingValue,
    content: &str,
    updated_at: NaiveDateTime,
) -> Result<Review> {
    let sql = format!(
        "UPDATE reviews SET rating = ?1, content = ?2, updated_at = ?3 WHERE id = ?4 RETURNING {}",
        REVIEW_COLUMNS
    );

    conn.query_row(&sql, params![rating, content, updated_at, id], parse_review_row)
        .with_context(|| format!("Failed to update review {}", id))
}

pub fn delete_review(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM reviews WHERE id = ?1", params![id])
        .with_context(|| format!("Failed to delete review {}", id))?;

    Ok(deleted > 0)
}

pub fn list_by_entity(conn: &Connection, kind: EntityKind, entity_id: EntityId) -> Result<Vec<Review>> {
    let sql = format!(
        "SELECT {} FROM reviews WHERE entity_kind = ?1 AND entity_id = ?2 ORDER BY created_at DESC",
        REVIEW_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![kind, entity_id], parse_review_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Only the scores, which is all the rating aggregation needs.
pub fn list_ratings_by_entity(
    conn: &Connection,
    kind: EntityKind,
    entity_id: EntityId,
) -> Result<Vec<RatingValue>> {
    let mut stmt =
        conn.prepare("SELECT rating FROM reviews WHERE entity_kind = ?1 AND entity_id = ?2")?;
    let rows = stmt
        .query_map(params![kind, entity_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to load review ratings of {} {}", kind, entity_id))?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{entities, setup::init_database};
    use chrono::Utc;

    fn setup() -> (Connection, EntityId) {
        let conn = Connection::open_in_memory().unwrap();
        init_database(&conn).unwrap();
        let movie = entities::insert_entity(&conn, EntityKind::Movie, "Arrival", None, None).unwrap();
        (conn, movie.id)
    }

    #[test]
    fn test_insert_update_and_list() {
        let (conn, movie_id) = setup();
        let now = Utc::now().naive_utc();

        let review = insert_review(&conn, EntityKind::Movie, movie_id, 1, 7.0, "good", now).unwrap();
        insert_review(&conn, EntityKind::Movie, movie_id, 2, 9.0, "great", now).unwrap();

        let updated = update_review(&conn, review.id, 8.0, "better on rewatch", now).unwrap();
        assert_eq!(updated.rating, 8.0);
        assert_eq!(updated.content, "better on rewatch");

        let mut ratings = list_ratings_by_entity(&conn, EntityKind::Movie, movie_id).unwrap();
        ratings.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(ratings, vec![8.0, 9.0]);
        assert_eq!(list_by_entity(&conn, EntityKind::Movie, movie_id).unwrap().len(), 2);
    }

    #[test]
    fn test_one_review_per_user_and_entity() {
        let (conn, movie_id) = setup();
        let now = Utc::now().naive_utc();

        insert_review(&conn, EntityKind::Movie, movie_id, 1, 7.0, "", now).unwrap();
        assert!(insert_review(&conn, EntityKind::Movie, movie_id, 1, 3.0, "", now).is_err());
        // same id under another kind is a different entity
        assert!(insert_review(&conn, EntityKind::Person, movie_id, 1, 3.0, "", now).is_ok());
    }

    #[test]
    fn test_find_by_user_and_delete() {
        let (conn, movie_id) = setup();
        let now = Utc::now().naive_utc();
        let review = insert_review(&conn, EntityKind::Movie, movie_id, 5, 6.0, "", now).unwrap();

        let found = find_by_user(&conn, EntityKind::Movie, movie_id, 5).unwrap().unwrap();
        assert_eq!(found.id, review.id);
        assert_eq!(found.entity_kind, EntityKind::Movie);

        assert!(delete_review(&conn, review.id).unwrap());
        assert!(!delete_review(&conn, review.id).unwrap());
        assert!(find_by_id(&conn, review.id).unwrap().is_none());
    }
}
