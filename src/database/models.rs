use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::rating::{EntityId, EntityKind, RatingValue};

/// A movie or person row with its rating bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatableEntity {
    pub kind: EntityKind,
    pub id: EntityId,
    pub name: String,
    pub admin_rating: Option<RatingValue>,
    /// Single baseline rating from before admin ratings were split out.
    pub legacy_rating: Option<RatingValue>,
    pub user_rating_average: Option<RatingValue>,
    pub user_rating_count: u32,
    pub dynamic_rating: Option<RatingValue>,
    pub last_rating_update: Option<NaiveDateTime>,
}

impl RatableEntity {
    /// Admin baseline used for rating: the explicit admin rating, falling back
    /// to the legacy rating column when it was never set.
    pub fn resolved_admin_rating(&self) -> Option<RatingValue> {
        self.admin_rating.or(self.legacy_rating)
    }
}

/// Identifier and display name, enough to drive a bulk run and report on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTarget {
    pub kind: EntityKind,
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub entity_kind: EntityKind,
    pub entity_id: EntityId,
    pub user_id: i64,
    pub rating: RatingValue,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ToSql for EntityKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EntityKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: anyhow::Error| FromSqlError::Other(e.into()))
    }
}
