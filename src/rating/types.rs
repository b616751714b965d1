use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type EntityId = i64;
pub type RatingValue = f64;

/// The two kinds of record that carry a dynamic rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Movie,
    Person,
}

impl EntityKind {
    /// Bulk recalculation order: movies first, then people.
    pub const ALL: [EntityKind; 2] = [EntityKind::Movie, EntityKind::Person];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movie",
            EntityKind::Person => "person",
        }
    }

    /// Table holding records of this kind. Also used as the URL segment.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movies",
            EntityKind::Person => "people",
        }
    }

    /// Column holding the display name of the record.
    pub fn name_column(&self) -> &'static str {
        match self {
            EntityKind::Movie => "title",
            EntityKind::Person => "name",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(EntityKind::Movie),
            "person" | "people" => Ok(EntityKind::Person),
            other => anyhow::bail!("Unknown entity kind: {}", other),
        }
    }
}

/// Count and rounded mean of the review scores of one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSummary {
    pub count: u32,
    pub average: Option<RatingValue>,
}

/// Derived rating fields written back onto an entity after a recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdate {
    pub admin_rating: Option<RatingValue>,
    pub user_rating_average: Option<RatingValue>,
    pub user_rating_count: u32,
    pub dynamic_rating: Option<RatingValue>,
    pub last_rating_update: NaiveDateTime,
}

/// Display/diagnostic view of how an entity's dynamic rating was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBreakdown {
    pub entity_kind: EntityKind,
    pub entity_id: EntityId,
    pub name: String,
    pub admin_rating: Option<RatingValue>,
    pub user_rating_average: Option<RatingValue>,
    pub user_rating_count: u32,
    /// `None` when one side was absent and no blending happened.
    pub admin_influence: Option<f64>,
    pub dynamic_rating: Option<RatingValue>,
    pub last_rating_update: Option<NaiveDateTime>,
}
