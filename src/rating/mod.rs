pub mod average;
pub mod dynamic;
pub mod types;
pub mod weighting;

pub use average::summarize_reviews;
pub use dynamic::{applied_influence, compute_dynamic_rating, round_to_tenth};
pub use types::{EntityId, EntityKind, RatingBreakdown, RatingUpdate, RatingValue, ReviewSummary};
pub use weighting::admin_influence;
