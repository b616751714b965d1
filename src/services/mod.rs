pub mod catalog;
pub mod recalculation;
pub mod recompute;
pub mod reviews;
pub mod server;

pub use catalog::CatalogService;
pub use recompute::{BulkRecalcReport, EntityOutcome, RecomputeService};
pub use reviews::{Actor, ReviewOutcome, ReviewService};
