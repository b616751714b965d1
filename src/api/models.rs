use serde::{Deserialize, Serialize};

use crate::services::recompute::BulkRecalcReport;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_id: i64,
    pub rating: f64,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditReviewRequest {
    pub user_id: i64,
    pub rating: f64,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRatingRequest {
    /// `null` clears the admin rating.
    pub admin_rating: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityRequest {
    pub name: String,
    #[serde(default)]
    pub admin_rating: Option<f64>,
    /// Baseline carried over from the single-rating era.
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReviewParams {
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct RecalculateParams {
    pub kind: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateResponse {
    pub updated_count: usize,
    pub error_count: usize,
    pub reports: Vec<BulkRecalcReport>,
}

impl RecalculateResponse {
    pub fn from_reports(reports: Vec<BulkRecalcReport>) -> Self {
        Self {
            updated_count: reports.iter().map(|r| r.updated_count).sum(),
            error_count: reports.iter().map(|r| r.errors.len()).sum(),
            reports,
        }
    }
}
