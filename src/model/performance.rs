use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum ReviewStatus {
    Draft,
    Submitted,
    #[serde(rename = "Under Review")]
    #[strum(serialize = "Under Review")]
    UnderReview,
    Completed,
    /// Terminal; only reachable by the evaluated employee's own action.
    Acknowledged,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Criterion {
    #[schema(example = "Communication")]
    pub name: String,
    #[schema(example = 4.0)]
    pub rating: f64,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Goal {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PerformanceReview {
    pub id: u64,
    pub employee_id: u64,
    pub reviewer_id: u64,

    #[schema(example = "2025-07-01", value_type = String, format = "date")]
    pub review_start_date: NaiveDate,
    #[schema(example = "2025-12-31", value_type = String, format = "date")]
    pub review_end_date: NaiveDate,

    #[schema(example = "Annual")]
    pub review_type: String,

    #[schema(value_type = Vec<Criterion>)]
    pub criteria: Json<Vec<Criterion>>,
    #[schema(value_type = Vec<Goal>)]
    pub goals: Json<Vec<Goal>>,

    /// Mean of criteria ratings, rounded to 1 decimal; absent until criteria
    /// are supplied.
    #[schema(example = 4.0)]
    pub overall_rating: Option<f64>,

    #[schema(value_type = Vec<String>)]
    pub strengths: Json<Vec<String>>,
    #[schema(value_type = Vec<String>)]
    pub areas_of_improvement: Json<Vec<String>>,

    pub reviewer_comments: Option<String>,
    pub employee_comments: Option<String>,

    #[schema(example = "Draft")]
    pub status: String,

    pub acknowledged: bool,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub acknowledged_at: Option<DateTime<Utc>>,
}
