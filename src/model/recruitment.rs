use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum JobStatus {
    Open,
    Closed,
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Applicant {
    pub name: String,
    #[schema(example = "jane@mail.com")]
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationNote {
    pub note: String,
    pub added_by: u64,
    #[schema(value_type = String, format = "date-time")]
    pub added_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Interview {
    pub id: String,
    #[schema(value_type = String, format = "date-time")]
    pub scheduled_at: NaiveDateTime,
    pub interviewer: Option<String>,
    pub mode: Option<String>,
    #[schema(example = "Scheduled")]
    pub status: String,
}

/// Applications live as a document on the posting row; the pipeline mutates
/// the list and writes the whole document back.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Application {
    pub id: String,
    pub applicant: Applicant,
    pub resume: Option<String>,
    pub cover_letter: Option<String>,
    #[schema(example = "New")]
    pub status: String,
    #[schema(value_type = String, format = "date-time")]
    pub applied_at: NaiveDateTime,
    #[serde(default)]
    pub notes: Vec<ApplicationNote>,
    #[serde(default)]
    pub interviews: Vec<Interview>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct JobPosting {
    pub id: u64,

    #[schema(example = "Senior Backend Engineer")]
    pub job_title: String,
    #[schema(example = "Engineering")]
    pub department: String,
    pub position: String,
    pub description: String,

    #[schema(value_type = Vec<String>)]
    pub requirements: Json<Vec<String>>,

    pub number_of_openings: u32,
    #[schema(example = "Full-time")]
    pub employment_type: String,
    pub location: String,

    pub posted_by: u64,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub posted_at: Option<DateTime<Utc>>,

    #[schema(example = "2026-03-31", value_type = String, format = "date")]
    pub application_deadline: NaiveDate,

    #[schema(example = "Open")]
    pub status: String,

    #[schema(value_type = Vec<Application>)]
    pub applications: Json<Vec<Application>>,

    pub hiring_manager_id: Option<u64>,
}
