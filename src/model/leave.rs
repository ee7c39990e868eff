use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LeaveType {
    #[serde(rename = "Sick Leave")]
    #[strum(serialize = "Sick Leave")]
    Sick,
    #[serde(rename = "Casual Leave")]
    #[strum(serialize = "Casual Leave")]
    Casual,
    #[serde(rename = "Annual Leave")]
    #[strum(serialize = "Annual Leave")]
    Annual,
    #[serde(rename = "Maternity Leave")]
    #[strum(serialize = "Maternity Leave")]
    Maternity,
    #[serde(rename = "Paternity Leave")]
    #[strum(serialize = "Paternity Leave")]
    Paternity,
    #[serde(rename = "Unpaid Leave")]
    #[strum(serialize = "Unpaid Leave")]
    Unpaid,
}

/// Pending is the only state transitions are allowed from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Leave {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = "Sick Leave")]
    pub leave_type: String,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-01-03", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    /// Inclusive span: (end - start) in whole days + 1.
    #[schema(example = 3)]
    pub number_of_days: i32,

    pub reason: String,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub applied_at: Option<DateTime<Utc>>,

    pub decided_by: Option<u64>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub decided_at: Option<DateTime<Utc>>,

    pub rejection_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_type_strings_round_trip() {
        assert_eq!(LeaveType::Sick.to_string(), "Sick Leave");
        assert_eq!("Annual Leave".parse::<LeaveType>().unwrap(), LeaveType::Annual);
        assert_eq!(
            serde_json::to_string(&LeaveType::Maternity).unwrap(),
            "\"Maternity Leave\""
        );
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            LeaveStatus::Pending,
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<LeaveStatus>().unwrap(), status);
        }
    }
}
