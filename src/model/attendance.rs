use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    #[serde(rename = "Half-day")]
    #[strum(serialize = "Half-day")]
    HalfDay,
    #[serde(rename = "On Leave")]
    #[strum(serialize = "On Leave")]
    OnLeave,
}

/// One row per (employee, date): enforced by a unique key in the store.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in_time: Option<NaiveDateTime>,
    pub check_in_location: Option<String>,
    pub check_in_notes: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out_time: Option<NaiveDateTime>,
    pub check_out_location: Option<String>,
    pub check_out_notes: Option<String>,

    #[schema(example = "Present")]
    pub status: String,

    /// (check_out - check_in) in hours, rounded to 2 decimals.
    pub work_hours: f64,
    pub is_late: bool,
    pub overtime_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for (status, s) in [
            (AttendanceStatus::Present, "Present"),
            (AttendanceStatus::HalfDay, "Half-day"),
            (AttendanceStatus::OnLeave, "On Leave"),
        ] {
            assert_eq!(status.to_string(), s);
            assert_eq!(s.parse::<AttendanceStatus>().unwrap(), status);
        }
        assert!("half-day".parse::<AttendanceStatus>().is_err());
    }
}
