use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::employee::MoneyMap;

/// No transition guard between these states; the update endpoint applies
/// whatever the caller sets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum PayrollStatus {
    Draft,
    Processed,
    Paid,
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
}

/// One payslip per (employee, month, year): enforced by a unique key.
/// Compensation maps are frozen at calculation time so later employee edits
/// do not rewrite history.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payroll {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,

    pub basic_salary: f64,

    #[schema(value_type = Object)]
    pub allowances: Json<MoneyMap>,
    #[schema(value_type = Object)]
    pub deductions: Json<MoneyMap>,

    pub working_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,

    pub overtime_hours: f64,
    pub overtime_pay: f64,

    /// basic + Σallowances + overtime_pay
    pub gross_salary: f64,
    /// Σdeductions
    pub total_deductions: f64,
    /// gross - total_deductions, exactly
    pub net_salary: f64,

    #[schema(example = "Draft")]
    pub status: String,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub remarks: Option<String>,

    pub generated_by: Option<u64>,
}
