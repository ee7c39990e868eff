use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Named salary components, e.g. `{"hra": 500.0, "transport": 200.0}`.
pub type MoneyMap = BTreeMap<String, f64>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum EmployeeStatus {
    Active,
    Inactive,
    #[serde(rename = "On Leave")]
    #[strum(serialize = "On Leave")]
    OnLeave,
    Terminated,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@company.com",
        "phone": "+8801712345678",
        "department": "Engineering",
        "position": "Backend Engineer",
        "joining_date": "2024-01-01",
        "employment_type": "Full-time",
        "basic_salary": 3000.0,
        "allowances": {"hra": 500.0, "transport": 200.0},
        "deductions": {"tax": 300.0},
        "status": "Active"
    })
)]
pub struct Employee {
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    pub first_name: String,
    pub last_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    pub phone: Option<String>,

    #[schema(example = "Engineering")]
    pub department: String,

    pub position: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub joining_date: NaiveDate,

    #[schema(example = "Full-time")]
    pub employment_type: String,

    #[schema(example = 3000.0)]
    pub basic_salary: f64,

    #[schema(value_type = Object)]
    pub allowances: Json<MoneyMap>,

    #[schema(value_type = Object)]
    pub deductions: Json<MoneyMap>,

    pub manager_id: Option<u64>,

    #[schema(example = "Active")]
    pub status: String,
}
