use crate::auth::auth::AuthUser;
use crate::calc;
use crate::calc::attendance::DayRecord;
use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::response;
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema, Default)]
pub struct CheckInOut {
    #[schema(example = "HQ / Floor 3")]
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct RangeQuery {
    #[param(example = "2026-01-01", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[param(example = "2026-01-31", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams)]
pub struct ReportQuery {
    #[param(example = "2026-01-01", value_type = String)]
    pub start_date: NaiveDate,
    #[param(example = "2026-01-31", value_type = String)]
    pub end_date: NaiveDate,
    /// Restrict the report to one department
    pub department: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct TodayQuery {
    pub employee_id: Option<u64>,
}

/// Check-in: one record per (employee, date)
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInOut,
    responses(
        (status = 201, description = "Checked in", body = Attendance),
        (status = 400, description = "Already checked in today"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: Option<web::Json<CheckInOut>>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = auth.require_employee_profile()?;
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();

    let today = Utc::now().date_naive();
    let now = Utc::now().naive_utc();

    // The unique key on (employee_id, date) serializes concurrent attempts;
    // the race loser lands here as a 23000 and never overwrites the winner.
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, check_in_time, check_in_location, check_in_notes, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(today)
    .bind(now)
    .bind(&payload.location)
    .bind(&payload.notes)
    .bind(AttendanceStatus::Present.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| ApiError::from_sqlx(e, "Already checked in today"))?;

    let record = sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE id = ?")
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await?;

    Ok(response::created("Checked in successfully", record))
}

/// Check-out: completes today's record and derives work hours
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body = CheckInOut,
    responses(
        (status = 200, description = "Checked out", body = Attendance),
        (status = 400, description = "Already checked out today"),
        (status = 404, description = "No check-in found for today"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: Option<web::Json<CheckInOut>>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = auth.require_employee_profile()?;
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();

    let today = Utc::now().date_naive();

    let record = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("No check-in found for today"))?;

    if record.check_out_time.is_some() {
        return Err(ApiError::invalid_state("Already checked out today"));
    }

    let check_out_time = Utc::now().naive_utc();
    let work_hours = record
        .check_in_time
        .map(|check_in| calc::attendance::work_hours(check_in, check_out_time))
        .unwrap_or(0.0);

    sqlx::query(
        r#"
        UPDATE attendance
        SET check_out_time = ?, check_out_location = ?, check_out_notes = ?, work_hours = ?
        WHERE id = ?
        "#,
    )
    .bind(check_out_time)
    .bind(&payload.location)
    .bind(&payload.notes)
    .bind(work_hours)
    .bind(record.id)
    .execute(pool.get_ref())
    .await?;

    let updated = sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE id = ?")
        .bind(record.id)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(response::ok_message("Checked out successfully", updated))
}

/// Today's record for an employee, if any
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    params(TodayQuery),
    responses((status = 200, description = "Today's record or null")),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TodayQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = match query.employee_id.or(auth.employee_id) {
        Some(id) => id,
        None => return Ok(response::ok(serde_json::Value::Null)),
    };

    let record = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(employee_id)
    .bind(Utc::now().date_naive())
    .fetch_optional(pool.get_ref())
    .await?;

    Ok(response::ok(record))
}

/// Attendance history for one employee
#[utoipa::path(
    get,
    path = "/api/v1/attendance/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        RangeQuery
    ),
    responses((status = 200, description = "Attendance rows, newest first")),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_for_employee(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let mut sql = String::from("SELECT * FROM attendance WHERE employee_id = ?");
    if query.start_date.is_some() && query.end_date.is_some() {
        sql.push_str(" AND date >= ? AND date <= ?");
    }
    sql.push_str(" ORDER BY date DESC");

    let mut q = sqlx::query_as::<_, Attendance>(&sql).bind(employee_id);
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        q = q.bind(start).bind(end);
    }

    let rows = q.fetch_all(pool.get_ref()).await?;
    Ok(response::ok_list(rows))
}

/// Per-employee attendance report over a date range
#[utoipa::path(
    get,
    path = "/api/v1/attendance/report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Per-employee presence counts and hour sums"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    if query.start_date > query.end_date {
        return Err(ApiError::validation("start_date cannot be after end_date"));
    }

    let rows = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE date >= ? AND date <= ?",
    )
    .bind(query.start_date)
    .bind(query.end_date)
    .fetch_all(pool.get_ref())
    .await?;

    let mut names_sql =
        String::from("SELECT id, first_name, last_name, department FROM employees");
    if query.department.is_some() {
        names_sql.push_str(" WHERE department = ?");
    }
    let mut names_q = sqlx::query_as::<_, (u64, String, String, String)>(&names_sql);
    if let Some(department) = &query.department {
        names_q = names_q.bind(department);
    }

    let names: HashMap<u64, (String, String)> = names_q
        .fetch_all(pool.get_ref())
        .await?
        .into_iter()
        .map(|(id, first, last, dept)| (id, (format!("{} {}", first, last), dept)))
        .collect();

    let records: Vec<DayRecord> = rows
        .iter()
        .map(|r| DayRecord {
            employee_id: r.employee_id,
            status: r.status.parse::<AttendanceStatus>().ok(),
            is_late: r.is_late,
            work_hours: r.work_hours,
            overtime_minutes: r.overtime_minutes,
        })
        .collect();

    let report = calc::attendance::summarize_by_employee(&records, &names);
    Ok(response::ok_list(report))
}
