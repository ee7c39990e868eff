use crate::auth::auth::AuthUser;
use crate::calc;
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::model::leave::{Leave, LeaveStatus, LeaveType};
use crate::response;
use actix_web::{HttpResponse, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "Sick Leave")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideLeave {
    /// Rejection reason or approval note
    pub comment: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveFilter {
    /// Filter by leave status
    pub status: Option<String>,
    /// Calendar year the leave starts in
    pub year: Option<i32>,
}

#[derive(Deserialize, IntoParams)]
pub struct BalanceQuery {
    pub year: Option<i32>,
}

/// Leave joined with the requesting employee, for review queues.
#[derive(Serialize)]
pub struct LeaveWithEmployee {
    #[serde(flatten)]
    pub leave: Leave,
    pub employee: Option<Employee>,
}

/// Apply for leave
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = CreateLeave,
    responses(
        (status = 201, description = "Leave application submitted", body = Leave),
        (status = 400, description = "start_date after end_date"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = auth.require_employee_profile()?;

    if payload.start_date > payload.end_date {
        return Err(ApiError::validation("start_date cannot be after end_date"));
    }
    if payload.reason.trim().is_empty() {
        return Err(ApiError::validation("reason is required"));
    }

    let number_of_days = calc::leave::number_of_days(payload.start_date, payload.end_date);

    let result = sqlx::query(
        r#"
        INSERT INTO leaves
            (employee_id, leave_type, start_date, end_date, number_of_days, reason, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.leave_type.to_string())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(number_of_days)
    .bind(payload.reason.trim())
    .bind(LeaveStatus::Pending.to_string())
    .execute(pool.get_ref())
    .await?;

    let leave = sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE id = ?")
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await?;

    Ok(response::created(
        "Leave application submitted successfully",
        leave,
    ))
}

/// Leave history for one employee
#[utoipa::path(
    get,
    path = "/api/v1/leave/employee/{employee_id}",
    params(("employee_id", Path, description = "Employee ID"), LeaveFilter),
    responses((status = 200, description = "Leave list, newest first")),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_for_employee(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let mut sql = String::from("SELECT * FROM leaves WHERE employee_id = ?");
    if query.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if query.year.is_some() {
        sql.push_str(" AND start_date >= ? AND start_date <= ?");
    }
    sql.push_str(" ORDER BY applied_at DESC");

    let mut q = sqlx::query_as::<_, Leave>(&sql).bind(employee_id);
    if let Some(status) = &query.status {
        q = q.bind(status);
    }
    if let Some(year) = query.year {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
            ApiError::validation("Invalid year")
        })?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
        q = q.bind(start).bind(end);
    }

    let leaves = q.fetch_all(pool.get_ref()).await?;
    Ok(response::ok_list(leaves))
}

/// Pending applications across all employees
#[utoipa::path(
    get,
    path = "/api/v1/leave/pending",
    responses(
        (status = 200, description = "Pending applications with employee metadata"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn pending(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    let leaves = sqlx::query_as::<_, Leave>(
        "SELECT * FROM leaves WHERE status = ? ORDER BY applied_at DESC",
    )
    .bind(LeaveStatus::Pending.to_string())
    .fetch_all(pool.get_ref())
    .await?;

    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees")
        .fetch_all(pool.get_ref())
        .await?;
    let by_id: HashMap<u64, Employee> = employees.into_iter().map(|e| (e.id, e)).collect();

    let enriched: Vec<LeaveWithEmployee> = leaves
        .into_iter()
        .map(|leave| {
            let employee = by_id.get(&leave.employee_id).cloned();
            LeaveWithEmployee { leave, employee }
        })
        .collect();

    Ok(response::ok_list(enriched))
}

/// Get one leave application
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id", Path, description = "Leave ID")),
    responses(
        (status = 200, body = Leave),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let leave = sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE id = ?")
        .bind(path.into_inner())
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Leave not found"))?;

    Ok(response::ok(leave))
}

async fn decide(
    pool: &MySqlPool,
    leave_id: u64,
    actor: u64,
    to: LeaveStatus,
    rejection_reason: Option<&str>,
) -> Result<Leave, ApiError> {
    // Guarded UPDATE: only a Pending row transitions, so a decision that
    // lost a race (or targets a processed leave) changes nothing.
    let result = sqlx::query(
        r#"
        UPDATE leaves
        SET status = ?, decided_by = ?, decided_at = NOW(), rejection_reason = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(to.to_string())
    .bind(actor)
    .bind(rejection_reason)
    .bind(leave_id)
    .bind(LeaveStatus::Pending.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leaves WHERE id = ?")
            .bind(leave_id)
            .fetch_one(pool)
            .await?;
        if exists == 0 {
            return Err(ApiError::not_found("Leave not found"));
        }
        return Err(ApiError::invalid_state("Leave has already been processed"));
    }

    let leave = sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE id = ?")
        .bind(leave_id)
        .fetch_one(pool)
        .await?;
    Ok(leave)
}

/// Approve a pending application
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(("leave_id", Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave approved", body = Leave),
        (status = 400, description = "Leave has already been processed"),
        (status = 404, description = "Leave not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    let leave = decide(
        pool.get_ref(),
        path.into_inner(),
        auth.user_id,
        LeaveStatus::Approved,
        None,
    )
    .await?;

    Ok(response::ok_message("Leave approved successfully", leave))
}

/// Reject a pending application
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(("leave_id", Path, description = "Leave ID")),
    request_body = DecideLeave,
    responses(
        (status = 200, description = "Leave rejected", body = Leave),
        (status = 400, description = "Leave has already been processed"),
        (status = 404, description = "Leave not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: Option<web::Json<DecideLeave>>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    let reason = body.as_ref().and_then(|b| b.comment.as_deref());
    let leave = decide(
        pool.get_ref(),
        path.into_inner(),
        auth.user_id,
        LeaveStatus::Rejected,
        reason,
    )
    .await?;

    Ok(response::ok_message("Leave rejected", leave))
}

/// Cancel one's own pending application
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(("leave_id", Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave cancelled", body = Leave),
        (status = 400, description = "Leave has already been processed"),
        (status = 403, description = "Not the applicant"),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = auth.require_employee_profile()?;
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE id = ?")
        .bind(leave_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Leave not found"))?;

    if leave.employee_id != employee_id {
        return Err(ApiError::forbidden("Only the applicant can cancel a leave"));
    }

    let leave = decide(
        pool.get_ref(),
        leave_id,
        auth.user_id,
        LeaveStatus::Cancelled,
        None,
    )
    .await?;

    Ok(response::ok_message("Leave cancelled", leave))
}

/// Yearly balance per leave type
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance/{employee_id}",
    params(("employee_id", Path, description = "Employee ID"), BalanceQuery),
    responses((status = 200, description = "Map of leave type to days taken or pending")),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn balance(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<BalanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| ApiError::validation("Invalid year"))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();

    // Approved and still-pending spans both count against the balance
    let rows = sqlx::query_as::<_, (String, i32)>(
        r#"
        SELECT leave_type, number_of_days
        FROM leaves
        WHERE employee_id = ?
          AND status IN (?, ?)
          AND start_date >= ? AND start_date <= ?
        "#,
    )
    .bind(employee_id)
    .bind(LeaveStatus::Approved.to_string())
    .bind(LeaveStatus::Pending.to_string())
    .bind(start)
    .bind(end)
    .fetch_all(pool.get_ref())
    .await?;

    let balance = calc::leave::balance_by_type(rows);
    Ok(response::ok(balance))
}
