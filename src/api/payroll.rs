use crate::auth::auth::AuthUser;
use crate::calc;
use crate::error::ApiError;
use crate::model::attendance::AttendanceStatus;
use crate::model::employee::Employee;
use crate::model::payroll::{Payroll, PayrollStatus};
use crate::response;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CalculatePayroll {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct GeneratePayrolls {
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,
    /// Restrict the run to one department
    pub department: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePayroll {
    #[schema(example = "Processed")]
    pub status: Option<PayrollStatus>,
    #[schema(example = "2026-02-01", format = "date", value_type = String)]
    pub payment_date: Option<NaiveDate>,
    #[schema(example = "Bank transfer")]
    pub payment_method: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct YearQuery {
    pub year: Option<i32>,
}

/// One employee's outcome in a bulk generation run.
#[derive(Serialize, ToSchema)]
pub struct GenerateOutcome {
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "success")]
    pub status: &'static str,
    pub message: String,
}

/// Payslip joined with employee metadata, for the monthly view.
#[derive(Serialize)]
pub struct PayrollWithEmployee {
    #[serde(flatten)]
    pub payroll: Payroll,
    pub employee: Option<Employee>,
}

fn validate_period(month: u32, year: i32) -> Result<(), ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::validation("month must be between 1 and 12"));
    }
    if !(2000..=2100).contains(&year) {
        return Err(ApiError::validation("year out of range"));
    }
    Ok(())
}

/// The full derivation for one payslip: month span, attendance counts,
/// overtime pay, gross and net, persisted as Draft. The unique key on
/// (employee_id, month, year) backstops the pre-check under concurrency.
async fn calculate_for(
    pool: &MySqlPool,
    employee: &Employee,
    month: u32,
    year: i32,
    generated_by: u64,
) -> Result<Payroll, ApiError> {
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM payrolls WHERE employee_id = ? AND month = ? AND year = ?",
    )
    .bind(employee.id)
    .bind(month)
    .bind(year)
    .fetch_one(pool)
    .await?;

    if existing > 0 {
        return Err(ApiError::duplicate("Payroll already exists for this period"));
    }

    let (first, last) = calc::payroll::month_span(year, month);
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT status, overtime_minutes
        FROM attendance
        WHERE employee_id = ? AND date >= ? AND date <= ?
        "#,
    )
    .bind(employee.id)
    .bind(first)
    .bind(last)
    .fetch_all(pool)
    .await?;

    let counts = calc::payroll::count_attendance(
        rows.into_iter()
            .map(|(status, overtime)| (status.parse::<AttendanceStatus>().ok(), overtime)),
    );

    let working_days = calc::payroll::days_in_month(year, month);
    let slip = calc::payroll::compute_payslip(
        employee.basic_salary,
        &employee.allowances,
        &employee.deductions,
        working_days,
        &counts,
    );

    let result = sqlx::query(
        r#"
        INSERT INTO payrolls
            (employee_id, month, year, basic_salary, allowances, deductions,
             working_days, present_days, absent_days, leave_days,
             overtime_hours, overtime_pay, gross_salary, total_deductions, net_salary,
             status, generated_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee.id)
    .bind(month)
    .bind(year)
    .bind(employee.basic_salary)
    .bind(&employee.allowances)
    .bind(&employee.deductions)
    .bind(slip.working_days)
    .bind(slip.present_days)
    .bind(slip.absent_days)
    .bind(slip.leave_days)
    .bind(slip.overtime_hours)
    .bind(slip.overtime_pay)
    .bind(slip.gross_salary)
    .bind(slip.total_deductions)
    .bind(slip.net_salary)
    .bind(PayrollStatus::Draft.to_string())
    .bind(generated_by)
    .execute(pool)
    .await
    .map_err(|e| ApiError::from_sqlx(e, "Payroll already exists for this period"))?;

    let payroll = sqlx::query_as::<_, Payroll>("SELECT * FROM payrolls WHERE id = ?")
        .bind(result.last_insert_id())
        .fetch_one(pool)
        .await?;

    Ok(payroll)
}

/// Calculate one payslip
#[utoipa::path(
    post,
    path = "/api/v1/payroll/calculate",
    request_body = CalculatePayroll,
    responses(
        (status = 201, description = "Payroll calculated", body = Payroll),
        (status = 400, description = "Payroll already exists for this period"),
        (status = 404, description = "Employee not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn calculate(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CalculatePayroll>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;
    validate_period(payload.month, payload.year)?;

    // duplicate-period check comes first, even for unknown employees
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM payrolls WHERE employee_id = ? AND month = ? AND year = ?",
    )
    .bind(payload.employee_id)
    .bind(payload.month)
    .bind(payload.year)
    .fetch_one(pool.get_ref())
    .await?;
    if existing > 0 {
        return Err(ApiError::duplicate("Payroll already exists for this period"));
    }

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(payload.employee_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    let payroll = calculate_for(
        pool.get_ref(),
        &employee,
        payload.month,
        payload.year,
        auth.user_id,
    )
    .await?;

    Ok(response::created("Payroll calculated successfully", payroll))
}

/// Bulk payroll generation over Active employees
///
/// Best-effort and non-transactional across employees: each failure becomes
/// a skipped/error outcome in the result list instead of aborting the batch.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/generate",
    request_body = GeneratePayrolls,
    responses(
        (status = 200, description = "Per-employee outcome list", body = [GenerateOutcome]),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<GeneratePayrolls>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;
    validate_period(payload.month, payload.year)?;

    let mut sql = String::from("SELECT * FROM employees WHERE status = 'Active'");
    if payload.department.is_some() {
        sql.push_str(" AND department = ?");
    }
    let mut q = sqlx::query_as::<_, Employee>(&sql);
    if let Some(department) = &payload.department {
        q = q.bind(department);
    }
    let employees = q.fetch_all(pool.get_ref()).await?;

    let mut results: Vec<GenerateOutcome> = Vec::with_capacity(employees.len());

    for employee in &employees {
        let outcome = match calculate_for(
            pool.get_ref(),
            employee,
            payload.month,
            payload.year,
            auth.user_id,
        )
        .await
        {
            Ok(_) => GenerateOutcome {
                employee_code: employee.employee_code.clone(),
                status: "success",
                message: "Payroll generated".to_string(),
            },
            Err(ApiError::DuplicateEntry(_)) => GenerateOutcome {
                employee_code: employee.employee_code.clone(),
                status: "skipped",
                message: "Payroll already exists".to_string(),
            },
            Err(e) => {
                warn!(employee_code = %employee.employee_code, error = %e, "Payroll generation failed");
                GenerateOutcome {
                    employee_code: employee.employee_code.clone(),
                    status: "error",
                    message: e.to_string(),
                }
            }
        };
        results.push(outcome);
    }

    Ok(HttpResponse::Ok().json(response::ApiResponse {
        success: true,
        message: Some("Payroll generation completed".to_string()),
        count: Some(results.len()),
        data: Some(results),
    }))
}

/// Payslips for one employee
#[utoipa::path(
    get,
    path = "/api/v1/payroll/employee/{employee_id}",
    params(("employee_id", Path, description = "Employee ID"), YearQuery),
    responses((status = 200, description = "Payslips, newest period first")),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_for_employee(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let mut sql = String::from("SELECT * FROM payrolls WHERE employee_id = ?");
    if query.year.is_some() {
        sql.push_str(" AND year = ?");
    }
    sql.push_str(" ORDER BY year DESC, month DESC");

    let mut q = sqlx::query_as::<_, Payroll>(&sql).bind(employee_id);
    if let Some(year) = query.year {
        q = q.bind(year);
    }

    let payrolls = q.fetch_all(pool.get_ref()).await?;
    Ok(response::ok_list(payrolls))
}

/// All payslips for one period, with employee metadata
#[utoipa::path(
    get,
    path = "/api/v1/payroll/monthly/{month}/{year}",
    params(
        ("month", Path, description = "Month 1-12"),
        ("year", Path, description = "Calendar year")
    ),
    responses(
        (status = 200, description = "Payslips with employee metadata"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn monthly(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(u32, i32)>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let (month, year) = path.into_inner();
    validate_period(month, year)?;

    let payrolls = sqlx::query_as::<_, Payroll>(
        "SELECT * FROM payrolls WHERE month = ? AND year = ? ORDER BY employee_id",
    )
    .bind(month)
    .bind(year)
    .fetch_all(pool.get_ref())
    .await?;

    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees")
        .fetch_all(pool.get_ref())
        .await?;
    let mut by_id: HashMap<u64, Employee> =
        employees.into_iter().map(|e| (e.id, e)).collect();

    let enriched: Vec<PayrollWithEmployee> = payrolls
        .into_iter()
        .map(|payroll| {
            let employee = by_id.remove(&payroll.employee_id);
            PayrollWithEmployee { payroll, employee }
        })
        .collect();

    Ok(response::ok_list(enriched))
}

/// Update payment bookkeeping on a payslip
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}",
    params(("payroll_id", Path, description = "Payroll ID")),
    request_body = UpdatePayroll,
    responses(
        (status = 200, description = "Payroll updated", body = Payroll),
        (status = 404, description = "Payroll not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn update_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdatePayroll>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let payroll_id = path.into_inner();
    let body = body.into_inner();

    let mut sets: Vec<&str> = Vec::new();
    enum Arg {
        Str(String),
        Date(NaiveDate),
    }
    let mut args: Vec<Arg> = Vec::new();

    if let Some(status) = body.status {
        sets.push("status = ?");
        args.push(Arg::Str(status.to_string()));
    }
    if let Some(date) = body.payment_date {
        sets.push("payment_date = ?");
        args.push(Arg::Date(date));
    }
    if let Some(method) = body.payment_method {
        sets.push("payment_method = ?");
        args.push(Arg::Str(method));
    }
    if let Some(remarks) = body.remarks {
        sets.push("remarks = ?");
        args.push(Arg::Str(remarks));
    }

    if sets.is_empty() {
        return Err(ApiError::validation("No fields provided for update"));
    }

    let sql = format!("UPDATE payrolls SET {} WHERE id = ?", sets.join(", "));
    let mut q = sqlx::query(&sql);
    for arg in &args {
        q = match arg {
            Arg::Str(s) => q.bind(s.as_str()),
            Arg::Date(d) => q.bind(*d),
        };
    }

    let result = q.bind(payroll_id).execute(pool.get_ref()).await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Payroll not found"));
    }

    let payroll = sqlx::query_as::<_, Payroll>("SELECT * FROM payrolls WHERE id = ?")
        .bind(payroll_id)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(response::ok_message("Payroll updated successfully", payroll))
}
