use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::employee::{Employee, EmployeeStatus, MoneyMap};
use crate::response;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use sqlx::types::Json;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "john@company.com", format = "email")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "Engineering")]
    pub department: String,
    pub position: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub joining_date: Option<NaiveDate>,
    #[schema(example = "Full-time")]
    pub employment_type: Option<String>,
    #[schema(example = 3000.0)]
    pub basic_salary: f64,
    #[schema(value_type = Object)]
    #[serde(default)]
    pub allowances: MoneyMap,
    #[schema(value_type = Object)]
    #[serde(default)]
    pub deductions: MoneyMap,
    pub manager_id: Option<u64>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub employee_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub joining_date: Option<NaiveDate>,
    pub employment_type: Option<String>,
    pub basic_salary: Option<f64>,
    #[schema(value_type = Object)]
    pub allowances: Option<MoneyMap>,
    #[schema(value_type = Object)]
    pub deductions: Option<MoneyMap>,
    pub manager_id: Option<u64>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmployeeQuery {
    /// Filter by department
    pub department: Option<String>,
    /// Filter by status
    pub status: Option<String>,
    /// Substring match over name, code and email
    pub search: Option<String>,
}

// Typed bind values for dynamically assembled SQL
enum SqlArg {
    U64(u64),
    F64(f64),
    Str(String),
    Date(NaiveDate),
    Money(Json<MoneyMap>),
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Duplicate employee code or email"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    if payload.basic_salary < 0.0 {
        return Err(ApiError::validation("basic_salary must be >= 0"));
    }
    if payload.employee_code.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(ApiError::validation("employee_code and email are required"));
    }

    let joining_date = payload
        .joining_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let status = payload.status.unwrap_or(EmployeeStatus::Active);

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (employee_code, first_name, last_name, email, phone, department, position,
         joining_date, employment_type, basic_salary, allowances, deductions, manager_id, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_code.trim())
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(payload.email.trim().to_lowercase())
    .bind(&payload.phone)
    .bind(&payload.department)
    .bind(&payload.position)
    .bind(joining_date)
    .bind(payload.employment_type.as_deref().unwrap_or("Full-time"))
    .bind(payload.basic_salary)
    .bind(Json(payload.allowances.clone()))
    .bind(Json(payload.deductions.clone()))
    .bind(payload.manager_id)
    .bind(status.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| ApiError::from_sqlx(e, "Employee code or email already exists"))?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await?;

    Ok(response::created("Employee created successfully", employee))
}

/// List employees with filters
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employee list with count"),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<SqlArg> = Vec::new();

    if let Some(department) = &query.department {
        where_sql.push_str(" AND department = ?");
        args.push(SqlArg::Str(department.clone()));
    }

    if let Some(status) = &query.status {
        where_sql.push_str(" AND status = ?");
        args.push(SqlArg::Str(status.clone()));
    }

    if let Some(search) = &query.search {
        where_sql.push_str(
            " AND (first_name LIKE ? OR last_name LIKE ? OR employee_code LIKE ? OR email LIKE ?)",
        );
        let like = format!("%{}%", search);
        for _ in 0..4 {
            args.push(SqlArg::Str(like.clone()));
        }
    }

    let data_sql = format!("SELECT * FROM employees{} ORDER BY id", where_sql);
    debug!(sql = %data_sql, "Fetching employees");

    let mut data_q = sqlx::query_as::<_, Employee>(&data_sql);
    for arg in &args {
        data_q = match arg {
            SqlArg::U64(v) => data_q.bind(*v),
            SqlArg::F64(v) => data_q.bind(*v),
            SqlArg::Str(s) => data_q.bind(s.as_str()),
            SqlArg::Date(d) => data_q.bind(*d),
            SqlArg::Money(m) => data_q.bind(m),
        };
    }

    let employees = data_q.fetch_all(pool.get_ref()).await?;

    Ok(response::ok_list(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, body = Employee),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok(response::ok(employee))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();
    let body = body.into_inner();

    if let Some(salary) = body.basic_salary {
        if salary < 0.0 {
            return Err(ApiError::validation("basic_salary must be >= 0"));
        }
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut args: Vec<SqlArg> = Vec::new();

    if let Some(v) = body.employee_code {
        sets.push("employee_code = ?");
        args.push(SqlArg::Str(v));
    }
    if let Some(v) = body.first_name {
        sets.push("first_name = ?");
        args.push(SqlArg::Str(v));
    }
    if let Some(v) = body.last_name {
        sets.push("last_name = ?");
        args.push(SqlArg::Str(v));
    }
    if let Some(v) = body.email {
        sets.push("email = ?");
        args.push(SqlArg::Str(v.trim().to_lowercase()));
    }
    if let Some(v) = body.phone {
        sets.push("phone = ?");
        args.push(SqlArg::Str(v));
    }
    if let Some(v) = body.department {
        sets.push("department = ?");
        args.push(SqlArg::Str(v));
    }
    if let Some(v) = body.position {
        sets.push("position = ?");
        args.push(SqlArg::Str(v));
    }
    if let Some(v) = body.joining_date {
        sets.push("joining_date = ?");
        args.push(SqlArg::Date(v));
    }
    if let Some(v) = body.employment_type {
        sets.push("employment_type = ?");
        args.push(SqlArg::Str(v));
    }
    if let Some(v) = body.basic_salary {
        sets.push("basic_salary = ?");
        args.push(SqlArg::F64(v));
    }
    if let Some(v) = body.allowances {
        sets.push("allowances = ?");
        args.push(SqlArg::Money(Json(v)));
    }
    if let Some(v) = body.deductions {
        sets.push("deductions = ?");
        args.push(SqlArg::Money(Json(v)));
    }
    if let Some(v) = body.manager_id {
        sets.push("manager_id = ?");
        args.push(SqlArg::U64(v));
    }
    if let Some(v) = body.status {
        sets.push("status = ?");
        args.push(SqlArg::Str(v.to_string()));
    }

    if sets.is_empty() {
        return Err(ApiError::validation("No fields provided for update"));
    }

    let sql = format!("UPDATE employees SET {} WHERE id = ?", sets.join(", "));
    args.push(SqlArg::U64(employee_id));

    let mut q = sqlx::query(&sql);
    for arg in &args {
        q = match arg {
            SqlArg::U64(v) => q.bind(*v),
            SqlArg::F64(v) => q.bind(*v),
            SqlArg::Str(s) => q.bind(s.as_str()),
            SqlArg::Date(d) => q.bind(*d),
            SqlArg::Money(m) => q.bind(m),
        };
    }

    let result = q
        .execute(pool.get_ref())
        .await
        .map_err(|e| ApiError::from_sqlx(e, "Employee code or email already exists"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Employee not found"));
    }

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(response::ok_message("Employee updated successfully", employee))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Employee not found"));
    }

    Ok(response::ok_message(
        "Employee deleted successfully",
        json!(null),
    ))
}
