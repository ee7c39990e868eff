use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::recruitment::{
    Applicant, Application, ApplicationNote, Interview, JobPosting, JobStatus,
};
use crate::response;
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Deserialize, ToSchema)]
pub struct CreateJob {
    #[schema(example = "Senior Backend Engineer")]
    pub job_title: String,
    #[schema(example = "Engineering")]
    pub department: String,
    pub position: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub number_of_openings: Option<u32>,
    #[schema(example = "Full-time")]
    pub employment_type: Option<String>,
    pub location: String,
    #[schema(example = "2026-03-31", format = "date", value_type = String)]
    pub application_deadline: NaiveDate,
    pub hiring_manager_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateJob {
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub number_of_openings: Option<u32>,
    pub employment_type: Option<String>,
    pub location: Option<String>,
    #[schema(example = "2026-03-31", format = "date", value_type = String)]
    pub application_deadline: Option<NaiveDate>,
    #[schema(example = "Closed")]
    pub status: Option<JobStatus>,
    pub hiring_manager_id: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct JobFilter {
    pub status: Option<String>,
    pub department: Option<String>,
    /// Case-insensitive substring match on location
    pub location: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ApplyToJob {
    pub job_id: u64,
    pub applicant: Applicant,
    pub resume: Option<String>,
    pub cover_letter: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct ApplicationFilter {
    pub status: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateApplication {
    #[schema(example = "Shortlisted")]
    pub status: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ScheduleInterview {
    #[schema(example = "2026-02-10T10:00:00", format = "date-time", value_type = String)]
    pub scheduled_at: NaiveDateTime,
    pub interviewer: Option<String>,
    pub mode: Option<String>,
}

async fn fetch_job(pool: &MySqlPool, job_id: u64) -> Result<JobPosting, ApiError> {
    sqlx::query_as::<_, JobPosting>("SELECT * FROM job_postings WHERE id = ?")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Job posting not found"))
}

async fn store_applications(
    pool: &MySqlPool,
    job_id: u64,
    applications: &[Application],
) -> Result<(), ApiError> {
    sqlx::query("UPDATE job_postings SET applications = ? WHERE id = ?")
        .bind(Json(applications.to_vec()))
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Create a job posting
#[utoipa::path(
    post,
    path = "/api/v1/recruitment/jobs",
    request_body = CreateJob,
    responses(
        (status = 201, description = "Job posting created", body = JobPosting),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Recruitment"
)]
pub async fn create_job(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateJob>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO job_postings
            (job_title, department, position, description, requirements,
             number_of_openings, employment_type, location, posted_by,
             application_deadline, status, applications, hiring_manager_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.job_title)
    .bind(&payload.department)
    .bind(&payload.position)
    .bind(&payload.description)
    .bind(Json(payload.requirements.clone()))
    .bind(payload.number_of_openings.unwrap_or(1))
    .bind(payload.employment_type.as_deref().unwrap_or("Full-time"))
    .bind(&payload.location)
    .bind(auth.user_id)
    .bind(payload.application_deadline)
    .bind(JobStatus::Open.to_string())
    .bind(Json(Vec::<Application>::new()))
    .bind(payload.hiring_manager_id)
    .execute(pool.get_ref())
    .await?;

    let job = fetch_job(pool.get_ref(), result.last_insert_id()).await?;
    Ok(response::created("Job posting created successfully", job))
}

/// List job postings (public)
#[utoipa::path(
    get,
    path = "/api/v1/recruitment/jobs",
    params(JobFilter),
    responses((status = 200, description = "Job postings, newest first")),
    tag = "Recruitment"
)]
pub async fn list_jobs(
    pool: web::Data<MySqlPool>,
    query: web::Query<JobFilter>,
) -> Result<HttpResponse, ApiError> {
    let mut sql = String::from("SELECT * FROM job_postings WHERE 1=1");
    if query.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if query.department.is_some() {
        sql.push_str(" AND department = ?");
    }
    if query.location.is_some() {
        sql.push_str(" AND LOWER(location) LIKE ?");
    }
    sql.push_str(" ORDER BY posted_at DESC");

    let mut q = sqlx::query_as::<_, JobPosting>(&sql);
    if let Some(status) = &query.status {
        q = q.bind(status);
    }
    if let Some(department) = &query.department {
        q = q.bind(department);
    }
    if let Some(location) = &query.location {
        q = q.bind(format!("%{}%", location.to_lowercase()));
    }

    let jobs = q.fetch_all(pool.get_ref()).await?;
    Ok(response::ok_list(jobs))
}

/// Get a job posting (public)
#[utoipa::path(
    get,
    path = "/api/v1/recruitment/jobs/{job_id}",
    params(("job_id", Path, description = "Job posting ID")),
    responses(
        (status = 200, body = JobPosting),
        (status = 404, description = "Job posting not found")
    ),
    tag = "Recruitment"
)]
pub async fn get_job(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let job = fetch_job(pool.get_ref(), path.into_inner()).await?;
    Ok(response::ok(job))
}

/// Update a job posting
#[utoipa::path(
    put,
    path = "/api/v1/recruitment/jobs/{job_id}",
    params(("job_id", Path, description = "Job posting ID")),
    request_body = UpdateJob,
    responses(
        (status = 200, description = "Job posting updated", body = JobPosting),
        (status = 404, description = "Job posting not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Recruitment"
)]
pub async fn update_job(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateJob>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let job_id = path.into_inner();
    let body = body.into_inner();

    let mut sets: Vec<&str> = Vec::new();
    enum Arg {
        Str(String),
        U64(u64),
        U32(u32),
        Date(NaiveDate),
        JsonVal(serde_json::Value),
    }
    let mut args: Vec<Arg> = Vec::new();

    if let Some(v) = body.job_title {
        sets.push("job_title = ?");
        args.push(Arg::Str(v));
    }
    if let Some(v) = body.department {
        sets.push("department = ?");
        args.push(Arg::Str(v));
    }
    if let Some(v) = body.position {
        sets.push("position = ?");
        args.push(Arg::Str(v));
    }
    if let Some(v) = body.description {
        sets.push("description = ?");
        args.push(Arg::Str(v));
    }
    if let Some(v) = &body.requirements {
        sets.push("requirements = ?");
        args.push(Arg::JsonVal(serde_json::to_value(v).unwrap()));
    }
    if let Some(v) = body.number_of_openings {
        sets.push("number_of_openings = ?");
        args.push(Arg::U32(v));
    }
    if let Some(v) = body.employment_type {
        sets.push("employment_type = ?");
        args.push(Arg::Str(v));
    }
    if let Some(v) = body.location {
        sets.push("location = ?");
        args.push(Arg::Str(v));
    }
    if let Some(v) = body.application_deadline {
        sets.push("application_deadline = ?");
        args.push(Arg::Date(v));
    }
    if let Some(v) = body.status {
        sets.push("status = ?");
        args.push(Arg::Str(v.to_string()));
    }
    if let Some(v) = body.hiring_manager_id {
        sets.push("hiring_manager_id = ?");
        args.push(Arg::U64(v));
    }

    if sets.is_empty() {
        return Err(ApiError::validation("No fields provided for update"));
    }

    let sql = format!("UPDATE job_postings SET {} WHERE id = ?", sets.join(", "));
    let mut q = sqlx::query(&sql);
    for arg in &args {
        q = match arg {
            Arg::Str(s) => q.bind(s.as_str()),
            Arg::U64(v) => q.bind(*v),
            Arg::U32(v) => q.bind(*v),
            Arg::Date(d) => q.bind(*d),
            Arg::JsonVal(v) => q.bind(v),
        };
    }

    let result = q.bind(job_id).execute(pool.get_ref()).await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Job posting not found"));
    }

    let job = fetch_job(pool.get_ref(), job_id).await?;
    Ok(response::ok_message("Job posting updated successfully", job))
}

/// Apply to a job (public)
#[utoipa::path(
    post,
    path = "/api/v1/recruitment/applications",
    request_body = ApplyToJob,
    responses(
        (status = 201, description = "Application submitted"),
        (status = 400, description = "Job not accepting applications, or duplicate applicant"),
        (status = 404, description = "Job posting not found")
    ),
    tag = "Recruitment"
)]
pub async fn apply(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ApplyToJob>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    if payload.applicant.name.trim().is_empty() || payload.applicant.email.trim().is_empty() {
        return Err(ApiError::validation("Applicant name and email are required"));
    }

    let job = fetch_job(pool.get_ref(), payload.job_id).await?;

    if job.status.parse::<JobStatus>().ok() != Some(JobStatus::Open) {
        return Err(ApiError::invalid_state(
            "This job posting is not accepting applications",
        ));
    }

    let mut applications = job.applications.0;
    let email = payload.applicant.email.trim().to_lowercase();
    if applications
        .iter()
        .any(|a| a.applicant.email.eq_ignore_ascii_case(&email))
    {
        return Err(ApiError::duplicate(
            "You have already applied for this position",
        ));
    }

    applications.push(Application {
        id: Uuid::new_v4().to_string(),
        applicant: Applicant {
            name: payload.applicant.name.trim().to_string(),
            email,
            phone: payload.applicant.phone,
        },
        resume: payload.resume,
        cover_letter: payload.cover_letter,
        status: "New".to_string(),
        applied_at: Utc::now().naive_utc(),
        notes: Vec::new(),
        interviews: Vec::new(),
    });

    store_applications(pool.get_ref(), job.id, &applications).await?;

    Ok(response::created(
        "Application submitted successfully",
        serde_json::Value::Null,
    ))
}

/// Applications for a job
#[utoipa::path(
    get,
    path = "/api/v1/recruitment/applications/{job_id}",
    params(("job_id", Path, description = "Job posting ID"), ApplicationFilter),
    responses(
        (status = 200, description = "Applications, optionally filtered by status"),
        (status = 404, description = "Job posting not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Recruitment"
)]
pub async fn list_applications(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<ApplicationFilter>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    let job = fetch_job(pool.get_ref(), path.into_inner()).await?;

    let mut applications = job.applications.0;
    if let Some(status) = &query.status {
        applications.retain(|a| &a.status == status);
    }

    Ok(response::ok_list(applications))
}

/// Update an application's status or append a note
#[utoipa::path(
    put,
    path = "/api/v1/recruitment/applications/{job_id}/{application_id}",
    params(
        ("job_id", Path, description = "Job posting ID"),
        ("application_id", Path, description = "Application ID")
    ),
    request_body = UpdateApplication,
    responses(
        (status = 200, description = "Application updated", body = Application),
        (status = 404, description = "Job or application not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Recruitment"
)]
pub async fn update_application(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, String)>,
    body: web::Json<UpdateApplication>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    let (job_id, application_id) = path.into_inner();
    let body = body.into_inner();

    let job = fetch_job(pool.get_ref(), job_id).await?;
    let mut applications = job.applications.0;

    let index = applications
        .iter()
        .position(|a| a.id == application_id)
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    if let Some(status) = body.status {
        applications[index].status = status;
    }
    if let Some(note) = body.note {
        applications[index].notes.push(ApplicationNote {
            note,
            added_by: auth.user_id,
            added_at: Utc::now().naive_utc(),
        });
    }

    store_applications(pool.get_ref(), job_id, &applications).await?;

    Ok(response::ok_message(
        "Application updated successfully",
        applications.swap_remove(index),
    ))
}

/// Schedule an interview for an application
#[utoipa::path(
    post,
    path = "/api/v1/recruitment/applications/{job_id}/{application_id}/interview",
    params(
        ("job_id", Path, description = "Job posting ID"),
        ("application_id", Path, description = "Application ID")
    ),
    request_body = ScheduleInterview,
    responses(
        (status = 201, description = "Interview scheduled", body = Application),
        (status = 404, description = "Job or application not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Recruitment"
)]
pub async fn schedule_interview(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, String)>,
    body: web::Json<ScheduleInterview>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    let (job_id, application_id) = path.into_inner();
    let body = body.into_inner();

    let job = fetch_job(pool.get_ref(), job_id).await?;
    let mut applications = job.applications.0;

    let index = applications
        .iter()
        .position(|a| a.id == application_id)
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    applications[index].interviews.push(Interview {
        id: Uuid::new_v4().to_string(),
        scheduled_at: body.scheduled_at,
        interviewer: body.interviewer,
        mode: body.mode,
        status: "Scheduled".to_string(),
    });
    applications[index].status = "Interview Scheduled".to_string();

    store_applications(pool.get_ref(), job_id, &applications).await?;

    Ok(response::created(
        "Interview scheduled successfully",
        applications.swap_remove(index),
    ))
}
