use crate::auth::auth::AuthUser;
use crate::calc;
use crate::calc::performance::EvaluationFacts;
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::model::performance::{Criterion, Goal, PerformanceReview, ReviewStatus};
use crate::response;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use sqlx::types::Json;
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateEvaluation {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "2025-07-01", format = "date", value_type = String)]
    pub review_start_date: NaiveDate,
    #[schema(example = "2025-12-31", format = "date", value_type = String)]
    pub review_end_date: NaiveDate,
    #[schema(example = "Annual")]
    pub review_type: String,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_of_improvement: Vec<String>,
    pub reviewer_comments: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEvaluation {
    /// Recomputes the overall rating when present; absent leaves it untouched
    pub criteria: Option<Vec<Criterion>>,
    pub goals: Option<Vec<Goal>>,
    pub strengths: Option<Vec<String>>,
    pub areas_of_improvement: Option<Vec<String>>,
    pub reviewer_comments: Option<String>,
    #[schema(example = "Submitted")]
    pub status: Option<ReviewStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct AcknowledgeEvaluation {
    pub employee_comments: Option<String>,
}

/// Evaluation joined with employee and reviewer metadata.
#[derive(Serialize)]
pub struct EvaluationWithPeople {
    #[serde(flatten)]
    pub evaluation: PerformanceReview,
    pub employee: Option<Employee>,
    pub reviewer: Option<Employee>,
}

fn rating_of(criteria: &[Criterion]) -> Option<f64> {
    let ratings: Vec<f64> = criteria.iter().map(|c| c.rating).collect();
    calc::performance::overall_rating(&ratings)
}

/// Create an evaluation
#[utoipa::path(
    post,
    path = "/api/v1/performance",
    request_body = CreateEvaluation,
    responses(
        (status = 201, description = "Evaluation created", body = PerformanceReview),
        (status = 400, description = "Invalid review period"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Performance"
)]
pub async fn create_evaluation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEvaluation>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    if payload.review_start_date > payload.review_end_date {
        return Err(ApiError::validation(
            "review_start_date cannot be after review_end_date",
        ));
    }

    let reviewer_id = auth.employee_id.unwrap_or(auth.user_id);
    let overall_rating = rating_of(&payload.criteria);

    let result = sqlx::query(
        r#"
        INSERT INTO performance_reviews
            (employee_id, reviewer_id, review_start_date, review_end_date, review_type,
             criteria, goals, overall_rating, strengths, areas_of_improvement,
             reviewer_comments, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(reviewer_id)
    .bind(payload.review_start_date)
    .bind(payload.review_end_date)
    .bind(&payload.review_type)
    .bind(Json(payload.criteria.clone()))
    .bind(Json(payload.goals.clone()))
    .bind(overall_rating)
    .bind(Json(payload.strengths.clone()))
    .bind(Json(payload.areas_of_improvement.clone()))
    .bind(&payload.reviewer_comments)
    .bind(ReviewStatus::Draft.to_string())
    .execute(pool.get_ref())
    .await?;

    let evaluation =
        sqlx::query_as::<_, PerformanceReview>("SELECT * FROM performance_reviews WHERE id = ?")
            .bind(result.last_insert_id())
            .fetch_one(pool.get_ref())
            .await?;

    Ok(response::created(
        "Performance evaluation created successfully",
        evaluation,
    ))
}

/// Evaluations for one employee
#[utoipa::path(
    get,
    path = "/api/v1/performance/employee/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses((status = 200, description = "Evaluations, newest first")),
    security(("bearer_auth" = [])),
    tag = "Performance"
)]
pub async fn list_for_employee(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, PerformanceReview>(
        "SELECT * FROM performance_reviews WHERE employee_id = ? ORDER BY review_end_date DESC",
    )
    .bind(path.into_inner())
    .fetch_all(pool.get_ref())
    .await?;

    Ok(response::ok_list(rows))
}

/// Evaluations still in flight
#[utoipa::path(
    get,
    path = "/api/v1/performance/pending",
    responses(
        (status = 200, description = "Draft/Submitted/Under Review evaluations with people joined"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Performance"
)]
pub async fn pending(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    let rows = sqlx::query_as::<_, PerformanceReview>(
        r#"
        SELECT * FROM performance_reviews
        WHERE status IN (?, ?, ?)
        ORDER BY review_end_date DESC
        "#,
    )
    .bind(ReviewStatus::Draft.to_string())
    .bind(ReviewStatus::Submitted.to_string())
    .bind(ReviewStatus::UnderReview.to_string())
    .fetch_all(pool.get_ref())
    .await?;

    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees")
        .fetch_all(pool.get_ref())
        .await?;
    let by_id: HashMap<u64, Employee> = employees.into_iter().map(|e| (e.id, e)).collect();

    let enriched: Vec<EvaluationWithPeople> = rows
        .into_iter()
        .map(|evaluation| EvaluationWithPeople {
            employee: by_id.get(&evaluation.employee_id).cloned(),
            reviewer: by_id.get(&evaluation.reviewer_id).cloned(),
            evaluation,
        })
        .collect();

    Ok(response::ok_list(enriched))
}

/// Get one evaluation
#[utoipa::path(
    get,
    path = "/api/v1/performance/{evaluation_id}",
    params(("evaluation_id", Path, description = "Evaluation ID")),
    responses(
        (status = 200, body = PerformanceReview),
        (status = 404, description = "Evaluation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Performance"
)]
pub async fn get_evaluation(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let evaluation =
        sqlx::query_as::<_, PerformanceReview>("SELECT * FROM performance_reviews WHERE id = ?")
            .bind(path.into_inner())
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::not_found("Evaluation not found"))?;

    Ok(response::ok(evaluation))
}

/// Update an evaluation
#[utoipa::path(
    put,
    path = "/api/v1/performance/{evaluation_id}",
    params(("evaluation_id", Path, description = "Evaluation ID")),
    request_body = UpdateEvaluation,
    responses(
        (status = 200, description = "Evaluation updated", body = PerformanceReview),
        (status = 404, description = "Evaluation not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Performance"
)]
pub async fn update_evaluation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateEvaluation>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager_or_above()?;

    let evaluation_id = path.into_inner();
    let body = body.into_inner();

    let mut sets: Vec<&str> = Vec::new();
    enum Arg {
        Str(String),
        F64(Option<f64>),
        JsonVal(serde_json::Value),
    }
    let mut args: Vec<Arg> = Vec::new();

    if let Some(criteria) = &body.criteria {
        sets.push("criteria = ?");
        args.push(Arg::JsonVal(serde_json::to_value(criteria).unwrap()));
        // criteria supplied -> the overall rating is recomputed with them
        sets.push("overall_rating = ?");
        args.push(Arg::F64(rating_of(criteria)));
    }
    if let Some(goals) = &body.goals {
        sets.push("goals = ?");
        args.push(Arg::JsonVal(serde_json::to_value(goals).unwrap()));
    }
    if let Some(strengths) = &body.strengths {
        sets.push("strengths = ?");
        args.push(Arg::JsonVal(serde_json::to_value(strengths).unwrap()));
    }
    if let Some(areas) = &body.areas_of_improvement {
        sets.push("areas_of_improvement = ?");
        args.push(Arg::JsonVal(serde_json::to_value(areas).unwrap()));
    }
    if let Some(comments) = body.reviewer_comments {
        sets.push("reviewer_comments = ?");
        args.push(Arg::Str(comments));
    }
    if let Some(status) = body.status {
        sets.push("status = ?");
        args.push(Arg::Str(status.to_string()));
    }

    if sets.is_empty() {
        return Err(ApiError::validation("No fields provided for update"));
    }

    let sql = format!(
        "UPDATE performance_reviews SET {} WHERE id = ?",
        sets.join(", ")
    );
    let mut q = sqlx::query(&sql);
    for arg in &args {
        q = match arg {
            Arg::Str(s) => q.bind(s.as_str()),
            Arg::F64(v) => q.bind(*v),
            Arg::JsonVal(v) => q.bind(v),
        };
    }

    let result = q.bind(evaluation_id).execute(pool.get_ref()).await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Evaluation not found"));
    }

    let evaluation =
        sqlx::query_as::<_, PerformanceReview>("SELECT * FROM performance_reviews WHERE id = ?")
            .bind(evaluation_id)
            .fetch_one(pool.get_ref())
            .await?;

    Ok(response::ok_message("Evaluation updated successfully", evaluation))
}

/// Acknowledge an evaluation (evaluated employee only)
#[utoipa::path(
    put,
    path = "/api/v1/performance/{evaluation_id}/acknowledge",
    params(("evaluation_id", Path, description = "Evaluation ID")),
    request_body = AcknowledgeEvaluation,
    responses(
        (status = 200, description = "Evaluation acknowledged", body = PerformanceReview),
        (status = 403, description = "Only the evaluated employee can acknowledge"),
        (status = 404, description = "Evaluation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Performance"
)]
pub async fn acknowledge(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: Option<web::Json<AcknowledgeEvaluation>>,
) -> Result<HttpResponse, ApiError> {
    let evaluation_id = path.into_inner();

    let evaluation =
        sqlx::query_as::<_, PerformanceReview>("SELECT * FROM performance_reviews WHERE id = ?")
            .bind(evaluation_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::not_found("Evaluation not found"))?;

    // Only the evaluated employee's own action reaches Acknowledged
    if auth.employee_id != Some(evaluation.employee_id) {
        return Err(ApiError::forbidden(
            "Only the evaluated employee can acknowledge",
        ));
    }

    let employee_comments = body.and_then(|b| b.into_inner().employee_comments);

    sqlx::query(
        r#"
        UPDATE performance_reviews
        SET acknowledged = TRUE,
            acknowledged_at = NOW(),
            status = ?,
            employee_comments = COALESCE(?, employee_comments)
        WHERE id = ?
        "#,
    )
    .bind(ReviewStatus::Acknowledged.to_string())
    .bind(employee_comments)
    .bind(evaluation_id)
    .execute(pool.get_ref())
    .await?;

    let updated =
        sqlx::query_as::<_, PerformanceReview>("SELECT * FROM performance_reviews WHERE id = ?")
            .bind(evaluation_id)
            .fetch_one(pool.get_ref())
            .await?;

    Ok(response::ok_message(
        "Evaluation acknowledged successfully",
        updated,
    ))
}

/// Rating analytics for one employee
#[utoipa::path(
    get,
    path = "/api/v1/performance/analytics/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses((status = 200, description = "Rating rollup, or null when no evaluations exist")),
    security(("bearer_auth" = [])),
    tag = "Performance"
)]
pub async fn analytics(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, PerformanceReview>(
        "SELECT * FROM performance_reviews WHERE employee_id = ?",
    )
    .bind(path.into_inner())
    .fetch_all(pool.get_ref())
    .await?;

    let facts: Vec<EvaluationFacts> = rows
        .into_iter()
        .map(|r| EvaluationFacts {
            review_end_date: r.review_end_date,
            overall_rating: r.overall_rating,
            strengths: r.strengths.0,
            areas_of_improvement: r.areas_of_improvement.0,
        })
        .collect();

    match calc::performance::analytics(facts) {
        Some(rollup) => Ok(response::ok(rollup)),
        None => Ok(response::ok_message(
            "No evaluations found",
            serde_json::Value::Null,
        )),
    }
}
