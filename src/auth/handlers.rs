use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    models::{ChangePasswordReq, Claims, LoginReqDto, RegisterReq, TokenType, UserSql},
    response,
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

#[derive(Serialize, Deserialize)]
struct TokenPair {
    access_token: String,
    refresh_token: String,
}

/// User registration handler
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Duplicate email or invalid input")
    ),
    tag = "Auth"
)]
pub async fn register(
    user: web::Json<RegisterReq>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let email = user.email.trim().to_lowercase();

    if email.is_empty() || user.password.is_empty() {
        return Err(ApiError::validation("Email and password must not be empty"));
    }
    if crate::model::role::Role::from_id(user.role_id).is_none() {
        return Err(ApiError::validation("Unknown role id"));
    }

    let hashed = hash_password(&user.password);

    sqlx::query("INSERT INTO users (email, password, role_id) VALUES (?, ?, ?)")
        .bind(&email)
        .bind(&hashed)
        .bind(user.role_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| ApiError::from_sqlx(e, "User already exists"))?;

    Ok(response::created(
        "User registered successfully",
        json!({ "email": email }),
    ))
}

#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(email = %user.email)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    if user.email.trim().is_empty() || user.password.is_empty() {
        return Err(ApiError::validation("Email and password required"));
    }

    debug!("Fetching user from database");

    let db_user = sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, email, password, role_id, employee_id, is_active
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(user.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !db_user.is_active {
        info!(user_id = db_user.id, "Login rejected: inactive account");
        return Err(ApiError::unauthorized("Account is inactive"));
    }

    if verify_password(&user.password, &db_user.password).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let access_token = generate_access_token(
        db_user.id,
        db_user.email.clone(),
        db_user.role_id,
        db_user.employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let (refresh_token, refresh_claims) = generate_refresh_token(
        db_user.id,
        db_user.email.clone(),
        db_user.role_id,
        db_user.employee_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(db_user.id)
    .bind(&refresh_claims.jti)
    .bind(refresh_claims.exp as i64)
    .execute(pool.get_ref())
    .await?;

    // last_login_at bookkeeping is not worth failing a login over
    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = ?")
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
    }

    info!("Login successful");

    Ok(response::ok(TokenPair {
        access_token,
        refresh_token,
    }))
}

pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let claims = refresh_claims_from(&req, &config)?;

    let record = sqlx::query_as::<_, (u64, u64, bool)>(
        r#"
        SELECT id, user_id, revoked
        FROM refresh_tokens
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .fetch_optional(pool.get_ref())
    .await?
    .filter(|&(_, _, revoked)| !revoked)
    .ok_or_else(|| ApiError::unauthorized("Refresh token revoked or unknown"))?;

    // rotate: revoke the presented token before issuing a replacement
    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
        .bind(record.0)
        .execute(pool.get_ref())
        .await?;

    let (new_refresh_token, new_claims) = generate_refresh_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.employee_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(record.1)
    .bind(&new_claims.jti)
    .bind(new_claims.exp as i64)
    .execute(pool.get_ref())
    .await?;

    let access_token = generate_access_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    Ok(response::ok(TokenPair {
        access_token,
        refresh_token: new_refresh_token,
    }))
}

pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> HttpResponse {
    // logout is idempotent: revoke if we can, 204 either way
    if let Ok(claims) = refresh_claims_from(&req, &config) {
        let _ = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE jti = ?")
            .bind(&claims.jti)
            .execute(pool.get_ref())
            .await;
    }
    HttpResponse::NoContent().finish()
}

fn refresh_claims_from(req: &HttpRequest, config: &Config) -> Result<Claims, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing token"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    if claims.token_type != TokenType::Refresh {
        return Err(ApiError::unauthorized("Refresh token required"));
    }

    Ok(claims)
}

#[derive(Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct MeResponse {
    pub id: u64,
    pub email: String,
    pub role_id: u8,
    pub employee_id: Option<u64>,
    pub is_active: bool,
}

/// Current account profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, body = MeResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(auth: AuthUser, pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let profile = sqlx::query_as::<_, MeResponse>(
        r#"
        SELECT id, email, role_id, employee_id, is_active
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(response::ok(profile))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordReq,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password is incorrect")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn change_password(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<ChangePasswordReq>,
) -> Result<HttpResponse, ApiError> {
    if body.current_password.is_empty() || body.new_password.is_empty() {
        return Err(ApiError::validation(
            "Please provide current and new password",
        ));
    }

    let stored: Option<(String,)> = sqlx::query_as("SELECT password FROM users WHERE id = ?")
        .bind(auth.user_id)
        .fetch_optional(pool.get_ref())
        .await?;

    let (hash,) = stored.ok_or_else(|| ApiError::not_found("User not found"))?;

    if verify_password(&body.current_password, &hash).is_err() {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let new_hash = hash_password(&body.new_password);
    sqlx::query("UPDATE users SET password = ? WHERE id = ?")
        .bind(&new_hash)
        .bind(auth.user_id)
        .execute(pool.get_ref())
        .await?;

    Ok(response::ok_message(
        "Password changed successfully",
        json!(null),
    ))
}
