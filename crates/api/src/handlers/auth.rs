//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use adops_core::error::CoreError;
use adops_core::roles::ROLE_ADMIN;
use adops_core::validation::{validate_email, validate_name, validate_slug};
use adops_db::models::organization::{CreateOrganization, NewOwner};
use adops_db::models::session::CreateSession;
use adops_db::models::user::{User, UserResponse};
use adops_db::repositories::{OrganizationRepo, RoleRepo, SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed logins before the account is locked.
const MAX_FAILED_ATTEMPTS: i32 = 5;

const LOCK_DURATION_MINS: i64 = 15;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub organization_name: String,
    pub organization_slug: String,
    pub contact_email: Option<String>,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if user.locked_until.is_some_and(|until| until > Utc::now()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !valid {
        let until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
        let failures =
            UserRepo::record_failed_login(&state.pool, user.id, MAX_FAILED_ATTEMPTS, until).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            tracing::warn!(user_id = user.id, failures, "Account locked after repeated failed logins");
        }
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    tracing::info!(user_id = user.id, organization_id = user.organization_id, "User logged in");
    let pruned = SessionRepo::prune_for_user(&state.pool, user.id).await?;
    if pruned > 0 {
        tracing::debug!(user_id = user.id, pruned, "Pruned stale sessions");
    }
    Ok(Json(issue_tokens(&state, &headers, &user, role).await?))
}

/// POST /api/v1/auth/register
///
/// Sign up a new organization. The caller becomes its first admin and is
/// logged in straight away.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_name(&input.organization_name, "organization_name")?;
    validate_slug(&input.organization_slug)?;
    if let Some(contact) = &input.contact_email {
        validate_email(contact)?;
    }
    validate_name(&input.username, "username")?;
    validate_email(&input.email)?;
    validate_password_strength(&input.password)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let (organization, user_id) = OrganizationRepo::create_with_owner(
        &state.pool,
        &CreateOrganization {
            name: input.organization_name,
            slug: input.organization_slug,
            contact_email: input.contact_email,
        },
        &NewOwner {
            username: input.username,
            email: input.email,
            password_hash,
        },
    )
    .await?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::not_found("User", user_id))?;

    tracing::info!(
        organization_id = organization.id,
        user_id,
        slug = %organization.slug,
        "Organization registered"
    );

    let response = issue_tokens(&state, &headers, &user, ROLE_ADMIN.to_string()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented session is redeemed and a new
/// one issued. A token can be redeemed once.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let hash = hash_refresh_token(&input.refresh_token);
    let session = SessionRepo::redeem(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(issue_tokens(&state, &headers, &user, role).await?))
}

/// POST /api/v1/auth/logout
///
/// Revokes every session of the caller.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_in_org(&state.pool, auth.organization_id, auth.user_id)
        .await?
        .ok_or(AppError::not_found("User", auth.user_id))?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, role),
    }))
}

async fn issue_tokens(
    state: &AppState,
    headers: &HeaderMap,
    user: &User,
    role: String,
) -> AppResult<AuthResponse> {
    let access_token =
        generate_access_token(user.id, user.organization_id, &role, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
            user_agent: header_text(headers, USER_AGENT.as_str()),
            ip_address: client_ip(headers),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from_user(user, role),
    })
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(512).collect())
}

/// First hop of `X-Forwarded-For`, as set by the reverse proxy.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_text(headers, "x-forwarded-for")
        .and_then(|list| list.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
}
