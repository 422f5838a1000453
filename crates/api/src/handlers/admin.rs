//! Handlers for `/admin/users`: user management within the caller's
//! organization.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use adops_core::error::CoreError;
use adops_core::types::DbId;
use adops_core::validation::{validate_email, validate_name};
use adops_db::models::event::ActivityEntry;
use adops_db::models::role::Role;
use adops_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use adops_db::repositories::{EventRepo, RoleRepo, SessionRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Role name: `admin`, `sales`, `finance` or `talent`.
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub event_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

async fn resolve_role(state: &AppState, name: &str) -> AppResult<Role> {
    RoleRepo::find_by_name(&state.pool, name).await?.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!("Unknown role '{name}'")))
    })
}

async fn user_to_response(state: &AppState, user: &User) -> AppResult<UserResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(UserResponse::from_user(user, role))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_name(&input.username, "username")?;
    validate_email(&input.email)?;
    validate_password_strength(&input.password)?;
    let role = resolve_role(&state, &input.role).await?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            organization_id: admin.organization_id,
            username: input.username,
            email: input.email,
            password_hash,
            role_id: role.id,
        },
    )
    .await?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = user.id,
        role = %role.name,
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from_user(&user, role.name),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool, admin.organization_id).await?;
    let role_names = RoleRepo::names_by_id(&state.pool).await?;

    let data = users
        .iter()
        .map(|u| {
            let role = role_names
                .get(&u.role_id)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            UserResponse::from_user(u, role)
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_in_org(&state.pool, admin.organization_id, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(DataResponse {
        data: user_to_response(&state, &user).await?,
    }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(username) = &input.username {
        validate_name(username, "username")?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    let role_id = match &input.role {
        Some(name) => Some(resolve_role(&state, name).await?.id),
        None => None,
    };
    if id == admin.user_id && input.is_active == Some(false) {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot deactivate their own account".into(),
        )));
    }

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        role_id,
        is_active: input.is_active,
    };
    let user = UserRepo::update(&state.pool, admin.organization_id, id, &update)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    tracing::info!(admin_id = admin.user_id, user_id = id, "User updated");
    Ok(Json(DataResponse {
        data: user_to_response(&state, &user).await?,
    }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivates the account and revokes its sessions. Rows referencing the
/// user stay intact.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot deactivate their own account".into(),
        )));
    }
    if UserRepo::deactivate(&state.pool, admin.organization_id, id).await? {
        let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
        tracing::info!(admin_id = admin.user_id, user_id = id, revoked, "User deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("User", id))
    }
}

/// POST /api/v1/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)?;
    UserRepo::find_in_org(&state.pool, admin.organization_id, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, id, &hashed).await?;
    // Existing refresh tokens were issued against the old password.
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, revoked, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/activity?event_type=&limit=&offset=
///
/// The organization's persisted event log, newest first.
pub async fn activity(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<DataResponse<Vec<ActivityEntry>>>> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let data = EventRepo::activity(
        &state.pool,
        admin.organization_id,
        params.event_type.as_deref(),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse { data }))
}
