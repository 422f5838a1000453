//! Talent approval flow for host-read creatives.
//!
//! Each step validates, writes, then notifies the other party through the
//! event bus.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use adops_core::error::CoreError;
use adops_core::event_types::{EVENT_TALENT_APPROVAL_REQUESTED, EVENT_TALENT_APPROVAL_RESPONDED};
use adops_core::roles::ROLE_TALENT;
use adops_core::show::CREATIVE_IN_REVIEW;
use adops_core::talent_approval::{creative_status_for, validate_response, APPROVAL_STATUSES};
use adops_core::types::DbId;
use adops_core::validation::validate_one_of;
use adops_db::models::talent_approval::{
    ApprovalListParams, CreateTalentApproval, RequestApproval, RespondApproval, TalentApproval,
};
use adops_db::repositories::{CreativeRepo, TalentApprovalRepo};
use adops_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::show::ensure_show;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSales;
use crate::response::DataResponse;
use crate::state::AppState;

/// Talent users only see requests assigned to them.
fn visible_to(auth: &AuthUser, approval: &TalentApproval) -> bool {
    auth.role != ROLE_TALENT || approval.talent_user_id == auth.user_id
}

/// POST /api/v1/talent-approvals
pub async fn request(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Json(input): Json<RequestApproval>,
) -> AppResult<(StatusCode, Json<DataResponse<TalentApproval>>)> {
    let creative = CreativeRepo::find_by_id(&state.pool, user.organization_id, input.creative_id)
        .await?
        .ok_or(AppError::not_found("Creative", input.creative_id))?;
    let show = ensure_show(&state.pool, user.organization_id, input.show_id).await?;
    let talent_user_id = show.talent_user_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Show '{}' has no talent assigned",
            show.name
        )))
    })?;

    if TalentApprovalRepo::find_pending(&state.pool, creative.id, show.id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A pending approval request already exists for this creative and show".into(),
        )));
    }

    let approval = TalentApprovalRepo::create(
        &state.pool,
        &CreateTalentApproval {
            organization_id: user.organization_id,
            creative_id: creative.id,
            show_id: show.id,
            requested_by: user.user_id,
            talent_user_id,
            request_notes: input.notes,
        },
    )
    .await?;
    CreativeRepo::set_status(&state.pool, creative.id, CREATIVE_IN_REVIEW).await?;

    tracing::info!(
        user_id = user.user_id,
        approval_id = approval.id,
        creative_id = creative.id,
        talent_user_id,
        "Talent approval requested"
    );
    state.event_bus.publish(
        PlatformEvent::new(EVENT_TALENT_APPROVAL_REQUESTED)
            .with_organization(user.organization_id)
            .with_source("talent_approval", approval.id)
            .with_actor(user.user_id)
            .with_recipient(talent_user_id)
            .with_payload(serde_json::json!({
                "creative_id": creative.id,
                "creative_name": creative.name,
                "show_id": show.id,
                "show_name": show.name,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: approval })))
}

/// POST /api/v1/talent-approvals/{id}/respond
///
/// Only the assigned talent or an admin may answer.
pub async fn respond(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RespondApproval>,
) -> AppResult<Json<DataResponse<TalentApproval>>> {
    let approval = TalentApprovalRepo::find_by_id(&state.pool, auth.organization_id, id)
        .await?
        .filter(|a| visible_to(&auth, a))
        .ok_or(AppError::not_found("TalentApproval", id))?;
    if approval.talent_user_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the assigned talent can respond to this request".into(),
        )));
    }

    let comment = input.comment.as_deref().map(str::trim);
    validate_response(&approval.status, &input.decision, comment)?;

    let updated = TalentApprovalRepo::respond(&state.pool, id, &input.decision, comment)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Approval request has already been answered".into(),
            ))
        })?;
    CreativeRepo::set_status(
        &state.pool,
        updated.creative_id,
        creative_status_for(&updated.status),
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        approval_id = id,
        decision = %updated.status,
        "Talent approval answered"
    );
    state.event_bus.publish(
        PlatformEvent::new(EVENT_TALENT_APPROVAL_RESPONDED)
            .with_organization(auth.organization_id)
            .with_source("talent_approval", id)
            .with_actor(auth.user_id)
            .with_recipient(updated.requested_by)
            .with_payload(serde_json::json!({
                "creative_id": updated.creative_id,
                "show_id": updated.show_id,
                "decision": updated.status,
                "comment": updated.response_comment,
            })),
    );

    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/talent-approvals?status=&mine=true
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ApprovalListParams>,
) -> AppResult<Json<DataResponse<Vec<TalentApproval>>>> {
    if let Some(status) = &params.status {
        validate_one_of(status, APPROVAL_STATUSES, "approval status")?;
    }
    let assignee = (params.mine || auth.role == ROLE_TALENT).then_some(auth.user_id);
    let approvals =
        TalentApprovalRepo::list(&state.pool, auth.organization_id, assignee, &params).await?;
    Ok(Json(DataResponse { data: approvals }))
}

/// GET /api/v1/talent-approvals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TalentApproval>>> {
    let approval = TalentApprovalRepo::find_by_id(&state.pool, auth.organization_id, id)
        .await?
        .filter(|a| visible_to(&auth, a))
        .ok_or(AppError::not_found("TalentApproval", id))?;
    Ok(Json(DataResponse { data: approval }))
}
