//! Handlers for the `/proposals` resource and its line items.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use adops_core::event_types::EVENT_PROPOSAL_ACCEPTED;
use adops_core::proposal::{
    ensure_editable, line_total_cents, totals, validate_discount, validate_line_item,
    validate_proposal_transition, PROPOSAL_ACCEPTED, PROPOSAL_STATUSES,
};
use adops_core::revenue::Placement;
use adops_core::types::{Cents, DbId};
use adops_core::validation::{validate_name, validate_one_of};
use adops_db::models::proposal::{
    CreateProposal, CreateProposalItem, PricedProposalItem, Proposal, ProposalDetail,
    ProposalItem, ProposalListParams, UpdateProposal,
};
use adops_db::repositories::ProposalRepo;
use adops_db::DbPool;
use adops_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::campaign::{ensure_campaign, StatusRequest};
use crate::handlers::show::ensure_show;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSales;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_proposal(pool: &DbPool, organization_id: DbId, id: DbId) -> AppResult<Proposal> {
    ProposalRepo::find_by_id(pool, organization_id, id)
        .await?
        .ok_or(AppError::not_found("Proposal", id))
}

/// Price every line item and roll them up with the proposal discount.
async fn detail_for(pool: &DbPool, proposal: Proposal) -> AppResult<ProposalDetail> {
    let items: Vec<PricedProposalItem> = ProposalRepo::list_items(pool, proposal.id)
        .await?
        .into_iter()
        .map(|item| {
            let line_total_cents = line_total_cents(&item.pricing_input());
            PricedProposalItem { item, line_total_cents }
        })
        .collect();
    let line_totals: Vec<Cents> = items.iter().map(|i| i.line_total_cents).collect();
    let totals = totals(&line_totals, proposal.discount_pct);
    Ok(ProposalDetail { proposal, items, totals })
}

/// POST /api/v1/proposals
pub async fn create(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Json(input): Json<CreateProposal>,
) -> AppResult<(StatusCode, Json<DataResponse<Proposal>>)> {
    validate_name(&input.client_name, "client_name")?;
    validate_name(&input.title, "title")?;
    if let Some(discount) = input.discount_pct {
        validate_discount(discount)?;
    }
    if let Some(campaign_id) = input.campaign_id {
        ensure_campaign(&state.pool, user.organization_id, campaign_id).await?;
    }

    let proposal =
        ProposalRepo::create(&state.pool, user.organization_id, user.user_id, &input).await?;
    tracing::info!(user_id = user.user_id, proposal_id = proposal.id, "Proposal created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: proposal })))
}

/// GET /api/v1/proposals?status=&campaign_id=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ProposalListParams>,
) -> AppResult<Json<DataResponse<Vec<Proposal>>>> {
    if let Some(status) = &params.status {
        validate_one_of(status, PROPOSAL_STATUSES, "proposal status")?;
    }
    let proposals = ProposalRepo::list(&state.pool, auth.organization_id, &params).await?;
    Ok(Json(DataResponse { data: proposals }))
}

/// GET /api/v1/proposals/{id}
///
/// Returns the proposal with priced line items and totals.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProposalDetail>>> {
    let proposal = ensure_proposal(&state.pool, auth.organization_id, id).await?;
    let detail = detail_for(&state.pool, proposal).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/proposals/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProposal>,
) -> AppResult<Json<DataResponse<Proposal>>> {
    let existing = ensure_proposal(&state.pool, user.organization_id, id).await?;
    ensure_editable(&existing.status)?;
    if let Some(client) = &input.client_name {
        validate_name(client, "client_name")?;
    }
    if let Some(title) = &input.title {
        validate_name(title, "title")?;
    }
    if let Some(discount) = input.discount_pct {
        validate_discount(discount)?;
    }
    if let Some(campaign_id) = input.campaign_id {
        ensure_campaign(&state.pool, user.organization_id, campaign_id).await?;
    }

    let proposal = ProposalRepo::update(&state.pool, user.organization_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Proposal", id))?;
    Ok(Json(DataResponse { data: proposal }))
}

/// DELETE /api/v1/proposals/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProposalRepo::soft_delete(&state.pool, user.organization_id, id).await? {
        tracing::info!(user_id = user.user_id, proposal_id = id, "Proposal deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Proposal", id))
    }
}

/// PUT /api/v1/proposals/{id}/status
///
/// Acceptance notifies the proposal's author.
pub async fn set_status(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Proposal>>> {
    let existing = ensure_proposal(&state.pool, user.organization_id, id).await?;
    validate_proposal_transition(&existing.status, &input.status)?;

    let proposal = ProposalRepo::set_status(&state.pool, user.organization_id, id, &input.status)
        .await?
        .ok_or(AppError::not_found("Proposal", id))?;
    tracing::info!(
        user_id = user.user_id,
        proposal_id = id,
        status = %proposal.status,
        "Proposal status changed"
    );

    if proposal.status == PROPOSAL_ACCEPTED {
        let detail = detail_for(&state.pool, proposal.clone()).await?;
        let mut event = PlatformEvent::new(EVENT_PROPOSAL_ACCEPTED)
            .with_organization(user.organization_id)
            .with_source("proposal", id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "title": proposal.title,
                "client_name": proposal.client_name,
                "total_cents": detail.totals.total_cents,
            }));
        if let Some(author) = proposal.created_by {
            event = event.with_recipient(author);
        }
        state.event_bus.publish(event);
    }

    Ok(Json(DataResponse { data: proposal }))
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// GET /api/v1/proposals/{id}/items
pub async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProposalItem>>>> {
    ensure_proposal(&state.pool, auth.organization_id, id).await?;
    let items = ProposalRepo::list_items(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/proposals/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
    Json(input): Json<CreateProposalItem>,
) -> AppResult<(StatusCode, Json<DataResponse<PricedProposalItem>>)> {
    let proposal = ensure_proposal(&state.pool, user.organization_id, id).await?;
    ensure_editable(&proposal.status)?;
    Placement::parse(&input.placement)?;
    validate_line_item(&input.pricing_input())?;
    ensure_show(&state.pool, user.organization_id, input.show_id).await?;

    let item = ProposalRepo::add_item(&state.pool, id, &input).await?;
    let line_total_cents = line_total_cents(&item.pricing_input());
    tracing::info!(
        user_id = user.user_id,
        proposal_id = id,
        item_id = item.id,
        "Proposal item added"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PricedProposalItem { item, line_total_cents },
        }),
    ))
}

/// DELETE /api/v1/proposals/{id}/items/{item_id}
pub async fn remove_item(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let proposal = ensure_proposal(&state.pool, user.organization_id, id).await?;
    ensure_editable(&proposal.status)?;
    if ProposalRepo::remove_item(&state.pool, id, item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("ProposalItem", item_id))
    }
}
