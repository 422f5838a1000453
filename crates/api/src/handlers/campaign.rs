//! Handlers for the `/campaigns` resource, its flights and pacing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use adops_core::campaign::{pacing, validate_campaign_status, validate_campaign_transition, Pacing};
use adops_core::error::CoreError;
use adops_core::event_types::EVENT_CAMPAIGN_STATUS_CHANGED;
use adops_core::revenue::Placement;
use adops_core::types::DbId;
use adops_core::validation::{validate_date_range, validate_name};
use adops_db::models::campaign::{
    Campaign, CampaignListParams, CampaignShow, CreateCampaign, CreateCampaignShow, UpdateCampaign,
};
use adops_db::repositories::{CampaignRepo, InvoiceRepo};
use adops_db::DbPool;
use adops_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::show::ensure_show;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSales;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CampaignPacing {
    pub campaign_id: DbId,
    #[serde(flatten)]
    pub pacing: Pacing,
}

/// Load a live campaign of the organization or fail with 404.
pub(crate) async fn ensure_campaign(
    pool: &DbPool,
    organization_id: DbId,
    campaign_id: DbId,
) -> AppResult<Campaign> {
    CampaignRepo::find_by_id(pool, organization_id, campaign_id)
        .await?
        .ok_or(AppError::not_found("Campaign", campaign_id))
}

fn validate_budget(budget_cents: Option<i64>) -> AppResult<()> {
    if budget_cents.is_some_and(|b| b < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "budget_cents must not be negative".into(),
        )));
    }
    Ok(())
}

/// POST /api/v1/campaigns
pub async fn create(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Json(input): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<DataResponse<Campaign>>)> {
    validate_name(&input.name, "name")?;
    validate_name(&input.advertiser_name, "advertiser_name")?;
    validate_date_range(input.start_date, input.end_date)?;
    validate_budget(input.budget_cents)?;

    let campaign = CampaignRepo::create(&state.pool, user.organization_id, &input).await?;
    tracing::info!(user_id = user.user_id, campaign_id = campaign.id, "Campaign created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/campaigns?status=&advertiser=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<CampaignListParams>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    if let Some(status) = &params.status {
        validate_campaign_status(status)?;
    }
    let campaigns = CampaignRepo::list(&state.pool, auth.organization_id, &params).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = ensure_campaign(&state.pool, auth.organization_id, id).await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/campaigns/{id}
///
/// Status is not editable here; use `PUT /campaigns/{id}/status`.
pub async fn update(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let existing = ensure_campaign(&state.pool, user.organization_id, id).await?;
    if let Some(name) = &input.name {
        validate_name(name, "name")?;
    }
    if let Some(advertiser) = &input.advertiser_name {
        validate_name(advertiser, "advertiser_name")?;
    }
    validate_date_range(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;
    validate_budget(input.budget_cents)?;

    let campaign = CampaignRepo::update(&state.pool, user.organization_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Campaign", id))?;
    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/v1/campaigns/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CampaignRepo::soft_delete(&state.pool, user.organization_id, id).await? {
        tracing::info!(user_id = user.user_id, campaign_id = id, "Campaign deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Campaign", id))
    }
}

/// PUT /api/v1/campaigns/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let existing = ensure_campaign(&state.pool, user.organization_id, id).await?;
    validate_campaign_transition(&existing.status, &input.status)?;

    let campaign = CampaignRepo::set_status(&state.pool, user.organization_id, id, &input.status)
        .await?
        .ok_or(AppError::not_found("Campaign", id))?;

    tracing::info!(
        user_id = user.user_id,
        campaign_id = id,
        from = %existing.status,
        to = %campaign.status,
        "Campaign status changed"
    );
    state.event_bus.publish(
        PlatformEvent::new(EVENT_CAMPAIGN_STATUS_CHANGED)
            .with_organization(user.organization_id)
            .with_source("campaign", id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "campaign_name": campaign.name,
                "from": existing.status,
                "to": campaign.status,
            })),
    );

    Ok(Json(DataResponse { data: campaign }))
}

/// GET /api/v1/campaigns/{id}/pacing
///
/// Delivered revenue is what has been invoiced against the campaign.
pub async fn get_pacing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CampaignPacing>>> {
    let campaign = ensure_campaign(&state.pool, auth.organization_id, id).await?;
    let delivered = InvoiceRepo::invoiced_for_campaign(&state.pool, id).await?;
    let today = Utc::now().date_naive();

    Ok(Json(DataResponse {
        data: CampaignPacing {
            campaign_id: id,
            pacing: pacing(
                campaign.budget_cents,
                delivered,
                campaign.start_date,
                campaign.end_date,
                today,
            ),
        },
    }))
}

// ---------------------------------------------------------------------------
// Flights
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns/{id}/shows
pub async fn list_flights(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CampaignShow>>>> {
    ensure_campaign(&state.pool, auth.organization_id, id).await?;
    let flights = CampaignRepo::list_flights(&state.pool, id).await?;
    Ok(Json(DataResponse { data: flights }))
}

/// POST /api/v1/campaigns/{id}/shows
pub async fn add_flight(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCampaignShow>,
) -> AppResult<(StatusCode, Json<DataResponse<CampaignShow>>)> {
    ensure_campaign(&state.pool, user.organization_id, id).await?;
    ensure_show(&state.pool, user.organization_id, input.show_id).await?;
    Placement::parse(&input.placement)?;
    if input.slots.is_some_and(|s| s < 1) {
        return Err(AppError::Core(CoreError::Validation(
            "slots must be at least 1".into(),
        )));
    }

    let flight = CampaignRepo::add_flight(&state.pool, id, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        campaign_id = id,
        show_id = input.show_id,
        "Flight added"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: flight })))
}

/// DELETE /api/v1/campaigns/{id}/shows/{flight_id}
pub async fn remove_flight(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path((id, flight_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_campaign(&state.pool, user.organization_id, id).await?;
    if CampaignRepo::remove_flight(&state.pool, id, flight_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("CampaignShow", flight_id))
    }
}
