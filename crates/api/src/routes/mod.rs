pub mod admin;
pub mod auth;
pub mod campaign;
pub mod financials;
pub mod health;
pub mod notification;
pub mod organization;
pub mod proposal;
pub mod revenue;
pub mod show;
pub mod talent_approval;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/register                                   sign up an organization (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update, deactivate
/// /admin/users/{id}/reset-password                 reset password
/// /admin/activity                                  persisted event log
///
/// /organization                                    get, update
/// /organization/overview                           counts for the dashboard
///
/// /shows                                           list, create
/// /shows/{id}                                      get, update, delete
/// /shows/{id}/campaigns                            campaigns flighted on the show
/// /shows/{id}/episodes                             list, create
/// /shows/{id}/revenue-settings                     get, replace rate card
/// /shows/{id}/revenue-estimate                     per-episode estimate
/// /shows/{id}/analytics                            download analytics
/// /shows/{id}/pnl                                  show profit & loss
///
/// /episodes/{id}                                   get, update, delete
/// /episodes/{id}/downloads                         ingest daily downloads
///
/// /campaigns                                       list, create
/// /campaigns/{id}                                  get, update, delete
/// /campaigns/{id}/status                           transition (PUT)
/// /campaigns/{id}/pacing                           budget pacing
/// /campaigns/{id}/shows                            flights: list, add
/// /campaigns/{id}/shows/{flight_id}                remove flight
/// /campaigns/{id}/creatives                        list, create
/// /creatives/{id}                                  get, update, delete
///
/// /proposals                                       list, create
/// /proposals/{id}                                  get (with totals), update, delete
/// /proposals/{id}/status                           transition (PUT)
/// /proposals/{id}/items                            list, add
/// /proposals/{id}/items/{item_id}                  remove
///
/// /talent-approvals                                list, request
/// /talent-approvals/{id}                           get
/// /talent-approvals/{id}/respond                   answer (POST)
///
/// /invoices                                        list, create
/// /invoices/mark-overdue                           overdue sweep (POST)
/// /invoices/{id}                                   get, update, delete
/// /invoices/{id}/status                            transition (PUT)
/// /invoices/{id}/payments                          list, record
///
/// /expenses                                        list, create
/// /expenses/{id}                                   get, update, delete
///
/// /financials/summary                              organization P&L
/// /financials/export                               csv | json | pdf
///
/// /revenue/estimate                                stateless calculator (POST)
///
/// /notifications                                   list
/// /notifications/read-all                          mark all read (POST)
/// /notifications/unread-count                      unread count
/// /notifications/{id}/read                         mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, register, refresh, logout, me).
        .nest("/auth", auth::router())
        // Admin user management.
        .nest("/admin", admin::router())
        // The caller's organization.
        .nest("/organization", organization::router())
        // Shows and their episodes, rate cards, analytics and P&L.
        .nest("/shows", show::router())
        .nest("/episodes", show::episode_router())
        // Campaigns, flights and creatives.
        .nest("/campaigns", campaign::router())
        .nest("/creatives", campaign::creative_router())
        // Sales proposals.
        .nest("/proposals", proposal::router())
        // Host-read approval flow.
        .nest("/talent-approvals", talent_approval::router())
        // Billing and costs.
        .nest("/invoices", financials::invoice_router())
        .nest("/expenses", financials::expense_router())
        .nest("/financials", financials::report_router())
        // Stateless revenue calculator.
        .nest("/revenue", revenue::router())
        // In-app notifications.
        .nest("/notifications", notification::router())
}
