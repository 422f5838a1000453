//! Repository layer: one zero-sized struct per table group, each method
//! taking a `&PgPool`.

pub mod analytics_repo;
pub mod campaign_repo;
pub mod creative_repo;
pub mod episode_repo;
pub mod event_repo;
pub mod expense_repo;
pub mod financial_repo;
pub mod invoice_repo;
pub mod notification_repo;
pub mod organization_repo;
pub mod proposal_repo;
pub mod role_repo;
pub mod session_repo;
pub mod show_repo;
pub mod talent_approval_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use campaign_repo::CampaignRepo;
pub use creative_repo::CreativeRepo;
pub use episode_repo::EpisodeRepo;
pub use event_repo::EventRepo;
pub use expense_repo::ExpenseRepo;
pub use financial_repo::FinancialRepo;
pub use invoice_repo::{InvoiceRepo, PaymentOutcome};
pub use notification_repo::NotificationRepo;
pub use organization_repo::OrganizationRepo;
pub use proposal_repo::ProposalRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use show_repo::ShowRepo;
pub use talent_approval_repo::TalentApprovalRepo;
pub use user_repo::UserRepo;
