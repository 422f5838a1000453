//! Repository for the `organizations` table.

use adops_core::financials::OPEN_INVOICE_STATUSES;
use adops_core::roles::ROLE_ADMIN;
use adops_core::talent_approval::APPROVAL_PENDING;
use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{
    CreateOrganization, NewOwner, Organization, OrganizationOverview, UpdateOrganization,
};

const COLUMNS: &str = "id, name, slug, contact_email, created_at, updated_at";

pub struct OrganizationRepo;

impl OrganizationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let query = format!(
            "INSERT INTO organizations (name, slug, contact_email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.contact_email)
            .fetch_one(pool)
            .await
    }

    /// Create an organization together with its first admin user.
    ///
    /// Both rows are written in one transaction; returns the organization
    /// and the new user's id.
    pub async fn create_with_owner(
        pool: &PgPool,
        input: &CreateOrganization,
        owner: &NewOwner,
    ) -> Result<(Organization, DbId), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO organizations (name, slug, contact_email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let organization = sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.contact_email)
            .fetch_one(&mut *tx)
            .await?;

        let user_id: DbId = sqlx::query_scalar(
            "INSERT INTO users (organization_id, username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4, (SELECT id FROM roles WHERE name = $5))
             RETURNING id",
        )
        .bind(organization.id)
        .bind(&owner.username)
        .bind(&owner.email)
        .bind(&owner.password_hash)
        .bind(ROLE_ADMIN)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((organization, user_id))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE slug = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Update an organization. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrganization,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET
                name = COALESCE($2, name),
                contact_email = COALESCE($3, contact_email)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_email)
            .fetch_optional(pool)
            .await
    }

    /// Dashboard counts, computed in a single round trip.
    pub async fn overview(pool: &PgPool, id: DbId) -> Result<OrganizationOverview, sqlx::Error> {
        let open: Vec<String> = OPEN_INVOICE_STATUSES.iter().map(|s| s.to_string()).collect();
        sqlx::query_as::<_, OrganizationOverview>(
            "SELECT
                (SELECT COUNT(*) FROM shows
                  WHERE organization_id = $1 AND deleted_at IS NULL) AS show_count,
                (SELECT COUNT(*) FROM campaigns
                  WHERE organization_id = $1 AND deleted_at IS NULL AND status = 'active')
                  AS active_campaign_count,
                (SELECT COUNT(*) FROM invoices
                  WHERE organization_id = $1 AND status = ANY($2)) AS open_invoice_count,
                (SELECT COALESCE(SUM(GREATEST(i.amount_cents - COALESCE(p.paid, 0), 0)), 0)::BIGINT
                   FROM invoices i
                   LEFT JOIN (SELECT invoice_id, SUM(amount_cents) AS paid
                                FROM payments GROUP BY invoice_id) p ON p.invoice_id = i.id
                  WHERE i.organization_id = $1 AND i.status = ANY($2)) AS outstanding_cents,
                (SELECT COUNT(*) FROM talent_approvals
                  WHERE organization_id = $1 AND status = $3) AS pending_approval_count",
        )
        .bind(id)
        .bind(&open)
        .bind(APPROVAL_PENDING)
        .fetch_one(pool)
        .await
    }
}
