/*
 * Responsibility
 * - SQLx operations on the donations table (insert + three list views)
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Donation, NewDonation};
use crate::repos::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct DonationRow {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub ngo_id: Uuid,
    pub donor_id: Option<Uuid>,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: f64,
    pub message: Option<String>,
    pub anonymous: bool,
    pub recurring_plan_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<DonationRow> for Donation {
    fn from(row: DonationRow) -> Self {
        Donation {
            id: row.id,
            campaign_id: row.campaign_id,
            ngo_id: row.ngo_id,
            donor_id: row.donor_id,
            donor_name: row.donor_name,
            donor_email: row.donor_email,
            amount: row.amount,
            message: row.message,
            anonymous: row.anonymous,
            recurring_plan_id: row.recurring_plan_id,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, campaign_id, ngo_id, donor_id, donor_name, donor_email, amount, \
                       message, anonymous, recurring_plan_id, created_at";

pub async fn create(db: &PgPool, new: NewDonation) -> RepoResult<Donation> {
    let row = sqlx::query_as::<_, DonationRow>(&format!(
        r#"
        INSERT INTO donations (
            id, campaign_id, ngo_id, donor_id, donor_name, donor_email,
            amount, message, anonymous, recurring_plan_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.campaign_id)
    .bind(new.ngo_id)
    .bind(new.donor_id)
    .bind(&new.donor_name)
    .bind(&new.donor_email)
    .bind(new.amount)
    .bind(new.message.as_deref())
    .bind(new.anonymous)
    .bind(new.recurring_plan_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row.into())
}

async fn list_where(db: &PgPool, column: &'static str, value: Uuid) -> RepoResult<Vec<Donation>> {
    let rows = sqlx::query_as::<_, DonationRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM donations
        WHERE {column} = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(value)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Donation::from).collect())
}

pub async fn list_by_donor(db: &PgPool, donor_id: Uuid) -> RepoResult<Vec<Donation>> {
    list_where(db, "donor_id", donor_id).await
}

pub async fn list_by_ngo(db: &PgPool, ngo_id: Uuid) -> RepoResult<Vec<Donation>> {
    list_where(db, "ngo_id", ngo_id).await
}

pub async fn list_by_campaign(db: &PgPool, campaign_id: Uuid) -> RepoResult<Vec<Donation>> {
    list_where(db, "campaign_id", campaign_id).await
}
