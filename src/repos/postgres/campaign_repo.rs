/*
 * Responsibility
 * - SQLx operations on the campaigns table
 * - raised_amount is incremented in SQL so concurrent donations do not overwrite each other
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Campaign, CampaignPatch, CampaignStatus, NewCampaign};
use crate::repos::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct CampaignRow {
    pub id: Uuid,
    pub ngo_id: Uuid,
    pub title: String,
    pub description: String,
    pub goal_amount: f64,
    pub raised_amount: f64,
    pub end_date: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = RepoError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        let status = CampaignStatus::parse(&row.status).ok_or_else(|| {
            RepoError::Corrupt(format!("campaign {}: status '{}'", row.id, row.status))
        })?;

        Ok(Campaign {
            id: row.id,
            ngo_id: row.ngo_id,
            title: row.title,
            description: row.description,
            goal_amount: row.goal_amount,
            raised_amount: row.raised_amount,
            end_date: row.end_date,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, ngo_id, title, description, goal_amount, raised_amount, end_date, \
                       status, created_at, updated_at";

pub async fn create(db: &PgPool, new: NewCampaign) -> RepoResult<Campaign> {
    let row = sqlx::query_as::<_, CampaignRow>(&format!(
        r#"
        INSERT INTO campaigns (id, ngo_id, title, description, goal_amount, end_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.ngo_id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.goal_amount)
    .bind(new.end_date)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    row.try_into()
}

pub async fn get(db: &PgPool, id: Uuid) -> RepoResult<Option<Campaign>> {
    let row = sqlx::query_as::<_, CampaignRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM campaigns
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    row.map(Campaign::try_from).transpose()
}

pub async fn list_by_ngo(db: &PgPool, ngo_id: Uuid) -> RepoResult<Vec<Campaign>> {
    let rows = sqlx::query_as::<_, CampaignRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM campaigns
        WHERE ngo_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(ngo_id)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(Campaign::try_from).collect()
}

pub async fn update(db: &PgPool, id: Uuid, patch: CampaignPatch) -> RepoResult<Option<Campaign>> {
    // end_date: Some(Some(v)) -> set to v
    // end_date: Some(None)    -> set to NULL
    // end_date: None          -> do not update
    let row = sqlx::query_as::<_, CampaignRow>(&format!(
        r#"
        UPDATE campaigns
        SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            goal_amount = COALESCE($4, goal_amount),
            end_date = CASE
                WHEN $5 = false THEN end_date
                ELSE $6
            END,
            status = CASE
                WHEN $7::text IS NOT NULL THEN $7::text
                WHEN status = 'active' AND raised_amount >= COALESCE($4, goal_amount) THEN 'completed'
                ELSE status
            END,
            updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(patch.title.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.goal_amount)
    .bind(patch.end_date.is_some()) // $5: flag to set end_date
    .bind(patch.end_date.flatten()) // $6: new end_date value
    .bind(patch.status.map(|s| s.as_str()))
    .fetch_optional(db)
    .await?;

    row.map(Campaign::try_from).transpose()
}

pub async fn add_to_raised(db: &PgPool, id: Uuid, amount: f64) -> RepoResult<Option<Campaign>> {
    let row = sqlx::query_as::<_, CampaignRow>(&format!(
        r#"
        UPDATE campaigns
        SET
            raised_amount = raised_amount + $2,
            status = CASE
                WHEN status = 'active' AND raised_amount + $2 >= goal_amount THEN 'completed'
                ELSE status
            END,
            updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(amount)
    .fetch_optional(db)
    .await?;

    row.map(Campaign::try_from).transpose()
}
