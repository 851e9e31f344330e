/*
 * Responsibility
 * - SQLx operations on the recurring_plans table
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Frequency, NewRecurringPlan, PlanPatch, PlanStatus, RecurringPlan};
use crate::repos::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub campaign_id: Uuid,
    pub ngo_id: Uuid,
    pub amount: f64,
    pub frequency: String,
    pub status: String,
    pub next_charge_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for RecurringPlan {
    type Error = RepoError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let frequency = Frequency::parse(&row.frequency).ok_or_else(|| {
            RepoError::Corrupt(format!("plan {}: frequency '{}'", row.id, row.frequency))
        })?;
        let status = PlanStatus::parse(&row.status)
            .ok_or_else(|| RepoError::Corrupt(format!("plan {}: status '{}'", row.id, row.status)))?;

        Ok(RecurringPlan {
            id: row.id,
            donor_id: row.donor_id,
            campaign_id: row.campaign_id,
            ngo_id: row.ngo_id,
            amount: row.amount,
            frequency,
            status,
            next_charge_at: row.next_charge_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, donor_id, campaign_id, ngo_id, amount, frequency, status, \
                       next_charge_at, created_at, updated_at";

pub async fn create(db: &PgPool, new: NewRecurringPlan) -> RepoResult<RecurringPlan> {
    let row = sqlx::query_as::<_, PlanRow>(&format!(
        r#"
        INSERT INTO recurring_plans (id, donor_id, campaign_id, ngo_id, amount, frequency, next_charge_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.donor_id)
    .bind(new.campaign_id)
    .bind(new.ngo_id)
    .bind(new.amount)
    .bind(new.frequency.as_str())
    .bind(new.next_charge_at)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    row.try_into()
}

pub async fn get(db: &PgPool, id: Uuid) -> RepoResult<Option<RecurringPlan>> {
    let row = sqlx::query_as::<_, PlanRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM recurring_plans
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    row.map(RecurringPlan::try_from).transpose()
}

pub async fn list_by_donor(db: &PgPool, donor_id: Uuid) -> RepoResult<Vec<RecurringPlan>> {
    let rows = sqlx::query_as::<_, PlanRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM recurring_plans
        WHERE donor_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(donor_id)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(RecurringPlan::try_from).collect()
}

pub async fn update(db: &PgPool, id: Uuid, patch: PlanPatch) -> RepoResult<Option<RecurringPlan>> {
    let row = sqlx::query_as::<_, PlanRow>(&format!(
        r#"
        UPDATE recurring_plans
        SET
            amount = COALESCE($2, amount),
            frequency = COALESCE($3, frequency),
            status = COALESCE($4, status),
            next_charge_at = COALESCE($5, next_charge_at),
            updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(patch.amount)
    .bind(patch.frequency.map(|f| f.as_str()))
    .bind(patch.status.map(|s| s.as_str()))
    .bind(patch.next_charge_at)
    .fetch_optional(db)
    .await?;

    row.map(RecurringPlan::try_from).transpose()
}
