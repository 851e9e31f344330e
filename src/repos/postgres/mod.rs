/*
 * Responsibility
 * - Postgres backend: pool construction, migrations, and the trait impls
 *   that delegate to the per-table query modules
 */
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::models::{
    Campaign, CampaignPatch, Donation, NewCampaign, NewDonation, NewRecurringPlan, NewUser,
    PlanPatch, RecurringPlan, Role, User,
};
use crate::repos::{
    CampaignRepo, DonationRepo, RecurringRepo, RepoError, RepoResult, UserPatch, UserRepo,
};

pub mod campaign_repo;
pub mod donation_repo;
pub mod recurring_repo;
pub mod user_repo;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, RepoError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| RepoError::Db(e.into()))?;

    Ok(pool)
}

#[derive(Clone, Debug)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgStore {
    async fn create(&self, new: NewUser) -> RepoResult<User> {
        user_repo::create(&self.db, new).await
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        user_repo::get(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        user_repo::get_by_email(&self.db, email).await
    }

    async fn list_by_role(&self, role: Role) -> RepoResult<Vec<User>> {
        user_repo::list_by_role(&self.db, role).await
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> RepoResult<Option<User>> {
        user_repo::update(&self.db, id, patch).await
    }
}

#[async_trait]
impl CampaignRepo for PgStore {
    async fn create(&self, new: NewCampaign) -> RepoResult<Campaign> {
        campaign_repo::create(&self.db, new).await
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Campaign>> {
        campaign_repo::get(&self.db, id).await
    }

    async fn list_by_ngo(&self, ngo_id: Uuid) -> RepoResult<Vec<Campaign>> {
        campaign_repo::list_by_ngo(&self.db, ngo_id).await
    }

    async fn update(&self, id: Uuid, patch: CampaignPatch) -> RepoResult<Option<Campaign>> {
        campaign_repo::update(&self.db, id, patch).await
    }

    async fn add_to_raised(&self, id: Uuid, amount: f64) -> RepoResult<Option<Campaign>> {
        campaign_repo::add_to_raised(&self.db, id, amount).await
    }
}

#[async_trait]
impl DonationRepo for PgStore {
    async fn create(&self, new: NewDonation) -> RepoResult<Donation> {
        donation_repo::create(&self.db, new).await
    }

    async fn list_by_donor(&self, donor_id: Uuid) -> RepoResult<Vec<Donation>> {
        donation_repo::list_by_donor(&self.db, donor_id).await
    }

    async fn list_by_ngo(&self, ngo_id: Uuid) -> RepoResult<Vec<Donation>> {
        donation_repo::list_by_ngo(&self.db, ngo_id).await
    }

    async fn list_by_campaign(&self, campaign_id: Uuid) -> RepoResult<Vec<Donation>> {
        donation_repo::list_by_campaign(&self.db, campaign_id).await
    }
}

#[async_trait]
impl RecurringRepo for PgStore {
    async fn create(&self, new: NewRecurringPlan) -> RepoResult<RecurringPlan> {
        recurring_repo::create(&self.db, new).await
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RecurringPlan>> {
        recurring_repo::get(&self.db, id).await
    }

    async fn list_by_donor(&self, donor_id: Uuid) -> RepoResult<Vec<RecurringPlan>> {
        recurring_repo::list_by_donor(&self.db, donor_id).await
    }

    async fn update(&self, id: Uuid, patch: PlanPatch) -> RepoResult<Option<RecurringPlan>> {
        recurring_repo::update(&self.db, id, patch).await
    }
}
