/*
 * Responsibility
 * - Storage interfaces the handlers depend on (one trait per aggregate)
 * - `Repos` bundles them behind Arc so AppState stays cheap to clone
 * - Two backends: `postgres` (sqlx) for deployments, `memory` for dev and tests
 */
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Campaign, CampaignPatch, Donation, NewCampaign, NewDonation, NewRecurringPlan, NewUser,
    PlanPatch, Profile, RecurringPlan, Role, User,
};

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{RepoError, RepoResult};

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub profile: Option<Profile>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `RepoError::Conflict` when the (case-insensitive) email is taken.
    async fn create(&self, new: NewUser) -> RepoResult<User>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    async fn list_by_role(&self, role: Role) -> RepoResult<Vec<User>>;
    /// The profile tag must match the stored role; callers patch within a role.
    async fn update(&self, id: Uuid, patch: UserPatch) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait CampaignRepo: Send + Sync {
    async fn create(&self, new: NewCampaign) -> RepoResult<Campaign>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Campaign>>;
    async fn list_by_ngo(&self, ngo_id: Uuid) -> RepoResult<Vec<Campaign>>;
    async fn update(&self, id: Uuid, patch: CampaignPatch) -> RepoResult<Option<Campaign>>;
    /// Adds to `raised_amount` and completes the campaign once the goal is met.
    async fn add_to_raised(&self, id: Uuid, amount: f64) -> RepoResult<Option<Campaign>>;
}

#[async_trait]
pub trait DonationRepo: Send + Sync {
    async fn create(&self, new: NewDonation) -> RepoResult<Donation>;
    async fn list_by_donor(&self, donor_id: Uuid) -> RepoResult<Vec<Donation>>;
    async fn list_by_ngo(&self, ngo_id: Uuid) -> RepoResult<Vec<Donation>>;
    async fn list_by_campaign(&self, campaign_id: Uuid) -> RepoResult<Vec<Donation>>;
}

#[async_trait]
pub trait RecurringRepo: Send + Sync {
    async fn create(&self, new: NewRecurringPlan) -> RepoResult<RecurringPlan>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RecurringPlan>>;
    async fn list_by_donor(&self, donor_id: Uuid) -> RepoResult<Vec<RecurringPlan>>;
    async fn update(&self, id: Uuid, patch: PlanPatch) -> RepoResult<Option<RecurringPlan>>;
}

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn UserRepo>,
    pub campaigns: Arc<dyn CampaignRepo>,
    pub donations: Arc<dyn DonationRepo>,
    pub recurring: Arc<dyn RecurringRepo>,
}

impl Repos {
    pub fn memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            users: store.clone(),
            campaigns: store.clone(),
            donations: store.clone(),
            recurring: store,
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(postgres::PgStore::new(pool));
        Self {
            users: store.clone(),
            campaigns: store.clone(),
            donations: store.clone(),
            recurring: store,
        }
    }
}

impl std::fmt::Debug for Repos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repos").finish_non_exhaustive()
    }
}
