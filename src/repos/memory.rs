//! In-process repository backend.
//!
//! Used when no `DATABASE_URL` is configured (local development) and by the
//! integration tests. Each aggregate lives in its own `RwLock`ed map; lists are
//! returned newest first, like the Postgres backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Campaign, CampaignPatch, CampaignStatus, Donation, NewCampaign, NewDonation,
    NewRecurringPlan, NewUser, PlanPatch, PlanStatus, RecurringPlan, Role, User,
};
use crate::repos::{
    CampaignRepo, DonationRepo, RecurringRepo, RepoError, RepoResult, UserPatch, UserRepo,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    campaigns: RwLock<HashMap<Uuid, Campaign>>,
    donations: RwLock<HashMap<Uuid, Donation>>,
    plans: RwLock<HashMap<Uuid, RecurringPlan>>,
}

fn newest_first<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, new: NewUser) -> RepoResult<User> {
        let mut users = self.users.write().await;
        let email = new.email.to_lowercase();
        if users.values().any(|u| u.email == email) {
            return Err(RepoError::Conflict);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email,
            password_hash: new.password_hash,
            profile: new.profile,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> RepoResult<Vec<User>> {
        let users = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role() == role)
            .cloned()
            .collect();
        Ok(newest_first(users, |u: &User| u.created_at))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> RepoResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(profile) = patch.profile {
            if profile.role() != user.role() {
                return Err(RepoError::Corrupt(format!(
                    "profile for {} written to a {} account",
                    profile.role(),
                    user.role()
                )));
            }
            user.profile = profile;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl CampaignRepo for MemoryStore {
    async fn create(&self, new: NewCampaign) -> RepoResult<Campaign> {
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            ngo_id: new.ngo_id,
            title: new.title,
            description: new.description,
            goal_amount: new.goal_amount,
            raised_amount: 0.0,
            end_date: new.end_date,
            status: CampaignStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.campaigns
            .write()
            .await
            .insert(campaign.id, campaign.clone());
        Ok(campaign)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Campaign>> {
        Ok(self.campaigns.read().await.get(&id).cloned())
    }

    async fn list_by_ngo(&self, ngo_id: Uuid) -> RepoResult<Vec<Campaign>> {
        let campaigns = self
            .campaigns
            .read()
            .await
            .values()
            .filter(|c| c.ngo_id == ngo_id)
            .cloned()
            .collect();
        Ok(newest_first(campaigns, |c: &Campaign| c.created_at))
    }

    async fn update(&self, id: Uuid, patch: CampaignPatch) -> RepoResult<Option<Campaign>> {
        let mut campaigns = self.campaigns.write().await;
        Ok(campaigns.get_mut(&id).map(|campaign| {
            patch.apply(campaign);
            campaign.updated_at = Utc::now();
            campaign.clone()
        }))
    }

    async fn add_to_raised(&self, id: Uuid, amount: f64) -> RepoResult<Option<Campaign>> {
        let mut campaigns = self.campaigns.write().await;
        Ok(campaigns.get_mut(&id).map(|campaign| {
            campaign.apply_donation(amount);
            campaign.updated_at = Utc::now();
            campaign.clone()
        }))
    }
}

#[async_trait]
impl DonationRepo for MemoryStore {
    async fn create(&self, new: NewDonation) -> RepoResult<Donation> {
        let donation = Donation {
            id: Uuid::new_v4(),
            campaign_id: new.campaign_id,
            ngo_id: new.ngo_id,
            donor_id: new.donor_id,
            donor_name: new.donor_name,
            donor_email: new.donor_email,
            amount: new.amount,
            message: new.message,
            anonymous: new.anonymous,
            recurring_plan_id: new.recurring_plan_id,
            created_at: Utc::now(),
        };
        self.donations
            .write()
            .await
            .insert(donation.id, donation.clone());
        Ok(donation)
    }

    async fn list_by_donor(&self, donor_id: Uuid) -> RepoResult<Vec<Donation>> {
        self.filter_donations(|d| d.donor_id == Some(donor_id)).await
    }

    async fn list_by_ngo(&self, ngo_id: Uuid) -> RepoResult<Vec<Donation>> {
        self.filter_donations(|d| d.ngo_id == ngo_id).await
    }

    async fn list_by_campaign(&self, campaign_id: Uuid) -> RepoResult<Vec<Donation>> {
        self.filter_donations(|d| d.campaign_id == campaign_id).await
    }
}

impl MemoryStore {
    async fn filter_donations<F>(&self, keep: F) -> RepoResult<Vec<Donation>>
    where
        F: Fn(&Donation) -> bool,
    {
        let donations = self
            .donations
            .read()
            .await
            .values()
            .filter(|d| keep(d))
            .cloned()
            .collect();
        Ok(newest_first(donations, |d: &Donation| d.created_at))
    }
}

#[async_trait]
impl RecurringRepo for MemoryStore {
    async fn create(&self, new: NewRecurringPlan) -> RepoResult<RecurringPlan> {
        let now = Utc::now();
        let plan = RecurringPlan {
            id: Uuid::new_v4(),
            donor_id: new.donor_id,
            campaign_id: new.campaign_id,
            ngo_id: new.ngo_id,
            amount: new.amount,
            frequency: new.frequency,
            status: PlanStatus::Active,
            next_charge_at: new.next_charge_at,
            created_at: now,
            updated_at: now,
        };
        self.plans.write().await.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RecurringPlan>> {
        Ok(self.plans.read().await.get(&id).cloned())
    }

    async fn list_by_donor(&self, donor_id: Uuid) -> RepoResult<Vec<RecurringPlan>> {
        let plans = self
            .plans
            .read()
            .await
            .values()
            .filter(|p| p.donor_id == donor_id)
            .cloned()
            .collect();
        Ok(newest_first(plans, |p: &RecurringPlan| p.created_at))
    }

    async fn update(&self, id: Uuid, patch: PlanPatch) -> RepoResult<Option<RecurringPlan>> {
        let mut plans = self.plans.write().await;
        Ok(plans.get_mut(&id).map(|plan| {
            patch.apply(plan);
            plan.updated_at = Utc::now();
            plan.clone()
        }))
    }
}
