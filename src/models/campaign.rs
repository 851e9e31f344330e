use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub ngo_id: Uuid,
    pub title: String,
    pub description: String,
    pub goal_amount: f64,
    pub raised_amount: f64,
    pub end_date: Option<DateTime<Utc>>,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn accepts_donations(&self, now: DateTime<Utc>) -> bool {
        self.status == CampaignStatus::Active && self.end_date.is_none_or(|end| end > now)
    }

    /// Applies a donation to the running total. Reaching the goal completes
    /// the campaign; the total itself is never capped.
    pub fn apply_donation(&mut self, amount: f64) {
        self.raised_amount += amount;
        self.settle_goal();
    }

    /// Active campaigns whose total has met the goal become Completed.
    pub fn settle_goal(&mut self) {
        if self.status == CampaignStatus::Active && self.raised_amount >= self.goal_amount {
            self.status = CampaignStatus::Completed;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub ngo_id: Uuid,
    pub title: String,
    pub description: String,
    pub goal_amount: f64,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct CampaignPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_amount: Option<f64>,
    // Some(None) clears the end date
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub status: Option<CampaignStatus>,
}

impl CampaignPatch {
    pub fn apply(&self, campaign: &mut Campaign) {
        if let Some(title) = &self.title {
            campaign.title = title.clone();
        }
        if let Some(description) = &self.description {
            campaign.description = description.clone();
        }
        if let Some(goal) = self.goal_amount {
            campaign.goal_amount = goal;
        }
        if let Some(end_date) = self.end_date {
            campaign.end_date = end_date;
        }
        if let Some(status) = self.status {
            campaign.status = status;
        }
        // a lowered goal may already be met
        campaign.settle_goal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn campaign(goal: f64) -> Campaign {
        let now = Utc::now();
        Campaign {
            id: Uuid::new_v4(),
            ngo_id: Uuid::new_v4(),
            title: "Wells".into(),
            description: "Dig wells".into(),
            goal_amount: goal,
            raised_amount: 0.0,
            end_date: None,
            status: CampaignStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn reaching_goal_completes_campaign() {
        let mut c = campaign(100.0);
        c.apply_donation(60.0);
        assert_eq!(c.status, CampaignStatus::Active);
        c.apply_donation(50.0);
        assert_eq!(c.status, CampaignStatus::Completed);
        assert_eq!(c.raised_amount, 110.0);
    }

    #[test]
    fn lowering_goal_below_total_completes_campaign() {
        let mut c = campaign(1000.0);
        c.apply_donation(300.0);

        CampaignPatch {
            goal_amount: Some(100.0),
            ..Default::default()
        }
        .apply(&mut c);
        assert_eq!(c.status, CampaignStatus::Completed);
        assert!(!c.accepts_donations(Utc::now()));
    }

    #[test]
    fn cancelling_a_met_goal_stays_cancelled() {
        let mut c = campaign(100.0);
        c.raised_amount = 150.0;

        CampaignPatch {
            status: Some(CampaignStatus::Cancelled),
            ..Default::default()
        }
        .apply(&mut c);
        assert_eq!(c.status, CampaignStatus::Cancelled);
    }

    #[test]
    fn ended_campaign_rejects_donations() {
        let mut c = campaign(100.0);
        let now = Utc::now();
        c.end_date = Some(now - Duration::hours(1));
        assert!(!c.accepts_donations(now));
        c.end_date = Some(now + Duration::hours(1));
        assert!(c.accepts_donations(now));
    }
}
