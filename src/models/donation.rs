use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
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

impl Donation {
    /// Copy safe to show on a public campaign page: anonymous donors lose
    /// their name and email, and nobody's email is ever exposed publicly.
    pub fn public_view(&self) -> PublicDonation {
        PublicDonation {
            id: self.id,
            campaign_id: self.campaign_id,
            donor_name: if self.anonymous {
                "Anonymous".to_string()
            } else {
                self.donor_name.clone()
            },
            amount: self.amount,
            message: self.message.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDonation {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub donor_name: String,
    pub amount: f64,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub campaign_id: Uuid,
    pub ngo_id: Uuid,
    pub donor_id: Option<Uuid>,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: f64,
    pub message: Option<String>,
    pub anonymous: bool,
    pub recurring_plan_id: Option<Uuid>,
}
