/*
 * Responsibility
 * - POST /api/donations body
 * - Field checks only; campaign state and guest details are checked by the
 *   handler once the campaign is loaded
 */
use serde::Deserialize;
use uuid::Uuid;

use super::{Amount, deserialize_flag, deserialize_text, is_valid_email};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub anonymous: bool,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub donor_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub donor_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonationTarget {
    pub campaign_id: Uuid,
    pub amount: f64,
}

impl CreateDonationRequest {
    pub fn validate(&self) -> Result<DonationTarget, &'static str> {
        let (Some(campaign_id), Some(amount)) = (&self.campaign_id, self.amount) else {
            return Err("campaignId and amount are required");
        };
        let campaign_id = Uuid::parse_str(campaign_id).map_err(|_| "Invalid campaign ID")?;
        let amount = amount.positive().ok_or("Amount must be a positive number")?;

        Ok(DonationTarget {
            campaign_id,
            amount,
        })
    }

    /// Name and email for a donation made without a session.
    pub fn guest(&self) -> Result<(String, String), &'static str> {
        let (Some(name), Some(email)) = (&self.donor_name, &self.donor_email) else {
            return Err("donorName and donorEmail are required for guest donations");
        };
        let email = email.to_lowercase();
        if !is_valid_email(&email) {
            return Err("Invalid email address");
        }
        Ok((name.clone(), email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn req(v: serde_json::Value) -> CreateDonationRequest {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn amount_without_campaign_is_missing_fields() {
        assert_eq!(
            req(json!({"amount": 50})).validate().unwrap_err(),
            "campaignId and amount are required"
        );
        assert_eq!(
            req(json!({"campaignId": Uuid::new_v4()})).validate().unwrap_err(),
            "campaignId and amount are required"
        );
    }

    #[test]
    fn id_then_amount_are_checked() {
        assert_eq!(
            req(json!({"campaignId": "64f1c0ffee", "amount": 50})).validate().unwrap_err(),
            "Invalid campaign ID"
        );
        assert_eq!(
            req(json!({"campaignId": Uuid::new_v4(), "amount": "abc"})).validate().unwrap_err(),
            "Amount must be a positive number"
        );

        let id = Uuid::new_v4();
        let target = req(json!({"campaignId": id, "amount": "25"})).validate().unwrap();
        assert_eq!(target, DonationTarget { campaign_id: id, amount: 25.0 });
    }

    #[test]
    fn guest_needs_name_and_email() {
        let r = req(json!({"donorName": "Grace"}));
        assert_eq!(
            r.guest().unwrap_err(),
            "donorName and donorEmail are required for guest donations"
        );

        let r = req(json!({"donorName": "Grace", "donorEmail": "Grace@Example.org", "anonymous": true}));
        assert!(r.anonymous);
        assert_eq!(r.guest().unwrap(), ("Grace".to_string(), "grace@example.org".to_string()));
    }
}
