use serde::Deserialize;
use uuid::Uuid;

use super::{Amount, deserialize_text};
use crate::models::{Frequency, PlanPatch};

const AMOUNT_MESSAGE: &str = "Amount must be a positive number";
const FREQUENCY_MESSAGE: &str = "Invalid frequency";

fn frequency(raw: &str) -> Result<Frequency, &'static str> {
    Frequency::parse(&raw.to_ascii_lowercase()).ok_or(FREQUENCY_MESSAGE)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRequest {
    pub campaign_id: Uuid,
    pub amount: f64,
    pub frequency: Frequency,
}

impl CreatePlanRequest {
    pub fn validate(&self) -> Result<PlanRequest, &'static str> {
        let (Some(campaign_id), Some(amount), Some(raw_frequency)) =
            (&self.campaign_id, self.amount, &self.frequency)
        else {
            return Err("campaignId, amount and frequency are required");
        };

        Ok(PlanRequest {
            campaign_id: Uuid::parse_str(campaign_id).map_err(|_| "Invalid campaign ID")?,
            amount: amount.positive().ok_or(AMOUNT_MESSAGE)?,
            frequency: frequency(raw_frequency)?,
        })
    }
}

/// `PATCH /api/recurring/{id}`: amount and/or frequency.
#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub frequency: Option<String>,
}

impl UpdatePlanRequest {
    pub fn validate(&self) -> Result<PlanPatch, &'static str> {
        if self.amount.is_none() && self.frequency.is_none() {
            return Err("amount or frequency is required");
        }

        Ok(PlanPatch {
            amount: self
                .amount
                .map(|a| a.positive().ok_or(AMOUNT_MESSAGE))
                .transpose()?,
            frequency: self.frequency.as_deref().map(frequency).transpose()?,
            ..Default::default()
        })
    }
}
