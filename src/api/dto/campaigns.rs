/*
 * Responsibility
 * - /api/campaigns request DTOs
 * - endDate is RFC 3339 and must lie in the future
 */
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::{Amount, deserialize_patch_text, deserialize_text};
use crate::models::{CampaignPatch, NewCampaign};

const END_DATE_MESSAGE: &str = "endDate must be a future RFC 3339 timestamp";
const GOAL_MESSAGE: &str = "goalAmount must be a positive number";

fn future_date(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, &'static str> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .filter(|d| *d > now)
        .ok_or(END_DATE_MESSAGE)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub goal_amount: Option<Amount>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub end_date: Option<String>,
}

impl CreateCampaignRequest {
    pub fn validate(self, ngo_id: Uuid, now: DateTime<Utc>) -> Result<NewCampaign, &'static str> {
        let (Some(title), Some(description), Some(goal)) =
            (self.title, self.description, self.goal_amount)
        else {
            return Err("Title, description and goalAmount are required");
        };
        let goal_amount = goal.positive().ok_or(GOAL_MESSAGE)?;
        let end_date = self
            .end_date
            .as_deref()
            .map(|raw| future_date(raw, now))
            .transpose()?;

        Ok(NewCampaign {
            ngo_id,
            title,
            description,
            goal_amount,
            end_date,
        })
    }
}

/// `PUT /api/campaigns/{id}`; `endDate: null` removes the end date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub goal_amount: Option<Amount>,
    #[serde(default, deserialize_with = "deserialize_patch_text")]
    pub end_date: Option<Option<String>>,
}

impl UpdateCampaignRequest {
    pub fn validate(self, now: DateTime<Utc>) -> Result<CampaignPatch, &'static str> {
        let goal_amount = self
            .goal_amount
            .map(|g| g.positive().ok_or(GOAL_MESSAGE))
            .transpose()?;
        let end_date = match self.end_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(future_date(&raw, now)?)),
        };

        Ok(CampaignPatch {
            title: self.title,
            description: self.description,
            goal_amount,
            end_date,
            status: None,
        })
    }
}
