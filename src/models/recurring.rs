use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Next charge date one period after `from`. Month arithmetic clamps to
    /// the end of shorter months (Jan 31 + 1 month = Feb 28/29).
    pub fn next_after(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            Frequency::Weekly => return from + Duration::weeks(1),
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::Yearly => 12,
        };
        from.checked_add_months(Months::new(months))
            .unwrap_or(from + Duration::days(30 * months as i64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Active,
    Paused,
    Cancelled,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Active => "active",
            PlanStatus::Paused => "paused",
            PlanStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Active <-> Paused, anything -> Cancelled (except Cancelled itself).
    pub fn can_become(&self, next: PlanStatus) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Active, PlanStatus::Paused)
                | (PlanStatus::Paused, PlanStatus::Active)
                | (PlanStatus::Active, PlanStatus::Cancelled)
                | (PlanStatus::Paused, PlanStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPlan {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub campaign_id: Uuid,
    pub ngo_id: Uuid,
    pub amount: f64,
    pub frequency: Frequency,
    pub status: PlanStatus,
    pub next_charge_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRecurringPlan {
    pub donor_id: Uuid,
    pub campaign_id: Uuid,
    pub ngo_id: Uuid,
    pub amount: f64,
    pub frequency: Frequency,
    pub next_charge_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanPatch {
    pub amount: Option<f64>,
    pub frequency: Option<Frequency>,
    pub status: Option<PlanStatus>,
    pub next_charge_at: Option<DateTime<Utc>>,
}

impl PlanPatch {
    pub fn apply(&self, plan: &mut RecurringPlan) {
        if let Some(amount) = self.amount {
            plan.amount = amount;
        }
        if let Some(frequency) = self.frequency {
            plan.frequency = frequency;
        }
        if let Some(status) = self.status {
            plan.status = status;
        }
        if let Some(next) = self.next_charge_at {
            plan.next_charge_at = next;
        }
    }
}
