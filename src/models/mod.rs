/*
 * Responsibility
 * - Domain records passed between handlers and repositories
 * - Serialized (camelCase) straight into response bodies
 */
pub mod campaign;
pub mod donation;
pub mod recurring;
pub mod user;

pub use campaign::{Campaign, CampaignPatch, CampaignStatus, NewCampaign};
pub use donation::{Donation, NewDonation, PublicDonation};
pub use recurring::{Frequency, NewRecurringPlan, PlanPatch, PlanStatus, RecurringPlan};
pub use user::{DonorProfile, NewUser, NgoProfile, Profile, Role, User, UserView};
