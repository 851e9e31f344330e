/*
 * Responsibility
 * - One Route Module per resource URL space
 * - Each owns a RouteTable and maps the matched action to a handler
 */
mod auth;
mod campaigns;
mod donations;
mod donor;
mod ngo;
mod recurring;

pub use auth::AuthRoutes;
pub use campaigns::CampaignRoutes;
pub use donations::DonationRoutes;
pub use donor::DonorRoutes;
pub use ngo::NgoRoutes;
pub use recurring::RecurringRoutes;
