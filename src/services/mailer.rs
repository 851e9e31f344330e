//! Outbound email seam (donation receipts).
//!
//! Delivery itself is handled by an external provider; the app only depends on
//! the `Mailer` trait. `LogMailer` is the built-in implementation and writes
//! the rendered receipt to the tracing output.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// Everything a receipt needs; rendered by `render_text`.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub donation_id: Uuid,
    pub to_name: String,
    pub to_email: String,
    pub campaign_title: String,
    pub amount: f64,
    pub donated_at: DateTime<Utc>,
    pub recurring: bool,
}

impl Receipt {
    pub fn subject(&self) -> String {
        format!("Thank you for supporting {}", self.campaign_title)
    }

    pub fn render_text(&self) -> String {
        let kind = if self.recurring {
            "recurring donation"
        } else {
            "donation"
        };
        format!(
            "Hi {},\n\n\
             Thank you for your {} of {:.2} to \"{}\".\n\n\
             Receipt number: {}\n\
             Date: {}\n\n\
             Please keep this email for your records.",
            self.to_name,
            kind,
            self.amount,
            self.campaign_title,
            self.donation_id,
            self.donated_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    // Deliver a donation receipt.
    //
    // Returns:
    // - Ok(())  => accepted by the transport
    // - Err(_)  => not delivered; callers log and carry on (a receipt is never
    //              a reason to fail the donation itself)
    async fn send_receipt(&self, receipt: &Receipt) -> Result<(), MailError>;
}

#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_receipt(&self, receipt: &Receipt) -> Result<(), MailError> {
        if !receipt.to_email.contains('@') {
            return Err(MailError::InvalidRecipient(receipt.to_email.clone()));
        }

        tracing::info!(
            to = %receipt.to_email,
            subject = %receipt.subject(),
            donation_id = %receipt.donation_id,
            body = %receipt.render_text(),
            "receipt email"
        );
        Ok(())
    }
}
