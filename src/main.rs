/*
 * Responsibility
 * - tokio runtime start-up
 * - calls app::run(); no logic lives here
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    givebridge_api::app::run().await
}
