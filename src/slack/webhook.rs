use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use crate::error::NotifierError;

use super::blocks::{MessageBlock, WebhookPayload};

/// POSTs `{"blocks": [...]}` to the webhook. Only transport failures are errors;
/// a rejected delivery is logged and the returned status left to the caller.
/// The webhook URL embeds the Slack token, so it is stripped from errors.
#[tracing::instrument(level = "trace", skip_all, fields(block_count = blocks.len()))]
pub(crate) async fn post_message(
    client: &Client,
    webhook_url: &str,
    blocks: &[MessageBlock],
) -> Result<StatusCode, NotifierError> {
    let response = client
        .post(webhook_url)
        .json(&WebhookPayload { blocks })
        .send()
        .await
        .map_err(|e| NotifierError::Delivery(e.without_url()))?;

    let status = response.status();
    if status.is_success() {
        info!(status = status.as_u16(), "Posted leaderboard message");
    } else {
        let body = response.text().await.unwrap_or_default();
        warn!(
            status = status.as_u16(),
            body = %body,
            "Webhook did not accept leaderboard message"
        );
    }

    Ok(status)
}
