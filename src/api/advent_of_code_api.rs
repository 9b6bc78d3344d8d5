use reqwest::header::COOKIE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{NotifierError, ShapeError};

/// Fields of the private leaderboard document that are read; the rest is ignored.
#[derive(Debug, Deserialize)]
pub struct ApiLeaderboard {
    pub members: Map<String, Value>,
}

/// GETs the leaderboard JSON. Anything but a 200 fails before the body is read.
#[tracing::instrument(level = "trace", skip(client, session_id))]
pub(crate) async fn get_leaderboard(
    client: &Client,
    url: &str,
    session_id: &str,
) -> Result<ApiLeaderboard, NotifierError> {
    info!(url, "Fetching leaderboard");
    let response = client
        .get(url)
        .header(COOKIE, format!("session={session_id}"))
        .send()
        .await
        .map_err(NotifierError::Request)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(NotifierError::Fetch {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(NotifierError::Request)?;
    debug!(bytes = body.len(), "Received leaderboard body");

    let leaderboard: ApiLeaderboard =
        serde_json::from_str(&body).map_err(ShapeError::Body)?;
    info!(
        member_count = leaderboard.members.len(),
        "Fetched leaderboard"
    );

    Ok(leaderboard)
}
