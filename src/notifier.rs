use reqwest::StatusCode;
use tracing::info;

use crate::api::{advent_of_code_api, advent_of_code_links, http_client};
use crate::config::{self, AppConfig, FileConfig};
use crate::error::NotifierError;
use crate::leaderboard;
use crate::slack::{message_formatter, webhook};
use crate::util::dates;

#[derive(Debug)]
pub struct RunSummary {
    pub member_count: usize,
    pub posted_count: usize,
    pub webhook_status: StatusCode,
}

/// Resolves the required values and runs. Nothing touches the network
/// unless resolution succeeds.
pub async fn notify<F>(file: FileConfig, env_lookup: F) -> Result<RunSummary, NotifierError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = config::resolve(file, env_lookup)?;
    let year = event_year(&config);
    run(&config, year).await
}

pub fn event_year(config: &AppConfig) -> i32 {
    config.year.unwrap_or_else(dates::current_year)
}

#[tracing::instrument(level = "info", skip(config), fields(leaderboard_id = %config.leaderboard_id))]
pub async fn run(config: &AppConfig, year: i32) -> Result<RunSummary, NotifierError> {
    let client = http_client::build_client(config).map_err(NotifierError::Request)?;

    let board_url = advent_of_code_links::leaderboard_url(
        &config.leaderboard_base_url,
        year,
        &config.leaderboard_id,
    );
    let json_url = advent_of_code_links::leaderboard_json_url(
        &config.leaderboard_base_url,
        year,
        &config.leaderboard_id,
    );

    let api_leaderboard =
        advent_of_code_api::get_leaderboard(&client, &json_url, &config.session_id).await?;

    let mut ranked = leaderboard::parse_members(&api_leaderboard.members)?;
    let member_count = ranked.len();
    ranked.truncate(config.top_count);

    let blocks = message_formatter::format_leader_message(&ranked, &board_url);
    info!(
        member_count,
        posted_count = ranked.len(),
        block_count = blocks.len(),
        "Formatted leaderboard message"
    );

    let webhook_status = webhook::post_message(&client, &config.slack_webhook, &blocks).await?;

    Ok(RunSummary {
        member_count,
        posted_count: ranked.len(),
        webhook_status,
    })
}
