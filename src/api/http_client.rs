use reqwest::Client;

use crate::config::AppConfig;

/// One client shared by the fetch and the post, so both get the same timeout.
pub fn build_client(config: &AppConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .build()
}
