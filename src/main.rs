mod api;
mod config;
mod error;
mod leaderboard;
mod logging;
mod notifier;
mod slack;
mod util;

use std::env;

use tracing::{error, info};

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    let file_cfg = config::load_file_config()?;
    let log_cfg = config::build_log_config(&file_cfg.log)?;

    // Dropped after the final log line so Seq receives the outcome.
    let _log_guard = logging::init(&log_cfg)?;
    info!("Logging Initialised. Posting Advent of Code leaderboard");

    match notifier::notify(file_cfg, |key| env::var(key).ok()).await {
        Ok(summary) => {
            info!(
                member_count = summary.member_count,
                posted_count = summary.posted_count,
                webhook_status = summary.webhook_status.as_u16(),
                "Leaderboard notification complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Leaderboard notification failed");
            Err(e.into())
        }
    }
}
