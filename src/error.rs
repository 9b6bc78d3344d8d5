use thiserror::Error;

/// Failures while resolving the runtime configuration. All of them are
/// raised before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing required configuration values: {}. Set them in the environment or the config file",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),

    #[error("Could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Leaderboard payload did not have the expected structure.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("Leaderboard body is not a valid leaderboard document: {0}")]
    Body(#[source] serde_json::Error),

    #[error("Member {member_id} is malformed: {source}")]
    Member {
        member_id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Error retrieving leaderboard: HTTP {status}")]
    Fetch { status: u16 },

    #[error("Leaderboard request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("Webhook delivery failed: {0}")]
    Delivery(#[source] reqwest::Error),
}
