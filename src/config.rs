use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::str;
use crate::util::dates;

pub const CONFIG_FILE_NAME: &str = "aocboard.toml";
pub const CONFIG_PATH_VAR: &str = "AOCBOARD_CONFIG";

pub const LEADERBOARD_ID_VAR: &str = "LEADERBOARD_ID";
pub const SESSION_ID_VAR: &str = "SESSION_ID";
pub const SLACK_WEBHOOK_VAR: &str = "SLACK_WEBHOOK";

const DEFAULT_BASE_URL: &str = "https://adventofcode.com";
const DEFAULT_USER_AGENT: &str = "github.com/aocboard (leaderboard notifier)";
const DEFAULT_TOP_COUNT: usize = 10;
const DEFAULT_TIMEOUT_SEC: u64 = 60;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FileConfig {
    pub leaderboard_id: String,
    pub session_id: String,
    pub slack_webhook: String,
    pub leaderboard_base_url: String,
    pub year: Option<i32>,
    pub top_count: usize,
    pub request_timeout_sec: u64,
    pub user_agent: String,
    pub log: FileLogConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            leaderboard_id: String::new(),
            session_id: String::new(),
            slack_webhook: String::new(),
            leaderboard_base_url: str!(DEFAULT_BASE_URL),
            year: None,
            top_count: DEFAULT_TOP_COUNT,
            request_timeout_sec: DEFAULT_TIMEOUT_SEC,
            user_agent: str!(DEFAULT_USER_AGENT),
            log: FileLogConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FileLogConfig {
    pub level: String,
    pub path: Option<String>,
    pub json_path: Option<String>,
    pub seq_endpoint: Option<String>,
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            level: str!("info"),
            path: None,
            json_path: None,
            seq_endpoint: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,
    pub path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub seq_endpoint: Option<String>,
}

/// Everything a single run needs. Built once at startup and passed down by reference.
#[derive(Clone)]
pub struct AppConfig {
    pub leaderboard_id: String,
    pub session_id: String,
    pub slack_webhook: String,
    pub leaderboard_base_url: String,
    pub year: Option<i32>,
    pub top_count: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
}

// Secrets stay out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("leaderboard_id", &self.leaderboard_id)
            .field("session_id", &"<redacted>")
            .field("slack_webhook", &"<redacted>")
            .field("leaderboard_base_url", &self.leaderboard_base_url)
            .field("year", &self.year)
            .field("top_count", &self.top_count)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path.starts_with("~/") {
        let home = env::var("HOME")
            .map_err(|_| ConfigError::Invalid(format!("HOME is not set, cannot expand {path}")))?;
        Ok(PathBuf::from(path.replacen("~", &home, 1)))
    } else {
        Ok(PathBuf::from(path))
    }
}

/// `$AOCBOARD_CONFIG` if set, otherwise `aocboard.toml` beside the executable.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var(CONFIG_PATH_VAR) {
        if !path.is_empty() {
            return expand_tilde(&path);
        }
    }

    let exe_path = env::current_exe().map_err(|source| ConfigError::Read {
        path: "<current executable>".to_string(),
        source,
    })?;
    match exe_path.parent() {
        Some(dir) => Ok(dir.join(CONFIG_FILE_NAME)),
        None => Err(ConfigError::Invalid(
            "failed to determine executable directory".to_string(),
        )),
    }
}

/// Reads the config file. A missing file yields defaults, since the
/// environment can supply every required value on its own.
pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    if !path.is_file() {
        return Err(ConfigError::Invalid(format!(
            "Config path exists but is not a file: {}",
            path.display()
        )));
    }

    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_file_config() -> Result<FileConfig, ConfigError> {
    read_file_config(&config_path()?)
}

/// Layers the three required values: environment first, then the file.
/// Empty strings count as unset at both layers.
pub fn resolve<F>(file: FileConfig, env_lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();
    let mut pick = |var: &'static str, fallback: String| -> String {
        let value = env_lookup(var)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(fallback);
        let value = value.trim().to_string();
        if value.is_empty() {
            missing.push(var);
        }
        value
    };

    let leaderboard_id = pick(LEADERBOARD_ID_VAR, file.leaderboard_id);
    let session_id = pick(SESSION_ID_VAR, file.session_id);
    let slack_webhook = pick(SLACK_WEBHOOK_VAR, file.slack_webhook);

    if !missing.is_empty() {
        return Err(ConfigError::Missing(missing));
    }

    if file.top_count == 0 {
        return Err(ConfigError::Invalid("top_count must be at least 1".to_string()));
    }
    if file.request_timeout_sec == 0 {
        return Err(ConfigError::Invalid(
            "request_timeout_sec must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        leaderboard_id,
        session_id,
        slack_webhook,
        leaderboard_base_url: file.leaderboard_base_url.trim_end_matches('/').to_string(),
        year: file.year,
        top_count: file.top_count,
        request_timeout: Duration::from_secs(file.request_timeout_sec),
        user_agent: file.user_agent,
    })
}

pub fn build_log_config(file_log: &FileLogConfig) -> Result<LogConfig, ConfigError> {
    let path = file_log
        .path
        .as_deref()
        .map(log_file_path)
        .transpose()?;
    let json_path = file_log
        .json_path
        .as_deref()
        .map(log_file_path)
        .transpose()?;

    Ok(LogConfig {
        level: file_log.level.clone(),
        path,
        json_path,
        seq_endpoint: file_log.seq_endpoint.clone(),
    })
}

fn log_file_path(cfg_path: &str) -> Result<PathBuf, ConfigError> {
    let path = log_file_replacements(cfg_path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ConfigError::Invalid(format!(
                "Log file directory does not exist: {}",
                parent.display()
            )));
        }
    }
    if path.exists() && !path.is_file() {
        return Err(ConfigError::Invalid(format!(
            "Log path exists but is not a file: {}",
            cfg_path
        )));
    }
    Ok(path)
}

fn log_file_replacements(cfg_path: &str) -> Result<PathBuf, ConfigError> {
    let date_str = dates::local_date_yyyy_mm_dd();
    let replaced = cfg_path.replace("{DATE}", &date_str);
    expand_tilde(&replaced)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn file_with_secrets(id: &str, session: &str, webhook: &str) -> FileConfig {
        FileConfig {
            leaderboard_id: id.to_string(),
            session_id: session.to_string(),
            slack_webhook: webhook.to_string(),
            ..FileConfig::default()
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn all_values_empty_is_missing() {
        let err = resolve(file_with_secrets("", "", ""), env_of(&[])).unwrap_err();

        match err {
            ConfigError::Missing(vars) => assert_eq!(
                vars,
                vec![LEADERBOARD_ID_VAR, SESSION_ID_VAR, SLACK_WEBHOOK_VAR]
            ),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn environment_wins_over_file() {
        let cfg = resolve(
            file_with_secrets("file-id", "file-session", "https://file.example/hook"),
            env_of(&[
                (LEADERBOARD_ID_VAR, "env-id"),
                (SESSION_ID_VAR, "env-session"),
                (SLACK_WEBHOOK_VAR, "https://env.example/hook"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.leaderboard_id, "env-id");
        assert_eq!(cfg.session_id, "env-session");
        assert_eq!(cfg.slack_webhook, "https://env.example/hook");
    }

    #[test]
    fn file_fills_unset_and_empty_env_values() {
        let cfg = resolve(
            file_with_secrets("file-id", "file-session", "https://file.example/hook"),
            env_of(&[(LEADERBOARD_ID_VAR, "env-id"), (SESSION_ID_VAR, "")]),
        )
        .unwrap();

        assert_eq!(cfg.leaderboard_id, "env-id");
        assert_eq!(cfg.session_id, "file-session");
        assert_eq!(cfg.slack_webhook, "https://file.example/hook");
    }

    #[test]
    fn missing_lists_only_unresolved_values() {
        let err = resolve(
            file_with_secrets("id", "", ""),
            env_of(&[(SLACK_WEBHOOK_VAR, "https://env.example/hook")]),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing(ref v) if v == &vec![SESSION_ID_VAR]));
        assert!(err.to_string().contains(SESSION_ID_VAR));
    }

    #[test]
    fn defaults_apply_without_file() {
        let cfg = resolve(
            FileConfig::default(),
            env_of(&[
                (LEADERBOARD_ID_VAR, "1"),
                (SESSION_ID_VAR, "2"),
                (SLACK_WEBHOOK_VAR, "3"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.leaderboard_base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.top_count, 10);
        assert_eq!(cfg.request_timeout, Duration::from_secs(60));
        assert_eq!(cfg.year, None);
    }

    #[test]
    fn zero_top_count_is_invalid() {
        let file = FileConfig {
            top_count: 0,
            ..file_with_secrets("1", "2", "3")
        };

        assert!(matches!(
            resolve(file, env_of(&[])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cfg = resolve(file_with_secrets("1", "s3cr3t", "https://hook/x"), env_of(&[]))
            .unwrap();

        let rendered = format!("{cfg:?}");

        assert!(!rendered.contains("s3cr3t"));
        assert!(!rendered.contains("https://hook/x"));
    }

    #[test]
    fn reads_partial_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
leaderboard_id = "424242"
leaderboard_base_url = "http://localhost:9000/"
year = 2022
top_count = 5

[log]
level = "debug"
"#
        )
        .unwrap();

        let file_cfg = read_file_config(file.path()).unwrap();

        assert_eq!(file_cfg.leaderboard_id, "424242");
        assert_eq!(file_cfg.session_id, "");
        assert_eq!(file_cfg.year, Some(2022));
        assert_eq!(file_cfg.top_count, 5);
        assert_eq!(file_cfg.request_timeout_sec, DEFAULT_TIMEOUT_SEC);
        assert_eq!(file_cfg.log.level, "debug");

        let cfg = resolve(
            file_cfg,
            env_of(&[(SESSION_ID_VAR, "abc"), (SLACK_WEBHOOK_VAR, "https://hook")]),
        )
        .unwrap();
        assert_eq!(cfg.leaderboard_base_url, "http://localhost:9000");
    }

    #[test]
    fn absent_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let file_cfg = read_file_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();

        assert_eq!(file_cfg.top_count, DEFAULT_TOP_COUNT);
        assert!(file_cfg.leaderboard_id.is_empty());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top_count = \"ten\"").unwrap();

        assert!(matches!(
            read_file_config(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn log_paths_substitute_date() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("run-{DATE}.log");

        let log = build_log_config(&FileLogConfig {
            path: Some(pattern.display().to_string()),
            ..FileLogConfig::default()
        })
        .unwrap();

        let expected = dir
            .path()
            .join(format!("run-{}.log", dates::local_date_yyyy_mm_dd()));
        assert_eq!(log.path, Some(expected));
        assert_eq!(log.json_path, None);
    }

    #[test]
    fn log_path_in_missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").join("run.log");

        assert!(build_log_config(&FileLogConfig {
            json_path: Some(missing.display().to_string()),
            ..FileLogConfig::default()
        })
        .is_err());
    }
}
