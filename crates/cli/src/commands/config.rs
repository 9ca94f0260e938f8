use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use flack_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

use super::{CommandResult, CONFIG_FAILURE_EXIT_CODE};

struct Entry {
    key: &'static str,
    env_key: &'static str,
    value: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                format!("config validation failed: {error}"),
                CONFIG_FAILURE_EXIT_CODE,
            )
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for entry in entries(&config) {
        let source = field_source(
            entry.key,
            entry.env_key,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(format!("- {} = {} (source: {source})", entry.key, entry.value));
    }

    CommandResult::success(lines.join("\n"))
}

fn entries(config: &AppConfig) -> Vec<Entry> {
    let entry = |key: &'static str, env_key: &'static str, value: String| Entry {
        key,
        env_key,
        value,
    };

    vec![
        entry("flack.token", "FLACK_TOKEN", redact_token(config.flack.token.expose_secret())),
        entry("flack.url_prefix", "FLACK_URL_PREFIX", config.flack.url_prefix.clone()),
        entry("flack.default_name", "FLACK_DEFAULT_NAME", config.flack.default_name.clone()),
        entry(
            "server.bind_address",
            "FLACK_SERVER_BIND_ADDRESS",
            config.server.bind_address.clone(),
        ),
        entry("server.port", "FLACK_SERVER_PORT", config.server.port.to_string()),
        entry(
            "server.graceful_shutdown_secs",
            "FLACK_SERVER_GRACEFUL_SHUTDOWN_SECS",
            config.server.graceful_shutdown_secs.to_string(),
        ),
        entry("delivery.delay_ms", "FLACK_DELIVERY_DELAY_MS", config.delivery.delay_ms.to_string()),
        entry(
            "delivery.queue_capacity",
            "FLACK_DELIVERY_QUEUE_CAPACITY",
            config.delivery.queue_capacity.to_string(),
        ),
        entry(
            "delivery.timeout_secs",
            "FLACK_DELIVERY_TIMEOUT_SECS",
            config.delivery.timeout_secs.to_string(),
        ),
        entry(
            "delivery.max_retries",
            "FLACK_DELIVERY_MAX_RETRIES",
            config.delivery.max_retries.to_string(),
        ),
        entry(
            "delivery.retry_base_delay_ms",
            "FLACK_DELIVERY_RETRY_BASE_DELAY_MS",
            config.delivery.retry_base_delay_ms.to_string(),
        ),
        entry(
            "delivery.retry_max_delay_ms",
            "FLACK_DELIVERY_RETRY_MAX_DELAY_MS",
            config.delivery.retry_max_delay_ms.to_string(),
        ),
        entry("logging.level", "FLACK_LOGGING_LEVEL", config.logging.level.clone()),
        entry("logging.format", "FLACK_LOGGING_FORMAT", format!("{:?}", config.logging.format)),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    ["flack.toml", "config/flack.toml"].into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

/// Keeps a Slack-style `xoxb-` prefix visible so operators can tell token
/// kinds apart; everything else is hidden.
pub fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
