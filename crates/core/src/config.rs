use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_URL_PREFIX: &str = "/flack";
pub const DEFAULT_DISPLAY_NAME: &str = "flack";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub flack: FlackConfig,
    pub server: ServerConfig,
    pub delivery: DeliveryConfig,
    pub logging: LoggingConfig,
}

/// Values consumed by the dispatch core: shared secret, mount point and the
/// display name used when a handler does not supply one.
#[derive(Clone, Debug)]
pub struct FlackConfig {
    pub token: SecretString,
    pub url_prefix: String,
    pub default_name: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct DeliveryConfig {
    pub delay_ms: u64,
    pub queue_capacity: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub url_prefix: Option<String>,
    pub default_name: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub delivery_delay_ms: Option<u64>,
    pub delivery_max_retries: Option<u32>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            flack: FlackConfig {
                token: String::new().into(),
                url_prefix: DEFAULT_URL_PREFIX.to_string(),
                default_name: DEFAULT_DISPLAY_NAME.to_string(),
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 5000,
                graceful_shutdown_secs: 15,
            },
            delivery: DeliveryConfig {
                delay_ms: 1_000,
                queue_capacity: 64,
                timeout_secs: 10,
                max_retries: 0,
                retry_base_delay_ms: 500,
                retry_max_delay_ms: 10_000,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl FlackConfig {
    /// Mount point with any trailing slash removed. An empty string means the
    /// endpoints live at the root.
    pub fn normalized_prefix(&self) -> String {
        self.url_prefix.trim().trim_end_matches('/').to_string()
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("flack.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(flack) = patch.flack {
            if let Some(token_value) = flack.token {
                self.flack.token = secret_value(token_value);
            }
            if let Some(url_prefix) = flack.url_prefix {
                self.flack.url_prefix = url_prefix;
            }
            if let Some(default_name) = flack.default_name {
                self.flack.default_name = default_name;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(delivery) = patch.delivery {
            if let Some(delay_ms) = delivery.delay_ms {
                self.delivery.delay_ms = delay_ms;
            }
            if let Some(queue_capacity) = delivery.queue_capacity {
                self.delivery.queue_capacity = queue_capacity;
            }
            if let Some(timeout_secs) = delivery.timeout_secs {
                self.delivery.timeout_secs = timeout_secs;
            }
            if let Some(max_retries) = delivery.max_retries {
                self.delivery.max_retries = max_retries;
            }
            if let Some(retry_base_delay_ms) = delivery.retry_base_delay_ms {
                self.delivery.retry_base_delay_ms = retry_base_delay_ms;
            }
            if let Some(retry_max_delay_ms) = delivery.retry_max_delay_ms {
                self.delivery.retry_max_delay_ms = retry_max_delay_ms;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("FLACK_TOKEN") {
            self.flack.token = secret_value(value);
        }
        if let Some(value) = read_env("FLACK_URL_PREFIX") {
            self.flack.url_prefix = value;
        }
        if let Some(value) = read_env("FLACK_DEFAULT_NAME") {
            self.flack.default_name = value;
        }

        if let Some(value) = read_env("FLACK_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("FLACK_SERVER_PORT") {
            self.server.port = parse_u16("FLACK_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("FLACK_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("FLACK_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("FLACK_DELIVERY_DELAY_MS") {
            self.delivery.delay_ms = parse_u64("FLACK_DELIVERY_DELAY_MS", &value)?;
        }
        if let Some(value) = read_env("FLACK_DELIVERY_QUEUE_CAPACITY") {
            self.delivery.queue_capacity = parse_usize("FLACK_DELIVERY_QUEUE_CAPACITY", &value)?;
        }
        if let Some(value) = read_env("FLACK_DELIVERY_TIMEOUT_SECS") {
            self.delivery.timeout_secs = parse_u64("FLACK_DELIVERY_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("FLACK_DELIVERY_MAX_RETRIES") {
            self.delivery.max_retries = parse_u32("FLACK_DELIVERY_MAX_RETRIES", &value)?;
        }
        if let Some(value) = read_env("FLACK_DELIVERY_RETRY_BASE_DELAY_MS") {
            self.delivery.retry_base_delay_ms =
                parse_u64("FLACK_DELIVERY_RETRY_BASE_DELAY_MS", &value)?;
        }
        if let Some(value) = read_env("FLACK_DELIVERY_RETRY_MAX_DELAY_MS") {
            self.delivery.retry_max_delay_ms =
                parse_u64("FLACK_DELIVERY_RETRY_MAX_DELAY_MS", &value)?;
        }

        let log_level = read_env("FLACK_LOGGING_LEVEL").or_else(|| read_env("FLACK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("FLACK_LOGGING_FORMAT").or_else(|| read_env("FLACK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(token) = overrides.token {
            self.flack.token = secret_value(token);
        }
        if let Some(url_prefix) = overrides.url_prefix {
            self.flack.url_prefix = url_prefix;
        }
        if let Some(default_name) = overrides.default_name {
            self.flack.default_name = default_name;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(delay_ms) = overrides.delivery_delay_ms {
            self.delivery.delay_ms = delay_ms;
        }
        if let Some(max_retries) = overrides.delivery_max_retries {
            self.delivery.max_retries = max_retries;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_flack(&self.flack)?;
        validate_server(&self.server)?;
        validate_delivery(&self.delivery)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("flack.toml"), PathBuf::from("config/flack.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_flack(flack: &FlackConfig) -> Result<(), ConfigError> {
    if flack.token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "flack.token is required. Copy the verification token from your Slack app's Basic Information page".to_string(),
        ));
    }

    let prefix = flack.url_prefix.trim();
    if !prefix.is_empty() && !prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "flack.url_prefix must start with `/` (got `{prefix}`)"
        )));
    }
    if prefix.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(
            "flack.url_prefix must not contain whitespace".to_string(),
        ));
    }

    if flack.default_name.trim().is_empty() {
        return Err(ConfigError::Validation("flack.default_name must not be empty".to_string()));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_delivery(delivery: &DeliveryConfig) -> Result<(), ConfigError> {
    if delivery.queue_capacity == 0 {
        return Err(ConfigError::Validation(
            "delivery.queue_capacity must be greater than zero".to_string(),
        ));
    }

    if delivery.timeout_secs == 0 || delivery.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "delivery.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if delivery.retry_base_delay_ms > delivery.retry_max_delay_ms {
        return Err(ConfigError::Validation(
            "delivery.retry_base_delay_ms must not exceed delivery.retry_max_delay_ms".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    flack: Option<FlackPatch>,
    server: Option<ServerPatch>,
    delivery: Option<DeliveryPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct FlackPatch {
    token: Option<String>,
    url_prefix: Option<String>,
    default_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DeliveryPatch {
    delay_ms: Option<u64>,
    queue_capacity: Option<usize>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    retry_base_delay_ms: Option<u64>,
    retry_max_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_FLACK_VERIFICATION", "from-env-secret");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("flack.toml");
            fs::write(
                &path,
                r#"
[flack]
token = "${TEST_FLACK_VERIFICATION}"
url_prefix = "/slack"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.flack.token.expose_secret() == "from-env-secret",
                "token should be interpolated from the environment",
            )?;
            ensure(config.flack.url_prefix == "/slack", "url prefix should come from the file")?;
            ensure(config.flack.default_name == "flack", "default name should keep its default")?;
            Ok(())
        })();

        clear_vars(&["TEST_FLACK_VERIFICATION"]);
        result
    }

    #[test]
    fn unterminated_interpolation_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("flack.toml");
        fs::write(&path, "[flack]\ntoken = \"${BROKEN\"\n").map_err(|err| err.to_string())?;

        let outcome =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() });
        ensure(
            matches!(outcome, Err(ConfigError::UnterminatedInterpolation)),
            "unterminated interpolation should fail",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("FLACK_TOKEN", "secret");
        env::set_var("FLACK_LOG_LEVEL", "warn");
        env::set_var("FLACK_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["FLACK_TOKEN", "FLACK_LOG_LEVEL", "FLACK_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("FLACK_TOKEN", "from-env");
        env::set_var("FLACK_DEFAULT_NAME", "env-bot");
        env::set_var("FLACK_DELIVERY_DELAY_MS", "250");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("flack.toml");
            fs::write(
                &path,
                r#"
[flack]
token = "from-file"
default_name = "file-bot"
url_prefix = "/from-file"

[delivery]
delay_ms = 2000
max_retries = 1

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    url_prefix: Some("/from-override".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.flack.url_prefix == "/from-override", "override prefix should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.flack.token.expose_secret() == "from-env", "env token should win")?;
            ensure(config.flack.default_name == "env-bot", "env display name should win")?;
            ensure(config.delivery.delay_ms == 250, "env delay should win over the file")?;
            ensure(config.delivery.max_retries == 1, "file retries should win over default")?;
            Ok(())
        })();

        clear_vars(&["FLACK_TOKEN", "FLACK_DEFAULT_NAME", "FLACK_DELIVERY_DELAY_MS"]);
        result
    }

    #[test]
    fn missing_token_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["FLACK_TOKEN"]);

        let error = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => return Err("expected validation failure but config load succeeded".to_string()),
            Err(error) => error,
        };
        let has_message = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("flack.token")
        );
        ensure(has_message, "validation failure should mention flack.token")
    }

    #[test]
    fn relative_prefix_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let outcome = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                token: Some("secret".to_string()),
                url_prefix: Some("flack".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        ensure(
            matches!(outcome, Err(ConfigError::Validation(ref message)) if message.contains("url_prefix")),
            "relative prefix should be rejected",
        )
    }

    #[test]
    fn invalid_numeric_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("FLACK_TOKEN", "secret");
        env::set_var("FLACK_SERVER_PORT", "not-a-port");

        let outcome = AppConfig::load(LoadOptions::default());
        clear_vars(&["FLACK_TOKEN", "FLACK_SERVER_PORT"]);

        ensure(
            matches!(
                outcome,
                Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "FLACK_SERVER_PORT"
            ),
            "bad port should surface as an invalid env override",
        )
    }

    #[test]
    fn trailing_slash_is_trimmed_from_prefix() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                token: Some("secret".to_string()),
                url_prefix: Some("/hooks/".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.flack.normalized_prefix() == "/hooks", "trailing slash should be trimmed")
    }

    #[test]
    fn token_is_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("FLACK_TOKEN", "super-secret-verification");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(
                !debug.contains("super-secret-verification"),
                "debug output should not contain the token",
            )?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            ensure(config.delivery.delay_ms == 1_000, "default delivery delay is one second")?;
            Ok(())
        })();

        clear_vars(&["FLACK_TOKEN"]);
        result
    }
}
