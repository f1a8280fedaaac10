use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://models.inference.ai.azure.com";
pub const DEFAULT_GATEWAY_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "Meta-Llama-3.1-8B-Instruct"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub providers: ProvidersConfig,
    pub gateway: GatewayConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ProvidersConfig {
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: String,
    pub anthropic_api_key: Option<SecretString>,
    pub anthropic_base_url: String,
    pub deepseek_api_key: Option<SecretString>,
    pub deepseek_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub token: Option<SecretString>,
    pub base_url: String,
    pub models: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
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
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub gateway_token: Option<String>,
    pub gateway_models: Option<Vec<String>>,
    pub provider_timeout_secs: Option<u64>,
    pub server_port: Option<u16>,
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
            providers: ProvidersConfig {
                openai_api_key: None,
                openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
                anthropic_api_key: None,
                anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
                deepseek_api_key: None,
                deepseek_base_url: DEFAULT_DEEPSEEK_BASE_URL.to_string(),
                timeout_secs: 30,
            },
            gateway: GatewayConfig {
                token: None,
                base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
                models: DEFAULT_GATEWAY_MODELS.iter().map(|model| model.to_string()).collect(),
            },
            server: ServerConfig { bind_address: "127.0.0.1".to_string(), port: 5000 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

/// Blank credentials are treated as absent.
fn secret_value(value: String) -> Option<SecretString> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.into())
    }
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

impl GatewayConfig {
    /// A token alone is not enough; at least one non-blank model must be listed.
    pub fn is_enabled(&self) -> bool {
        self.token.is_some() && self.models.iter().any(|model| !model.trim().is_empty())
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
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("toolfinder.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(providers) = patch.providers {
            if let Some(value) = providers.openai_api_key {
                self.providers.openai_api_key = secret_value(value);
            }
            if let Some(value) = providers.openai_base_url {
                self.providers.openai_base_url = value;
            }
            if let Some(value) = providers.anthropic_api_key {
                self.providers.anthropic_api_key = secret_value(value);
            }
            if let Some(value) = providers.anthropic_base_url {
                self.providers.anthropic_base_url = value;
            }
            if let Some(value) = providers.deepseek_api_key {
                self.providers.deepseek_api_key = secret_value(value);
            }
            if let Some(value) = providers.deepseek_base_url {
                self.providers.deepseek_base_url = value;
            }
            if let Some(timeout_secs) = providers.timeout_secs {
                self.providers.timeout_secs = timeout_secs;
            }
        }

        if let Some(gateway) = patch.gateway {
            if let Some(value) = gateway.token {
                self.gateway.token = secret_value(value);
            }
            if let Some(base_url) = gateway.base_url {
                self.gateway.base_url = base_url;
            }
            if let Some(models) = gateway.models {
                self.gateway.models = models;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
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
        if let Some(value) = read_env_alias("TOOLFINDER_OPENAI_API_KEY", "OPENAI_API_KEY") {
            self.providers.openai_api_key = secret_value(value);
        }
        if let Some(value) = read_env("TOOLFINDER_OPENAI_BASE_URL") {
            self.providers.openai_base_url = value;
        }
        if let Some(value) = read_env_alias("TOOLFINDER_ANTHROPIC_API_KEY", "ANTHROPIC_API_KEY") {
            self.providers.anthropic_api_key = secret_value(value);
        }
        if let Some(value) = read_env("TOOLFINDER_ANTHROPIC_BASE_URL") {
            self.providers.anthropic_base_url = value;
        }
        if let Some(value) = read_env_alias("TOOLFINDER_DEEPSEEK_API_KEY", "DEEPSEEK_API_KEY") {
            self.providers.deepseek_api_key = secret_value(value);
        }
        if let Some(value) = read_env("TOOLFINDER_DEEPSEEK_BASE_URL") {
            self.providers.deepseek_base_url = value;
        }
        if let Some(value) = read_env("TOOLFINDER_PROVIDER_TIMEOUT_SECS") {
            self.providers.timeout_secs = parse_u64("TOOLFINDER_PROVIDER_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env_alias("TOOLFINDER_GATEWAY_TOKEN", "GITHUB_TOKEN") {
            self.gateway.token = secret_value(value);
        }
        if let Some(value) = read_env("TOOLFINDER_GATEWAY_BASE_URL") {
            self.gateway.base_url = value;
        }
        if let Some(value) = read_env("TOOLFINDER_GATEWAY_MODELS") {
            self.gateway.models = parse_list(&value);
        }

        if let Some(value) = read_env("TOOLFINDER_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("TOOLFINDER_SERVER_PORT") {
            self.server.port = parse_u16("TOOLFINDER_SERVER_PORT", &value)?;
        }

        if let Some(value) = read_env_alias("TOOLFINDER_LOGGING_LEVEL", "TOOLFINDER_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env_alias("TOOLFINDER_LOGGING_FORMAT", "TOOLFINDER_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(value) = overrides.openai_api_key {
            self.providers.openai_api_key = secret_value(value);
        }
        if let Some(value) = overrides.anthropic_api_key {
            self.providers.anthropic_api_key = secret_value(value);
        }
        if let Some(value) = overrides.deepseek_api_key {
            self.providers.deepseek_api_key = secret_value(value);
        }
        if let Some(value) = overrides.gateway_token {
            self.gateway.token = secret_value(value);
        }
        if let Some(models) = overrides.gateway_models {
            self.gateway.models = models;
        }
        if let Some(timeout_secs) = overrides.provider_timeout_secs {
            self.providers.timeout_secs = timeout_secs;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_providers(&self.providers)?;
        validate_gateway(&self.gateway)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("toolfinder.toml"), PathBuf::from("config/toolfinder.toml")]
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

fn validate_base_url(key: &str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{key} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn validate_providers(providers: &ProvidersConfig) -> Result<(), ConfigError> {
    if providers.timeout_secs == 0 || providers.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "providers.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    validate_base_url("providers.openai_base_url", &providers.openai_base_url)?;
    validate_base_url("providers.anthropic_base_url", &providers.anthropic_base_url)?;
    validate_base_url("providers.deepseek_base_url", &providers.deepseek_base_url)?;
    Ok(())
}

fn validate_gateway(gateway: &GatewayConfig) -> Result<(), ConfigError> {
    validate_base_url("gateway.base_url", &gateway.base_url)?;

    if gateway.token.is_some() {
        let usable = gateway.models.iter().any(|model| !model.trim().is_empty());
        if !usable {
            return Err(ConfigError::Validation(
                "gateway.models must name at least one model when gateway.token is set"
                    .to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
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

fn read_env_alias(primary: &str, alias: &str) -> Option<String> {
    read_env(primary).or_else(|| read_env(alias))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
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

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    providers: Option<ProvidersPatch>,
    gateway: Option<GatewayPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ProvidersPatch {
    openai_api_key: Option<String>,
    openai_base_url: Option<String>,
    anthropic_api_key: Option<String>,
    anthropic_base_url: Option<String>,
    deepseek_api_key: Option<String>,
    deepseek_base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct GatewayPatch {
    token: Option<String>,
    base_url: Option<String>,
    models: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

/// Every environment variable the loader reads, for tests that need a clean slate.
pub const ENV_KEYS: &[&str] = &[
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
    "DEEPSEEK_API_KEY",
    "GITHUB_TOKEN",
    "TOOLFINDER_OPENAI_API_KEY",
    "TOOLFINDER_OPENAI_BASE_URL",
    "TOOLFINDER_ANTHROPIC_API_KEY",
    "TOOLFINDER_ANTHROPIC_BASE_URL",
    "TOOLFINDER_DEEPSEEK_API_KEY",
    "TOOLFINDER_DEEPSEEK_BASE_URL",
    "TOOLFINDER_PROVIDER_TIMEOUT_SECS",
    "TOOLFINDER_GATEWAY_TOKEN",
    "TOOLFINDER_GATEWAY_BASE_URL",
    "TOOLFINDER_GATEWAY_MODELS",
    "TOOLFINDER_SERVER_BIND_ADDRESS",
    "TOOLFINDER_SERVER_PORT",
    "TOOLFINDER_LOGGING_LEVEL",
    "TOOLFINDER_LOG_LEVEL",
    "TOOLFINDER_LOGGING_FORMAT",
    "TOOLFINDER_LOG_FORMAT",
];
