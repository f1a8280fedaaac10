use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use toml::Value;
use toolfinder_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    render(&config, config_file_doc.as_ref(), config_file_path.as_deref())
}

fn render(config: &AppConfig, doc: Option<&Value>, path: Option<&Path>) -> String {
    let source = |key_path: &str, env_keys: &[&str]| field_source(key_path, env_keys, doc, path);
    let mut lines = vec![
        "effective config (source precedence: override > env > file > default):".to_string(),
    ];

    let credentials = [
        (
            "providers.openai_api_key",
            &config.providers.openai_api_key,
            ["TOOLFINDER_OPENAI_API_KEY", "OPENAI_API_KEY"],
        ),
        (
            "providers.anthropic_api_key",
            &config.providers.anthropic_api_key,
            ["TOOLFINDER_ANTHROPIC_API_KEY", "ANTHROPIC_API_KEY"],
        ),
        (
            "providers.deepseek_api_key",
            &config.providers.deepseek_api_key,
            ["TOOLFINDER_DEEPSEEK_API_KEY", "DEEPSEEK_API_KEY"],
        ),
    ];
    let base_urls = [
        (
            "providers.openai_base_url",
            &config.providers.openai_base_url,
            "TOOLFINDER_OPENAI_BASE_URL",
        ),
        (
            "providers.anthropic_base_url",
            &config.providers.anthropic_base_url,
            "TOOLFINDER_ANTHROPIC_BASE_URL",
        ),
        (
            "providers.deepseek_base_url",
            &config.providers.deepseek_base_url,
            "TOOLFINDER_DEEPSEEK_BASE_URL",
        ),
    ];

    for ((key, secret, env_keys), (url_key, url, url_env)) in credentials.iter().zip(&base_urls) {
        lines.push(render_line(
            key,
            &redact_secret(secret.as_ref()),
            source(*key, env_keys.as_slice()),
        ));
        lines.push(render_line(url_key, url.as_str(), source(*url_key, &[*url_env])));
    }
    lines.push(render_line(
        "providers.timeout_secs",
        &config.providers.timeout_secs.to_string(),
        source("providers.timeout_secs", &["TOOLFINDER_PROVIDER_TIMEOUT_SECS"]),
    ));

    lines.push(render_line(
        "gateway.token",
        &redact_secret(config.gateway.token.as_ref()),
        source("gateway.token", &["TOOLFINDER_GATEWAY_TOKEN", "GITHUB_TOKEN"]),
    ));
    lines.push(render_line(
        "gateway.base_url",
        &config.gateway.base_url,
        source("gateway.base_url", &["TOOLFINDER_GATEWAY_BASE_URL"]),
    ));
    lines.push(render_line(
        "gateway.models",
        &config.gateway.models.join(", "),
        source("gateway.models", &["TOOLFINDER_GATEWAY_MODELS"]),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["TOOLFINDER_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["TOOLFINDER_SERVER_PORT"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["TOOLFINDER_LOGGING_LEVEL", "TOOLFINDER_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["TOOLFINDER_LOGGING_FORMAT", "TOOLFINDER_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("toolfinder.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/toolfinder.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    for env_key in env_keys {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_secret(secret: Option<&SecretString>) -> String {
    let Some(secret) = secret else {
        return "<unset>".to_string();
    };

    match secret.expose_secret().trim().split_once('-') {
        Some((prefix, _)) if !prefix.is_empty() && prefix.len() <= 4 => format!("{prefix}-***"),
        _ => "<redacted>".to_string(),
    }
}
