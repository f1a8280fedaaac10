use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use toolfinder_cli::commands::{config, recommend};
use toolfinder_core::config::ENV_KEYS;

#[test]
fn recommend_json_returns_catalog_tools_without_credentials() {
    with_env(&[], || {
        let result = recommend::run("convert csv to pdf", false, true);
        assert_eq!(result.exit_code, 0, "expected catalog-only recommendation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["query"], "convert csv to pdf");
        let tools = payload["tools"].as_array().expect("tools array");
        assert_eq!(tools.len(), 5);
        assert_eq!(payload["total_found"], 5);
        assert!(payload.get("source").is_none());
    });
}

#[test]
fn recommend_with_ai_falls_back_when_gateway_is_off() {
    with_env(&[], || {
        let result = recommend::run("music", true, false);
        assert_eq!(result.exit_code, 0, "expected fallback recommendation");
        assert!(result.output.starts_with("Found 4 AI tools for: 'music'"));
        assert!(result.output.contains("1. AIVA"));
    });
}

#[test]
fn recommend_rejects_blank_query() {
    with_env(&[], || {
        let result = recommend::run("   ", false, true);
        assert_eq!(result.exit_code, 5, "expected invalid query code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_query");
        assert_eq!(payload["message"], "Please provide a query");
    });
}

#[test]
fn recommend_returns_config_failure_for_invalid_timeout() {
    with_env(&[("TOOLFINDER_PROVIDER_TIMEOUT_SECS", "0")], || {
        let result = recommend::run("pdf", false, true);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn config_redacts_credentials_and_names_env_sources() {
    with_env(
        &[("OPENAI_API_KEY", "sk-live-very-secret"), ("TOOLFINDER_SERVER_PORT", "8088")],
        || {
            let output = config::run();

            assert!(output.contains("- providers.openai_api_key = sk-*** (source: env (OPENAI_API_KEY))"));
            assert!(output.contains("- server.port = 8088 (source: env (TOOLFINDER_SERVER_PORT))"));
            assert!(output.contains("- gateway.token = <unset> (source: default)"));
            assert!(!output.contains("very-secret"));
        },
    );
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let previous_values: Vec<(&str, Option<String>)> =
        ENV_KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in ENV_KEYS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
