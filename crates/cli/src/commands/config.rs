use std::env;
use std::fs;
use std::path::Path;

use catalog_admin_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use super::CommandResult;

struct Field {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
    flag: Option<&'static str>,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;

    let fields = [
        Field {
            key: "api.base_url",
            value: config.api.base_url.clone(),
            env_keys: &["CATALOG_ADMIN_API_BASE_URL"],
            flag: overrides.api_base_url.as_ref().map(|_| "--api-url"),
        },
        Field {
            key: "api.timeout_secs",
            value: config.api.timeout_secs.to_string(),
            env_keys: &["CATALOG_ADMIN_API_TIMEOUT_SECS"],
            flag: overrides.api_timeout_secs.map(|_| "--timeout-secs"),
        },
        Field {
            key: "catalog.no_match_reset_ms",
            value: config.catalog.no_match_reset_ms.to_string(),
            env_keys: &["CATALOG_ADMIN_CATALOG_NO_MATCH_RESET_MS"],
            flag: None,
        },
        Field {
            key: "session.path",
            value: config.session.path.display().to_string(),
            env_keys: &["CATALOG_ADMIN_SESSION_PATH"],
            flag: overrides.session_path.as_ref().map(|_| "--session"),
        },
        Field {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["CATALOG_ADMIN_LOGGING_LEVEL", "CATALOG_ADMIN_LOG_LEVEL"],
            flag: overrides.log_level.as_ref().map(|_| "--log-level"),
        },
        Field {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            env_keys: &["CATALOG_ADMIN_LOGGING_FORMAT", "CATALOG_ADMIN_LOG_FORMAT"],
            flag: overrides.log_format.map(|_| "--log-format"),
        },
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for field in &fields {
        let source =
            field_source(field, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(field.key, &field.value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(flag) = field.flag {
        return format!("flag ({flag})");
    }

    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
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
