use std::env;
use std::fs;
use std::path::Path;

use secrecy::ExposeSecret;
use shelfhook_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

struct Field<'a> {
    key_path: &'static str,
    env_keys: &'a [&'static str],
    value: String,
}

pub fn run() -> String {
    run_with_options(LoadOptions::default())
}

pub fn run_with_options(options: LoadOptions) -> String {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let access_token = match &config.catalog.access_token {
        Some(token) => redact_token(token.expose_secret()),
        None => "<unset>".to_string(),
    };

    let fields = [
        Field {
            key_path: "catalog.backend",
            env_keys: &["SHELFHOOK_CATALOG_BACKEND"],
            value: format!("{:?}", config.catalog.backend),
        },
        Field {
            key_path: "catalog.bucket",
            env_keys: &["SHELFHOOK_CATALOG_BUCKET"],
            value: config.catalog.bucket.clone(),
        },
        Field {
            key_path: "catalog.object",
            env_keys: &["SHELFHOOK_CATALOG_OBJECT"],
            value: config.catalog.object.clone(),
        },
        Field {
            key_path: "catalog.base_url",
            env_keys: &["SHELFHOOK_CATALOG_BASE_URL"],
            value: config.catalog.base_url.clone(),
        },
        Field {
            key_path: "catalog.root_dir",
            env_keys: &["SHELFHOOK_CATALOG_ROOT_DIR"],
            value: config.catalog.root_dir.display().to_string(),
        },
        Field {
            key_path: "catalog.access_token",
            env_keys: &["SHELFHOOK_CATALOG_ACCESS_TOKEN"],
            value: access_token,
        },
        Field {
            key_path: "catalog.anonymous",
            env_keys: &["SHELFHOOK_CATALOG_ANONYMOUS"],
            value: config.catalog.anonymous.to_string(),
        },
        Field {
            key_path: "catalog.metadata_url",
            env_keys: &["SHELFHOOK_CATALOG_METADATA_URL"],
            value: config.catalog.metadata_url.clone(),
        },
        Field {
            key_path: "catalog.timeout_secs",
            env_keys: &["SHELFHOOK_CATALOG_TIMEOUT_SECS"],
            value: config.catalog.timeout_secs.to_string(),
        },
        Field {
            key_path: "server.bind_address",
            env_keys: &["SHELFHOOK_SERVER_BIND_ADDRESS"],
            value: config.server.bind_address.clone(),
        },
        Field {
            key_path: "server.port",
            env_keys: &["SHELFHOOK_SERVER_PORT", "PORT"],
            value: config.server.port.to_string(),
        },
        Field {
            key_path: "server.graceful_shutdown_secs",
            env_keys: &["SHELFHOOK_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            value: config.server.graceful_shutdown_secs.to_string(),
        },
        Field {
            key_path: "logging.level",
            env_keys: &["SHELFHOOK_LOGGING_LEVEL", "SHELFHOOK_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key_path: "logging.format",
            env_keys: &["SHELFHOOK_LOGGING_FORMAT", "SHELFHOOK_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in &fields {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
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
    if let Some(env_key) = env_keys.iter().find(|key| env_value_set(key)) {
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

// Blank values are ignored by the config loader, so they never count as a source.
fn env_value_set(key: &str) -> bool {
    env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
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

// OAuth access tokens carry a readable `ya29.` style prefix; keep only that.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('.') {
        return format!("{prefix}.***");
    }

    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use super::{contains_path, field_source, redact_token};

    #[test]
    fn redaction_keeps_only_the_token_prefix() {
        assert_eq!(redact_token("ya29.a0AfH6SMB"), "ya29.***");
        assert_eq!(redact_token("opaque"), "<redacted>");
        assert_eq!(redact_token("  "), "<empty>");
    }

    #[test]
    fn blank_env_value_does_not_claim_the_source() {
        let key = "SHELFHOOK_TEST_FIELD_SOURCE_BLANK";
        let doc: toml::Value = "[catalog]\nbucket = \"b\"\n".parse().expect("toml");

        std::env::set_var(key, "  ");
        let blank = field_source("catalog.bucket", &[key], Some(&doc), None);
        std::env::set_var(key, "from-env");
        let set = field_source("catalog.bucket", &[key], Some(&doc), None);
        std::env::remove_var(key);

        assert_eq!(blank, "file (config file)");
        assert_eq!(set, format!("env ({key})"));
    }

    #[test]
    fn nested_key_lookup_walks_tables() {
        let doc: toml::Value = "[catalog]\nbucket = \"b\"\n".parse().expect("toml");
        assert!(contains_path(&doc, "catalog.bucket"));
        assert!(!contains_path(&doc, "catalog.object"));
        assert!(!contains_path(&doc, "server.port"));
    }
}
