use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::loader::CatalogLocation;

pub const DEFAULT_BUCKET: &str = "stores-test";
pub const DEFAULT_OBJECT: &str = "stores";
pub const DEFAULT_GCS_BASE_URL: &str = "https://storage.googleapis.com";
pub const DEFAULT_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub object: String,
    pub base_url: String,
    pub root_dir: PathBuf,
    /// Static bearer token. When unset, tokens come from `metadata_url`
    /// unless `anonymous` is set.
    pub access_token: Option<SecretString>,
    pub anonymous: bool,
    pub metadata_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Gcs,
    Filesystem,
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
    pub catalog_backend: Option<StorageBackend>,
    pub catalog_bucket: Option<String>,
    pub catalog_object: Option<String>,
    pub catalog_base_url: Option<String>,
    pub catalog_root_dir: Option<PathBuf>,
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
            catalog: CatalogConfig {
                backend: StorageBackend::Gcs,
                bucket: DEFAULT_BUCKET.to_string(),
                object: DEFAULT_OBJECT.to_string(),
                base_url: DEFAULT_GCS_BASE_URL.to_string(),
                root_dir: PathBuf::from("data"),
                access_token: None,
                anonymous: false,
                metadata_url: DEFAULT_METADATA_TOKEN_URL.to_string(),
                timeout_secs: 10,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gcs" => Ok(Self::Gcs),
            "filesystem" | "fs" => Ok(Self::Filesystem),
            other => Err(ConfigError::Validation(format!(
                "unsupported catalog backend `{other}` (expected gcs|filesystem)"
            ))),
        }
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

impl CatalogConfig {
    pub fn location(&self) -> CatalogLocation {
        CatalogLocation::new(self.bucket.clone(), self.object.clone())
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
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shelfhook.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(backend) = catalog.backend {
                self.catalog.backend = backend;
            }
            if let Some(bucket) = catalog.bucket {
                self.catalog.bucket = bucket;
            }
            if let Some(object) = catalog.object {
                self.catalog.object = object;
            }
            if let Some(base_url) = catalog.base_url {
                self.catalog.base_url = base_url;
            }
            if let Some(root_dir) = catalog.root_dir {
                self.catalog.root_dir = root_dir;
            }
            if let Some(access_token) = catalog.access_token {
                self.catalog.access_token = Some(access_token.into());
            }
            if let Some(anonymous) = catalog.anonymous {
                self.catalog.anonymous = anonymous;
            }
            if let Some(metadata_url) = catalog.metadata_url {
                self.catalog.metadata_url = metadata_url;
            }
            if let Some(timeout_secs) = catalog.timeout_secs {
                self.catalog.timeout_secs = timeout_secs;
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
        if let Some(value) = read_env("SHELFHOOK_CATALOG_BACKEND") {
            self.catalog.backend = value.parse()?;
        }
        if let Some(value) = read_env("SHELFHOOK_CATALOG_BUCKET") {
            self.catalog.bucket = value;
        }
        if let Some(value) = read_env("SHELFHOOK_CATALOG_OBJECT") {
            self.catalog.object = value;
        }
        if let Some(value) = read_env("SHELFHOOK_CATALOG_BASE_URL") {
            self.catalog.base_url = value;
        }
        if let Some(value) = read_env("SHELFHOOK_CATALOG_ROOT_DIR") {
            self.catalog.root_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("SHELFHOOK_CATALOG_ACCESS_TOKEN") {
            self.catalog.access_token = Some(value.into());
        }
        if let Some(value) = read_env("SHELFHOOK_CATALOG_ANONYMOUS") {
            self.catalog.anonymous = parse_bool("SHELFHOOK_CATALOG_ANONYMOUS", &value)?;
        }
        if let Some(value) = read_env("SHELFHOOK_CATALOG_METADATA_URL") {
            self.catalog.metadata_url = value;
        }
        if let Some(value) = read_env("SHELFHOOK_CATALOG_TIMEOUT_SECS") {
            self.catalog.timeout_secs = parse_u64("SHELFHOOK_CATALOG_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("SHELFHOOK_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        // Cloud runtimes hand the listening port over as a bare PORT.
        let port = read_env("SHELFHOOK_SERVER_PORT").map(|value| ("SHELFHOOK_SERVER_PORT", value));
        if let Some((key, value)) = port.or_else(|| read_env("PORT").map(|value| ("PORT", value)))
        {
            self.server.port = parse_u16(key, &value)?;
        }
        if let Some(value) = read_env("SHELFHOOK_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SHELFHOOK_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("SHELFHOOK_LOGGING_LEVEL").or_else(|| read_env("SHELFHOOK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHELFHOOK_LOGGING_FORMAT").or_else(|| read_env("SHELFHOOK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.catalog_backend {
            self.catalog.backend = backend;
        }
        if let Some(bucket) = overrides.catalog_bucket {
            self.catalog.bucket = bucket;
        }
        if let Some(object) = overrides.catalog_object {
            self.catalog.object = object;
        }
        if let Some(base_url) = overrides.catalog_base_url {
            self.catalog.base_url = base_url;
        }
        if let Some(root_dir) = overrides.catalog_root_dir {
            self.catalog.root_dir = root_dir;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shelfhook.toml"), PathBuf::from("config/shelfhook.toml")]
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

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.bucket.trim().is_empty() {
        return Err(ConfigError::Validation("catalog.bucket must not be empty".to_string()));
    }
    if catalog.object.trim().is_empty() {
        return Err(ConfigError::Validation("catalog.object must not be empty".to_string()));
    }

    if catalog.timeout_secs == 0 || catalog.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "catalog.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    match catalog.backend {
        StorageBackend::Gcs => {
            let base_url = catalog.base_url.trim();
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::Validation(
                    "catalog.base_url must start with http:// or https://".to_string(),
                ));
            }
            let blank_token = catalog
                .access_token
                .as_ref()
                .map(|token| token.expose_secret().trim().is_empty())
                .unwrap_or(false);
            if blank_token {
                return Err(ConfigError::Validation(
                    "catalog.access_token is set but empty; remove it or set catalog.anonymous"
                        .to_string(),
                ));
            }
            if catalog.anonymous && catalog.access_token.is_some() {
                return Err(ConfigError::Validation(
                    "catalog.anonymous cannot be combined with catalog.access_token".to_string(),
                ));
            }
            let metadata_url = catalog.metadata_url.trim();
            let token_from_metadata = !catalog.anonymous && catalog.access_token.is_none();
            if token_from_metadata
                && !metadata_url.starts_with("http://")
                && !metadata_url.starts_with("https://")
            {
                return Err(ConfigError::Validation(
                    "catalog.metadata_url must start with http:// or https://".to_string(),
                ));
            }
        }
        StorageBackend::Filesystem => {
            if catalog.root_dir.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "catalog.root_dir is required for the filesystem backend".to_string(),
                ));
            }
        }
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
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

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnvOverride {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    backend: Option<StorageBackend>,
    bucket: Option<String>,
    object: Option<String>,
    base_url: Option<String>,
    root_dir: Option<PathBuf>,
    access_token: Option<String>,
    anonymous: Option<bool>,
    metadata_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
