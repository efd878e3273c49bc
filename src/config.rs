use crate::{EnvTokenError, Result};
use config::{Config, ConfigError, Environment, Map};
use tracing::{debug, info};

/// Naming prefix shared by every configuration variable (`INPUT_PREFIX`, ...)
pub const INPUT_PREFIX: &str = "INPUT";

pub const DEFAULT_PREFIX: &str = "#{";
pub const DEFAULT_SUFFIX: &str = "}#";
pub const DEFAULT_FILES: &str = "**";

/// Value of a boolean setting whose variable is not set at all.
pub const DEFAULT_BOOL: bool = true;

/// Raw `INPUT_*` lookups backed by the `config` crate.
///
/// Only variables spelled exactly `INPUT_<KEY>` in uppercase are read. Empty variables are ignored, so `INPUT_X=""` behaves exactly like
/// an unset `INPUT_X`.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    inner: Config,
}

impl EnvConfig {
    /// Read `INPUT_*` variables from the process environment
    pub fn from_env() -> Result<Self> {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::build(vars)
    }

    /// Read `INPUT_*` variables from an explicit map of environment entries
    pub fn from_map(vars: Map<String, String>) -> Result<Self> {
        Self::build(vars)
    }

    fn build(vars: Map<String, String>) -> Result<Self> {
        // the `config` source lowercases keys, so only uppercase names may reach it
        let exact_prefix = format!("{INPUT_PREFIX}_");
        let source = vars
            .into_iter()
            .filter(|(key, _)| key.starts_with(&exact_prefix) && !key.bytes().any(|b| b.is_ascii_lowercase()))
            .collect();

        let environment = Environment::with_prefix(INPUT_PREFIX)
            .prefix_separator("_")
            .ignore_empty(true)
            .source(Some(source));

        let inner = Config::builder().add_source(environment).build()?;
        Ok(Self { inner })
    }

    fn lookup(&self, key: &str) -> Result<Option<String>> {
        match self.inner.get_string(&key.to_ascii_lowercase()) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up `INPUT_<key>`, falling back to `default`.
    ///
    /// An empty `default` marks the key as required: an unset key then
    /// yields [`EnvTokenError::MissingRequiredConfig`].
    pub fn get(&self, key: &str, default: &str) -> Result<String> {
        match self.lookup(key)? {
            Some(value) => Ok(value),
            None if default.is_empty() => Err(EnvTokenError::MissingRequiredConfig(key.to_string())),
            None => Ok(default.to_string()),
        }
    }

    /// Look up `INPUT_<key>` as a boolean.
    ///
    /// An unset key is [`DEFAULT_BOOL`] (`true`). A set key that is not a
    /// boolean literal is an error.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = match self.get(key, "") {
            Ok(value) => value,
            Err(EnvTokenError::MissingRequiredConfig(_)) => return Ok(DEFAULT_BOOL),
            Err(e) => return Err(e),
        };

        parse_bool(&value).ok_or_else(|| EnvTokenError::InvalidBooleanConfig {
            key: key.to_string(),
            value,
        })
    }
}

/// Boolean literals accepted for flag settings
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Resolved configuration for one run. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub prefix: String,
    pub suffix: String,
    pub file_pattern: String,
    pub fail_on_missing: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            file_pattern: DEFAULT_FILES.to_string(),
            fail_on_missing: DEFAULT_BOOL,
        }
    }
}

impl Settings {
    pub fn load(config: &EnvConfig) -> Result<Self> {
        let settings = Self {
            prefix: config.get("PREFIX", DEFAULT_PREFIX)?,
            suffix: config.get("SUFFIX", DEFAULT_SUFFIX)?,
            file_pattern: config.get("FILES", DEFAULT_FILES)?,
            fail_on_missing: config.get_bool("FAIL_ON_VARIABLE_NOT_FOUND")?,
        };

        info!(
            prefix = %settings.prefix,
            suffix = %settings.suffix,
            files = %settings.file_pattern,
            fail_on_variable_not_found = settings.fail_on_missing,
            "Loaded configuration"
        );
        Ok(settings)
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        let mut names: Vec<String> = std::env::vars_os()
            .map(|(key, _)| key.to_string_lossy().into_owned())
            .collect();
        names.sort();
        debug!(variables = ?names, "Process environment");

        Self::load(&EnvConfig::from_env()?)
    }
}
