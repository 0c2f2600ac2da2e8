//! Reflector configuration (reflekt.toml)
//!
//! ```toml
//! [customization]
//! prefix = "Customized"
//! namespace = "custom"
//!
//! [dates]
//! formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d"]
//!
//! [permissions]
//! global = "ALL"
//!
//! [permissions.namespaces]
//! "plugins.*" = "PUBLIC_ONLY"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::{PermissionStore, ReflectionPermission};
use crate::dates::{CanonicalDates, DEFAULT_DATE_FORMATS};

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Reflector configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReflektConfig {
    /// Override type lookup
    #[serde(default)]
    pub customization: CustomizationConfig,

    /// Date parsing
    #[serde(default)]
    pub dates: DatesConfig,

    /// Reflection permissions
    #[serde(default)]
    pub permissions: PermissionsConfig,
}

/// Naming of override types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomizationConfig {
    /// Prefix put in front of the simple name (default: "Customized")
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Alternate namespace probed second (default: "custom")
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_prefix() -> String {
    "Customized".to_string()
}

fn default_namespace() -> String {
    "custom".to_string()
}

impl Default for CustomizationConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            namespace: default_namespace(),
        }
    }
}

/// Date parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatesConfig {
    /// Fallback patterns tried after RFC 3339, in order
    #[serde(default = "default_date_formats")]
    pub formats: Vec<String>,
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self {
            formats: default_date_formats(),
        }
    }
}

/// Permission configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionsConfig {
    /// Global default (default: "ALL")
    #[serde(default = "default_global")]
    pub global: String,

    /// Namespace or namespace pattern -> permissions
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
}

fn default_global() -> String {
    "ALL".to_string()
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            global: default_global(),
            namespaces: BTreeMap::new(),
        }
    }
}

static NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("static pattern is valid")
});

static NAMESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*\*?|[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*(\.\*\*?)?)$")
        .expect("static pattern is valid")
});

static SIMPLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static pattern is valid"));

impl ReflektConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: ReflektConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SIMPLE_NAME.is_match(&self.customization.prefix) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid customization prefix: '{}'. Must be an identifier",
                self.customization.prefix
            )));
        }

        if !NAMESPACE.is_match(&self.customization.namespace) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid customization namespace: '{}'",
                self.customization.namespace
            )));
        }

        for format in &self.dates.formats {
            if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid date format: '{}'",
                    format
                )));
            }
        }

        parse_permission(&self.permissions.global)?;

        for (pattern, value) in &self.permissions.namespaces {
            if !NAMESPACE_PATTERN.is_match(pattern) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid namespace pattern: '{}'",
                    pattern
                )));
            }
            parse_permission(value)?;
        }

        Ok(())
    }

    /// Permission store described by the `[permissions]` section.
    ///
    /// Wildcard rules are tried longest pattern first.
    pub fn permission_store(&self) -> Result<PermissionStore, ConfigError> {
        let mut store = PermissionStore::new();
        store.set_global(parse_permission(&self.permissions.global)?);

        let mut entries: Vec<(&String, &String)> = self.permissions.namespaces.iter().collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

        for (pattern, value) in entries {
            store.set_namespace(pattern, parse_permission(value)?);
        }

        Ok(store)
    }

    /// Date codec described by the `[dates]` section
    pub fn date_codec(&self) -> CanonicalDates {
        CanonicalDates::new(self.dates.formats.iter().cloned())
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn parse_permission(value: &str) -> Result<ReflectionPermission, ConfigError> {
    value.parse().map_err(ConfigError::ValidationError)
}
