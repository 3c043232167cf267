//! # Resolver Configuration
//!
//! Cross-cutting, read-only settings shared by every document of a run.

use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings consumed (never mutated) by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Header names applied to every request by the client runtime.
    /// They are excluded from synthesized `<Operation>Headers` types.
    pub global_headers: Vec<String>,
    /// Visibility marker for generated types and functions.
    pub internal_only: bool,
    /// Whether generated models should be serializable.
    pub codable: bool,
    /// Allow-list of service names. `None` processes everything.
    pub services: Option<Vec<String>>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            global_headers: Vec::new(),
            internal_only: false,
            codable: true,
            services: None,
        }
    }
}

impl ResolverConfig {
    /// Parses a YAML (or JSON) configuration string.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Whether the allow-list admits `service`.
    pub fn allows(&self, service: &str) -> bool {
        match &self.services {
            Some(list) => list.iter().any(|s| s.eq_ignore_ascii_case(service)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty() {
        let config = ResolverConfig::from_yaml_str("").unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert!(config.codable);
        assert!(config.allows("anything"));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
globalHeaders: [X-Request-Id, Authorization]
internalOnly: true
services: [users, Billing]
"#;
        let config = ResolverConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.global_headers.len(), 2);
        assert!(config.internal_only);
        assert!(config.codable);
        assert!(config.allows("billing"));
        assert!(!config.allows("inventory"));
    }

    #[test]
    fn test_parse_json() {
        let config = ResolverConfig::from_yaml_str(r#"{"codable": false}"#).unwrap();
        assert!(!config.codable);
        assert!(config.global_headers.is_empty());
    }
}
