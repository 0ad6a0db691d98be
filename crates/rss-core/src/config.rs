//! # Status Configuration
//!
//! The status vocabulary and the transition restrictions are deployment
//! configuration. [`StatusConfig`] is the document shape, loaded from YAML:
//!
//! ```yaml
//! statuses: [Banned, Probing, Degraded, Active]   # most restrictive first
//! transitions:
//!   Banned:
//!     allowed: [Banned, Probing, Unknown, Error]
//!     fallback: Probing
//! ```
//!
//! A status without a `transitions` entry may move to any status.
//!
//! [`ConfigurationSource`] is the read-only boundary the decision point uses
//! to fetch the valid vocabulary. Implementations must be safe to share
//! between concurrent decisions.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::status::{Status, StatusVocabulary};

/// Read-only access to the configured status vocabulary.
pub trait ConfigurationSource {
    /// The valid statuses, most restrictive first.
    fn valid_statuses(&self) -> Result<StatusVocabulary, ConfigError>;
}

/// Access restriction for one current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    /// Statuses directly reachable from the current status.
    pub allowed: Vec<Status>,
    /// Status adopted when a candidate is not reachable. When absent, the
    /// most restrictive member of `allowed` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Status>,
}

/// The status configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Valid statuses, most restrictive first.
    pub statuses: StatusVocabulary,
    /// Restricted current statuses, keyed by status.
    #[serde(default)]
    pub transitions: BTreeMap<Status, TransitionRule>,
}

impl StatusConfig {
    /// The reference configuration.
    ///
    /// A banned element may only be released to `Probing`; a probing element
    /// cannot jump straight back to `Active` or `Degraded`.
    pub fn standard() -> Self {
        let banned = Status::from_static("Banned");
        let probing = Status::from_static("Probing");

        let mut transitions = BTreeMap::new();
        transitions.insert(
            banned.clone(),
            TransitionRule {
                allowed: vec![banned.clone(), probing.clone(), Status::unknown(), Status::error()],
                fallback: Some(probing.clone()),
            },
        );
        transitions.insert(
            probing.clone(),
            TransitionRule {
                allowed: vec![probing.clone(), banned, Status::unknown(), Status::error()],
                fallback: Some(probing),
            },
        );

        Self {
            statuses: StatusVocabulary::standard(),
            transitions,
        }
    }

    /// Parse a configuration document from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Read and parse a configuration document from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Serialize the document back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ConfigurationSource for StatusConfig {
    fn valid_statuses(&self) -> Result<StatusVocabulary, ConfigError> {
        Ok(self.statuses.clone())
    }
}

impl<T: ConfigurationSource + ?Sized> ConfigurationSource for std::sync::Arc<T> {
    fn valid_statuses(&self) -> Result<StatusVocabulary, ConfigError> {
        (**self).valid_statuses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
statuses: [Banned, Probing, Degraded, Active]
transitions:
  Banned:
    allowed: [Banned, Probing]
    fallback: Probing
  Probing:
    allowed: [Probing, Banned, Unknown]
"#;

    #[test]
    fn parse_sample_document() {
        let config = StatusConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.statuses.len(), 4);
        let banned = config.transitions.get(&Status::new("Banned").unwrap()).unwrap();
        assert_eq!(banned.fallback.as_ref().map(Status::as_str), Some("Probing"));
        let probing = config.transitions.get(&Status::new("Probing").unwrap()).unwrap();
        assert!(probing.fallback.is_none());
        assert_eq!(probing.allowed.len(), 3);
    }

    #[test]
    fn transitions_are_optional() {
        let config = StatusConfig::from_yaml_str("statuses: [Banned, Active]\n").unwrap();
        assert!(config.transitions.is_empty());
        assert_eq!(config.valid_statuses().unwrap().len(), 2);
    }

    #[test]
    fn duplicate_status_is_rejected() {
        let err = StatusConfig::from_yaml_str("statuses: [Active, Active]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn standard_roundtrips_through_yaml() {
        let config = StatusConfig::standard();
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(StatusConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = StatusConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.transitions.len(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = StatusConfig::from_yaml_file("/nonexistent/rss/status.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/rss/status.yaml"));
    }
}
