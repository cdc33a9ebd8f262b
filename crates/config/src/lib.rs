#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for csip-convert
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/csip-convert/config.toml)
//! - Environment variables
//!
//! The resulting values are read-only once handed to a converter.

pub mod constants;

use csip_errors::{ConfigError, Error};
use csip_types::Agent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub staging: StagingConfig,

    #[serde(default)]
    pub sip_to_aip: SipToAipConfig,

    #[serde(default)]
    pub aip_to_dip: AipToDipConfig,

    #[serde(default)]
    pub schemas: SchemaConfig,
}

/// Staging area configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StagingConfig {
    /// Parent directory for staging roots; system temp dir when unset
    pub base_dir: Option<PathBuf>,
}

/// SIP to AIP conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipToAipConfig {
    #[serde(default = "default_sip_to_aip_agent")]
    pub creator_agent: Agent,
    #[serde(default = "default_premis_agent_name")]
    pub premis_agent_name: String,
    #[serde(default = "default_premis_agent_type")]
    pub premis_agent_type: String,
}

/// AIP to DIP conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AipToDipConfig {
    #[serde(default = "default_aip_to_dip_agent")]
    pub creator_agent: Agent,
    #[serde(default = "default_dip_profile")]
    pub profile: String,
    #[serde(default)]
    pub manifest_type: ManifestTypeStrategy,
}

/// How the DIP package type reaches the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestTypeStrategy {
    /// Build as AIP, then rewrite the type marker in the written manifest
    #[default]
    Patch,
    /// Declare DIP on the build call itself
    Direct,
}

/// Schema resource configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Schema files injected when a source package carries none
    #[serde(default = "default_schemas")]
    pub defaults: Vec<String>,
    /// Directory to read schema files from instead of the embedded copies
    pub override_dir: Option<PathBuf>,
}

// Default implementations

impl Default for SipToAipConfig {
    fn default() -> Self {
        Self {
            creator_agent: default_sip_to_aip_agent(),
            premis_agent_name: default_premis_agent_name(),
            premis_agent_type: default_premis_agent_type(),
        }
    }
}

impl Default for AipToDipConfig {
    fn default() -> Self {
        Self {
            creator_agent: default_aip_to_dip_agent(),
            profile: default_dip_profile(),
            manifest_type: ManifestTypeStrategy::default(),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            defaults: default_schemas(),
            override_dir: None,
        }
    }
}

// Default value functions for serde
fn default_sip_to_aip_agent() -> Agent {
    Agent::software_creator(constants::SIP_TO_AIP_AGENT, constants::AGENT_VERSION)
}

fn default_aip_to_dip_agent() -> Agent {
    Agent::software_creator(constants::AIP_TO_DIP_AGENT, constants::AGENT_VERSION)
}

fn default_premis_agent_name() -> String {
    constants::PREMIS_AGENT_NAME.to_string()
}

fn default_premis_agent_type() -> String {
    constants::PREMIS_AGENT_TYPE.to_string()
}

fn default_dip_profile() -> String {
    csip_types::DIP_PROFILE.to_string()
}

fn default_schemas() -> Vec<String> {
    constants::DEFAULT_SCHEMAS
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("csip-convert").join("config.toml"))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure or
    /// fails [`Config::validate`].
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        tracing::debug!(path = %path.display(), "loading configuration");
        Self::from_toml(&contents)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if fs::try_exists(&config_path).await.unwrap_or(false) {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // CSIP_STAGING_DIR
        if let Ok(dir) = std::env::var("CSIP_STAGING_DIR") {
            if dir.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "CSIP_STAGING_DIR".to_string(),
                    value: dir,
                }
                .into());
            }
            self.staging.base_dir = Some(PathBuf::from(dir));
        }

        // CSIP_DIP_PROFILE
        if let Ok(profile) = std::env::var("CSIP_DIP_PROFILE") {
            if profile.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "CSIP_DIP_PROFILE".to_string(),
                    value: profile,
                }
                .into());
            }
            self.aip_to_dip.profile = profile;
        }

        // CSIP_DIP_MANIFEST_TYPE
        if let Ok(strategy) = std::env::var("CSIP_DIP_MANIFEST_TYPE") {
            self.aip_to_dip.manifest_type = match strategy.as_str() {
                "patch" => ManifestTypeStrategy::Patch,
                "direct" => ManifestTypeStrategy::Direct,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "CSIP_DIP_MANIFEST_TYPE".to_string(),
                        value: strategy,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }

    /// Check invariants the converters rely on
    ///
    /// # Errors
    ///
    /// Returns an error if the default schema list is empty, a creator
    /// agent has no name, or the PREMIS agent name or type is empty.
    pub fn validate(&self) -> Result<(), Error> {
        if self.schemas.defaults.is_empty() {
            return Err(ConfigError::Invalid {
                message: "schemas.defaults must name at least one schema".to_string(),
            }
            .into());
        }
        for (field, value) in [
            ("sip_to_aip.creator_agent", &self.sip_to_aip.creator_agent.name),
            ("aip_to_dip.creator_agent", &self.aip_to_dip.creator_agent.name),
            ("sip_to_aip.premis_agent_name", &self.sip_to_aip.premis_agent_name),
            ("sip_to_aip.premis_agent_type", &self.sip_to_aip.premis_agent_type),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Get the staging base path (with default)
    #[must_use]
    pub fn staging_path(&self) -> PathBuf {
        self.staging
            .base_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
