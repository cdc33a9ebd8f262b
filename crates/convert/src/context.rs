//! Shared collaborators for the converters

use csip_config::Config;
use csip_errors::Error;
use csip_package::{EarkCodec, PackageCodec};
use csip_resources::SchemaResources;
use csip_staging::StagingManager;
use std::sync::Arc;

/// Everything a converter needs besides its input
#[derive(Clone)]
pub struct ConvertCtx {
    /// Converter settings
    pub config: Config,
    /// Where staging roots are created
    pub staging: StagingManager,
    /// Package parser and builder
    pub codec: Arc<dyn PackageCodec>,
    /// Default and preservation schema files
    pub resources: SchemaResources,
}

/// Builder for [`ConvertCtx`]
#[derive(Default)]
pub struct ConvertCtxBuilder {
    config: Option<Config>,
    staging: Option<StagingManager>,
    codec: Option<Arc<dyn PackageCodec>>,
}

impl ConvertCtxBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set staging manager
    #[must_use]
    pub fn with_staging(mut self, staging: StagingManager) -> Self {
        self.staging = Some(staging);
        self
    }

    /// Set package codec
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn PackageCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Build the context
    ///
    /// Missing parts are derived from the configuration: staging under
    /// `staging.base_dir`, the E-ARK codec, and schemas from
    /// `schemas.override_dir` or the embedded copies.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the staging base
    /// directory cannot be created.
    pub async fn build(self) -> Result<ConvertCtx, Error> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let staging = match self.staging {
            Some(staging) => staging,
            None => StagingManager::new(config.staging_path()).await?,
        };
        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(EarkCodec::new()) as Arc<dyn PackageCodec>);
        let resources = match &config.schemas.override_dir {
            Some(dir) => SchemaResources::with_override_dir(dir),
            None => {
                tracing::warn!(
                    "schemas.override_dir is unset; packages will carry the abbreviated bundled schemas"
                );
                SchemaResources::embedded()
            }
        };

        Ok(ConvertCtx {
            config,
            staging,
            codec,
            resources,
        })
    }
}
