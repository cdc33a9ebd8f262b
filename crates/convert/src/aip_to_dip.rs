//! AIP to DIP dissemination

use crate::context::{ConvertCtx, ConvertCtxBuilder};
use crate::derive::{bundle_source, copy_schemas, fresh_id, staged_root};
use crate::patch::patch_package_type;
use crate::pipeline::Converter;
use async_trait::async_trait;
use csip_config::{Config, ManifestTypeStrategy};
use csip_errors::Error;
use csip_package::InformationPackage;
use csip_types::PackageType;
use std::path::{Path, PathBuf};

/// Derives a DIP from an AIP
#[derive(Clone)]
pub struct AipToDipConverter {
    ctx: ConvertCtx,
}

impl AipToDipConverter {
    #[must_use]
    pub fn new(ctx: ConvertCtx) -> Self {
        Self { ctx }
    }

    /// Converter with collaborators derived from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or staging cannot
    /// be prepared.
    pub async fn from_config(config: Config) -> Result<Self, Error> {
        let ctx = ConvertCtxBuilder::new().with_config(config).build().await?;
        Ok(Self::new(ctx))
    }
}

#[async_trait]
impl Converter for AipToDipConverter {
    fn ctx(&self) -> &ConvertCtx {
        &self.ctx
    }

    fn source_type(&self) -> PackageType {
        PackageType::Aip
    }

    fn target_type(&self) -> PackageType {
        PackageType::Dip
    }

    fn staging_prefix(&self) -> &'static str {
        "aip-to-dip"
    }

    async fn convert_package(
        &self,
        source: &InformationPackage,
        work_dir: &Path,
    ) -> Result<InformationPackage, Error> {
        let settings = &self.ctx.config.aip_to_dip;
        let source_root = staged_root(source)?;

        let mut dip = InformationPackage::new(fresh_id(&source.id), PackageType::Dip)
            .with_profile(settings.profile.clone());

        for record in &source.descriptive_metadata {
            dip.add_descriptive_metadata(record.clone());
        }
        for record in &source.preservation_metadata {
            dip.add_preservation_metadata(record.clone());
        }

        copy_schemas(&self.ctx, source_root, work_dir, &mut dip).await?;
        dip.add_submission(bundle_source(source, work_dir).await?);
        dip.add_agent(settings.creator_agent.clone());

        tracing::debug!(source_id = %source.id, id = %dip.id, "derived DIP");
        Ok(dip)
    }

    async fn build_package(
        &self,
        package: &InformationPackage,
        target_dir: &Path,
    ) -> Result<PathBuf, Error> {
        match self.ctx.config.aip_to_dip.manifest_type {
            ManifestTypeStrategy::Direct => self.ctx.codec.build(package, target_dir).await,
            ManifestTypeStrategy::Patch => {
                let built = self
                    .ctx
                    .codec
                    .build_as(package, target_dir, PackageType::Aip)
                    .await?;
                patch_package_type(target_dir, &package.id, PackageType::Aip, package.package_type)
                    .await?;
                Ok(built)
            }
        }
    }
}
