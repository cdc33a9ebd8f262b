//! SIP to AIP ingest

use crate::context::{ConvertCtx, ConvertCtxBuilder};
use crate::derive::{bundle_source, copy_schemas, fresh_id, staged_root};
use crate::pipeline::Converter;
use crate::premis::write_premis;
use async_trait::async_trait;
use csip_config::Config;
use csip_errors::Error;
use csip_package::InformationPackage;
use csip_types::layout::{PREMIS_FILE, PREMIS_SCHEMA};
use csip_types::{IpFile, MetadataKind, MetadataRecord, PackageType};
use std::path::Path;

/// Derives an AIP from a SIP
///
/// The AIP keeps the SIP's profile and descriptive metadata, carries the
/// whole SIP as its submission, and gains a preservation record naming the
/// converting software.
#[derive(Clone)]
pub struct SipToAipConverter {
    ctx: ConvertCtx,
}

impl SipToAipConverter {
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
impl Converter for SipToAipConverter {
    fn ctx(&self) -> &ConvertCtx {
        &self.ctx
    }

    fn source_type(&self) -> PackageType {
        PackageType::Sip
    }

    fn target_type(&self) -> PackageType {
        PackageType::Aip
    }

    fn staging_prefix(&self) -> &'static str {
        "sip-to-aip"
    }

    async fn convert_package(
        &self,
        source: &InformationPackage,
        work_dir: &Path,
    ) -> Result<InformationPackage, Error> {
        let settings = &self.ctx.config.sip_to_aip;
        let source_root = staged_root(source)?;

        let mut aip = InformationPackage::new(fresh_id(&source.id), PackageType::Aip)
            .with_profile(source.profile.clone());

        // Preservation metadata of the SIP is not carried over
        for record in &source.descriptive_metadata {
            aip.add_descriptive_metadata(record.clone());
        }

        copy_schemas(&self.ctx, source_root, work_dir, &mut aip).await?;
        aip.add_submission(bundle_source(source, work_dir).await?);

        let premis = work_dir.join(format!("premis-{}.xml", aip.id));
        write_premis(
            &premis,
            &settings.premis_agent_name,
            &settings.premis_agent_type,
        )
        .await?;
        aip.add_preservation_metadata(MetadataRecord::new(
            IpFile::with_name(premis, PREMIS_FILE),
            MetadataKind::Premis,
        ));

        let premis_dir = work_dir.join("premis");
        tokio::fs::create_dir_all(&premis_dir).await?;
        let premis_schema = self
            .ctx
            .resources
            .copy_resource_schema(PREMIS_SCHEMA, &premis_dir)
            .await?;
        aip.add_schema(IpFile::with_name(premis_schema, PREMIS_SCHEMA));

        aip.add_agent(settings.creator_agent.clone());

        tracing::debug!(source_id = %source.id, id = %aip.id, "derived AIP");
        Ok(aip)
    }
}
