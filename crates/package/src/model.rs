//! In-memory information package

use crate::codec::{EarkCodec, PackageCodec};
use csip_errors::Error;
use csip_types::layout::{self, METS_FILE};
use csip_types::{
    Agent, ContentType, IpFile, MetadataRecord, PackageType, CSIP_PROFILE,
};
use std::path::{Path, PathBuf};

/// A SIP, AIP or DIP and everything that goes into its manifest
#[derive(Debug, Clone, PartialEq)]
pub struct InformationPackage {
    pub id: String,
    pub package_type: PackageType,
    pub profile: String,
    pub content_type: ContentType,
    /// Staged package root this model was parsed from
    pub base_path: Option<PathBuf>,
    pub descriptive_metadata: Vec<MetadataRecord>,
    pub preservation_metadata: Vec<MetadataRecord>,
    schemas: Vec<IpFile>,
    pub agents: Vec<Agent>,
    pub submissions: Vec<IpFile>,
}

impl InformationPackage {
    /// Empty package with the common CSIP profile
    #[must_use]
    pub fn new(id: impl Into<String>, package_type: PackageType) -> Self {
        Self {
            id: id.into(),
            package_type,
            profile: CSIP_PROFILE.to_string(),
            content_type: ContentType::default(),
            base_path: None,
            descriptive_metadata: Vec::new(),
            preservation_metadata: Vec::new(),
            schemas: Vec::new(),
            agents: Vec::new(),
            submissions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn add_descriptive_metadata(&mut self, record: MetadataRecord) -> &mut Self {
        self.descriptive_metadata.push(record);
        self
    }

    pub fn add_preservation_metadata(&mut self, record: MetadataRecord) -> &mut Self {
        self.preservation_metadata.push(record);
        self
    }

    /// Register a schema; a schema with the same name is replaced in place
    pub fn add_schema(&mut self, schema: IpFile) -> &mut Self {
        if let Some(existing) = self.schemas.iter_mut().find(|s| s.name == schema.name) {
            *existing = schema;
        } else {
            self.schemas.push(schema);
        }
        self
    }

    pub fn add_agent(&mut self, agent: Agent) -> &mut Self {
        self.agents.push(agent);
        self
    }

    pub fn add_submission(&mut self, submission: IpFile) -> &mut Self {
        self.submissions.push(submission);
        self
    }

    #[must_use]
    pub fn schemas(&self) -> &[IpFile] {
        &self.schemas
    }

    /// Package-relative names of every file a build of this package produces
    #[must_use]
    pub fn entry_names(&self) -> Vec<String> {
        let sections = [
            (layout::DESCRIPTIVE_DIR, metadata_files(&self.descriptive_metadata)),
            (layout::PRESERVATION_DIR, metadata_files(&self.preservation_metadata)),
            (layout::SCHEMAS_DIR, self.schemas.iter().collect()),
            (layout::SUBMISSION_DIR, self.submissions.iter().collect()),
        ];

        let mut names: Vec<String> = sections
            .iter()
            .flat_map(|(dir, files)| {
                files
                    .iter()
                    .map(|f| layout::entry(dir, &f.relative_path()))
            })
            .collect();
        names.push(METS_FILE.to_string());
        names
    }

    /// Serialize to `<target_dir>/<id>/` with the default codec
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced file cannot be read, the schema set
    /// is empty, or the layout cannot be written.
    pub async fn build(&self, target_dir: &Path) -> Result<PathBuf, Error> {
        EarkCodec::new().build(self, target_dir).await
    }
}

fn metadata_files(records: &[MetadataRecord]) -> Vec<&IpFile> {
    records.iter().map(|r| &r.file).collect()
}
