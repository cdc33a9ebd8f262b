//! End-to-end conversion tests

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use csip_config::{Config, ManifestTypeStrategy};
    use csip_convert::*;
    use csip_errors::{BuildError, Error, PackageError};
    use csip_package::{EarkCodec, InformationPackage, PackageCodec};
    use csip_resources::SchemaResources;
    use csip_staging::StagingManager;
    use csip_types::{
        Agent, IpFile, MetadataKind, MetadataRecord, PackageType, CSIP_PROFILE, DIP_PROFILE,
    };
    use std::collections::BTreeSet;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};
    use tokio::fs;

    const SIP_ID: &str = "uuid-B3E228EE-B429-45D8-B814-5F567B1A8754";
    const DC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Sample</dc:title></metadata>
"#;

    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                temp: tempdir().unwrap(),
            }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.temp.path().join(name)
        }

        fn staging_dir(&self) -> PathBuf {
            self.path("staging")
        }

        async fn ctx(&self, config: Config) -> ConvertCtx {
            ConvertCtxBuilder::new()
                .with_config(config)
                .with_staging(StagingManager::new(self.staging_dir()).await.unwrap())
                .build()
                .await
                .unwrap()
        }

        async fn ctx_with_codec(&self, codec: Arc<dyn PackageCodec>) -> ConvertCtx {
            ConvertCtxBuilder::new()
                .with_staging(StagingManager::new(self.staging_dir()).await.unwrap())
                .with_codec(codec)
                .build()
                .await
                .unwrap()
        }

        /// A SIP archive with DC metadata and the four core schemas, stored
        /// as `<id>/...` entries
        async fn sip_archive(&self) -> PathBuf {
            let inputs = self.path("sip-inputs");
            fs::create_dir_all(&inputs).await.unwrap();
            let dc = inputs.join("DC.xml");
            fs::write(&dc, DC).await.unwrap();

            let mut sip = InformationPackage::new(SIP_ID, PackageType::Sip);
            sip.add_descriptive_metadata(MetadataRecord::new(IpFile::new(dc), MetadataKind::Dc));
            let defaults: Vec<String> = Config::default().schemas.defaults;
            for schema in SchemaResources::embedded()
                .copy_schemas(&defaults, &inputs)
                .await
                .unwrap()
            {
                sip.add_schema(schema);
            }
            sip.add_agent(Agent::software_creator("fixture-producer", "0.1.0"));

            let built = self.path("sip-built");
            sip.build(&built).await.unwrap();
            let archive = self.path("sip.zip");
            csip_archive::pack_to_file(&built, &archive).await.unwrap();
            archive
        }

        /// A SIP with two same-named descriptive records in separate
        /// folders and a preservation record of its own
        async fn sip_archive_with_nested_metadata(&self) -> PathBuf {
            let inputs = self.path("nested-inputs");
            let mut sip = InformationPackage::new(SIP_ID, PackageType::Sip);
            for folder in ["ead", "dc"] {
                let dir = inputs.join(folder);
                fs::create_dir_all(&dir).await.unwrap();
                let path = dir.join("DC.xml");
                fs::write(&path, format!("<record>{folder}</record>")).await.unwrap();
                sip.add_descriptive_metadata(MetadataRecord::new(
                    IpFile::new(path).with_folders([folder]),
                    MetadataKind::Dc,
                ));
            }
            let producer_premis = inputs.join("producer-premis.xml");
            fs::write(&producer_premis, "<premis>producer</premis>")
                .await
                .unwrap();
            sip.add_preservation_metadata(MetadataRecord::new(
                IpFile::new(producer_premis),
                MetadataKind::Premis,
            ));
            let defaults: Vec<String> = Config::default().schemas.defaults;
            for schema in SchemaResources::embedded()
                .copy_schemas(&defaults, &inputs)
                .await
                .unwrap()
            {
                sip.add_schema(schema);
            }

            let built = self.path("nested-sip-built");
            sip.build(&built).await.unwrap();
            let archive = self.path("nested-sip.zip");
            csip_archive::pack_to_file(&built, &archive).await.unwrap();
            archive
        }

        /// A SIP whose manifest references no schemas
        async fn sip_archive_without_schemas(&self) -> PathBuf {
            let root = self.path("bare-sip").join("bare-sip-1");
            fs::create_dir_all(root.join("metadata/descriptive"))
                .await
                .unwrap();
            fs::write(root.join("metadata/descriptive/DC.xml"), DC)
                .await
                .unwrap();
            fs::write(
                root.join("METS.xml"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/" xmlns:csip="https://DILCIS.eu/XML/METS/CSIPExtensionMETS" xmlns:xlink="http://www.w3.org/1999/xlink" OBJID="bare-sip-1" TYPE="Mixed" PROFILE="{CSIP_PROFILE}">
  <mets:metsHdr csip:OAISPACKAGETYPE="SIP"/>
  <mets:dmdSec ID="dmd-1">
    <mets:mdRef LOCTYPE="URL" xlink:href="metadata/descriptive/DC.xml" MDTYPE="DC"/>
  </mets:dmdSec>
</mets:mets>
"#
                ),
            )
            .await
            .unwrap();

            let archive = self.path("bare-sip.zip");
            csip_archive::pack_to_file(&self.path("bare-sip"), &archive)
                .await
                .unwrap();
            archive
        }

        async fn assert_staging_empty(&self) {
            let mut entries = fs::read_dir(self.staging_dir()).await.unwrap();
            assert!(
                entries.next_entry().await.unwrap().is_none(),
                "staging root left behind"
            );
        }
    }

    fn entry_set(entries: &[String]) -> BTreeSet<&str> {
        entries.iter().map(String::as_str).collect()
    }

    fn expected_aip_entries(submission_id: &str) -> BTreeSet<String> {
        [
            "metadata/descriptive/DC.xml",
            "metadata/preservation/premis.xml",
            "schemas/DILCISExtensionSIPMETS.xsd",
            "schemas/xlink.xsd",
            "schemas/DILCISExtensionMETS.xsd",
            "schemas/mets1_12.xsd",
            "schemas/premis.xsd",
            "METS.xml",
        ]
        .iter()
        .map(ToString::to_string)
        .chain(std::iter::once(format!("submission/{submission_id}.zip")))
        .collect()
    }

    async fn read_manifest(archive: &Path, id: &str) -> String {
        let bytes = fs::read(archive).await.unwrap();
        manifest_from_bytes(bytes, id)
    }

    async fn read_entry(archive: &Path, id: &str, entry: &str) -> Vec<u8> {
        use std::io::Read;
        let bytes = fs::read(archive).await.unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = zip.by_name(&format!("{id}/{entry}")).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        content
    }

    fn manifest_from_bytes(bytes: Vec<u8>, id: &str) -> String {
        use std::io::Read;
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = zip.by_name(&format!("{id}/METS.xml")).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[tokio::test]
    async fn test_sip_to_aip() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let output = fx.path("aip.zip");

        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);
        let aip = converter.convert_to_path(&sip, &output).await.unwrap();

        assert_eq!(aip.package_type(), PackageType::Aip);
        assert_eq!(aip.profile(), CSIP_PROFILE);
        assert_ne!(aip.id(), SIP_ID);
        let entries: BTreeSet<String> = aip.entries.iter().cloned().collect();
        assert_eq!(entries, expected_aip_entries(SIP_ID));
        assert!(aip
            .archive_entries
            .iter()
            .all(|e| e.starts_with(&format!("{}/", aip.id()))));

        let on_disk = csip_archive::list_entries(&output).await.unwrap();
        assert_eq!(entry_set(&on_disk), entry_set(&aip.archive_entries));

        let last_agent = aip.package.agents.last().unwrap();
        assert_eq!(last_agent.name, "YksaSipToAip");
        assert_eq!(last_agent.note.as_deref(), Some("1.0.0"));
        assert_eq!(aip.package.submissions.len(), 1);

        let mets = read_manifest(&output, aip.id()).await;
        assert_eq!(mets.matches("csip:OAISPACKAGETYPE=\"AIP\"").count(), 1);
        assert!(mets.contains("<mets:name>YksaSipToAip</mets:name>"));
        assert!(mets.contains("MDTYPE=\"PREMIS\""));

        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_sip_to_aip_premis_record() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let output = fx.path("aip.zip");

        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);
        let aip = converter.convert_to_path(&sip, &output).await.unwrap();

        let extracted = fx.path("aip-extracted");
        csip_archive::unpack(&output, &extracted).await.unwrap();
        let premis = fs::read_to_string(
            extracted
                .join(aip.id())
                .join("metadata/preservation/premis.xml"),
        )
        .await
        .unwrap();
        assert!(premis.contains("<agentName>Yksa</agentName>"));
        assert!(premis.contains("<agentType>Software</agentType>"));

        // the submission bundle is the SIP's full staged content
        let bundle = extracted
            .join(aip.id())
            .join(format!("submission/{SIP_ID}.zip"));
        let bundled = csip_archive::list_entries(&bundle).await.unwrap();
        assert!(bundled.contains(&"METS.xml".to_string()));
        assert!(bundled.contains(&"metadata/descriptive/DC.xml".to_string()));
    }

    #[tokio::test]
    async fn test_sip_to_aip_to_dip() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let aip_path = fx.path("aip.zip");
        let dip_path = fx.path("dip.zip");

        let ctx = fx.ctx(Config::default()).await;
        let aip = SipToAipConverter::new(ctx.clone())
            .convert_to_path(&sip, &aip_path)
            .await
            .unwrap();
        let dip = AipToDipConverter::new(ctx)
            .convert_to_path(&aip_path, &dip_path)
            .await
            .unwrap();

        assert_eq!(dip.package_type(), PackageType::Dip);
        assert_eq!(dip.profile(), DIP_PROFILE);
        assert_ne!(dip.id(), aip.id());
        let entries: BTreeSet<String> = dip.entries.iter().cloned().collect();
        assert_eq!(entries, expected_aip_entries(aip.id()));
        assert_eq!(dip.package.agents.last().unwrap().name, "YksaAipToDip");

        let mets = read_manifest(&dip_path, dip.id()).await;
        assert_eq!(mets.matches("csip:OAISPACKAGETYPE=\"DIP\"").count(), 1);
        assert!(!mets.contains("csip:OAISPACKAGETYPE=\"AIP\""));
        assert!(mets.contains(&format!("PROFILE=\"{DIP_PROFILE}\"")));

        for entry in [
            "metadata/descriptive/DC.xml",
            "metadata/preservation/premis.xml",
        ] {
            assert_eq!(
                read_entry(&aip_path, aip.id(), entry).await,
                read_entry(&dip_path, dip.id(), entry).await,
                "{entry} changed between AIP and DIP"
            );
        }

        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_sip_preservation_metadata_is_not_ingested() {
        let fx = Fixture::new();
        let sip = fx.sip_archive_with_nested_metadata().await;
        let output = fx.path("aip.zip");

        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);
        let aip = converter.convert_to_path(&sip, &output).await.unwrap();

        let preservation: Vec<&str> = aip
            .entries
            .iter()
            .map(String::as_str)
            .filter(|e| e.starts_with("metadata/preservation/"))
            .collect();
        assert_eq!(preservation, vec!["metadata/preservation/premis.xml"]);
        let premis = read_entry(&output, aip.id(), "metadata/preservation/premis.xml").await;
        let premis = String::from_utf8(premis).unwrap();
        assert!(premis.contains("<agentName>Yksa</agentName>"));
        assert!(!premis.contains("producer"));

        let mets = read_manifest(&output, aip.id()).await;
        assert!(!mets.contains("producer-premis.xml"));
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_nested_metadata_keeps_its_folders() {
        let fx = Fixture::new();
        let sip = fx.sip_archive_with_nested_metadata().await;
        let aip_path = fx.path("aip.zip");
        let dip_path = fx.path("dip.zip");

        let ctx = fx.ctx(Config::default()).await;
        let aip = SipToAipConverter::new(ctx.clone())
            .convert_to_path(&sip, &aip_path)
            .await
            .unwrap();
        let dip = AipToDipConverter::new(ctx)
            .convert_to_path(&aip_path, &dip_path)
            .await
            .unwrap();

        for conversion in [&aip, &dip] {
            let descriptive: BTreeSet<&str> = conversion
                .entries
                .iter()
                .map(String::as_str)
                .filter(|e| e.starts_with("metadata/descriptive/"))
                .collect();
            assert_eq!(
                descriptive,
                BTreeSet::from([
                    "metadata/descriptive/dc/DC.xml",
                    "metadata/descriptive/ead/DC.xml",
                ])
            );
        }

        for (folder, entry) in [
            ("ead", "metadata/descriptive/ead/DC.xml"),
            ("dc", "metadata/descriptive/dc/DC.xml"),
        ] {
            let expected = format!("<record>{folder}</record>").into_bytes();
            assert_eq!(read_entry(&aip_path, aip.id(), entry).await, expected);
            assert_eq!(read_entry(&dip_path, dip.id(), entry).await, expected);
        }
        assert_eq!(
            read_entry(&aip_path, aip.id(), "metadata/preservation/premis.xml").await,
            read_entry(&dip_path, dip.id(), "metadata/preservation/premis.xml").await
        );

        let mets = read_manifest(&dip_path, dip.id()).await;
        assert!(mets.contains("xlink:href=\"metadata/descriptive/ead/DC.xml\""));
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_dip_manifest_strategies_agree() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let aip_path = fx.path("aip.zip");
        SipToAipConverter::new(fx.ctx(Config::default()).await)
            .convert_to_path(&sip, &aip_path)
            .await
            .unwrap();

        let mut results = Vec::new();
        for strategy in [ManifestTypeStrategy::Patch, ManifestTypeStrategy::Direct] {
            let mut config = Config::default();
            config.aip_to_dip.manifest_type = strategy;
            let converter = AipToDipConverter::new(fx.ctx(config).await);
            let mut out = Vec::new();
            let dip = converter
                .convert_to_writer(&aip_path, &mut out)
                .await
                .unwrap();
            let mets = manifest_from_bytes(out, dip.id());
            results.push((dip.entries.iter().cloned().collect::<BTreeSet<_>>(), mets));
        }

        assert_eq!(results[0].0, results[1].0);
        for (_, mets) in &results {
            assert_eq!(mets.matches("csip:OAISPACKAGETYPE=\"DIP\"").count(), 1);
            assert!(!mets.contains("csip:OAISPACKAGETYPE=\"AIP\""));
        }
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_convert_reader() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let bytes = fs::read(&sip).await.unwrap();

        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);
        let mut reader = bytes.as_slice();
        let mut out = Vec::new();
        let aip = converter.convert_reader(&mut reader, &mut out).await.unwrap();

        assert!(!out.is_empty());
        let zip = zip::ZipArchive::new(Cursor::new(out)).unwrap();
        let names: BTreeSet<&str> = zip.file_names().collect();
        assert_eq!(names, entry_set(&aip.archive_entries));
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_missing_schemas_get_defaults() {
        let fx = Fixture::new();
        let sip = fx.sip_archive_without_schemas().await;
        let output = fx.path("aip.zip");

        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);
        let aip = converter.convert_to_path(&sip, &output).await.unwrap();

        let entries: BTreeSet<String> = aip.entries.iter().cloned().collect();
        assert_eq!(entries, expected_aip_entries("bare-sip-1"));
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_schema_override_dir_is_packaged() {
        let fx = Fixture::new();
        let sip = fx.sip_archive_without_schemas().await;
        let official = fx.path("official-schemas");
        fs::create_dir_all(&official).await.unwrap();
        fs::write(official.join("mets1_12.xsd"), "<official-mets/>")
            .await
            .unwrap();
        fs::write(official.join("premis.xsd"), "<official-premis/>")
            .await
            .unwrap();

        let mut config = Config::default();
        config.schemas.override_dir = Some(official);
        let output = fx.path("aip.zip");
        let converter = SipToAipConverter::new(fx.ctx(config).await);
        let aip = converter.convert_to_path(&sip, &output).await.unwrap();

        assert_eq!(
            read_entry(&output, aip.id(), "schemas/mets1_12.xsd").await,
            b"<official-mets/>".to_vec()
        );
        assert_eq!(
            read_entry(&output, aip.id(), "schemas/premis.xsd").await,
            b"<official-premis/>".to_vec()
        );
        // not overridden, the bundled copy is used
        let xlink = read_entry(&output, aip.id(), "schemas/xlink.xsd").await;
        assert!(String::from_utf8(xlink)
            .unwrap()
            .contains("http://www.w3.org/1999/xlink"));
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_convert_package_only() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let extracted = fx.path("extracted");
        let source = EarkCodec::new()
            .parse(&sip, &extracted, PackageType::Sip)
            .await
            .unwrap();

        let work = fx.path("work");
        fs::create_dir_all(&work).await.unwrap();
        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);
        let aip = converter.convert_package(&source, &work).await.unwrap();

        assert_ne!(aip.id, source.id);
        assert_eq!(aip.package_type, PackageType::Aip);
        assert_eq!(aip.profile, source.profile);
        assert_eq!(aip.descriptive_metadata, source.descriptive_metadata);
        assert_eq!(aip.preservation_metadata.len(), 1);
        assert_eq!(aip.preservation_metadata[0].file.name, "premis.xml");
        assert_eq!(aip.schemas().len(), 5);
        assert_eq!(aip.submissions.len(), 1);
        assert_eq!(aip.submissions[0].name, format!("{SIP_ID}.zip"));
        assert_eq!(aip.agents.len(), 1);

        // nothing built yet
        let built = aip.build(&fx.path("out")).await.unwrap();
        assert!(built.join("METS.xml").is_file());
    }

    #[tokio::test]
    async fn test_wrong_input_type_is_rejected() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let output = fx.path("dip.zip");

        let converter = AipToDipConverter::new(fx.ctx(Config::default()).await);
        let err = converter.convert_to_path(&sip, &output).await.unwrap_err();

        assert!(err.is_package_format());
        assert!(matches!(
            err,
            Error::Package(PackageError::UnexpectedType { .. })
        ));
        assert!(!output.exists());
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_garbage_input() {
        let fx = Fixture::new();
        let input = fx.path("garbage.zip");
        fs::write(&input, vec![0x42u8; 4096]).await.unwrap();
        let output = fx.path("aip.zip");

        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);
        let err = converter.convert_to_path(&input, &output).await.unwrap_err();

        assert!(err.is_package_format());
        assert!(!output.exists());
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_missing_input_is_io() {
        let fx = Fixture::new();
        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);
        let mut out = Vec::new();
        let err = converter
            .convert_to_writer(&fx.path("absent.zip"), &mut out)
            .await
            .unwrap_err();

        assert!(err.is_io());
        assert!(out.is_empty());
        fx.assert_staging_empty().await;
    }

    /// Parses normally, fails every build
    struct FailingBuild;

    #[async_trait]
    impl PackageCodec for FailingBuild {
        async fn parse(
            &self,
            archive: &Path,
            extraction_dir: &Path,
            expected: PackageType,
        ) -> Result<InformationPackage, Error> {
            EarkCodec::new()
                .parse(archive, extraction_dir, expected)
                .await
        }

        async fn build_as(
            &self,
            _package: &InformationPackage,
            _target_dir: &Path,
            _declared_type: PackageType,
        ) -> Result<PathBuf, Error> {
            Err(BuildError::Failed {
                message: "injected".to_string(),
            }
            .into())
        }
    }

    /// Always declares SIP, whatever it is asked for
    struct StaleTypeBuild;

    #[async_trait]
    impl PackageCodec for StaleTypeBuild {
        async fn parse(
            &self,
            archive: &Path,
            extraction_dir: &Path,
            expected: PackageType,
        ) -> Result<InformationPackage, Error> {
            EarkCodec::new()
                .parse(archive, extraction_dir, expected)
                .await
        }

        async fn build_as(
            &self,
            package: &InformationPackage,
            target_dir: &Path,
            _declared_type: PackageType,
        ) -> Result<PathBuf, Error> {
            EarkCodec::new()
                .build_as(package, target_dir, PackageType::Sip)
                .await
        }
    }

    #[tokio::test]
    async fn test_build_failure_cleans_up() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let output = fx.path("aip.zip");

        let converter = SipToAipConverter::new(fx.ctx_with_codec(Arc::new(FailingBuild)).await);
        let err = converter.convert_to_path(&sip, &output).await.unwrap_err();

        assert!(matches!(err, Error::Build(BuildError::Failed { .. })));
        assert!(!output.exists());
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_patch_target_missing_aborts() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let aip_path = fx.path("aip.zip");
        SipToAipConverter::new(fx.ctx(Config::default()).await)
            .convert_to_path(&sip, &aip_path)
            .await
            .unwrap();

        let converter = AipToDipConverter::new(fx.ctx_with_codec(Arc::new(StaleTypeBuild)).await);
        let dip_path = fx.path("dip.zip");
        let err = converter
            .convert_to_path(&aip_path, &dip_path)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Build(BuildError::ManifestPatchTargetMissing { .. })
        ));
        assert!(!dip_path.exists());
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_concurrent_conversions() {
        let fx = Fixture::new();
        let sip = fx.sip_archive().await;
        let converter = SipToAipConverter::new(fx.ctx(Config::default()).await);

        let mut handles = Vec::new();
        for i in 0..4 {
            let converter = converter.clone();
            let sip = sip.clone();
            let output = fx.path(&format!("aip-{i}.zip"));
            handles.push(tokio::spawn(async move {
                converter
                    .convert_to_path(&sip, &output)
                    .await
                    .unwrap()
                    .package
                    .id
            }));
        }

        let mut ids = BTreeSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert!(!ids.contains(SIP_ID));
        fx.assert_staging_empty().await;
    }

    #[tokio::test]
    async fn test_from_config_uses_staging_dir() {
        let fx = Fixture::new();
        let mut config = Config::default();
        config.staging.base_dir = Some(fx.staging_dir());

        let converter = SipToAipConverter::from_config(config).await.unwrap();
        assert_eq!(converter.ctx().staging.base_path(), fx.staging_dir());
        assert_eq!(converter.source_type(), PackageType::Sip);
        assert_eq!(converter.target_type(), PackageType::Aip);
    }
}
