//! Integration tests for config

#[cfg(test)]
mod tests {
    use csip_config::*;
    use csip_types::{AgentNoteType, AgentRole};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sip_to_aip.creator_agent.name, "YksaSipToAip");
        assert_eq!(config.sip_to_aip.creator_agent.role, AgentRole::Creator);
        assert_eq!(
            config.sip_to_aip.creator_agent.note_type,
            Some(AgentNoteType::SoftwareVersion)
        );
        assert_eq!(config.aip_to_dip.creator_agent.name, "YksaAipToDip");
        assert_eq!(config.aip_to_dip.profile, csip_types::DIP_PROFILE);
        assert_eq!(config.aip_to_dip.manifest_type, ManifestTypeStrategy::Patch);
        assert_eq!(config.schemas.defaults.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[staging]
base_dir = "/var/tmp/csip"

[aip_to_dip]
profile = "https://example.org/profile.xml"
manifest_type = "direct"

[sip_to_aip.creator_agent]
name = "Ingest"
role = "CREATOR"
type = "OTHER"
other_type = "SOFTWARE"
note = "2.1.0"
note_type = "SOFTWARE VERSION"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(
            config.staging_path(),
            std::path::PathBuf::from("/var/tmp/csip")
        );
        assert_eq!(config.aip_to_dip.profile, "https://example.org/profile.xml");
        assert_eq!(config.aip_to_dip.manifest_type, ManifestTypeStrategy::Direct);
        assert_eq!(config.sip_to_aip.creator_agent.name, "Ingest");
        assert_eq!(config.sip_to_aip.creator_agent.note.as_deref(), Some("2.1.0"));
        // untouched sections keep their defaults
        assert_eq!(config.sip_to_aip.premis_agent_name, "Yksa");
        assert_eq!(config.schemas.defaults.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = Config::load_from_file(std::path::Path::new("/nonexistent/csip.toml")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_schema_list_rejected() {
        let result = Config::from_toml("[schemas]\ndefaults = []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_premis_agent_rejected() {
        let mut config = Config::default();
        config.sip_to_aip.premis_agent_name = String::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            csip_errors::Error::Config(csip_errors::ConfigError::InvalidValue { ref field, .. })
                if field == "sip_to_aip.premis_agent_name"
        ));

        let result = Config::from_toml("[sip_to_aip]\npremis_agent_type = \"  \"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("CSIP_STAGING_DIR", "/scratch");
        std::env::set_var("CSIP_DIP_MANIFEST_TYPE", "direct");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.staging_path(), std::path::PathBuf::from("/scratch"));
        assert_eq!(config.aip_to_dip.manifest_type, ManifestTypeStrategy::Direct);

        // Clean up
        std::env::remove_var("CSIP_STAGING_DIR");
        std::env::remove_var("CSIP_DIP_MANIFEST_TYPE");
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("CSIP_DIP_MANIFEST_TYPE", "invalid");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        // Clean up
        std::env::remove_var("CSIP_DIP_MANIFEST_TYPE");
    }
}
