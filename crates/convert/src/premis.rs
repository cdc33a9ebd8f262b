//! Minimal PREMIS 3 provenance record

use csip_errors::{BuildError, Error};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;
use tokio::fs;

const PREMIS_NS: &str = "http://www.loc.gov/premis/v3";

fn synthesis_error(e: impl std::fmt::Display) -> Error {
    BuildError::MetadataSynthesis {
        message: e.to_string(),
    }
    .into()
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), Error> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(synthesis_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(synthesis_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(synthesis_error)?;
    Ok(())
}

/// A PREMIS document describing a single agent
///
/// # Errors
///
/// Returns [`BuildError::MetadataSynthesis`] if serialization fails.
pub fn premis_document(agent_name: &str, agent_type: &str) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(synthesis_error)?;

    let mut root = BytesStart::new("premis");
    root.push_attribute(("xmlns", PREMIS_NS));
    root.push_attribute(("version", "3.0"));
    writer
        .write_event(Event::Start(root))
        .map_err(synthesis_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("agent")))
        .map_err(synthesis_error)?;

    writer
        .write_event(Event::Start(BytesStart::new("agentIdentifier")))
        .map_err(synthesis_error)?;
    text_element(&mut writer, "agentIdentifierType", "local")?;
    text_element(&mut writer, "agentIdentifierValue", agent_name)?;
    writer
        .write_event(Event::End(BytesEnd::new("agentIdentifier")))
        .map_err(synthesis_error)?;

    text_element(&mut writer, "agentName", agent_name)?;
    text_element(&mut writer, "agentType", agent_type)?;

    writer
        .write_event(Event::End(BytesEnd::new("agent")))
        .map_err(synthesis_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("premis")))
        .map_err(synthesis_error)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write [`premis_document`] to `path`
///
/// # Errors
///
/// Returns an error if the document cannot be produced or written.
pub async fn write_premis(path: &Path, agent_name: &str, agent_type: &str) -> Result<(), Error> {
    let document = premis_document(agent_name, agent_type)?;
    fs::write(path, document)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}
