//! METS parsing

use super::{SCHEMAS_USE, SUBMISSION_USE};
use csip_errors::{Error, PackageError};
use csip_types::{Agent, AgentNoteType, AgentRole, CreatorType, MetadataKind};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// A metadata reference found in a `dmdSec` or `digiprovMD`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdRef {
    /// Identifier of the enclosing section
    pub section_id: Option<String>,
    pub href: String,
    pub kind: MetadataKind,
}

/// The parts of a METS manifest the package model is built from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetsDocument {
    pub obj_id: String,
    pub profile: String,
    pub content_type: Option<String>,
    /// Raw value of the package type attribute
    pub package_type: String,
    pub agents: Vec<Agent>,
    pub descriptive: Vec<MdRef>,
    pub preservation: Vec<MdRef>,
    pub schemas: Vec<String>,
    pub submissions: Vec<String>,
}

#[derive(Default)]
struct ParseState {
    doc: MetsDocument,
    seen_root: bool,
    package_type: Option<String>,
    section_id: Option<String>,
    file_group: Option<String>,
    agent: Option<Agent>,
}

fn invalid(message: impl Into<String>) -> Error {
    PackageError::InvalidManifest {
        message: message.into(),
    }
    .into()
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

/// Attributes keyed by local name
fn attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>, Error> {
    let mut map = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| invalid(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| invalid(e.to_string()))?
            .into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn required(attrs: &mut HashMap<String, String>, name: &str) -> Result<String, Error> {
    attrs.remove(name).ok_or_else(|| {
        PackageError::MissingAttribute {
            attribute: name.to_string(),
        }
        .into()
    })
}

/// Parse a METS manifest
///
/// # Errors
///
/// Returns [`PackageError::InvalidManifest`] for malformed XML or a
/// non-METS root, and [`PackageError::MissingAttribute`] when `OBJID`,
/// `PROFILE` or the package type attribute is absent.
pub fn read_mets(xml: &str) -> Result<MetsDocument, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::default();
    let mut stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                let name = local_name(&element);
                on_start(&mut state, &stack, &name, &element)?;
                stack.push(name);
            }
            Ok(Event::Empty(element)) => {
                let name = local_name(&element);
                on_start(&mut state, &stack, &name, &element)?;
                on_end(&mut state, &name);
            }
            Ok(Event::End(_)) => {
                if let Some(name) = stack.pop() {
                    on_end(&mut state, &name);
                }
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(|e| invalid(e.to_string()))?;
                on_text(&mut state, &stack, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(invalid(format!(
                    "error at position {}: {e}",
                    reader.error_position()
                )))
            }
            Ok(_) => {}
        }
    }

    if !state.seen_root {
        return Err(invalid("no mets root element"));
    }
    state.doc.package_type = state.package_type.ok_or_else(|| {
        Error::from(PackageError::MissingAttribute {
            attribute: csip_types::layout::PACKAGE_TYPE_ATTRIBUTE.to_string(),
        })
    })?;
    Ok(state.doc)
}

fn on_start(
    state: &mut ParseState,
    stack: &[String],
    name: &str,
    element: &BytesStart<'_>,
) -> Result<(), Error> {
    if stack.is_empty() {
        if name != "mets" {
            return Err(invalid(format!("root element is {name}, expected mets")));
        }
        let mut attrs = attributes(element)?;
        state.doc.obj_id = required(&mut attrs, "OBJID")?;
        state.doc.profile = required(&mut attrs, "PROFILE")?;
        state.doc.content_type = attrs.remove("TYPE");
        state.seen_root = true;
        return Ok(());
    }

    match name {
        "metsHdr" => {
            let mut attrs = attributes(element)?;
            state.package_type = attrs.remove("OAISPACKAGETYPE");
        }
        "agent" => {
            let mut attrs = attributes(element)?;
            state.agent = Some(Agent {
                name: String::new(),
                role: AgentRole::from_mets(attrs.get("ROLE").map_or("", String::as_str)),
                other_role: attrs.remove("OTHERROLE"),
                creator_type: CreatorType::from_mets(
                    attrs.get("TYPE").map_or("", String::as_str),
                ),
                other_type: attrs.remove("OTHERTYPE"),
                note: None,
                note_type: None,
            });
        }
        "note" => {
            if let Some(agent) = state.agent.as_mut() {
                let attrs = attributes(element)?;
                agent.note_type = attrs
                    .get("NOTETYPE")
                    .and_then(|v| AgentNoteType::from_mets(v));
            }
        }
        "dmdSec" | "digiprovMD" => {
            state.section_id = attributes(element)?.remove("ID");
        }
        "mdRef" => {
            let in_dmd = stack.iter().any(|s| s == "dmdSec");
            let in_digiprov = stack.iter().any(|s| s == "digiprovMD");
            if in_dmd || in_digiprov {
                let mut attrs = attributes(element)?;
                let href = required(&mut attrs, "href")?;
                let mdtype = attrs.remove("MDTYPE").unwrap_or_else(|| "OTHER".to_string());
                let md_ref = MdRef {
                    section_id: state.section_id.clone(),
                    href,
                    kind: MetadataKind::from_mets(
                        &mdtype,
                        attrs.get("OTHERMDTYPE").map(String::as_str),
                    ),
                };
                if in_dmd {
                    state.doc.descriptive.push(md_ref);
                } else {
                    state.doc.preservation.push(md_ref);
                }
            }
        }
        "fileGrp" => {
            state.file_group = attributes(element)?.remove("USE");
        }
        "FLocat" => {
            let mut attrs = attributes(element)?;
            let href = required(&mut attrs, "href")?;
            match state.file_group.as_deref() {
                Some(SCHEMAS_USE) => state.doc.schemas.push(href),
                Some(SUBMISSION_USE) => state.doc.submissions.push(href),
                _ => {}
            }
        }
        _ => {}
    }
    Ok(())
}

fn on_end(state: &mut ParseState, name: &str) {
    match name {
        "agent" => {
            if let Some(agent) = state.agent.take() {
                state.doc.agents.push(agent);
            }
        }
        "dmdSec" | "digiprovMD" => state.section_id = None,
        "fileGrp" => state.file_group = None,
        _ => {}
    }
}

fn on_text(state: &mut ParseState, stack: &[String], text: &str) {
    let Some(agent) = state.agent.as_mut() else {
        return;
    };
    match stack.last().map(String::as_str) {
        Some("name") => agent.name.push_str(text),
        Some("note") => agent.note = Some(text.to_string()),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/" xmlns:csip="https://DILCIS.eu/XML/METS/CSIPExtensionMETS" xmlns:xlink="http://www.w3.org/1999/xlink" OBJID="uuid-B3E2" TYPE="Mixed" PROFILE="https://earkcsip.dilcis.eu/profile/E-ARK-CSIP.xml">
  <mets:metsHdr CREATEDATE="2024-01-01T00:00:00Z" csip:OAISPACKAGETYPE="SIP">
    <mets:agent ROLE="CREATOR" TYPE="OTHER" OTHERTYPE="SOFTWARE">
      <mets:name>RODA Commons IP</mets:name>
      <mets:note csip:NOTETYPE="SOFTWARE VERSION">2.0.0</mets:note>
    </mets:agent>
  </mets:metsHdr>
  <mets:dmdSec ID="dmd-1">
    <mets:mdRef LOCTYPE="URL" xlink:type="simple" xlink:href="metadata/descriptive/DC.xml" MDTYPE="DC"/>
  </mets:dmdSec>
  <mets:amdSec>
    <mets:digiprovMD ID="prov-1">
      <mets:mdRef LOCTYPE="URL" xlink:href="metadata/preservation/events.xml" MDTYPE="OTHER" OTHERMDTYPE="EVENTS"/>
    </mets:digiprovMD>
  </mets:amdSec>
  <mets:fileSec>
    <mets:fileGrp USE="Schemas">
      <mets:file ID="f1"><mets:FLocat xlink:href="schemas/mets1_12.xsd"/></mets:file>
    </mets:fileGrp>
    <mets:fileGrp USE="Representations/rep1">
      <mets:file ID="f2"><mets:FLocat xlink:href="representations/rep1/METS.xml"/></mets:file>
    </mets:fileGrp>
  </mets:fileSec>
</mets:mets>"#;

    #[test]
    fn test_read_sample() {
        let doc = read_mets(SAMPLE).unwrap();
        assert_eq!(doc.obj_id, "uuid-B3E2");
        assert_eq!(doc.package_type, "SIP");
        assert_eq!(doc.content_type.as_deref(), Some("Mixed"));
        assert_eq!(doc.agents.len(), 1);
        assert_eq!(doc.agents[0].name, "RODA Commons IP");
        assert_eq!(doc.agents[0].note.as_deref(), Some("2.0.0"));
        assert_eq!(doc.agents[0].note_type, Some(AgentNoteType::SoftwareVersion));
        assert!(doc.agents[0].is_software());

        assert_eq!(doc.descriptive.len(), 1);
        assert_eq!(doc.descriptive[0].kind, MetadataKind::Dc);
        assert_eq!(doc.descriptive[0].section_id.as_deref(), Some("dmd-1"));
        assert_eq!(doc.preservation[0].kind, MetadataKind::Other("EVENTS".into()));
        assert_eq!(doc.schemas, vec!["schemas/mets1_12.xsd"]);
        assert!(doc.submissions.is_empty());
    }

    #[test]
    fn test_missing_package_type() {
        let xml = SAMPLE.replace(r#" csip:OAISPACKAGETYPE="SIP""#, "");
        let err = read_mets(&xml).unwrap_err();
        assert!(matches!(
            err,
            Error::Package(PackageError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_missing_objid() {
        let xml = SAMPLE.replace(r#" OBJID="uuid-B3E2""#, "");
        let err = read_mets(&xml).unwrap_err();
        assert!(err.is_package_format());
    }

    #[test]
    fn test_malformed() {
        let err = read_mets(
            "<mets:mets OBJID=\"x\" PROFILE=\"p\"><unclosed></mets:mets>",
        ).unwrap_err();
        assert!(matches!(err, Error::Package(PackageError::InvalidManifest { .. })));
    }

    #[test]
    fn test_wrong_root() {
        let err = read_mets("<html/>").unwrap_err();
        assert!(matches!(err, Error::Package(PackageError::InvalidManifest { .. })));
    }
}
