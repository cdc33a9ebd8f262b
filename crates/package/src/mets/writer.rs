//! METS serialization

use super::{
    CHECKSUM_TYPE, CSIP_NS, METS_NS, SCHEMAS_USE, SIP_NS, SUBMISSION_USE, XLINK_NS, XSI_NS,
};
use crate::fixity::FileDigest;
use crate::model::InformationPackage;
use csip_errors::{BuildError, Error};
use csip_types::layout::PACKAGE_TYPE_ATTRIBUTE;
use csip_types::{Agent, MetadataRecord, PackageType};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// A file as referenced from the manifest
#[derive(Debug, Clone)]
pub(crate) struct FileRef {
    pub id: String,
    /// Package-relative path
    pub href: String,
    pub digest: FileDigest,
    pub mime: &'static str,
}

pub(crate) struct MdSection<'a> {
    pub record: &'a MetadataRecord,
    pub file: FileRef,
}

/// Everything the manifest declares, with fixity already computed
pub(crate) struct ManifestInput<'a> {
    pub package: &'a InformationPackage,
    pub declared_type: PackageType,
    pub created: String,
    pub descriptive: Vec<MdSection<'a>>,
    pub preservation: Vec<MdSection<'a>>,
    pub schemas: Vec<FileRef>,
    pub submissions: Vec<FileRef>,
}

struct MetsWriter {
    inner: Writer<Vec<u8>>,
}

impl MetsWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.inner
            .write_event(event)
            .map_err(|e| BuildError::ManifestWrite {
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn start(&mut self, element: BytesStart<'_>) -> Result<(), Error> {
        self.write(Event::Start(element))
    }

    fn empty(&mut self, element: BytesStart<'_>) -> Result<(), Error> {
        self.write(Event::Empty(element))
    }

    fn end(&mut self, name: &str) -> Result<(), Error> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, element: BytesStart<'_>, text: &str) -> Result<(), Error> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.start(element)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(&name)
    }

    fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

fn new_id() -> String {
    format!("uuid-{}", uuid::Uuid::new_v4())
}

/// Render the manifest for `input`
///
/// The package type attribute is written exactly once, on `metsHdr`.
pub(crate) fn write_mets(input: &ManifestInput<'_>) -> Result<Vec<u8>, Error> {
    let package = input.package;
    let mut w = MetsWriter::new();

    w.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let schema_location = format!(
        "{METS_NS} schemas/mets1_12.xsd {XLINK_NS} schemas/xlink.xsd \
         {CSIP_NS} schemas/DILCISExtensionMETS.xsd {SIP_NS} schemas/DILCISExtensionSIPMETS.xsd"
    );
    let mut root = BytesStart::new("mets:mets");
    root.push_attribute(("xmlns:mets", METS_NS));
    root.push_attribute(("xmlns:csip", CSIP_NS));
    root.push_attribute(("xmlns:sip", SIP_NS));
    root.push_attribute(("xmlns:xlink", XLINK_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xsi:schemaLocation", schema_location.as_str()));
    root.push_attribute(("OBJID", package.id.as_str()));
    root.push_attribute(("TYPE", package.content_type.as_str()));
    root.push_attribute(("PROFILE", package.profile.as_str()));
    w.start(root)?;

    write_header(&mut w, input)?;

    for section in &input.descriptive {
        let mut dmd = BytesStart::new("mets:dmdSec");
        dmd.push_attribute(("ID", section.record.id.as_str()));
        dmd.push_attribute(("CREATED", input.created.as_str()));
        w.start(dmd)?;
        write_md_ref(&mut w, section, &input.created)?;
        w.end("mets:dmdSec")?;
    }

    let amd_id = new_id();
    if !input.preservation.is_empty() {
        let mut amd = BytesStart::new("mets:amdSec");
        amd.push_attribute(("ID", amd_id.as_str()));
        w.start(amd)?;
        for section in &input.preservation {
            let mut digiprov = BytesStart::new("mets:digiprovMD");
            digiprov.push_attribute(("ID", section.record.id.as_str()));
            digiprov.push_attribute(("CREATED", input.created.as_str()));
            w.start(digiprov)?;
            write_md_ref(&mut w, section, &input.created)?;
            w.end("mets:digiprovMD")?;
        }
        w.end("mets:amdSec")?;
    }

    let schemas_group = new_id();
    let submission_group = new_id();
    let mut file_sec = BytesStart::new("mets:fileSec");
    file_sec.push_attribute(("ID", new_id().as_str()));
    w.start(file_sec)?;
    write_file_group(&mut w, &schemas_group, SCHEMAS_USE, &input.schemas, &input.created)?;
    if !input.submissions.is_empty() {
        write_file_group(
            &mut w,
            &submission_group,
            SUBMISSION_USE,
            &input.submissions,
            &input.created,
        )?;
    }
    w.end("mets:fileSec")?;

    let mut struct_map = BytesStart::new("mets:structMap");
    struct_map.push_attribute(("ID", new_id().as_str()));
    struct_map.push_attribute(("TYPE", "PHYSICAL"));
    struct_map.push_attribute(("LABEL", "CSIP"));
    w.start(struct_map)?;

    let mut package_div = BytesStart::new("mets:div");
    package_div.push_attribute(("ID", new_id().as_str()));
    package_div.push_attribute(("LABEL", package.id.as_str()));
    w.start(package_div)?;

    if !input.descriptive.is_empty() || !input.preservation.is_empty() {
        let dmd_ids = join_ids(&input.descriptive);
        let mut metadata_div = BytesStart::new("mets:div");
        metadata_div.push_attribute(("ID", new_id().as_str()));
        metadata_div.push_attribute(("LABEL", "Metadata"));
        if !dmd_ids.is_empty() {
            metadata_div.push_attribute(("DMDID", dmd_ids.as_str()));
        }
        if !input.preservation.is_empty() {
            metadata_div.push_attribute(("ADMID", amd_id.as_str()));
        }
        w.empty(metadata_div)?;
    }

    write_pointer_div(&mut w, SCHEMAS_USE, &schemas_group)?;
    if !input.submissions.is_empty() {
        write_pointer_div(&mut w, SUBMISSION_USE, &submission_group)?;
    }

    w.end("mets:div")?;
    w.end("mets:structMap")?;
    w.end("mets:mets")?;

    let mut bytes = w.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_header(w: &mut MetsWriter, input: &ManifestInput<'_>) -> Result<(), Error> {
    let mut header = BytesStart::new("mets:metsHdr");
    header.push_attribute(("CREATEDATE", input.created.as_str()));
    header.push_attribute(("RECORDSTATUS", "NEW"));
    header.push_attribute((PACKAGE_TYPE_ATTRIBUTE, input.declared_type.as_str()));
    w.start(header)?;
    for agent in &input.package.agents {
        write_agent(w, agent)?;
    }
    w.end("mets:metsHdr")
}

fn write_agent(w: &mut MetsWriter, agent: &Agent) -> Result<(), Error> {
    let mut element = BytesStart::new("mets:agent");
    element.push_attribute(("ROLE", agent.role.as_str()));
    if let Some(other_role) = &agent.other_role {
        element.push_attribute(("OTHERROLE", other_role.as_str()));
    }
    element.push_attribute(("TYPE", agent.creator_type.as_str()));
    if let Some(other_type) = &agent.other_type {
        element.push_attribute(("OTHERTYPE", other_type.as_str()));
    }
    w.start(element)?;
    w.text_element(BytesStart::new("mets:name"), &agent.name)?;
    if let Some(note) = &agent.note {
        let mut note_element = BytesStart::new("mets:note");
        if let Some(note_type) = agent.note_type {
            note_element.push_attribute(("csip:NOTETYPE", note_type.as_str()));
        }
        w.text_element(note_element, note)?;
    }
    w.end("mets:agent")
}

fn write_md_ref(w: &mut MetsWriter, section: &MdSection<'_>, created: &str) -> Result<(), Error> {
    let file = &section.file;
    let size = file.digest.size.to_string();
    let mut md_ref = BytesStart::new("mets:mdRef");
    md_ref.push_attribute(("LOCTYPE", "URL"));
    md_ref.push_attribute(("xlink:type", "simple"));
    md_ref.push_attribute(("xlink:href", file.href.as_str()));
    md_ref.push_attribute(("MDTYPE", section.record.kind.mdtype()));
    if let Some(other) = section.record.kind.other_mdtype() {
        md_ref.push_attribute(("OTHERMDTYPE", other));
    }
    md_ref.push_attribute(("MIMETYPE", file.mime));
    md_ref.push_attribute(("SIZE", size.as_str()));
    md_ref.push_attribute(("CREATED", created));
    md_ref.push_attribute(("CHECKSUM", file.digest.sha256.as_str()));
    md_ref.push_attribute(("CHECKSUMTYPE", CHECKSUM_TYPE));
    w.empty(md_ref)
}

fn write_file_group(
    w: &mut MetsWriter,
    group_id: &str,
    usage: &str,
    files: &[FileRef],
    created: &str,
) -> Result<(), Error> {
    let mut group = BytesStart::new("mets:fileGrp");
    group.push_attribute(("ID", group_id));
    group.push_attribute(("USE", usage));
    w.start(group)?;
    for file in files {
        let size = file.digest.size.to_string();
        let mut element = BytesStart::new("mets:file");
        element.push_attribute(("ID", file.id.as_str()));
        element.push_attribute(("MIMETYPE", file.mime));
        element.push_attribute(("SIZE", size.as_str()));
        element.push_attribute(("CREATED", created));
        element.push_attribute(("CHECKSUM", file.digest.sha256.as_str()));
        element.push_attribute(("CHECKSUMTYPE", CHECKSUM_TYPE));
        w.start(element)?;

        let mut location = BytesStart::new("mets:FLocat");
        location.push_attribute(("LOCTYPE", "URL"));
        location.push_attribute(("xlink:type", "simple"));
        location.push_attribute(("xlink:href", file.href.as_str()));
        w.empty(location)?;

        w.end("mets:file")?;
    }
    w.end("mets:fileGrp")
}

fn write_pointer_div(w: &mut MetsWriter, label: &str, group_id: &str) -> Result<(), Error> {
    let mut div = BytesStart::new("mets:div");
    div.push_attribute(("ID", new_id().as_str()));
    div.push_attribute(("LABEL", label));
    w.start(div)?;
    let mut pointer = BytesStart::new("mets:fptr");
    pointer.push_attribute(("FILEID", group_id));
    w.empty(pointer)?;
    w.end("mets:div")
}

fn join_ids(sections: &[MdSection<'_>]) -> String {
    sections
        .iter()
        .map(|s| s.record.id.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
