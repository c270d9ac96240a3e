use std::io::{Cursor, Read, Write};

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::error::{CONTAINER, DecodeError, EncodeError};
use crate::domain::archive::{Archive, ArchiveContent, CurrentContent};
use crate::domain::graph::Graph;
use crate::domain::legacy::{DocsLayout, LegacyContent, LegacyDoc};

// Current shape
pub const GRAPH_MEMBER: &str = "graph.json";
pub const DOCUMENTATION_MEMBER: &str = "documentation.json";
pub const METADATA_MEMBER: &str = "metadata.json";

// Legacy shape
pub const MANIFEST_MEMBER: &str = "manifest.json";
pub const SYMBOLS_MEMBER: &str = "symbols.json";
pub const DOCS_DIR: &str = "docs/";
pub const DOCS_BUNDLE_MEMBER: &str = "docs.json";

type Members = IndexMap<String, Vec<u8>>;

/// Expected top-level JSON shape of a member
#[derive(Debug, Clone, Copy)]
enum Toplevel {
    Object,
    Array,
}

impl Toplevel {
    fn matches(self, value: &Value) -> bool {
        match self {
            Toplevel::Object => value.is_object(),
            Toplevel::Array => value.is_array(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Toplevel::Object => "object",
            Toplevel::Array => "array",
        }
    }
}

/// Decodes archive bytes into the canonical model.
///
/// A `graph.json` member selects the current shape; otherwise a `manifest.json` member selects the
/// legacy shape. Members outside the detected shape are kept verbatim in `extra_members`.
pub fn decode(bytes: &[u8]) -> Result<Archive, DecodeError> {
    let mut members = read_container(bytes)?;
    debug!(members = members.len(), "read archive container");

    let content = if members.contains_key(GRAPH_MEMBER) {
        ArchiveContent::Current(decode_current(&mut members)?)
    } else if members.contains_key(MANIFEST_MEMBER) {
        ArchiveContent::Legacy(decode_legacy(&mut members)?)
    } else {
        return Err(DecodeError::UnknownShape {
            members: members.into_keys().collect(),
        });
    };

    let archive = Archive {
        content,
        extra_members: members,
        tracked_branch: None,
    };
    debug!(
        shape = %archive.shape(),
        extra_members = archive.extra_members.len(),
        "decoded archive"
    );
    Ok(archive)
}

fn read_container(bytes: &[u8]) -> Result<Members, DecodeError> {
    let mut zip =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| DecodeError::malformed(CONTAINER, e))?;

    let mut members = Members::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut file = zip
            .by_index(i)
            .map_err(|e| DecodeError::malformed(CONTAINER, e))?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| DecodeError::malformed(name.as_str(), e))?;
        members.insert(name, buf);
    }
    Ok(members)
}

fn decode_current(members: &mut Members) -> Result<CurrentContent, DecodeError> {
    let mut graph: Graph = take_member(members, GRAPH_MEMBER, Toplevel::Object)?;
    // Node records may omit their id; the map key is authoritative then.
    for (id, node) in graph.nodes.iter_mut() {
        if node.id.is_empty() {
            node.id = id.clone();
        }
    }
    let documentation = take_member(members, DOCUMENTATION_MEMBER, Toplevel::Object)?;
    let metadata = take_member(members, METADATA_MEMBER, Toplevel::Object)?;

    Ok(CurrentContent {
        graph,
        documentation,
        metadata,
    })
}

fn decode_legacy(members: &mut Members) -> Result<LegacyContent, DecodeError> {
    let manifest = take_member(members, MANIFEST_MEMBER, Toplevel::Object)?;
    let symbols = take_member(members, SYMBOLS_MEMBER, Toplevel::Array)?;

    let doc_members: Vec<String> = members
        .keys()
        .filter(|name| doc_id(name).is_some())
        .cloned()
        .collect();

    let (docs, docs_layout) = if !doc_members.is_empty() {
        let mut docs = IndexMap::with_capacity(doc_members.len());
        for name in doc_members {
            let doc: LegacyDoc = take_member(members, &name, Toplevel::Object)?;
            let id = doc_id(&name).unwrap_or(name.as_str()).to_string();
            docs.insert(id, doc);
        }
        (docs, DocsLayout::PerMember)
    } else if members.contains_key(DOCS_BUNDLE_MEMBER) {
        let records: Vec<LegacyDoc> = take_member(members, DOCS_BUNDLE_MEMBER, Toplevel::Array)?;
        (key_bundled(records), DocsLayout::Bundled)
    } else {
        debug!("legacy archive carries no docs");
        (IndexMap::new(), DocsLayout::PerMember)
    };

    Ok(LegacyContent {
        manifest,
        symbols,
        docs,
        docs_layout,
    })
}

/// `docs/<id>.json` → `<id>`
fn doc_id(member: &str) -> Option<&str> {
    member
        .strip_prefix(DOCS_DIR)
        .and_then(|rest| rest.strip_suffix(".json"))
        .filter(|id| !id.is_empty())
}

/// Bundled records are keyed by their symbol, or by position when that is empty or already taken.
fn key_bundled(records: Vec<LegacyDoc>) -> IndexMap<String, LegacyDoc> {
    let mut docs = IndexMap::with_capacity(records.len());
    for (position, doc) in records.into_iter().enumerate() {
        let key = if doc.symbol.is_empty() || docs.contains_key(&doc.symbol) {
            position.to_string()
        } else {
            doc.symbol.clone()
        };
        docs.insert(key, doc);
    }
    docs
}

fn take_member<T: DeserializeOwned>(
    members: &mut Members,
    name: &str,
    expected: Toplevel,
) -> Result<T, DecodeError> {
    let bytes = members
        .shift_remove(name)
        .ok_or_else(|| DecodeError::malformed(name, "required member is missing"))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| DecodeError::malformed(name, format!("invalid JSON: {e}")))?;
    if !expected.matches(&value) {
        return Err(DecodeError::malformed(
            name,
            format!("expected a JSON {}", expected.as_str()),
        ));
    }
    serde_json::from_value(value).map_err(|e| DecodeError::malformed(name, e))
}

/// Encodes an archive: shape members first, then preserved extra members in their original order.
pub fn encode(archive: &Archive) -> Result<Vec<u8>, EncodeError> {
    let mut writer = MemberWriter::new();

    match &archive.content {
        ArchiveContent::Current(current) => {
            writer.json(GRAPH_MEMBER, &current.graph)?;
            writer.json(DOCUMENTATION_MEMBER, &current.documentation)?;
            writer.json(METADATA_MEMBER, &current.metadata)?;
        }
        ArchiveContent::Legacy(legacy) => {
            writer.json(MANIFEST_MEMBER, &legacy.manifest)?;
            writer.json(SYMBOLS_MEMBER, &legacy.symbols)?;
            match legacy.docs_layout {
                DocsLayout::PerMember => {
                    for (id, doc) in &legacy.docs {
                        writer.json(&format!("{DOCS_DIR}{id}.json"), doc)?;
                    }
                }
                DocsLayout::Bundled => {
                    let records: Vec<&LegacyDoc> = legacy.docs.values().collect();
                    writer.json(DOCS_BUNDLE_MEMBER, &records)?;
                }
            }
        }
    }

    for (name, bytes) in &archive.extra_members {
        writer.raw(name, bytes)?;
    }

    writer.finish()
}

struct MemberWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    written: usize,
}

impl MemberWriter {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            written: 0,
        }
    }

    fn json<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), EncodeError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| EncodeError::Serialize {
            member: name.to_string(),
            source,
        })?;
        self.raw(name, &bytes)
    }

    fn raw(&mut self, name: &str, bytes: &[u8]) -> Result<(), EncodeError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(name, options)?;
        self.zip.write_all(bytes)?;
        self.written += 1;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, EncodeError> {
        let written = self.written;
        let cursor = self.zip.finish()?;
        let bytes = cursor.into_inner();
        debug!(members = written, bytes = bytes.len(), "encoded archive");
        Ok(bytes)
    }
}
