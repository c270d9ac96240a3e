use std::collections::HashSet;

use tracing::debug;

use crate::domain::graph::{Graph, GraphMetadata};
use crate::domain::legacy::{LegacyContent, LegacySymbol};
use crate::domain::node::{
    ConstantData, FileData, FunctionData, GraphNode, Location, MacroData, MacroType, ModuleData,
    NodeKind, NodeMetadata, PackageData, TraitData, TypeData, TypeKind,
};

const LEGACY_TAG: &str = "legacy";
const LANGUAGE_FILES_SUFFIX: &str = "_files";

/// Builds a minimal code graph from legacy records so the visualization pipeline can render them.
///
/// One node per symbol, no edges: the legacy format never recorded relationships, so every fan-in and
/// fan-out is zero.
pub fn legacy_to_graph(legacy: &LegacyContent) -> Graph {
    let mut graph = Graph::new();

    for symbol in &legacy.symbols {
        let docstring = legacy
            .doc_for(symbol)
            .map(|doc| doc.summary.clone())
            .filter(|summary| !summary.is_empty());
        graph.add_node(to_node(symbol, docstring));
    }

    let files: HashSet<&str> = legacy
        .symbols
        .iter()
        .map(|s| s.file.as_str())
        .filter(|f| !f.is_empty())
        .collect();

    let manifest = &legacy.manifest;
    graph.metadata = GraphMetadata {
        repository_name: Some(manifest.project.name.clone()).filter(|name| !name.is_empty()),
        total_files: files.len() as u64,
        total_symbols: legacy.symbols.len() as u64,
        languages: languages(legacy),
        created_at: manifest.generated_at.clone().unwrap_or_default(),
        extra: Default::default(),
    };

    debug!(
        symbols = legacy.symbols.len(),
        nodes = graph.node_count(),
        "converted legacy symbols"
    );
    graph
}

fn to_node(symbol: &LegacySymbol, docstring: Option<String>) -> GraphNode {
    let kind_tag = symbol.kind.to_lowercase();
    let mut tags = vec![LEGACY_TAG.to_string()];
    if !kind_tag.is_empty() {
        tags.push(kind_tag.clone());
    }

    GraphNode::new(
        symbol.id.clone(),
        map_kind(&kind_tag, symbol),
        Location {
            file: symbol.file.clone(),
            start_line: symbol.line,
            end_line: symbol.line,
            ..Default::default()
        },
        NodeMetadata {
            docstring,
            tags,
            ..Default::default()
        },
    )
}

fn map_kind(kind: &str, symbol: &LegacySymbol) -> NodeKind {
    let name = display_name(symbol);
    let type_node = |kind: TypeKind| {
        NodeKind::Type(TypeData {
            name: name.clone(),
            kind,
            is_public: true,
            fields: Vec::new(),
            methods: Vec::new(),
            extra: Default::default(),
        })
    };

    match kind {
        "function" | "fn" | "method" => NodeKind::Function(FunctionData {
            name: name.clone(),
            signature: symbol.signature.clone().unwrap_or_default(),
            is_public: true,
            is_method: kind == "method",
            ..Default::default()
        }),
        "struct" => type_node(TypeKind::Struct),
        "class" => type_node(TypeKind::Class),
        "enum" => type_node(TypeKind::Enum),
        "interface" => type_node(TypeKind::Interface),
        "union" => type_node(TypeKind::Union),
        "type" | "type_alias" | "typealias" => type_node(TypeKind::TypeAlias),
        "trait" => NodeKind::Trait(TraitData {
            name: name.clone(),
            is_public: true,
            ..Default::default()
        }),
        "module" | "mod" | "namespace" => NodeKind::Module(ModuleData {
            name: name.clone(),
            path: symbol.file.clone(),
            is_public: true,
            ..Default::default()
        }),
        "const" | "constant" | "static" => NodeKind::Constant(ConstantData {
            name: name.clone(),
            is_public: true,
            ..Default::default()
        }),
        "macro" => NodeKind::Macro(MacroData {
            name: name.clone(),
            is_public: true,
            macro_type: MacroType::Declarative,
            pattern: None,
            extra: Default::default(),
        }),
        "file" => NodeKind::File(FileData {
            path: if symbol.file.is_empty() {
                symbol.id.clone()
            } else {
                symbol.file.clone()
            },
            ..Default::default()
        }),
        "package" | "crate" => NodeKind::Package(PackageData {
            name: name.clone(),
            ..Default::default()
        }),
        _ => NodeKind::Unknown(serde_json::to_value(symbol).unwrap_or_default()),
    }
}

/// Last path segment of the symbol id (`crate::io::read` → `read`, `posts/hello` → `hello`).
fn display_name(symbol: &LegacySymbol) -> String {
    symbol
        .id
        .rsplit(|c: char| c == ':' || c == '/' || c == '.' || c == '#')
        .find(|segment| !segment.is_empty())
        .unwrap_or(symbol.id.as_str())
        .to_string()
}

fn languages(legacy: &LegacyContent) -> Vec<String> {
    let mut seen = HashSet::new();
    legacy
        .manifest
        .language_summary
        .keys()
        .map(|key| {
            key.strip_suffix(LANGUAGE_FILES_SUFFIX)
                .unwrap_or(key)
                .to_string()
        })
        .filter(|lang| seen.insert(lang.clone()))
        .collect()
}
