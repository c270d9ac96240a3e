//! Test fixture generators for integration tests.
#![allow(dead_code)]

use std::io::{Cursor, Write};

use docpack::domain::edge::{EdgeKind, GraphEdge};
use docpack::domain::graph::Graph;
use docpack::domain::node::{
    ClusterData, FunctionData, GraphNode, Location, ModuleData, NodeKind, NodeMetadata, TypeData,
    TypeKind,
};
use serde_json::{Value, json};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// ZIP container with the given members, stored uncompressed in the given order.
pub fn zip_members(members: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in members {
        zip.start_file(*name, SimpleFileOptions::default())
            .expect("start member");
        zip.write_all(body).expect("write member");
    }
    zip.finish().expect("finish zip").into_inner()
}

pub fn json_bytes(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).expect("serialize fixture")
}

pub fn graph_json() -> Value {
    json!({
        "nodes": {
            "fn:main": {
                "id": "fn:main",
                "kind": {"Function": {"name": "main", "signature": "fn main()", "is_public": true,
                                      "is_async": false, "is_method": false, "parameters": [],
                                      "return_type": null}},
                "location": {"file": "src/main.rs", "start_line": 1, "end_line": 9, "start_col": 0, "end_col": 1},
                "metadata": {"complexity": 4, "fan_in": 0, "fan_out": 2, "is_public_api": false,
                             "docstring": null, "tags": ["entry"], "source_snippet": null}
            },
            "fn:load": {
                "id": "fn:load",
                "kind": {"Function": {"name": "load", "signature": "fn load(p: &Path)", "is_public": false,
                                      "is_async": false, "is_method": false,
                                      "parameters": [{"name": "p", "param_type": "&Path", "is_mutable": false}],
                                      "return_type": "Config"}},
                "location": {"file": "src/config.rs", "start_line": 10, "end_line": 30, "start_col": 0, "end_col": 1},
                "metadata": {"complexity": 12, "fan_in": 1, "fan_out": 1, "is_public_api": false, "tags": []}
            },
            "type:Config": {
                "id": "type:Config",
                "kind": {"Type": {"name": "Config", "kind": "Struct", "is_public": true,
                                  "fields": [{"name": "path", "field_type": "PathBuf", "is_public": true}],
                                  "methods": ["fn:load"]}},
                "location": {"file": "src/config.rs", "start_line": 1, "end_line": 5, "start_col": 0, "end_col": 1},
                "metadata": {"complexity": null, "fan_in": 1, "fan_out": 0, "is_public_api": true, "tags": []}
            },
            "cluster:0": {
                "id": "cluster:0",
                "kind": {"Cluster": {"name": "configuration", "topic": "config loading",
                                     "members": ["fn:load", "type:Config"], "keywords": ["config"],
                                     "centroid": [0.25, -0.5]}},
                "location": {"file": "", "start_line": 0, "end_line": 0, "start_col": 0, "end_col": 0},
                "metadata": {"fan_in": 0, "fan_out": 0, "is_public_api": false, "tags": []}
            }
        },
        "edges": [
            {"source": "fn:main", "target": "fn:load", "kind": "Calls"},
            {"source": "fn:load", "target": "type:Config", "kind": "TypeReference"},
            {"source": "fn:main", "target": "ext:std::env::args", "kind": "Calls"}
        ],
        "metadata": {"repository_name": "demo", "total_files": 2, "total_symbols": 3,
                     "languages": ["rust"], "created_at": "2024-05-01T12:00:00Z"}
    })
}

pub fn documentation_json() -> Value {
    json!({
        "symbol_summaries": {
            "fn:load": {
                "node_id": "fn:load",
                "purpose": "Loads the configuration file.",
                "explanation": "Reads and parses TOML.",
                "complexity_notes": null,
                "usage_hints": "Call once at startup.",
                "caller_references": ["fn:main"],
                "callee_references": ["type:Config"],
                "semantic_cluster": "configuration"
            }
        },
        "module_overviews": {
            "config": {"module_name": "config", "responsibilities": "Configuration",
                       "key_symbols": ["type:Config"], "interactions": "Used by main"}
        },
        "architecture_overview": {"overview": "A small CLI.", "system_behavior": "", "data_flow": "",
                                  "key_components": ["config"]},
        "total_tokens_used": 1234
    })
}

pub fn metadata_json() -> Value {
    json!({
        "version": "2.0",
        "generator": "docpack-builder",
        "source": "github.com/acme/demo",
        "generated_at": "2024-05-01T12:00:00Z",
        "files_included": 3,
        "total_size_bytes": 4096,
        "format": "zip",
        "contents": {
            "graph.json": "Code graph",
            "documentation.json": "Generated documentation",
            "metadata.json": "Package metadata"
        }
    })
}

/// Current-shape archive: graph, documentation, metadata.
pub fn current_archive_bytes() -> Vec<u8> {
    zip_members(&[
        ("graph.json", json_bytes(&graph_json())),
        ("documentation.json", json_bytes(&documentation_json())),
        ("metadata.json", json_bytes(&metadata_json())),
    ])
}

pub fn manifest_json() -> Value {
    json!({
        "docpack_format": 1,
        "project": {"name": "blog", "version": "0.3.0", "repo": "acme/blog", "commit": "abc123"},
        "generated_at": "2023-11-02T08:00:00Z",
        "language_summary": {"rust_files": 3, "markdown_files": 10},
        "stats": {"symbols_extracted": 2, "docs_generated": 1},
        "public": true
    })
}

pub fn symbols_json() -> Value {
    json!([
        {"id": "blog::render", "kind": "function", "file": "src/render.rs", "line": 12,
         "signature": "pub fn render(post: &Post) -> String", "doc_id": "doc_1"},
        {"id": "blog::Post", "kind": "struct", "file": "src/post.rs", "line": 3,
         "signature": "pub struct Post", "doc_id": null}
    ])
}

pub fn legacy_doc_json() -> Value {
    json!({
        "symbol": "blog::render",
        "summary": "Renders a post to HTML.",
        "description": "Applies the template to the post body.",
        "parameters": [{"name": "post", "type": "&Post", "description": "The post"}],
        "returns": "HTML string",
        "example": "render(&post)",
        "notes": ["Escapes user content."]
    })
}

/// Legacy archive with one `docs/<id>.json` member per document.
pub fn legacy_archive_bytes() -> Vec<u8> {
    zip_members(&[
        ("manifest.json", json_bytes(&manifest_json())),
        ("symbols.json", json_bytes(&symbols_json())),
        ("docs/doc_1.json", json_bytes(&legacy_doc_json())),
    ])
}

/// Legacy archive with a single bundled `docs.json` array.
pub fn legacy_bundled_archive_bytes() -> Vec<u8> {
    zip_members(&[
        ("manifest.json", json_bytes(&manifest_json())),
        ("symbols.json", json_bytes(&symbols_json())),
        ("docs.json", json_bytes(&json!([legacy_doc_json()]))),
    ])
}

/// Archive carrying neither member set.
pub fn shapeless_archive_bytes() -> Vec<u8> {
    zip_members(&[
        ("README.md", b"# nothing here".to_vec()),
        ("notes.json", b"{}".to_vec()),
    ])
}

pub fn function_node(id: &str, metadata: NodeMetadata, is_public: bool) -> GraphNode {
    GraphNode::new(
        id,
        NodeKind::Function(FunctionData {
            name: id.to_string(),
            is_public,
            ..Default::default()
        }),
        Location {
            file: "src/lib.rs".into(),
            start_line: 1,
            end_line: 2,
            ..Default::default()
        },
        metadata,
    )
}

pub fn type_node(id: &str, metadata: NodeMetadata) -> GraphNode {
    GraphNode::new(
        id,
        NodeKind::Type(TypeData {
            name: id.to_string(),
            kind: TypeKind::Struct,
            is_public: true,
            fields: vec![],
            methods: vec![],
            extra: Default::default(),
        }),
        Location::default(),
        metadata,
    )
}

pub fn module_node(id: &str) -> GraphNode {
    GraphNode::new(
        id,
        NodeKind::Module(ModuleData {
            name: id.to_string(),
            is_public: true,
            ..Default::default()
        }),
        Location::default(),
        NodeMetadata::default(),
    )
}

pub fn cluster_node(id: &str, name: &str) -> GraphNode {
    GraphNode::new(
        id,
        NodeKind::Cluster(ClusterData {
            name: name.to_string(),
            ..Default::default()
        }),
        Location::default(),
        NodeMetadata::default(),
    )
}

pub fn fan_metadata(fan_in: u32, fan_out: u32) -> NodeMetadata {
    NodeMetadata {
        fan_in,
        fan_out,
        ..Default::default()
    }
}

/// `count` public functions `f0..f{count-1}` whose importance strictly increases with the index.
pub fn increasing_importance_graph(count: u32) -> Graph {
    let mut graph = Graph::new();
    for i in 0..count {
        graph.add_node(function_node(&format!("f{i}"), fan_metadata(i, 0), true));
    }
    graph
}

pub fn calls(source: &str, target: &str) -> GraphEdge {
    GraphEdge::new(source, target, EdgeKind::Calls)
}
