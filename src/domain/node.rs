use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Unique identifier for a node in the graph (opaque string from the builder)
pub type NodeId = String;

/// Unrecognized JSON keys carried through decode → encode untouched
pub type Extra = Map<String, Value>;

/// Source location of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub start_col: u32,
    pub end_col: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Aggregate metadata computed upstream by the builder.
///
/// `fan_in` / `fan_out` are trusted as given; see [`crate::domain::index`] for the advisory audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Fractional values are accepted; integral ones are written back as integers
    #[serde(default, serialize_with = "serialize_complexity")]
    pub complexity: Option<f64>,
    #[serde(default)]
    pub fan_in: u32,
    #[serde(default)]
    pub fan_out: u32,
    /// Part of the package's public API surface. Distinct from the kind-level `is_public`.
    #[serde(default)]
    pub is_public_api: bool,
    #[serde(default)]
    pub docstring: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source_snippet: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn serialize_complexity<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT => {
            serializer.serialize_some(&(*v as i64))
        }
        Some(v) => serializer.serialize_some(v),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub param_type: Option<String>,
    #[serde(default)]
    pub is_mutable: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Function node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionData {
    pub name: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_method: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Type kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Struct,
    Class,
    Enum,
    Interface,
    Trait,
    Union,
    TypeAlias,
}

/// Type node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeData {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Method node ids
    #[serde(default)]
    pub methods: Vec<NodeId>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitData {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub methods: Vec<NodeId>,
    #[serde(default)]
    pub implementors: Vec<NodeId>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleData {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantData {
    pub name: String,
    #[serde(default)]
    pub value_type: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    pub path: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub line_count: u64,
    #[serde(default)]
    pub symbols: Vec<NodeId>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Semantic cluster produced by the builder's embedding pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterData {
    pub name: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub members: Vec<NodeId>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub centroid: Option<Vec<f64>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageData {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub modules: Vec<NodeId>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroType {
    Declarative,
    Procedural,
    Derive,
    Attribute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroData {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    pub macro_type: MacroType,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Polymorphic node kind.
///
/// Encoded externally tagged (`{"Function": {...}}`). A tag outside the nine known kinds, or a payload
/// that does not read as its kind, decodes to [`NodeKind::Unknown`] holding the raw JSON so that one bad
/// node never aborts a whole graph and re-encoding reproduces it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Function(FunctionData),
    Type(TypeData),
    Trait(TraitData),
    Module(ModuleData),
    Constant(ConstantData),
    File(FileData),
    Cluster(ClusterData),
    Package(PackageData),
    Macro(MacroData),
    Unknown(Value),
}

impl NodeKind {
    /// Display name: `path` for files, `name` for every other known kind.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Function(f) => &f.name,
            NodeKind::Type(t) => &t.name,
            NodeKind::Trait(t) => &t.name,
            NodeKind::Module(m) => &m.name,
            NodeKind::Constant(c) => &c.name,
            NodeKind::File(f) => &f.path,
            NodeKind::Cluster(c) => &c.name,
            NodeKind::Package(p) => &p.name,
            NodeKind::Macro(m) => &m.name,
            NodeKind::Unknown(_) => "unknown",
        }
    }

    /// Lower-case kind tag used by the visualization layer.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Function(_) => "function",
            NodeKind::Type(_) => "type",
            NodeKind::Trait(_) => "trait",
            NodeKind::Module(_) => "module",
            NodeKind::Constant(_) => "constant",
            NodeKind::File(_) => "file",
            NodeKind::Cluster(_) => "cluster",
            NodeKind::Package(_) => "package",
            NodeKind::Macro(_) => "macro",
            NodeKind::Unknown(_) => "unknown",
        }
    }

    /// Kind-level visibility. Files, clusters and packages have no privacy boundary and count as public,
    /// as do unknown kinds.
    pub fn is_public(&self) -> bool {
        match self {
            NodeKind::Function(f) => f.is_public,
            NodeKind::Type(t) => t.is_public,
            NodeKind::Trait(t) => t.is_public,
            NodeKind::Module(m) => m.is_public,
            NodeKind::Constant(c) => c.is_public,
            NodeKind::Macro(m) => m.is_public,
            NodeKind::File(_) | NodeKind::Cluster(_) | NodeKind::Package(_) | NodeKind::Unknown(_) => {
                true
            }
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, NodeKind::Unknown(_))
    }

    /// Reads an externally tagged kind, degrading to `Unknown` instead of failing.
    pub fn from_value(raw: Value) -> Self {
        let entry = match &raw {
            Value::Object(map) if map.len() == 1 => map
                .iter()
                .next()
                .map(|(tag, payload)| (tag.clone(), payload.clone())),
            _ => None,
        };
        let Some((tag, payload)) = entry else {
            warn!("node kind is not a single-key object, keeping it as unknown");
            return NodeKind::Unknown(raw);
        };

        let parsed = match tag.as_str() {
            "Function" => serde_json::from_value(payload).map(NodeKind::Function),
            "Type" => serde_json::from_value(payload).map(NodeKind::Type),
            "Trait" => serde_json::from_value(payload).map(NodeKind::Trait),
            "Module" => serde_json::from_value(payload).map(NodeKind::Module),
            "Constant" => serde_json::from_value(payload).map(NodeKind::Constant),
            "File" => serde_json::from_value(payload).map(NodeKind::File),
            "Cluster" => serde_json::from_value(payload).map(NodeKind::Cluster),
            "Package" => serde_json::from_value(payload).map(NodeKind::Package),
            "Macro" => serde_json::from_value(payload).map(NodeKind::Macro),
            other => {
                warn!(tag = other, "unrecognized node kind, keeping it as unknown");
                return NodeKind::Unknown(raw);
            }
        };

        match parsed {
            Ok(kind) => kind,
            Err(err) => {
                warn!(tag = %tag, error = %err, "unreadable node kind payload, keeping it as unknown");
                NodeKind::Unknown(raw)
            }
        }
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let NodeKind::Unknown(raw) = self {
            return raw.serialize(serializer);
        }

        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            NodeKind::Function(data) => map.serialize_entry("Function", data)?,
            NodeKind::Type(data) => map.serialize_entry("Type", data)?,
            NodeKind::Trait(data) => map.serialize_entry("Trait", data)?,
            NodeKind::Module(data) => map.serialize_entry("Module", data)?,
            NodeKind::Constant(data) => map.serialize_entry("Constant", data)?,
            NodeKind::File(data) => map.serialize_entry("File", data)?,
            NodeKind::Cluster(data) => map.serialize_entry("Cluster", data)?,
            NodeKind::Package(data) => map.serialize_entry("Package", data)?,
            NodeKind::Macro(data) => map.serialize_entry("Macro", data)?,
            NodeKind::Unknown(_) => {}
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(NodeKind::from_value(raw))
    }
}

fn missing_kind() -> NodeKind {
    NodeKind::Unknown(Value::Null)
}

/// A node of the code graph as produced by the builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default = "missing_kind")]
    pub kind: NodeKind,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub metadata: NodeMetadata,
    #[serde(flatten)]
    pub extra: Extra,
}

impl GraphNode {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, location: Location, metadata: NodeMetadata) -> Self {
        Self {
            id: id.into(),
            kind,
            location,
            metadata,
            extra: Extra::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn kind_label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn is_public(&self) -> bool {
        self.kind.is_public()
    }
}
