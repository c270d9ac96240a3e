use crate::adapters::archive::decode;
use crate::adapters::fs::FileArchiveSource;
use crate::adapters::legacy::legacy_to_graph;
use crate::app::dto::*;
use crate::domain::archive::{Archive, ArchiveContent};
use crate::domain::builder::VisualizationBuilder;
use crate::domain::classifier::VisualizationRole;
use crate::domain::graph::Graph;
use crate::domain::index::{ConnectivityReport, GraphIndex, audit_connectivity};
use crate::domain::ports::ArchiveSource;
use crate::domain::visualization::{VisualizationGraph, VisualizationNode};
use anyhow::{Context as _, Result, anyhow};
use regex::RegexBuilder;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

/// Query engine over one loaded docpack.
///
/// Cheap to clone; clones share the loaded state, and `reload` swaps it for every clone at once.
#[derive(Clone)]
pub struct DocpackEngine {
    inner: Arc<RwLock<EngineData>>,
}

struct EngineData {
    key: String,
    source: Option<Arc<dyn ArchiveSource>>,
    loaded: LoadedArchive,
}

/// A decoded archive plus everything derived from it
struct LoadedArchive {
    archive: Archive,
    /// Set for legacy archives, which carry no graph of their own
    converted: Option<Graph>,
    viz: VisualizationGraph,
    index: GraphIndex,
}

impl LoadedArchive {
    fn new(archive: Archive) -> Self {
        let converted = match &archive.content {
            ArchiveContent::Current(_) => None,
            ArchiveContent::Legacy(legacy) => Some(legacy_to_graph(legacy)),
        };
        let empty = Graph::default();
        let graph = converted
            .as_ref()
            .or_else(|| archive.graph())
            .unwrap_or(&empty);
        let viz = VisualizationBuilder::new().build(graph);
        let index = GraphIndex::build(graph);
        Self {
            archive,
            converted,
            viz,
            index,
        }
    }

    fn graph(&self) -> Option<&Graph> {
        self.converted.as_ref().or_else(|| self.archive.graph())
    }
}

impl DocpackEngine {
    /// Wrap an already-decoded archive. Such an engine cannot `reload`.
    pub fn from_archive(key: impl Into<String>, archive: Archive) -> Self {
        Self::with_state(key.into(), None, LoadedArchive::new(archive))
    }

    pub fn load(source: Arc<dyn ArchiveSource>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let loaded = fetch_and_prepare(source.as_ref(), &key)?;
        Ok(Self::with_state(key, Some(source), loaded))
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        Self::load(
            Arc::new(FileArchiveSource::default()),
            path.to_string_lossy().to_string(),
        )
    }

    fn with_state(key: String, source: Option<Arc<dyn ArchiveSource>>, loaded: LoadedArchive) -> Self {
        info!(
            archive = %key,
            shape = %loaded.archive.shape(),
            nodes = loaded.viz.stats.node_count,
            edges = loaded.viz.stats.edge_count,
            "docpack loaded"
        );
        Self {
            inner: Arc::new(RwLock::new(EngineData {
                key,
                source,
                loaded,
            })),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, EngineData>> {
        self.inner
            .read()
            .map_err(|_| anyhow!("engine state lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, EngineData>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("engine state lock poisoned"))
    }

    /// Fetch and decode the archive again, replacing the loaded state.
    pub fn reload(&self) -> Result<HealthResponse> {
        let (key, source) = {
            let data = self.read()?;
            (data.key.clone(), data.source.clone())
        };
        let source = source.ok_or_else(|| anyhow!("Archive {key} has no source to reload from"))?;

        // Decode outside the lock; readers keep the old state meanwhile.
        let mut loaded = fetch_and_prepare(source.as_ref(), &key)?;

        // Branch is read under the write lock so a concurrent set_tracked_branch is not lost.
        let mut data = self.write()?;
        loaded.archive.tracked_branch = data.loaded.archive.tracked_branch.take();
        data.loaded = loaded;
        info!(archive = %key, "docpack reloaded");
        Ok(health_of(&data))
    }

    /// Attach the branch recorded by the owning build record. Survives `reload`.
    pub fn set_tracked_branch(&self, branch: Option<String>) -> Result<()> {
        let mut data = self.write()?;
        data.loaded.archive.tracked_branch = branch;
        Ok(())
    }

    pub fn health(&self) -> Result<HealthResponse> {
        let data = self.read()?;
        Ok(health_of(&data))
    }

    pub fn visualization(&self) -> Result<VisualizationGraph> {
        let data = self.read()?;
        Ok(data.loaded.viz.clone())
    }

    pub fn stats(&self) -> Result<StatsResponse> {
        let data = self.read()?;
        let loaded = &data.loaded;

        let roles = VisualizationRole::ALL
            .into_iter()
            .map(|role| RoleCount {
                role,
                count: loaded.viz.nodes.iter().filter(|n| n.role == role).count(),
            })
            .collect();

        let documented_symbols = match &loaded.archive.content {
            ArchiveContent::Current(current) => current.documentation.symbol_summaries.len(),
            ArchiveContent::Legacy(legacy) => legacy.docs.len(),
        };

        Ok(StatsResponse {
            shape: loaded.archive.shape().to_string(),
            project_name: loaded.archive.project_name().map(str::to_string),
            stats: loaded.viz.stats.clone(),
            roles,
            documented_symbols,
        })
    }

    /// Nodes by importance, descending, optionally narrowed to one kind label and/or role.
    pub fn top(
        &self,
        limit: usize,
        kind: Option<&str>,
        role: Option<VisualizationRole>,
    ) -> Result<TopResponse> {
        let data = self.read()?;

        let mut items: Vec<&VisualizationNode> = data
            .loaded
            .viz
            .nodes
            .iter()
            .filter(|n| kind.is_none_or(|k| k == "all" || n.kind.eq_ignore_ascii_case(k)))
            .filter(|n| role.is_none_or(|r| n.role == r))
            .collect();

        items.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        items.truncate(limit);
        Ok(TopResponse {
            items: items.into_iter().map(TopItem::from).collect(),
        })
    }

    /// Case-insensitive regex match against node ids and names, most important first.
    pub fn search(&self, pattern: &str, limit: Option<usize>) -> Result<SearchResponse> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Invalid search pattern: {pattern}"))?;

        let data = self.read()?;
        let mut matches: Vec<&VisualizationNode> = data
            .loaded
            .viz
            .nodes
            .iter()
            .filter(|n| re.is_match(&n.id) || re.is_match(&n.name))
            .collect();

        matches.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        let total_matches = matches.len();
        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        Ok(SearchResponse {
            items: matches.into_iter().map(SearchItem::from).collect(),
            total_matches,
        })
    }

    /// Detail view of one node, `None` when the id is not in the graph.
    pub fn symbol(&self, id: &str) -> Result<Option<SymbolDetailResponse>> {
        let data = self.read()?;
        let loaded = &data.loaded;
        let Some(node) = loaded.viz.node(id) else {
            return Ok(None);
        };

        let documentation = match &loaded.archive.content {
            ArchiveContent::Current(current) => current
                .documentation
                .symbol_summaries
                .get(id)
                .map(DocumentationDto::from),
            ArchiveContent::Legacy(legacy) => legacy
                .symbols
                .iter()
                .find(|s| s.id == id)
                .and_then(|s| legacy.doc_for(s))
                .map(DocumentationDto::from),
        };

        Ok(Some(SymbolDetailResponse {
            node: node.clone(),
            documentation,
            incoming: loaded.index.incoming(id),
            outgoing: loaded.index.outgoing(id),
        }))
    }

    pub fn connectivity(&self) -> Result<ConnectivityReport> {
        let data = self.read()?;
        let loaded = &data.loaded;
        let Some(graph) = loaded.graph() else {
            return Ok(ConnectivityReport::default());
        };

        let report = audit_connectivity(graph, &loaded.index);
        if !report.is_consistent() {
            warn!(
                mismatches = report.mismatches.len(),
                dangling_edges = report.dangling_edges.len(),
                "graph metadata disagrees with its edge list"
            );
        }
        Ok(report)
    }
}

fn fetch_and_prepare(source: &dyn ArchiveSource, key: &str) -> Result<LoadedArchive> {
    let bytes = source.fetch(key)?;
    let archive = decode(&bytes).with_context(|| format!("Failed to decode docpack: {key}"))?;
    Ok(LoadedArchive::new(archive))
}

fn health_of(data: &EngineData) -> HealthResponse {
    let loaded = &data.loaded;
    HealthResponse {
        archive: data.key.clone(),
        shape: loaded.archive.shape().to_string(),
        project_name: loaded.archive.project_name().map(str::to_string),
        tracked_branch: loaded.archive.tracked_branch.clone(),
        node_count: loaded.viz.stats.node_count,
        edge_count: loaded.viz.stats.edge_count,
    }
}
