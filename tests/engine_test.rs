mod common;

use std::sync::{Arc, OnceLock};

use common::fixtures::*;
use common::mock::MockArchiveSource;
use docpack::app::engine::DocpackEngine;
use docpack::domain::classifier::VisualizationRole;
use docpack::domain::edge::EdgeKind;
use docpack::domain::ports::ArchiveSource;

fn current_engine() -> (Arc<MockArchiveSource>, DocpackEngine) {
    let source =
        Arc::new(MockArchiveSource::new().with_archive("demo.docpack", current_archive_bytes()));
    let engine = DocpackEngine::load(source.clone(), "demo.docpack").unwrap();
    (source, engine)
}

fn legacy_engine() -> DocpackEngine {
    let source =
        Arc::new(MockArchiveSource::new().with_archive("blog.docpack", legacy_archive_bytes()));
    DocpackEngine::load(source, "blog.docpack").unwrap()
}

#[test]
fn test_load_reports_health() {
    let (source, engine) = current_engine();
    assert_eq!(source.fetch_count(), 1);

    let health = engine.health().unwrap();
    assert_eq!(health.archive, "demo.docpack");
    assert_eq!(health.shape, "current");
    assert_eq!(health.project_name.as_deref(), Some("demo"));
    assert_eq!(health.node_count, 4);
    assert_eq!(health.edge_count, 3);
    assert_eq!(health.tracked_branch, None);
}

#[test]
fn test_missing_archive_fails_to_load() {
    let source = Arc::new(MockArchiveSource::new());
    let err = DocpackEngine::load(source, "absent.docpack").err().unwrap();
    assert!(format!("{err:#}").contains("absent.docpack"));
}

#[test]
fn test_undecodable_archive_fails_to_load() {
    let source =
        Arc::new(MockArchiveSource::new().with_archive("odd.zip", shapeless_archive_bytes()));
    assert!(DocpackEngine::load(source, "odd.zip").is_err());
}

#[test]
fn test_stats_count_roles_and_docs() {
    let (_, engine) = current_engine();
    let stats = engine.stats().unwrap();
    assert_eq!(stats.shape, "current");
    assert_eq!(stats.documented_symbols, 1);
    assert_eq!(stats.stats.function_count, 2);

    let count = |role: VisualizationRole| {
        stats
            .roles
            .iter()
            .find(|r| r.role == role)
            .map(|r| r.count)
            .unwrap()
    };
    assert_eq!(stats.roles.len(), VisualizationRole::ALL.len());
    assert_eq!(count(VisualizationRole::DataModel), 1);
    assert_eq!(count(VisualizationRole::Internal), 1);
    assert_eq!(count(VisualizationRole::Standard), 1);
    assert_eq!(count(VisualizationRole::Cluster), 1);
    assert_eq!(count(VisualizationRole::CoreUtility), 0);
}

#[test]
fn test_top_filters_by_kind_and_role() {
    let (_, engine) = current_engine();

    let all = engine.top(2, None, None).unwrap();
    let ids: Vec<&str> = all.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["type:Config", "fn:load"]);

    let functions = engine.top(10, Some("Function"), None).unwrap();
    let ids: Vec<&str> = functions.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["fn:load", "fn:main"]);

    let internal = engine
        .top(10, Some("all"), Some(VisualizationRole::Internal))
        .unwrap();
    assert_eq!(internal.items.len(), 1);
    assert_eq!(internal.items[0].id, "fn:load");
}

#[test]
fn test_search_matches_ids_and_names() {
    let (_, engine) = current_engine();

    let result = engine.search("CONFIG", None).unwrap();
    let ids: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["type:Config", "cluster:0"]);
    assert_eq!(result.total_matches, 2);

    let limited = engine.search("^fn:", Some(1)).unwrap();
    assert_eq!(limited.items.len(), 1);
    assert_eq!(limited.total_matches, 2);
    assert_eq!(limited.items[0].id, "fn:load");

    assert!(engine.search("(", None).is_err());
}

#[test]
fn test_symbol_detail_includes_docs_and_neighbors() {
    let (_, engine) = current_engine();

    let detail = engine.symbol("fn:load").unwrap().unwrap();
    assert_eq!(detail.node.name, "load");
    let docs = detail.documentation.unwrap();
    assert_eq!(docs.summary, "Loads the configuration file.");
    assert_eq!(docs.usage_hints.as_deref(), Some("Call once at startup."));
    assert_eq!(detail.incoming.len(), 1);
    assert_eq!(detail.incoming[0].id, "fn:main");
    assert_eq!(detail.outgoing[0].id, "type:Config");
    assert_eq!(detail.outgoing[0].kind, EdgeKind::TypeReference);

    let main = engine.symbol("fn:main").unwrap().unwrap();
    assert!(main.documentation.is_none());
    assert!(!main.outgoing[1].present);

    assert!(engine.symbol("fn:nope").unwrap().is_none());
}

#[test]
fn test_connectivity_reports_dangling_edge() {
    let (_, engine) = current_engine();
    let report = engine.connectivity().unwrap();
    assert!(report.mismatches.is_empty());
    assert_eq!(report.dangling_edges.len(), 1);
    assert_eq!(report.dangling_edges[0].target, "ext:std::env::args");
    assert!(report.dangling_edges[0].missing_target);
    assert!(!report.is_consistent());
}

#[test]
fn test_legacy_archive_is_served_through_conversion() {
    let engine = legacy_engine();

    let health = engine.health().unwrap();
    assert_eq!(health.shape, "legacy");
    assert_eq!(health.project_name.as_deref(), Some("blog"));
    assert_eq!(health.node_count, 2);
    assert_eq!(health.edge_count, 0);

    let viz = engine.visualization().unwrap();
    assert_eq!(viz.stats.languages, vec!["rust", "markdown"]);

    let detail = engine.symbol("blog::render").unwrap().unwrap();
    let docs = detail.documentation.unwrap();
    assert_eq!(docs.parameters[0].name, "post");
    assert_eq!(docs.returns.as_deref(), Some("HTML string"));

    assert!(engine.connectivity().unwrap().is_consistent());
}

#[test]
fn test_reload_refetches_and_keeps_branch() {
    let (source, engine) = current_engine();
    engine.set_tracked_branch(Some("main".into())).unwrap();

    let health = engine.reload().unwrap();
    assert_eq!(source.fetch_count(), 2);
    assert_eq!(health.tracked_branch.as_deref(), Some("main"));
    assert_eq!(health.node_count, 4);
}

/// Source that retargets the engine's branch while the archive is being fetched.
struct BranchSwitchingSource {
    bytes: Vec<u8>,
    engine: OnceLock<Arc<DocpackEngine>>,
}

impl ArchiveSource for BranchSwitchingSource {
    fn fetch(&self, _key: &str) -> anyhow::Result<Vec<u8>> {
        if let Some(engine) = self.engine.get() {
            engine.set_tracked_branch(Some("release".into()))?;
        }
        Ok(self.bytes.clone())
    }
}

#[test]
fn test_reload_keeps_branch_set_during_fetch() {
    let source = Arc::new(BranchSwitchingSource {
        bytes: current_archive_bytes(),
        engine: OnceLock::new(),
    });
    let engine = Arc::new(DocpackEngine::load(source.clone(), "demo.docpack").unwrap());
    engine.set_tracked_branch(Some("main".into())).unwrap();
    assert!(source.engine.set(engine.clone()).is_ok());

    let health = engine.reload().unwrap();
    assert_eq!(health.tracked_branch.as_deref(), Some("release"));
    assert_eq!(
        engine.health().unwrap().tracked_branch.as_deref(),
        Some("release")
    );
}

#[test]
fn test_engine_from_archive_cannot_reload() {
    let archive = docpack::adapters::archive::decode(&current_archive_bytes()).unwrap();
    let engine = DocpackEngine::from_archive("memory", archive);
    assert_eq!(engine.health().unwrap().archive, "memory");
    assert!(engine.reload().is_err());
}
