use crate::adapters::archive::{decode, encode};
use crate::adapters::legacy::legacy_to_graph;
use crate::app::engine::DocpackEngine;
use crate::config::DEFAULT_CONFIG_FILE;
use crate::domain::archive::ArchiveContent;
use crate::domain::builder::VisualizationBuilder;
use crate::domain::classifier::VisualizationRole;
use crate::domain::edits::{EditReport, SymbolEdit, apply_edits};
use crate::domain::visualization::VisualizationGraph;
use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;

/// Inspect docpack archives: decode them, rank their symbols and serve the visualization graph.
#[derive(Parser, Debug)]
#[command(name = "docpack", version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    /// Configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show shape, project and counts of an archive.
    Info {
        archive: PathBuf,
        /// Branch the archive was built from (kept by the owning record, not the archive).
        #[arg(long)]
        branch: Option<String>,
    },

    /// Write the visualization graph as JSON.
    Visualize {
        archive: PathBuf,
        /// Output file (stdout when omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Single-line JSON instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },

    /// Print aggregate statistics and role counts.
    Stats { archive: PathBuf },

    /// List symbols by importance.
    Top {
        archive: PathBuf,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Kind label filter (function, type, module, ...).
        #[arg(long)]
        kind: Option<String>,
        /// Role filter (CoreUtility, EntryPoint, DataModel, Internal, Cluster, Standard).
        #[arg(long)]
        role: Option<VisualizationRole>,
    },

    /// Search symbols by case-insensitive regex over ids and names.
    Search {
        archive: PathBuf,
        pattern: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show one symbol with its documentation and neighbours.
    Symbol { archive: PathBuf, id: String },

    /// Audit declared fan-in/fan-out against the edge list. Fails when they disagree.
    Check { archive: PathBuf },

    /// Merge documentation edits (JSON array) into an archive and write a new archive.
    ApplyEdits {
        archive: PathBuf,
        edits: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decode and summarize many archives in parallel.
    Summarize {
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },

    /// Serve the archive over HTTP.
    Serve {
        archive: PathBuf,
        /// Listen address (overrides the config file).
        #[arg(long)]
        addr: Option<SocketAddr>,
    },

    /// Serve the archive as an MCP tool server over stdio.
    Mcp { archive: PathBuf },
}

pub fn print_info(engine: &DocpackEngine) -> Result<()> {
    let health = engine.health()?;
    println!("Archive: {}", health.archive);
    println!("  Shape: {}", health.shape);
    println!(
        "  Project: {}",
        health.project_name.as_deref().unwrap_or("(unnamed)")
    );
    if let Some(branch) = &health.tracked_branch {
        println!("  Tracked branch: {branch}");
    }
    println!("  Nodes: {}", health.node_count);
    println!("  Edges: {}", health.edge_count);
    Ok(())
}

pub fn write_visualization(
    engine: &DocpackEngine,
    output: Option<&Path>,
    compact: bool,
) -> Result<()> {
    let viz = engine.visualization()?;
    let json = if compact {
        serde_json::to_string(&viz)?
    } else {
        serde_json::to_string_pretty(&viz)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), nodes = viz.nodes.len(), "visualization written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn display_stats(engine: &DocpackEngine) -> Result<()> {
    let res = engine.stats()?;
    let stats = &res.stats;

    println!("{}", "=".repeat(60));
    println!(
        "{} ({})",
        res.project_name.as_deref().unwrap_or("(unnamed)"),
        res.shape
    );
    println!("{}", "=".repeat(60));
    println!("  Nodes:      {:>6}", stats.node_count);
    println!("  Edges:      {:>6}", stats.edge_count);
    println!("  Functions:  {:>6}", stats.function_count);
    println!("  Types:      {:>6}", stats.type_count);
    println!("  Modules:    {:>6}", stats.module_count);
    println!("  Clusters:   {:>6}", stats.cluster_count);
    println!("  Documented: {:>6}", res.documented_symbols);
    if !stats.languages.is_empty() {
        println!("  Languages:  {}", stats.languages.join(", "));
    }

    println!("\n  Roles:");
    for entry in &res.roles {
        println!("    {:<12} {:>6}", entry.role.as_str(), entry.count);
    }

    if !stats.top_symbols.is_empty() {
        println!("\n  Top symbols:");
        for (i, top) in stats.top_symbols.iter().enumerate() {
            println!(
                "    {:>2}. {:<40} {:>8.1}  {}",
                i + 1,
                top.name,
                top.importance,
                top.role.as_str()
            );
        }
    }
    Ok(())
}

pub fn display_top(
    engine: &DocpackEngine,
    limit: usize,
    kind: Option<&str>,
    role: Option<VisualizationRole>,
) -> Result<()> {
    let result = engine.top(limit, kind, role)?;

    println!("Top {} symbols by importance:", limit);
    println!("{}", "=".repeat(80));
    for (i, item) in result.items.iter().enumerate() {
        println!(
            "{}. [{}] {} ({:.1}, {})",
            i + 1,
            item.kind,
            item.name,
            item.importance,
            item.role.as_str()
        );
        println!("   {}", item.id);
        println!();
    }
    Ok(())
}

pub fn search_symbols(engine: &DocpackEngine, pattern: &str, limit: Option<usize>) -> Result<()> {
    println!("Searching for symbols matching: \"{}\"", pattern);
    println!("{}", "=".repeat(80));
    let result = engine.search(pattern, limit)?;

    println!("Found {} matching symbol(s):\n", result.total_matches);
    if let Some(lim) = limit.filter(|&lim| result.total_matches > lim) {
        println!("Showing top {} by importance:\n", lim);
    }

    for (i, item) in result.items.iter().enumerate() {
        println!("{}. [{}] {} ({:.1})", i + 1, item.kind, item.name, item.importance);
        if item.file.is_empty() {
            println!("   {}", item.id);
        } else {
            println!("   {} at {}:{}", item.id, item.file, item.line);
        }
        println!();
    }
    Ok(())
}

pub fn display_symbol(engine: &DocpackEngine, id: &str) -> Result<()> {
    let Some(detail) = engine.symbol(id)? else {
        bail!("Symbol not found: {id}");
    };
    let node = &detail.node;

    println!("{} [{}]", node.name, node.kind);
    println!("  Id: {}", node.id);
    if !node.file.is_empty() {
        println!("  Location: {}:{}", node.file, node.line);
    }
    println!("  Role: {}", node.role.as_str());
    println!("  Importance: {:.1}", node.importance);
    println!("  Fan-in/out: {}/{}", node.fan_in, node.fan_out);
    println!("  Public: {}", node.is_public);

    if let Some(doc) = &detail.documentation {
        println!("\n  {}", doc.summary);
        if !doc.explanation.is_empty() {
            println!("\n  {}", doc.explanation);
        }
        for param in &doc.parameters {
            println!("    - {} ({}): {}", param.name, param.param_type, param.description);
        }
        if let Some(returns) = &doc.returns {
            println!("  Returns: {returns}");
        }
        for note in &doc.notes {
            println!("  Note: {note}");
        }
    }

    if !detail.incoming.is_empty() {
        println!("\n  Incoming:");
        for n in &detail.incoming {
            println!("    {:?} <- {}", n.kind, n.id);
        }
    }
    if !detail.outgoing.is_empty() {
        println!("\n  Outgoing:");
        for n in &detail.outgoing {
            let marker = if n.present { "" } else { " (not in graph)" };
            println!("    {:?} -> {}{}", n.kind, n.id, marker);
        }
    }
    Ok(())
}

pub fn check_connectivity(engine: &DocpackEngine) -> Result<()> {
    let report = engine.connectivity()?;

    for m in &report.mismatches {
        println!(
            "degree mismatch: {} declares in/out {}/{}, edges give {}/{}",
            m.id, m.declared_fan_in, m.declared_fan_out, m.observed_fan_in, m.observed_fan_out
        );
    }
    for d in &report.dangling_edges {
        let missing = match (d.missing_source, d.missing_target) {
            (true, true) => "both endpoints",
            (true, false) => "source",
            _ => "target",
        };
        println!(
            "dangling edge #{}: {} -[{:?}]-> {} (missing {missing})",
            d.position, d.source, d.kind, d.target
        );
    }

    if !report.is_consistent() {
        bail!(
            "{} degree mismatch(es), {} dangling edge(s)",
            report.mismatches.len(),
            report.dangling_edges.len()
        );
    }
    println!("Graph metadata is consistent with the edge list.");
    Ok(())
}

/// Decode `archive`, merge the edit rows from `edits`, and write the re-encoded archive to `output`.
pub fn apply_edits_to_file(archive: &Path, edits: &Path, output: &Path) -> Result<EditReport> {
    let bytes = std::fs::read(archive)
        .with_context(|| format!("Failed to read archive: {}", archive.display()))?;
    let mut decoded =
        decode(&bytes).with_context(|| format!("Failed to decode docpack: {}", archive.display()))?;

    let edits_json = std::fs::read_to_string(edits)
        .with_context(|| format!("Failed to read edits: {}", edits.display()))?;
    let edits: Vec<SymbolEdit> =
        serde_json::from_str(&edits_json).context("Failed to parse edits JSON")?;

    let report = apply_edits(&mut decoded, &edits);
    let encoded = encode(&decoded).context("Failed to encode docpack")?;
    std::fs::write(output, encoded)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Applied {} of {} edit(s) -> {}",
        report.applied,
        edits.len(),
        output.display()
    );
    for id in &report.unmatched {
        println!("  unmatched: {id}");
    }
    Ok(report)
}

/// Decode and build every archive in parallel; one line per archive, in argument order.
pub fn summarize(archives: &[PathBuf]) -> Result<()> {
    let results: Vec<(&PathBuf, Result<String>)> = archives
        .par_iter()
        .map(|path| (path, summarize_one(path)))
        .collect();

    let mut failures = 0;
    for (path, result) in &results {
        match result {
            Ok(line) => println!("{}: {line}", path.display()),
            Err(e) => {
                failures += 1;
                println!("{}: error: {e:#}", path.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} archive(s) failed", archives.len());
    }
    Ok(())
}

fn summarize_one(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read archive: {}", path.display()))?;
    let archive = decode(&bytes)?;

    let builder = VisualizationBuilder::new();
    let viz: VisualizationGraph = match &archive.content {
        ArchiveContent::Current(current) => builder.build(&current.graph),
        ArchiveContent::Legacy(legacy) => builder.build(&legacy_to_graph(legacy)),
    };

    let top = viz
        .stats
        .top_symbols
        .first()
        .map(|t| format!(", top: {} ({:.1})", t.name, t.importance))
        .unwrap_or_default();
    Ok(format!(
        "{} {}, {} nodes, {} edges{}",
        archive.shape(),
        archive.project_name().unwrap_or("(unnamed)"),
        viz.stats.node_count,
        viz.stats.edge_count,
        top
    ))
}
