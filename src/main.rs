use anyhow::Result;
use clap::Parser;
use docpack::app::engine::DocpackEngine;
use docpack::cli::{self, Cli, Commands};
use docpack::config::DocpackConfig;
use docpack::server::{http, mcp::DocpackMcpServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = DocpackConfig::load(&args.config);
    init_tracing(&config.log.filter);

    match args.command {
        Commands::Info { archive, branch } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            engine.set_tracked_branch(branch)?;
            cli::print_info(&engine)
        }
        Commands::Visualize {
            archive,
            output,
            compact,
        } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            cli::write_visualization(&engine, output.as_deref(), compact)
        }
        Commands::Stats { archive } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            cli::display_stats(&engine)
        }
        Commands::Top {
            archive,
            limit,
            kind,
            role,
        } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            cli::display_top(&engine, limit, kind.as_deref(), role)
        }
        Commands::Search {
            archive,
            pattern,
            limit,
        } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            cli::search_symbols(&engine, &pattern, limit)
        }
        Commands::Symbol { archive, id } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            cli::display_symbol(&engine, &id)
        }
        Commands::Check { archive } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            cli::check_connectivity(&engine)
        }
        Commands::ApplyEdits {
            archive,
            edits,
            output,
        } => cli::apply_edits_to_file(&archive, &edits, &output).map(|_| ()),
        Commands::Summarize { archives } => cli::summarize(&archives),
        Commands::Serve { archive, addr } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            http::serve(engine, addr.unwrap_or(config.server.addr)).await
        }
        Commands::Mcp { archive } => {
            let engine = DocpackEngine::load_from_path(&archive)?;
            DocpackMcpServer::new(engine).serve_stdio().await
        }
    }
}

/// Logs go to stderr; stdout carries command output and the MCP transport.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
