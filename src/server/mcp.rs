use crate::app::dto::*;
use crate::app::engine::DocpackEngine;
use crate::domain::classifier::VisualizationRole;
use crate::domain::index::ConnectivityReport;
use rmcp::{
    Json, ServerHandler, ServiceExt, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio,
};
use tokio::task::spawn_blocking;

#[derive(Clone)]
pub struct DocpackMcpServer {
    engine: DocpackEngine,
    tool_router: ToolRouter<Self>,
}

impl DocpackMcpServer {
    pub fn new(engine: DocpackEngine) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

#[tool_router]
impl DocpackMcpServer {
    #[tool(description = "Summarize the loaded docpack: node/edge counts, kind counts, languages, role counts and top symbols.")]
    async fn docpack_stats(&self) -> Result<Json<StatsResponse>, String> {
        let engine = self.engine.clone();
        spawn_blocking(move || engine.stats())
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(description = "List the most important symbols, optionally filtered by kind (function, type, module, ...) and role (CoreUtility, EntryPoint, DataModel, Internal, Cluster, Standard).")]
    async fn top_symbols(&self, params: Parameters<TopParams>) -> Result<Json<TopResponse>, String> {
        let engine = self.engine.clone();
        let p = params.0;
        let role = p
            .role
            .as_deref()
            .map(str::parse::<VisualizationRole>)
            .transpose()?;
        spawn_blocking(move || engine.top(p.limit.unwrap_or(10), p.kind.as_deref(), role))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(description = "Search symbols whose id or name matches a case-insensitive regex.")]
    async fn search_symbols(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<Json<SearchResponse>, String> {
        let engine = self.engine.clone();
        let p = params.0;
        spawn_blocking(move || engine.search(&p.pattern, p.limit))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| format!("{e:#}"))
    }

    #[tool(description = "Show one symbol: role, importance, documentation and its incoming/outgoing edges.")]
    async fn symbol_detail(
        &self,
        params: Parameters<SymbolParams>,
    ) -> Result<Json<SymbolDetailResponse>, String> {
        let engine = self.engine.clone();
        let id = params.0.id;
        let lookup = id.clone();
        spawn_blocking(move || engine.symbol(&lookup))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map_err(|e| e.to_string())?
            .map(Json)
            .ok_or_else(|| format!("Symbol not found: {id}"))
    }

    #[tool(description = "Compare declared fan-in/fan-out with the edge list and list dangling edges.")]
    async fn connectivity(&self) -> Result<Json<ConnectivityReport>, String> {
        let engine = self.engine.clone();
        spawn_blocking(move || engine.connectivity())
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, rmcp::schemars::JsonSchema)]
pub struct TopParams {
    pub limit: Option<usize>,
    pub kind: Option<String>, // all|function|type|module|...
    pub role: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, rmcp::schemars::JsonSchema)]
pub struct SearchParams {
    pub pattern: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, rmcp::schemars::JsonSchema)]
pub struct SymbolParams {
    pub id: String,
}

#[tool_handler]
impl ServerHandler for DocpackMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Explore a docpack archive: code graph roles, importance ranking and generated documentation."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
