use std::sync::Arc;

use rmcp::{
    ServerHandler,
    ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult,
        Content,
        Implementation,
        ServerCapabilities,
        ServerInfo,
    },
    tool,
    tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error,
    filter::Facets,
    live::LiveIndex,
    record::{Audience, DocType},
    search::{DEFAULT_LIMIT, ResultSummary},
};

#[derive(Clone)]
pub struct DocfindMcpServer {
    index: Arc<LiveIndex>,
    tool_router: ToolRouter<Self>,
}

impl DocfindMcpServer {
    pub fn new(index: Arc<LiveIndex>) -> Self {
        Self {
            index,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router(router = tool_router)]
impl DocfindMcpServer {
    /// Fuzzy search over the documentation index.
    #[tool(
        name = "docs_search",
        description = "Fuzzy search documentation by title, description, body and category. Optional audience, category and type filters."
    )]
    pub async fn docs_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let query = params.query.trim().to_string();
        if query.is_empty() {
            return Err(rmcp::ErrorData::invalid_params(
                "query must not be empty",
                None,
            ));
        }

        let facets = Facets {
            audience: parse_facet::<Audience>(params.audience.as_deref())?,
            category: params.category.filter(|c| !c.trim().is_empty()),
            doc_type: parse_facet::<DocType>(params.doc_type.as_deref())?,
        };
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

        let handle = self.index.current();
        // Filter the full ranked list so facets never starve the limit.
        let mut results = facets.apply(handle.search_with(&query, Some(usize::MAX)));
        results.truncate(limit);

        let items: Vec<ResultSummary> =
            results.iter().map(ResultSummary::from).collect();
        let summary = format_search_summary(&items, &query);
        let structured = serde_json::to_value(SearchResponse {
            query,
            result_count: items.len(),
            results: items,
        })
        .map_err(|e| mcp_error("failed to serialize search results", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }

    /// Reload the index file from disk.
    #[tool(
        name = "docs_reload",
        description = "Reload the documentation index from disk after a rebuild."
    )]
    pub async fn docs_reload(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let count = self
            .index
            .reload()
            .map_err(|e| mcp_error("reload failed", e))?;

        let mut result = CallToolResult::success(vec![Content::text(format!(
            "Reloaded {count} record(s) from {}",
            self.index.path().display()
        ))]);
        result.structured_content = Some(json!({ "records": count }));
        Ok(result)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for DocfindMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(
                Implementation::new("docfind", env!("CARGO_PKG_VERSION"))
                    .with_title("docfind MCP"),
            )
            .with_instructions(
                "Use docs_search to find documentation pages. Narrow with audience, category or type when you know them.",
            )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Search query string.
    pub query: String,
    /// Only documents for this audience (users, developers, operators, contributors).
    pub audience: Option<String>,
    /// Only documents in this category.
    pub category: Option<String>,
    /// Only documents of this type (tutorial, how-to, reference, explanation).
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    /// Maximum number of results (default: 10).
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    query: String,
    result_count: usize,
    results: Vec<ResultSummary>,
}

fn parse_facet<T>(value: Option<&str>) -> Result<Option<T>, rmcp::ErrorData>
where
    T: std::str::FromStr<Err = String>,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|e| rmcp::ErrorData::invalid_params(e, None)),
    }
}

fn format_search_summary(results: &[ResultSummary], query: &str) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\"");
    }

    let mut lines = Vec::with_capacity(results.len() + 1);
    let suffix = if results.len() == 1 { "" } else { "s" };
    lines.push(format!(
        "Found {} result{} for \"{query}\":",
        results.len(),
        suffix
    ));

    for item in results {
        let score = item.score.unwrap_or_default();
        lines.push(format!("{:.3} {} {}", score, item.route, item.title));
    }

    lines.join("\n")
}

fn mcp_error(message: &str, error: impl std::fmt::Display) -> rmcp::ErrorData {
    rmcp::ErrorData::internal_error(
        message.to_string(),
        Some(json!({ "error": error.to_string() })),
    )
}

pub fn run_mcp(index: LiveIndex) -> error::Result<()> {
    let server = DocfindMcpServer::new(Arc::new(index));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Config(format!("failed to start tokio runtime: {e}"))
        })?;

    runtime.block_on(async move {
        let transport = rmcp::transport::stdio();
        let running = server.serve(transport).await.map_err(|e| {
            error::Error::Config(format!(
                "MCP server initialization failed: {e}"
            ))
        })?;
        running.waiting().await.map_err(|e| {
            error::Error::Config(format!("MCP server error: {e}"))
        })?;
        Ok(())
    })
}
