use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;
use crate::inventory::{load_inventory, Inventory};
use crate::package::{package_all, plan_all};
use crate::page_range::PageRange;
use crate::pdf::{split_range, PdfDocument};
use crate::report::Warning;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InventoryRequest {
    #[schemars(description = "Path to the inventory workbook (.xls, .xlsx or .ods)")]
    pub spreadsheet: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanRequest {
    #[schemars(description = "Path to the inventory workbook (.xls, .xlsx or .ods)")]
    pub spreadsheet: String,
    #[schemars(description = "Directory holding one scanned PDF per document")]
    pub input_dir: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PackageRequest {
    #[schemars(description = "Path to the inventory workbook (.xls, .xlsx or .ods)")]
    pub spreadsheet: String,
    #[schemars(description = "Directory holding one scanned PDF per document")]
    pub input_dir: String,
    #[schemars(description = "Directory the per-document zip archives are written to")]
    pub output_dir: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExtractRangeRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page range (e.g., '5', '1-5', '15-end')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct ArchiveServer {
    config: Config,
    tool_router: ToolRouter<Self>,
}

impl ArchiveServer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

#[tool_router]
impl ArchiveServer {
    #[tool(description = "Read an archive inventory workbook and list each document's sub-files with their start pages, plus any rows that were skipped")]
    fn archive_inventory(
        &self,
        Parameters(InventoryRequest { spreadsheet }): Parameters<InventoryRequest>,
    ) -> String {
        match load_inventory(&spreadsheet, &self.config) {
            Ok((inventory, warnings)) => to_json(&InventoryResult {
                inventory,
                warnings,
            }),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Match source PDFs to inventory documents and show the page range and file name each sub-file would get, without writing anything")]
    fn archive_plan(&self, Parameters(req): Parameters<PlanRequest>) -> String {
        let result = load_inventory(&req.spreadsheet, &self.config).and_then(|(inventory, warnings)| {
            let pattern = self.config.identifier_pattern()?;
            plan_all(&inventory, Path::new(&req.input_dir), &pattern, warnings)
        });
        match result {
            Ok(plan) => to_json(&plan),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Split every matched source PDF into its sub-files and write one zip archive per document to the output directory")]
    fn archive_package(&self, Parameters(req): Parameters<PackageRequest>) -> String {
        let result = load_inventory(&req.spreadsheet, &self.config).and_then(|(inventory, warnings)| {
            let pattern = self.config.identifier_pattern()?;
            package_all(
                &inventory,
                Path::new(&req.input_dir),
                Path::new(&req.output_dir),
                &pattern,
                warnings,
            )
        });
        match result {
            Ok(report) => to_json(&report),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Extract one page range from a PDF and save it to a new file")]
    fn pdf_extract_range(&self, Parameters(req): Parameters<ExtractRangeRequest>) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        let range = match PageRange::parse(&req.pages, doc.page_count()) {
            Ok(r) => r,
            Err(e) => return format!("Error: {}", e),
        };

        match split_range(&doc, range, &req.output) {
            Ok(page_count) => to_json(&ExtractResult {
                output_path: req.output,
                page_count,
            }),
            Err(e) => format!("Error: {}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize)]
pub struct InventoryResult {
    pub inventory: Inventory,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExtractResult {
    pub output_path: String,
    pub page_count: u32,
}

#[tool_handler]
impl ServerHandler for ArchiveServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Archive inventory splitting tools. Use archive_inventory to read a catalogue \
                 workbook, archive_plan to preview how scanned PDFs map to sub-files, \
                 archive_package to write one zip per document, and pdf_extract_range to cut \
                 a single page range out of a PDF."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let server = ArchiveServer::new(config);

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
