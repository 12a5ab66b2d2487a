use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "archsplit")]
#[command(about = "Split scanned archive PDFs into sub-files listed in an inventory spreadsheet")]
#[command(version)]
pub struct Cli {
    /// JSON file overriding column names and the document identifier prefix
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Show the documents and sub-files found in an inventory workbook
    Inventory {
        /// Inventory workbook (.xls, .xlsx or .ods)
        spreadsheet: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show how source PDFs would be split, without writing anything
    Plan {
        /// Inventory workbook (.xls, .xlsx or .ods)
        spreadsheet: PathBuf,

        /// Directory holding one scanned PDF per document
        input_dir: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Split every matched PDF and zip the parts per document
    Run {
        /// Inventory workbook (.xls, .xlsx or .ods)
        spreadsheet: PathBuf,

        /// Directory holding one scanned PDF per document
        input_dir: PathBuf,

        /// Directory for the per-document archives
        #[arg(short, long, default_value = "PDF_Splitter_Output")]
        output_dir: PathBuf,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,

        /// Exit with an error if any document failed
        #[arg(long)]
        strict: bool,
    },

    /// Extract one page range to a new PDF
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page range (e.g., "5", "1-5", "15-end")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}
