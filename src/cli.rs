use cataid_common::ExportVariant;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cataid")]
#[command(about = "Visaid/cataid page tools: scene filtering, catalog export and catout tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a review table from exported catout files
    Table {
        /// Catout files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output file or directory (default: configured table file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = TableFormat::Html)]
        format: TableFormat,
    },

    /// Show which rows a saved page displays
    Inspect {
        /// Saved visaid/cataid HTML page
        #[arg(required = true)]
        page: PathBuf,

        /// Check a scene type checkbox
        #[arg(long = "show", value_name = "CAT")]
        show: Vec<String>,

        /// Uncheck a scene type checkbox
        #[arg(long = "hide", value_name = "CAT")]
        hide: Vec<String>,

        /// Switch to catalog mode before printing
        #[arg(long)]
        catalog: bool,
    },

    /// Export catalog edits from a saved cataid page
    Export {
        /// Saved cataid HTML page
        #[arg(required = true)]
        page: PathBuf,

        /// Toggle engagement of the editor at this time position (ms)
        #[arg(long = "engage", value_name = "TP")]
        engage: Vec<u64>,

        /// Export format (default: the page's own)
        #[arg(long)]
        variant: Option<ExportVariant>,

        /// Cataloger name when the page has none
        #[arg(long)]
        cataloger: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Show or edit settings
    Config {
        /// Set the default cataloger name
        #[arg(long)]
        set_cataloger: Option<String>,

        /// Show settings
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    #[default]
    Html,
    #[value(alias = "xlsx")]
    Excel,
    Both,
}

impl std::fmt::Display for TableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableFormat::Html => write!(f, "html"),
            TableFormat::Excel => write!(f, "excel"),
            TableFormat::Both => write!(f, "both"),
        }
    }
}

/// Formats a time position in milliseconds as `HH:MM:SS.mmm`
pub fn format_time_position(ms: u64) -> String {
    let millis = ms % 1000;
    let secs = ms / 1000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        millis
    )
}
