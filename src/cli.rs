use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::defaults::Defaults;

/// GPU catalog: browse and register GPUs from a console menu
#[derive(Parser, Debug)]
#[command(version, about = "GPU catalog console")]
pub struct Cli {
    /// Catalog file; created with sample data when missing
    #[arg(long, default_value = Defaults::DB_PATH)]
    pub db: PathBuf,

    /// How long confirmation messages stay on screen (milliseconds)
    #[arg(long, default_value_t = Defaults::REGISTER_PAUSE_MS)]
    pub pause_ms: u64,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Defaults to the interactive menu
    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive menu (same as giving no command)
    Menu,

    /// Print every GPU as a table and exit
    List {
        /// Column to sort by, e.g. `price_cents` or `Series.release_year`
        #[arg(long)]
        order_by: Option<String>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Include the id of every referenced record
        #[arg(long)]
        ids: bool,
    },

    /// Create the catalog file with sample data
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}
