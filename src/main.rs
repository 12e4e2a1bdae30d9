use std::path::PathBuf;

use clap::Subcommand;

mod cli_exec;
mod cli_runtime;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Ping the backend and count root types
    Status,

    /// List root types (taxonomies such as Car/Truck)
    RootTypes {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List values of a fitment type
    Values {
        type_id: u64,
        /// Upstream selections, e.g. 1:2020,2:55
        #[arg(long)]
        pairs: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List the fitment types that follow a set of selections
    ChildTypes {
        root_id: u64,
        /// Upstream selections, e.g. 1:2020,2:55
        #[arg(long)]
        pairs: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk the cascade by picking one value id per level
    Select {
        /// Root type id (defaults to the first root type)
        #[arg(long)]
        root: Option<u64>,
        /// Value ids, top level first
        #[arg(required = true)]
        values: Vec<u64>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the cascade from a fitment_pairs string
    Restore {
        pairs: String,
        /// Root type id (defaults to the first root type)
        #[arg(long)]
        root: Option<u64>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a fitment_pairs string
    Decode { pairs: String },

    /// Build a fitment_pairs string from type:value arguments
    Encode {
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Map a legacy /ag-...html path to its search URL
    Redirect {
        path: String,
        /// JSON object of old path -> new path
        #[arg(long)]
        redirects: PathBuf,
    },

    /// Interactive vehicle selector
    Tui {
        /// Start from a fitment_pairs string
        #[arg(long)]
        pairs: Option<String>,
    },
}

fn main() {
    if let Err(err) = cli_runtime::run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
