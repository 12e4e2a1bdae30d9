use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser};

use fitment::catalog::{CachingCatalog, CatalogClient, FixtureCatalog, SharedCatalog};
use fitment::config::FitmentConfig;
use fitment::logging::{self, Verbosity};

use crate::Commands;

const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Parser)]
#[command(name = "fitment")]
#[command(about = "Year/Make/Model fitment lookups", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Backend base URL (overrides config and PARTSLOGIC_URL)
    #[arg(long, global = true)]
    pub(crate) url: Option<String>,

    /// Serve the catalog from a local fixture tree instead of the backend
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "url")]
    pub(crate) fixture: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[arg(short, long, global = true)]
    pub(crate) quiet: bool,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.global.verbose, cli.global.quiet));
    crate::cli_exec::handle_command(&cli.global, cli.command)
}

pub(crate) fn load_config(global: &GlobalArgs) -> Result<FitmentConfig> {
    FitmentConfig::resolve(global.config.as_deref(), global.url.as_deref())
}

pub(crate) fn open_catalog(global: &GlobalArgs) -> Result<SharedCatalog> {
    if let Some(path) = &global.fixture {
        tracing::debug!(path = %path.display(), "using fixture catalog");
        return Ok(Arc::new(FixtureCatalog::load(path)?));
    }

    let cfg = load_config(global)?;
    let client = CatalogClient::new(&cfg)?;
    tracing::debug!(base_url = client.base_url(), "using remote catalog");
    Ok(Arc::new(CachingCatalog::with_ttl(client, CATALOG_CACHE_TTL)))
}
