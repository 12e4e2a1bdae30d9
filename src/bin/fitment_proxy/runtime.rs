use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

use fitment::cache::TtlCache;
use fitment::config::FitmentConfig;
use fitment::logging::{self, Verbosity};
use fitment::redirect::RedirectTable;

use super::forward::{ALLOWED_ROUTES, LISTING_ROUTES, build_globs};
use super::types::{AppState, LISTING_TTL};
use super::*;

#[derive(Parser)]
#[command(name = "fitment-proxy")]
#[command(about = "Same-origin proxy for the fitment backend", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8787")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Backend base URL (defaults to PARTSLOGIC_URL)
    #[arg(long)]
    upstream: Option<String>,

    /// JSON object of legacy path -> new path
    #[arg(long)]
    redirects: Option<PathBuf>,

    /// Upstream request timeout (defaults to FITMENT_TIMEOUT_SECS or 10)
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, false));

    let mut config = FitmentConfig::resolve(None, args.upstream.as_deref())?;
    if let Some(secs) = args.timeout_secs {
        config.timeout_secs = secs;
    }
    let base_url = config.base_url()?;
    let upstream =
        Url::parse(base_url).with_context(|| format!("invalid upstream URL {}", base_url))?;

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .build()
        .context("build upstream client")?;

    let redirects = match &args.redirects {
        Some(path) => RedirectTable::load(path)?,
        None => RedirectTable::from_map(BTreeMap::new())?,
    };

    let state = Arc::new(AppState {
        upstream,
        client,
        allowed: build_globs(ALLOWED_ROUTES)?,
        listings: build_globs(LISTING_ROUTES)?,
        listing_cache: TtlCache::new(LISTING_TTL),
        redirects,
    });
    tracing::info!(
        upstream = %state.upstream,
        redirects = state.redirects.len(),
        timeout = ?config.timeout(),
        "proxy configured"
    );

    let app = super::routes::router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("fitment-proxy listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
