#![allow(dead_code)]

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::extract::{Path as UrlPath, Query, State};
use axum::routing::get;
use serde_json::{Value, json};

use fitment::catalog::{CatalogClient, ChildTypesQuery, FitmentCatalog, FixtureCatalog};
use fitment::config::FitmentConfig;
use fitment::model::{FitmentTypeId, RootTypeId};
use fitment::pairs::decode_pairs;

pub const FIXTURE: &str = include_str!("../../fixtures/catalog.json");

pub fn fixture_path() -> String {
    format!("{}/fixtures/catalog.json", env!("CARGO_MANIFEST_DIR"))
}

struct BackendState {
    catalog: FixtureCatalog,
    listing_hits: AtomicUsize,
    /// Added before every catalog and listing response; `/api/ping` stays fast.
    delay: Duration,
}

impl BackendState {
    async fn stall(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// In-process fitment backend serving the fixture tree over HTTP.
pub struct BackendGuard {
    pub base_url: String,
    state: Arc<BackendState>,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl BackendGuard {
    pub fn listing_hits(&self) -> usize {
        self.state.listing_hits.load(Ordering::SeqCst)
    }
}

impl Drop for BackendGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}

#[derive(serde::Deserialize)]
struct PairsQuery {
    #[serde(default)]
    selected_pairs: Option<String>,
}

fn backend_router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/api/ping", get(|| async { Json(json!({"message": "pong"})) }))
        .route("/api/fitment-search/root-types", get(root_types))
        .route("/api/fitment-search/values/:type_id", get(values))
        .route("/api/fitment-search/child-types/:root_id", get(child_types))
        .route("/api/categories", get(categories))
        .with_state(state)
}

async fn root_types(State(state): State<Arc<BackendState>>) -> Json<Value> {
    state.stall().await;
    let roots = state.catalog.root_types().unwrap_or_default();
    Json(json!({"success": true, "data": roots}))
}

/// A single value comes back as a bare object, like the real backend does.
async fn values(
    State(state): State<Arc<BackendState>>,
    UrlPath(type_id): UrlPath<u64>,
    Query(q): Query<PairsQuery>,
) -> Json<Value> {
    state.stall().await;
    let context = decode_pairs(q.selected_pairs.as_deref().unwrap_or(""));
    let values = state
        .catalog
        .fitment_values(FitmentTypeId::from(type_id), &context)
        .unwrap_or_default();
    if values.len() == 1 {
        Json(json!({"success": true, "data": values[0]}))
    } else {
        Json(json!({"success": true, "data": values}))
    }
}

async fn child_types(
    State(state): State<Arc<BackendState>>,
    UrlPath(root_id): UrlPath<u64>,
    Query(q): Query<PairsQuery>,
) -> Json<Value> {
    state.stall().await;
    let query = ChildTypesQuery::new(
        RootTypeId::from(root_id),
        decode_pairs(q.selected_pairs.as_deref().unwrap_or("")),
    );
    let types = state.catalog.child_types(&query).unwrap_or_default();
    Json(json!({"success": true, "data": types}))
}

async fn categories(State(state): State<Arc<BackendState>>) -> Json<Value> {
    state.listing_hits.fetch_add(1, Ordering::SeqCst);
    state.stall().await;
    Json(json!([{"id": 1, "name": "Brakes"}]))
}

pub fn spawn_backend() -> Result<BackendGuard> {
    spawn_slow_backend(Duration::ZERO)
}

/// Backend that answers every catalog request only after `delay`.
pub fn spawn_slow_backend(delay: Duration) -> Result<BackendGuard> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").context("bind fake backend")?;
    listener
        .set_nonblocking(true)
        .context("set fake backend nonblocking")?;
    let addr = listener.local_addr().context("read fake backend addr")?;

    let state = Arc::new(BackendState {
        catalog: FixtureCatalog::from_json(FIXTURE)?,
        listing_hits: AtomicUsize::new(0),
        delay,
    });
    let app = backend_router(state.clone());
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let thread = thread::spawn(move || {
        let Ok(rt) = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        else {
            return;
        };
        rt.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
        });
    });

    let base_url = format!("http://{}", addr);
    wait_for_path(&base_url, "/api/ping")?;

    Ok(BackendGuard {
        base_url,
        state,
        shutdown: Some(tx),
        thread: Some(thread),
    })
}

/// A base URL nothing is listening on.
pub fn dead_base_url() -> Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").context("bind probe")?;
    let addr = listener.local_addr().context("read probe addr")?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

pub fn catalog_client(base_url: &str, via_proxy: bool) -> Result<CatalogClient> {
    catalog_client_with_timeout(base_url, via_proxy, 5)
}

pub fn catalog_client_with_timeout(
    base_url: &str,
    via_proxy: bool,
    timeout_secs: u64,
) -> Result<CatalogClient> {
    let config = FitmentConfig {
        base_url: Some(base_url.to_string()),
        timeout_secs,
        via_proxy,
        ..FitmentConfig::default()
    };
    CatalogClient::new(&config)
}

pub struct ProxyGuard {
    pub base_url: String,
    _dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ProxyGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_proxy(upstream: &str, redirects: Option<&Path>) -> Result<ProxyGuard> {
    spawn_proxy_with_timeout(upstream, redirects, 5)
}

pub fn spawn_proxy_with_timeout(
    upstream: &str,
    redirects: Option<&Path>,
    timeout_secs: u64,
) -> Result<ProxyGuard> {
    let dir = tempfile::tempdir().context("create proxy tempdir")?;
    let addr_file = dir.path().join("addr.txt");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fitment-proxy"));
    cmd.args(["--addr", "127.0.0.1:0", "--upstream", upstream])
        .arg("--timeout-secs")
        .arg(timeout_secs.to_string())
        .arg("--addr-file")
        .arg(&addr_file)
        .env_remove("PARTSLOGIC_URL")
        .env_remove("FITMENT_TIMEOUT_SECS")
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(path) = redirects {
        cmd.arg("--redirects").arg(path);
    }
    let child = cmd.spawn().context("spawn fitment-proxy")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_path(&base_url, "/healthz")?;

    Ok(ProxyGuard {
        base_url,
        _dir: dir,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_path(base_url: &str, path: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not answer at {}{}", base_url, path);
        }
        match client.get(format!("{}{}", base_url, path)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}
