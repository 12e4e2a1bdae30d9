use super::*;

use std::time::Duration;

use globset::GlobSet;
use url::Url;

use fitment::cache::TtlCache;
use fitment::redirect::RedirectTable;

pub(super) const LISTING_TTL: Duration = Duration::from_secs(3600);

pub(super) struct AppState {
    pub(super) upstream: Url,
    pub(super) client: reqwest::Client,
    pub(super) allowed: GlobSet,
    /// Routes whose successful responses are served from `listing_cache`.
    pub(super) listings: GlobSet,
    pub(super) listing_cache: TtlCache<UpstreamResponse>,
    pub(super) redirects: RedirectTable,
}

#[derive(Clone, Debug)]
pub(super) struct UpstreamResponse {
    pub(super) status: StatusCode,
    pub(super) content_type: String,
    pub(super) body: axum::body::Bytes,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct ProxyQuery {
    pub(super) path: Option<String>,
}
