use super::*;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use url::Url;

/// Backend routes the proxy will forward to.
pub(super) const ALLOWED_ROUTES: &[&str] = &[
    "/api/fitment-search/**",
    "/api/search/**",
    "/api/categories*",
    "/api/brands*",
    "/api/products/*/fitment-groups",
    "/api/ping",
];

pub(super) const LISTING_ROUTES: &[&str] = &["/api/categories*", "/api/brands*"];

/// `*` stays within one path segment; `**` spans segments.
pub(super) fn build_globs(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        let glob = GlobBuilder::new(p)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid route glob {}", p))?;
        builder.add(glob);
    }
    builder.build().context("build route globs")
}

/// Absolute, same-host, no parent segments.
pub(super) fn is_safe_path(path: &str) -> bool {
    path.starts_with('/') && !path.contains("://") && !path.contains("..")
}

/// Joins `path` onto the upstream and returns the normalized target with
/// the route below the upstream base, which is what the allowlist sees.
/// `None` when the joined URL leaves the upstream origin or base path, or
/// still carries encoded dots or separators after normalization.
pub(super) fn resolve_target(upstream: &Url, path: &str) -> Option<(Url, String)> {
    if !is_safe_path(path) {
        return None;
    }
    let base = upstream.as_str().trim_end_matches('/');
    let target = Url::parse(&format!("{}{}", base, path)).ok()?;
    if target.origin() != upstream.origin() {
        return None;
    }

    let lowered = target.path().to_ascii_lowercase();
    if ["%2e", "%2f", "%5c"].iter().any(|enc| lowered.contains(enc)) {
        return None;
    }

    let prefix = upstream.path().trim_end_matches('/');
    let route = target.path().strip_prefix(prefix)?;
    if !route.starts_with('/') {
        return None;
    }
    let route = route.to_string();
    Some((target, route))
}

pub(super) async fn fetch_upstream(state: &AppState, target: &Url) -> Result<UpstreamResponse> {
    let resp = state
        .client
        .get(target.clone())
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .with_context(|| format!("request {}", target))?;

    let status = StatusCode::from_u16(resp.status().as_u16()).context("upstream status")?;
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();
    let body = resp.bytes().await.context("read upstream body")?;

    Ok(UpstreamResponse {
        status,
        content_type,
        body,
    })
}
