//! Proxy route registration: health, the backend pass-through, and legacy
//! URL redirects for everything else.

use super::*;

use axum::Router;
use axum::routing::get;

use fitment::cache::{Cache, cache_key};
use fitment::catalog::PROXY_ROUTE;

pub(super) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(PROXY_ROUTE, get(proxy))
        .fallback(legacy_redirect)
        .with_state(state)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn proxy(State(state): State<Arc<AppState>>, Query(query): Query<ProxyQuery>) -> Response {
    let Some(path) = query.path.filter(|p| !p.is_empty()) else {
        return bad_request("Missing 'path' query param");
    };
    let resolved = forward::resolve_target(&state.upstream, &path)
        .filter(|(_, route)| state.allowed.is_match(route));
    let Some((target, route)) = resolved else {
        tracing::debug!(path = %path, "rejected proxy path");
        return bad_request("Invalid path");
    };

    let key = state
        .listings
        .is_match(&route)
        .then(|| cache_key(&["proxy", target.as_str()]));
    if let Some(key) = &key
        && let Some(hit) = state.listing_cache.get(key)
    {
        tracing::debug!(path = %path, "listing cache hit");
        return upstream_response(hit);
    }

    match forward::fetch_upstream(&state, &target).await {
        Ok(resp) => {
            if !resp.status.is_success() {
                tracing::warn!(
                    status = %resp.status,
                    target = %target,
                    body = %String::from_utf8_lossy(&resp.body),
                    "upstream error"
                );
            } else if let Some(key) = &key {
                state.listing_cache.set(key, resp.clone());
            }
            upstream_response(resp)
        }
        Err(err) => {
            tracing::error!(error = %format!("{:#}", err), target = %target, "proxy request failed");
            bad_gateway(&err, target.as_str())
        }
    }
}

async fn legacy_redirect(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match state.redirects.resolve(uri.path()) {
        Some(to) => {
            tracing::debug!(from = uri.path(), to = %to, "legacy redirect");
            Redirect::permanent(&to).into_response()
        }
        None => not_found(),
    }
}
