use super::*;

pub(super) fn bad_request(msg: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"message": msg})),
    )
        .into_response()
}

pub(super) fn bad_gateway(err: &anyhow::Error, target: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({"message": format!("{:#}", err), "target": target})),
    )
        .into_response()
}

pub(super) fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"message": "not found"})),
    )
        .into_response()
}

pub(super) fn upstream_response(resp: UpstreamResponse) -> Response {
    (
        resp.status,
        [(header::CONTENT_TYPE, resp.content_type)],
        resp.body,
    )
        .into_response()
}
