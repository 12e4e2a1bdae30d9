use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};

#[path = "fitment_proxy/types.rs"]
mod types;
use self::types::*;
#[path = "fitment_proxy/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "fitment_proxy/forward.rs"]
mod forward;
#[path = "fitment_proxy/routes.rs"]
mod routes;
#[path = "fitment_proxy/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
