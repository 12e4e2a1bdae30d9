use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::{ChildTypesQuery, Envelope, FitmentCatalog, OneOrMany};
use crate::config::FitmentConfig;
use crate::model::{FitmentType, FitmentTypeId, FitmentValue, RootType, SelectionPair};
use crate::pairs::encode_pairs;

pub const PROXY_ROUTE: &str = "/api/partslogic-proxy";

/// Blocking HTTP client for the fitment-search API, either direct or through
/// the forwarding proxy.
pub struct CatalogClient {
    base_url: String,
    via_proxy: bool,
    client: reqwest::blocking::Client,
}

impl CatalogClient {
    pub fn new(config: &FitmentConfig) -> Result<Self> {
        let base_url = config.base_url()?.to_string();
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url,
            via_proxy: config.via_proxy,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe; the feature is active only when the backend answers
    /// `{"message": "pong"}`.
    pub fn ping(&self) -> bool {
        #[derive(serde::Deserialize)]
        struct Pong {
            #[serde(default)]
            message: Option<String>,
        }

        match self.get_json::<Pong>("/api/ping", &[], "ping") {
            Ok(p) => p.message.as_deref() == Some("pong"),
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "fitment backend ping failed");
                false
            }
        }
    }

    fn endpoint(&self, path: &str, selected: &[SelectionPair]) -> Result<Url> {
        let mut target = path.to_string();
        if !selected.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("selected_pairs", &encode_pairs(selected))
                .finish();
            target.push('?');
            target.push_str(&query);
        }

        if self.via_proxy {
            let mut url = Url::parse(&format!("{}{}", self.base_url, PROXY_ROUTE))
                .with_context(|| format!("parse proxy url for {}", self.base_url))?;
            url.query_pairs_mut().append_pair("path", &target);
            Ok(url)
        } else {
            Url::parse(&format!("{}{}", self.base_url, target))
                .with_context(|| format!("parse url for {}", target))
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        selected: &[SelectionPair],
        label: &str,
    ) -> Result<T> {
        let url = self.endpoint(path, selected)?;
        tracing::debug!(%url, "{}", label);
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .with_context(|| format!("{} request", label))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!(
                "{} endpoint not found (check {} points at the fitment backend)",
                label,
                self.base_url
            );
        }

        resp.error_for_status()
            .with_context(|| format!("{} status", label))?
            .json()
            .with_context(|| format!("parse {} response", label))
    }
}

impl FitmentCatalog for CatalogClient {
    fn root_types(&self) -> Result<Vec<RootType>> {
        let env: Envelope<Vec<RootType>> =
            self.get_json("/api/fitment-search/root-types", &[], "root types")?;
        env.into_data("root types")
    }

    fn fitment_values(
        &self,
        type_id: FitmentTypeId,
        context: &[SelectionPair],
    ) -> Result<Vec<FitmentValue>> {
        let label = format!("fitment values for type {}", type_id);
        let env: Envelope<OneOrMany<FitmentValue>> = self.get_json(
            &format!("/api/fitment-search/values/{}", type_id),
            context,
            &label,
        )?;
        Ok(env.into_data(&label)?.into_vec())
    }

    fn child_types(&self, query: &ChildTypesQuery) -> Result<Vec<FitmentType>> {
        let label = format!("child types for root {}", query.root_type);
        let env: Envelope<Vec<FitmentType>> = self.get_json(
            &format!("/api/fitment-search/child-types/{}", query.root_type),
            &query.context,
            &label,
        )?;
        env.into_data(&label)
    }
}

#[cfg(test)]
#[path = "../tests/catalog/http_client_tests.rs"]
mod tests;
