//! Access to the fitment backend: root types, per-level values, and the
//! child-type lookup that drives the cascade.

use std::sync::Arc;

use anyhow::Result;

use crate::model::{FitmentType, FitmentTypeId, FitmentValue, RootType, RootTypeId, SelectionPair};

mod caching;
pub use self::caching::{CachingCatalog, CatalogEntry};
mod fixture;
pub use self::fixture::{FixtureCatalog, FixtureLevel, FixtureOption, FixtureTree};
mod http_client;
pub use self::http_client::{CatalogClient, PROXY_ROUTE};
mod types;
pub use self::types::{Envelope, OneOrMany};

/// Context for the "what comes next" lookup: the root taxonomy plus the
/// selections made so far, in cascade order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildTypesQuery {
    pub root_type: RootTypeId,
    pub context: Vec<SelectionPair>,
}

impl ChildTypesQuery {
    pub fn new(root_type: RootTypeId, context: Vec<SelectionPair>) -> Self {
        Self { root_type, context }
    }
}

/// Stateless fitment lookups. Implementations report failures as `Err`;
/// callers in this crate degrade those to empty results.
pub trait FitmentCatalog {
    fn root_types(&self) -> Result<Vec<RootType>>;

    /// Values for `type_id` consistent with `context`. An empty context asks
    /// for unconstrained values.
    fn fitment_values(
        &self,
        type_id: FitmentTypeId,
        context: &[SelectionPair],
    ) -> Result<Vec<FitmentValue>>;

    fn child_types(&self, query: &ChildTypesQuery) -> Result<Vec<FitmentType>>;
}

impl<C: FitmentCatalog + ?Sized> FitmentCatalog for Arc<C> {
    fn root_types(&self) -> Result<Vec<RootType>> {
        (**self).root_types()
    }

    fn fitment_values(
        &self,
        type_id: FitmentTypeId,
        context: &[SelectionPair],
    ) -> Result<Vec<FitmentValue>> {
        (**self).fitment_values(type_id, context)
    }

    fn child_types(&self, query: &ChildTypesQuery) -> Result<Vec<FitmentType>> {
        (**self).child_types(query)
    }
}

impl<C: FitmentCatalog + ?Sized> FitmentCatalog for Box<C> {
    fn root_types(&self) -> Result<Vec<RootType>> {
        (**self).root_types()
    }

    fn fitment_values(
        &self,
        type_id: FitmentTypeId,
        context: &[SelectionPair],
    ) -> Result<Vec<FitmentValue>> {
        (**self).fitment_values(type_id, context)
    }

    fn child_types(&self, query: &ChildTypesQuery) -> Result<Vec<FitmentType>> {
        (**self).child_types(query)
    }
}

pub type SharedCatalog = Arc<dyn FitmentCatalog + Send + Sync>;

/// Root types, or none when the backend is unavailable. An empty list means
/// the vehicle filter should stay hidden.
pub fn root_types_or_empty<C: FitmentCatalog + ?Sized>(catalog: &C) -> Vec<RootType> {
    or_empty("root types", catalog.root_types())
}

pub(crate) fn or_empty<T>(label: &str, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), "fitment {} unavailable", label);
            Vec::new()
        }
    }
}
