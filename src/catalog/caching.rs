//! Catalog decorator that reuses successful lookups through an injected
//! [`Cache`]. Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use super::{ChildTypesQuery, FitmentCatalog};
use crate::cache::{Cache, TtlCache, cache_key};
use crate::model::{FitmentType, FitmentTypeId, FitmentValue, RootType, SelectionPair};
use crate::pairs::encode_pairs;

#[derive(Clone, Debug)]
pub enum CatalogEntry {
    RootTypes(Vec<RootType>),
    Values(Vec<FitmentValue>),
    ChildTypes(Vec<FitmentType>),
}

pub struct CachingCatalog<C> {
    inner: C,
    cache: Arc<dyn Cache<CatalogEntry>>,
}

impl<C: FitmentCatalog> CachingCatalog<C> {
    pub fn new(inner: C, cache: Arc<dyn Cache<CatalogEntry>>) -> Self {
        Self { inner, cache }
    }

    pub fn with_ttl(inner: C, ttl: Duration) -> Self {
        Self::new(inner, Arc::new(TtlCache::new(ttl)))
    }

    pub fn cache(&self) -> &Arc<dyn Cache<CatalogEntry>> {
        &self.cache
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

fn values_key(type_id: FitmentTypeId, context: &[SelectionPair]) -> String {
    cache_key(&["values", &type_id.to_string(), &encode_pairs(context)])
}

fn child_types_key(query: &ChildTypesQuery) -> String {
    cache_key(&[
        "child-types",
        &query.root_type.to_string(),
        &encode_pairs(&query.context),
    ])
}

const ROOT_TYPES_KEY: &str = "root-types";

impl<C: FitmentCatalog> FitmentCatalog for CachingCatalog<C> {
    fn root_types(&self) -> Result<Vec<RootType>> {
        if let Some(CatalogEntry::RootTypes(v)) = self.cache.get(ROOT_TYPES_KEY) {
            return Ok(v);
        }
        let v = self.inner.root_types()?;
        self.cache
            .set(ROOT_TYPES_KEY, CatalogEntry::RootTypes(v.clone()));
        Ok(v)
    }

    fn fitment_values(
        &self,
        type_id: FitmentTypeId,
        context: &[SelectionPair],
    ) -> Result<Vec<FitmentValue>> {
        let key = values_key(type_id, context);
        if let Some(CatalogEntry::Values(v)) = self.cache.get(&key) {
            return Ok(v);
        }
        let v = self.inner.fitment_values(type_id, context)?;
        self.cache.set(&key, CatalogEntry::Values(v.clone()));
        Ok(v)
    }

    fn child_types(&self, query: &ChildTypesQuery) -> Result<Vec<FitmentType>> {
        let key = child_types_key(query);
        if let Some(CatalogEntry::ChildTypes(v)) = self.cache.get(&key) {
            return Ok(v);
        }
        let v = self.inner.child_types(query)?;
        self.cache.set(&key, CatalogEntry::ChildTypes(v.clone()));
        Ok(v)
    }
}

#[cfg(test)]
#[path = "../tests/catalog/caching_tests.rs"]
mod tests;
