//! In-memory catalog described as one option tree per root type. Backs the
//! `--fixture` offline mode and the test backends.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{ChildTypesQuery, FitmentCatalog};
use crate::model::{FitmentType, FitmentTypeId, FitmentValue, RootType, RootTypeId, SelectionPair};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FixtureCatalog {
    pub root_types: Vec<RootType>,
    pub trees: Vec<FixtureTree>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixtureTree {
    pub root_type: RootTypeId,
    pub level: FixtureLevel,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixtureLevel {
    #[serde(rename = "type")]
    pub fitment_type: FitmentType,
    pub options: Vec<FixtureOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixtureOption {
    #[serde(flatten)]
    pub value: FitmentValue,

    /// Level offered once this option is picked; `None` ends the cascade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<FixtureLevel>>,
}

impl FixtureCatalog {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("parse fitment fixture")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read fixture {}", path.display()))?;
        Self::from_json(&s).with_context(|| format!("load fixture {}", path.display()))
    }

    fn tree(&self, root: RootTypeId) -> Option<&FixtureLevel> {
        self.trees
            .iter()
            .find(|t| t.root_type == root)
            .map(|t| &t.level)
    }
}

/// Follows `context` from `level`; `None` when the path leaves the tree or
/// the cascade has ended.
fn walk<'a>(level: &'a FixtureLevel, context: &[SelectionPair]) -> Option<&'a FixtureLevel> {
    let mut current = level;
    for pair in context {
        if current.fitment_type.id != pair.type_id {
            return None;
        }
        let option = current
            .options
            .iter()
            .find(|o| o.value.id == pair.value_id)?;
        current = option.next.as_deref()?;
    }
    Some(current)
}

impl FitmentCatalog for FixtureCatalog {
    fn root_types(&self) -> Result<Vec<RootType>> {
        Ok(self.root_types.clone())
    }

    fn fitment_values(
        &self,
        type_id: FitmentTypeId,
        context: &[SelectionPair],
    ) -> Result<Vec<FitmentValue>> {
        let level = self
            .trees
            .iter()
            .filter_map(|t| walk(&t.level, context))
            .find(|l| l.fitment_type.id == type_id);
        Ok(level
            .map(|l| l.options.iter().map(|o| o.value.clone()).collect())
            .unwrap_or_default())
    }

    fn child_types(&self, query: &ChildTypesQuery) -> Result<Vec<FitmentType>> {
        let next = self
            .tree(query.root_type)
            .and_then(|level| walk(level, &query.context));
        Ok(next
            .map(|l| {
                let mut ty = l.fitment_type.clone();
                ty.position.get_or_insert(query.context.len() as u32);
                vec![ty]
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "../tests/catalog/fixture_tests.rs"]
mod tests;
