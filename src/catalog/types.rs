//! Wire envelope shared by the fitment-search endpoints.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// `{ success, data, message }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,

    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: Some(true),
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: Some(false),
            data: None,
            message: Some(message.to_string()),
        }
    }

    pub fn into_data(self, label: &str) -> Result<T> {
        if self.success == Some(false) {
            anyhow::bail!(
                "{} rejected by backend: {}",
                label,
                self.message.as_deref().unwrap_or("no message")
            );
        }
        self.data
            .with_context(|| format!("{} response missing data", label))
    }
}

/// The values endpoint answers with either a list or a single object.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(v) => vec![v],
        }
    }
}
