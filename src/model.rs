use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

mod ids;
pub use self::ids::{FitmentTypeId, RootTypeId, ValueId};

// Backend payloads carry the display text as either `name` or `value`.
fn pick_label<'a>(name: &'a Option<String>, value: &'a Option<String>) -> &'a str {
    name.as_deref()
        .filter(|s| !s.is_empty())
        .or(value.as_deref())
        .unwrap_or("")
}

/// Top-level vehicle taxonomy entry ("Car/Truck", "Motorcycle", ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootType {
    pub id: RootTypeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RootType {
    pub fn new(id: impl Into<RootTypeId>, name: &str) -> Self {
        Self {
            id: id.into(),
            name: Some(name.to_string()),
            value: None,
        }
    }

    pub fn label(&self) -> &str {
        pick_label(&self.name, &self.value)
    }
}

/// One level of the cascade (Year, Make, Model, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitmentType {
    pub id: FitmentTypeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl FitmentType {
    pub fn new(id: impl Into<FitmentTypeId>, name: &str) -> Self {
        Self {
            id: id.into(),
            name: Some(name.to_string()),
            value: None,
            position: None,
        }
    }

    pub fn label(&self) -> &str {
        pick_label(&self.name, &self.value)
    }
}

/// A selectable option within a fitment type, valid only under the
/// upstream selections it was fetched with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitmentValue {
    pub id: ValueId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FitmentValue {
    pub fn new(id: impl Into<ValueId>, value: &str) -> Self {
        Self {
            id: id.into(),
            value: Some(value.to_string()),
            name: None,
        }
    }

    pub fn label(&self) -> &str {
        pick_label(&self.value, &self.name)
    }
}

/// Case-insensitive label order, ties broken by id.
pub fn compare_values(a: &FitmentValue, b: &FitmentValue) -> Ordering {
    a.label()
        .to_lowercase()
        .cmp(&b.label().to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

/// One resolved level: `(type id, value id)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionPair {
    pub type_id: FitmentTypeId,
    pub value_id: ValueId,
}

impl SelectionPair {
    pub fn new(type_id: impl Into<FitmentTypeId>, value_id: impl Into<ValueId>) -> Self {
        Self {
            type_id: type_id.into(),
            value_id: value_id.into(),
        }
    }
}

impl fmt::Display for SelectionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_id, self.value_id)
    }
}

/// Resolver-owned projection of a fitment type: its candidate values under
/// the current upstream context plus the shopper's pick, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DropdownLevel {
    pub fitment_type: FitmentType,
    pub values: Vec<FitmentValue>,
    pub selected_value: String,
    pub selected_id: ValueId,
}

impl DropdownLevel {
    pub fn new(fitment_type: FitmentType, values: Vec<FitmentValue>) -> Self {
        Self {
            fitment_type,
            values,
            selected_value: String::new(),
            selected_id: ValueId::default(),
        }
    }

    pub fn type_id(&self) -> FitmentTypeId {
        self.fitment_type.id
    }

    pub fn type_name(&self) -> &str {
        self.fitment_type.label()
    }

    pub fn is_selected(&self) -> bool {
        !self.selected_id.is_unset()
    }

    pub fn selection(&self) -> Option<SelectionPair> {
        self.is_selected()
            .then(|| SelectionPair::new(self.type_id(), self.selected_id))
    }

    pub fn find_value(&self, id: ValueId) -> Option<&FitmentValue> {
        self.values.iter().find(|v| v.id == id)
    }

    /// Records a pick. An empty label falls back to the option's own label.
    pub fn select(&mut self, id: ValueId, label: &str) {
        let label = if label.is_empty() {
            self.find_value(id)
                .map(|v| v.label().to_string())
                .unwrap_or_default()
        } else {
            label.to_string()
        };
        self.selected_value = label;
        self.selected_id = id;
    }

    pub fn clear_selection(&mut self) {
        self.selected_value.clear();
        self.selected_id = ValueId::default();
    }

    /// Options in presentation order.
    pub fn sorted_values(&self) -> Vec<&FitmentValue> {
        let mut out = self.values.iter().collect::<Vec<_>>();
        out.sort_by(|a, b| compare_values(a, b));
        out
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
