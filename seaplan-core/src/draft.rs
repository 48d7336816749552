//! Unchecked draft shape returned by the text-extraction step.
//!
//! Every field is optional and numbers may arrive as numbers, numeric strings,
//! blank strings or null. Nothing in here is trusted until the normalizer has
//! turned it into a [`crate::Voyage`].
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DerivedInputs, lenient_number};
use crate::numbers::parse_number;

/// A loosely typed number as produced by the extraction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftNumber {
    Number(f64),
    Text(String),
    /// Booleans, arrays or objects. Kept so one stray field does not sink the draft.
    Other(serde_json::Value),
}

impl DraftNumber {
    /// Resolve to a finite number; blank or unparseable text is unset.
    #[must_use]
    pub fn into_value(self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(v),
            Self::Number(_) => None,
            Self::Text(text) => parse_number(&text),
            Self::Other(_) => None,
        }
    }
}

/// Errors raised when extraction output cannot be used as a draft.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("extraction output is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("extraction output is not a JSON object")]
    NotAnObject,
    #[error("extraction output has an unexpected shape: {0}")]
    InvalidShape(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftPortCall {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub port_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub port_days: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub waiting_days: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub port_cons_mt_per_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub port_cost_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bunker_purchase_qty_mt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bunker_purchase_price_usd_per_mt: Option<f64>,
}

/// Leg hint from the draft. Any distance it carries is never read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftLeg {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub speed_kn: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cons_mt_per_day: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftRevenue {
    #[serde(default, deserialize_with = "lenient_number")]
    pub cargo_qty_mt: Option<f64>,
    #[serde(default)]
    pub freight_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub freight_usd_per_mt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub freight_lumpsum_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub commission_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftCosts {
    #[serde(default, deserialize_with = "lenient_number")]
    pub bunker_price_usd_per_mt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub canal_tolls_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub other_costs_usd: Option<f64>,
}

/// Partial voyage as returned by the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftVoyage {
    #[serde(default, alias = "vessel_class")]
    pub vessel_class: Option<String>,
    #[serde(default)]
    pub derived: Option<DerivedInputs>,
    #[serde(default)]
    pub port_calls: Option<Vec<Option<DraftPortCall>>>,
    #[serde(default)]
    pub legs: Option<Vec<Option<DraftLeg>>>,
    #[serde(default)]
    pub revenue: Option<DraftRevenue>,
    #[serde(default)]
    pub costs: Option<DraftCosts>,
}

impl DraftVoyage {
    /// Parse raw extraction output.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON, not an object, or an object
    /// whose fields have the wrong types.
    pub fn from_json(raw: &str) -> Result<Self, DraftError> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(DraftError::InvalidJson)?;
        if !value.is_object() {
            return Err(DraftError::NotAnObject);
        }
        serde_json::from_value(value).map_err(DraftError::InvalidShape)
    }

    /// Port calls that are present (null entries dropped), in draft order.
    pub fn port_call_entries(&self) -> impl Iterator<Item = &DraftPortCall> {
        self.port_calls.iter().flatten().flatten()
    }

    /// Leg hint at a position, if the draft supplied one there.
    #[must_use]
    pub fn leg_hint(&self, index: usize) -> Option<&DraftLeg> {
        self.legs
            .as_ref()
            .and_then(|legs| legs.get(index))
            .and_then(Option::as_ref)
    }

    /// Lower-cased vessel class tag, `unknown` when absent or blank.
    #[must_use]
    pub fn vessel_class_tag(&self) -> String {
        self.vessel_class
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map_or_else(
                || crate::constants::UNKNOWN_VESSEL_CLASS.to_string(),
                str::to_lowercase,
            )
    }
}
