//! Canonical voyage data model consumed by the calculator.
//!
//! Every numeric input is an `Option<f64>`: `None` means the field was left
//! blank for the user to fill, which is distinct from an explicit `Some(0.0)`.
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    DEFAULT_BUNKER_PRICE_USD_PER_MT, DEFAULT_CANAL_TOLLS_USD, DEFAULT_COMMISSION_PCT,
    DEFAULT_OTHER_COSTS_USD,
};
use crate::draft::DraftNumber;

/// Role of a stop in the voyage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    Start,
    Load,
    Discharge,
    Bunker,
    Canal,
    #[default]
    Other,
    End,
}

impl PortType {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Load => "load",
            Self::Discharge => "discharge",
            Self::Bunker => "bunker",
            Self::Canal => "canal",
            Self::Other => "other",
            Self::End => "end",
        }
    }

    /// Parse a loosely formatted type tag; unknown tags yield `None`.
    #[must_use]
    pub fn from_key(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "load" => Some(Self::Load),
            "discharge" => Some(Self::Discharge),
            "bunker" => Some(Self::Bunker),
            "canal" => Some(Self::Canal),
            "other" => Some(Self::Other),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}

impl std::fmt::Display for PortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One stop in the voyage sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortCall {
    pub name: String,
    #[serde(rename = "type", default)]
    pub port_type: PortType,
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

impl PortCall {
    #[must_use]
    pub fn new(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            name: name.into(),
            port_type,
            ..Self::default()
        }
    }

    /// Trimmed, case-folded name used for comparisons and route keys.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Sea passage between two consecutive port calls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub distance_nm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub speed_kn: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cons_mt_per_day: Option<f64>,
}

impl Leg {
    /// A leg with every figure blank.
    #[must_use]
    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}

/// How freight is quoted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FreightType {
    #[default]
    PerMt,
    Lumpsum,
    /// A tag the calculator does not understand; kept so it can be reported.
    Unsupported(String),
}

impl FreightType {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::PerMt => "per_mt",
            Self::Lumpsum => "lumpsum",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for FreightType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "per_mt" => Self::PerMt,
            "lumpsum" => Self::Lumpsum,
            _ => Self::Unsupported(raw),
        }
    }
}

impl From<FreightType> for String {
    fn from(value: FreightType) -> Self {
        value.key().to_string()
    }
}

/// Revenue side of the voyage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    #[serde(default, deserialize_with = "lenient_number")]
    pub cargo_qty_mt: Option<f64>,
    #[serde(default)]
    pub freight_type: FreightType,
    #[serde(default, deserialize_with = "lenient_number")]
    pub freight_usd_per_mt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub freight_lumpsum_usd: Option<f64>,
    /// Percentage points, e.g. 2.5 for 2.5%.
    #[serde(default, deserialize_with = "lenient_number")]
    pub commission_pct: Option<f64>,
}

impl Default for Revenue {
    fn default() -> Self {
        Self {
            cargo_qty_mt: None,
            freight_type: FreightType::PerMt,
            freight_usd_per_mt: None,
            freight_lumpsum_usd: None,
            commission_pct: Some(DEFAULT_COMMISSION_PCT),
        }
    }
}

/// Voyage-level costs outside the port calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Costs {
    /// Blended fallback price used when no purchase plan is entered.
    #[serde(default, deserialize_with = "lenient_number")]
    pub bunker_price_usd_per_mt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub canal_tolls_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub other_costs_usd: Option<f64>,
}

impl Default for Costs {
    fn default() -> Self {
        Self {
            bunker_price_usd_per_mt: Some(DEFAULT_BUNKER_PRICE_USD_PER_MT),
            canal_tolls_usd: Some(DEFAULT_CANAL_TOLLS_USD),
            other_costs_usd: Some(DEFAULT_OTHER_COSTS_USD),
        }
    }
}

/// Figures the extraction step derived from the request text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedInputs {
    #[serde(default, deserialize_with = "lenient_number")]
    pub cargo_qty_mt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub load_rate_mt_per_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub discharge_rate_mt_per_day: Option<f64>,
}

/// The canonical voyage: port calls, legs rebuilt from them, revenue and costs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voyage {
    #[serde(default)]
    pub port_calls: Vec<PortCall>,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub revenue: Revenue,
    #[serde(default)]
    pub costs: Costs,
}

impl Voyage {
    /// Load a voyage from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a voyage.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn route_line(&self) -> String {
        self.port_calls
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| !name.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Trim and case-fold a port name.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Accept numbers, numeric strings, blank strings and null for an optional figure.
///
/// # Errors
///
/// Returns an error only when the value is neither a number, a string, nor null.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<DraftNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(DraftNumber::into_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_type_parses_loose_tags() {
        assert_eq!(PortType::from_key(" Load "), Some(PortType::Load));
        assert_eq!(PortType::from_key("BUNKER"), Some(PortType::Bunker));
        assert_eq!(PortType::from_key("anchorage"), None);
        assert_eq!(PortType::End.to_string(), "end");
    }

    #[test]
    fn freight_type_keeps_unknown_tags() {
        assert_eq!(FreightType::from("per_mt".to_string()), FreightType::PerMt);
        assert_eq!(FreightType::from("LUMPSUM".to_string()), FreightType::Lumpsum);
        let odd = FreightType::from("per_day".to_string());
        assert_eq!(odd, FreightType::Unsupported("per_day".to_string()));
        assert_eq!(odd.key(), "per_day");
    }

    #[test]
    fn voyage_json_accepts_blank_strings_as_unset() {
        let json = r#"{
            "portCalls": [
                {"name": "Singapore", "type": "start", "port_days": ""},
                {"name": "Vizag", "type": "discharge", "port_days": "5"}
            ],
            "legs": [{"from": "Singapore", "to": "Vizag", "distance_nm": null, "speed_kn": 12.5}],
            "revenue": {"freight_type": "lumpsum", "freight_lumpsum_usd": 900000},
            "costs": {}
        }"#;
        let voyage = Voyage::from_json(json).unwrap();
        assert_eq!(voyage.port_calls[0].port_days, None);
        assert_eq!(voyage.port_calls[1].port_days, Some(5.0));
        assert_eq!(voyage.legs[0].distance_nm, None);
        assert_eq!(voyage.legs[0].speed_kn, Some(12.5));
        assert_eq!(voyage.revenue.freight_type, FreightType::Lumpsum);
        assert_eq!(voyage.costs.bunker_price_usd_per_mt, None);
        assert_eq!(voyage.route_line(), "Singapore → Vizag");
    }

    #[test]
    fn defaults_match_house_assumptions() {
        let revenue = Revenue::default();
        assert_eq!(revenue.commission_pct, Some(2.5));
        assert_eq!(revenue.freight_type, FreightType::PerMt);
        assert_eq!(Costs::default().bunker_price_usd_per_mt, Some(650.0));
    }
}
