//! Vessel classes and their starter speed/consumption defaults.
use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::model::Voyage;
use crate::numbers::is_blank_or_non_positive;

const DEFAULT_VESSEL_DATA: &str = include_str!("../assets/vessel_profiles.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VesselClass {
    Handysize,
    Handymax,
    Supramax,
    Ultramax,
    Panamax,
    Kamsarmax,
    Capesize,
    Mr,
    Lr1,
    Lr2,
    Aframax,
    Suezmax,
    Vlcc,
    #[default]
    Unknown,
}

impl VesselClass {
    /// Parse a class tag; anything unrecognized is `Unknown`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(tag.trim().to_lowercase()))
            .unwrap_or_default()
    }
}

/// Typical commercial defaults for a class. Users override freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselProfile {
    pub label: String,
    pub laden_speed_kn: f64,
    pub ballast_speed_kn: f64,
    pub laden_cons_mt_per_day: f64,
    pub ballast_cons_mt_per_day: f64,
    pub port_cons_mt_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct KeywordRule {
    class: VesselClass,
    keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VesselCatalog {
    #[serde(default)]
    profiles: HashMap<VesselClass, VesselProfile>,
    #[serde(default)]
    keywords: Vec<KeywordRule>,
}

impl VesselCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_VESSEL_DATA).unwrap_or_default()
    }

    /// Shared catalog parsed once from the embedded table.
    pub fn global() -> &'static Self {
        static CATALOG: OnceLock<VesselCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// First class whose keyword occurs in the text, in table order.
    #[must_use]
    pub fn detect(&self, text: &str) -> VesselClass {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| text.contains(kw.as_str())))
            .map_or(VesselClass::Unknown, |rule| rule.class)
    }

    /// Profile for a class, falling back to the `unknown` row.
    #[must_use]
    pub fn profile(&self, class: VesselClass) -> Option<&VesselProfile> {
        self.profiles
            .get(&class)
            .or_else(|| self.profiles.get(&VesselClass::Unknown))
    }
}

#[must_use]
pub fn detect_vessel_class(text: &str) -> VesselClass {
    VesselCatalog::global().detect(text)
}

/// Fill blank or non-positive leg speed/consumption and port consumption from
/// the class's laden figures. Returns the applied profile label, if any.
pub fn apply_vessel_profile(voyage: &mut Voyage, class: VesselClass) -> Option<String> {
    if class == VesselClass::Unknown {
        return None;
    }
    let profile = VesselCatalog::global().profile(class)?;
    for leg in &mut voyage.legs {
        if is_blank_or_non_positive(leg.speed_kn) {
            leg.speed_kn = Some(profile.laden_speed_kn);
        }
        if is_blank_or_non_positive(leg.cons_mt_per_day) {
            leg.cons_mt_per_day = Some(profile.laden_cons_mt_per_day);
        }
    }
    for call in &mut voyage.port_calls {
        if is_blank_or_non_positive(call.port_cons_mt_per_day) {
            call.port_cons_mt_per_day = Some(profile.port_cons_mt_per_day);
        }
    }
    Some(profile.label.clone())
}
