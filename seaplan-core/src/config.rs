//! Planner configuration: defaults applied to drafts, presets and sensitivity steps.
use serde::{Deserialize, Serialize};

use crate::constants;

/// Trade segment, selecting speed and consumption presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeMode {
    #[default]
    Dry,
    Tanker,
}

/// Default speed and consumption figures for a trade segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradePreset {
    pub speed_kn: f64,
    pub sea_cons_mt_per_day: f64,
    pub port_cons_mt_per_day: f64,
}

/// Step sizes for the sensitivity table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySteps {
    #[serde(default = "SensitivitySteps::default_bunker_price")]
    pub bunker_price_usd_per_mt: f64,
    #[serde(default = "SensitivitySteps::default_speed")]
    pub speed_kn: f64,
    #[serde(default = "SensitivitySteps::default_freight")]
    pub freight_usd_per_mt: f64,
    #[serde(default = "SensitivitySteps::default_speed_floor")]
    pub speed_floor_kn: f64,
}

impl SensitivitySteps {
    const fn default_bunker_price() -> f64 {
        constants::SENSITIVITY_BUNKER_STEP_USD
    }

    const fn default_speed() -> f64 {
        constants::SENSITIVITY_SPEED_STEP_KN
    }

    const fn default_freight() -> f64 {
        constants::SENSITIVITY_FREIGHT_STEP_USD
    }

    const fn default_speed_floor() -> f64 {
        constants::SENSITIVITY_SPEED_FLOOR_KN
    }
}

impl Default for SensitivitySteps {
    fn default() -> Self {
        Self {
            bunker_price_usd_per_mt: Self::default_bunker_price(),
            speed_kn: Self::default_speed(),
            freight_usd_per_mt: Self::default_freight(),
            speed_floor_kn: Self::default_speed_floor(),
        }
    }
}

/// Tunable defaults for turning drafts into voyages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "PlannerConfig::default_commission_pct")]
    pub default_commission_pct: f64,
    #[serde(default = "PlannerConfig::default_bunker_price")]
    pub default_bunker_price_usd_per_mt: f64,
    #[serde(default = "PlannerConfig::default_relocation_cues")]
    pub relocation_cues: Vec<String>,
    #[serde(default = "PlannerConfig::default_dry_preset")]
    pub dry: TradePreset,
    #[serde(default = "PlannerConfig::default_tanker_preset")]
    pub tanker: TradePreset,
    #[serde(default)]
    pub sensitivity: SensitivitySteps,
}

impl PlannerConfig {
    const fn default_commission_pct() -> f64 {
        constants::DEFAULT_COMMISSION_PCT
    }

    const fn default_bunker_price() -> f64 {
        constants::DEFAULT_BUNKER_PRICE_USD_PER_MT
    }

    fn default_relocation_cues() -> Vec<String> {
        constants::RELOCATION_CUES
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    const fn default_dry_preset() -> TradePreset {
        TradePreset {
            speed_kn: constants::DRY_SPEED_KN,
            sea_cons_mt_per_day: constants::DRY_SEA_CONS_MT_PER_DAY,
            port_cons_mt_per_day: constants::DRY_PORT_CONS_MT_PER_DAY,
        }
    }

    const fn default_tanker_preset() -> TradePreset {
        TradePreset {
            speed_kn: constants::TANKER_SPEED_KN,
            sea_cons_mt_per_day: constants::TANKER_SEA_CONS_MT_PER_DAY,
            port_cons_mt_per_day: constants::TANKER_PORT_CONS_MT_PER_DAY,
        }
    }

    /// Load a (possibly partial) configuration; missing keys use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub const fn preset(&self, mode: TradeMode) -> TradePreset {
        match mode {
            TradeMode::Dry => self.dry,
            TradeMode::Tanker => self.tanker,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_commission_pct: Self::default_commission_pct(),
            default_bunker_price_usd_per_mt: Self::default_bunker_price(),
            relocation_cues: Self::default_relocation_cues(),
            dry: Self::default_dry_preset(),
            tanker: Self::default_tanker_preset(),
            sensitivity: SensitivitySteps::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = PlannerConfig::from_json("{}").unwrap();
        assert_eq!(cfg, PlannerConfig::default());
        assert_eq!(cfg.relocation_cues.len(), 5);
    }

    #[test]
    fn partial_json_overrides_only_named_keys() {
        let cfg = PlannerConfig::from_json(
            r#"{"default_bunker_price_usd_per_mt": 580, "sensitivity": {"speed_kn": 0.5}}"#,
        )
        .unwrap();
        assert!((cfg.default_bunker_price_usd_per_mt - 580.0).abs() < f64::EPSILON);
        assert!((cfg.default_commission_pct - 2.5).abs() < f64::EPSILON);
        assert!((cfg.sensitivity.speed_kn - 0.5).abs() < f64::EPSILON);
        assert!((cfg.sensitivity.bunker_price_usd_per_mt - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn presets_follow_trade_mode() {
        let cfg = PlannerConfig::default();
        assert!((cfg.preset(TradeMode::Tanker).speed_kn - 13.5).abs() < f64::EPSILON);
        assert!((cfg.preset(TradeMode::Dry).port_cons_mt_per_day - 4.0).abs() < f64::EPSILON);
    }
}
