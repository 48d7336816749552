//! Plain-text owner TCE estimate and shareable voyage snapshots.

use serde::{Deserialize, Serialize};

use crate::config::TradeMode;
use crate::itinerary::VoyageEconomics;
use crate::model::{FreightType, Voyage};
use crate::numbers::{or_zero, round_dp, usize_to_f64};
use crate::vessel::{VesselCatalog, VesselClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoyageMode {
    #[default]
    Oneway,
    Round,
}

/// Everything needed to restore a voyage estimate elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoyageSnapshot {
    #[serde(default = "VoyageSnapshot::default_name")]
    pub name: String,
    #[serde(default)]
    pub trade_mode: TradeMode,
    #[serde(default)]
    pub voyage_mode: VoyageMode,
    #[serde(default)]
    pub round_return_port: String,
    #[serde(default)]
    pub prefer_saved_distances: bool,
    #[serde(default)]
    pub vessel_class: VesselClass,
    #[serde(flatten)]
    pub voyage: Voyage,
    #[serde(default)]
    pub target_tce: Option<f64>,
}

impl VoyageSnapshot {
    fn default_name() -> String {
        "Voyage".to_string()
    }

    #[must_use]
    pub fn new(name: impl Into<String>, voyage: Voyage) -> Self {
        Self {
            name: name.into(),
            trade_mode: TradeMode::default(),
            voyage_mode: VoyageMode::default(),
            round_return_port: String::new(),
            prefer_saved_distances: false,
            vessel_class: VesselClass::Unknown,
            voyage,
            target_tce: None,
        }
    }

    /// Export as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn fmt_round(value: f64, dp: u8) -> String {
    round_dp(value, dp).map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

fn leg_average(voyage: &Voyage, pick: impl Fn(&crate::model::Leg) -> Option<f64>) -> String {
    if voyage.legs.is_empty() {
        return "-".to_string();
    }
    let total: f64 = voyage.legs.iter().map(|leg| or_zero(pick(leg))).sum();
    fmt_round(total / usize_to_f64(voyage.legs.len()), 2)
}

/// Owner TCE estimate as copy-pasteable text.
#[must_use]
pub fn voyage_summary(
    voyage: &Voyage,
    economics: &VoyageEconomics,
    trade_mode: TradeMode,
    voyage_mode: VoyageMode,
    vessel_class: VesselClass,
) -> String {
    let revenue = &voyage.revenue;
    let freight = match revenue.freight_type {
        FreightType::Lumpsum => format!("{} USD lumpsum", fmt_opt(revenue.freight_lumpsum_usd)),
        _ => format!("{} USD/mt", fmt_opt(revenue.freight_usd_per_mt)),
    };
    let vessel_note = match vessel_class {
        VesselClass::Unknown => "Vessel profile: (none)".to_string(),
        class => VesselCatalog::global()
            .profile(class)
            .map_or_else(
                || "Vessel profile: (none)".to_string(),
                |p| format!("Vessel profile: {}", p.label),
            ),
    };
    let trade = match trade_mode {
        TradeMode::Dry => "DRY",
        TradeMode::Tanker => "TANKER",
    };
    let mode = match voyage_mode {
        VoyageMode::Oneway => "ONE-WAY",
        VoyageMode::Round => "ROUND",
    };

    format!(
        "VOYAGE ESTIMATE (Owner TCE)\n\
         \n\
         Mode: {trade} | {mode}\n\
         Ports: {route}\n\
         \n\
         Cargo: {cargo} mt\n\
         Freight: {freight}\n\
         Commission: {commission} %\n\
         \n\
         Time:\n\
         - Sea days: {sea_days}\n\
         - Port days: {port_days}\n\
         - Waiting days: {waiting_days}\n\
         - Total voyage days: {voyage_days}\n\
         \n\
         Bunkers:\n\
         - Total required (mt): {bunkers_total}\n\
         - Purchased (mt): {bunkers_purchased}\n\
         - Bunker cost (USD): {bunker_cost}\n\
         \n\
         Money:\n\
         - Net revenue (USD): {net_revenue}\n\
         - Total voyage costs (USD): {voyage_costs}\n\
         - Voyage profit (USD): {voyage_profit}\n\
         \n\
         OWNER TCE: {tce} USD/day\n\
         \n\
         Key assumptions:\n\
         - {vessel_note}\n\
         - Avg speed: {avg_speed} kn\n\
         - Avg sea cons: {avg_cons} mt/day\n\
         - Blended bunker price (fallback): {bunker_price} USD/mt\n",
        route = voyage.route_line(),
        cargo = fmt_opt(revenue.cargo_qty_mt),
        commission = fmt_opt(revenue.commission_pct),
        sea_days = fmt_round(economics.sea_days_total, 2),
        port_days = fmt_round(economics.port_days_total, 2),
        waiting_days = fmt_round(economics.waiting_days_total, 2),
        voyage_days = fmt_round(economics.voyage_days, 2),
        bunkers_total = fmt_round(economics.bunkers_total, 1),
        bunkers_purchased = fmt_round(economics.bunkers_purchased_total, 1),
        bunker_cost = fmt_round(economics.bunker_cost, 0),
        net_revenue = fmt_round(economics.net_revenue, 0),
        voyage_costs = fmt_round(economics.voyage_costs_total, 0),
        voyage_profit = fmt_round(economics.voyage_profit, 0),
        tce = fmt_round(economics.tce_usd_per_day, 0),
        avg_speed = leg_average(voyage, |l| l.speed_kn),
        avg_cons = leg_average(voyage, |l| l.cons_mt_per_day),
        bunker_price = fmt_opt(voyage.costs.bunker_price_usd_per_mt),
    )
}
