//! Itinerary calculator: time, fuel, cost, revenue and TCE from a canonical voyage.
//!
//! Nothing here is estimated. A leg without a distance makes the whole voyage
//! "not yet computable", which is reported as [`CalcOutcome::MissingDistance`]
//! rather than as an error.
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::constants::HOURS_PER_DAY;
use crate::model::{FreightType, Voyage};
use crate::numbers::{or_zero, positive, round_dp};

/// Caller-fixable configuration problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItineraryError {
    #[error("Add at least 2 port calls (start + destination).")]
    TooFewPortCalls,
    #[error("Add at least 1 leg (between ports).")]
    NoLegs,
    #[error("Leg {leg}: speed must be > 0.")]
    NonPositiveSpeed { leg: usize },
    #[error("Total voyage days is 0 or negative. Check inputs.")]
    NonPositiveVoyageDays,
    #[error("Cargo qty must be > 0 for $/mt freight.")]
    MissingCargoQty,
    #[error("Select freight type ($/mt or lumpsum); got \"{0}\".")]
    UnsupportedFreightType(String),
}

/// Which figure the bunker cost was taken from. Never a blend of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BunkerCostMethod {
    PurchasePlan,
    BlendedPrice,
}

/// Aggregates of a computable voyage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageEconomics {
    pub sea_days_total: f64,
    pub port_days_total: f64,
    pub waiting_days_total: f64,
    pub voyage_days: f64,

    pub bunkers_sea_total: f64,
    pub bunkers_port_total: f64,
    pub bunkers_total: f64,

    pub bunkers_purchased_total: f64,
    pub bunker_cost: f64,
    pub bunker_cost_method: BunkerCostMethod,

    pub port_cost_total: f64,
    pub canal_tolls_usd: f64,
    pub other_costs_usd: f64,
    pub voyage_costs_total: f64,

    pub gross_freight: f64,
    pub commission: f64,
    pub net_revenue: f64,
    pub voyage_profit: f64,
    pub tce_usd_per_day: f64,

    /// Informational purchase-vs-requirement note; only set with a purchase plan.
    pub bunker_warning: Option<String>,
}

/// Legs that still need a distance before the voyage can be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDistance {
    pub message: String,
    /// 1-based leg positions.
    #[serde(rename = "missingDistanceLegs")]
    pub legs: Vec<usize>,
}

impl MissingDistance {
    fn new(legs: Vec<usize>) -> Self {
        let list = legs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            message: format!(
                "Add distance (nm) for leg(s): {list}. Distances stay blank until looked up or entered."
            ),
            legs,
        }
    }
}

/// Result of running the calculator.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcOutcome {
    Computed(VoyageEconomics),
    MissingDistance(MissingDistance),
    Invalid(ItineraryError),
}

impl CalcOutcome {
    #[must_use]
    pub const fn economics(&self) -> Option<&VoyageEconomics> {
        match self {
            Self::Computed(economics) => Some(economics),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    #[must_use]
    pub fn tce_usd_per_day(&self) -> Option<f64> {
        self.economics().map(|e| e.tce_usd_per_day)
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum OutcomeWire<'a> {
    Status(StatusWire<'a>),
    Error { error: String },
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum StatusWire<'a> {
    Ok(&'a VoyageEconomics),
    MissingDistance(&'a MissingDistance),
}

impl Serialize for CalcOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = match self {
            Self::Computed(economics) => OutcomeWire::Status(StatusWire::Ok(economics)),
            Self::MissingDistance(missing) => {
                OutcomeWire::Status(StatusWire::MissingDistance(missing))
            }
            Self::Invalid(err) => OutcomeWire::Error {
                error: err.to_string(),
            },
        };
        wire.serialize(serializer)
    }
}

/// Run the calculator. Validation short-circuits on the first failing check.
#[must_use]
pub fn calc_itinerary(voyage: &Voyage) -> CalcOutcome {
    let outcome = match compute(voyage) {
        Ok(Ok(economics)) => CalcOutcome::Computed(economics),
        Ok(Err(missing)) => CalcOutcome::MissingDistance(missing),
        Err(err) => CalcOutcome::Invalid(err),
    };
    match &outcome {
        CalcOutcome::Computed(e) => log::debug!(
            "voyage computed: {:.3} days, TCE {:.2} USD/day",
            e.voyage_days,
            e.tce_usd_per_day
        ),
        CalcOutcome::MissingDistance(m) => log::debug!("voyage missing distances: {:?}", m.legs),
        CalcOutcome::Invalid(err) => log::debug!("voyage invalid: {err}"),
    }
    outcome
}

fn compute(voyage: &Voyage) -> Result<Result<VoyageEconomics, MissingDistance>, ItineraryError> {
    let Voyage {
        port_calls,
        legs,
        revenue,
        costs,
    } = voyage;

    if port_calls.len() < 2 {
        return Err(ItineraryError::TooFewPortCalls);
    }
    if legs.is_empty() {
        return Err(ItineraryError::NoLegs);
    }

    let missing: Vec<usize> = legs
        .iter()
        .enumerate()
        .filter(|(_, leg)| positive(leg.distance_nm).is_none())
        .map(|(idx, _)| idx + 1)
        .collect();
    if !missing.is_empty() {
        return Ok(Err(MissingDistance::new(missing)));
    }

    let mut sea_days_total = 0.0;
    let mut bunkers_sea_total = 0.0;
    for (idx, leg) in legs.iter().enumerate() {
        let speed = or_zero(leg.speed_kn);
        if speed <= 0.0 {
            return Err(ItineraryError::NonPositiveSpeed { leg: idx + 1 });
        }
        let sea_days = or_zero(leg.distance_nm) / (speed * HOURS_PER_DAY);
        sea_days_total += sea_days;
        bunkers_sea_total += sea_days * or_zero(leg.cons_mt_per_day);
    }

    let mut port_days_total = 0.0;
    let mut waiting_days_total = 0.0;
    let mut bunkers_port_total = 0.0;
    let mut port_cost_total = 0.0;
    let mut bunkers_purchased_total = 0.0;
    let mut bunker_cost_from_purchases = 0.0;
    for call in port_calls {
        let port_days = or_zero(call.port_days);
        let waiting_days = or_zero(call.waiting_days);
        port_days_total += port_days;
        waiting_days_total += waiting_days;
        bunkers_port_total += (port_days + waiting_days) * or_zero(call.port_cons_mt_per_day);
        port_cost_total += or_zero(call.port_cost_usd);

        let qty = or_zero(call.bunker_purchase_qty_mt);
        if qty > 0.0 {
            bunkers_purchased_total += qty;
            bunker_cost_from_purchases += qty * or_zero(call.bunker_purchase_price_usd_per_mt);
        }
    }

    let voyage_days = sea_days_total + port_days_total + waiting_days_total;
    if voyage_days <= 0.0 {
        return Err(ItineraryError::NonPositiveVoyageDays);
    }
    let bunkers_total = bunkers_sea_total + bunkers_port_total;

    let (bunker_cost, bunker_cost_method) = if bunkers_purchased_total > 0.0 {
        (bunker_cost_from_purchases, BunkerCostMethod::PurchasePlan)
    } else {
        (
            bunkers_total * or_zero(costs.bunker_price_usd_per_mt),
            BunkerCostMethod::BlendedPrice,
        )
    };

    let canal_tolls_usd = or_zero(costs.canal_tolls_usd);
    let other_costs_usd = or_zero(costs.other_costs_usd);
    let voyage_costs_total = bunker_cost + port_cost_total + canal_tolls_usd + other_costs_usd;

    let gross_freight = match &revenue.freight_type {
        FreightType::PerMt => {
            let cargo_qty = or_zero(revenue.cargo_qty_mt);
            if cargo_qty <= 0.0 {
                return Err(ItineraryError::MissingCargoQty);
            }
            cargo_qty * or_zero(revenue.freight_usd_per_mt)
        }
        FreightType::Lumpsum => or_zero(revenue.freight_lumpsum_usd),
        FreightType::Unsupported(raw) => {
            return Err(ItineraryError::UnsupportedFreightType(raw.clone()));
        }
    };

    let commission = gross_freight * (or_zero(revenue.commission_pct) / 100.0);
    let net_revenue = gross_freight - commission;
    let voyage_profit = net_revenue - voyage_costs_total;
    let tce_usd_per_day = voyage_profit / voyage_days;

    let bunker_warning = (bunkers_purchased_total > 0.0)
        .then(|| bunker_balance_note(bunkers_purchased_total - bunkers_total));

    Ok(Ok(VoyageEconomics {
        sea_days_total,
        port_days_total,
        waiting_days_total,
        voyage_days,
        bunkers_sea_total,
        bunkers_port_total,
        bunkers_total,
        bunkers_purchased_total,
        bunker_cost,
        bunker_cost_method,
        port_cost_total,
        canal_tolls_usd,
        other_costs_usd,
        voyage_costs_total,
        gross_freight,
        commission,
        net_revenue,
        voyage_profit,
        tce_usd_per_day,
        bunker_warning,
    }))
}

fn bunker_balance_note(diff: f64) -> String {
    let amount = round_dp(diff.abs(), 1).unwrap_or(0.0);
    if diff >= 0.0 {
        format!("Bunkers purchased exceed requirement by ~{amount} mt (OK if ROB build-up).")
    } else {
        format!("Bunkers purchased are short by ~{amount} mt (check ROB / add bunker stop).")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Costs, Leg, PortCall, PortType, Revenue};

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn leg(from: &str, to: &str, distance: Option<f64>, speed: f64, cons: f64) -> Leg {
        Leg {
            from: from.to_string(),
            to: to.to_string(),
            distance_nm: distance,
            speed_kn: Some(speed),
            cons_mt_per_day: Some(cons),
        }
    }

    fn palembang_vizag() -> Voyage {
        let mut load = PortCall::new("Palembang", PortType::Load);
        load.port_days = Some(4.0);
        let mut discharge = PortCall::new("Vizag", PortType::Discharge);
        discharge.port_days = Some(5.0);
        Voyage {
            port_calls: vec![PortCall::new("Singapore", PortType::Start), load, discharge],
            legs: vec![
                leg("Singapore", "Palembang", Some(450.0), 13.0, 26.0),
                leg("Palembang", "Vizag", Some(2500.0), 12.5, 28.0),
            ],
            revenue: Revenue {
                cargo_qty_mt: Some(55_000.0),
                freight_usd_per_mt: Some(35.0),
                ..Revenue::default()
            },
            costs: Costs::default(),
        }
    }

    #[test]
    fn reference_voyage_economics() {
        let outcome = calc_itinerary(&palembang_vizag());
        let e = outcome.economics().expect("computed");
        assert!(approx(e.sea_days_total, 9.7756, 1e-3));
        assert!(approx(e.port_days_total, 9.0, 1e-9));
        assert!(approx(e.voyage_days, 18.7756, 1e-3));
        assert!(approx(e.bunkers_total, 270.83, 0.01));
        assert_eq!(e.bunker_cost_method, BunkerCostMethod::BlendedPrice);
        assert!(approx(e.bunker_cost, 176_041.67, 0.01));
        assert!(approx(e.gross_freight, 1_925_000.0, 1e-6));
        assert!(approx(e.commission, 48_125.0, 1e-6));
        assert!(approx(e.net_revenue, 1_876_875.0, 1e-6));
        assert!(approx(e.tce_usd_per_day, 90_600.0, 100.0));
        assert!(e.bunker_warning.is_none());
    }

    #[test]
    fn totals_are_internally_consistent() {
        let e = calc_itinerary(&palembang_vizag()).economics().cloned().unwrap();
        assert!(approx(
            e.voyage_days,
            e.sea_days_total + e.port_days_total + e.waiting_days_total,
            1e-12
        ));
        assert!(approx(
            e.tce_usd_per_day,
            (e.net_revenue - e.voyage_costs_total) / e.voyage_days,
            1e-9
        ));
    }

    #[test]
    fn zero_distance_reports_missing_leg() {
        let voyage = Voyage {
            port_calls: vec![
                PortCall::new("Singapore", PortType::Start),
                PortCall::new("Vizag", PortType::Discharge),
            ],
            legs: vec![leg("Singapore", "Vizag", Some(0.0), 12.0, 25.0)],
            ..Voyage::default()
        };
        match calc_itinerary(&voyage) {
            CalcOutcome::MissingDistance(missing) => assert_eq!(missing.legs, vec![1]),
            other => panic!("expected missing distance, got {other:?}"),
        }
    }

    #[test]
    fn missing_distance_wins_over_bad_speed() {
        let mut voyage = palembang_vizag();
        voyage.legs[0].speed_kn = Some(0.0);
        voyage.legs[1].distance_nm = None;
        match calc_itinerary(&voyage) {
            CalcOutcome::MissingDistance(missing) => {
                assert_eq!(missing.legs, vec![2]);
                assert!(missing.message.contains("leg(s): 2"));
            }
            other => panic!("expected missing distance, got {other:?}"),
        }
    }

    #[test]
    fn validation_errors_follow_check_order() {
        let mut voyage = palembang_vizag();
        voyage.port_calls.truncate(1);
        assert_eq!(
            calc_itinerary(&voyage),
            CalcOutcome::Invalid(ItineraryError::TooFewPortCalls)
        );

        let mut voyage = palembang_vizag();
        voyage.legs.clear();
        assert_eq!(calc_itinerary(&voyage), CalcOutcome::Invalid(ItineraryError::NoLegs));

        let mut voyage = palembang_vizag();
        voyage.legs[1].speed_kn = None;
        assert_eq!(
            calc_itinerary(&voyage),
            CalcOutcome::Invalid(ItineraryError::NonPositiveSpeed { leg: 2 })
        );

        let mut voyage = palembang_vizag();
        voyage.revenue.cargo_qty_mt = None;
        assert_eq!(
            calc_itinerary(&voyage),
            CalcOutcome::Invalid(ItineraryError::MissingCargoQty)
        );

        let mut voyage = palembang_vizag();
        voyage.revenue.freight_type = FreightType::Unsupported("per_day".to_string());
        assert!(matches!(
            calc_itinerary(&voyage),
            CalcOutcome::Invalid(ItineraryError::UnsupportedFreightType(_))
        ));
    }

    #[test]
    fn negative_port_time_can_zero_out_voyage_days() {
        let mut voyage = palembang_vizag();
        voyage.port_calls[1].port_days = Some(-30.0);
        assert_eq!(
            calc_itinerary(&voyage),
            CalcOutcome::Invalid(ItineraryError::NonPositiveVoyageDays)
        );
    }

    #[test]
    fn lumpsum_ignores_cargo_quantity() {
        let mut voyage = palembang_vizag();
        voyage.revenue.freight_type = FreightType::Lumpsum;
        voyage.revenue.cargo_qty_mt = None;
        voyage.revenue.freight_lumpsum_usd = Some(1_000_000.0);
        let e = calc_itinerary(&voyage).economics().cloned().unwrap();
        assert!(approx(e.gross_freight, 1_000_000.0, 1e-9));
        assert!(approx(e.commission, 25_000.0, 1e-9));
    }

    #[test]
    fn purchase_plan_replaces_blended_price_entirely() {
        let mut voyage = palembang_vizag();
        voyage.port_calls[0].bunker_purchase_qty_mt = Some(300.0);
        voyage.port_calls[0].bunker_purchase_price_usd_per_mt = Some(600.0);
        let e = calc_itinerary(&voyage).economics().cloned().unwrap();
        assert_eq!(e.bunker_cost_method, BunkerCostMethod::PurchasePlan);
        assert!(approx(e.bunker_cost, 180_000.0, 1e-9));
        assert!(approx(e.bunkers_purchased_total, 300.0, 1e-9));
        let note = e.bunker_warning.unwrap();
        assert!(note.starts_with("Bunkers purchased exceed requirement by ~29.2 mt"));

        voyage.port_calls[0].bunker_purchase_qty_mt = Some(200.0);
        let e = calc_itinerary(&voyage).economics().cloned().unwrap();
        assert!(e.bunker_warning.unwrap().contains("short by ~70.8 mt"));
    }

    #[test]
    fn outcome_serializes_to_wire_shapes() {
        let ok = serde_json::to_value(calc_itinerary(&palembang_vizag())).unwrap();
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["bunker_cost_method"], "blended_price");
        assert!(ok["bunker_warning"].is_null());
        assert!(ok.get("tce_usd_per_day").is_some());

        let mut voyage = palembang_vizag();
        voyage.legs[0].distance_nm = None;
        let missing = serde_json::to_value(calc_itinerary(&voyage)).unwrap();
        assert_eq!(missing["status"], "missing_distance");
        assert_eq!(missing["missingDistanceLegs"], serde_json::json!([1]));

        voyage.legs.clear();
        let err = serde_json::to_value(calc_itinerary(&voyage)).unwrap();
        assert_eq!(err.as_object().unwrap().len(), 1);
        assert_eq!(err["error"], "Add at least 1 leg (between ports).");
    }
}
