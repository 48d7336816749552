//! Freight solver: the $/mt rate that yields a target TCE.
use serde::{Deserialize, Serialize};

use crate::itinerary::VoyageEconomics;
use crate::model::{FreightType, Voyage};
use crate::numbers::or_zero;

/// Inputs to the inverted TCE formula.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FreightTarget {
    pub target_tce_usd_per_day: Option<f64>,
    pub voyage_days: Option<f64>,
    pub voyage_costs_total: Option<f64>,
    pub commission_pct: Option<f64>,
    pub cargo_qty_mt: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequiredFreight {
    pub required_gross: f64,
    pub required_per_mt: f64,
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Solve for the required gross freight and $/mt rate.
///
/// Returns `None` unless target TCE, voyage days and cargo quantity are all
/// non-zero. Commission at or above 100% has no solution and must be guarded
/// by the caller; see [`solve_for_voyage`].
#[must_use]
pub fn solve_required_freight(target: &FreightTarget) -> Option<RequiredFreight> {
    let tce = truthy(target.target_tce_usd_per_day)?;
    let days = truthy(target.voyage_days)?;
    let cargo = truthy(target.cargo_qty_mt)?;
    let commission = or_zero(target.commission_pct) / 100.0;

    let required_gross = (tce * days + or_zero(target.voyage_costs_total)) / (1.0 - commission);
    Some(RequiredFreight {
        required_gross,
        required_per_mt: required_gross / cargo,
    })
}

/// Solve against a computed voyage, applying the guards the bare formula leaves to callers:
/// only `per_mt` voyages, and commission strictly below 100%.
#[must_use]
pub fn solve_for_voyage(
    voyage: &Voyage,
    economics: &VoyageEconomics,
    target_tce_usd_per_day: f64,
) -> Option<RequiredFreight> {
    if voyage.revenue.freight_type != FreightType::PerMt {
        return None;
    }
    if or_zero(voyage.revenue.commission_pct) >= 100.0 {
        return None;
    }
    solve_required_freight(&FreightTarget {
        target_tce_usd_per_day: Some(target_tce_usd_per_day),
        voyage_days: Some(economics.voyage_days),
        voyage_costs_total: Some(economics.voyage_costs_total),
        commission_pct: voyage.revenue.commission_pct,
        cargo_qty_mt: voyage.revenue.cargo_qty_mt,
    })
}
