//! Draft normalization into the canonical voyage model.
use thiserror::Error;

use crate::config::PlannerConfig;
use crate::draft::{DraftCosts, DraftPortCall, DraftRevenue, DraftVoyage};
use crate::model::{Costs, FreightType, Leg, PortCall, PortType, Revenue, Voyage};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("draft has {found} usable port call(s); at least 2 are needed (mention load and discharge)")]
    InsufficientPorts { found: usize },
}

/// Convert draft port calls: drop blank names, trim the rest, assign definite types.
#[must_use]
pub fn normalize_port_calls(draft: &DraftVoyage) -> Vec<PortCall> {
    draft
        .port_call_entries()
        .filter(|call| call.name.as_deref().is_some_and(|n| !n.trim().is_empty()))
        .enumerate()
        .map(|(idx, call)| normalize_port_call(idx, call))
        .collect()
}

fn normalize_port_call(idx: usize, call: &DraftPortCall) -> PortCall {
    let fallback = if idx == 0 {
        PortType::Start
    } else {
        PortType::Other
    };
    let port_type = call
        .port_type
        .as_deref()
        .filter(|tag| !tag.trim().is_empty())
        .map_or(fallback, |tag| {
            PortType::from_key(tag).unwrap_or(PortType::Other)
        });

    PortCall {
        name: call.name.as_deref().unwrap_or_default().trim().to_string(),
        port_type,
        port_days: call.port_days,
        waiting_days: call.waiting_days,
        port_cons_mt_per_day: call.port_cons_mt_per_day,
        port_cost_usd: call.port_cost_usd,
        bunker_purchase_qty_mt: call.bunker_purchase_qty_mt,
        bunker_purchase_price_usd_per_mt: call.bunker_purchase_price_usd_per_mt,
    }
}

/// Pair each port call with its successor. Distances are always blank;
/// speed and consumption come from the draft leg in the same position, if any.
#[must_use]
pub fn rebuild_legs(port_calls: &[PortCall], draft: &DraftVoyage) -> Vec<Leg> {
    port_calls
        .windows(2)
        .enumerate()
        .map(|(idx, pair)| {
            let hint = draft.leg_hint(idx);
            Leg {
                from: pair[0].name.clone(),
                to: pair[1].name.clone(),
                distance_nm: None,
                speed_kn: hint.and_then(|h| h.speed_kn),
                cons_mt_per_day: hint.and_then(|h| h.cons_mt_per_day),
            }
        })
        .collect()
}

#[must_use]
pub fn normalize_revenue(revenue: Option<&DraftRevenue>, cfg: &PlannerConfig) -> Revenue {
    let r = revenue.cloned().unwrap_or_default();
    let freight_type = r
        .freight_type
        .filter(|tag| !tag.trim().is_empty())
        .map_or(FreightType::PerMt, FreightType::from);
    Revenue {
        cargo_qty_mt: r.cargo_qty_mt,
        freight_type,
        freight_usd_per_mt: r.freight_usd_per_mt,
        freight_lumpsum_usd: r.freight_lumpsum_usd,
        commission_pct: Some(r.commission_pct.unwrap_or(cfg.default_commission_pct)),
    }
}

#[must_use]
pub fn normalize_costs(costs: Option<&DraftCosts>, cfg: &PlannerConfig) -> Costs {
    let c = costs.cloned().unwrap_or_default();
    Costs {
        bunker_price_usd_per_mt: Some(
            c.bunker_price_usd_per_mt
                .unwrap_or(cfg.default_bunker_price_usd_per_mt),
        ),
        canal_tolls_usd: Some(c.canal_tolls_usd.unwrap_or(0.0)),
        other_costs_usd: Some(c.other_costs_usd.unwrap_or(0.0)),
    }
}

/// Assemble a canonical voyage from already-normalized port calls.
///
/// # Errors
///
/// Returns an error if fewer than two port calls are given.
pub fn assemble_voyage(
    port_calls: Vec<PortCall>,
    draft: &DraftVoyage,
    cfg: &PlannerConfig,
) -> Result<Voyage, NormalizeError> {
    if port_calls.len() < 2 {
        return Err(NormalizeError::InsufficientPorts {
            found: port_calls.len(),
        });
    }
    let legs = rebuild_legs(&port_calls, draft);
    Ok(Voyage {
        port_calls,
        legs,
        revenue: normalize_revenue(draft.revenue.as_ref(), cfg),
        costs: normalize_costs(draft.costs.as_ref(), cfg),
    })
}

/// Normalize a draft into a canonical voyage without bunker reconciliation.
///
/// # Errors
///
/// Returns an error if the draft yields fewer than two named port calls.
pub fn normalize_draft(draft: &DraftVoyage, cfg: &PlannerConfig) -> Result<Voyage, NormalizeError> {
    assemble_voyage(normalize_port_calls(draft), draft, cfg)
}
