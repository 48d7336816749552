//! Bunker reconciliation: folds duplicate bunkering stops into the port call
//! they repeat, and pulls a trailing bunker stop forward when the request text
//! says the stem was meant to happen before sailing or en route.
use std::collections::HashMap;

use crate::config::PlannerConfig;
use crate::constants::{RELOCATION_CUES, RELOCATION_TAIL_WINDOW};
use crate::model::{PortCall, PortType, normalize_name};

/// Decides from the request text whether a bunker stop belongs early in the voyage.
pub trait RelocationPolicy {
    fn wants_early_bunkering(&self, request_text: &str) -> bool;
}

/// Case-insensitive substring match against a fixed list of phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCuePolicy {
    cues: Vec<String>,
}

impl TextCuePolicy {
    #[must_use]
    pub fn new<I, S>(cues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cues: cues
                .into_iter()
                .map(|cue| cue.as_ref().to_lowercase())
                .filter(|cue| !cue.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &PlannerConfig) -> Self {
        Self::new(&cfg.relocation_cues)
    }
}

impl Default for TextCuePolicy {
    fn default() -> Self {
        Self::new(RELOCATION_CUES)
    }
}

impl RelocationPolicy for TextCuePolicy {
    fn wants_early_bunkering(&self, request_text: &str) -> bool {
        let text = request_text.to_lowercase();
        self.cues.iter().any(|cue| text.contains(cue.as_str()))
    }
}

/// Reconcile bunker calls using the default text cues.
#[must_use]
pub fn reconcile_bunkers(calls: Vec<PortCall>, request_text: &str) -> Vec<PortCall> {
    reconcile_bunkers_with(calls, request_text, &TextCuePolicy::default())
}

/// Merge duplicate bunker calls, then relocate a trailing bunker call if the policy asks for it.
#[must_use]
pub fn reconcile_bunkers_with<P>(
    calls: Vec<PortCall>,
    request_text: &str,
    policy: &P,
) -> Vec<PortCall>
where
    P: RelocationPolicy + ?Sized,
{
    let mut cleaned = merge_duplicate_bunkers(calls);

    let Some(bunker_idx) = cleaned
        .iter()
        .position(|call| call.port_type == PortType::Bunker)
    else {
        return cleaned;
    };

    if cleaned[bunker_idx].name.trim().is_empty() {
        return cleaned;
    }
    let near_end = bunker_idx + RELOCATION_TAIL_WINDOW >= cleaned.len();
    if near_end && policy.wants_early_bunkering(request_text) {
        let bunker_call = cleaned.remove(bunker_idx);
        let insert_at = relocation_index(&cleaned);
        log::debug!(
            "relocating bunker call {} from position {bunker_idx} to {insert_at}",
            bunker_call.name
        );
        cleaned.insert(insert_at, bunker_call);
    }
    cleaned
}

fn merge_duplicate_bunkers(mut calls: Vec<PortCall>) -> Vec<PortCall> {
    let mut first_index: HashMap<String, usize> = HashMap::new();
    for (idx, call) in calls.iter().enumerate() {
        let name = call.normalized_name();
        if name.is_empty() {
            continue;
        }
        first_index.entry(name).or_insert(idx);
    }

    let mut remove = vec![false; calls.len()];
    for idx in 0..calls.len() {
        if calls[idx].port_type != PortType::Bunker {
            continue;
        }
        let name = normalize_name(&calls[idx].name);
        if name.is_empty() {
            continue;
        }
        let Some(&target_idx) = first_index.get(&name) else {
            continue;
        };
        if target_idx == idx {
            continue;
        }

        let qty = calls[idx].bunker_purchase_qty_mt;
        let price = calls[idx].bunker_purchase_price_usd_per_mt;
        let target = &mut calls[target_idx];
        if target.bunker_purchase_qty_mt.is_none() {
            target.bunker_purchase_qty_mt = qty;
        }
        if target.bunker_purchase_price_usd_per_mt.is_none() {
            target.bunker_purchase_price_usd_per_mt = price;
        }
        log::debug!("merged bunker call {idx} into port call {target_idx} ({name})");
        remove[idx] = true;
    }

    calls
        .into_iter()
        .zip(remove)
        .filter_map(|(call, drop)| (!drop).then_some(call))
        .collect()
}

/// After the last load when it precedes a discharge, else before the first
/// discharge, else straight after the start call.
fn relocation_index(calls: &[PortCall]) -> usize {
    let last_load = calls
        .iter()
        .rposition(|call| call.port_type == PortType::Load);
    let first_discharge = calls
        .iter()
        .position(|call| call.port_type == PortType::Discharge);

    match (last_load, first_discharge) {
        (Some(load), Some(discharge)) if discharge > load => load + 1,
        (_, Some(discharge)) if discharge > 0 => discharge,
        _ => calls.len().min(1),
    }
}
