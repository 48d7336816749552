//! Editing helpers applied to a canonical voyage before calculation:
//! trade presets, round-voyage closure and port days from handling rates.
use crate::config::TradePreset;
use crate::constants::UNNAMED_PORT_PREFIX;
use crate::model::{DerivedInputs, Leg, PortCall, PortType, Voyage};
use crate::numbers::{is_blank_or_non_positive, positive, round_dp};

/// Rebuild legs 1:1 from port calls with blank distances and preset speed/consumption.
pub fn rebuild_legs(voyage: &mut Voyage, preset: &TradePreset) {
    let display = |idx: usize, call: &PortCall| {
        if call.name.trim().is_empty() {
            format!("{UNNAMED_PORT_PREFIX} {}", idx + 1)
        } else {
            call.name.clone()
        }
    };
    voyage.legs = voyage
        .port_calls
        .windows(2)
        .enumerate()
        .map(|(idx, pair)| Leg {
            from: display(idx, &pair[0]),
            to: display(idx + 1, &pair[1]),
            distance_nm: None,
            speed_kn: Some(preset.speed_kn),
            cons_mt_per_day: Some(preset.sea_cons_mt_per_day),
        })
        .collect();
}

/// Fill blank speed/consumption figures from a trade preset.
pub fn apply_trade_preset(voyage: &mut Voyage, preset: &TradePreset) {
    for leg in &mut voyage.legs {
        leg.speed_kn = leg.speed_kn.or(Some(preset.speed_kn));
        leg.cons_mt_per_day = leg.cons_mt_per_day.or(Some(preset.sea_cons_mt_per_day));
    }
    for call in &mut voyage.port_calls {
        call.port_cons_mt_per_day = call
            .port_cons_mt_per_day
            .or(Some(preset.port_cons_mt_per_day));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundVoyage {
    /// An `end` call was appended and legs rebuilt.
    Closed { return_port: String },
    /// The voyage already ends at the return port; legs were rebuilt anyway.
    AlreadyClosed { return_port: String },
    /// Neither an explicit return port nor a first call name to fall back on.
    NoReturnPort,
}

/// Close the voyage back to `return_port` (default: the first call's name).
pub fn apply_round_voyage(
    voyage: &mut Voyage,
    return_port: Option<&str>,
    preset: &TradePreset,
) -> RoundVoyage {
    let fallback = voyage
        .port_calls
        .first()
        .map(|call| call.name.clone())
        .unwrap_or_default();
    let ret = return_port
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| fallback.trim().to_string(), ToString::to_string);
    if ret.is_empty() {
        return RoundVoyage::NoReturnPort;
    }

    let last = voyage
        .port_calls
        .last()
        .map(|call| call.name.trim().to_lowercase())
        .unwrap_or_default();
    let already_closed = last == ret.to_lowercase();
    if !already_closed {
        voyage.port_calls.push(PortCall {
            port_days: Some(0.0),
            waiting_days: Some(0.0),
            port_cons_mt_per_day: Some(preset.port_cons_mt_per_day),
            port_cost_usd: Some(0.0),
            ..PortCall::new(ret.clone(), PortType::End)
        });
    }
    rebuild_legs(voyage, preset);

    if already_closed {
        RoundVoyage::AlreadyClosed { return_port: ret }
    } else {
        RoundVoyage::Closed { return_port: ret }
    }
}

/// Fill blank or zero port days on load/discharge calls from handling rates.
///
/// Cargo comes from `derived` first, then from the voyage revenue. Returns one
/// note per filled call.
pub fn apply_handling_rates(voyage: &mut Voyage, derived: &DerivedInputs) -> Vec<String> {
    let Some(cargo) = positive(derived.cargo_qty_mt.or(voyage.revenue.cargo_qty_mt)) else {
        return Vec::new();
    };
    let load_rate = positive(derived.load_rate_mt_per_day);
    let discharge_rate = positive(derived.discharge_rate_mt_per_day);

    let mut notes = Vec::new();
    for call in &mut voyage.port_calls {
        if !is_blank_or_non_positive(call.port_days) {
            continue;
        }
        let (rate, label) = match call.port_type {
            PortType::Load => (load_rate, "Load"),
            PortType::Discharge => (discharge_rate, "Disch"),
            _ => continue,
        };
        let Some(rate) = rate else {
            continue;
        };
        let days = round_dp(cargo / rate, 2);
        call.port_days = days;
        notes.push(format!(
            "{label} days at {} = {cargo} / {rate} ≈ {}",
            call.name,
            days.unwrap_or_default()
        ));
    }
    notes
}
