//! TCE sensitivity to bunker price, speed and freight.
use serde::{Deserialize, Serialize};

use crate::config::SensitivitySteps;
use crate::itinerary::calc_itinerary;
use crate::model::{FreightType, Voyage};
use crate::numbers::or_zero;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    pub label: String,
    /// TCE of the varied voyage; `None` when it is not computable.
    pub tce_usd_per_day: Option<f64>,
    pub delta_usd_per_day: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityTable {
    pub base_tce_usd_per_day: f64,
    pub rows: Vec<SensitivityRow>,
}

#[derive(Debug, Clone, Copy)]
enum Variation {
    BunkerPrice(f64),
    Speed(f64),
    Freight(f64),
}

impl Variation {
    fn label(self) -> String {
        match self {
            Self::BunkerPrice(d) => format!("Bunker price {d:+} USD/mt"),
            Self::Speed(d) => format!("Speed {d:+} kn (all legs)"),
            Self::Freight(d) => format!("Freight {d:+} USD/mt"),
        }
    }

    fn apply(self, voyage: &mut Voyage, speed_floor: f64) {
        match self {
            Self::BunkerPrice(d) => {
                let price = or_zero(voyage.costs.bunker_price_usd_per_mt) + d;
                voyage.costs.bunker_price_usd_per_mt = Some(price.max(0.0));
            }
            Self::Speed(d) => {
                for leg in &mut voyage.legs {
                    leg.speed_kn = Some((or_zero(leg.speed_kn) + d).max(speed_floor));
                }
            }
            Self::Freight(d) => {
                if voyage.revenue.freight_type == FreightType::PerMt {
                    let rate = or_zero(voyage.revenue.freight_usd_per_mt) + d;
                    voyage.revenue.freight_usd_per_mt = Some(rate.max(0.0));
                }
            }
        }
    }
}

/// Re-run the calculator on varied copies of the voyage.
///
/// Returns `None` when the base voyage itself is not computable.
#[must_use]
pub fn sensitivity(voyage: &Voyage, steps: &SensitivitySteps) -> Option<SensitivityTable> {
    let base = calc_itinerary(voyage).tce_usd_per_day()?;

    let variations = [
        Variation::BunkerPrice(steps.bunker_price_usd_per_mt),
        Variation::BunkerPrice(-steps.bunker_price_usd_per_mt),
        Variation::Speed(steps.speed_kn),
        Variation::Speed(-steps.speed_kn),
        Variation::Freight(steps.freight_usd_per_mt),
        Variation::Freight(-steps.freight_usd_per_mt),
    ];

    let rows = variations
        .into_iter()
        .map(|variation| {
            let mut varied = voyage.clone();
            variation.apply(&mut varied, steps.speed_floor_kn);
            let tce = calc_itinerary(&varied).tce_usd_per_day();
            SensitivityRow {
                label: variation.label(),
                tce_usd_per_day: tce,
                delta_usd_per_day: tce.map(|t| t - base),
            }
        })
        .collect();

    Some(SensitivityTable {
        base_tce_usd_per_day: base,
        rows,
    })
}
