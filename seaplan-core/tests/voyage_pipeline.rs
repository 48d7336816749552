use std::convert::Infallible;

use seaplan_core::{
    CalcOutcome, DraftExtractor, MemoryRouteStore, PlannerConfig, PlannerError, PortType,
    RouteMap, RouteStore, TradeMode, VesselClass, Voyage, VoyagePlanner, apply_handling_rates,
    apply_trade_preset, calc_itinerary, route_key, solve_for_voyage,
};

struct Canned(&'static str);

impl DraftExtractor for Canned {
    type Error = Infallible;

    fn extract(&self, _request_text: &str) -> Result<String, Self::Error> {
        Ok(self.0.to_string())
    }
}

const REQUEST: &str = "Supramax open Singapore, bunker Singapore before sailing. \
    Load 50,000 mt coal at Palembang 8k/day, discharge Vizag 10k/day. USD 22 pmt.";

// Extraction put the bunker stop last, as language models tend to do.
const EXTRACTED: &str = r#"{
    "vesselClass": "supramax",
    "derived": {"cargo_qty_mt": 50000, "load_rate_mt_per_day": 8000, "discharge_rate_mt_per_day": "10000"},
    "portCalls": [
        {"name": "Singapore", "type": "start"},
        {"name": "Palembang", "type": "load"},
        {"name": "Vizag", "type": "discharge"},
        {"name": "Fujairah", "type": "bunker", "bunker_purchase_qty_mt": 600, "bunker_purchase_price_usd_per_mt": 640}
    ],
    "legs": [{"speed_kn": "", "cons_mt_per_day": null, "distance_nm": 99999}],
    "revenue": {"cargo_qty_mt": 50000, "freight_usd_per_mt": "22", "commission_pct": ""},
    "costs": {"bunker_price_usd_per_mt": null}
}"#;

fn planner() -> VoyagePlanner<Canned, MemoryRouteStore> {
    VoyagePlanner::new(
        Canned(EXTRACTED),
        MemoryRouteStore::default(),
        PlannerConfig::default(),
    )
}

fn ready_voyage(p: &VoyagePlanner<Canned, MemoryRouteStore>) -> Voyage {
    let planned = p.draft_from_text(REQUEST).unwrap();
    let mut voyage = planned.voyage;
    apply_handling_rates(&mut voyage, &planned.derived);
    apply_trade_preset(&mut voyage, &p.config().preset(TradeMode::Dry));
    voyage
}

#[test]
fn trailing_bunker_stop_moves_after_last_load() {
    let p = planner();
    let planned = p.draft_from_text(REQUEST).unwrap();
    assert_eq!(planned.vessel_class, VesselClass::Supramax);
    let voyage = planned.voyage;
    let kinds: Vec<_> = voyage.port_calls.iter().map(|c| c.port_type).collect();
    assert_eq!(
        kinds,
        [
            PortType::Start,
            PortType::Load,
            PortType::Bunker,
            PortType::Discharge
        ]
    );
    assert_eq!(voyage.legs.len(), 3);
    assert_eq!(voyage.legs[1].label(), "Palembang → Fujairah");
    assert!(voyage.legs.iter().all(|leg| leg.distance_nm.is_none()));
    // Blank strings from the draft fall back to defaults.
    assert_eq!(voyage.revenue.commission_pct, Some(2.5));
    assert_eq!(voyage.costs.bunker_price_usd_per_mt, Some(650.0));
}

#[test]
fn missing_route_is_reported_then_resolved_by_saving_it() {
    let p = planner();
    let mut voyage = ready_voyage(&p);
    assert_eq!(voyage.port_calls[1].port_days, Some(6.25));
    assert_eq!(voyage.port_calls[3].port_days, Some(5.0));

    match p.fill_and_calculate(&mut voyage, false) {
        CalcOutcome::MissingDistance(missing) => assert_eq!(missing.legs, vec![2, 3]),
        other => panic!("expected missing distances, got {other:?}"),
    }

    p.routes().save("Palembang", "Fujairah", 3_400.0).unwrap();
    p.routes().save("Vizag", "Fujairah", 1_700.0).unwrap();
    let outcome = p.fill_and_calculate(&mut voyage, false);
    let economics = outcome.economics().expect("computed after saving routes");
    assert_eq!(economics.bunkers_purchased_total, 600.0);
    assert!((economics.bunker_cost - 384_000.0).abs() < 1e-6);
    assert!(economics.bunker_warning.is_some());
}

#[test]
fn solved_freight_reproduces_the_target_tce() {
    let p = planner();
    let mut voyage = ready_voyage(&p);
    p.routes().save("Palembang", "Fujairah", 3_400.0).unwrap();
    p.routes().save("Fujairah", "Vizag", 1_700.0).unwrap();
    let outcome = p.fill_and_calculate(&mut voyage, false);
    let economics = outcome.economics().unwrap();

    let target = 14_000.0;
    let solved = solve_for_voyage(&voyage, economics, target).unwrap();
    voyage.revenue.freight_usd_per_mt = Some(solved.required_per_mt);
    let tce = calc_itinerary(&voyage).tce_usd_per_day().unwrap();
    assert!((tce - target).abs() < 1e-6);
}

#[test]
fn saved_distance_overrides_builtin_only_when_preferred() {
    let store = MemoryRouteStore::default();
    let mut overlay = RouteMap::new();
    overlay.insert(route_key("singapore", "palembang"), 470.0);
    store.store_overlay(&overlay).unwrap();
    let p = VoyagePlanner::new(Canned(EXTRACTED), store, PlannerConfig::default());

    let mut voyage = ready_voyage(&p);
    voyage.legs[0].distance_nm = Some(455.0);
    let report = p.routes().fill_leg_distances(&mut voyage.legs, false);
    assert_eq!(voyage.legs[0].distance_nm, Some(455.0));
    assert_eq!(report.missing.len(), 2);

    p.routes().fill_leg_distances(&mut voyage.legs, true);
    assert_eq!(voyage.legs[0].distance_nm, Some(470.0));
    assert_eq!(p.routes().lookup("Palembang", "Singapore"), Some(470.0));

    p.routes().clear().unwrap();
    assert_eq!(p.routes().lookup("Palembang", "Singapore"), Some(450.0));
}

#[test]
fn draft_with_one_named_port_is_rejected() {
    let p = VoyagePlanner::new(
        Canned(r#"{"portCalls": [{"name": "Vizag", "type": "discharge"}, null, {"name": ""}]}"#),
        MemoryRouteStore::default(),
        PlannerConfig::default(),
    );
    let err = p.draft_from_text("discharge vizag").unwrap_err();
    assert!(matches!(err, PlannerError::Normalize(_)));
    assert!(err.to_string().contains("at least 2"));
}
