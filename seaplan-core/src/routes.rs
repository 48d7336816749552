//! Two-tier route distance table.
//!
//! A read-only built-in layer ships with the crate; a user overlay, persisted
//! through a [`RouteStore`], always takes precedence. Keys are symmetric:
//! every lookup checks both `from__to` and `to__from`.
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::rc::Rc;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::RouteStore;
use crate::constants::ROUTE_KEY_SEPARATOR;
use crate::model::{Leg, normalize_name};
use crate::numbers::positive;

const BUILTIN_ROUTE_DATA: &str = include_str!("../assets/routes.json");

/// Persisted form: `"<from>__<to>"` to nautical miles.
pub type RouteMap = BTreeMap<String, f64>;

/// Key for an ordered pair of port names.
#[must_use]
pub fn route_key(from: &str, to: &str) -> String {
    format!(
        "{}{ROUTE_KEY_SEPARATOR}{}",
        normalize_name(from),
        normalize_name(to)
    )
}

/// The fixed seed table.
pub fn builtin_routes() -> &'static RouteMap {
    static BUILTIN: OnceLock<RouteMap> = OnceLock::new();
    BUILTIN.get_or_init(|| serde_json::from_str(BUILTIN_ROUTE_DATA).unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    Overlay,
    Builtin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteHit {
    pub distance_nm: f64,
    pub source: RouteSource,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteSaveError {
    #[error("Distance must be > 0.")]
    NonPositiveDistance,
    #[error("From/To port names are required.")]
    BlankName,
    #[error("Route store failed: {0}")]
    Store(String),
}

/// `{ok: true}` or `{ok: false, error}` for callers that want a plain record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<(), RouteSaveError>> for SaveOutcome {
    fn from(result: &Result<(), RouteSaveError>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                error: None,
            },
            Err(err) => Self {
                ok: false,
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FillReport {
    pub updated: usize,
    /// `from → to` labels of legs that still have no distance.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveAllReport {
    pub saved: usize,
    pub skipped: usize,
}

/// In-memory overlay, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouteStore {
    routes: Rc<RefCell<RouteMap>>,
}

impl MemoryRouteStore {
    #[must_use]
    pub fn with_routes(routes: RouteMap) -> Self {
        Self {
            routes: Rc::new(RefCell::new(routes)),
        }
    }
}

impl RouteStore for MemoryRouteStore {
    type Error = Infallible;

    fn load_overlay(&self) -> Result<RouteMap, Self::Error> {
        Ok(self.routes.borrow().clone())
    }

    fn store_overlay(&self, routes: &RouteMap) -> Result<(), Self::Error> {
        *self.routes.borrow_mut() = routes.clone();
        Ok(())
    }

    fn clear_overlay(&self) -> Result<(), Self::Error> {
        self.routes.borrow_mut().clear();
        Ok(())
    }
}

/// Route table over a persistence port and the built-in layer.
#[derive(Debug, Clone)]
pub struct RouteTable<S> {
    store: S,
    builtin: &'static RouteMap,
}

impl<S: RouteStore> RouteTable<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            builtin: builtin_routes(),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Overlay contents; an unreadable overlay reads as empty.
    pub fn overlay(&self) -> RouteMap {
        self.store.load_overlay().unwrap_or_else(|err| {
            log::warn!("route overlay unreadable, ignoring it: {err}");
            RouteMap::new()
        })
    }

    /// Distance for an unordered pair, overlay first, or `None` when unknown.
    pub fn lookup(&self, from: &str, to: &str) -> Option<f64> {
        self.lookup_hit(from, to).map(|hit| hit.distance_nm)
    }

    pub fn lookup_hit(&self, from: &str, to: &str) -> Option<RouteHit> {
        let overlay = self.overlay();
        self.lookup_in(&overlay, from, to)
    }

    fn lookup_in(&self, overlay: &RouteMap, from: &str, to: &str) -> Option<RouteHit> {
        let forward = route_key(from, to);
        let reverse = route_key(to, from);
        let layers = [
            (overlay, RouteSource::Overlay),
            (self.builtin, RouteSource::Builtin),
        ];
        for (layer, source) in layers {
            for key in [&forward, &reverse] {
                if let Some(distance_nm) = positive(layer.get(key.as_str()).copied()) {
                    log::trace!("route {key} -> {distance_nm} nm ({source:?})");
                    return Some(RouteHit {
                        distance_nm,
                        source,
                    });
                }
            }
        }
        log::trace!("route {forward} unknown");
        None
    }

    /// Save a distance under both key orders in the overlay.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive distance, a blank port name, or a
    /// store failure. The built-in layer is never touched.
    pub fn save(&self, from: &str, to: &str, distance_nm: f64) -> Result<(), RouteSaveError> {
        if positive(Some(distance_nm)).is_none() {
            return Err(RouteSaveError::NonPositiveDistance);
        }
        let a = normalize_name(from);
        let b = normalize_name(to);
        if a.is_empty() || b.is_empty() {
            return Err(RouteSaveError::BlankName);
        }

        let mut overlay = self.overlay();
        overlay.insert(route_key(&a, &b), distance_nm);
        overlay.insert(route_key(&b, &a), distance_nm);
        self.store
            .store_overlay(&overlay)
            .map_err(|err| RouteSaveError::Store(err.to_string()))?;
        log::debug!("saved route {a} <-> {b} = {distance_nm} nm");
        Ok(())
    }

    /// Drop every user-saved distance; lookups fall back to the built-in layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub fn clear(&self) -> Result<(), S::Error> {
        self.store.clear_overlay()?;
        log::debug!("cleared route overlay");
        Ok(())
    }

    /// Fill leg distances from the table.
    ///
    /// With `prefer_saved`, a known distance replaces whatever the leg holds;
    /// otherwise only blank or zero distances are filled.
    pub fn fill_leg_distances(&self, legs: &mut [Leg], prefer_saved: bool) -> FillReport {
        let overlay = self.overlay();
        let mut report = FillReport::default();
        for leg in legs.iter_mut() {
            let current = positive(leg.distance_nm);
            let Some(hit) = self.lookup_in(&overlay, &leg.from, &leg.to) else {
                if current.is_none() {
                    report.missing.push(leg.label());
                }
                continue;
            };
            if prefer_saved {
                if current != Some(hit.distance_nm) {
                    report.updated += 1;
                }
                leg.distance_nm = Some(hit.distance_nm);
            } else if current.is_none() {
                report.updated += 1;
                leg.distance_nm = Some(hit.distance_nm);
            }
        }
        report
    }

    /// Save every leg that has a positive distance and both names.
    pub fn save_leg_distances(&self, legs: &[Leg]) -> SaveAllReport {
        let mut report = SaveAllReport::default();
        for leg in legs {
            let Some(distance) = positive(leg.distance_nm) else {
                report.skipped += 1;
                continue;
            };
            if leg.from.is_empty() || leg.to.is_empty() {
                report.skipped += 1;
                continue;
            }
            if self.save(&leg.from, &leg.to, distance).is_ok() {
                report.saved += 1;
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable<MemoryRouteStore> {
        RouteTable::new(MemoryRouteStore::default())
    }

    #[test]
    fn builtin_lookup_is_symmetric_and_case_insensitive() {
        let t = table();
        assert_eq!(t.lookup("Singapore", "Palembang"), Some(450.0));
        assert_eq!(t.lookup(" PALEMBANG ", "singapore"), Some(450.0));
        assert_eq!(t.lookup("Singapore", "Rotterdam"), None);
        assert_eq!(builtin_routes().len(), 6);
    }

    #[test]
    fn save_writes_both_directions_to_overlay_only() {
        let t = table();
        t.save("Kandla", "Fujairah", 830.0).unwrap();
        assert_eq!(t.lookup("fujairah", "KANDLA"), Some(830.0));
        assert_eq!(t.lookup("Kandla", "Fujairah"), Some(830.0));
        let overlay = t.overlay();
        assert_eq!(overlay.get("kandla__fujairah"), Some(&830.0));
        assert_eq!(overlay.get("fujairah__kandla"), Some(&830.0));
        assert_eq!(builtin_routes().get("kandla__fujairah"), None);
    }

    #[test]
    fn overlay_takes_precedence_and_clear_restores_builtin() {
        let t = table();
        t.save("Palembang", "Singapore", 460.0).unwrap();
        let hit = t.lookup_hit("Singapore", "Palembang").unwrap();
        assert_eq!(hit.source, RouteSource::Overlay);
        assert!((hit.distance_nm - 460.0).abs() < f64::EPSILON);

        t.clear().unwrap();
        let hit = t.lookup_hit("Singapore", "Palembang").unwrap();
        assert_eq!(hit.source, RouteSource::Builtin);
        assert!((hit.distance_nm - 450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn save_is_idempotent() {
        let t = table();
        t.save("A", "B", 100.0).unwrap();
        let first = t.overlay();
        t.save("a", "b", 100.0).unwrap();
        assert_eq!(t.overlay(), first);
    }

    #[test]
    fn save_rejects_bad_input_with_reasons() {
        let t = table();
        let zero = t.save("A", "B", 0.0);
        assert_eq!(zero, Err(RouteSaveError::NonPositiveDistance));
        assert_eq!(
            SaveOutcome::from(&zero),
            SaveOutcome {
                ok: false,
                error: Some("Distance must be > 0.".to_string())
            }
        );
        assert_eq!(t.save(" ", "B", 10.0), Err(RouteSaveError::BlankName));
        assert_eq!(t.save("A", "B", f64::NAN), Err(RouteSaveError::NonPositiveDistance));
        assert!(t.overlay().is_empty());
        let ok = serde_json::to_value(SaveOutcome::from(&Ok(()))).unwrap();
        assert_eq!(ok, serde_json::json!({"ok": true}));
    }

    #[test]
    fn fill_respects_prefer_saved() {
        let t = table();
        let mut legs = vec![
            Leg::between("Singapore", "Palembang"),
            Leg {
                distance_nm: Some(2400.0),
                ..Leg::between("Palembang", "Vizag")
            },
            Leg::between("Vizag", "Chittagong"),
        ];
        let report = t.fill_leg_distances(&mut legs, false);
        assert_eq!(report.updated, 1);
        assert_eq!(report.missing, vec!["Vizag → Chittagong".to_string()]);
        assert_eq!(legs[0].distance_nm, Some(450.0));
        assert_eq!(legs[1].distance_nm, Some(2400.0));

        let report = t.fill_leg_distances(&mut legs, true);
        assert_eq!(report.updated, 1);
        assert_eq!(legs[1].distance_nm, Some(2500.0));
    }

    #[test]
    fn save_all_counts_saved_and_skipped() {
        let t = table();
        let legs = vec![
            Leg {
                distance_nm: Some(1200.0),
                ..Leg::between("Vizag", "Colombo")
            },
            Leg::between("Colombo", "Kandla"),
            Leg {
                distance_nm: Some(50.0),
                ..Leg::between("", "Kandla")
            },
        ];
        assert_eq!(
            t.save_leg_distances(&legs),
            SaveAllReport {
                saved: 1,
                skipped: 2
            }
        );
        assert_eq!(t.lookup("Colombo", "Vizag"), Some(1200.0));
    }

    #[test]
    fn clones_share_the_memory_overlay() {
        let store = MemoryRouteStore::default();
        let first = RouteTable::new(store.clone());
        let second = RouteTable::new(store);
        first.save("Qingdao", "Palembang", 2650.0).unwrap();
        assert_eq!(second.lookup("Palembang", "Qingdao"), Some(2650.0));
    }
}
