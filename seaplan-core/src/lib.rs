//! Seaplan voyage engine
//!
//! Turns loosely structured voyage drafts into a canonical itinerary and
//! computes owner time-charter equivalent (TCE) economics for it.
//! This crate carries no I/O: text extraction and route persistence are
//! supplied by the host through [`DraftExtractor`] and [`RouteStore`].

pub mod bunker;
pub mod config;
pub mod constants;
pub mod draft;
pub mod itinerary;
pub mod model;
pub mod normalize;
pub mod numbers;
pub mod planning;
pub mod routes;
pub mod sensitivity;
pub mod solver;
pub mod summary;
pub mod templates;
pub mod vessel;

use thiserror::Error;

// Re-export commonly used types
pub use bunker::{RelocationPolicy, TextCuePolicy, reconcile_bunkers, reconcile_bunkers_with};
pub use config::{PlannerConfig, SensitivitySteps, TradeMode, TradePreset};
pub use draft::{DraftError, DraftNumber, DraftVoyage};
pub use itinerary::{
    BunkerCostMethod, CalcOutcome, ItineraryError, MissingDistance, VoyageEconomics,
    calc_itinerary,
};
pub use model::{
    Costs, DerivedInputs, FreightType, Leg, PortCall, PortType, Revenue, Voyage, normalize_name,
};
pub use normalize::{NormalizeError, assemble_voyage, normalize_draft, normalize_port_calls};
pub use planning::{
    RoundVoyage, apply_handling_rates, apply_round_voyage, apply_trade_preset, rebuild_legs,
};
pub use routes::{
    FillReport, MemoryRouteStore, RouteHit, RouteMap, RouteSaveError, RouteSource, RouteTable,
    SaveAllReport, SaveOutcome, builtin_routes, route_key,
};
pub use sensitivity::{SensitivityRow, SensitivityTable, sensitivity};
pub use solver::{FreightTarget, RequiredFreight, solve_for_voyage, solve_required_freight};
pub use summary::{VoyageMode, VoyageSnapshot, voyage_summary};
pub use templates::TemplateLibrary;
pub use vessel::{
    VesselCatalog, VesselClass, VesselProfile, apply_vessel_profile, detect_vessel_class,
};

/// Trait for abstracting the text-to-draft extraction step
/// Host-specific implementations should provide this
pub trait DraftExtractor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Turn free-form request text into raw draft JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the extraction service fails.
    fn extract(&self, request_text: &str) -> Result<String, Self::Error>;
}

/// Trait for abstracting persistence of the user route overlay
/// Host-specific implementations should provide this
pub trait RouteStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the saved overlay
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay cannot be read or parsed.
    fn load_overlay(&self) -> Result<RouteMap, Self::Error>;

    /// Replace the saved overlay
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay cannot be written.
    fn store_overlay(&self, routes: &RouteMap) -> Result<(), Self::Error>;

    /// Remove every saved route
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay cannot be removed.
    fn clear_overlay(&self) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Paste an email or voyage text first.")]
    EmptyRequest,
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// A canonical voyage together with what extraction inferred alongside it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedDraft {
    pub voyage: Voyage,
    pub vessel_class: VesselClass,
    pub derived: DerivedInputs,
}

/// Main planner for turning requests into voyages and economics
pub struct VoyagePlanner<E, S>
where
    E: DraftExtractor,
    S: RouteStore,
{
    extractor: E,
    routes: RouteTable<S>,
    config: PlannerConfig,
    relocation: TextCuePolicy,
}

impl<E, S> VoyagePlanner<E, S>
where
    E: DraftExtractor,
    S: RouteStore,
{
    /// Create a planner with the provided extractor, route store and configuration
    pub fn new(extractor: E, store: S, config: PlannerConfig) -> Self {
        let relocation = TextCuePolicy::from_config(&config);
        Self {
            extractor,
            routes: RouteTable::new(store),
            config,
            relocation,
        }
    }

    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub const fn routes(&self) -> &RouteTable<S> {
        &self.routes
    }

    /// Extract, parse, reconcile and normalize a free-form request.
    ///
    /// # Errors
    ///
    /// Returns an error for blank text, a failing extractor, unparseable
    /// extraction output or fewer than two usable port calls.
    pub fn draft_from_text(&self, request_text: &str) -> Result<PlannedDraft, PlannerError> {
        if request_text.trim().is_empty() {
            return Err(PlannerError::EmptyRequest);
        }
        let raw = self
            .extractor
            .extract(request_text)
            .map_err(|err| PlannerError::Extraction(err.to_string()))?;
        self.plan_from_draft(&raw, request_text)
    }

    /// Same pipeline as [`Self::draft_from_text`] for already extracted JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a draft object or yields fewer
    /// than two usable port calls.
    pub fn plan_from_draft(
        &self,
        raw_json: &str,
        request_text: &str,
    ) -> Result<PlannedDraft, PlannerError> {
        let draft = DraftVoyage::from_json(raw_json)?;
        let calls = normalize_port_calls(&draft);
        log::debug!("draft carries {} named port call(s)", calls.len());
        let calls = reconcile_bunkers_with(calls, request_text, &self.relocation);
        let voyage = assemble_voyage(calls, &draft, &self.config)?;
        Ok(PlannedDraft {
            voyage,
            vessel_class: VesselClass::from_tag(&draft.vessel_class_tag()),
            derived: draft.derived.unwrap_or_default(),
        })
    }

    /// Fill leg distances from the route table, then calculate.
    pub fn fill_and_calculate(&self, voyage: &mut Voyage, prefer_saved: bool) -> CalcOutcome {
        let report = self.routes.fill_leg_distances(&mut voyage.legs, prefer_saved);
        if report.updated > 0 {
            log::info!("filled {} leg distance(s) from the route table", report.updated);
        }
        self.calculate(voyage)
    }

    #[must_use]
    pub fn calculate(&self, voyage: &Voyage) -> CalcOutcome {
        calc_itinerary(voyage)
    }

    /// Required $/mt freight for a target TCE, when the voyage is computable.
    #[must_use]
    pub fn solve(&self, voyage: &Voyage, target_tce_usd_per_day: f64) -> Option<RequiredFreight> {
        let outcome = self.calculate(voyage);
        let economics = outcome.economics()?;
        solve_for_voyage(voyage, economics, target_tce_usd_per_day)
    }

    #[must_use]
    pub fn sensitivity(&self, voyage: &Voyage) -> Option<SensitivityTable> {
        sensitivity(voyage, &self.config.sensitivity)
    }
}
