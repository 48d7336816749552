//! Centralized defaults and fixed values for the voyage calculation core.
//!
//! These values define the defaults applied when a draft leaves a field out.
//! Keeping them together ensures that the economics can only be adjusted via
//! code changes reviewed in version control or an explicit `PlannerConfig`.

// Revenue / cost defaults --------------------------------------------------
pub const DEFAULT_COMMISSION_PCT: f64 = 2.5;
pub const DEFAULT_BUNKER_PRICE_USD_PER_MT: f64 = 650.0;
pub const DEFAULT_CANAL_TOLLS_USD: f64 = 0.0;
pub const DEFAULT_OTHER_COSTS_USD: f64 = 0.0;

// Time conversion ----------------------------------------------------------
pub const HOURS_PER_DAY: f64 = 24.0;

// Bunker reconciliation ----------------------------------------------------
/// Phrases in the request text that signal a bunker stop should happen early.
pub const RELOCATION_CUES: [&str; 5] = [
    "before sailing",
    "prior to sailing",
    "enroute",
    "en route",
    "on route",
];
/// A bunker call within this many positions of the end is eligible for relocation.
pub const RELOCATION_TAIL_WINDOW: usize = 2;

// Route table ----------------------------------------------------------------
pub const ROUTE_KEY_SEPARATOR: &str = "__";
pub const ROUTES_ENV_VAR: &str = "SEAPLAN_ROUTES";
pub const DEFAULT_ROUTES_FILE: &str = "seaplan-routes.json";

// Trade presets --------------------------------------------------------------
pub const DRY_SPEED_KN: f64 = 12.5;
pub const DRY_SEA_CONS_MT_PER_DAY: f64 = 28.0;
pub const DRY_PORT_CONS_MT_PER_DAY: f64 = 4.0;
pub const TANKER_SPEED_KN: f64 = 13.5;
pub const TANKER_SEA_CONS_MT_PER_DAY: f64 = 32.0;
pub const TANKER_PORT_CONS_MT_PER_DAY: f64 = 6.0;

// Sensitivity ----------------------------------------------------------------
pub const SENSITIVITY_BUNKER_STEP_USD: f64 = 50.0;
pub const SENSITIVITY_SPEED_STEP_KN: f64 = 1.0;
pub const SENSITIVITY_FREIGHT_STEP_USD: f64 = 1.0;
pub const SENSITIVITY_SPEED_FLOOR_KN: f64 = 0.1;

// Display ----------------------------------------------------------------------
pub const UNKNOWN_VESSEL_CLASS: &str = "unknown";
pub const UNNAMED_PORT_PREFIX: &str = "Port";

// Voyage templates -------------------------------------------------------------
pub const TEMPLATES_ENV_VAR: &str = "SEAPLAN_TEMPLATES";
pub const DEFAULT_TEMPLATES_FILE: &str = "seaplan-templates.json";
/// Name given to a template saved without one.
pub const DEFAULT_TEMPLATE_NAME: &str = "My Voyage";
