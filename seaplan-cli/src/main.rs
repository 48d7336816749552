mod reports;
mod settings;
mod store;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use reports::CalcReport;
use seaplan_core::{
    PlannerError, RouteSource, RoundVoyage, SaveOutcome, TradeMode, VesselClass, VoyageMode,
    VoyagePlanner, VoyageSnapshot, apply_handling_rates, apply_round_voyage, apply_trade_preset,
    apply_vessel_profile, detect_vessel_class,
};
use store::{ExtractedFile, JsonFileRouteStore, TemplateFile};

type Planner = VoyagePlanner<ExtractedFile, JsonFileRouteStore>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored breakdown for the terminal
    Console,
    /// Calculator result as JSON
    Json,
    /// Copy-pasteable owner TCE estimate
    Summary,
}

#[derive(Debug, Parser)]
#[command(name = "seaplan", version)]
#[command(about = "Voyage estimator: normalize drafts, look up distances, compute owner TCE")]
struct Args {
    /// Route overlay file (default: $SEAPLAN_ROUTES, then ./seaplan-routes.json)
    #[arg(long, global = true)]
    routes: Option<PathBuf>,

    /// Voyage template file (default: $SEAPLAN_TEMPLATES, then ./seaplan-templates.json)
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Planner configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Optional path to write the output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Turn extraction output into a canonical voyage
    Draft(DraftArgs),
    /// Compute voyage economics
    Calc(CalcArgs),
    /// Inspect and edit saved route distances
    #[command(subcommand)]
    Routes(RoutesCommand),
    /// Keep named voyage templates
    #[command(subcommand)]
    Templates(TemplatesCommand),
}

#[derive(Debug, clap::Args)]
struct DraftArgs {
    /// File holding the raw extraction JSON
    #[arg(long)]
    extracted: PathBuf,

    /// Original request text, or @file to read it from a file
    #[arg(long)]
    text: String,

    /// Fill leg distances from the route table
    #[arg(long)]
    fill_distances: bool,

    /// Fill blank speed/consumption from the detected vessel class
    #[arg(long)]
    apply_profile: bool,

    /// Derive load/discharge port days from handling rates
    #[arg(long)]
    apply_rates: bool,

    /// Fill remaining blank speed/consumption from a trade preset
    #[arg(long, value_enum)]
    trade: Option<TradeArg>,

    /// Close the voyage back to its first port (or --return-port)
    #[arg(long)]
    round: bool,

    #[arg(long, requires = "round")]
    return_port: Option<String>,

    /// Snapshot name (default: timestamped)
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TradeArg {
    Dry,
    Tanker,
}

impl From<TradeArg> for TradeMode {
    fn from(value: TradeArg) -> Self {
        match value {
            TradeArg::Dry => Self::Dry,
            TradeArg::Tanker => Self::Tanker,
        }
    }
}

#[derive(Debug, clap::Args)]
struct CalcArgs {
    /// Voyage or snapshot JSON file
    voyage: PathBuf,

    /// Solve for the $/mt freight that yields this TCE
    #[arg(long)]
    target_tce: Option<f64>,

    /// Add the bunker/speed/freight sensitivity table
    #[arg(long)]
    sensitivity: bool,

    /// Look up missing leg distances before calculating
    #[arg(long)]
    fill_distances: bool,

    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,
}

#[derive(Debug, Subcommand)]
enum RoutesCommand {
    /// Distance between two ports (either order)
    Lookup { from: String, to: String },
    /// Save a distance to the overlay
    Save {
        from: String,
        to: String,
        distance_nm: f64,
    },
    /// Remove every saved distance
    Clear,
    /// Fill a voyage file's leg distances and print the voyage
    Fill {
        voyage: PathBuf,
        /// Replace entered distances with saved ones
        #[arg(long)]
        prefer_saved: bool,
    },
    /// Save every leg distance of a voyage file
    SaveLegs { voyage: PathBuf },
}

#[derive(Debug, Subcommand)]
enum TemplatesCommand {
    /// Numbered list of saved templates
    List,
    /// Save a voyage or snapshot file as a template
    Save {
        voyage: PathBuf,
        /// Template name (default: the snapshot's own name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Print a saved template as a snapshot
    Load { position: usize },
    /// Remove a saved template
    Delete { position: usize },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = settings::load_config(args.config.as_deref())?;
    let routes_file = settings::routes_path_from_env(args.routes.as_deref());
    log::debug!("route overlay at {}", routes_file.display());

    let extracted = match &args.command {
        Command::Draft(draft) => Some(draft.extracted.clone()),
        _ => None,
    };
    let planner = VoyagePlanner::new(
        ExtractedFile::new(extracted),
        JsonFileRouteStore::new(routes_file),
        config,
    );

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match &args.command {
        Command::Draft(draft) => run_draft(&planner, draft, &mut output_target)?,
        Command::Calc(calc) => run_calc(&planner, calc, &mut output_target)?,
        Command::Routes(cmd) => run_routes(&planner, cmd, &mut output_target)?,
        Command::Templates(cmd) => {
            let file = TemplateFile::new(settings::templates_path_from_env(
                args.templates.as_deref(),
            ));
            run_templates(&file, cmd, &mut output_target)?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn announce(label: &str) {
    eprintln!("{}", format!("⚓ seaplan {label}").bright_cyan().bold());
}

fn run_draft(planner: &Planner, args: &DraftArgs, out: &mut OutputTarget) -> Result<()> {
    announce("draft");
    let text = settings::resolve_text(&args.text)?;
    let planned = match planner.draft_from_text(&text) {
        Ok(planned) => planned,
        Err(err @ (PlannerError::EmptyRequest | PlannerError::Normalize(_))) => {
            eprintln!("⚠️  {}", err.to_string().yellow());
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to read extraction {}", args.extracted.display())
            });
        }
    };

    let mut voyage = planned.voyage;
    let mut vessel_class = planned.vessel_class;
    if vessel_class == VesselClass::Unknown {
        vessel_class = detect_vessel_class(&text);
    }

    let mut snapshot_mode = VoyageMode::Oneway;
    let mut return_port = String::new();
    let trade = args.trade.map(TradeMode::from).unwrap_or_default();
    if args.round {
        let preset = planner.config().preset(trade);
        match apply_round_voyage(&mut voyage, args.return_port.as_deref(), &preset) {
            RoundVoyage::Closed { return_port: port }
            | RoundVoyage::AlreadyClosed { return_port: port } => {
                snapshot_mode = VoyageMode::Round;
                return_port = port;
            }
            RoundVoyage::NoReturnPort => {
                eprintln!("⚠️  {}", "Round voyage needs a return port.".yellow());
            }
        }
    }
    if args.apply_rates {
        for note in apply_handling_rates(&mut voyage, &planned.derived) {
            eprintln!("• {note}");
        }
    }
    if args.apply_profile {
        match apply_vessel_profile(&mut voyage, vessel_class) {
            Some(label) => eprintln!("• Applied vessel profile: {label}"),
            None => eprintln!("• No vessel class detected; profile not applied"),
        }
    }
    if let Some(arg) = args.trade {
        apply_trade_preset(&mut voyage, &planner.config().preset(arg.into()));
    }
    if args.fill_distances {
        let report = planner.routes().fill_leg_distances(&mut voyage.legs, false);
        eprintln!("• Filled {} leg distance(s)", report.updated);
        for label in &report.missing {
            eprintln!("  {} {label}", "missing:".yellow());
        }
    }

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| format!("Voyage {}", Local::now().format("%Y-%m-%d %H:%M")));
    let mut snapshot = VoyageSnapshot::new(name, voyage);
    snapshot.trade_mode = trade;
    snapshot.voyage_mode = snapshot_mode;
    snapshot.round_return_port = return_port;
    snapshot.vessel_class = vessel_class;
    writeln!(out, "{}", snapshot.to_json()?)?;
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<VoyageSnapshot> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    VoyageSnapshot::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn run_calc(planner: &Planner, args: &CalcArgs, out: &mut OutputTarget) -> Result<()> {
    let mut snapshot = read_snapshot(&args.voyage)?;
    let outcome = if args.fill_distances {
        planner.fill_and_calculate(&mut snapshot.voyage, snapshot.prefer_saved_distances)
    } else {
        planner.calculate(&snapshot.voyage)
    };

    let target = args.target_tce.or(snapshot.target_tce);
    let required_freight = target.and_then(|t| planner.solve(&snapshot.voyage, t));
    let sensitivity = if args.sensitivity {
        planner.sensitivity(&snapshot.voyage)
    } else {
        None
    };

    let report = CalcReport {
        snapshot: &snapshot,
        outcome: &outcome,
        target_tce_usd_per_day: target,
        required_freight,
        sensitivity: sensitivity.as_ref(),
    };
    match args.report {
        ReportFormat::Json => reports::generate_json_report(out, &report)?,
        ReportFormat::Summary => reports::generate_summary_report(out, &report)?,
        ReportFormat::Console => reports::generate_console_report(out, &report)?,
    }
    Ok(())
}

fn run_routes(planner: &Planner, cmd: &RoutesCommand, out: &mut OutputTarget) -> Result<()> {
    let routes = planner.routes();
    match cmd {
        RoutesCommand::Lookup { from, to } => match routes.lookup_hit(from, to) {
            Some(hit) => writeln!(
                out,
                "{from} → {to}: {} nm ({})",
                hit.distance_nm,
                match hit.source {
                    RouteSource::Overlay => "saved",
                    RouteSource::Builtin => "built-in",
                }
            )?,
            None => writeln!(out, "{from} → {to}: not found")?,
        },
        RoutesCommand::Save {
            from,
            to,
            distance_nm,
        } => {
            let result = routes.save(from, to, *distance_nm);
            if let Err(err) = &result {
                eprintln!("⚠️  {}", err.to_string().yellow());
            }
            writeln!(out, "{}", serde_json::to_string(&SaveOutcome::from(&result))?)?;
        }
        RoutesCommand::Clear => {
            routes
                .clear()
                .with_context(|| format!("failed to clear {}", routes.store().path().display()))?;
            writeln!(out, "Cleared saved routes.")?;
        }
        RoutesCommand::Fill {
            voyage,
            prefer_saved,
        } => {
            let mut snapshot = read_snapshot(voyage)?;
            let prefer = *prefer_saved || snapshot.prefer_saved_distances;
            let report = routes.fill_leg_distances(&mut snapshot.voyage.legs, prefer);
            eprintln!("• Filled {} leg distance(s)", report.updated);
            for label in &report.missing {
                eprintln!("  {} {label}", "missing:".yellow());
            }
            writeln!(out, "{}", snapshot.to_json()?)?;
        }
        RoutesCommand::SaveLegs { voyage } => {
            let snapshot = read_snapshot(voyage)?;
            let report = routes.save_leg_distances(&snapshot.voyage.legs);
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }
    }
    Ok(())
}

fn run_templates(
    file: &TemplateFile,
    cmd: &TemplatesCommand,
    out: &mut OutputTarget,
) -> Result<()> {
    let mut library = file.load()?;
    match cmd {
        TemplatesCommand::List => {
            if library.is_empty() {
                writeln!(out, "No saved voyages.")?;
            }
            for (idx, template) in library.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}. {} ({})",
                    idx + 1,
                    template.name,
                    template.voyage.route_line()
                )?;
            }
        }
        TemplatesCommand::Save { voyage, name } => {
            let mut snapshot = read_snapshot(voyage)?;
            if let Some(name) = name {
                snapshot.name.clone_from(name);
            }
            let position = library.save(snapshot);
            file.store(&library)?;
            if let Some(saved) = library.get(position) {
                writeln!(out, "Saved voyage template: \"{}\" (#{position})", saved.name)?;
            }
        }
        TemplatesCommand::Load { position } => match library.get(*position) {
            Some(template) => {
                eprintln!("• Loaded voyage: \"{}\"", template.name);
                writeln!(out, "{}", template.to_json()?)?;
            }
            None => eprintln!("⚠️  {}", "Select a saved voyage first.".yellow()),
        },
        TemplatesCommand::Delete { position } => match library.remove(*position) {
            Some(removed) => {
                file.store(&library)?;
                writeln!(out, "Deleted: \"{}\"", removed.name)?;
            }
            None => eprintln!("⚠️  {}", "Select a saved voyage to delete.".yellow()),
        },
    }
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
