use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use seaplan_core::{
    CalcOutcome, RequiredFreight, SensitivityTable, VoyageEconomics, VoyageSnapshot,
    voyage_summary,
};
use serde::Serialize;

/// Everything a `calc` run produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcReport<'a> {
    #[serde(skip)]
    pub snapshot: &'a VoyageSnapshot,
    #[serde(flatten)]
    pub outcome: &'a CalcOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_tce_usd_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_freight: Option<RequiredFreight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<&'a SensitivityTable>,
}

pub fn generate_json_report(out: &mut dyn Write, report: &CalcReport<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json}")?;
    Ok(())
}

pub fn generate_summary_report(out: &mut dyn Write, report: &CalcReport<'_>) -> Result<()> {
    let snap = report.snapshot;
    match report.outcome {
        CalcOutcome::Computed(economics) => {
            let text = voyage_summary(
                &snap.voyage,
                economics,
                snap.trade_mode,
                snap.voyage_mode,
                snap.vessel_class,
            );
            write!(out, "{text}")?;
            if let (Some(target), Some(solved)) =
                (report.target_tce_usd_per_day, report.required_freight)
            {
                writeln!(
                    out,
                    "Required freight for {target:.0} USD/day: {:.2} USD/mt",
                    solved.required_per_mt
                )?;
            }
        }
        other => write_not_computed(out, other)?,
    }
    Ok(())
}

pub fn generate_console_report(out: &mut dyn Write, report: &CalcReport<'_>) -> Result<()> {
    let snap = report.snapshot;
    writeln!(out, "{}", format!("🚢 {}", snap.name).bright_cyan().bold())?;
    writeln!(out, "{}", "=".repeat(30).cyan())?;
    writeln!(out, "Route: {}", snap.voyage.route_line())?;
    writeln!(out)?;

    let CalcOutcome::Computed(economics) = report.outcome else {
        return write_not_computed(out, report.outcome);
    };
    write_economics(out, economics)?;

    if let Some(target) = report.target_tce_usd_per_day {
        writeln!(out)?;
        writeln!(out, "{}", "🎯 Freight Solver".bright_yellow().bold())?;
        match report.required_freight {
            Some(solved) => {
                writeln!(out, "Target TCE: {target:.0} USD/day")?;
                writeln!(out, "Required gross freight: {:.0} USD", solved.required_gross)?;
                writeln!(
                    out,
                    "Required freight: {} USD/mt",
                    format!("{:.2}", solved.required_per_mt).green()
                )?;
            }
            None => writeln!(
                out,
                "Required freight: n/a (needs $/mt freight, cargo qty and commission < 100%)"
            )?,
        }
    }

    if let Some(table) = report.sensitivity {
        writeln!(out)?;
        writeln!(out, "{}", "📈 Sensitivity".bright_yellow().bold())?;
        writeln!(out, "Base TCE: {:.0} USD/day", table.base_tce_usd_per_day)?;
        for row in &table.rows {
            let delta = row.delta_usd_per_day.map_or_else(
                || "n/a".dimmed().to_string(),
                |d| {
                    let text = format!("{d:+.0}");
                    if d < 0.0 {
                        text.red().to_string()
                    } else {
                        text.green().to_string()
                    }
                },
            );
            let tce = row
                .tce_usd_per_day
                .map_or_else(|| "n/a".to_string(), |t| format!("{t:.0}"));
            writeln!(out, "  {:32} {tce:>10} ({delta})", row.label)?;
        }
    }
    Ok(())
}

fn write_economics(out: &mut dyn Write, e: &VoyageEconomics) -> Result<()> {
    writeln!(out, "Sea days: {:.2}", e.sea_days_total)?;
    writeln!(out, "Port days: {:.2}", e.port_days_total)?;
    writeln!(out, "Waiting days: {:.2}", e.waiting_days_total)?;
    writeln!(out, "Voyage days: {:.2}", e.voyage_days)?;
    writeln!(out)?;
    writeln!(
        out,
        "Bunkers: {:.1} mt (sea {:.1}, port {:.1}), purchased {:.1} mt",
        e.bunkers_total, e.bunkers_sea_total, e.bunkers_port_total, e.bunkers_purchased_total
    )?;
    writeln!(
        out,
        "Bunker cost: {:.0} USD ({})",
        e.bunker_cost,
        match e.bunker_cost_method {
            seaplan_core::BunkerCostMethod::PurchasePlan => "purchase plan",
            seaplan_core::BunkerCostMethod::BlendedPrice => "blended price",
        }
    )?;
    if let Some(warning) = &e.bunker_warning {
        writeln!(out, "  ⚠️  {}", warning.yellow())?;
    }
    writeln!(out, "Port costs: {:.0} USD", e.port_cost_total)?;
    writeln!(out, "Canal tolls: {:.0} USD", e.canal_tolls_usd)?;
    writeln!(out, "Other costs: {:.0} USD", e.other_costs_usd)?;
    writeln!(out, "Voyage costs: {:.0} USD", e.voyage_costs_total)?;
    writeln!(out)?;
    writeln!(out, "Gross freight: {:.0} USD", e.gross_freight)?;
    writeln!(out, "Commission: {:.0} USD", e.commission)?;
    writeln!(out, "Net revenue: {:.0} USD", e.net_revenue)?;
    writeln!(out, "Voyage profit: {:.0} USD", e.voyage_profit)?;
    writeln!(out)?;
    let tce = format!("{:.0}", e.tce_usd_per_day);
    let tce = if e.tce_usd_per_day < 0.0 {
        tce.red()
    } else {
        tce.green()
    };
    writeln!(out, "{} {tce} USD/day", "OWNER TCE:".bold())?;
    Ok(())
}

fn write_not_computed(out: &mut dyn Write, outcome: &CalcOutcome) -> Result<()> {
    match outcome {
        CalcOutcome::MissingDistance(missing) => {
            writeln!(out, "⚠️  {}", missing.message.yellow())?;
        }
        CalcOutcome::Invalid(err) => {
            writeln!(out, "❌ {}", err.to_string().red())?;
        }
        CalcOutcome::Computed(_) => {}
    }
    Ok(())
}
