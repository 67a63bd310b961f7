use anyhow::Result;
use bosstiary_game::RefreshOutcome;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use crate::simulation::SimulationReport;

#[derive(Debug, Serialize)]
struct RefreshJson<'a> {
    day: u8,
    published: &'a str,
    outcome: Option<&'a RefreshOutcome>,
    error: Option<String>,
}

pub fn write_refresh_console(
    out: &mut dyn Write,
    day: u8,
    outcome: &std::result::Result<RefreshOutcome, String>,
    published: &str,
) -> Result<()> {
    writeln!(out, "{}", "👑 Boosted Boss Refresh".bright_cyan().bold())?;
    writeln!(out, "{}", "=======================".cyan())?;
    writeln!(out, "Day of month: {day}")?;
    match outcome {
        Ok(RefreshOutcome::Kept(record)) => {
            writeln!(
                out,
                "✅ Kept {} (race {}) - already boosted today",
                record.name.green(),
                record.race_id
            )?;
        }
        Ok(RefreshOutcome::Rotated {
            previous_race_id,
            record,
        }) => {
            let previous = previous_race_id.map_or_else(|| String::from("none"), |id| id.to_string());
            writeln!(
                out,
                "🔄 Rotated to {} (race {}), previous race {previous}",
                record.name.green(),
                record.race_id
            )?;
            writeln!(
                out,
                "   Outfit: type {} head {} body {} legs {} feet {} addons {} mount {}",
                record.outfit.look_type,
                record.outfit.look_head,
                record.outfit.look_body,
                record.outfit.look_legs,
                record.outfit.look_feet,
                record.outfit.look_addons,
                record.outfit.look_mount
            )?;
        }
        Err(err) => {
            writeln!(out, "❌ Refresh failed: {}", err.red())?;
        }
    }
    let shown = if published.is_empty() {
        "(none)"
    } else {
        published
    };
    writeln!(out, "Published boosted boss: {shown}")?;
    Ok(())
}

pub fn write_refresh_json(
    out: &mut dyn Write,
    day: u8,
    outcome: &std::result::Result<RefreshOutcome, String>,
    published: &str,
) -> Result<()> {
    let payload = RefreshJson {
        day,
        published,
        outcome: outcome.as_ref().ok(),
        error: outcome.as_ref().err().cloned(),
    };
    serde_json::to_writer_pretty(&mut *out, &payload)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_simulation_console(
    out: &mut dyn Write,
    report: &SimulationReport,
    duration: Duration,
    verbose: bool,
) -> Result<()> {
    writeln!(out, "{}", "📊 Rotation Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;
    writeln!(out, "Registered bosses: {}", report.registered)?;
    writeln!(out, "Simulated days: {}", report.days.len())?;
    writeln!(out, "Consecutive repeats: {}", count_label(report.repeats))?;
    writeln!(out, "Same-day re-rolls: {}", count_label(report.rerolls))?;
    writeln!(out, "Failures: {}", count_label(report.failures.len()))?;
    writeln!(out, "Largest pick share: {:.1}%", report.max_share() * 100.0)?;
    writeln!(out, "Total time: {duration:?}")?;
    writeln!(out)?;

    for (name, count) in &report.picks {
        writeln!(out, "  {name:25} {count}")?;
    }
    if verbose {
        writeln!(out)?;
        for day in &report.days {
            writeln!(
                out,
                "  #{:<4} day {:>2}: {} (race {})",
                day.index, day.day_of_month, day.name, day.race_id
            )?;
        }
    }
    for failure in &report.failures {
        writeln!(out, "❌ {}", failure.red())?;
    }

    let status = if report.passed() {
        "✅ PASS".green()
    } else {
        "❌ FAIL".red()
    };
    writeln!(out)?;
    writeln!(out, "{status}")?;
    Ok(())
}

pub fn write_simulation_json(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn count_label(count: usize) -> colored::ColoredString {
    if count == 0 {
        count.to_string().green()
    } else {
        count.to_string().red()
    }
}
