// src/output.rs
// =============================================================================
// This module prints a finished crawl.
//
// Two formats:
// - JSON: just the visited set as {"url": true, ...}, for piping into tools
// - Text: the URL list, the same JSON object, and a short summary
//
// Output goes to any `impl Write` so tests can capture it in a Vec<u8>.
// =============================================================================

use std::io::{self, Write};

use crate::crawl::CrawlReport;

/// Writes `report` to stdout.
pub fn print_report(report: &CrawlReport, json: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, json)
}

pub fn write_report(out: &mut impl Write, report: &CrawlReport, json: bool) -> io::Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(&report.to_json_map())?;
        writeln!(out, "{}", json_output)?;
        return Ok(());
    }

    write_text(out, report)
}

fn write_text(out: &mut impl Write, report: &CrawlReport) -> io::Result<()> {
    writeln!(out, "🔍 Crawled from: {}", report.seed)?;
    writeln!(out, "{}", "=".repeat(80))?;

    for url in &report.visited {
        writeln!(out, "  {}", url)?;
    }

    writeln!(out)?;
    writeln!(out, "Crawled URLs:")?;
    writeln!(out, " {}", serde_json::to_string(&report.to_json_map())?)?;
    writeln!(out)?;

    let tally = &report.tally;
    writeln!(out, "📊 Summary:")?;
    writeln!(out, "   📄 Pages recorded: {}", report.len())?;
    writeln!(out, "   🔎 Pages expanded: {}", tally.expanded)?;
    writeln!(out, "   🌐 External links: {}", tally.external.len())?;
    writeln!(out, "   ❌ Failures: {}", tally.total_failures())?;

    for failure in &tally.failures {
        writeln!(out, "      [{}] {}", failure.kind, failure.message)?;
    }

    Ok(())
}
