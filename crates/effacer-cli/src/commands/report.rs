//! Human readable summary of a run

use std::fmt::Write;

use effacer_engine::RunReport;

pub fn render(report: &RunReport) -> String {
    let mut out = String::new();

    let verb = if report.written { "Effaced" } else { "Would efface" };
    let _ = writeln!(
        out,
        "{} {} -> {}",
        verb,
        report.input.display(),
        report.output.display()
    );
    let _ = writeln!(out, "Session: {}", report.session_id);

    if report.ledger.is_empty() {
        let _ = writeln!(out, "\nNothing to efface.");
    } else {
        let _ = writeln!(out, "\n  {:<20} {:>8} {:>12}", "category", "count", "saved");
        for (category, tally) in report.ledger.iter() {
            let _ = writeln!(
                out,
                "  {:<20} {:>8} {:>12}",
                category.label(),
                tally.count,
                format_bytes(tally.bytes_saved)
            );
        }
        let _ = writeln!(
            out,
            "  {:<20} {:>8} {:>12}",
            "total",
            report.ledger.total_count(),
            format_bytes(report.ledger.total_bytes_saved())
        );
    }

    let stats = &report.stats;
    let _ = writeln!(
        out,
        "\nRecords: {} read, {} dropped, {} reparented, {} rerooted, {} orphans promoted, {} malformed kept",
        stats.records,
        stats.dropped_total(),
        stats.reparented,
        stats.rerooted,
        stats.orphans_promoted,
        stats.malformed
    );
    let _ = writeln!(
        out,
        "Size: {} -> {} (-{:.1}%)",
        format_bytes(report.input_bytes),
        format_bytes(report.output_bytes),
        report.reduction_percent()
    );

    out
}

fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}
