//! CSV export for the per-group diversity breakdown.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::diversity::DiversityResult;

/// Column header for the breakdown export.
const HEADER: &str = "type,location,display_name,count,quantity,installed_current_a,\
                       installed_load_kw,diversity_factor,diversified_current_a,\
                       diversified_load_kw,formula,regulation,circuit_ids";

/// Exports a result's breakdown to a CSV file at the given path.
///
/// One row per group, in breakdown order, followed by a `total` row.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &DiversityResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes a result's breakdown as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &DiversityResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for g in &result.breakdown_by_type {
        wtr.write_record(&[
            g.load_type.to_string(),
            g.location.to_string(),
            g.display_name.clone(),
            g.count.to_string(),
            g.quantity.to_string(),
            format!("{:.4}", g.installed_current_a),
            format!("{:.4}", g.installed_load_kw),
            format!("{:.4}", g.diversity_factor),
            format!("{:.4}", g.diversified_current_a),
            format!("{:.4}", g.diversified_load_kw),
            g.formula.clone(),
            g.regulation.clone(),
            g.circuit_ids.join(";"),
        ])?;
    }

    let count: usize = result.breakdown_by_type.iter().map(|g| g.count).sum();
    let quantity: u32 = result.breakdown_by_type.iter().map(|g| g.quantity).sum();
    wtr.write_record(&[
        "total".to_string(),
        String::new(),
        "Total".to_string(),
        count.to_string(),
        quantity.to_string(),
        format!("{:.4}", result.total_design_current_a),
        format!("{:.4}", result.total_installed_load_kw),
        format!("{:.4}", result.overall_diversity_factor),
        format!("{:.4}", result.diversified_current_a),
        format!("{:.4}", result.diversified_load_kw),
        String::new(),
        String::new(),
        String::new(),
    ])?;

    wtr.flush()?;
    Ok(())
}
