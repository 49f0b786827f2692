use colored::Colorize;
use std::path::Path;

use crate::config::load_config;
use crate::error::Result;
use crate::sequencing::{audit, AuditReport};
use crate::utils::log::log_csv;

/// Audits the configured builder for every target count the session can
/// request, over `n_seeds` seeds each.
pub fn run(config_path: &Path, n_seeds: u64) -> Result<Vec<(u32, AuditReport)>> {
    let config = load_config(config_path)?;
    let parameters = config.sequence_parameters()?;
    let builder = config.sequence_builder()?;

    println!(
        "{} {} shapes, spacing {}, {} seeds per count",
        "Auditing".cyan().bold(),
        parameters.sequence_size,
        builder.spacing(),
        n_seeds
    );

    let mut reports = Vec::new();
    for count in parameters.min_targets..=parameters.max_targets {
        let report = audit(&builder, count as usize, count as usize, 0..n_seeds);

        let clean = report.failures == 0
            && report.with_residual_repeats == 0
            && report.cued_underflows == 0
            && report.non_cued_underflows == 0;
        let status = if clean { "ok".green() } else { "FLAGGED".red() };
        println!(
            "{:>3} targets: {} failures={} repeats={} underflow={}/{} min_gap={:?}",
            count,
            status,
            report.failures,
            report.with_residual_repeats,
            report.cued_underflows,
            report.non_cued_underflows,
            report.min_target_gap
        );

        let row = [
            count.to_string(),
            report.sequences.to_string(),
            report.failures.to_string(),
            report.with_residual_repeats.to_string(),
            report.cued_underflows.to_string(),
            report.non_cued_underflows.to_string(),
            report
                .min_target_gap
                .map(|gap| gap.to_string())
                .unwrap_or_default(),
        ];
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        log_csv(
            &config.logging.directory,
            "audit.csv",
            &[
                "targets",
                "sequences",
                "failures",
                "residual_repeats",
                "cued_underflows",
                "non_cued_underflows",
                "min_target_gap",
            ],
            &row,
        )?;

        reports.push((count, report));
    }
    Ok(reports)
}
