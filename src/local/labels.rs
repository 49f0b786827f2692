use colored::Colorize;
use std::path::Path;

use crate::error::Result;
use crate::session::{read_marker_log, reconstruct_trials, TrialRecord};

/// Prints the cue label of every trial found in a marker log.
pub fn run(markers_path: &Path) -> Result<Vec<TrialRecord>> {
    let markers = read_marker_log(markers_path)?;
    let records = reconstruct_trials(&markers)?;

    for record in &records {
        let outcome = match record.is_correct() {
            Some(true) => "correct".green(),
            Some(false) => "wrong".red(),
            None => "-".normal(),
        };
        println!(
            "run {:>2} trial {:>2} label {} ({}) cued {:>2} {}",
            record.run.map(|run| run.to_string()).unwrap_or_default(),
            record.trial,
            record.label(),
            record.cued_side,
            record.cued_target_count,
            outcome
        );
    }
    println!("{} {} trials", "Reconstructed".green().bold(), records.len());
    Ok(records)
}
