use serde::Serialize;
use std::path::Path;

use super::planner::TrialPlan;
use crate::error::Result;
use crate::sequencing::Shape;

#[derive(Serialize)]
struct PlanRow<'a> {
    run: usize,
    trial: usize,
    cued_side: &'a str,
    cued_target_count: u32,
    non_cued_target_count: u32,
    cued_placed: usize,
    non_cued_placed: usize,
    cued_sequence: String,
    non_cued_sequence: String,
}

fn codes(sequence: &[Shape]) -> String {
    sequence.iter().map(|shape| shape.code()).collect()
}

/// Writes one row per planned trial, sequences as strings of shape codes.
pub fn write_plan_csv<P: AsRef<Path>>(path: P, plans: &[TrialPlan]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for plan in plans {
        writer.serialize(PlanRow {
            run: plan.run,
            trial: plan.trial,
            cued_side: plan.cued_side.as_str(),
            cued_target_count: plan.cued_target_count,
            non_cued_target_count: plan.non_cued_target_count,
            cued_placed: plan.sequences.cued_placed,
            non_cued_placed: plan.sequences.non_cued_placed,
            cued_sequence: codes(&plan.sequences.cued),
            non_cued_sequence: codes(&plan.sequences.non_cued),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_render_as_code_strings() {
        assert_eq!(
            codes(&[Shape::Rectangle, Shape::Hourglass, Shape::Triangle]),
            "rht"
        );
    }
}
