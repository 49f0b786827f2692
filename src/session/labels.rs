use serde::Serialize;

use super::cue::CueSide;
use super::markers::{Marker, MarkerKind};
use super::scoring::score_response;
use crate::error::{Result, SequenceError};
use crate::sequencing::Shape;

/// A trial as recovered from the marker stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRecord {
    pub run: Option<usize>,
    pub trial: usize,
    pub cued_side: CueSide,
    pub cued_target_count: u32,
    pub non_cued_target_count: u32,
    pub cued_sequence: Vec<Shape>,
    pub non_cued_sequence: Vec<Shape>,
    pub response: Option<String>,
}

impl TrialRecord {
    pub fn label(&self) -> u8 {
        self.cued_side.label()
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.response
            .as_deref()
            .map(|response| score_response(response, self.cued_target_count))
    }
}

#[derive(Default)]
struct PartialRecord {
    run: Option<usize>,
    trial: usize,
    cued_side: Option<CueSide>,
    cued_target_count: Option<u32>,
    non_cued_target_count: Option<u32>,
    cued_sequence: Option<Vec<Shape>>,
    non_cued_sequence: Option<Vec<Shape>>,
    response: Option<String>,
}

impl PartialRecord {
    fn finish(self) -> Result<TrialRecord> {
        let trial = self.trial;
        let missing = |field: &str| {
            SequenceError::MalformedMarkers(format!("trial {} has no {} marker", trial, field))
        };
        Ok(TrialRecord {
            run: self.run,
            trial,
            cued_side: self.cued_side.ok_or_else(|| missing("cued_side"))?,
            cued_target_count: self
                .cued_target_count
                .ok_or_else(|| missing("num_targets_cued"))?,
            non_cued_target_count: self
                .non_cued_target_count
                .ok_or_else(|| missing("num_targets_non_cued"))?,
            cued_sequence: self.cued_sequence.ok_or_else(|| missing("cued_sequence"))?,
            non_cued_sequence: self
                .non_cued_sequence
                .ok_or_else(|| missing("non_cued_sequence"))?,
            response: self.response,
        })
    }
}

/// Rebuilds per-trial records from a marker stream. Markers unrelated to
/// trial parameters are skipped.
pub fn reconstruct_trials(markers: &[Marker]) -> Result<Vec<TrialRecord>> {
    let mut records = Vec::new();
    let mut run = None;
    let mut current: Option<PartialRecord> = None;

    for marker in markers {
        match (marker.kind, marker.name.as_str()) {
            (MarkerKind::Cmd, "starting_run") => run = Some(marker.decode()?),
            (MarkerKind::Cmd, "start_trial") => {
                if let Some(previous) = current.take() {
                    records.push(previous.finish()?);
                }
                current = Some(PartialRecord {
                    run,
                    trial: marker.decode()?,
                    ..PartialRecord::default()
                });
            }
            (MarkerKind::Param, "cued_side") => {
                let value: String = marker.decode()?;
                open(&mut current, marker)?.cued_side = Some(CueSide::parse(&value)?);
            }
            (MarkerKind::Param, "num_targets_cued") => {
                open(&mut current, marker)?.cued_target_count = Some(marker.decode()?);
            }
            (MarkerKind::Param, "num_targets_non_cued") => {
                open(&mut current, marker)?.non_cued_target_count = Some(marker.decode()?);
            }
            (MarkerKind::Param, "cued_sequence") => {
                open(&mut current, marker)?.cued_sequence = Some(marker.decode()?);
            }
            (MarkerKind::Param, "non_cued_sequence") => {
                open(&mut current, marker)?.non_cued_sequence = Some(marker.decode()?);
            }
            (MarkerKind::Cmd, "stop_response") => {
                open(&mut current, marker)?.response = Some(marker.decode()?);
            }
            _ => {}
        }
    }

    if let Some(last) = current {
        records.push(last.finish()?);
    }
    Ok(records)
}

fn open<'a>(current: &'a mut Option<PartialRecord>, marker: &Marker) -> Result<&'a mut PartialRecord> {
    current.as_mut().ok_or_else(|| {
        SequenceError::MalformedMarkers(format!("'{}' marker before any start_trial", marker.name))
    })
}

/// One label per trial, right cue = 1.
pub fn cue_labels(markers: &[Marker]) -> Result<Vec<u8>> {
    Ok(reconstruct_trials(markers)?
        .iter()
        .map(TrialRecord::label)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(n: usize, side: &str) -> Vec<Marker> {
        vec![
            Marker::cmd("start_trial", &n).unwrap(),
            Marker::param("cued_side", side).unwrap(),
            Marker::param("num_targets_cued", &4u32).unwrap(),
            Marker::param("num_targets_non_cued", &3u32).unwrap(),
            Marker::param("cued_sequence", &["r", "h", "c"]).unwrap(),
            Marker::param("non_cued_sequence", &["i", "t", "h"]).unwrap(),
            Marker::bare_cmd("start_cue"),
        ]
    }

    #[test]
    fn records_follow_start_trial_markers() {
        let mut markers = vec![
            Marker::bare_cmd("start_experiment"),
            Marker::cmd("starting_run", &2usize).unwrap(),
        ];
        markers.extend(trial(1, "LEFT"));
        markers.push(Marker::cmd("stop_response", "4").unwrap());
        markers.extend(trial(2, "RIGHT"));

        let records = reconstruct_trials(&markers).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].run, Some(2));
        assert_eq!(records[0].cued_sequence, vec![Shape::Rectangle, Shape::Hourglass, Shape::Circle]);
        assert_eq!(records[0].is_correct(), Some(true));
        assert_eq!(records[1].is_correct(), None);
        assert_eq!(cue_labels(&markers).unwrap(), vec![0, 1]);
    }

    #[test]
    fn params_before_a_trial_are_malformed() {
        let markers = vec![Marker::param("cued_side", "LEFT").unwrap()];
        assert!(matches!(
            reconstruct_trials(&markers),
            Err(SequenceError::MalformedMarkers(_))
        ));
    }

    #[test]
    fn incomplete_trials_are_malformed() {
        let markers = vec![
            Marker::cmd("start_trial", &1usize).unwrap(),
            Marker::param("cued_side", "LEFT").unwrap(),
        ];
        let err = reconstruct_trials(&markers).unwrap_err();
        assert!(err.to_string().contains("num_targets_cued"));
    }
}
