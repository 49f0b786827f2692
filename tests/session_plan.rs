use cvep_attention::config::{load_config, save_config, ExperimentConfig};
use cvep_attention::session::{
    cue_labels, emit_experiment_start, emit_experiment_stop, emit_response, emit_run_accuracy,
    emit_run_start, emit_run_stop, emit_trial_markers, emit_trial_stop, read_marker_log,
    reconstruct_trials, run_accuracy, score_response, write_plan_csv, FileMarkerLog, MarkerKind,
    MarkerSink, MemoryMarkerLog, SessionPlanner, TrialPlan,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("cvep-session-{}-{}-{}", tag, std::process::id(), nanos))
}

fn small_session() -> Vec<Vec<TrialPlan>> {
    let mut config = ExperimentConfig::default();
    config.session.n_trials = 6;
    config.session.n_runs = 2;
    let planner = SessionPlanner::new(&config).unwrap();
    planner.plan_session(&mut StdRng::seed_from_u64(99)).unwrap()
}

fn record(sink: &mut dyn MarkerSink, session: &[Vec<TrialPlan>]) {
    emit_experiment_start(sink).unwrap();
    for (index, run) in session.iter().enumerate() {
        emit_run_start(sink, index + 1).unwrap();
        let mut outcomes = Vec::new();
        for plan in run {
            emit_trial_markers(sink, plan).unwrap();
            // every other trial answers with the non-cued count
            let response = if plan.trial % 2 == 0 {
                plan.non_cued_target_count.to_string()
            } else {
                plan.cued_target_count.to_string()
            };
            emit_response(sink, &response).unwrap();
            outcomes.push(score_response(&response, plan.cued_target_count));
            emit_trial_stop(sink, plan.trial).unwrap();
        }
        emit_run_accuracy(sink, run_accuracy(&outcomes)).unwrap();
        emit_run_stop(sink, index + 1).unwrap();
    }
    emit_experiment_stop(sink).unwrap();
}

#[test]
fn markers_rebuild_the_planned_trials() {
    let session = small_session();
    let mut log = MemoryMarkerLog::new();
    record(&mut log, &session);

    let records = reconstruct_trials(log.markers()).unwrap();
    let plans: Vec<&TrialPlan> = session.iter().flatten().collect();
    assert_eq!(records.len(), plans.len());

    for (record, plan) in records.iter().zip(&plans) {
        assert_eq!(record.run, Some(plan.run));
        assert_eq!(record.trial, plan.trial);
        assert_eq!(record.cued_side, plan.cued_side);
        assert_eq!(record.cued_target_count, plan.cued_target_count);
        assert_eq!(record.non_cued_target_count, plan.non_cued_target_count);
        assert_eq!(record.cued_sequence, plan.sequences.cued);
        assert_eq!(record.non_cued_sequence, plan.sequences.non_cued);
        assert_eq!(record.is_correct(), Some(plan.trial % 2 == 1));
        assert_eq!(record.label(), plan.cued_side.label());
    }

    let labels = cue_labels(log.markers()).unwrap();
    assert_eq!(labels.iter().filter(|&&l| l == 1).count(), 6);

    let accuracies: Vec<f64> = log
        .markers()
        .iter()
        .filter(|marker| marker.is(MarkerKind::Param, "run_accuracy"))
        .map(|marker| marker.decode().unwrap())
        .collect();
    assert_eq!(accuracies, vec![50.0, 50.0]);

    let stops: Vec<usize> = log
        .markers()
        .iter()
        .enumerate()
        .filter(|(_, marker)| marker.is(MarkerKind::Cmd, "stop_run"))
        .map(|(index, _)| index)
        .collect();
    for stop in stops {
        assert!(log.markers()[stop - 1].is(MarkerKind::Param, "run_accuracy"));
    }
}

#[test]
fn file_marker_log_round_trips() {
    let dir = unique_temp_dir("markers");
    let path = dir.join("markers.jsonl");
    let session = small_session();
    {
        let mut log = FileMarkerLog::create(&path).unwrap();
        record(&mut log, &session);
    }

    let mut memory = MemoryMarkerLog::new();
    record(&mut memory, &session);
    assert_eq!(read_marker_log(&path).unwrap(), memory.into_markers());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn plan_csv_has_a_row_per_trial() {
    let dir = unique_temp_dir("csv");
    fs::create_dir_all(&dir).unwrap();
    let plans: Vec<TrialPlan> = small_session().into_iter().flatten().collect();
    write_plan_csv(dir.join("plan.csv"), &plans).unwrap();

    let mut reader = csv::Reader::from_path(dir.join("plan.csv")).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "run");
    assert_eq!(&headers[2], "cued_side");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), plans.len());
    for (row, plan) in rows.iter().zip(&plans) {
        assert_eq!(&row[2], plan.cued_side.as_str());
        assert_eq!(row[7].len(), plan.sequences.len());
        assert_eq!(row[7].matches('h').count(), plan.cued_target_count as usize);
    }
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn config_survives_a_yaml_round_trip() {
    let dir = unique_temp_dir("config");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("experiment.yaml");

    let mut config = ExperimentConfig::default();
    config.session.seed = Some(7);
    config.session.n_trials = 12;
    save_config(&config, &path).unwrap();
    assert_eq!(load_config(&path).unwrap(), config);

    fs::write(&path, "session:\n  n_trials: 8\n").unwrap();
    let partial = load_config(&path).unwrap();
    assert_eq!(partial.session.n_trials, 8);
    assert_eq!(partial.timing, ExperimentConfig::default().timing);
    fs::remove_dir_all(&dir).ok();
}
