use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

use crate::config::load_config;
use crate::error::Result;
use crate::session::{
    emit_experiment_start, emit_experiment_stop, emit_run_start, emit_run_stop,
    emit_trial_markers, emit_trial_stop, write_plan_csv, FileMarkerLog, SessionPlanner,
    TrialPlan,
};
use crate::utils::log::log_with_header;

/// Plans a full session from `config_path` and writes `plan.csv` and
/// `markers.jsonl` into `out_dir`.
pub fn run(config_path: &Path, out_dir: &Path) -> Result<Vec<TrialPlan>> {
    let config = load_config(config_path)?;
    let planner = SessionPlanner::new(&config)?;
    let parameters = *planner.parameters();

    let seed = config.session.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    println!(
        "{} {} trials x {} runs, {} shapes per sequence, {}..{} targets (seed {})",
        "Planning".green().bold(),
        config.session.n_trials,
        config.session.n_runs,
        parameters.sequence_size,
        parameters.min_targets,
        parameters.max_targets,
        seed
    );

    let session = planner.plan_session(&mut rng)?;

    fs::create_dir_all(out_dir)?;
    let mut markers = FileMarkerLog::create(out_dir.join("markers.jsonl"))?;
    emit_experiment_start(&mut markers)?;
    for (index, run) in session.iter().enumerate() {
        emit_run_start(&mut markers, index + 1)?;
        for plan in run {
            emit_trial_markers(&mut markers, plan)?;
            emit_trial_stop(&mut markers, plan.trial)?;
            if config.logging.verbose {
                println!(
                    "run {:>2} trial {:>2} {} cued {:>2} / non-cued {:>2}",
                    plan.run,
                    plan.trial,
                    plan.cued_side.glyph(),
                    plan.cued_target_count,
                    plan.non_cued_target_count
                );
            }
        }
        emit_run_stop(&mut markers, index + 1)?;
    }
    emit_experiment_stop(&mut markers)?;

    let plans: Vec<TrialPlan> = session.into_iter().flatten().collect();
    write_plan_csv(out_dir.join("plan.csv"), &plans)?;

    let summary = format!(
        "config: {}\nseed: {}\nparameters: {:?}\ntrials planned: {}",
        config_path.display(),
        seed,
        parameters,
        plans.len()
    );
    log_with_header(&config.logging.directory, "sessions.log", "session plan", &summary)?;

    println!(
        "{} {} trials to {}",
        "Wrote".green().bold(),
        plans.len(),
        out_dir.display()
    );
    Ok(plans)
}
