// src/config/mod.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SequenceError};
use crate::sequencing::{
    Alphabet, RepairStrategy, SequenceBuilder, Shape, ShapeTable, TargetCountAllocator,
    UnderflowPolicy, DEFAULT_MIN_TARGET_SPACING,
};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub stimulus: StimulusConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Screen refresh rate in Hz.
    pub frame_rate: f64,
    /// Rate at which the flicker code advances, in Hz.
    pub presentation_rate: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            presentation_rate: 60.0,
        }
    }
}

/// Phase durations in seconds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub cue_time: f64,
    pub trial_time: f64,
    pub response_time: f64,
    pub feedback_time: f64,
    pub iti_time: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cue_time: 1.0,
            trial_time: 20.0,
            response_time: 5.0,
            feedback_time: 1.0,
            iti_time: 1.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StimulusConfig {
    pub shapes: Vec<Shape>,
    pub target: Shape,
    /// Seconds between two shape changes.
    pub shape_change_time: f64,
    /// Minimum time between two targets, expressed in shape changes.
    pub min_target_gap_shapes: f64,
    /// Minimum number of positions between two targets in a sequence.
    pub min_target_spacing: usize,
    pub colors: Vec<String>,
    pub images_dir: PathBuf,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            shapes: Shape::ALL.to_vec(),
            target: Shape::Hourglass,
            shape_change_time: 0.25,
            min_target_gap_shapes: 6.0,
            min_target_spacing: DEFAULT_MIN_TARGET_SPACING,
            colors: vec!["black".to_string(), "white".to_string()],
            images_dir: PathBuf::from("images"),
        }
    }
}

impl StimulusConfig {
    pub fn alphabet(&self) -> Result<Alphabet<Shape>> {
        Alphabet::new(self.shapes.clone(), self.target)
    }

    /// `<images_dir>/<code>_<color>.png` for every shape and color.
    pub fn image_paths(&self) -> ShapeTable<Vec<PathBuf>> {
        ShapeTable::from_fn(|shape| {
            self.colors
                .iter()
                .map(|color| self.images_dir.join(format!("{}_{}.png", shape, color)))
                .collect()
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub n_trials: usize,
    pub n_runs: usize,
    pub seed: Option<u64>,
    pub max_allocation_attempts: usize,
    pub repair: RepairStrategy,
    pub underflow: UnderflowPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            n_trials: 20,
            n_runs: 5,
            seed: None,
            max_allocation_attempts: crate::sequencing::allocator::DEFAULT_MAX_ATTEMPTS,
            repair: RepairStrategy::default(),
            underflow: UnderflowPolicy::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub verbose: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            verbose: false,
        }
    }
}

/// Quantities derived from the display, timing and stimulus settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SequenceParameters {
    pub frames_per_shape: usize,
    pub total_frames: usize,
    pub sequence_size: usize,
    /// Minimum time between two targets in seconds.
    pub min_target_interval: f64,
    pub min_targets: u32,
    pub max_targets: u32,
}

impl ExperimentConfig {
    pub fn sequence_parameters(&self) -> Result<SequenceParameters> {
        let frame_rate = self.display.frame_rate;
        let trial_time = self.timing.trial_time;
        let shape_change_time = self.stimulus.shape_change_time;

        if !(frame_rate > 0.0) || !(trial_time > 0.0) || !(shape_change_time > 0.0) {
            return Err(SequenceError::invalid(
                "frame rate, trial time and shape change time must be positive",
            ));
        }

        let frames_per_shape = (shape_change_time * frame_rate) as usize;
        if frames_per_shape == 0 {
            return Err(SequenceError::invalid(format!(
                "a shape change every {}s is shorter than one frame at {}Hz",
                shape_change_time, frame_rate
            )));
        }

        let total_frames = (trial_time * frame_rate) as usize;
        let sequence_size = (total_frames + frames_per_shape - 1) / frames_per_shape;

        let min_target_interval = self.stimulus.min_target_gap_shapes * shape_change_time;
        if !(min_target_interval > 0.0) {
            return Err(SequenceError::invalid("minimum target gap must be positive"));
        }
        let max_targets = (trial_time / min_target_interval) as u32;
        let min_targets = max_targets / 3;

        Ok(SequenceParameters {
            frames_per_shape,
            total_frames,
            sequence_size,
            min_target_interval,
            min_targets,
            max_targets,
        })
    }

    pub fn sequence_builder(&self) -> Result<SequenceBuilder<Shape>> {
        let parameters = self.sequence_parameters()?;
        Ok(
            SequenceBuilder::new(self.stimulus.alphabet()?, parameters.sequence_size)?
                .min_target_spacing(self.stimulus.min_target_spacing)
                .repair(self.session.repair)
                .underflow(self.session.underflow),
        )
    }

    pub fn allocator(&self) -> Result<TargetCountAllocator> {
        let parameters = self.sequence_parameters()?;
        Ok(
            TargetCountAllocator::new(parameters.min_targets, parameters.max_targets)?
                .max_attempts(self.session.max_allocation_attempts),
        )
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| SequenceError::Config(format!("Failed to read config file: {}", e)))?;

    serde_yaml::from_str(&config_str)
        .map_err(|e| SequenceError::Config(format!("Failed to parse config file: {}", e)))
}

pub fn save_config<P: AsRef<Path>>(config: &ExperimentConfig, path: P) -> Result<()> {
    let yaml = serde_yaml::to_string(config)
        .map_err(|e| SequenceError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, yaml)
        .map_err(|e| SequenceError::Config(format!("Failed to write config file: {}", e)))
}
