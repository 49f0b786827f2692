use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::planner::TrialPlan;
use crate::error::{Result, SequenceError};

/// Name of the marker stream the presentation side pushes to.
pub const STREAM: &str = "visual";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Cmd,
    Param,
}

impl MarkerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerKind::Cmd => "cmd",
            MarkerKind::Param => "param",
        }
    }
}

/// One `[stream, kind, name, value]` event marker. `value` is JSON text, or
/// empty for markers without a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub stream: String,
    pub kind: MarkerKind,
    pub name: String,
    pub value: String,
}

impl Marker {
    fn new(kind: MarkerKind, name: &str, value: String) -> Self {
        Self {
            stream: STREAM.to_string(),
            kind,
            name: name.to_string(),
            value,
        }
    }

    pub fn cmd<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Self> {
        Ok(Self::new(MarkerKind::Cmd, name, serde_json::to_string(value)?))
    }

    pub fn bare_cmd(name: &str) -> Self {
        Self::new(MarkerKind::Cmd, name, String::new())
    }

    pub fn param<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Self> {
        Ok(Self::new(MarkerKind::Param, name, serde_json::to_string(value)?))
    }

    pub fn is(&self, kind: MarkerKind, name: &str) -> bool {
        self.kind == kind && self.name == name
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.value).map_err(|e| {
            SequenceError::MalformedMarkers(format!(
                "marker '{}' holds '{}': {}",
                self.name, self.value, e
            ))
        })
    }

    pub fn fields(&self) -> [&str; 4] {
        [
            self.stream.as_str(),
            self.kind.as_str(),
            self.name.as_str(),
            self.value.as_str(),
        ]
    }

    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        let [stream, kind, name, value] = fields else {
            return Err(SequenceError::MalformedMarkers(format!(
                "expected 4 marker fields, got {}",
                fields.len()
            )));
        };
        let kind = match kind.as_ref() {
            "cmd" => MarkerKind::Cmd,
            "param" => MarkerKind::Param,
            other => {
                return Err(SequenceError::MalformedMarkers(format!(
                    "unknown marker kind '{}'",
                    other
                )))
            }
        };
        Ok(Self {
            stream: stream.as_ref().to_string(),
            kind,
            name: name.as_ref().to_string(),
            value: value.as_ref().to_string(),
        })
    }
}

// SINKS -----------------------------------------------------------------------

pub trait MarkerSink {
    fn push(&mut self, marker: Marker) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryMarkerLog {
    markers: Vec<Marker>,
}

impl MemoryMarkerLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn into_markers(self) -> Vec<Marker> {
        self.markers
    }
}

impl MarkerSink for MemoryMarkerLog {
    fn push(&mut self, marker: Marker) -> Result<()> {
        self.markers.push(marker);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct LoggedMarker {
    timestamp: String,
    marker: Vec<String>,
}

/// Appends markers as JSON lines with a local timestamp.
pub struct FileMarkerLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileMarkerLog {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarkerSink for FileMarkerLog {
    fn push(&mut self, marker: Marker) -> Result<()> {
        let entry = LoggedMarker {
            timestamp: chrono::Local::now().to_rfc3339(),
            marker: marker.fields().iter().map(|f| f.to_string()).collect(),
        };
        serde_json::to_writer(&mut self.writer, &entry)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub fn read_marker_log<P: AsRef<Path>>(path: P) -> Result<Vec<Marker>> {
    let reader = BufReader::new(File::open(path)?);
    let mut markers = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: LoggedMarker = serde_json::from_str(&line)?;
        markers.push(Marker::from_fields(&entry.marker)?);
    }
    Ok(markers)
}

// EMITTERS --------------------------------------------------------------------

pub fn emit_experiment_start(sink: &mut dyn MarkerSink) -> Result<()> {
    sink.push(Marker::bare_cmd("start_experiment"))
}

pub fn emit_experiment_stop(sink: &mut dyn MarkerSink) -> Result<()> {
    sink.push(Marker::bare_cmd("stop_experiment"))
}

pub fn emit_run_start(sink: &mut dyn MarkerSink, run: usize) -> Result<()> {
    sink.push(Marker::cmd("starting_run", &run)?)
}

pub fn emit_run_stop(sink: &mut dyn MarkerSink, run: usize) -> Result<()> {
    sink.push(Marker::cmd("stop_run", &run)?)
}

pub fn emit_run_accuracy(sink: &mut dyn MarkerSink, accuracy: f64) -> Result<()> {
    sink.push(Marker::param("run_accuracy", &accuracy)?)
}

/// Start-of-trial command followed by the parameters needed to rebuild the
/// trial's labels offline.
pub fn emit_trial_markers(sink: &mut dyn MarkerSink, plan: &TrialPlan) -> Result<()> {
    sink.push(Marker::cmd("start_trial", &plan.trial)?)?;
    sink.push(Marker::param("cued_side", plan.cued_side.as_str())?)?;
    sink.push(Marker::param("num_targets_cued", &plan.cued_target_count)?)?;
    sink.push(Marker::param("num_targets_non_cued", &plan.non_cued_target_count)?)?;
    sink.push(Marker::param("cued_sequence", &plan.sequences.cued)?)?;
    sink.push(Marker::param("non_cued_sequence", &plan.sequences.non_cued)?)
}

pub fn emit_response(sink: &mut dyn MarkerSink, response: &str) -> Result<()> {
    sink.push(Marker::cmd("stop_response", response)?)
}

pub fn emit_trial_stop(sink: &mut dyn MarkerSink, trial: usize) -> Result<()> {
    sink.push(Marker::cmd("stop_trial", &trial)?)
}
