//! Filesystem trace writer

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use perceiver_frame::DetectionSet;
use serde::Serialize;
use tracing::warn;

use crate::annotate;
use crate::errors::TraceError;
use crate::layout;
use crate::recorder::{PollRecord, PollRecorder};

/// Writes one raw frame, one annotated frame, and one structured detection
/// dump per poll, under `<root>/<step>/`. Artifacts are append-only and
/// retained until external cleanup.
#[derive(Debug)]
pub struct TraceWriter {
    root: PathBuf,
    // Filename ordinal; strictly increasing across all phases of a run so
    // the on-disk order is the observation order.
    counter: AtomicU64,
}

impl TraceWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            counter: AtomicU64::new(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn try_record(&self, step: &str, seq: u32, record: &PollRecord<'_>) -> Result<(), TraceError> {
        let dir = layout::step_dir(&self.root, step);
        let ordinal = self.counter.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();

        match record {
            PollRecord::Observed { frame, detections } => {
                write_atomic(layout::raw_path(&dir, ordinal, now), &frame.data)?;
                // A broken annotation must not cost us the structured dump.
                match annotate::render(frame, detections) {
                    Ok(png) => {
                        write_atomic(layout::annotated_path(&dir, ordinal, now), &png)?;
                    }
                    Err(err) => {
                        warn!("annotate failed for step {} poll {}: {}", step, seq, err);
                    }
                }
                self.write_dump(&dir, ordinal, seq, now, "observed", None, Some(detections))
            }
            PollRecord::CaptureFailed { error } => self.write_dump(
                &dir,
                ordinal,
                seq,
                now,
                "capture_failed",
                Some(error.to_string()),
                None,
            ),
            PollRecord::DetectFailed { frame, error } => {
                write_atomic(layout::raw_path(&dir, ordinal, now), &frame.data)?;
                self.write_dump(
                    &dir,
                    ordinal,
                    seq,
                    now,
                    "detect_failed",
                    Some(error.to_string()),
                    None,
                )
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn write_dump(
        &self,
        dir: &Path,
        ordinal: u64,
        seq: u32,
        ts: DateTime<Utc>,
        kind: &'static str,
        error: Option<String>,
        detections: Option<&DetectionSet>,
    ) -> Result<(), TraceError> {
        let dump = PollDump {
            seq,
            recorded_at: ts,
            kind,
            error,
            detections,
        };
        let data =
            serde_json::to_vec_pretty(&dump).map_err(|err| TraceError::Encode(err.to_string()))?;
        write_atomic(layout::detections_path(dir, ordinal, ts), &data)?;
        Ok(())
    }
}

impl PollRecorder for TraceWriter {
    fn record(&self, step: &str, seq: u32, record: PollRecord<'_>) {
        if let Err(err) = self.try_record(step, seq, &record) {
            warn!("trace write failed for step {} poll {}: {}", step, seq, err);
        }
    }
}

#[derive(Serialize)]
struct PollDump<'a> {
    seq: u32,
    recorded_at: DateTime<Utc>,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detections: Option<&'a DetectionSet>,
}

fn write_atomic(path: PathBuf, data: &[u8]) -> Result<PathBuf, TraceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(tmp, &path)?;
    Ok(path)
}
