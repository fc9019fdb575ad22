//! Artifact path builders

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// One directory per step, named after it (path separators stripped so a
/// step name can never escape the trace root).
pub fn step_dir(root: &Path, step: &str) -> PathBuf {
    let safe: String = step
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    root.join(safe)
}

pub fn raw_path(dir: &Path, ordinal: u64, ts: DateTime<Utc>) -> PathBuf {
    dir.join(format!("{}.png", stem(ordinal, ts)))
}

pub fn annotated_path(dir: &Path, ordinal: u64, ts: DateTime<Utc>) -> PathBuf {
    dir.join(format!("{}_ann.png", stem(ordinal, ts)))
}

pub fn detections_path(dir: &Path, ordinal: u64, ts: DateTime<Utc>) -> PathBuf {
    dir.join(format!("{}_dets.json", stem(ordinal, ts)))
}

// The ordinal comes from the writer's own counter, so lexical filename
// order is chronological even when several polls land in one millisecond.
fn stem(ordinal: u64, ts: DateTime<Utc>) -> String {
    format!("poll_{:05}_{}", ordinal, ts.format("%Y%m%d_%H%M%S_%3f"))
}
