//! Run log: persists every poll's frame and detection result for post-hoc
//! audit. This is the only trail available to diagnose missed detections
//! after the fact.
//!
//! Recording is a pure side effect: a persistence failure is logged and
//! swallowed, never surfaced to the automation run.

mod annotate;
mod errors;
mod layout;
mod recorder;
mod writer;

pub use errors::TraceError;
pub use recorder::{NullRecorder, PollRecord, PollRecorder};
pub use writer::TraceWriter;
