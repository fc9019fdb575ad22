//! Perception seam: frame capture and labeled-region detection.
//!
//! The controller never talks to a display server or an inference backend
//! directly; it consumes the two traits defined here. An empty detection
//! result is a valid observation ("nothing recognized"), not an error.

pub mod errors;
pub mod models;
pub mod traits;

pub use errors::*;
pub use models::*;
pub use traits::*;
