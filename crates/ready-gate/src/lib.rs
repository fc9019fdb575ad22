//! Readiness gate: decides, from noisy rate-limited observations, when the
//! target interface is in a known ready state.
//!
//! Three clocks govern one wait: the poll interval paces observations, the
//! soft timeout converts a long silence into assumed readiness (the
//! detector's recall is known to be imperfect), and the hard timeout bounds
//! the wait unconditionally. The gate never blocks indefinitely and never
//! lets a collaborator fault escape - capture and detector errors fold into
//! the timeout clock.

pub mod gate;
pub mod types;

pub use gate::*;
pub use types::*;
