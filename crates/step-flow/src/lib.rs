//! Step executor: one named unit of work against the target interface.
//!
//! Composes readiness gate -> zone locator -> submit -> readiness gate
//! into an explicit state machine with typed outcomes. The only
//! completion signal available is the interface returning to a known
//! ready state; submission itself is fire-and-forget. There is no
//! whole-step retry here - re-running a failed step is a caller decision,
//! safe only if submission is idempotent from the interface's side.

pub mod executor;
pub mod types;

pub use executor::*;
pub use types::*;
