//! Actuation seam: pointer and keyboard effects on the target interface.
//!
//! Every operation is fire-and-forget by contract: the backing capability
//! offers no completion acknowledgment, only an assumption of eventual
//! effect. Callers must observe the [`Pacing`] settle interval after an
//! action before capturing the next frame; "did it work" is always
//! re-derived from a later independent observation.

pub mod ctx;
pub mod pacing;
pub mod traits;

pub use ctx::*;
pub use pacing::*;
pub use traits::*;
