//! Zone locator: resolves a named logical target (e.g. the text-input
//! region) from the current detection set.
//!
//! Resolution cannot fail. If no matching detection appears after a
//! bounded number of corrective scrolls, the locator falls back to a
//! fixed, configuration-supplied coordinate - a wrong click is preferable
//! to a hung pipeline - and the fallback is logged distinctly from a
//! confident match so failures stay diagnosable.

pub mod locator;
pub mod types;

pub use locator::*;
pub use types::*;
