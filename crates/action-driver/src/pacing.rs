//! Settle intervals between actuation and the next observation

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long to let the target interface settle during the submit
/// sequence before the next action or capture. The actuator gives no
/// acknowledgment, so these pauses are the only synchronization
/// available. Post-scroll settling belongs to the zone locator's own
/// config, not here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pacing {
    /// Pause after focusing (move + click) an input region
    pub after_click: Duration,

    /// Pause after delivering text, before the commit key
    pub after_text: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_click: Duration::from_millis(200),
            after_text: Duration::from_millis(200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacing_defaults() {
        let pacing = Pacing::default();
        assert_eq!(pacing.after_click, Duration::from_millis(200));
        assert_eq!(pacing.after_text, Duration::from_millis(200));
    }
}
