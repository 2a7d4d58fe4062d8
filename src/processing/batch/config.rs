use std::time::Duration;
use serde::{Serialize, Deserialize};

/// Options for how a run paces itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Pause between items, e.g. to rate-limit codec load. Zero disables it.
    pub throttle: Duration,
}

impl RunOptions {
    pub fn with_throttle(throttle: Duration) -> Self {
        Self { throttle }
    }
}
