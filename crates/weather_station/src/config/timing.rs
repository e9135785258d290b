//! Timing configuration for fetch and render cycles

use lazy_static::lazy_static;
use std::env;

/// Fetch timing configuration
#[derive(Debug, Clone)]
pub struct FetchTiming {
    /// Seconds between dashboard refresh cycles
    pub refresh_secs: u64,
    /// Per-request HTTP timeout in seconds
    pub http_timeout_secs: u64,
    /// Seconds the SGP30 is given to stabilize after init
    pub sgp30_warmup_secs: u64,
}

impl Default for FetchTiming {
    fn default() -> Self {
        Self {
            refresh_secs: env::var("INKWX_REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            http_timeout_secs: env::var("INKWX_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            sgp30_warmup_secs: env::var("INKWX_SGP30_WARMUP_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
        }
    }
}

lazy_static! {
    /// Global timing configuration, read from the environment once
    pub static ref FETCH_TIMING: FetchTiming = FetchTiming::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = FetchTiming::default();
        assert!(timing.refresh_secs > 0);
        assert!(timing.http_timeout_secs > 0);
    }
}
