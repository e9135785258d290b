//! Shared HTTP client construction
//!
//! api.weather.gov rejects requests without a User-Agent, so every remote
//! client is built through here.

use std::time::Duration;

use crate::config::FETCH_TIMING;
use crate::error::Result;

const USER_AGENT: &str = concat!("inkwx/", env!("CARGO_PKG_VERSION"), " (home weather station)");

/// Build the reqwest client used by all remote API clients
pub fn build_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(FETCH_TIMING.http_timeout_secs))
        .build()?;
    Ok(client)
}
