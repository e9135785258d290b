//! API key loading
//!
//! Keys live in local plaintext files, one key per file. An environment
//! variable with the literal key takes precedence over the file.

use std::env;
use std::fs;
use std::path::Path;

use crate::error::{Result, StationError};

/// Default key file for OpenWeatherMap (weather and air pollution)
pub const DEFAULT_OWM_KEY_FILE: &str = "/private/keys/openweather.txt";
/// Default key file for AirNow
pub const DEFAULT_AIRNOW_KEY_FILE: &str = "/private/keys/aqi.txt";

/// Read and trim an API key from a plaintext file
pub fn load_key(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)?;
    let key = raw.trim().to_string();
    if key.is_empty() {
        return Err(StationError::MissingData(format!(
            "key file {} is empty",
            path.display()
        )));
    }
    Ok(key)
}

/// Resolve a key from an environment variable, falling back to a key file
pub fn resolve_key(env_var: &str, path: &Path) -> Result<String> {
    if let Ok(key) = env::var(env_var) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            return Ok(key);
        }
    }
    load_key(path)
}
