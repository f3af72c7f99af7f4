use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub store_path: PathBuf,
    pub request_timeout: Duration,
    pub profile: String,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());

        let store_path = env::var("SPICE_PILOT_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_store_path(&profile));

        Self {
            api_url: env::var("SPICE_PILOT_API_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            store_path,
            request_timeout: Duration::from_secs(
                env::var("SPICE_PILOT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            profile,
        }
    }
}

/// Preference file location, one file per profile
fn default_store_path(profile: &str) -> PathBuf {
    let filename = if profile == "default" {
        "preferences.json".to_string()
    } else {
        format!("preferences_{}.json", profile)
    };
    // On macOS: ~/Library/Caches/SpicePilot/preferences.json
    // On Windows: %LOCALAPPDATA%\SpicePilot\preferences.json
    // Elsewhere: ~/.cache/spicepilot/preferences.json

    #[cfg(target_os = "macos")]
    let base = env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join("Library")
            .join("Caches")
            .join("SpicePilot")
    });

    #[cfg(target_os = "windows")]
    let base = env::var("LOCALAPPDATA")
        .ok()
        .map(|appdata| PathBuf::from(appdata).join("SpicePilot"));

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let base = env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".cache").join("spicepilot"));

    base.unwrap_or_else(|| PathBuf::from(".")).join(filename)
}
