// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the health dashboard
//!
//! Loads configuration from environment variables (and a `.env` file).

use chrono::{FixedOffset, Local, Offset, Utc};
use std::path::PathBuf;
use std::time::Duration;


/// Default configuration values
pub mod defaults {
    pub const SERVER_ADDR: &str = "127.0.0.1:9091";
    pub const FETCH_TIMEOUT_SECS: u64 = 30;
    pub const RENDER_TO_STDOUT: bool = true;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const HEALTH_FIXTURE: &str = "HEALTH_FIXTURE";
    pub const UTC_OFFSET: &str = "UTC_OFFSET";
    pub const FETCH_TIMEOUT_SECONDS: &str = "FETCH_TIMEOUT_SECONDS";
    pub const RENDER_TO_STDOUT: &str = "RENDER_TO_STDOUT";
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    /// JSON fixture for the in-memory provider; `None` starts an empty store
    pub fixture_path: Option<PathBuf>,
    /// Offset used for "start of day" and for displayed timestamps
    pub utc_offset: FixedOffset,
    pub fetch_timeout_secs: u64,
    pub render_to_stdout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: defaults::SERVER_ADDR.to_string(),
            fixture_path: None,
            utc_offset: local_offset(),
            fetch_timeout_secs: defaults::FETCH_TIMEOUT_SECS,
            render_to_stdout: defaults::RENDER_TO_STDOUT,
        }
    }
}

/// Current offset of the system timezone
fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// Parses `+HH:MM`, `-HH:MM`, `Z` or `UTC`
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    raw.parse::<FixedOffset>()
        .map_err(|e| format!("Invalid UTC offset '{raw}': {e}, expected '+HH:MM'"))
}

impl Config {
    /// Loads configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let server_addr = std::env::var(env_vars::SERVER_ADDR)
            .unwrap_or_else(|_| defaults::SERVER_ADDR.to_string());

        let fixture_path = std::env::var(env_vars::HEALTH_FIXTURE)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        if fixture_path.is_none() {
            tracing::warn!(
                "No {} configured. Dashboard will start with an empty health store.",
                env_vars::HEALTH_FIXTURE
            );
        }

        let utc_offset = match std::env::var(env_vars::UTC_OFFSET) {
            Ok(raw) => parse_utc_offset(&raw).unwrap_or_else(|e| {
                tracing::warn!("{}. Using system offset.", e);
                local_offset()
            }),
            Err(_) => local_offset(),
        };

        let fetch_timeout_secs = std::env::var(env_vars::FETCH_TIMEOUT_SECONDS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::FETCH_TIMEOUT_SECS);

        let render_to_stdout = std::env::var(env_vars::RENDER_TO_STDOUT)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults::RENDER_TO_STDOUT);

        Config {
            server_addr,
            fixture_path,
            utc_offset,
            fetch_timeout_secs,
            render_to_stdout,
        }
    }

    /// Validates configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 {
            return Err("Fetch timeout must be greater than zero".to_string());
        }

        if !self.server_addr.contains(':') {
            return Err(format!(
                "Invalid server address '{}': expected 'host:port'",
                self.server_addr
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
