//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup into [`Config`], which is then shared
//! through `AppState`. Nothing reads the environment after that.

use crate::models::{EmissionFactors, TransportMode};
use std::env;

/// Minimum length of the session signing key, in bytes.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Where projects and activities are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Cloud Firestore (or its emulator, via FIRESTORE_EMULATOR_HOST)
    Firestore,
    /// Process-local store for development; lost on restart
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    pub storage: StorageBackend,
    /// Shared HS256 key the auth provider signs session tokens with
    pub session_signing_key: Vec<u8>,
    /// kg CO₂ per passenger-km for each transport mode
    pub emission_factors: EmissionFactors,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let storage = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("memory") => StorageBackend::Memory,
            Ok("firestore") | Err(_) => StorageBackend::Firestore,
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    reason: format!("expected 'firestore' or 'memory', got '{}'", other),
                })
            }
        };

        let session_signing_key = env::var("SESSION_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
            .trim()
            .as_bytes()
            .to_vec();
        if session_signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ConfigError::Invalid {
                name: "SESSION_SIGNING_KEY",
                reason: format!("must be at least {} bytes", MIN_SIGNING_KEY_LEN),
            });
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage,
            session_signing_key,
            emission_factors: emission_factors_from_env()?,
        })
    }

    /// Deterministic config for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage: StorageBackend::Memory,
            session_signing_key: b"test_session_key_32_bytes_minimum!!".to_vec(),
            emission_factors: EmissionFactors::default(),
        }
    }
}

fn factor_var(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Car => "EMISSION_FACTOR_CAR",
        TransportMode::Bus => "EMISSION_FACTOR_BUS",
        TransportMode::Train => "EMISSION_FACTOR_TRAIN",
        TransportMode::Boat => "EMISSION_FACTOR_BOAT",
    }
}

/// Start from the built-in table and apply any `EMISSION_FACTOR_*` overrides.
fn emission_factors_from_env() -> Result<EmissionFactors, ConfigError> {
    let mut factors = EmissionFactors::default();

    for mode in TransportMode::ALL {
        let name = factor_var(mode);
        let Ok(raw) = env::var(name) else {
            continue;
        };

        let value: f64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("'{}' is not a number", raw),
        })?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Invalid {
                name,
                reason: "must be a positive number".to_string(),
            });
        }

        tracing::info!(mode = %mode, kg_per_km = value, "Emission factor override");
        factors.set_factor(mode, value);
    }

    Ok(factors)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
