use serde::Deserialize;
use service_core::config::{self as core_config, get_env_parsed, is_production};
use service_core::error::AppError;
use std::env;

/// Port used when `APP__PORT` is not set, so both services can run side by side.
pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone, Deserialize)]
pub struct ClinicalConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub icu: IcuConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IcuConfig {
    pub refresh_interval_ms: u64,
    /// Fixed seed for a reproducible vitals feed.
    pub rng_seed: Option<u64>,
}

impl ClinicalConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common_config = core_config::Config::load()?;
        if env::var("APP__PORT").is_err() {
            common_config.port = DEFAULT_PORT;
        }
        let is_prod = is_production();

        let refresh_interval_ms: u64 = get_env_parsed("ICU_REFRESH_INTERVAL_MS", 3000, is_prod)?;
        if refresh_interval_ms == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ICU_REFRESH_INTERVAL_MS must be greater than zero"
            )));
        }

        let rng_seed = match env::var("ICU_RNG_SEED") {
            Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "ICU_RNG_SEED has an invalid value '{}': {}",
                    raw,
                    e
                ))
            })?),
            Err(_) => None,
        };

        Ok(ClinicalConfig {
            common: common_config,
            icu: IcuConfig {
                refresh_interval_ms,
                rng_seed,
            },
        })
    }
}
