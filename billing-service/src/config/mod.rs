use rust_decimal::Decimal;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_env_parsed, is_production};
use service_core::error::AppError;

use crate::services::TaxBasis;

#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub billing: BillingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingSettings {
    /// Whether invoice-level discounts reduce the GST base.
    pub tax_basis: TaxBasis,
    /// Rate applied to lines submitted without one.
    pub default_tax_rate: Decimal,
    pub currency: String,
    pub invoice_prefix: String,
}

impl BillingConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let default_tax_rate: Decimal =
            get_env_parsed("BILLING_DEFAULT_TAX_RATE", Decimal::from(18), is_prod)?;
        if default_tax_rate < Decimal::ZERO || default_tax_rate > Decimal::ONE_HUNDRED {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "BILLING_DEFAULT_TAX_RATE must be between 0 and 100, got {}",
                default_tax_rate
            )));
        }

        Ok(BillingConfig {
            common: common_config,
            billing: BillingSettings {
                tax_basis: get_env_parsed("BILLING_TAX_BASIS", TaxBasis::default(), is_prod)?,
                default_tax_rate,
                currency: get_env("BILLING_CURRENCY", Some("INR"), is_prod)?,
                invoice_prefix: get_env("BILLING_INVOICE_PREFIX", Some("INV"), is_prod)?,
            },
        })
    }
}
