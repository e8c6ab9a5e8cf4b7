//! Application configuration

use std::path::PathBuf;

use clap::Args;
use giftpack::pricing::{DEFAULT_FALLBACK_UNIT_PRICE, DEFAULT_TAX_RATE_PERCENT, PricingConfig};
use rust_decimal::Decimal;

/// Settings shared by every command, read from flags or the environment.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Storefront backend base URL
    #[arg(
        long,
        env = "GIFTPACK_BACKEND_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    pub backend_url: String,

    /// Directory for locally persisted state
    #[arg(long, env = "GIFTPACK_DATA_DIR", default_value = ".giftpack", global = true)]
    pub data_dir: PathBuf,

    /// Catalog snapshot YAML file; the backend catalog is used when omitted
    #[arg(long, env = "GIFTPACK_CATALOG_FILE", global = true)]
    pub catalog_file: Option<PathBuf>,

    /// Tax rate in percent, applied after coupon discounts
    #[arg(long, env = "GIFTPACK_TAX_RATE", default_value_t = Decimal::from(DEFAULT_TAX_RATE_PERCENT), global = true)]
    pub tax_rate: Decimal,

    /// Unit price for products missing from the catalog
    #[arg(long, env = "GIFTPACK_FALLBACK_UNIT_PRICE", default_value_t = DEFAULT_FALLBACK_UNIT_PRICE, global = true)]
    pub fallback_unit_price: u64,

    /// Signed-in user, if any
    #[arg(long, env = "GIFTPACK_USER", global = true)]
    pub user: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,
}

impl AppConfig {
    /// Pricing settings derived from the configured tax rate and fallback price.
    pub fn pricing(&self) -> PricingConfig {
        PricingConfig::from_tax_percent(self.tax_rate, self.fallback_unit_price)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: AppConfig,
    }

    #[test]
    fn defaults_match_pricing_defaults() -> TestResult {
        let cli = TestCli::try_parse_from(["giftpack"])?;

        assert_eq!(cli.config.tax_rate, Decimal::from(18));
        assert_eq!(cli.config.fallback_unit_price, 1999);
        assert_eq!(cli.config.pricing().tax_percent_points(), Decimal::from(18));

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let cli = TestCli::try_parse_from([
            "giftpack",
            "--tax-rate",
            "12.5",
            "--fallback-unit-price",
            "2499",
            "--user",
            "u1",
        ])?;

        assert_eq!(cli.config.tax_rate, Decimal::new(125, 1));
        assert_eq!(cli.config.pricing().fallback_unit_price(), 2499);
        assert_eq!(cli.config.user.as_deref(), Some("u1"));

        Ok(())
    }
}
