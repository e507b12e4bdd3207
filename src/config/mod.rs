pub mod site;

use crate::domain::model::{SearchRequest, UserQuery};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_url, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "fitscout")]
#[command(about = "Finds products for a budget and scores their fit via an external AI oracle")]
pub struct CliConfig {
    /// Product type to search for, e.g. "laptop"
    #[arg(long)]
    pub product_type: Option<String>,

    /// Maximum price in whole currency units
    #[arg(long)]
    pub budget: Option<u32>,

    /// Desired features, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Freeform alternative: raw product description handed to the oracle
    #[arg(long, conflicts_with_all = ["product_type", "budget"])]
    pub product_details: Option<String>,

    /// Freeform alternative: raw preference text
    #[arg(long, requires = "product_details")]
    pub user_preferences: Option<String>,

    #[arg(long, default_value = "http://localhost:8000/api/fit-score")]
    pub oracle_endpoint: String,

    /// TOML site config with the search URL template and CSS selectors
    #[arg(long)]
    pub site_config: Option<String>,

    #[arg(long, default_value = "./cache")]
    pub cache_path: String,

    /// Maximum concurrent oracle calls per request
    #[arg(long, default_value = "4")]
    pub max_concurrent_scores: usize,

    /// Cached fetch results older than this read as misses
    #[arg(long, default_value = "3600")]
    pub cache_ttl_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Builds the inbound request from the flags: structured when
    /// product_type/budget are given, freeform when the raw-text pair is.
    pub fn request(&self) -> Result<SearchRequest> {
        if let (Some(product_details), Some(user_preferences)) =
            (&self.product_details, &self.user_preferences)
        {
            return Ok(SearchRequest::Freeform {
                product_details: product_details.clone(),
                user_preferences: user_preferences.clone(),
            });
        }

        match (&self.product_type, self.budget) {
            (Some(product_type), Some(budget)) => Ok(SearchRequest::Structured(UserQuery {
                product_type: product_type.clone(),
                budget,
                features: self.features.clone(),
            })),
            _ => Err(ScoutError::ValidationError {
                message: "provide --product-type and --budget, or --product-details \
                          with --user-preferences"
                    .to_string(),
            }),
        }
    }
}

impl ConfigProvider for CliConfig {
    fn oracle_endpoint(&self) -> &str {
        &self.oracle_endpoint
    }

    fn cache_path(&self) -> &str {
        &self.cache_path
    }

    fn max_in_flight_scores(&self) -> usize {
        self.max_concurrent_scores
    }

    fn cache_ttl_seconds(&self) -> u64 {
        self.cache_ttl_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("oracle_endpoint", &self.oracle_endpoint)?;
        validate_path("cache_path", &self.cache_path)?;
        validate_positive_number("max_concurrent_scores", self.max_concurrent_scores, 1)?;
        Ok(())
    }
}
