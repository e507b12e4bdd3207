use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Site-coupled scraping configuration: where to search and which CSS
/// selectors locate product fields. Loaded from TOML so swapping the
/// target site never touches code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub selectors: SelectorSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    /// Search URL template with `{product_type}` and `{budget}` placeholders.
    pub search_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorSection {
    pub product: String,
    pub name: String,
    pub price: String,
    pub features: String,
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

impl SiteConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(|e| ScoutError::ConfigError {
            message: format!("invalid site config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteSection {
                search_url: "https://www.example.com/search?q={product_type}&max_price={budget}"
                    .to_string(),
                user_agent: default_user_agent(),
            },
            selectors: SelectorSection {
                product: ".product-item".to_string(),
                name: ".product-title".to_string(),
                price: ".product-price".to_string(),
                features: ".product-features".to_string(),
            },
        }
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("site.search_url", &self.site.search_url)?;
        if !self.site.search_url.contains("{product_type}") {
            return Err(ScoutError::InvalidConfigValue {
                field: "site.search_url".to_string(),
                value: self.site.search_url.clone(),
                reason: "template must contain a {product_type} placeholder".to_string(),
            });
        }
        validate_non_empty_string("selectors.product", &self.selectors.product)?;
        validate_non_empty_string("selectors.name", &self.selectors.name)?;
        validate_non_empty_string("selectors.price", &self.selectors.price)?;
        validate_non_empty_string("selectors.features", &self.selectors.features)?;
        Ok(())
    }
}
