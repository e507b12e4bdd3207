use crate::config::site::SiteConfig;
use crate::domain::model::RawProduct;
use crate::domain::ports::ProductFetcher;
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Live-fetch adapter: templated search URL in, HTML out, RawProducts
/// extracted with the site config's CSS selectors. Brittle by nature;
/// any transport or parse trouble surfaces as `SourceUnavailable`.
pub struct SiteScraper {
    client: Client,
    config: SiteConfig,
    price_digits: Regex,
}

impl SiteScraper {
    pub fn new(config: SiteConfig) -> Result<Self> {
        // Fail at construction, not mid-request, if a selector is bogus.
        for (field, selector) in [
            ("selectors.product", &config.selectors.product),
            ("selectors.name", &config.selectors.name),
            ("selectors.price", &config.selectors.price),
            ("selectors.features", &config.selectors.features),
        ] {
            compile_selector(field, selector)?;
        }

        let price_digits =
            Regex::new(r"[0-9][0-9,]*\.?[0-9]*").map_err(|e| ScoutError::ConfigError {
                message: format!("price pattern failed to compile: {}", e),
            })?;

        Ok(Self {
            client: Client::new(),
            config,
            price_digits,
        })
    }

    fn build_search_url(&self, product_type: &str, budget: u32) -> Result<String> {
        let url = self
            .config
            .site
            .search_url
            .replace("{product_type}", &urlencoding::encode(product_type))
            .replace("{budget}", &budget.to_string());

        Url::parse(&url).map_err(|e| ScoutError::ConfigError {
            message: format!("search URL '{}' is not a valid URL: {}", url, e),
        })?;
        Ok(url)
    }

    fn parse_products(&self, html: &str) -> Result<Vec<RawProduct>> {
        let document = Html::parse_document(html);
        let product_selector = compile_selector("selectors.product", &self.config.selectors.product)?;
        let name_selector = compile_selector("selectors.name", &self.config.selectors.name)?;
        let price_selector = compile_selector("selectors.price", &self.config.selectors.price)?;
        let features_selector =
            compile_selector("selectors.features", &self.config.selectors.features)?;

        let mut products = Vec::new();
        for item in document.select(&product_selector) {
            let Some(name) = select_text(&item, &name_selector) else {
                tracing::debug!("Skipping item without a name element");
                continue;
            };

            let Some(price) = select_text(&item, &price_selector)
                .and_then(|text| self.parse_price(&text))
            else {
                tracing::debug!("Skipping '{}': no parsable price", name);
                continue;
            };

            let features = select_text(&item, &features_selector)
                .map(|text| {
                    text.split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            products.push(RawProduct {
                name,
                price,
                features,
            });
        }

        tracing::debug!("Parsed {} product(s) from search page", products.len());
        Ok(products)
    }

    // "$1,299.99" -> 1299.99
    fn parse_price(&self, text: &str) -> Option<f64> {
        let digits = self.price_digits.find(text)?;
        digits.as_str().replace(',', "").parse().ok()
    }
}

fn compile_selector(field: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScoutError::ConfigError {
        message: format!("{} ('{}') is not a valid CSS selector: {}", field, selector, e),
    })
}

fn select_text(item: &ElementRef, selector: &Selector) -> Option<String> {
    let element = item.select(selector).next()?;
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl ProductFetcher for SiteScraper {
    async fn fetch(&self, product_type: &str, budget: u32) -> Result<Vec<RawProduct>> {
        let url = self.build_search_url(product_type, budget)?;
        tracing::debug!("Scraping search page: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.config.site.user_agent)
            .send()
            .await
            .map_err(|e| ScoutError::SourceUnavailable {
                reason: format!("search request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::SourceUnavailable {
                reason: format!("search page returned HTTP {}", status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScoutError::SourceUnavailable {
                reason: format!("failed to read search page: {}", e),
            })?;

        self.parse_products(&body)
    }
}
