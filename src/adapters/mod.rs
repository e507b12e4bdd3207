// Adapters layer: concrete implementations of the domain ports for
// external systems (scoring oracle, search-page scraping, cache store).

pub mod cache;
pub mod oracle;
pub mod scrape;
