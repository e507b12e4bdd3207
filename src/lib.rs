pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{cache::FileCache, oracle::HttpOracle, scrape::SiteScraper};
pub use config::{site::SiteConfig, CliConfig};
pub use core::{engine::SearchEngine, source::ProductSource};
pub use utils::error::{Result, ScoutError};
