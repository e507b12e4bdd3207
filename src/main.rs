use clap::Parser;
use fitscout::domain::ports::ConfigProvider;
use fitscout::utils::{logger, validation::Validate};
use fitscout::{
    CliConfig, FileCache, HttpOracle, ProductSource, SearchEngine, SiteConfig, SiteScraper,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting fitscout");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    let request = match config.request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let site = match &config.site_config {
        Some(path) => SiteConfig::from_path(path)?,
        None => SiteConfig::default(),
    };

    let scraper = SiteScraper::new(site)?;
    let cache = FileCache::new(config.cache_path().to_string());
    let source = ProductSource::new(scraper, cache, config.cache_ttl_seconds());
    let oracle = Arc::new(HttpOracle::new(config.oracle_endpoint().to_string()));
    let engine = SearchEngine::new(source, oracle, config.max_in_flight_scores());

    match engine.handle(request).await {
        Ok(response) => {
            tracing::info!("✅ Search completed");
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Err(e) => {
            tracing::error!("❌ Search failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
