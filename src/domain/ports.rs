use crate::domain::model::{CacheEntry, OracleReply, RawProduct, ScoringPayload};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Live-fetch boundary: turns a (product_type, budget) query into raw
/// candidates. Site-coupled; implemented by the scraping adapter.
#[async_trait]
pub trait ProductFetcher: Send + Sync {
    async fn fetch(&self, product_type: &str, budget: u32) -> Result<Vec<RawProduct>>;
}

/// The external scoring service, treated as a black box.
#[async_trait]
pub trait FitScoreOracle: Send + Sync {
    async fn score(&self, payload: &ScoringPayload) -> Result<OracleReply>;

    /// Freeform path: raw product text and preference text in, opaque
    /// analysis blob out.
    async fn analyze(
        &self,
        product_details: &str,
        user_preferences: &str,
    ) -> Result<serde_json::Value>;
}

/// Key-value cache of prior fetch results. Best-effort; callers degrade
/// read failures to misses and swallow write failures.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, product_type: &str, budget: u32) -> Result<Option<CacheEntry>>;
    async fn put(&self, product_type: &str, budget: u32, entry: &CacheEntry) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn oracle_endpoint(&self) -> &str;
    fn cache_path(&self) -> &str;
    fn max_in_flight_scores(&self) -> usize;
    fn cache_ttl_seconds(&self) -> u64;
}
