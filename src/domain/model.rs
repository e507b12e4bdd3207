use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured search request: what to look for and how much to spend.
/// Immutable for the lifetime of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    pub product_type: String,
    pub budget: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Candidate product as scraped, before any scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

/// A product with the oracle's verdict merged in. Wire names follow the
/// public response shape (`fitScore`, `scoreExplanation`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(rename = "fitScore", skip_serializing_if = "Option::is_none")]
    pub fit_score: Option<f64>,
    #[serde(rename = "scoreExplanation", skip_serializing_if = "Option::is_none")]
    pub score_explanation: Option<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub price: f64,
    pub features: Vec<String>,
}

/// Input shape the oracle expects. User preferences pass through opaque;
/// the pipeline never interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringPayload {
    pub product_details: ProductDetails,
    pub user_preferences: serde_json::Value,
}

/// Validated oracle reply. `fit_score` and `explanation` are required on
/// the wire; pros/cons default to empty when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleReply {
    pub fit_score: f64,
    pub explanation: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

/// Cached fetch result for a (product_type, budget) key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub products: Vec<RawProduct>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(products: Vec<RawProduct>) -> Self {
        Self {
            products,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, ttl_seconds: u64) -> bool {
        let age = Utc::now().signed_duration_since(self.fetched_at);
        age > chrono::Duration::seconds(ttl_seconds as i64)
    }
}

/// The two inbound request shapes: the structured path is primary, the
/// freeform variant carries raw text straight to the oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchRequest {
    Structured(UserQuery),
    Freeform {
        product_details: String,
        user_preferences: String,
    },
}

/// Per-candidate result-or-error. One candidate's oracle failure is
/// recorded here instead of failing the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Scored(ScoredProduct),
    Failed {
        name: String,
        price: f64,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Ranked(Vec<CandidateOutcome>),
    Analysis { analysis_result: serde_json::Value },
}
