use crate::core::assemble::assemble;
use crate::core::filter::filter_products;
use crate::core::payload::build_scoring_payload;
use crate::core::source::ProductSource;
use crate::domain::model::{
    CandidateOutcome, RawProduct, SearchRequest, SearchResponse, UserQuery,
};
use crate::domain::ports::{FitScoreOracle, ProductFetcher, ResultCache};
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Orchestrates one search request end to end: validate, source
/// (cache-or-fetch), filter, score candidates concurrently, aggregate in
/// input order. All collaborators are passed in at construction.
pub struct SearchEngine<F, C, O>
where
    F: ProductFetcher,
    C: ResultCache,
    O: FitScoreOracle + 'static,
{
    source: ProductSource<F, C>,
    oracle: Arc<O>,
    max_in_flight: usize,
}

impl<F, C, O> SearchEngine<F, C, O>
where
    F: ProductFetcher,
    C: ResultCache,
    O: FitScoreOracle + 'static,
{
    pub fn new(source: ProductSource<F, C>, oracle: Arc<O>, max_in_flight: usize) -> Self {
        Self {
            source,
            oracle,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub async fn handle(&self, request: SearchRequest) -> Result<SearchResponse> {
        match request {
            SearchRequest::Structured(query) => {
                Ok(SearchResponse::Ranked(self.search(query).await?))
            }
            SearchRequest::Freeform {
                product_details,
                user_preferences,
            } => Ok(SearchResponse::Analysis {
                analysis_result: self.analyze(&product_details, &user_preferences).await?,
            }),
        }
    }

    /// Structured path. A failed candidate is annotated in the result
    /// sequence rather than aborting its siblings.
    pub async fn search(&self, query: UserQuery) -> Result<Vec<CandidateOutcome>> {
        query.validate()?;

        let products = self.source.fetch(&query.product_type, query.budget).await?;
        tracing::info!("Sourced {} product(s)", products.len());

        let candidates = filter_products(products, &query.product_type, query.budget);
        tracing::info!("Scoring {} candidate(s)", candidates.len());

        let user_preferences = serde_json::to_value(&query)?;
        self.score_candidates(candidates, user_preferences).await
    }

    /// Freeform path: hands the raw text straight to the oracle.
    pub async fn analyze(
        &self,
        product_details: &str,
        user_preferences: &str,
    ) -> Result<serde_json::Value> {
        validate_non_empty_string("product_details", product_details)?;
        validate_non_empty_string("user_preferences", user_preferences)?;
        self.oracle.analyze(product_details, user_preferences).await
    }

    // One task per candidate, bounded by a semaphore so the oracle never
    // sees more than max_in_flight concurrent calls. Outcomes are placed
    // by index: aggregate order matches filtered input order no matter
    // which call finishes first. Tasks live in a JoinSet so dropping the
    // request future aborts in-flight and queued oracle calls.
    async fn score_candidates(
        &self,
        candidates: Vec<RawProduct>,
        user_preferences: serde_json::Value,
    ) -> Result<Vec<CandidateOutcome>> {
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let total = candidates.len();
        let mut tasks = JoinSet::new();

        for (index, product) in candidates.into_iter().enumerate() {
            let oracle = Arc::clone(&self.oracle);
            let semaphore = Arc::clone(&semaphore);
            let user_preferences = user_preferences.clone();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            index,
                            CandidateOutcome::Failed {
                                name: product.name,
                                price: product.price,
                                reason: "scoring was cancelled".to_string(),
                            },
                        )
                    }
                };

                let payload = build_scoring_payload(&product, user_preferences);
                match oracle.score(&payload).await {
                    Ok(reply) => (index, CandidateOutcome::Scored(assemble(product, reply))),
                    Err(e) => {
                        tracing::warn!("Scoring failed for '{}': {}", product.name, e);
                        (
                            index,
                            CandidateOutcome::Failed {
                                name: product.name,
                                price: product.price,
                                reason: e.to_string(),
                            },
                        )
                    }
                }
            });
        }

        let mut outcomes: Vec<Option<CandidateOutcome>> =
            std::iter::repeat_with(|| None).take(total).collect();

        while let Some(joined) = tasks.join_next().await {
            let (index, outcome) = joined.map_err(|e| ScoutError::ProcessingError {
                message: format!("scoring task failed: {}", e),
            })?;
            outcomes[index] = Some(outcome);
        }

        Ok(outcomes.into_iter().flatten().collect())
    }
}
