use crate::domain::model::{OracleReply, ScoringPayload};
use crate::domain::ports::FitScoreOracle;
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::Client;

/// HTTP client for the external fit-score service. Every transport or
/// contract violation maps to `OracleError`; the caller decides whether to
/// retry (this adapter never does).
pub struct HttpOracle {
    client: Client,
    endpoint: String,
}

impl HttpOracle {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn post_json(&self, body: &serde_json::Value) -> Result<serde_json::Value> {
        tracing::debug!("Calling oracle at {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| ScoutError::OracleError {
                reason: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::OracleError {
                reason: format!("oracle returned HTTP {}", status),
            });
        }

        response.json().await.map_err(|e| ScoutError::OracleError {
            reason: format!("invalid JSON reply: {}", e),
        })
    }

    // An explicit error field in an otherwise-successful reply still counts
    // as an oracle failure.
    fn reject_error_field(reply: &serde_json::Value) -> Result<()> {
        if let Some(error) = reply.get("error") {
            let reason = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ScoutError::OracleError { reason });
        }
        Ok(())
    }
}

#[async_trait]
impl FitScoreOracle for HttpOracle {
    async fn score(&self, payload: &ScoringPayload) -> Result<OracleReply> {
        let body = serde_json::to_value(payload)?;
        let reply = self.post_json(&body).await?;
        Self::reject_error_field(&reply)?;

        for field in ["fit_score", "explanation"] {
            if reply.get(field).is_none() {
                return Err(ScoutError::OracleError {
                    reason: format!("reply missing required field '{}'", field),
                });
            }
        }

        serde_json::from_value(reply).map_err(|e| ScoutError::OracleError {
            reason: format!("malformed reply: {}", e),
        })
    }

    async fn analyze(
        &self,
        product_details: &str,
        user_preferences: &str,
    ) -> Result<serde_json::Value> {
        let body = serde_json::json!({
            "product_details": product_details,
            "user_preferences": user_preferences,
        });
        let reply = self.post_json(&body).await?;
        Self::reject_error_field(&reply)?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ProductDetails, RawProduct};
    use httpmock::prelude::*;

    fn payload() -> ScoringPayload {
        let product = RawProduct {
            name: "Acme Laptop X".to_string(),
            price: 900.0,
            features: vec!["16GB RAM".to_string()],
        };
        ScoringPayload {
            product_details: ProductDetails {
                name: product.name,
                price: product.price,
                features: product.features,
            },
            user_preferences: serde_json::json!({"budget": 1000}),
        }
    }

    #[tokio::test]
    async fn test_score_parses_valid_reply() {
        let server = MockServer::start();
        let oracle_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/fit-score")
                .json_body_partial(r#"{"product_details": {"name": "Acme Laptop X"}}"#);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "fit_score": 0.8,
                    "explanation": "Good fit",
                    "pros": ["fast"],
                    "cons": []
                }));
        });

        let oracle = HttpOracle::new(server.url("/fit-score"));
        let reply = oracle.score(&payload()).await.unwrap();

        oracle_mock.assert();
        assert_eq!(reply.fit_score, 0.8);
        assert_eq!(reply.explanation, "Good fit");
        assert_eq!(reply.pros, vec!["fast"]);
        assert!(reply.cons.is_empty());
    }

    #[tokio::test]
    async fn test_score_defaults_missing_pros_cons() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/fit-score");
            then.status(200)
                .json_body(serde_json::json!({"fit_score": 0.4, "explanation": "Meh"}));
        });

        let oracle = HttpOracle::new(server.url("/fit-score"));
        let reply = oracle.score(&payload()).await.unwrap();

        assert!(reply.pros.is_empty());
        assert!(reply.cons.is_empty());
    }

    #[tokio::test]
    async fn test_score_rejects_missing_fit_score() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/fit-score");
            then.status(200)
                .json_body(serde_json::json!({"explanation": "no score here"}));
        });

        let oracle = HttpOracle::new(server.url("/fit-score"));
        let err = oracle.score(&payload()).await.unwrap_err();

        match err {
            ScoutError::OracleError { reason } => assert!(reason.contains("fit_score")),
            other => panic!("expected OracleError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_score_rejects_missing_explanation() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/fit-score");
            then.status(200).json_body(serde_json::json!({"fit_score": 0.9}));
        });

        let oracle = HttpOracle::new(server.url("/fit-score"));
        let err = oracle.score(&payload()).await.unwrap_err();

        match err {
            ScoutError::OracleError { reason } => assert!(reason.contains("explanation")),
            other => panic!("expected OracleError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_score_rejects_explicit_error_field() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/fit-score");
            then.status(200)
                .json_body(serde_json::json!({"error": "model overloaded"}));
        });

        let oracle = HttpOracle::new(server.url("/fit-score"));
        let err = oracle.score(&payload()).await.unwrap_err();

        match err {
            ScoutError::OracleError { reason } => assert_eq!(reason, "model overloaded"),
            other => panic!("expected OracleError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_score_rejects_http_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/fit-score");
            then.status(503);
        });

        let oracle = HttpOracle::new(server.url("/fit-score"));
        let err = oracle.score(&payload()).await.unwrap_err();

        assert!(matches!(err, ScoutError::OracleError { .. }));
    }

    #[tokio::test]
    async fn test_analyze_returns_raw_blob() {
        let server = MockServer::start();
        let oracle_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/fit-score")
                .json_body(serde_json::json!({
                    "product_details": "a sturdy laptop",
                    "user_preferences": "long battery life"
                }));
            then.status(200)
                .json_body(serde_json::json!({"verdict": "suitable", "confidence": 0.7}));
        });

        let oracle = HttpOracle::new(server.url("/fit-score"));
        let blob = oracle
            .analyze("a sturdy laptop", "long battery life")
            .await
            .unwrap();

        oracle_mock.assert();
        assert_eq!(blob["verdict"], "suitable");
    }

    #[tokio::test]
    async fn test_analyze_rejects_error_field() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/fit-score");
            then.status(200)
                .json_body(serde_json::json!({"error": "rate limited"}));
        });

        let oracle = HttpOracle::new(server.url("/fit-score"));
        let err = oracle.analyze("laptop", "cheap").await.unwrap_err();

        assert!(matches!(err, ScoutError::OracleError { .. }));
    }
}
