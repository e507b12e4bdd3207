use crate::domain::model::{ProductDetails, RawProduct, ScoringPayload};

/// Shapes a product and the caller's preferences into the oracle's input.
/// Preferences are passed through untouched.
pub fn build_scoring_payload(
    product: &RawProduct,
    user_preferences: serde_json::Value,
) -> ScoringPayload {
    ScoringPayload {
        product_details: ProductDetails {
            name: product.name.clone(),
            price: product.price,
            features: product.features.clone(),
        },
        user_preferences,
    }
}
