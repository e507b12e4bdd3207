use crate::domain::model::{OracleReply, RawProduct, ScoredProduct};

/// Merges the oracle's verdict back into the product record. Pure merge;
/// the reply was already validated at the oracle boundary.
pub fn assemble(product: RawProduct, reply: OracleReply) -> ScoredProduct {
    ScoredProduct {
        name: product.name,
        price: product.price,
        features: product.features,
        fit_score: Some(reply.fit_score),
        score_explanation: Some(reply.explanation),
        pros: reply.pros,
        cons: reply.cons,
    }
}
