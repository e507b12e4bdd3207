pub mod assemble;
pub mod engine;
pub mod filter;
pub mod payload;
pub mod source;

pub use crate::domain::model::{
    CandidateOutcome, RawProduct, ScoredProduct, SearchRequest, SearchResponse, UserQuery,
};
pub use crate::domain::ports::{ConfigProvider, FitScoreOracle, ProductFetcher, ResultCache};
pub use crate::utils::error::Result;
