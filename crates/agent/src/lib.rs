//! Recommendation runtime - provider clients and orchestration
//!
//! This crate turns a free-text query into a list of tool records by:
//! - Asking configured language-model providers in priority order (`providers`)
//! - Rotating through gateway models for the AI-search path (`providers::GatewayModel`)
//! - Falling back to the built-in catalog when nobody answers (`runtime`)
//!
//! # Key Types
//!
//! - `Recommender` - Main orchestrator (see `runtime` module)
//! - `CandidateSource` - Pluggable trait for anything that can answer a query
//! - `ProviderClient` - HTTP client for one provider API
//!
//! Every raw answer, including the catalog fallback, goes through the same
//! normalize and validate pipeline in `toolfinder-core` before it is returned.

pub mod llm;
pub mod providers;
pub mod runtime;

pub use llm::CandidateSource;
pub use providers::{GatewayModel, ProviderClient, ProviderError, ProviderKind};
pub use runtime::Recommender;
