pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fallback;
pub mod normalize;
pub mod validation;

pub use catalog::{Catalog, Category};
pub use domain::recommendation::{RecommendationResult, MAX_RESULTS};
pub use domain::tool::ToolRecord;
pub use errors::{InterfaceError, RecommendError};
pub use fallback::select_fallback_tools;
pub use validation::{validate_candidates, ValidationPolicy};
