use serde::{Deserialize, Serialize};

use super::tool::ToolRecord;

pub const MAX_RESULTS: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub query: String,
    pub tools: Vec<ToolRecord>,
    pub total_found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RecommendationResult {
    pub fn new(query: impl Into<String>, tools: Vec<ToolRecord>) -> Self {
        let total_found = tools.len();
        Self { query: query.into(), tools, total_found, source: None }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
