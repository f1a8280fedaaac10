use serde_json::Value;
use thiserror::Error;

use crate::domain::recommendation::MAX_RESULTS;
use crate::domain::tool::{is_web_link, ToolRecord};

pub const NAME_CAP: usize = 100;
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub name_cap: usize,
    pub description_cap: usize,
    pub max_results: usize,
}

impl ValidationPolicy {
    /// Contract for answers from the legacy provider chain and the catalog.
    pub const fn multi_provider() -> Self {
        Self { name_cap: NAME_CAP, description_cap: 100, max_results: MAX_RESULTS }
    }

    pub const fn gateway() -> Self {
        Self { name_cap: NAME_CAP, description_cap: 200, max_results: MAX_RESULTS }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::multi_provider()
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CandidateRejection {
    #[error("candidate is not a JSON object")]
    NotARecord,
    #[error("candidate field `{0}` is missing, empty, or not a string")]
    MissingField(&'static str),
    #[error("candidate link `{0}` does not start with http:// or https://")]
    InvalidLink(String),
}

pub fn validate_candidate(
    candidate: &Value,
    policy: &ValidationPolicy,
) -> Result<ToolRecord, CandidateRejection> {
    let record = candidate.as_object().ok_or(CandidateRejection::NotARecord)?;
    let field = |key: &'static str| {
        record
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(CandidateRejection::MissingField(key))
    };

    let name = field("name")?;
    let link = field("link")?;
    let description = field("description")?;

    if !is_web_link(link) {
        return Err(CandidateRejection::InvalidLink(link.to_string()));
    }

    Ok(ToolRecord {
        name: truncate_chars(name, policy.name_cap),
        link: link.to_string(),
        description: truncate_with_marker(description, policy.description_cap),
    })
}

/// Keeps valid candidates in order, stopping once `max_results` are accepted.
pub fn validate_candidates(candidates: &[Value], policy: &ValidationPolicy) -> Vec<ToolRecord> {
    candidates
        .iter()
        .filter_map(|candidate| validate_candidate(candidate, policy).ok())
        .take(policy.max_results)
        .collect()
}

fn truncate_chars(value: &str, cap: usize) -> String {
    value.chars().take(cap).collect()
}

fn truncate_with_marker(value: &str, cap: usize) -> String {
    if value.chars().count() <= cap {
        return value.to_string();
    }
    let mut truncated = truncate_chars(value, cap);
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
