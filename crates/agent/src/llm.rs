use async_trait::async_trait;

/// One place a raw answer for a query can come from.
///
/// Implementations never fail loudly: a transport error, a bad status, or an
/// empty answer all surface as `None` so the caller can move on to the next
/// source.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    fn label(&self) -> &str;
    async fn attempt(&self, query: &str) -> Option<String>;
}

pub const SYSTEM_PROMPT: &str =
    "You recommend real, existing AI tools and always answer with a JSON array only.";

pub fn build_prompt(query: &str) -> String {
    format!(
        r#"Find AI tools for this query: "{query}"

Respond with a JSON list of tools in this exact format:
[
    {{"name": "Tool Name", "link": "https://example.com", "description": "Brief description"}},
    {{"name": "Tool Name 2", "link": "https://example2.com", "description": "Brief description"}}
]

Focus on actual AI tools and services that exist and are relevant to the query."#
    )
}
