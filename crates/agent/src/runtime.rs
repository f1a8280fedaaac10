use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use toolfinder_core::config::AppConfig;
use toolfinder_core::errors::RecommendError;
use toolfinder_core::normalize;
use toolfinder_core::{
    select_fallback_tools, validate_candidates, Catalog, RecommendationResult, ValidationPolicy,
};
use tracing::{debug, info};

use crate::llm::CandidateSource;
use crate::providers::{GatewayModel, ProviderClient, ProviderError, ProviderKind};

pub const FALLBACK_LABEL: &str = "local catalog";

/// Sequences candidate sources and the catalog fallback for a query.
///
/// `providers` are tried in order for [`Recommender::recommend`]; the
/// `gateway` rotation is only used by [`Recommender::find_with_ai`].
pub struct Recommender {
    providers: Vec<Arc<dyn CandidateSource>>,
    gateway: Vec<Arc<dyn CandidateSource>>,
    catalog: Arc<Catalog>,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl Recommender {
    pub fn new(catalog: Catalog) -> Self {
        Self { providers: Vec::new(), gateway: Vec::new(), catalog: Arc::new(catalog) }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.providers.timeout_secs);
        let mut recommender = Self::default();

        let legacy: [(ProviderKind, &Option<SecretString>, &str); 3] = [
            (
                ProviderKind::OpenAi,
                &config.providers.openai_api_key,
                config.providers.openai_base_url.as_str(),
            ),
            (
                ProviderKind::Anthropic,
                &config.providers.anthropic_api_key,
                config.providers.anthropic_base_url.as_str(),
            ),
            (
                ProviderKind::DeepSeek,
                &config.providers.deepseek_api_key,
                config.providers.deepseek_base_url.as_str(),
            ),
        ];
        for (kind, credential, base_url) in legacy {
            if let Some(credential) = credential {
                let client = ProviderClient::new(kind, credential.clone(), base_url, timeout)?;
                recommender = recommender.with_provider(client);
            }
        }

        if let Some(token) = config.gateway.token.as_ref().filter(|_| config.gateway.is_enabled()) {
            let client = Arc::new(ProviderClient::new(
                ProviderKind::Gateway,
                token.clone(),
                &config.gateway.base_url,
                timeout,
            )?);
            for model in config.gateway.models.iter().filter(|model| !model.trim().is_empty()) {
                recommender =
                    recommender.with_gateway_model(GatewayModel::new(client.clone(), model.trim()));
            }
        }

        Ok(recommender)
    }

    pub fn with_provider<S>(mut self, source: S) -> Self
    where
        S: CandidateSource + 'static,
    {
        self.providers.push(Arc::new(source));
        self
    }

    pub fn with_gateway_model<S>(mut self, source: S) -> Self
    where
        S: CandidateSource + 'static,
    {
        self.gateway.push(Arc::new(source));
        self
    }

    pub fn provider_labels(&self) -> Vec<&str> {
        self.providers.iter().map(|source| source.label()).collect()
    }

    pub fn gateway_labels(&self) -> Vec<&str> {
        self.gateway.iter().map(|source| source.label()).collect()
    }

    pub fn gateway_enabled(&self) -> bool {
        !self.gateway.is_empty()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Multi-provider path: first provider that answers wins, otherwise the
    /// catalog fallback is routed through the same parsing pipeline.
    pub async fn recommend(&self, query: &str) -> Result<RecommendationResult, RecommendError> {
        let query = validated_query(query)?;

        let raw = match first_answer(&self.providers, query).await {
            Some((label, raw)) => {
                info!(
                    event_name = "recommend.provider_answered",
                    provider = label,
                    "using provider answer"
                );
                raw
            }
            None => {
                info!(
                    event_name = "recommend.fallback",
                    provider = FALLBACK_LABEL,
                    "no provider answered, using catalog fallback"
                );
                serde_json::to_string(&select_fallback_tools(&self.catalog, query))?
            }
        };

        let candidates = normalize::parse(&raw);
        let tools = validate_candidates(&candidates, &ValidationPolicy::multi_provider());
        Ok(RecommendationResult::new(query, tools))
    }

    /// Gateway path: rotate through models, delegating to
    /// [`Recommender::recommend`] when the gateway is off or every model fails.
    pub async fn find_with_ai(&self, query: &str) -> Result<RecommendationResult, RecommendError> {
        let query = validated_query(query)?;

        if !self.gateway_enabled() {
            debug!(event_name = "find_with_ai.gateway_disabled", "delegating to recommend");
            return self.recommend(query).await;
        }

        for source in &self.gateway {
            let model = source.label();
            let Some(raw) = source.attempt(query).await else {
                continue;
            };

            let candidates = match normalize::parse_strict(&raw) {
                Some(candidates) if !candidates.is_empty() => candidates,
                _ => {
                    debug!(
                        event_name = "find_with_ai.unparseable",
                        model,
                        "model answer is not a non-empty JSON array"
                    );
                    continue;
                }
            };

            let tools = validate_candidates(&candidates, &ValidationPolicy::gateway());
            if tools.is_empty() {
                debug!(
                    event_name = "find_with_ai.no_valid_candidates",
                    model,
                    candidates = candidates.len(),
                    "model answer had no valid tools"
                );
                continue;
            }

            info!(
                event_name = "find_with_ai.model_answered",
                model,
                tools = tools.len(),
                "using gateway answer"
            );
            return Ok(
                RecommendationResult::new(query, tools).with_source(format!("AI-powered by {model}"))
            );
        }

        info!(event_name = "find_with_ai.rotation_exhausted", "delegating to recommend");
        self.recommend(query).await
    }
}

fn validated_query(query: &str) -> Result<&str, RecommendError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(RecommendError::EmptyQuery);
    }
    Ok(trimmed)
}

async fn first_answer<'a>(
    sources: &'a [Arc<dyn CandidateSource>],
    query: &str,
) -> Option<(&'a str, String)> {
    for source in sources {
        if let Some(raw) = source.attempt(query).await {
            return Some((source.label(), raw));
        }
    }
    None
}
