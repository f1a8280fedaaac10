use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use toolfinder_agent::runtime::FALLBACK_LABEL;

use crate::routes::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProvidersHealth {
    pub legacy: Vec<String>,
    pub gateway_models: Vec<String>,
    pub fallback: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub providers: ProvidersHealth,
    pub checked_at: String,
}

/// Always ready: the catalog fallback answers even with no sources configured.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let recommender = &state.recommender;
    let legacy: Vec<String> =
        recommender.provider_labels().into_iter().map(str::to_string).collect();
    let gateway_models: Vec<String> =
        recommender.gateway_labels().into_iter().map(str::to_string).collect();

    let detail = if legacy.is_empty() && gateway_models.is_empty() {
        format!("no providers configured, answering from {FALLBACK_LABEL}")
    } else {
        format!("{} provider(s), {} gateway model(s)", legacy.len(), gateway_models.len())
    };

    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck { status: "ready", detail },
        providers: ProvidersHealth { legacy, gateway_models, fallback: FALLBACK_LABEL },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{extract::State, http::StatusCode, Json};
    use toolfinder_agent::{CandidateSource, Recommender};

    use crate::health::health;
    use crate::routes::AppState;

    struct Silent(&'static str);

    #[async_trait]
    impl CandidateSource for Silent {
        fn label(&self) -> &str {
            self.0
        }

        async fn attempt(&self, _query: &str) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn health_reports_catalog_only_mode_without_sources() {
        let state = AppState { recommender: Arc::new(Recommender::default()) };

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert!(payload.providers.legacy.is_empty());
        assert!(payload.service.detail.contains("local catalog"));
    }

    #[tokio::test]
    async fn health_lists_configured_sources() {
        let recommender = Recommender::default()
            .with_provider(Silent("Claude"))
            .with_gateway_model(Silent("gpt-4o"));
        let state = AppState { recommender: Arc::new(recommender) };

        let (_, Json(payload)) = health(State(state)).await;

        assert_eq!(payload.providers.legacy, ["Claude"]);
        assert_eq!(payload.providers.gateway_models, ["gpt-4o"]);
        assert_eq!(payload.service.detail, "1 provider(s), 1 gateway model(s)");
    }
}
