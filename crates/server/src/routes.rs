use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use toolfinder_agent::Recommender;
use toolfinder_core::{InterfaceError, RecommendationResult};
use tracing::{debug, info, warn};

use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiResult = Result<Json<RecommendationResult>, (StatusCode, Json<ErrorBody>)>;

#[derive(Clone, Copy, Debug)]
enum Endpoint {
    Recommend,
    FindWithAi,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Recommend => "/recommend",
            Self::FindWithAi => "/find-with-ai",
        }
    }
}

pub fn router(recommender: Arc<Recommender>) -> Router {
    Router::new()
        .route(Endpoint::Recommend.path(), post(recommend))
        .route(Endpoint::FindWithAi.path(), post(find_with_ai))
        .route("/health", get(health::health))
        .with_state(AppState { recommender })
}

pub async fn recommend(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    handle(&state, Endpoint::Recommend, body).await
}

pub async fn find_with_ai(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    handle(&state, Endpoint::FindWithAi, body).await
}

async fn handle(
    state: &AppState,
    endpoint: Endpoint,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let query = query_from_body(body, &correlation_id);

    let outcome = match endpoint {
        Endpoint::Recommend => state.recommender.recommend(&query).await,
        Endpoint::FindWithAi => state.recommender.find_with_ai(&query).await,
    };

    match outcome {
        Ok(result) => {
            info!(
                event_name = "http.request.completed",
                correlation_id = %correlation_id,
                endpoint = endpoint.path(),
                total_found = result.total_found,
                source = result.source.as_deref().unwrap_or("providers"),
                "recommendation served"
            );
            Ok(Json(result))
        }
        Err(error) => {
            let error = error.into_interface(correlation_id);
            warn!(
                event_name = "http.request.rejected",
                correlation_id = error.correlation_id(),
                endpoint = endpoint.path(),
                error = %error,
                "recommendation request failed"
            );
            Err(error_response(&error))
        }
    }
}

/// A body that is not JSON, or has no string `query`, is read as an empty query.
fn query_from_body(body: Result<Json<Value>, JsonRejection>, correlation_id: &str) -> String {
    match body {
        Ok(Json(value)) => {
            value.get("query").and_then(Value::as_str).map(str::to_string).unwrap_or_default()
        }
        Err(rejection) => {
            debug!(
                event_name = "http.request.body_rejected",
                correlation_id,
                rejection = %rejection,
                "request body is not a JSON object"
            );
            String::new()
        }
    }
}

fn error_response(error: &InterfaceError) -> (StatusCode, Json<ErrorBody>) {
    let status = match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorBody { error: error.user_message().to_string() }))
}
