//! Remote predictor adapter for suggest_core
//!
//! Fetches known commands and contextual predictions from the remote
//! predictor service and feeds them into a `SuggestionEngine`. A refresh
//! takes its ticket before the request goes out, so a slow response can
//! never overwrite a corpus from a later request.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::engine::{CorpusKind, RefreshTicket, SuggestionEngine};
use crate::structured_log::{self, LogLevel};
use crate::{slog_debug, slog_warn};

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("no predictor service URI configured")]
    NotConfigured,
    #[error("predictor request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("predictor returned HTTP {0}")]
    Status(u16),
    #[error("predictor response is not a list of strings: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Request context sent alongside the history snippet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestContext {
    pub correlation_id: Uuid,
    pub session_id: Uuid,
    pub subscription_id: Uuid,
    pub version_number: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            correlation_id: Uuid::nil(),
            session_id: Uuid::nil(),
            subscription_id: Uuid::nil(),
            version_number: "1.0".to_string(),
        }
    }
}

/// Body of a prediction request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub history: String,
    pub client_type: String,
    pub context: RequestContext,
}

impl PredictionRequest {
    pub fn new(history: impl Into<String>, client_type: impl Into<String>) -> Self {
        Self {
            history: history.into(),
            client_type: client_type.into(),
            context: RequestContext::default(),
        }
    }
}

/// Source of command and prediction lists
pub trait PredictorService: Send + Sync {
    /// All known command strings
    fn fetch_commands(&self) -> impl Future<Output = Result<Vec<String>, PredictorError>> + Send;

    /// Predicted command lines for a history context
    fn fetch_predictions(
        &self,
        request: PredictionRequest,
    ) -> impl Future<Output = Result<Vec<String>, PredictorError>> + Send;
}

/// `PredictorService` over HTTP: `GET /commands`, `POST /predictions`
pub struct HttpPredictorService {
    client: reqwest::Client,
    base_uri: String,
}

impl HttpPredictorService {
    pub fn new(base_uri: impl Into<String>) -> Self {
        let base_uri = base_uri.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_uri,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, PredictorError> {
        config
            .service_uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
            .map(Self::new)
            .ok_or(PredictorError::NotConfigured)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_uri, path)
    }
}

async fn decode_lines(response: reqwest::Response) -> Result<Vec<String>, PredictorError> {
    let status = response.status();
    if !status.is_success() {
        return Err(PredictorError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    parse_lines(&body)
}

/// Service responses are a JSON array of strings
fn parse_lines(body: &str) -> Result<Vec<String>, PredictorError> {
    Ok(serde_json::from_str(body)?)
}

impl PredictorService for HttpPredictorService {
    async fn fetch_commands(&self) -> Result<Vec<String>, PredictorError> {
        let response = self.client.get(self.endpoint("commands")).send().await?;
        decode_lines(response).await
    }

    async fn fetch_predictions(&self, request: PredictionRequest) -> Result<Vec<String>, PredictorError> {
        let response = self
            .client
            .post(self.endpoint("predictions"))
            .json(&request)
            .send()
            .await?;
        decode_lines(response).await
    }
}

/// Await a fetch and publish its lines under `ticket`
async fn publish_when_ready<F>(engine: &SuggestionEngine, ticket: RefreshTicket, fetch: F) -> Result<bool, PredictorError>
where
    F: Future<Output = Result<Vec<String>, PredictorError>>,
{
    match fetch.await {
        Ok(lines) => Ok(engine.complete_refresh(ticket, &lines)),
        Err(e) => {
            slog_warn!(
                "PREDICTOR",
                "refresh_failed",
                json!({
                    "kind": ticket.kind.as_str(),
                    "generation": ticket.generation,
                    "error": e.to_string(),
                })
            );
            Err(e)
        }
    }
}

fn prediction_request(engine: &SuggestionEngine, history: &[String]) -> PredictionRequest {
    let request = PredictionRequest::new(engine.context_snippet(history), &engine.config().client_type);
    if structured_log::enabled(LogLevel::Debug) {
        slog_debug!(
            "PREDICTOR",
            "prediction_request",
            serde_json::to_value(&request).unwrap_or_default()
        );
    }
    request
}

/// Fetch the known commands and publish them
pub async fn refresh_commands<S: PredictorService>(engine: &SuggestionEngine, service: &S) -> Result<bool, PredictorError> {
    let ticket = engine.begin_refresh(CorpusKind::Commands);
    publish_when_ready(engine, ticket, service.fetch_commands()).await
}

/// Fetch predictions for `history` and publish them
pub async fn refresh_predictions<S: PredictorService>(
    engine: &SuggestionEngine,
    service: &S,
    history: &[String],
) -> Result<bool, PredictorError> {
    let ticket = engine.begin_refresh(CorpusKind::Predictions);
    let request = prediction_request(engine, history);
    publish_when_ready(engine, ticket, service.fetch_predictions(request)).await
}

/// Startup flow: known commands first, then predictions for the current history.
///
/// The snippet needs the known-command set, so predictions are only
/// requested once the command list is in.
pub async fn refresh_commands_then_predictions<S: PredictorService>(
    engine: &SuggestionEngine,
    service: &S,
    history: &[String],
) -> Result<bool, PredictorError> {
    refresh_commands(engine, service).await?;
    refresh_predictions(engine, service, history).await
}

/// Request predictions in the background.
///
/// The ticket is taken before spawning, so calls supersede each other in
/// call order no matter which response arrives first. Nothing is requested
/// until the known commands are published.
pub fn spawn_prediction_refresh<S>(
    engine: Arc<SuggestionEngine>,
    service: Arc<S>,
    history: Vec<String>,
) -> JoinHandle<bool>
where
    S: PredictorService + 'static,
{
    if !engine.is_ready(CorpusKind::Commands) {
        slog_debug!(
            "PREDICTOR",
            "prediction_refresh_skipped",
            json!({ "reason": "commands_not_ready" })
        );
        return tokio::spawn(async { false });
    }

    let ticket = engine.begin_refresh(CorpusKind::Predictions);
    let request = prediction_request(&engine, &history);
    tokio::spawn(async move {
        publish_when_ready(&engine, ticket, service.fetch_predictions(request))
            .await
            .unwrap_or(false)
    })
}
