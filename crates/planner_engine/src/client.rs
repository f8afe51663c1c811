use std::time::Duration;

use planner_logging::{planner_debug, planner_info};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::wire::{error_detail, PlanBody, PlanResponse, StatusResponse};
use crate::{ApiError, FailureKind, IngestDocument, PlanQuery};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const STATUS_PATH: &str = "status";
const INGEST_PATH: &str = "data/ingest/text";
const PLAN_PATH: &str = "plan/generate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn document_count(&self) -> Result<u64, ApiError>;

    async fn ingest_text(&self, document: &IngestDocument) -> Result<(), ApiError>;

    async fn generate_plan(&self, query: &PlanQuery) -> Result<String, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, ApiError> {
        let base = parse_base_url(&settings.base_url)?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn document_count(&self) -> Result<u64, ApiError> {
        let url = self.endpoint(STATUS_PATH)?;
        planner_debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let status: StatusResponse = read_json(response).await?;
        Ok(status.db_document_count)
    }

    async fn ingest_text(&self, document: &IngestDocument) -> Result<(), ApiError> {
        let url = self.endpoint(INGEST_PATH)?;
        planner_info!(
            "POST {} doc_id={} source_type={} content_len={}",
            url,
            document.doc_id,
            document.source_type,
            document.content.len()
        );

        let response = self
            .client
            .post(url)
            .query(&[
                ("content", document.content.as_str()),
                ("doc_id", document.doc_id.as_str()),
                ("source_type", document.source_type.as_str()),
            ])
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn generate_plan(&self, query: &PlanQuery) -> Result<String, ApiError> {
        let url = self.endpoint(PLAN_PATH)?;
        planner_info!(
            "POST {} target_date={} guidance_len={}",
            url,
            query.target_date,
            query.guidance.len()
        );

        let body = PlanBody {
            additional_guidance: &query.guidance,
            target_date: query.target_date,
        };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let plan: PlanResponse = read_json(response).await?;
        Ok(plan.plan)
    }
}

/// Accepts `http://host:port` as well as `http://host/api`; joins are relative to the last segment.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme '{other}' in {raw}"),
        )),
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // A body that cannot be read is treated like an empty one.
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    ApiError::new(
        FailureKind::HttpStatus(status.as_u16()),
        status.canonical_reason().unwrap_or_default(),
    )
    .with_detail(error_detail(body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash_so_prefix_survives_join() {
        let base = parse_base_url("http://localhost:5173/api").unwrap();
        assert_eq!(
            base.join(INGEST_PATH).unwrap().as_str(),
            "http://localhost:5173/api/data/ingest/text"
        );

        let base = parse_base_url(" http://127.0.0.1:8000/ ").unwrap();
        assert_eq!(base.join(STATUS_PATH).unwrap().as_str(), "http://127.0.0.1:8000/status");
    }

    #[test]
    fn base_url_rejects_garbage_and_other_schemes() {
        assert_eq!(
            parse_base_url("not a url").unwrap_err().kind,
            FailureKind::InvalidUrl
        );
        assert_eq!(
            parse_base_url("ftp://example.com").unwrap_err().kind,
            FailureKind::InvalidUrl
        );
    }

    #[test]
    fn status_error_keeps_reason_and_detail() {
        let err = status_error(StatusCode::BAD_REQUEST, r#"{"detail":"missing content"}"#);
        assert_eq!(err.kind, FailureKind::HttpStatus(400));
        assert_eq!(err.message, "Bad Request");
        assert_eq!(err.detail.as_deref(), Some("missing content"));
        assert_eq!(err.status_code(), Some(400));
    }
}
