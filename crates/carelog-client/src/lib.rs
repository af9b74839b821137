//! HTTP client for the carelog server.
//!
//! [`RemoteClient`] is the contract the coordinator is written against;
//! [`HttpClient`] implements it over the server's JSON API. Log collections
//! come back as raw JSON values so that callers can decode them one record
//! at a time.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use carelog_core::{
    Child, ChildId, HandoffSummary, Kind, NewChild, NewRecord, RecordId, SleepUpdate, UserId,
    VoiceLogResponse, WeeklySummary,
};
use reqwest::{Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Default request timeout for API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured server address is not a usable base URL.
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Operations the server exposes to the client.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn fetch_children(&self) -> Result<Vec<Child>, ClientError>;

    async fn create_child(&self, child: &NewChild) -> Result<Child, ClientError>;

    async fn delete_child(&self, child: &ChildId) -> Result<(), ClientError>;

    /// Fetches the full collection of `kind` for `child`, undecoded.
    async fn fetch_collection(&self, kind: Kind, child: &ChildId)
    -> Result<Vec<Value>, ClientError>;

    /// Creates a record and returns the server's copy, undecoded.
    async fn create_record(&self, child: &ChildId, record: &NewRecord)
    -> Result<Value, ClientError>;

    async fn update_sleep(&self, sleep: &RecordId, update: &SleepUpdate)
    -> Result<Value, ClientError>;

    async fn weekly_summary(&self, child: &ChildId) -> Result<WeeklySummary, ClientError>;

    async fn handoff_summary(&self, child: &ChildId) -> Result<HandoffSummary, ClientError>;

    async fn process_voice_log(
        &self,
        child: &ChildId,
        text: &str,
    ) -> Result<VoiceLogResponse, ClientError>;
}

/// JSON-over-HTTP implementation of [`RemoteClient`].
///
/// # Thread Safety
///
/// The client is safe to share across tasks. Clones share the underlying
/// HTTP connection pool.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    user_id: UserId,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client for the server at `base_url`, acting as `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or cannot carry a path,
    /// or if the HTTP client fails to build.
    pub fn new(base_url: &str, user_id: UserId, timeout: Duration) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|err| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: parsed,
            user_id,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base URL. An empty final segment yields
    /// a trailing slash, which the server's collection routes require.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn send_json<B, T>(&self, request: reqwest::RequestBuilder, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = request.json(body).send().await?;
        read_json(response).await
    }
}

#[derive(Serialize)]
struct CreateRecordBody<'a> {
    child_id: &'a ChildId,
    #[serde(flatten)]
    fields: &'a NewRecord,
}

#[derive(Serialize)]
struct VoiceLogBody<'a> {
    child_id: &'a ChildId,
    user_id: &'a UserId,
    text: &'a str,
}

#[async_trait]
impl RemoteClient for HttpClient {
    async fn fetch_children(&self) -> Result<Vec<Child>, ClientError> {
        self.get_json(self.endpoint(&["children", ""])).await
    }

    async fn create_child(&self, child: &NewChild) -> Result<Child, ClientError> {
        let url = self.endpoint(&["children", ""]);
        tracing::debug!(%url, "POST");
        self.send_json(self.http.post(url), child).await
    }

    async fn delete_child(&self, child: &ChildId) -> Result<(), ClientError> {
        let url = self.endpoint(&["children", child.as_str()]);
        tracing::debug!(%url, "DELETE");
        let response = self.http.delete(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(status_error(status, &body))
    }

    async fn fetch_collection(
        &self,
        kind: Kind,
        child: &ChildId,
    ) -> Result<Vec<Value>, ClientError> {
        let url = self.endpoint(&["children", child.as_str(), kind.path_segment(), ""]);
        self.get_json(url).await
    }

    async fn create_record(
        &self,
        child: &ChildId,
        record: &NewRecord,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(&[record.kind().path_segment(), ""]);
        tracing::debug!(%url, kind = %record.kind(), "POST");
        let request = self
            .http
            .post(url)
            .query(&[("user_id", self.user_id.as_str())]);
        let body = CreateRecordBody {
            child_id: child,
            fields: record,
        };
        self.send_json(request, &body).await
    }

    async fn update_sleep(
        &self,
        sleep: &RecordId,
        update: &SleepUpdate,
    ) -> Result<Value, ClientError> {
        let id = sleep.to_string();
        let url = self.endpoint(&[Kind::Sleep.path_segment(), &id]);
        tracing::debug!(%url, "PUT");
        self.send_json(self.http.put(url), update).await
    }

    async fn weekly_summary(&self, child: &ChildId) -> Result<WeeklySummary, ClientError> {
        self.get_json(self.endpoint(&["analytics", "weekly-summary", child.as_str()]))
            .await
    }

    async fn handoff_summary(&self, child: &ChildId) -> Result<HandoffSummary, ClientError> {
        self.get_json(self.endpoint(&["ai", "handoff", child.as_str()]))
            .await
    }

    async fn process_voice_log(
        &self,
        child: &ChildId,
        text: &str,
    ) -> Result<VoiceLogResponse, ClientError> {
        let url = self.endpoint(&["ai", "process_log"]);
        tracing::debug!(%url, "POST");
        let body = VoiceLogBody {
            child_id: child,
            user_id: &self.user_id,
            text,
        };
        self.send_json(self.http.post(url), &body).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|err| ClientError::InvalidResponse(err.to_string()))
}

/// Builds a status error, preferring the server's `detail` message.
fn status_error(status: StatusCode, body: &str) -> ClientError {
    #[derive(serde::Deserialize)]
    struct ErrorPayload {
        detail: Value,
    }

    let message = serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map_or_else(
            || body.trim().to_string(),
            |payload| match payload.detail {
                Value::String(detail) => detail,
                other => other.to_string(),
            },
        );
    ClientError::Status { status, message }
}
