/// HR backend client: the single point of entry for every call to the remote HR service.
///
/// Handlers never build requests themselves; they go through `HrBackend` with the bearer
/// token of the explicit session. Failures are surfaced once and never retried.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::candidate::{null_as_default, RankingResponse};
use crate::models::profile::CandidateProfileData;
use crate::ranking::filters::RankingRequest;

#[cfg(test)]
pub(crate) mod fake;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    /// Raw role string; parsed into `Role` by the session layer.
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of both `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// Filter parameters forwarded with a profile request so the backend can pick the
/// recommended CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileQuery {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub required: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preferred: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jd: String,
}

#[derive(Debug, Clone)]
pub struct CvUpload {
    pub filename: String,
    pub bytes: Bytes,
    pub category: String,
    pub set_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub cv_id: Option<i64>,
    /// Free-form analysis produced by the backend parser.
    #[serde(default)]
    pub analysis: Value,
}

#[derive(Debug, Clone)]
pub struct CvDownload {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
pub trait HrBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, BackendError>;

    async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, BackendError>;

    async fn rank(
        &self,
        token: &str,
        request: &RankingRequest,
    ) -> Result<RankingResponse, BackendError>;

    async fn cv_count(&self, token: &str) -> Result<u64, BackendError>;

    async fn candidate_profile(
        &self,
        token: &str,
        candidate_id: &str,
        query: &ProfileQuery,
    ) -> Result<CandidateProfileData, BackendError>;

    async fn set_primary(&self, token: &str, cv_id: i64) -> Result<Value, BackendError>;

    async fn upload_cv(&self, token: &str, upload: CvUpload)
        -> Result<UploadResponse, BackendError>;

    async fn download_cv(&self, token: &str, cv_id: i64) -> Result<CvDownload, BackendError>;
}

/// `reqwest` implementation of `HrBackend`.
#[derive(Clone)]
pub struct HrApiClient {
    client: Client,
    base_url: String,
    upload_timeout: Duration,
}

impl HrApiClient {
    pub fn new(base_url: impl Into<String>, upload_timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            upload_timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = check_status(request.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(BackendError::Parse)
    }
}

/// Converts a non-success response into `BackendError::Status`, preferring the backend's
/// own error message over the raw body.
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(body);
    warn!("HR backend returned {}: {}", status, message);
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: String) -> String {
    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.error.or(e.message))
        .unwrap_or(body)
}

#[async_trait]
impl HrBackend for HrApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, BackendError> {
        debug!("Logging in {email}");
        self.send_json(
            self.client
                .post(self.url("/auth/login"))
                .json(&LoginRequest { email, password }),
        )
        .await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, BackendError> {
        debug!("Registering {} as {}", request.email, request.role);
        self.send_json(self.client.post(self.url("/auth/register")).json(request))
            .await
    }

    async fn rank(
        &self,
        token: &str,
        request: &RankingRequest,
    ) -> Result<RankingResponse, BackendError> {
        let response: RankingResponse = self
            .send_json(
                self.client
                    .post(self.url("/ranking"))
                    .bearer_auth(token)
                    .json(request),
            )
            .await?;
        debug!(
            "Ranking returned {} candidates (count {})",
            response.candidates.len(),
            response.count
        );
        Ok(response)
    }

    async fn cv_count(&self, token: &str) -> Result<u64, BackendError> {
        let body: CountResponse = self
            .send_json(self.client.get(self.url("/cvs/meta/count")).bearer_auth(token))
            .await?;
        Ok(body.count)
    }

    async fn candidate_profile(
        &self,
        token: &str,
        candidate_id: &str,
        query: &ProfileQuery,
    ) -> Result<CandidateProfileData, BackendError> {
        self.send_json(
            self.client
                .get(self.url(&format!("/candidates/{candidate_id}")))
                .bearer_auth(token)
                .query(query),
        )
        .await
    }

    async fn set_primary(&self, token: &str, cv_id: i64) -> Result<Value, BackendError> {
        self.send_json(
            self.client
                .patch(self.url(&format!("/cvs/{cv_id}/primary")))
                .bearer_auth(token)
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn upload_cv(
        &self,
        token: &str,
        upload: CvUpload,
    ) -> Result<UploadResponse, BackendError> {
        let file = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.filename.clone())
            .mime_str("application/pdf")?;
        let mut form = multipart::Form::new()
            .part("cv", file)
            .text("category", upload.category.clone());
        if upload.set_primary {
            form = form.text("setPrimary", "true");
        }

        debug!(
            "Uploading CV {} ({} bytes, category {})",
            upload.filename,
            upload.bytes.len(),
            upload.category
        );
        self.send_json(
            self.client
                .post(self.url("/cvs/upload"))
                .bearer_auth(token)
                .timeout(self.upload_timeout)
                .multipart(form),
        )
        .await
    }

    async fn download_cv(&self, token: &str, cv_id: i64) -> Result<CvDownload, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/cvs/{cv_id}/download")))
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(response).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(CvDownload {
            bytes: response.bytes().await?,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = HrApiClient::new("https://hr.example.com/api/", Duration::from_secs(30));
        assert_eq!(client.url("/ranking"), "https://hr.example.com/api/ranking");
        assert_eq!(client.url("cvs/7/primary"), "https://hr.example.com/api/cvs/7/primary");
    }

    #[test]
    fn test_error_message_prefers_backend_error_field() {
        assert_eq!(
            error_message(r#"{"error":"Credenciales inválidas"}"#.to_string()),
            "Credenciales inválidas"
        );
        assert_eq!(error_message(r#"{"message":"nope"}"#.to_string()), "nope");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("Bad Gateway".to_string()), "Bad Gateway");
        assert_eq!(error_message(String::new()), "");
    }

    #[test]
    fn test_login_response_parses_role() {
        let body = r#"{"token":"abc","user":{"id":3,"role":"reclutador","email":"r@x.com"}}"#;
        let parsed: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.token, "abc");
        assert_eq!(parsed.user.role, "reclutador");
        assert_eq!(parsed.user.email.as_deref(), Some("r@x.com"));
    }

    #[test]
    fn test_profile_query_omits_empty_params() {
        let query = ProfileQuery {
            required: "rust".to_string(),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&query).unwrap();
        assert_eq!(encoded, serde_json::json!({ "required": "rust" }));
    }

    #[test]
    fn test_count_response_tolerates_null() {
        let parsed: CountResponse = serde_json::from_str(r#"{"count":null}"#).unwrap();
        assert_eq!(parsed.count, 0);
    }
}
