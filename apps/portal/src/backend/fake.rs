//! In-memory `HrBackend` for router and handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use super::{
    BackendError, CvDownload, CvUpload, HrBackend, LoginResponse, LoginUser, ProfileQuery,
    RegisterRequest, UploadResponse,
};
use crate::models::candidate::RankingResponse;
use crate::models::profile::CandidateProfileData;
use crate::ranking::filters::RankingRequest;

#[derive(Default)]
pub struct FakeBackend {
    /// Role string returned by login and register.
    pub role: String,
    pub ranking: RankingResponse,
    pub profile: Option<CandidateProfileData>,
    pub cv_count: u64,
    /// When set, every call fails with this backend status.
    pub fail_status: Mutex<Option<u16>>,
    pub rank_requests: Mutex<Vec<RankingRequest>>,
    pub profile_queries: Mutex<Vec<(String, ProfileQuery)>>,
    pub primary_calls: Mutex<Vec<i64>>,
    pub uploads: Mutex<Vec<CvUpload>>,
    pub tokens: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_role(role: &str) -> Self {
        Self {
            role: role.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(role: &str, status: u16) -> Self {
        let backend = Self::with_role(role);
        backend.fail_with(Some(status));
        backend
    }

    pub fn fail_with(&self, status: Option<u16>) {
        *self.fail_status.lock().unwrap() = status;
    }

    fn check(&self, token: Option<&str>) -> Result<(), BackendError> {
        if let Some(token) = token {
            self.tokens.lock().unwrap().push(token.to_string());
        }
        match *self.fail_status.lock().unwrap() {
            Some(status) => Err(BackendError::Status {
                status,
                message: "fake failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn login_response(&self, email: &str) -> LoginResponse {
        LoginResponse {
            token: format!("token-{email}"),
            user: LoginUser {
                role: self.role.clone(),
                email: Some(email.to_string()),
            },
        }
    }
}

#[async_trait]
impl HrBackend for FakeBackend {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, BackendError> {
        self.check(None)?;
        Ok(self.login_response(email))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, BackendError> {
        self.check(None)?;
        Ok(self.login_response(&request.email))
    }

    async fn rank(
        &self,
        token: &str,
        request: &RankingRequest,
    ) -> Result<RankingResponse, BackendError> {
        self.check(Some(token))?;
        self.rank_requests.lock().unwrap().push(request.clone());
        Ok(self.ranking.clone())
    }

    async fn cv_count(&self, token: &str) -> Result<u64, BackendError> {
        self.check(Some(token))?;
        Ok(self.cv_count)
    }

    async fn candidate_profile(
        &self,
        token: &str,
        candidate_id: &str,
        query: &ProfileQuery,
    ) -> Result<CandidateProfileData, BackendError> {
        self.check(Some(token))?;
        self.profile_queries
            .lock()
            .unwrap()
            .push((candidate_id.to_string(), query.clone()));
        self.profile.clone().ok_or(BackendError::Status {
            status: 404,
            message: "candidate not found".to_string(),
        })
    }

    async fn set_primary(&self, token: &str, cv_id: i64) -> Result<Value, BackendError> {
        self.check(Some(token))?;
        self.primary_calls.lock().unwrap().push(cv_id);
        Ok(json!({ "ok": true }))
    }

    async fn upload_cv(
        &self,
        token: &str,
        upload: CvUpload,
    ) -> Result<UploadResponse, BackendError> {
        self.check(Some(token))?;
        self.uploads.lock().unwrap().push(upload);
        Ok(UploadResponse {
            cv_id: Some(42),
            analysis: json!({ "skills": ["rust"] }),
        })
    }

    async fn download_cv(&self, token: &str, cv_id: i64) -> Result<CvDownload, BackendError> {
        self.check(Some(token))?;
        Ok(CvDownload {
            bytes: Bytes::from(format!("%PDF-1.4 cv {cv_id}")),
            content_type: Some("application/pdf".to_string()),
        })
    }
}
