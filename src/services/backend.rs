use crate::config::BackendSettings;
use crate::models::{Candidate, CandidateRole, DeletionResult, MatchRecord, Profile, Session, User};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the hosted backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Unauthorized: invalid or expired token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service key not configured")]
    MissingServiceKey,
}

/// Identity provider operations
pub trait AuthProvider {
    fn sign_in(&self, email: &str, password: &str) -> impl Future<Output = Result<Session, BackendError>> + Send;

    /// URL the client should open to start an OAuth flow
    fn sign_in_with_oauth(&self, provider: &str, redirect_to: Option<&str>) -> Result<String, BackendError>;

    /// `None` when the account needs email confirmation before a session is issued
    fn sign_up(&self, email: &str, password: &str) -> impl Future<Output = Result<Option<Session>, BackendError>> + Send;

    fn sign_out(&self, access_token: &str) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn current_user(&self, access_token: &str) -> impl Future<Output = Result<Option<User>, BackendError>> + Send;

    fn current_profile(&self, access_token: &str) -> impl Future<Output = Result<Option<Profile>, BackendError>> + Send;
}

/// Profile and match persistence
pub trait ProfileStore {
    fn upsert_profile(&self, access_token: &str, profile: &Profile) -> impl Future<Output = Result<Profile, BackendError>> + Send;

    fn delete_profile(&self, user_id: &str) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn list_matches(&self, access_token: &str, user_id: &str) -> impl Future<Output = Result<Vec<MatchRecord>, BackendError>> + Send;

    /// Onboarded profiles that can be shown as cards, minus `exclude_user`'s own
    fn list_candidates(
        &self,
        role: Option<CandidateRole>,
        exclude_user: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candidate>, BackendError>> + Send;
}

/// Serverless account deletion
pub trait AccountDeletion {
    fn delete_account(&self, access_token: &str) -> impl Future<Output = Result<DeletionResult, BackendError>> + Send;
}

/// REST client for the hosted backend
///
/// Covers:
/// - Password and OAuth sign-in, sign-up, sign-out
/// - Reading and writing the `profiles` table
/// - Listing matches
/// - Invoking the account deletion function
pub struct BackendClient {
    base_url: String,
    anon_key: String,
    service_key: Option<String>,
    deletion_function: String,
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            service_key: settings.service_key.clone(),
            deletion_function: settings.deletion_function.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request authorised as the given user
    fn as_user(&self, builder: RequestBuilder, access_token: &str) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    fn as_anon(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    fn as_service(&self, builder: RequestBuilder) -> Result<RequestBuilder, BackendError> {
        let key = self.service_key.as_ref().ok_or(BackendError::MissingServiceKey)?;
        Ok(builder.header("apikey", key).bearer_auth(key))
    }
}

/// Turn a non-success response into a [`BackendError`]
async fn check(response: Response, what: &str) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(BackendError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or(body);

    tracing::warn!("Backend call '{}' failed: {} - {}", what, status, message);
    Err(BackendError::ApiError {
        status: status.as_u16(),
        message,
    })
}

fn validate_credentials(email: &str, password: &str) -> Result<(), BackendError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(BackendError::InvalidInput("a valid email is required".into()));
    }
    if password.is_empty() {
        return Err(BackendError::InvalidInput("password is required".into()));
    }
    Ok(())
}

impl AuthProvider for BackendClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        validate_credentials(email, password)?;

        let request = self
            .client
            .post(self.url("/auth/v1/token?grant_type=password"))
            .json(&json!({ "email": email, "password": password }));

        let response = check(self.as_anon(request).send().await?, "sign_in").await?;
        let session: Session = response.json().await?;

        tracing::debug!("Signed in {}", email);
        Ok(session)
    }

    fn sign_in_with_oauth(&self, provider: &str, redirect_to: Option<&str>) -> Result<String, BackendError> {
        if provider.trim().is_empty() {
            return Err(BackendError::InvalidInput("provider is required".into()));
        }

        let mut url = format!(
            "{}/auth/v1/authorize?provider={}",
            self.base_url,
            urlencoding::encode(provider)
        );
        if let Some(redirect) = redirect_to {
            url.push_str("&redirect_to=");
            url.push_str(&urlencoding::encode(redirect));
        }
        Ok(url)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError> {
        validate_credentials(email, password)?;

        let request = self
            .client
            .post(self.url("/auth/v1/signup"))
            .json(&json!({ "email": email, "password": password }));

        let response = check(self.as_anon(request).send().await?, "sign_up").await?;
        let body: Value = response.json().await?;

        if body.get("access_token").is_none() {
            tracing::info!("Sign-up for {} awaiting email confirmation", email);
            return Ok(None);
        }

        serde_json::from_value(body)
            .map(Some)
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse session: {}", e)))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let request = self.client.post(self.url("/auth/v1/logout"));
        check(self.as_user(request, access_token).send().await?, "sign_out").await?;
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<User>, BackendError> {
        let request = self.client.get(self.url("/auth/v1/user"));

        match check(self.as_user(request, access_token).send().await?, "current_user").await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(BackendError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn current_profile(&self, access_token: &str) -> Result<Option<Profile>, BackendError> {
        let Some(user) = self.current_user(access_token).await? else {
            return Ok(None);
        };

        let url = self.url(&format!(
            "/rest/v1/profiles?id=eq.{}&select=*",
            urlencoding::encode(&user.id)
        ));
        let request = self.client.get(url);
        let response = check(self.as_user(request, access_token).send().await?, "current_profile").await?;

        let mut rows: Vec<Profile> = response.json().await?;
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }
}

impl ProfileStore for BackendClient {
    async fn upsert_profile(&self, access_token: &str, profile: &Profile) -> Result<Profile, BackendError> {
        let request = self
            .client
            .post(self.url("/rest/v1/profiles"))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(profile);

        let response = check(self.as_user(request, access_token).send().await?, "upsert_profile").await?;
        let mut rows: Vec<Profile> = response.json().await?;

        if rows.is_empty() {
            return Err(BackendError::InvalidResponse("upsert returned no rows".into()));
        }
        tracing::debug!("Upserted profile {}", profile.id);
        Ok(rows.swap_remove(0))
    }

    async fn delete_profile(&self, user_id: &str) -> Result<(), BackendError> {
        let url = self.url(&format!("/rest/v1/profiles?id=eq.{}", urlencoding::encode(user_id)));
        let request = self.as_service(self.client.delete(url))?;

        check(request.send().await?, "delete_profile").await?;
        tracing::info!("Deleted profile {}", user_id);
        Ok(())
    }

    async fn list_matches(&self, access_token: &str, user_id: &str) -> Result<Vec<MatchRecord>, BackendError> {
        let url = self.url(&format!(
            "/rest/v1/matches?user_id=eq.{}&select=*&order=decided_at.desc",
            urlencoding::encode(user_id)
        ));
        let request = self.client.get(url);
        let response = check(self.as_user(request, access_token).send().await?, "list_matches").await?;

        Ok(response.json().await?)
    }

    async fn list_candidates(
        &self,
        role: Option<CandidateRole>,
        exclude_user: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Candidate>, BackendError> {
        let mut path = format!("/rest/v1/profiles?select=*&onboarding_complete=eq.true&limit={}", limit);
        if let Some(role) = role {
            path.push_str(&format!("&role=eq.{}", role.as_str()));
        }
        if let Some(user_id) = exclude_user {
            path.push_str(&format!("&id=neq.{}", urlencoding::encode(user_id)));
        }

        let request = self.as_anon(self.client.get(self.url(&path)));
        let response = check(request.send().await?, "list_candidates").await?;
        let profiles: Vec<Profile> = response.json().await?;

        let total = profiles.len();
        let candidates: Vec<Candidate> = profiles.into_iter().filter_map(Profile::into_candidate).collect();
        tracing::debug!("Fetched {} candidates ({} profiles)", candidates.len(), total);

        Ok(candidates)
    }
}

impl AccountDeletion for BackendClient {
    async fn delete_account(&self, access_token: &str) -> Result<DeletionResult, BackendError> {
        let url = self.url(&format!("/functions/v1/{}", self.deletion_function));
        let request = self.client.post(url).json(&json!({}));

        let response = check(self.as_user(request, access_token).send().await?, "delete_account").await?;
        let result: DeletionResult = response.json().await?;

        if !result.success {
            tracing::warn!(
                "Account deletion function reported failure: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(result)
    }
}
