//! `FirebaseIdentityProvider` - Firebase Auth REST (Identity Toolkit v1).

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::{Credentials, Identity, IdentityError, LocalIdentityProvider, SignUpRequest};
use crate::tmdb::UpstreamError;

/// Default base URL for the Identity Toolkit API.
pub const DEFAULT_FIREBASE_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1/";

// Relative paths keep `accounts:` from parsing as a URL scheme on join.
const SIGN_IN_PATH: &str = "./accounts:signInWithPassword";
const SIGN_UP_PATH: &str = "./accounts:signUp";
const UPDATE_PATH: &str = "./accounts:update";

/// Email/password body for sign-in and sign-up.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordBody<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Profile update body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

/// Account fields returned by every `accounts:*` call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl AccountResponse {
    fn into_identity(self) -> Identity {
        Identity {
            uid: self.local_id,
            email: self.email,
            display_name: self.display_name.filter(|n| !n.is_empty()),
        }
    }
}

/// `{"error": {"code": 400, "message": "EMAIL_NOT_FOUND"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Firebase Auth client.
#[derive(Debug)]
pub struct FirebaseIdentityProvider {
    http_client: Client,
    base_url: Url,
    api_key: String,
}

/// Builder for `FirebaseIdentityProvider`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct FirebaseIdentityProviderBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl FirebaseIdentityProviderBuilder {
    /// Overrides the base URL (emulator or wiremock).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the Web API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets a transport timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the provider.
    ///
    /// # Errors
    ///
    /// - `api_key` or `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<FirebaseIdentityProvider> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;
        let mut base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_FIREBASE_BASE_URL)
                .context("invalid default Firebase base URL")?,
        };
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(&user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("failed to build HTTP client")?;

        Ok(FirebaseIdentityProvider {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl FirebaseIdentityProvider {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> FirebaseIdentityProviderBuilder {
        FirebaseIdentityProviderBuilder::default()
    }

    /// POSTs `body` to `path` and decodes the account response.
    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, IdentityError> {
        let endpoint = path.trim_start_matches("./");
        let url = self
            .base_url
            .join(path)
            .map_err(|source| UpstreamError::Url {
                endpoint: String::from(endpoint),
                source,
            })?;
        let transport = |source| UpstreamError::Transport {
            endpoint: String::from(endpoint),
            source,
        };

        tracing::debug!(endpoint, "Firebase Auth request");
        let response = self
            .http_client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(classify_error(endpoint, status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|source| {
            IdentityError::Upstream(UpstreamError::Decode {
                endpoint: String::from(endpoint),
                source,
            })
        })
    }
}

/// Maps Firebase error codes onto [`IdentityError`].
fn classify_error(endpoint: &str, status: u16, body: &str) -> IdentityError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map_or_else(|_| String::from(body), |envelope| envelope.error.message);
    // Codes may carry a suffix: "WEAK_PASSWORD : Password should be ..."
    let code = message.split([' ', ':']).next().unwrap_or_default();

    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
        | "USER_DISABLED" | "INVALID_EMAIL" => IdentityError::InvalidCredentials,
        "EMAIL_EXISTS" => IdentityError::EmailExists,
        "WEAK_PASSWORD" => IdentityError::WeakPassword(message),
        _ => IdentityError::Upstream(UpstreamError::Status {
            endpoint: String::from(endpoint),
            status,
            message,
        }),
    }
}

impl LocalIdentityProvider for FirebaseIdentityProvider {
    #[instrument(skip_all)]
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, IdentityError> {
        let body = PasswordBody {
            email: &credentials.email,
            password: &credentials.password,
            return_secure_token: true,
        };
        let account: AccountResponse = self.post(SIGN_IN_PATH, &body).await?;
        Ok(account.into_identity())
    }

    #[instrument(skip_all)]
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Identity, IdentityError> {
        let body = PasswordBody {
            email: &request.credentials.email,
            password: &request.credentials.password,
            return_secure_token: true,
        };
        let created: AccountResponse = self.post(SIGN_UP_PATH, &body).await?;
        let Some(id_token) = created.id_token.as_deref() else {
            tracing::warn!("sign-up returned no ID token, display name not set");
            return Ok(created.into_identity());
        };

        let display_name = request.display_name();
        let update = UpdateBody {
            id_token,
            display_name: &display_name,
            return_secure_token: true,
        };
        let updated: AccountResponse = self.post(UPDATE_PATH, &update).await?;

        Ok(Identity {
            uid: created.local_id,
            email: updated.email.or(created.email),
            display_name: Some(display_name),
        })
    }
}
