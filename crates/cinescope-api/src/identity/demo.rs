//! Fixed-identity provider for demos and offline use.

use super::{Credentials, Identity, IdentityError, LocalIdentityProvider, SignUpRequest};

const DEMO_UID: &str = "demo-user-123";
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_NAME: &str = "Demo User";

/// Accepts any credentials and always yields the demo user.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoIdentityProvider;

impl DemoIdentityProvider {
    /// The demo user.
    #[must_use]
    pub fn identity() -> Identity {
        Identity {
            uid: String::from(DEMO_UID),
            email: Some(String::from(DEMO_EMAIL)),
            display_name: Some(String::from(DEMO_NAME)),
        }
    }
}

impl LocalIdentityProvider for DemoIdentityProvider {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<Identity, IdentityError> {
        tracing::debug!("signing in as demo user");
        Ok(Self::identity())
    }

    async fn sign_up(&self, _request: &SignUpRequest) -> Result<Identity, IdentityError> {
        Ok(Self::identity())
    }
}
