//! Identity providers.
//!
//! The catalog only needs to know whether a caller may proceed and what name
//! to greet them with. Providers are picked by configuration; both yield the
//! same [`Identity`].
#![allow(clippy::future_not_send)]

mod demo;
mod firebase;

use thiserror::Error;

use crate::tmdb::UpstreamError;

pub use demo::DemoIdentityProvider;
#[allow(clippy::module_name_repetitions)]
pub use firebase::{
    DEFAULT_FIREBASE_BASE_URL, FirebaseIdentityProvider, FirebaseIdentityProviderBuilder,
};

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-assigned user ID.
    pub uid: String,
    /// Email address.
    pub email: Option<String>,
    /// Display name ("First Last").
    pub display_name: Option<String>,
}

/// Email/password sign-in input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Account creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    /// Email and password for the new account.
    pub credentials: Credentials,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl SignUpRequest {
    /// Display name stored on the new account.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Sign-in failure.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum IdentityError {
    /// Unknown email, wrong password or disabled account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Sign-up with an email that already has an account.
    #[error("an account already exists for this email")]
    EmailExists,

    /// Sign-up with a password the provider refuses.
    #[error("password is too weak: {0}")]
    WeakPassword(String),

    /// The provider could not be reached or answered unexpectedly.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Signs users in and creates accounts.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] if the provider rejects the credentials or
    /// cannot be reached.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, IdentityError>;

    /// Creates an account and sets its display name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] if the provider refuses the account or
    /// cannot be reached.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Identity, IdentityError>;
}

/// The current caller, signed in or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// Nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Session for `identity`.
    #[must_use]
    pub const fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Whether gated requests may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        self.identity.is_some()
    }

    /// Name to show for the caller: display name, then email, then `Guest`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.identity
            .as_ref()
            .and_then(|id| id.display_name.as_deref().or(id.email.as_deref()))
            .unwrap_or("Guest")
    }

    /// The signed-in identity.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Forgets the identity.
    pub fn sign_out(&mut self) {
        self.identity = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(display_name: Option<&str>, email: Option<&str>) -> Identity {
        Identity {
            uid: String::from("u1"),
            email: email.map(String::from),
            display_name: display_name.map(String::from),
        }
    }

    #[test]
    fn test_anonymous_session_is_not_allowed() {
        // Arrange
        let session = Session::anonymous();

        // Act & Assert
        assert!(!session.is_allowed());
        assert_eq!(session.display_name(), "Guest");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        // Arrange
        let named = Session::signed_in(identity(Some("Ada Lovelace"), Some("ada@example.com")));
        let unnamed = Session::signed_in(identity(None, Some("ada@example.com")));

        // Act & Assert
        assert_eq!(named.display_name(), "Ada Lovelace");
        assert_eq!(unnamed.display_name(), "ada@example.com");
        assert!(unnamed.is_allowed());
    }

    #[test]
    fn test_sign_out_revokes_access() {
        // Arrange
        let mut session = Session::signed_in(identity(Some("Ada"), None));

        // Act
        session.sign_out();

        // Assert
        assert!(!session.is_allowed());
        assert!(session.identity().is_none());
    }

    #[test]
    fn test_sign_up_display_name() {
        // Arrange
        let request = SignUpRequest {
            credentials: Credentials {
                email: String::from("ada@example.com"),
                password: String::from("secret1"),
            },
            first_name: String::from("Ada"),
            last_name: String::from("Lovelace"),
        };

        // Act & Assert
        assert_eq!(request.display_name(), "Ada Lovelace");
    }
}
