//! Auth
//!
//! The storefront never talks to an identity provider directly; it sees
//! only the [`Authenticator`] capability. The bundled [`MockAuthenticator`]
//! is a hard-coded credential check standing in for a real provider.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::storage::Store;

/// Login credentials as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,

    /// Account password.
    pub password: String,
}

/// Signed-in user profile, persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-assigned identifier.
    pub id: String,

    /// Account email.
    pub email: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,
}

/// Authentication failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The credentials did not match an account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The operation requires a signed-in user.
    #[error("not signed in")]
    SignedOut,
}

/// Identity-provider capability.
pub trait Authenticator {
    /// Verify credentials and produce the account's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the credentials do
    /// not match an account.
    fn authenticate(&self, credentials: &Credentials) -> Result<UserProfile, AuthError>;

    /// Create an account and produce the new profile.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the provider rejects the registration.
    fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserProfile, AuthError>;
}

/// Hard-coded mock provider: one known account, open registration.
#[derive(Debug, Default)]
pub struct MockAuthenticator;

impl Authenticator for MockAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        if credentials.email == "user@example.com" && credentials.password == "password" {
            Ok(UserProfile {
                id: "1".to_string(),
                email: credentials.email.clone(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    fn register(
        &self,
        email: &str,
        _password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserProfile, AuthError> {
        // The mock accepts any registration and keys the account by email.
        Ok(UserProfile {
            id: email.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }
}

/// The client session: the signed-in profile, mirrored to a store.
///
/// Constructed once at session start; mirroring is best-effort, like the
/// cart's.
#[derive(Debug)]
pub struct Session<S> {
    user: Option<UserProfile>,
    storage: S,
}

impl<S> Session<S> {
    /// The signed-in profile, if any.
    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

impl<S: Store<UserProfile>> Session<S> {
    /// Open a session, restoring any persisted profile.
    ///
    /// A missing or unreadable record starts the session signed out.
    pub fn open(storage: S) -> Self {
        let user = match storage.load() {
            Ok(user) => user,
            Err(err) => {
                warn!("discarding unreadable profile record: {err}");
                None
            }
        };

        Session { user, storage }
    }

    /// Authenticate and sign in, persisting the profile best-effort.
    ///
    /// # Errors
    ///
    /// Passes through the authenticator's failure; session state only
    /// changes on success.
    pub fn sign_in(
        &mut self,
        authenticator: &impl Authenticator,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        let user = authenticator.authenticate(credentials)?;

        self.store_profile(&user);
        self.user = Some(user);

        Ok(())
    }

    /// Register a new account and sign in as it.
    ///
    /// # Errors
    ///
    /// Passes through the authenticator's failure; session state only
    /// changes on success.
    pub fn sign_up(
        &mut self,
        authenticator: &impl Authenticator,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), AuthError> {
        let user = authenticator.register(email, password, first_name, last_name)?;

        self.store_profile(&user);
        self.user = Some(user);

        Ok(())
    }

    /// Sign out, clearing the persisted profile best-effort.
    pub fn sign_out(&mut self) {
        self.user = None;

        if let Err(err) = self.storage.clear() {
            warn!("failed to clear profile record: {err}");
        }
    }

    fn store_profile(&self, user: &UserProfile) {
        if let Err(err) = self.storage.save(user) {
            warn!("failed to persist profile: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStore;

    use super::*;

    fn known_credentials() -> Credentials {
        Credentials {
            email: "user@example.com".to_string(),
            password: "password".to_string(),
        }
    }

    #[test]
    fn mock_accepts_only_the_known_account() {
        let auth = MockAuthenticator;

        let profile = auth.authenticate(&known_credentials());
        assert!(profile.is_ok_and(|user| user.first_name == "John"));

        let wrong = Credentials {
            password: "hunter2".to_string(),
            ..known_credentials()
        };

        assert_eq!(auth.authenticate(&wrong), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn sign_in_persists_the_profile() -> TestResult {
        let store = MemoryStore::new();
        let mut session = Session::open(&store);

        assert!(!session.is_signed_in());

        session.sign_in(&MockAuthenticator, &known_credentials())?;

        assert!(session.is_signed_in());
        assert!(store.raw().is_some());

        Ok(())
    }

    #[test]
    fn session_restores_the_profile_on_open() -> TestResult {
        let store = MemoryStore::new();

        {
            let mut session = Session::open(&store);
            session.sign_in(&MockAuthenticator, &known_credentials())?;
        }

        let restored = Session::open(&store);

        assert_eq!(
            restored.user().map(|user| user.email.as_str()),
            Some("user@example.com")
        );

        Ok(())
    }

    #[test]
    fn failed_sign_in_leaves_the_session_signed_out() {
        let mut session = Session::open(MemoryStore::new());

        let wrong = Credentials {
            email: "who@example.com".to_string(),
            password: "nope".to_string(),
        };

        assert_eq!(
            session.sign_in(&MockAuthenticator, &wrong),
            Err(AuthError::InvalidCredentials)
        );
        assert!(!session.is_signed_in());
    }

    #[test]
    fn sign_up_signs_in_as_the_new_account() -> TestResult {
        let mut session = Session::open(MemoryStore::new());

        session.sign_up(&MockAuthenticator, "ada@example.com", "secret", "Ada", "Lovelace")?;

        assert_eq!(
            session.user().map(|user| user.first_name.as_str()),
            Some("Ada")
        );

        Ok(())
    }

    #[test]
    fn sign_out_clears_the_session_and_the_record() -> TestResult {
        let store = MemoryStore::new();
        let mut session = Session::open(&store);

        session.sign_in(&MockAuthenticator, &known_credentials())?;
        session.sign_out();

        assert!(!session.is_signed_in());
        assert_eq!(store.raw(), None);

        Ok(())
    }

    #[test]
    fn corrupt_profile_record_starts_signed_out() {
        let store = MemoryStore::with_record("{oops");
        let session: Session<&MemoryStore> = Session::open(&store);

        assert!(!session.is_signed_in());
    }
}
