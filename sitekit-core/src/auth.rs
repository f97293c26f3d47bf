//! Credential-marker auth state.
//!
//! The marker is the token string the login page stores after the backend
//! answers `/auth/login`. Its presence is all this layer checks; expiry and
//! signatures are the server's business.

use crate::config::SiteConfig;
use crate::error::{AuthError, StoreError};
use crate::flash::FlashRelay;
use crate::{Navigator, SessionStore};
use serde::Serialize;
use std::rc::Rc;

const DEFAULT_TOKEN_TYPE: &str = "bearer";

/// Serializable view of the auth state for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub authenticated: bool,
    pub token_type: Option<String>,
}

pub struct AuthState<D, T, N> {
    durable: D,
    flash: FlashRelay<T>,
    navigator: N,
    config: Rc<SiteConfig>,
}

impl<D, T, N> AuthState<D, T, N>
where
    D: SessionStore,
    T: SessionStore,
    N: Navigator,
{
    pub fn new(durable: D, tab: T, navigator: N, config: Rc<SiteConfig>) -> Self {
        let flash = FlashRelay::new(tab, config.storage.flash.clone());
        Self {
            durable,
            flash,
            navigator,
            config,
        }
    }

    /// The stored token, if any. An empty string counts as no token.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .durable
            .get(&self.config.storage.access_token)?
            .filter(|token| !token.is_empty()))
    }

    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    pub fn token_type(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .durable
            .get(&self.config.storage.token_type)?
            .filter(|kind| !kind.is_empty()))
    }

    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    pub fn is_authenticated(&self) -> Result<bool, StoreError> {
        Ok(self.token()?.is_some())
    }

    /// Send anonymous visitors to the login page.
    ///
    /// Returns `Ok(false)` after posting a flash message and redirecting; the
    /// caller must then abandon whatever it was guarding.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or navigation fails.
    pub fn require_auth(&self) -> Result<bool, AuthError> {
        self.require_auth_with(&self.config.messages.login_required)
    }

    /// [`require_auth`](Self::require_auth) with a caller-chosen flash text.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or navigation fails.
    pub fn require_auth_with(&self, message: &str) -> Result<bool, AuthError> {
        if self.is_authenticated()? {
            return Ok(true);
        }
        self.flash.post(message)?;
        let target = self.config.login_href();
        log::info!("not signed in, redirecting to {target}");
        self.navigator.redirect(&target)?;
        Ok(false)
    }

    /// Forget the credential marker and go home.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or navigation fails.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.durable.remove(&self.config.storage.access_token)?;
        self.durable.remove(&self.config.storage.token_type)?;
        self.flash.post(&self.config.messages.signed_out)?;
        let target = self.config.home_href();
        log::info!("signed out, redirecting to {target}");
        self.navigator.redirect(&target)?;
        Ok(())
    }

    /// Store the marker handed out by the login endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage rejects the write.
    pub fn sign_in(&self, token: &str, token_type: &str) -> Result<(), StoreError> {
        self.durable.set(&self.config.storage.access_token, token)?;
        self.durable.set(&self.config.storage.token_type, token_type)
    }

    /// `Authorization` header value for API calls, e.g. `bearer abc123`.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    pub fn authorization_header(&self) -> Result<Option<String>, StoreError> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };
        let kind = self
            .token_type()?
            .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string());
        Ok(Some(format!("{kind} {token}")))
    }

    /// Best-effort snapshot; unreadable storage reads as signed out.
    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            authenticated: self.is_authenticated().unwrap_or(false),
            token_type: self.token_type().ok().flatten(),
        }
    }

    #[must_use]
    pub const fn flash(&self) -> &FlashRelay<T> {
        &self.flash
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }
}
