//! Music-service app credentials.
//!
//! Secrets are wrapped in [`SecretString`] so `Debug` output and logs never
//! contain them. Presence is checked lazily, right before a credential
//! exchange, so a misconfigured deployment fails without touching the network.

use folio_config::MusicConfig;
use folio_types::{FolioError, traits::Result};
use secrecy::SecretString;

/// OAuth client credentials plus the optional refresh credential.
#[derive(Debug, Clone)]
pub struct Credentials {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    refresh_token: Option<SecretString>,
    redirect_uri: Option<String>,
}

/// Treats unset and empty settings alike.
fn present(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

impl Credentials {
    #[must_use]
    pub fn from_config(music: &MusicConfig) -> Self {
        Self {
            client_id: present(music.client_id.as_ref()),
            client_secret: present(music.client_secret.as_ref()).map(SecretString::from),
            refresh_token: present(music.refresh_token.as_ref()).map(SecretString::from),
            redirect_uri: present(music.redirect_uri.as_ref()),
        }
    }

    /// Everything a refresh-token exchange needs.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Config`] naming every missing setting.
    pub fn for_refresh(&self) -> Result<(&str, &SecretString, &SecretString)> {
        match (&self.client_id, &self.client_secret, &self.refresh_token) {
            (Some(id), Some(secret), Some(refresh)) => Ok((id.as_str(), secret, refresh)),
            _ => Err(missing_error(&[
                ("music.client_id", self.client_id.is_none()),
                ("music.client_secret", self.client_secret.is_none()),
                ("music.refresh_token", self.refresh_token.is_none()),
            ])),
        }
    }

    /// Everything an authorization-code exchange needs.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Config`] naming every missing setting.
    pub fn for_authorization(&self) -> Result<(&str, &SecretString, &str)> {
        match (&self.client_id, &self.client_secret, &self.redirect_uri) {
            (Some(id), Some(secret), Some(redirect)) => {
                Ok((id.as_str(), secret, redirect.as_str()))
            }
            _ => Err(missing_error(&[
                ("music.client_id", self.client_id.is_none()),
                ("music.client_secret", self.client_secret.is_none()),
                ("music.redirect_uri", self.redirect_uri.is_none()),
            ])),
        }
    }
}

fn missing_error(checks: &[(&str, bool)]) -> FolioError {
    let missing: Vec<&str> = checks
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(name, _)| *name)
        .collect();
    FolioError::Config(format!("missing {}", missing.join(", ")))
}
