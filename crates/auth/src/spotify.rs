//! Spotify accounts-service token exchange parameters and response parsing.
//!
//! Both grants go to the same endpoint as a form-encoded `POST`:
//! `refresh_token` on every cache miss, `authorization_code` once during
//! bootstrap.

use folio_types::{CachedToken, FolioError, traits::Result};

/// Build the form-urlencoded parameters for a refresh-token exchange.
#[must_use]
pub fn refresh_form_params<'a>(
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
) -> [(&'static str, &'a str); 4] {
    [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ]
}

/// Build the form-urlencoded parameters for an authorization-code exchange.
#[must_use]
pub fn authorization_form_params<'a>(
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
) -> [(&'static str, &'a str); 5] {
    [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
    ]
}

/// A parsed token endpoint response.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub token: CachedToken,
    /// Lifetime in seconds as advertised by the endpoint.
    pub expires_in: Option<u64>,
    /// Only present on authorization-code grants (and on rotation).
    pub refresh_token: Option<String>,
}

/// Parse the token endpoint JSON response into a [`TokenGrant`].
///
/// # Errors
///
/// Returns [`FolioError::Parse`] if the response is missing the `access_token` field.
pub fn parse_token_response(json: &serde_json::Value) -> Result<TokenGrant> {
    let access_token = json
        .get("access_token")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| FolioError::Parse("missing access_token in token response".into()))?;

    let mut token = CachedToken::new(access_token);
    if let Some(token_type) = json.get("token_type").and_then(serde_json::Value::as_str) {
        token.token_type = Some(token_type.to_string());
    }
    let expires_in = json.get("expires_in").and_then(serde_json::Value::as_u64);
    if let Some(secs) = expires_in {
        token = token.with_expiry(secs);
    }
    let refresh_token = json
        .get("refresh_token")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);

    Ok(TokenGrant {
        token,
        expires_in,
        refresh_token,
    })
}
