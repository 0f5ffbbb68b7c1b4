//! One-off authorization-code exchange used to obtain the refresh credential.
//!
//! Run once by a human (`folio authorize <CODE>`) after approving the app in
//! a browser; the printed refresh token then goes into configuration.

use folio_config::MusicConfig;
use folio_types::{FolioError, traits::Result};
use secrecy::ExposeSecret as _;

use crate::{Credentials, TokenGrant, spotify};

/// Exchange an authorization `code` for an access and refresh token.
///
/// # Errors
///
/// Returns [`FolioError::Config`] before any network access if the client id,
/// client secret or redirect URI is missing, [`FolioError::UpstreamAuth`] if
/// the endpoint rejects the code, and [`FolioError::Parse`] if the response
/// lacks an access token.
pub async fn exchange_code(
    http: &reqwest::Client,
    music: &MusicConfig,
    code: &str,
) -> Result<TokenGrant> {
    let credentials = Credentials::from_config(music);
    let (client_id, client_secret, redirect_uri) = credentials.for_authorization()?;
    let params = spotify::authorization_form_params(
        client_id,
        client_secret.expose_secret(),
        code,
        redirect_uri,
    );

    let resp = http.post(&music.token_url).form(&params).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FolioError::UpstreamAuth {
            status: status.as_u16(),
            body,
        });
    }

    let json: serde_json::Value = resp.json().await?;
    spotify::parse_token_response(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn music(token_url: String) -> MusicConfig {
        MusicConfig {
            client_id: Some("cid".into()),
            client_secret: Some("sec".into()),
            redirect_uri: Some("http://localhost:3000/callback".into()),
            token_url,
            ..MusicConfig::default()
        }
    }

    #[tokio::test]
    async fn test_exchange_code_returns_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=the-code"))
            .and(body_string_contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fcallback"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "rt"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let grant = exchange_code(
            &reqwest::Client::new(),
            &music(format!("{}/api/token", server.uri())),
            "the-code",
        )
        .await
        .unwrap();
        assert_eq!(grant.token.access_token, "at");
        assert_eq!(grant.refresh_token.as_deref(), Some("rt"));
    }

    #[tokio::test]
    async fn test_exchange_code_missing_redirect_uri() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = music(format!("{}/api/token", server.uri()));
        config.redirect_uri = None;
        let err = exchange_code(&reqwest::Client::new(), &config, "code")
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_exchange_code_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let err = exchange_code(
            &reqwest::Client::new(),
            &music(format!("{}/api/token", server.uri())),
            "stale-code",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FolioError::UpstreamAuth { status: 400, .. }));
    }
}
