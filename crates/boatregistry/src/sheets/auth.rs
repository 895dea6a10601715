//! Service-account authentication for the Sheets API.
//!
//! Implements the OAuth 2.0 JWT bearer grant: an RS256-signed assertion is
//! exchanged at the token endpoint for a short-lived access token, which is
//! reused until shortly before it expires.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::sign::Signer;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};

/// Read-only access to spreadsheets.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: i64,
}

impl AccessToken {
    fn is_usable_at(&self, now: i64) -> bool {
        now + EXPIRY_MARGIN_SECS < self.expires_at
    }
}

/// Credentials of a Google service account.
pub struct ServiceAccountAuth {
    email: String,
    key: PKey<Private>,
    scope: String,
    token_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("email", &self.email)
            .field("scope", &self.scope)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountAuth {
    /// Build credentials from a service account e-mail and PEM private key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Crypto`] if the key is not a valid PEM private key.
    pub fn new(
        email: impl Into<String>,
        private_key_pem: &str,
        token_url: impl Into<String>,
    ) -> Result<Self> {
        let key = PKey::private_key_from_pem(private_key_pem.as_bytes())?;
        Ok(Self {
            email: email.into(),
            key,
            scope: SHEETS_READONLY_SCOPE.to_string(),
            token_url: token_url.into(),
            token: Mutex::new(None),
        })
    }

    /// The service account e-mail.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Build a signed assertion issued at `issued_at` (seconds since the epoch).
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded or signing fails.
    pub fn signed_assertion(&self, issued_at: i64) -> Result<String> {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let claims = Claims {
            iss: &self.email,
            scope: &self.scope,
            aud: &self.token_url,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{header}.{claims}");

        let mut signer = Signer::new(MessageDigest::sha256(), &self.key)?;
        signer.update(signing_input.as_bytes())?;
        let signature = URL_SAFE_NO_PAD.encode(signer.sign_to_vec()?);

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Return a valid access token, exchanging a new assertion when needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the token endpoint rejects the assertion,
    /// or a transport error if it cannot be reached.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String> {
        let mut slot = self.token.lock().await;
        let now = chrono::Utc::now().timestamp();

        if let Some(token) = slot.as_ref().filter(|t| t.is_usable_at(now)) {
            return Ok(token.value.clone());
        }

        debug!(email = %self.email, "Requesting service account access token");
        let assertion = self.signed_assertion(now)?;
        let response = http
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&body).map_or_else(
                |_| format!("HTTP {status}"),
                |err| match err.error_description {
                    Some(description) => format!("{}: {description}", err.error),
                    None => err.error,
                },
            );
            return Err(Error::auth(message));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::auth(format!("malformed token response: {e}")))?;
        let access = AccessToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        };
        let value = access.value.clone();
        *slot = Some(access);
        Ok(value)
    }

    /// Forget the cached access token.
    pub async fn clear_token(&self) {
        *self.token.lock().await = None;
    }
}

#[cfg(test)]
pub(crate) fn test_private_key_pem() -> String {
    let rsa = openssl::rsa::Rsa::generate(2048).expect("generate RSA key");
    let key = PKey::from_rsa(rsa).expect("wrap RSA key");
    String::from_utf8(key.private_key_to_pem_pkcs8().expect("encode key")).expect("PEM is UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::sign::Verifier;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EMAIL: &str = "registry@boats.iam.gserviceaccount.com";

    fn decode_segment(segment: &str) -> serde_json::Value {
        let bytes = URL_SAFE_NO_PAD.decode(segment).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_rejects_invalid_key() {
        let err = ServiceAccountAuth::new(EMAIL, "not a key", "https://t").unwrap_err();
        assert!(matches!(err, Error::Crypto(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let auth = ServiceAccountAuth::new(EMAIL, &test_private_key_pem(), "https://t").unwrap();
        let debug_str = format!("{auth:?}");
        assert!(debug_str.contains(EMAIL));
        assert!(!debug_str.contains("PRIVATE KEY"));
    }

    #[test]
    fn test_signed_assertion_structure_and_signature() {
        let pem = test_private_key_pem();
        let auth = ServiceAccountAuth::new(EMAIL, &pem, "https://oauth.test/token").unwrap();
        let jwt = auth.signed_assertion(1_700_000_000).unwrap();

        let parts: Vec<&str> = jwt.split('.').collect();
        assert_eq!(parts.len(), 3);

        let header = decode_segment(parts[0]);
        assert_eq!(header["alg"], "RS256");
        assert_eq!(header["typ"], "JWT");

        let claims = decode_segment(parts[1]);
        assert_eq!(claims["iss"], EMAIL);
        assert_eq!(claims["scope"], SHEETS_READONLY_SCOPE);
        assert_eq!(claims["aud"], "https://oauth.test/token");
        assert_eq!(claims["iat"], 1_700_000_000);
        assert_eq!(claims["exp"], 1_700_003_600);

        let key = PKey::private_key_from_pem(pem.as_bytes()).unwrap();
        let signature = URL_SAFE_NO_PAD.decode(parts[2]).unwrap();
        let mut verifier = Verifier::new(MessageDigest::sha256(), &key).unwrap();
        verifier
            .update(format!("{}.{}", parts[0], parts[1]).as_bytes())
            .unwrap();
        assert!(verifier.verify(&signature).unwrap());
    }

    #[test]
    fn test_access_token_margin() {
        let token = AccessToken {
            value: "t".to_string(),
            expires_at: 1000,
        };
        assert!(token.is_usable_at(900));
        assert!(!token.is_usable_at(940));
        assert!(!token.is_usable_at(1000));
    }

    #[tokio::test]
    async fn test_access_token_exchanged_once_and_reused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains(
                "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = ServiceAccountAuth::new(
            EMAIL,
            &test_private_key_pem(),
            format!("{}/token", server.uri()),
        )
        .unwrap();
        let http = reqwest::Client::new();

        assert_eq!(auth.access_token(&http).await.unwrap(), "ya29.test-token");
        assert_eq!(auth.access_token(&http).await.unwrap(), "ya29.test-token");
    }

    #[tokio::test]
    async fn test_clear_token_forces_new_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.again",
                "expires_in": 3599
            })))
            .expect(2)
            .mount(&server)
            .await;

        let auth = ServiceAccountAuth::new(
            EMAIL,
            &test_private_key_pem(),
            format!("{}/token", server.uri()),
        )
        .unwrap();
        let http = reqwest::Client::new();

        auth.access_token(&http).await.unwrap();
        auth.clear_token().await;
        auth.access_token(&http).await.unwrap();
    }

    #[tokio::test]
    async fn test_access_token_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid JWT Signature."
            })))
            .mount(&server)
            .await;

        let auth = ServiceAccountAuth::new(
            EMAIL,
            &test_private_key_pem(),
            format!("{}/token", server.uri()),
        )
        .unwrap();

        let err = auth
            .access_token(&reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth { .. }));
        assert_eq!(
            err.to_string(),
            "service account authentication failed: invalid_grant: Invalid JWT Signature."
        );
    }
}
