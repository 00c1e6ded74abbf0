use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

pub const RECAPTCHA_ENDPOINT: &str = "https://www.google.com/recaptcha/api/siteverify";
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("verification request failed: {0}")]
    Http(String),
    #[error("malformed verification response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Checks the anti-abuse token attached to every write request.
pub trait Verifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<bool, VerifyError>;
}

/// Google reCAPTCHA `siteverify` client.
pub struct RecaptchaVerifier {
    agent: Agent,
    secret: String,
    endpoint: String,
}

impl RecaptchaVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_endpoint(secret, RECAPTCHA_ENDPOINT)
    }

    pub fn with_endpoint(secret: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(VERIFY_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            secret: secret.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl Verifier for RecaptchaVerifier {
    fn verify(&self, token: &str) -> Result<bool, VerifyError> {
        let body = self
            .agent
            .post(self.endpoint.as_str())
            .send_form([("secret", self.secret.as_str()), ("response", token)])
            .map_err(|e| VerifyError::Http(e.to_string()))?
            .into_body()
            .read_to_string()
            .map_err(|e| VerifyError::Http(e.to_string()))?;
        let response = parse_response(&body)?;
        if !response.success {
            debug!(codes = ?response.error_codes, "verification token rejected");
        }
        Ok(response.success)
    }
}

fn parse_response(body: &str) -> Result<SiteVerifyResponse, VerifyError> {
    Ok(serde_json::from_str(body)?)
}

/// Verifier with a fixed answer, for local runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticVerifier(pub bool);

impl Verifier for StaticVerifier {
    fn verify(&self, _token: &str) -> Result<bool, VerifyError> {
        Ok(self.0)
    }
}
