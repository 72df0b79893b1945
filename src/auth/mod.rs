mod otp;
mod profile;
mod validation;

pub use otp::{PasswordReset, Registration, RegistrationStep, ResetStep};
pub use validation::{
    validate_email, validate_password_length, validate_strong_password, MIN_PASSWORD_LEN,
};

use log::{info, warn};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::http::ApiClient;
use crate::model::{AuthResponse, UserProfile};
use crate::ClientError;

/// Payload posted back by the OAuth popup window
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthMessage {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the `/auth` endpoints.
///
/// Signing in stores the token in the shared [`Session`](crate::Session), so
/// every client built on the same session becomes authenticated.
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn is_signed_in(&self) -> bool {
        self.api.session().is_signed_in()
    }

    /// Password login. Returns the server's greeting on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        validate_password_length(password)?;

        let response = self
            .post(&["auth", "login"], json!({ "email": email.trim(), "password": password }))
            .await?;
        let response = accepted(response, "Invalid credentials")?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::MalformedResponse("Login response has no token".to_string()))?;

        self.api.session().sign_in(token);
        info!("Signed in as {}", email.trim());
        Ok(response
            .message
            .unwrap_or_else(|| "Login successful!".to_string()))
    }

    pub fn logout(&self) {
        self.api.session().sign_out();
    }

    /// Page that starts the Google sign-in flow
    pub fn google_login_url(&self) -> Result<Url, ClientError> {
        self.api.endpoint(&["auth", "google-login"])
    }

    /// Accept the message posted by the OAuth window.
    ///
    /// Messages from any origin other than the API's are ignored. Returns
    /// whether the session is now signed in.
    pub fn complete_oauth(&self, origin: &str, message: &OAuthMessage) -> bool {
        let expected = self.api.origin();
        if origin.trim_end_matches('/') != expected {
            warn!("Ignoring OAuth message from {} (expected {})", origin, expected);
            return false;
        }

        match message.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                self.api.session().sign_in(token);
                info!(
                    "OAuth sign-in complete: {}",
                    message.message.as_deref().unwrap_or("ok")
                );
                true
            }
            None => false,
        }
    }

    /// Ask for a registration code to be mailed to `email`
    pub async fn send_registration_otp(&self, email: &str) -> Result<(), ClientError> {
        let response = self
            .post(&["auth", "send-email-otp-register"], json!({ "email": email }))
            .await?;
        accepted(response, "Failed to send OTP.").map(|_| ())
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        otp: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .post(
                &["auth", "register"],
                json!({ "name": name, "email": email, "password": password, "otp": otp }),
            )
            .await?;
        accepted(response, "OTP verification failed.").map(|_| ())
    }

    /// Ask for a password-reset code to be mailed to `identifier`
    pub async fn send_reset_otp(&self, identifier: &str) -> Result<(), ClientError> {
        let response = self
            .post(
                &["auth", "send-email-otp-forgotpassword"],
                json!({ "email": identifier }),
            )
            .await?;
        accepted(response, "Failed to send OTP").map(|_| ())
    }

    pub async fn verify_reset_otp(&self, identifier: &str, otp: &str) -> Result<(), ClientError> {
        let response = self
            .post(
                &["auth", "forgot-password", "verify-otp"],
                json!({ "identifier": identifier, "otp": otp }),
            )
            .await?;
        accepted(response, "Invalid OTP").map(|_| ())
    }

    pub async fn reset_password(
        &self,
        identifier: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .post(
                &["auth", "forgot-password", "reset"],
                json!({ "identifier": identifier, "newPassword": new_password }),
            )
            .await?;
        accepted(response, "Password reset failed").map(|_| ())
    }

    /// Profile of the signed-in user
    pub async fn whoami(&self) -> Result<UserProfile, ClientError> {
        let url = self.api.endpoint(&["auth", "whoami"])?;
        let request = self.api.authorized(Method::GET, url)?;
        let response: AuthResponse = self.api.send_json(request).await?;
        accepted(response, "Failed to load profile")?
            .user
            .ok_or_else(|| ClientError::MalformedResponse("Response has no user".to_string()))
    }

    async fn post(&self, path: &[&str], body: Value) -> Result<AuthResponse, ClientError> {
        let url = self.api.endpoint(path)?;
        let request = self.api.request(Method::POST, url).json(&body);
        self.api.send_json(request).await
    }
}

/// Turn `success: false` into a rejection carrying the server's message
fn accepted(response: AuthResponse, fallback: &str) -> Result<AuthResponse, ClientError> {
    if response.success {
        Ok(response)
    } else {
        Err(ClientError::Rejected(
            response.message.unwrap_or_else(|| fallback.to_string()),
        ))
    }
}
