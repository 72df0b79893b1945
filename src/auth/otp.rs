use log::debug;

use super::validation::{validate_email, validate_password_length, validate_strong_password};
use super::AuthClient;
use crate::ClientError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationStep {
    /// Collecting name, email and password
    #[default]
    Details,
    /// Code mailed; waiting for the user to type it
    VerifyOtp,
    Registered,
}

/// Two-step sign-up: send a code, then register with it
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    step: RegistrationStep,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            step: RegistrationStep::Details,
        }
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    /// Check the details locally; nothing is sent if they are invalid
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ClientError::ValidationError(
                "Please fill in all fields before sending OTP.".to_string(),
            ));
        }
        validate_email(&self.email)?;
        validate_strong_password(&self.password)
    }

    pub async fn send_otp(&mut self, auth: &AuthClient) -> Result<(), ClientError> {
        self.validate()?;
        auth.send_registration_otp(self.email.trim()).await?;
        debug!("Registration OTP sent to {}", self.email.trim());
        self.step = RegistrationStep::VerifyOtp;
        Ok(())
    }

    pub async fn verify(&mut self, auth: &AuthClient, otp: &str) -> Result<(), ClientError> {
        if self.step != RegistrationStep::VerifyOtp {
            return Err(ClientError::ValidationError(
                "Request an OTP before verifying.".to_string(),
            ));
        }
        let otp = otp.trim();
        if otp.is_empty() {
            return Err(ClientError::ValidationError(
                "Please enter the OTP.".to_string(),
            ));
        }

        auth.register(self.name.trim(), self.email.trim(), &self.password, otp)
            .await?;
        self.step = RegistrationStep::Registered;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetStep {
    #[default]
    RequestOtp,
    VerifyOtp,
    NewPassword,
}

/// Three-step password recovery: request code, verify it, set a new password.
///
/// After a successful reset the wizard starts over with cleared fields.
#[derive(Debug, Clone, Default)]
pub struct PasswordReset {
    identifier: String,
    step: ResetStep,
}

impl PasswordReset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub async fn send_otp(&mut self, auth: &AuthClient, identifier: &str) -> Result<(), ClientError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ClientError::ValidationError(
                "Enter your email or mobile number.".to_string(),
            ));
        }

        auth.send_reset_otp(identifier).await?;
        self.identifier = identifier.to_string();
        self.step = ResetStep::VerifyOtp;
        Ok(())
    }

    pub async fn verify_otp(&mut self, auth: &AuthClient, otp: &str) -> Result<(), ClientError> {
        self.require_step(ResetStep::VerifyOtp)?;
        let otp = otp.trim();
        if otp.is_empty() {
            return Err(ClientError::ValidationError(
                "Please enter the OTP.".to_string(),
            ));
        }

        auth.verify_reset_otp(&self.identifier, otp).await?;
        self.step = ResetStep::NewPassword;
        Ok(())
    }

    pub async fn reset(&mut self, auth: &AuthClient, new_password: &str) -> Result<(), ClientError> {
        self.require_step(ResetStep::NewPassword)?;
        validate_password_length(new_password)?;

        auth.reset_password(&self.identifier, new_password).await?;
        *self = Self::default();
        Ok(())
    }

    fn require_step(&self, step: ResetStep) -> Result<(), ClientError> {
        if self.step == step {
            Ok(())
        } else {
            Err(ClientError::ValidationError(format!(
                "Password reset is at {:?}, not {:?}",
                self.step, step
            )))
        }
    }
}
