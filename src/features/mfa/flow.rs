//! MFA enrollment state machine.
//!
//! ```text
//! begin ──> Setup ──confirm_scanned──> Verify ──submit ok──> Complete
//!             ^  │                        │
//!             │  └──cancel (exits)        │
//!             └──────────back─────────────┘
//! ```
//!
//! A failed `begin` yields no enrollment at all. A failed `submit` stays in
//! `Verify` with the typed code intact. `Complete` is terminal; enrolling
//! again starts over with `begin` and a fresh secret.

use crate::{
    client::{AppError, Gateway},
    features::mfa::{
        client,
        code::VerificationCode,
        recovery,
        types::MfaSetup,
    },
};
use tracing::{info, warn};

pub const SETUP_FAILED: &str = "Failed to setup MFA. Please try again.";
pub const VERIFY_FAILED: &str = "Invalid verification code. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnrollmentStep {
    Setup,
    Verify,
    Complete,
}

/// Where the displayed recovery codes came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryCodeSource {
    /// Issued by the server in the verify response.
    Server,
    /// Synthesized locally; the server cannot redeem them.
    ClientGenerated,
}

#[derive(Debug)]
pub struct MfaEnrollment {
    secret: String,
    qr_target: String,
    step: EnrollmentStep,
    code: VerificationCode,
    submitting: bool,
    error: Option<String>,
    recovery_codes: Vec<String>,
    recovery_source: Option<RecoveryCodeSource>,
}

impl MfaEnrollment {
    /// Starts an enrollment with a freshly issued secret.
    ///
    /// # Errors
    /// Returns the setup error; there is no automatic retry.
    pub async fn begin(gateway: &Gateway) -> Result<Self, AppError> {
        let setup = client::setup(gateway).await?;
        info!("mfa enrollment started");
        Ok(Self::from_setup(setup))
    }

    pub(crate) fn from_setup(setup: MfaSetup) -> Self {
        Self {
            secret: setup.secret,
            qr_target: setup.qr_url,
            step: EnrollmentStep::Setup,
            code: VerificationCode::default(),
            submitting: false,
            error: None,
            recovery_codes: Vec::new(),
            recovery_source: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> EnrollmentStep {
        self.step
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    #[must_use]
    pub fn qr_target(&self) -> &str {
        &self.qr_target
    }

    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn recovery_codes(&self) -> &[String] {
        &self.recovery_codes
    }

    /// Recovery codes joined by newlines, ready for copying.
    #[must_use]
    pub fn recovery_codes_text(&self) -> String {
        self.recovery_codes.join("\n")
    }

    #[must_use]
    pub fn recovery_source(&self) -> Option<RecoveryCodeSource> {
        self.recovery_source
    }

    /// The operator has scanned the target. No network call.
    ///
    /// # Errors
    /// Returns `AppError::Validation` outside `Setup`.
    pub fn confirm_scanned(&mut self) -> Result<(), AppError> {
        self.transition(EnrollmentStep::Setup, EnrollmentStep::Verify)
    }

    /// Returns to the secret display, keeping secret, target and code.
    ///
    /// # Errors
    /// Returns `AppError::Validation` outside `Verify`.
    pub fn back(&mut self) -> Result<(), AppError> {
        self.transition(EnrollmentStep::Verify, EnrollmentStep::Setup)
    }

    /// Abandons the enrollment. Only possible from `Setup`; otherwise the
    /// enrollment is handed back unchanged.
    ///
    /// # Errors
    /// Returns `self` when not in `Setup`.
    pub fn cancel(self) -> Result<(), Self> {
        if self.step == EnrollmentStep::Setup {
            info!("mfa enrollment cancelled");
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Replaces the code buffer with the digits of `raw`, capped at six.
    pub fn input_code(&mut self, raw: &str) {
        self.code = VerificationCode::normalize(raw);
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.step == EnrollmentStep::Verify && !self.submitting && self.code.is_complete()
    }

    /// Posts the code and secret for confirmation.
    ///
    /// # Errors
    /// Returns `AppError::Validation` without a request when the code is not
    /// submittable, otherwise the server rejection. On rejection the step
    /// stays `Verify`, `error()` holds the message and the code is kept.
    pub async fn submit(&mut self, gateway: &Gateway) -> Result<(), AppError> {
        if !self.can_submit() {
            return Err(AppError::Validation(
                "Enter the 6-digit code from your authenticator app.".to_string(),
            ));
        }

        self.submitting = true;
        let result = client::verify(gateway, self.code.as_str(), &self.secret).await;
        self.submitting = false;

        match result {
            Ok(server_codes) => {
                self.complete(server_codes);
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.user_message(VERIFY_FAILED));
                Err(err)
            }
        }
    }

    fn complete(&mut self, server_codes: Option<Vec<String>>) {
        let (codes, source) = match server_codes {
            Some(codes) if recovery::is_complete_batch(&codes) => {
                (codes, RecoveryCodeSource::Server)
            }
            Some(codes) => {
                warn!(
                    count = codes.len(),
                    "verify response carried malformed recovery codes; generated a local batch the server cannot redeem"
                );
                (recovery::generate_batch(), RecoveryCodeSource::ClientGenerated)
            }
            None => {
                warn!("verify response carried no recovery codes; generated a local batch the server cannot redeem");
                (recovery::generate_batch(), RecoveryCodeSource::ClientGenerated)
            }
        };

        self.recovery_codes = codes;
        self.recovery_source = Some(source);
        self.error = None;
        self.step = EnrollmentStep::Complete;
        info!(source = ?source, "mfa enrollment completed");
    }

    fn transition(&mut self, from: EnrollmentStep, to: EnrollmentStep) -> Result<(), AppError> {
        if self.step == from {
            self.step = to;
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Cannot move from {:?} to {to:?}.",
                self.step
            )))
        }
    }
}
