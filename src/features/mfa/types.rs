use serde::{Deserialize, Serialize};

/// Enrollment material issued by `POST /auth/mfa/setup`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MfaSetup {
    /// Shared TOTP secret, shown for manual entry.
    pub secret: String,
    /// Scannable enrollment target, usually an `otpauth://` URI.
    pub qr_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    pub code: &'a str,
    pub secret: &'a str,
}
