//! MFA enrollment endpoints. Secrets and codes pass through here but are
//! never logged.

use crate::{
    client::{ApiRequest, AppError, Gateway, api::decode_data},
    features::mfa::types::{MfaSetup, VerifyRequest},
};
use serde_json::Value;

const SETUP_PATH: &str = "/auth/mfa/setup";
const VERIFY_PATH: &str = "/auth/mfa/verify";

/// Requests a fresh secret and enrollment target.
///
/// # Errors
/// Returns the gateway error, or `AppError::Parse` if either value is empty.
pub async fn setup(gateway: &Gateway) -> Result<MfaSetup, AppError> {
    let body = gateway.execute(ApiRequest::post(SETUP_PATH)).await?;
    let setup: MfaSetup = decode_data(&body)?;

    if setup.secret.trim().is_empty() || setup.qr_url.trim().is_empty() {
        return Err(AppError::Parse(
            "MFA setup response is missing the secret or enrollment target".to_string(),
        ));
    }
    Ok(setup)
}

/// Confirms the code against the issued secret. Returns recovery codes when
/// the server includes them in the response.
///
/// # Errors
/// Returns the gateway error when the server rejects the code.
pub async fn verify(
    gateway: &Gateway,
    code: &str,
    secret: &str,
) -> Result<Option<Vec<String>>, AppError> {
    let request = ApiRequest::post(VERIFY_PATH).with_json(&VerifyRequest { code, secret })?;
    let body = gateway.execute(request).await?;
    Ok(server_recovery_codes(&body))
}

/// Reads `data.recoveryCodes` from a verify response. The usual response is
/// `{data: true}`, which yields `None`.
fn server_recovery_codes(body: &str) -> Option<Vec<String>> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("data")?
        .get("recoveryCodes")?
        .as_array()?
        .iter()
        .map(|code| code.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .filter(|codes| !codes.is_empty())
}
