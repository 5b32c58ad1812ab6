/// Number of digits in a TOTP verification code.
pub const CODE_LENGTH: usize = 6;

/// Verification code buffer. Holds at most six ASCII digits; anything else
/// typed is dropped on input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Keeps the digits of `raw`, then truncates to six.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        Self(
            raw.chars()
                .filter(char::is_ascii_digit)
                .take(CODE_LENGTH)
                .collect(),
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.len() == CODE_LENGTH
    }
}
