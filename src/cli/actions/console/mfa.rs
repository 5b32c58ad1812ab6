use super::Console;
use crate::{
    cli::output,
    features::mfa::{
        EnrollmentStep, MfaEnrollment, RecoveryCodeSource,
        flow::{SETUP_FAILED, VERIFY_FAILED},
    },
};
use std::io::{self, Write};
use tokio::io::AsyncBufRead;

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    /// Walks the operator through enrollment: show the secret, take the code,
    /// show recovery codes. End of input abandons the enrollment.
    pub(super) async fn mfa(&mut self) -> io::Result<()> {
        let mut enrollment = match MfaEnrollment::begin(self.session.gateway()).await {
            Ok(enrollment) => enrollment,
            Err(err) => return self.report(&err, SETUP_FAILED),
        };

        loop {
            match enrollment.step() {
                EnrollmentStep::Setup => {
                    self.say("Add this account to your authenticator app.")?;
                    self.say(&format!("  Enrollment target: {}", enrollment.qr_target()))?;
                    self.say(&format!("  Secret key:        {}", enrollment.secret()))?;
                    let Some(answer) = self.ask("Type 'continue' once scanned, or 'cancel': ").await? else {
                        return Ok(());
                    };
                    match answer.trim() {
                        "continue" => {
                            if let Err(err) = enrollment.confirm_scanned() {
                                self.report(&err, SETUP_FAILED)?;
                            }
                        }
                        "cancel" => match enrollment.cancel() {
                            Ok(()) => return self.say(&output::info("MFA setup cancelled.")),
                            Err(unchanged) => enrollment = unchanged,
                        },
                        _ => self.say(&output::warning("Type 'continue' or 'cancel'."))?,
                    }
                }
                EnrollmentStep::Verify => {
                    let Some(answer) = self.ask("6-digit code (or 'back'): ").await? else {
                        return Ok(());
                    };
                    if answer.trim() == "back" {
                        if let Err(err) = enrollment.back() {
                            self.report(&err, VERIFY_FAILED)?;
                        }
                        continue;
                    }

                    enrollment.input_code(&answer);
                    if !enrollment.can_submit() {
                        self.say(&output::warning(
                            "Enter the 6-digit code from your authenticator app.",
                        ))?;
                        continue;
                    }
                    if let Err(err) = enrollment.submit(self.session.gateway()).await {
                        let message = enrollment
                            .error()
                            .map_or_else(|| err.user_message(VERIFY_FAILED), str::to_string);
                        self.say(&output::error(&message))?;
                    }
                }
                EnrollmentStep::Complete => {
                    self.say(&output::success("MFA enabled successfully!"))?;
                    self.say("Save these recovery codes somewhere safe:")?;
                    let codes = enrollment.recovery_codes_text();
                    self.say(&codes)?;
                    if enrollment.recovery_source() == Some(RecoveryCodeSource::ClientGenerated) {
                        self.say(&output::warning(
                            "These recovery codes were generated locally and are not registered with the server.",
                        ))?;
                    }
                    self.session.check_auth().await;
                    return Ok(());
                }
            }
        }
    }
}
