//! MFA enrollment: the setup and verify endpoints, the six-digit code buffer,
//! recovery code batches and the `Setup -> Verify -> Complete` flow.

pub mod client;
pub mod code;
pub mod flow;
pub mod recovery;
pub mod types;

pub use flow::{EnrollmentStep, MfaEnrollment, RecoveryCodeSource};
