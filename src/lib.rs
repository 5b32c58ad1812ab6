//! # UserHub console
//!
//! Administrative console for a user, role and permission backend. The
//! library holds the console core and the `userhub` binary drives it from an
//! interactive prompt.
//!
//! ## Session
//!
//! The backend owns the session: login sets `HttpOnly` cookies, refresh
//! rotates them and logout clears them. The [`client::Gateway`] keeps them in
//! an in-memory cookie jar, so a session lasts as long as the process. A 401
//! triggers exactly one refresh and one replay; a failed refresh clears the
//! local identity and sends the operator back to login.
//!
//! ## Assignments
//!
//! Role permissions are edited as a local checklist and saved as one full
//! replacement. User roles are assigned and removed one request at a time,
//! each followed by a re-fetch of the user list.
//!
//! ## MFA
//!
//! Enrollment is a `Setup -> Verify -> Complete` flow. Recovery codes are
//! taken from the verify response when present; otherwise a local batch is
//! generated and labelled as not redeemable.

pub mod cli;
pub mod client;
pub mod features;

#[cfg(test)]
pub(crate) mod test_support;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
