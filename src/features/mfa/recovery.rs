//! Client-side recovery code batches.
//!
//! These codes are only produced when the verify response carries none. The
//! server never sees them, so they cannot be redeemed; callers must label
//! them as such.

use rand::{RngCore, rngs::OsRng};

pub const RECOVERY_CODE_COUNT: usize = 8;
const RECOVERY_CODE_LEN: usize = 8;
const RECOVERY_CODE_GROUP_SIZE: usize = 4;
const RECOVERY_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Largest multiple of the alphabet size that fits in a byte; bytes at or
/// above it are rejected to keep the draw uniform.
const SAMPLE_LIMIT: u8 = 252;

/// Generates a batch of unique codes shaped `XXXX-XXXX` from the OS CSPRNG.
#[must_use]
pub fn generate_batch() -> Vec<String> {
    let mut rng = OsRng;
    generate_batch_with_rng(&mut rng)
}

fn generate_batch_with_rng<R: RngCore + ?Sized>(rng: &mut R) -> Vec<String> {
    let mut codes = Vec::with_capacity(RECOVERY_CODE_COUNT);
    while codes.len() < RECOVERY_CODE_COUNT {
        let code = generate_code(rng);
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

fn generate_code<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut out = String::with_capacity(RECOVERY_CODE_LEN + 1);
    let mut drawn = 0;
    let mut buf = [0u8; 16];

    while drawn < RECOVERY_CODE_LEN {
        rng.fill_bytes(&mut buf);
        for byte in buf {
            if drawn == RECOVERY_CODE_LEN {
                break;
            }
            if byte >= SAMPLE_LIMIT {
                continue;
            }
            if let Some(&ch) = RECOVERY_CODE_ALPHABET.get(usize::from(byte) % RECOVERY_CODE_ALPHABET.len()) {
                if drawn == RECOVERY_CODE_GROUP_SIZE {
                    out.push('-');
                }
                out.push(char::from(ch));
                drawn += 1;
            }
        }
    }
    out
}

/// Whether `code` has the `XXXX-XXXX` uppercase alphanumeric shape.
#[must_use]
pub fn is_well_formed(code: &str) -> bool {
    let Some((left, right)) = code.split_once('-') else {
        return false;
    };
    [left, right].iter().all(|group| {
        group.len() == RECOVERY_CODE_GROUP_SIZE
            && group
                .bytes()
                .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit())
    })
}

/// A full batch: exactly `RECOVERY_CODE_COUNT` well-formed codes.
#[must_use]
pub fn is_complete_batch(codes: &[String]) -> bool {
    codes.len() == RECOVERY_CODE_COUNT && codes.iter().all(|code| is_well_formed(code))
}
