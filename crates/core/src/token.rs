//! Share token generation.
//!
//! Tokens are short and human-typeable. Uniqueness is checked against the
//! store a bounded number of times; running out of attempts fails the whole
//! submission rather than falling back to a longer identifier.

use rand::{Rng, distributions::Uniform};

use crate::{
    errors::{ScheduleError, ScheduleResult},
    store::ScheduleStore,
};

pub const TOKEN_LENGTH: usize = 12;
pub const MAX_TOKEN_ATTEMPTS: u32 = 3;

const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let index = Uniform::from(0..TOKEN_ALPHABET.len());
    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.sample(index)] as char)
        .collect()
}

/// Checks whether a string has the shape of a share token.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.bytes().all(|b| TOKEN_ALPHABET.contains(&b))
}

/// Generates tokens until the store reports one as unused, giving up after
/// [`MAX_TOKEN_ATTEMPTS`].
pub async fn issue_token<S: ScheduleStore + ?Sized>(store: &S) -> ScheduleResult<String> {
    issue_token_with(store, generate_token).await
}

pub async fn issue_token_with<S, G>(store: &S, mut generate: G) -> ScheduleResult<String>
where
    S: ScheduleStore + ?Sized,
    G: FnMut() -> String,
{
    for attempt in 1..=MAX_TOKEN_ATTEMPTS {
        let token = generate();
        if store.is_token_available(&token).await? {
            tracing::debug!("Issued share token on attempt {}", attempt);
            return Ok(token);
        }
        tracing::warn!("Share token collision on attempt {}/{}", attempt, MAX_TOKEN_ATTEMPTS);
    }

    Err(ScheduleError::TokenExhausted {
        attempts: MAX_TOKEN_ATTEMPTS,
    })
}
