//! CSRF state tokens that round-trip through the authorization redirect.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
// self
use crate::{_prelude::*, store::SessionStore};

/// Session key holding the in-flight state token.
pub const SESSION_STATE_KEY: &str = "oauth2state";

const STATE_BYTES: usize = 32;

/// Opaque, unpredictable state value owned by one browser session.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthState(String);
impl OAuthState {
	/// Generates a fresh token from the thread-local CSPRNG.
	pub fn generate() -> Self {
		let mut bytes = [0_u8; STATE_BYTES];

		rand::rng().fill(&mut bytes);

		Self(URL_SAFE_NO_PAD.encode(bytes))
	}

	/// Returns the encoded token.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Stores the token in the caller's session, replacing any earlier value.
	pub fn stash(&self, session: &dyn SessionStore) {
		session.put(SESSION_STATE_KEY, self.0.clone());
	}

	/// Consumes the session's stored token and compares it against `returned`.
	///
	/// The stored value is removed whatever the outcome, so a replayed callback finds
	/// nothing to match.
	pub fn consume(session: &dyn SessionStore, returned: Option<&str>) -> Result<()> {
		let stored = session.get(SESSION_STATE_KEY);

		session.remove(SESSION_STATE_KEY);

		match (stored, returned) {
			(Some(stored), Some(returned))
				if !returned.is_empty() && constant_time_eq(stored.as_bytes(), returned.as_bytes()) =>
				Ok(()),
			_ => Err(Error::InvalidState),
		}
	}
}
impl Debug for OAuthState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("OAuthState").field(&"<redacted>").finish()
	}
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
	if a.len() != b.len() {
		return false;
	}

	a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
