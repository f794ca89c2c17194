//! Redacting wrappers for client secrets and bearer tokens.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when the wrapped value is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer credential returned by the token endpoint.
///
/// Lives only for the duration of the profile fetch and is never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Opaque token value.
	pub secret: TokenSecret,
	/// `token_type` reported by the provider, when present.
	pub token_type: Option<String>,
}
impl AccessToken {
	/// Wraps a raw access token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self { secret: TokenSecret::new(value), token_type: None }
	}

	/// Value for the `Authorization` header of resource requests.
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn access_token_debug_hides_value() {
		let token = AccessToken::new("tok-123");

		assert!(!format!("{token:?}").contains("tok-123"));
		assert_eq!(token.authorization_header(), "Bearer tok-123");
	}
}
