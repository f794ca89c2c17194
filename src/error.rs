//! Passport-level error types shared across flows, transports, and host adapters.

// self
use crate::{_prelude::*, host::HostError, oauth::Endpoint};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Required settings are missing or malformed; the operator must fix them.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The provider answered with an explicit `error` field.
	#[error(transparent)]
	Provider(#[from] ProviderError),
	/// Token or profile endpoint could not be reached or answered unusably.
	#[error(transparent)]
	Unavailable(#[from] UnavailableError),
	/// Host validation rejected a value (email sync only).
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// A host collaborator failed.
	#[error(transparent)]
	Host(#[from] HostError),

	/// Callback `state` did not match the value stored in the session.
	#[error("Invalid state parameter.")]
	InvalidState,
	/// The configured identifier field resolved to nothing.
	#[error("Unable to retrieve the user identifier (`{field}`) from the provider.")]
	MissingIdentity {
		/// Dot-path that was resolved against the profile.
		field: String,
	},
}
impl Error {
	/// HTTP status the host should answer with when this error aborts a request.
	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::Config(_) | Self::Host(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::Provider(_) | Self::MissingIdentity { .. } => StatusCode::BAD_REQUEST,
			Self::InvalidState => StatusCode::FORBIDDEN,
			Self::Unavailable(UnavailableError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
			Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
			Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
		}
	}

	/// Message that is safe to show to the end user.
	///
	/// Provider messages are passed through; everything else collapses into a generic
	/// sentence so CSRF failures never reveal which side was wrong.
	pub fn public_message(&self) -> String {
		match self {
			Self::Provider(e) => format!("OAuth error: {}", e.message),
			Self::Validation(e) => e.to_string(),
			Self::InvalidState | Self::MissingIdentity { .. } =>
				"Authentication failed. Please try again.".into(),
			Self::Unavailable(_) =>
				"The login provider is temporarily unavailable. Please try again.".into(),
			Self::Config(_) | Self::Host(_) => "Something went wrong.".into(),
		}
	}

	/// Returns true when restarting the flow later may succeed.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Unavailable(_))
	}
}

/// Configuration failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A required setting is empty or absent.
	#[error("Setting `{key}` is required.")]
	MissingSetting {
		/// Settings key that was empty.
		key: &'static str,
	},
	/// An endpoint or redirect setting is not a valid absolute URL.
	#[error("Setting `{key}` is not a valid URL.")]
	InvalidEndpoint {
		/// Settings key holding the URL.
		key: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Explicit error reported by the provider (authorize callback, token, or profile stage).
#[derive(Debug, ThisError)]
#[error("Provider returned an error: {message}.")]
pub struct ProviderError {
	/// Error string (object payloads are JSON-encoded).
	pub message: String,
	/// Numeric `error_code`/`code` field, `0` when absent.
	pub code: i64,
	/// Raw decoded body, when the error came from an HTTP response.
	pub payload: Option<Value>,
}
impl ProviderError {
	/// Builds an error from the `error` + description query parameters of a callback.
	pub fn from_callback(error: &str, description: &str) -> Self {
		Self { message: format!("{error} - {description}"), code: 0, payload: None }
	}
}

/// Transient upstream failures; surfaced immediately, never retried.
#[derive(Debug, ThisError)]
pub enum UnavailableError {
	/// The bounded request timeout elapsed.
	#[error("Request to the {endpoint} endpoint timed out.")]
	Timeout {
		/// Endpoint that was called.
		endpoint: Endpoint,
	},
	/// Endpoint answered with a non-success status and no OAuth error body.
	#[error("The {endpoint} endpoint answered with HTTP {status}.")]
	Status {
		/// Endpoint that was called.
		endpoint: Endpoint,
		/// HTTP status code.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// DNS, TCP, TLS, or I/O failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint that was called.
		endpoint: Endpoint,
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// Body was not valid JSON or lacked required fields.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	Malformed {
		/// Endpoint that was called.
		endpoint: Endpoint,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Profile body decoded, but not into a JSON object.
	#[error("The {endpoint} endpoint did not return a JSON object.")]
	NotAnObject {
		/// Endpoint that was called.
		endpoint: Endpoint,
	},
}
impl UnavailableError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: Endpoint, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Endpoint the failure is attributed to.
	pub fn endpoint(&self) -> Endpoint {
		match self {
			Self::Timeout { endpoint }
			| Self::Status { endpoint, .. }
			| Self::Network { endpoint, .. }
			| Self::Malformed { endpoint, .. }
			| Self::NotAnObject { endpoint } => *endpoint,
		}
	}
}

/// Host validation failure for a candidate field value.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("The {field} `{value}` is invalid: {reason}.")]
pub struct ValidationError {
	/// Field being validated (e.g. `email`).
	pub field: String,
	/// Rejected value.
	pub value: String,
	/// Host-supplied reason.
	pub reason: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn invalid_state_message_is_generic() {
		let err = Error::InvalidState;

		assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
		assert!(!err.public_message().contains("state"));
		assert!(!err.is_transient());
	}

	#[test]
	fn provider_message_is_surfaced() {
		let err: Error = ProviderError::from_callback("access_denied", "user declined").into();

		assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(err.public_message(), "OAuth error: access_denied - user declined");
	}

	#[test]
	fn timeouts_map_to_gateway_timeout() {
		let err: Error = UnavailableError::Timeout { endpoint: Endpoint::Token }.into();

		assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
		assert!(err.is_transient());
		assert!(err.to_string().contains("token"));
	}
}
