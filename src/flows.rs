//! Callback orchestration: CSRF state, code exchange, profile mapping, and the hand-off to
//! the host login sink.

pub mod callback;
pub mod registration;

pub use callback::*;
pub use registration::*;

// self
use crate::{_prelude::*, inapp::page::escape_html};

/// Renders `error` as a minimal HTML failure page.
///
/// The status comes from [`Error::status_code`] and the text from [`Error::public_message`],
/// so internal details never reach the browser.
pub fn error_response(error: &Error) -> Response {
	let status = error.status_code();
	let body = format!(
		"<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
		 <body><h1>{title}</h1><p>{message}</p></body></html>",
		title = status.canonical_reason().unwrap_or("Error"),
		message = escape_html(&error.public_message()),
	);
	let mut response = Response::new(body);

	*response.status_mut() = status;
	response
		.headers_mut()
		.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));

	response
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ProviderError;

	#[test]
	fn provider_messages_are_escaped() {
		let err: Error = ProviderError::from_callback("<script>", "x").into();
		let response = error_response(&err);

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert!(response.body().contains("OAuth error: &lt;script&gt; - x"));
		assert!(!response.body().contains("<script>"));
	}

	#[test]
	fn state_failures_stay_generic() {
		let response = error_response(&Error::InvalidState);

		assert_eq!(response.status(), StatusCode::FORBIDDEN);
		assert!(response.body().contains("Authentication failed"));
	}
}
