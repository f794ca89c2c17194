//! Transport primitives for the provider's token and user-info endpoints.
//!
//! [`ProviderHttpClient`] is the crate's only dependency on an HTTP stack. Each outbound
//! call asks it for a short-lived [`AsyncHttpClient`] handle bound to a fresh
//! [`ResponseMetadataSlot`], so failures can later be classified with the status code and
//! `Retry-After` hint of the response that caused them.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::{
	header::{HeaderMap, RETRY_AFTER},
	redirect::Policy,
};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Upper bound applied to every provider call unless overridden.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Abstraction over HTTP transports able to reach the provider.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// request handler, and the handles they return must own whatever state their request
/// futures need so those futures stay `Send`.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle that records response metadata in `slot`.
	///
	/// Handles must call [`ResponseMetadataSlot::take`] before dispatching and
	/// [`ResponseMetadataSlot::store`] once a status line is known.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Metadata from the most recent HTTP response, used for error classification.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code, if a response arrived.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Thread-safe slot sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Reqwest transport configured for provider calls: bounded timeout, no redirects.
///
/// Token and user-info endpoints answer directly; following a redirect would forward the
/// client secret or bearer token to a location nobody configured.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with [`DEFAULT_TIMEOUT`].
	pub fn new() -> Result<Self, ConfigError> {
		Self::with_timeout(DEFAULT_TIMEOUT)
	}

	/// Builds a client whose requests abort after `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`]; callers own its timeout/redirect policy.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn call_handle(&self, slot: ResponseMetadataSlot) -> ProviderCallHandle {
		ProviderCallHandle(Arc::new(ProviderCall { client: self.0.clone(), slot }))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type Handle = ProviderCallHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		self.call_handle(slot)
	}
}

#[cfg(feature = "reqwest")]
struct ProviderCall {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}

/// One provider call over [`ReqwestHttpClient`]; fills its slot once the status line arrives.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ProviderCallHandle(Arc<ProviderCall>);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ProviderCallHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let call = Arc::clone(&self.0);

		Box::pin(async move {
			call.slot.take();

			let request = request.try_into().map_err(Box::new)?;
			let reply = call.client.execute(request).await.map_err(Box::new)?;
			let status = reply.status();
			let headers = reply.headers().to_owned();

			call.slot.store(ResponseMetadata::from_headers(status, &headers));

			let body = reply.bytes().await.map_err(Box::new)?;
			let mut response = HttpResponse::new(body.to_vec());

			*response.status_mut() = status;
			*response.headers_mut() = headers;

			Ok(response)
		})
	}
}

#[cfg(feature = "reqwest")]
impl ResponseMetadata {
	/// Captures the status and `Retry-After` hint of a provider reply.
	pub fn from_headers(status: StatusCode, headers: &HeaderMap) -> Self {
		Self { status: Some(status.as_u16()), retry_after: retry_after_hint(headers) }
	}
}

/// Reads `Retry-After` as delta seconds or an HTTP date still in the future.
#[cfg(feature = "reqwest")]
fn retry_after_hint(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	match raw.parse::<u32>() {
		Ok(secs) => Some(Duration::seconds(secs.into())),
		Err(_) => OffsetDateTime::parse(raw, &Rfc2822)
			.ok()
			.map(|moment| moment - OffsetDateTime::now_utc())
			.filter(|delta| delta.is_positive()),
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	use reqwest::header::HeaderValue as ReqwestHeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, ReqwestHeaderValue::from_static("120"));

		let meta = ResponseMetadata::from_headers(StatusCode::TOO_MANY_REQUESTS, &headers);

		assert_eq!(meta.status, Some(429));
		assert_eq!(meta.retry_after, Some(Duration::seconds(120)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, ReqwestHeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

		assert_eq!(retry_after_hint(&headers), None);

		headers.insert(RETRY_AFTER, ReqwestHeaderValue::from_static("soon"));

		assert_eq!(retry_after_hint(&headers), None);
	}

	#[test]
	fn metadata_slot_is_consumed_once() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(503), retry_after: None });

		assert_eq!(slot.take().and_then(|meta| meta.status), Some(503));
		assert!(slot.take().is_none());
	}

	#[test]
	fn default_client_builds() {
		assert!(ReqwestHttpClient::new().is_ok());
	}

	#[tokio::test]
	async fn test_client_trusts_self_signed_providers_without_following_redirects() {
		let server = MockServer::start_async().await;
		let moved = server
			.mock_async(|when, then| {
				when.method(GET).path("/oauth/token");
				then.status(302).header("location", "https://elsewhere.example.com/token");
			})
			.await;
		let client = crate::_preludet::test_reqwest_http_client(DEFAULT_TIMEOUT);

		assert!(server.url("/oauth/token").starts_with("https://"));

		let reply = client
			.get(server.url("/oauth/token"))
			.send()
			.await
			.expect("Self-signed mock provider should be reachable.");

		assert_eq!(reply.status(), StatusCode::FOUND);
		moved.assert_async().await;
	}
}
