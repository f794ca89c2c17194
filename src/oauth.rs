//! Provider-facing OAuth 2.0 calls: authorize URL, code exchange, profile fetch, and error
//! detection.
//!
//! Every call is parameterized by a [`ProviderConfig`]; nothing about a particular
//! provider is hardcoded. Calls are sequential and never retried.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, OAuthState, ScopeList},
	config::ProviderConfig,
	error::{ConfigError, ProviderError, UnavailableError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
};
#[cfg(feature = "reqwest")]
use crate::http::ReqwestHttpClient;

/// Exchange client specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestTokenExchangeClient = TokenExchangeClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Provider endpoints reached over the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// Code-for-token exchange.
	Token,
	/// Resource-owner profile.
	UserInfo,
}
impl Endpoint {
	/// Returns a stable label suitable for messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Token => "token",
			Endpoint::UserInfo => "user_info",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an error.
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => UnavailableError::network(endpoint, inner).into(),
			HttpClientError::Other(message) => map_generic_transport_error(endpoint, meta, message),
			_ => map_generic_transport_error(endpoint, meta, "unknown transport failure"),
		}
	}
}

/// Access-token response fields the passport relies on.
#[derive(Clone, Debug, Deserialize)]
struct TokenEndpointResponse {
	access_token: String,
	#[serde(default)]
	token_type: Option<String>,
}

/// Wraps the provider HTTP calls behind a pluggable transport.
pub struct TokenExchangeClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Transport used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors.
	pub transport_mapper: Arc<M>,
}
impl<C, M> TokenExchangeClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client over the caller-provided transport + mapper pair.
	pub fn with_http_client(http_client: impl Into<Arc<C>>, mapper: impl Into<Arc<M>>) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into() }
	}

	/// Builds the URL the visitor is redirected to; see [`build_authorization_url`].
	pub fn authorization_url(
		&self,
		config: &ProviderConfig,
		state: &OAuthState,
		scopes: &ScopeList,
	) -> Url {
		build_authorization_url(config, state, scopes)
	}

	/// Exchanges an authorization code for an access token.
	pub async fn exchange_code(&self, config: &ProviderConfig, code: &str) -> Result<AccessToken> {
		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", "authorization_code")
			.append_pair("code", code)
			.append_pair("redirect_uri", config.redirect_uri.as_str())
			.append_pair("client_id", &config.client_id)
			.append_pair("client_secret", config.client_secret.expose())
			.finish();
		let request = http_types::Request::post(config.token_endpoint.as_str())
			.header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(header::ACCEPT, JSON_CONTENT_TYPE)
			.body(body.into_bytes())
			.map_err(ConfigError::from)?;
		let decoded = self.send(Endpoint::Token, request).await?.decode_json()?;
		let token: TokenEndpointResponse = serde_path_to_error::deserialize(decoded)
			.map_err(|source| UnavailableError::Malformed { endpoint: Endpoint::Token, source })?;

		Ok(AccessToken { token_type: token.token_type, ..AccessToken::new(token.access_token) })
	}

	/// Fetches the raw resource-owner profile with the bearer token.
	pub async fn fetch_resource_owner(
		&self,
		config: &ProviderConfig,
		token: &AccessToken,
	) -> Result<JsonMap<String, Value>> {
		let request = http_types::Request::get(config.user_info_endpoint.as_str())
			.header(header::AUTHORIZATION, token.authorization_header())
			.header(header::ACCEPT, JSON_CONTENT_TYPE)
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		match self.send(Endpoint::UserInfo, request).await?.decode_json()? {
			Value::Object(profile) => Ok(profile),
			_ => Err(UnavailableError::NotAnObject { endpoint: Endpoint::UserInfo }.into()),
		}
	}

	async fn send(&self, endpoint: Endpoint, request: HttpRequest) -> Result<ProviderReply> {
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());

		match handle.call(request).await {
			Ok(response) => Ok(ProviderReply { endpoint, response, meta: slot.take() }),
			Err(err) =>
				Err(self.transport_mapper.map_transport_error(endpoint, slot.take().as_ref(), err)),
		}
	}
}
#[cfg(feature = "reqwest")]
impl TokenExchangeClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client over a fresh reqwest transport with the default timeout.
	pub fn new() -> Result<Self> {
		Ok(Self::with_http_client(ReqwestHttpClient::new()?, ReqwestTransportErrorMapper))
	}
}
impl<C, M> Clone for TokenExchangeClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), transport_mapper: self.transport_mapper.clone() }
	}
}
impl<C, M> Debug for TokenExchangeClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenExchangeClient(..)")
	}
}

/// Builds the provider authorize URL.
///
/// Carries `client_id`, `redirect_uri`, `response_type=code`, the space-joined scopes,
/// and `state`, appended to whatever query the configured endpoint already has.
pub fn build_authorization_url(config: &ProviderConfig, state: &OAuthState, scopes: &ScopeList) -> Url {
	let mut url = config.authorization_endpoint.clone();

	url.query_pairs_mut()
		.append_pair("client_id", &config.client_id)
		.append_pair("redirect_uri", config.redirect_uri.as_str())
		.append_pair("response_type", "code")
		.append_pair("scope", &scopes.to_param())
		.append_pair("state", state.as_str());

	url
}

/// Fails with [`ProviderError`] when a decoded body carries a non-empty `error` field.
///
/// Object or array errors are JSON-encoded into the message. The numeric code comes from
/// `error_code`, then `code`, defaulting to `0`.
pub fn check_for_provider_error(body: &Value) -> Result<(), ProviderError> {
	let Some(error) = body.get("error").filter(|error| !is_blank(error)) else {
		return Ok(());
	};
	let message = match error {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	};
	let code = body
		.get("error_code")
		.filter(|code| !code.is_null())
		.or_else(|| body.get("code"))
		.and_then(numeric_code)
		.unwrap_or(0);

	Err(ProviderError { message, code, payload: Some(body.clone()) })
}

/// Response delivered by the transport together with the metadata it captured.
struct ProviderReply {
	endpoint: Endpoint,
	response: HttpResponse,
	meta: Option<ResponseMetadata>,
}
impl ProviderReply {
	/// Decodes the body, letting a provider `error` field win over the status line.
	///
	/// Non-2xx replies without one keep the `Retry-After` hint the transport recorded.
	fn decode_json(self) -> Result<Value> {
		let Self { endpoint, response, meta } = self;
		let status = response.status();
		let mut de = serde_json::Deserializer::from_slice(response.body());
		let decoded = serde_path_to_error::deserialize::<_, Value>(&mut de);

		if let Ok(body) = &decoded {
			check_for_provider_error(body)?;
		}
		if !status.is_success() {
			return Err(UnavailableError::Status {
				endpoint,
				status: status.as_u16(),
				retry_after: meta.and_then(|meta| meta.retry_after),
			}
			.into());
		}

		decoded.map_err(|source| UnavailableError::Malformed { endpoint, source }.into())
	}
}

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::String(text) => text.is_empty() || text == "0",
		Value::Number(number) => number.as_f64() == Some(0.0),
		Value::Array(items) => items.is_empty(),
		Value::Object(_) => false,
	}
}

fn numeric_code(value: &Value) -> Option<i64> {
	match value {
		Value::Number(number) =>
			number.as_i64().or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: Endpoint, meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return UnavailableError::Timeout { endpoint }.into();
	}
	if let Some(status) = meta.and_then(|value| value.status).or_else(|| err.status().map(|s| s.as_u16())) {
		if !(200..300).contains(&status) {
			return UnavailableError::Status {
				endpoint,
				status,
				retry_after: meta.and_then(|value| value.retry_after),
			}
			.into();
		}
	}

	UnavailableError::network(endpoint, err).into()
}

fn map_generic_transport_error(
	endpoint: Endpoint,
	meta: Option<&ResponseMetadata>,
	message: impl Display,
) -> Error {
	match meta.and_then(|value| value.status) {
		Some(status) => UnavailableError::Status {
			endpoint,
			status,
			retry_after: meta.and_then(|value| value.retry_after),
		}
		.into(),
		None => UnavailableError::network(endpoint, TransportMessage(message.to_string())).into(),
	}
}

#[derive(Debug, ThisError)]
#[error("{0}")]
struct TransportMessage(String);
