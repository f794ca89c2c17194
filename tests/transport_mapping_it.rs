// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use parking_lot::Mutex;
use time::Duration;
// self
use oauth2_passport::{
	auth::AccessToken,
	config::ProviderConfig,
	error::{ConfigError, Error, UnavailableError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	http_types::{StatusCode, header},
	oauth::{Endpoint, TokenExchangeClient, TransportErrorMapper},
	url::Url,
};

#[derive(Debug)]
enum FakeTransportError {
	Throttled,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Throttled => write!(f, "Transport throttled."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Either fails every call with HTTP 429 metadata or answers with a fixed JSON body.
#[derive(Clone)]
enum FakeHttpClient {
	Throttled { retry_after: Duration },
	Answering { body: &'static str, requests: Arc<Mutex<Vec<HttpRequest>>> },
}
impl ProviderHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHttpHandle { slot, behavior: self.clone() }
	}
}

struct FakeHttpHandle {
	slot: ResponseMetadataSlot,
	behavior: FakeHttpClient,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let slot = self.slot.clone();
		let behavior = self.behavior.clone();

		Box::pin(async move {
			assert!(
				slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);

			match behavior {
				FakeHttpClient::Throttled { retry_after } => {
					slot.store(ResponseMetadata { status: Some(429), retry_after: Some(retry_after) });

					Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Throttled)))
				},
				FakeHttpClient::Answering { body, requests } => {
					requests.lock().push(request);
					slot.store(ResponseMetadata { status: Some(200), retry_after: None });

					let mut response = HttpResponse::new(body.as_bytes().to_vec());

					*response.status_mut() = StatusCode::OK;

					Ok(response)
				},
			}
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	calls: Arc<Mutex<Vec<(Endpoint, Option<ResponseMetadata>)>>>,
}
impl RecordingTransportErrorMapper {
	fn recorded(&self) -> Vec<(Endpoint, Option<ResponseMetadata>)> {
		self.calls.lock().clone()
	}
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<FakeTransportError>,
	) -> Error {
		self.calls.lock().push((endpoint, meta.cloned()));

		match (err, meta.and_then(|value| value.status)) {
			(HttpClientError::Http(inner), _) => ConfigError::from(inner).into(),
			(_, Some(status)) => UnavailableError::Status {
				endpoint,
				status,
				retry_after: meta.and_then(|value| value.retry_after),
			}
			.into(),
			(other, None) => UnavailableError::network(endpoint, other).into(),
		}
	}
}

fn build_config() -> ProviderConfig {
	ProviderConfig::builder()
		.authorization_endpoint("https://mock.example.com/authorize")
		.token_endpoint("https://mock.example.com/token")
		.user_info_endpoint("https://mock.example.com/me")
		.client_id("fake-client")
		.client_secret("fake-secret")
		.redirect_uri(
			Url::parse("https://forum.example.com/auth/passport")
				.expect("Failed to parse redirect URI."),
		)
		.build()
		.expect("Failed to build fake provider config.")
}

#[tokio::test]
async fn fake_transport_surfaces_throttle_metadata() {
	let mapper = RecordingTransportErrorMapper::default();
	let client: TokenExchangeClient<FakeHttpClient, RecordingTransportErrorMapper> =
		TokenExchangeClient::with_http_client(
			FakeHttpClient::Throttled { retry_after: Duration::seconds(5) },
			mapper.clone(),
		);
	let err = client
		.exchange_code(&build_config(), "code-1")
		.await
		.expect_err("Exchange should be throttled with HTTP 429.");

	match err {
		Error::Unavailable(UnavailableError::Status { endpoint, status, retry_after }) => {
			assert_eq!(endpoint, Endpoint::Token);
			assert_eq!(status, 429);
			assert_eq!(retry_after, Some(Duration::seconds(5)));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	let recorded = mapper.recorded();

	assert_eq!(recorded.len(), 1, "Mapper must record a single request.");
	assert_eq!(recorded[0].0, Endpoint::Token);
}

#[tokio::test]
async fn profile_failures_are_attributed_to_the_user_info_endpoint() {
	let mapper = RecordingTransportErrorMapper::default();
	let client: TokenExchangeClient<FakeHttpClient, RecordingTransportErrorMapper> =
		TokenExchangeClient::with_http_client(
			FakeHttpClient::Throttled { retry_after: Duration::seconds(30) },
			mapper.clone(),
		);
	let err = client
		.fetch_resource_owner(&build_config(), &AccessToken::new("tok"))
		.await
		.expect_err("Profile fetch should be throttled.");

	assert!(err.is_transient());

	let (endpoint, meta) = mapper
		.recorded()
		.into_iter()
		.next()
		.expect("Mapper should record the failed request.");
	let meta = meta.expect("Response metadata should be recorded.");

	assert_eq!(endpoint, Endpoint::UserInfo);
	assert_eq!(meta.status, Some(429));
	assert_eq!(meta.retry_after, Some(Duration::seconds(30)));
}

#[tokio::test]
async fn successful_calls_never_reach_the_mapper() {
	let requests = Arc::new(Mutex::new(Vec::new()));
	let mapper = RecordingTransportErrorMapper::default();
	let client: TokenExchangeClient<FakeHttpClient, RecordingTransportErrorMapper> =
		TokenExchangeClient::with_http_client(
			FakeHttpClient::Answering {
				body: r#"{"access_token":"tok-9","token_type":"bearer","id":7}"#,
				requests: requests.clone(),
			},
			mapper.clone(),
		);
	let config = build_config();
	let token = client.exchange_code(&config, "code-9").await.expect("Exchange should succeed.");

	assert_eq!(token.secret.expose(), "tok-9");
	assert_eq!(token.token_type.as_deref(), Some("bearer"));

	let profile =
		client.fetch_resource_owner(&config, &token).await.expect("Profile fetch should succeed.");

	assert_eq!(profile.get("id"), Some(&7.into()));
	assert!(mapper.recorded().is_empty());

	let requests = requests.lock();
	let exchange = &requests[0];
	let body = String::from_utf8(exchange.body().clone()).expect("Form body should be UTF-8.");

	assert_eq!(exchange.uri(), "https://mock.example.com/token");
	assert!(body.contains("grant_type=authorization_code"));
	assert!(body.contains("code=code-9"));
	assert!(body.contains("client_secret=fake-secret"));
	assert_eq!(
		requests[1].headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
		Some("Bearer tok-9")
	);
}

#[cfg(feature = "reqwest")]
#[tokio::test]
async fn refused_connections_map_to_network_errors() {
	// Bind then drop so the port is known to be closed.
	let port = std::net::TcpListener::bind("127.0.0.1:0")
		.and_then(|listener| listener.local_addr())
		.expect("Ephemeral port should be available.")
		.port();
	let config = ProviderConfig {
		token_endpoint: Url::parse(&format!("http://127.0.0.1:{port}/token"))
			.expect("Token URL should parse."),
		..build_config()
	};
	let client = oauth2_passport::oauth::ReqwestTokenExchangeClient::new()
		.expect("Reqwest client should build.");
	let err = client
		.exchange_code(&config, "code-1")
		.await
		.expect_err("Closed port should refuse the connection.");

	assert!(matches!(
		err,
		Error::Unavailable(UnavailableError::Network { endpoint: Endpoint::Token, .. })
	));
}
