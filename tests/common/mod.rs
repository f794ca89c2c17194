//! Shared fixtures for the reqwest-backed integration tests.

#![allow(dead_code)]

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::MockServer;
// self
use oauth2_passport::{
	_preludet::test_reqwest_http_client,
	config::keys,
	flows::ReqwestFlowController,
	host::LoginResponder,
	http_types::{Request, header},
	oauth::{ReqwestTokenExchangeClient, ReqwestTransportErrorMapper, TokenExchangeClient},
	store::{MemorySettings, SettingsStore},
	url::Url,
};

pub const CLIENT_ID: &str = "c1";
pub const CLIENT_SECRET: &str = "s1";
pub const WECHAT_AGENT: &str =
	"Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 MicroMessenger/8.0.40";

pub fn redirect_uri() -> Url {
	Url::parse("https://forum.example.com/auth/passport").expect("Redirect URI should parse.")
}

pub fn forum_base() -> Url {
	Url::parse("https://forum.example.com/").expect("Forum base URL should parse.")
}

/// Provider settings pointing at `server`, with the end-to-end field mapping.
pub fn provider_settings(server: &MockServer) -> MemorySettings {
	MemorySettings::from_pairs([
		(keys::AUTHORIZATION_ENDPOINT, server.url("/oauth/authorize")),
		(keys::TOKEN_ENDPOINT, server.url("/oauth/token")),
		(keys::USER_INFORMATION_ENDPOINT, server.url("/api/user")),
		(keys::CLIENT_ID, CLIENT_ID.to_owned()),
		(keys::CLIENT_SECRET, CLIENT_SECRET.to_owned()),
		(keys::ID_PARAMETER, "id".to_owned()),
		(keys::DISPLAY_NAME_PARAMETER, "profile.name".to_owned()),
		(keys::EMAIL_ADDRESS_PARAMETER, "profile.email".to_owned()),
	])
}

pub fn exchange_client(timeout: Duration) -> ReqwestTokenExchangeClient {
	TokenExchangeClient::with_http_client(
		test_reqwest_http_client(timeout),
		ReqwestTransportErrorMapper,
	)
}

pub fn controller(
	settings: &MemorySettings,
	responder: Arc<dyn LoginResponder>,
) -> ReqwestFlowController {
	controller_with_timeout(settings, responder, Duration::from_secs(5))
}

pub fn controller_with_timeout(
	settings: &MemorySettings,
	responder: Arc<dyn LoginResponder>,
	timeout: Duration,
) -> ReqwestFlowController {
	let settings: Arc<dyn SettingsStore> = Arc::new(settings.clone());

	ReqwestFlowController::new(exchange_client(timeout), settings, redirect_uri(), responder)
}

pub fn get(uri: &str) -> Request<()> {
	Request::builder().uri(uri).body(()).expect("Request fixture should build.")
}

pub fn get_with_agent(uri: &str, agent: &str) -> Request<()> {
	Request::builder()
		.uri(uri)
		.header(header::USER_AGENT, agent)
		.body(())
		.expect("Request fixture should build.")
}
