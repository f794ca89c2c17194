#![cfg(all(feature = "reqwest", feature = "test"))]

mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use oauth2_passport::{
	PROVIDER_KEY,
	config::keys,
	host::{MemoryDirectory, MemoryResponder},
	http_types::{Request, Uri, header},
	inapp::{
		FallbackPayload, InAppBrowserRedirector, PageColors, payload::has_fallback_params,
		take_fallback_payload,
	},
	serde_json::json,
	store::{MemorySession, SettingsStore},
	url::Url,
};

async fn mock_provider(server: &MockServer) {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"tok-1"}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/user");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":42,"profile":{"name":"Ada","email":"ada@example.com"}}"#);
		})
		.await;
}

/// Runs the first visit and returns the callback request carrying the stashed state.
async fn callback_request(
	controller: &oauth2_passport::flows::ReqwestFlowController,
	session: &MemorySession,
	agent: &str,
) -> Request<()> {
	let response = controller
		.handle_callback(&get_with_agent("/auth/passport", agent), session)
		.await
		.expect("First visit should redirect.");
	let location = response
		.headers()
		.get(header::LOCATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| Url::parse(value).ok())
		.expect("Redirect should carry an absolute Location.");
	let state = location
		.query_pairs()
		.find(|(key, _)| key == "state")
		.map(|(_, value)| value.into_owned())
		.expect("Authorize URL should carry a state.");

	get_with_agent(&format!("/auth/passport?code=valid-code&state={state}"), agent)
}

#[tokio::test]
async fn wechat_visitors_are_sent_to_the_sign_up_modal() {
	let server = MockServer::start_async().await;
	let settings = provider_settings(&server);

	settings.set(keys::FORCE_EMAIL, "1".into());
	mock_provider(&server).await;

	let directory = MemoryDirectory::default();
	let controller = controller(&settings, Arc::new(MemoryResponder::new(directory)));
	let redirector = InAppBrowserRedirector::from_settings(&settings, forum_base());
	let session = MemorySession::default();
	let request = callback_request(&controller, &session, WECHAT_AGENT).await;
	let response =
		controller.handle_callback(&request, &session).await.expect("Callback should complete.");

	assert!(response.body().contains("window.opener"));

	let filtered = redirector.filter(&request, response);
	let body = filtered.body();

	assert!(!body.contains("window.opener"));
	assert!(body.contains("oauth_token=registration-1"));
	assert!(body.contains("background: #684ba6"));
	assert_eq!(
		filtered.headers().get(header::SET_COOKIE).and_then(|value| value.to_str().ok()),
		Some("forum_session=memory; Path=/; HttpOnly")
	);

	// The forum picks the parameters up once on the next page load.
	let target = Url::parse(
		"https://forum.example.com/?oauth_token=registration-1&oauth_username=42\
		 &oauth_email=ada%40example.com&oauth_provided=email",
	)
	.expect("Target fixture should parse.");

	assert!(body.contains(&target.as_str().replace('&', "&amp;")));

	let (payload, stripped) = take_fallback_payload(&target);

	assert_eq!(
		payload,
		Some(json!({
			"token": "registration-1",
			"username": "42",
			"email": "ada@example.com",
			"provided": ["email"]
		}))
	);
	assert_eq!(stripped, forum_base());
	assert!(!has_fallback_params(&stripped));
}

#[tokio::test]
async fn linked_visitors_land_on_the_bare_site_root() {
	let server = MockServer::start_async().await;
	let settings = provider_settings(&server);

	mock_provider(&server).await;

	let directory = MemoryDirectory::default();

	directory.link(PROVIDER_KEY, "42", "Ada", "ada@example.com");

	let controller = controller(&settings, Arc::new(MemoryResponder::new(directory)));
	let redirector = InAppBrowserRedirector::new(
		forum_base(),
		PageColors { button: "#000000".into(), button_text: "#ffffff".into() },
	);
	let session = MemorySession::default();
	let request = callback_request(&controller, &session, WECHAT_AGENT).await;
	let response =
		controller.handle_callback(&request, &session).await.expect("Callback should complete.");
	let filtered = redirector.filter(&request, response);

	assert!(filtered.body().contains(r#"var target = "https://forum.example.com/";"#));
	assert!(!filtered.body().contains("oauth_token"));
}

#[tokio::test]
async fn desktop_visitors_keep_the_opener_page() {
	let server = MockServer::start_async().await;
	let settings = provider_settings(&server);

	mock_provider(&server).await;

	let controller =
		controller(&settings, Arc::new(MemoryResponder::new(MemoryDirectory::default())));
	let redirector = InAppBrowserRedirector::from_settings(&settings, forum_base());
	let session = MemorySession::default();
	let agent = "Mozilla/5.0 (Macintosh) AppleWebKit/605.1.15 Version/17.0 Safari/605.1.15";
	let request = callback_request(&controller, &session, agent).await;
	let response =
		controller.handle_callback(&request, &session).await.expect("Callback should complete.");
	let original = response.body().clone();
	let filtered = redirector.filter(&request, response);

	assert_eq!(filtered.body(), &original);
	assert!(redirector.base_url().as_str().starts_with("https://forum.example.com"));
	assert!(oauth2_passport::inapp::is_oauth_callback(request.uri()));
	assert!(!oauth2_passport::inapp::is_oauth_callback(&Uri::from_static("/auth/passport")));
}

#[test]
fn classification_follows_the_login_flag() {
	let payload = json!({ "token": "registration-7", "loggedIn": 0 });
	let map = payload.as_object().expect("Fixture should be an object.");

	assert!(FallbackPayload::classify(map).is_new_user());
}
