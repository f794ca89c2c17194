//! Redirect fallback for in-app browsers that cannot reach `window.opener`.
//!
//! [`InAppBrowserRedirector::filter`] post-processes the callback response. It only acts when
//! all of these hold, and passes the response through untouched otherwise:
//!
//! 1. The request is an OAuth callback (`/auth/` in the path and a `code` parameter).
//! 2. The User-Agent is a known in-app browser ([`agent::is_in_app_browser`]).
//! 3. The response is HTML or has no content type.
//! 4. The body carries a completion call whose argument decodes to a JSON object.

pub mod agent;
pub mod page;
pub mod payload;

pub use agent::is_in_app_browser;
pub use page::PageColors;
pub use payload::{FallbackPayload, take_fallback_payload};

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	config::DisplayOptions,
	obs::{self, FlowOutcome, FlowStage, StageSpan},
	store::SettingsStore,
};

/// Response filter that swaps opener-based completion pages for a top-level redirect.
#[derive(Clone, Debug)]
pub struct InAppBrowserRedirector {
	base_url: Url,
	colors: PageColors,
}
impl InAppBrowserRedirector {
	/// Creates a redirector that sends visitors back to `base_url`.
	pub fn new(base_url: Url, colors: PageColors) -> Self {
		Self { base_url, colors }
	}

	/// Creates a redirector branded with the configured button colors.
	pub fn from_settings(settings: &dyn SettingsStore, base_url: Url) -> Self {
		Self::from_display(&DisplayOptions::from_settings(settings), base_url)
	}

	/// Creates a redirector branded with `display`.
	pub fn from_display(display: &DisplayOptions, base_url: Url) -> Self {
		Self::new(
			base_url,
			PageColors {
				button: display.button_color.clone(),
				button_text: display.button_text_color.clone(),
			},
		)
	}

	/// Site root used as the redirect target.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Returns `response` unchanged, or the redirect page when every condition holds.
	pub fn filter<B>(&self, request: &Request<B>, response: Response) -> Response {
		if !is_oauth_callback(request.uri()) || !is_in_app_request(request) || !is_html(&response) {
			return response;
		}

		let Some(payload) = payload::extract_completion_payload(response.body()) else {
			return response;
		};
		let _guard = StageSpan::new(FlowStage::InAppRedirect, "rewrite").enter();

		obs::record_flow_outcome(FlowStage::InAppRedirect, FlowOutcome::Attempt);

		let fallback = FallbackPayload::classify(&payload);
		let target = fallback.redirect_url(&self.base_url);
		let mut redirected = Response::new(page::render(&target, fallback.is_new_user(), &self.colors));

		redirected
			.headers_mut()
			.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));

		for cookie in response.headers().get_all(header::SET_COOKIE) {
			redirected.headers_mut().append(header::SET_COOKIE, cookie.clone());
		}

		obs::record_flow_outcome(FlowStage::InAppRedirect, FlowOutcome::Success);

		redirected
	}
}

/// True when the path contains `/auth/` and the query carries a `code` parameter.
pub fn is_oauth_callback(uri: &http_types::Uri) -> bool {
	uri.path().contains("/auth/")
		&& uri
			.query()
			.is_some_and(|query| form_urlencoded::parse(query.as_bytes()).any(|(key, _)| key == "code"))
}

fn is_in_app_request<B>(request: &Request<B>) -> bool {
	request
		.headers()
		.get(header::USER_AGENT)
		.and_then(|agent| agent.to_str().ok())
		.is_some_and(is_in_app_browser)
}

fn is_html(response: &Response) -> bool {
	match response.headers().get(header::CONTENT_TYPE).map(HeaderValue::to_str) {
		None => true,
		Some(Ok(content_type)) =>
			content_type.is_empty() || content_type.to_ascii_lowercase().contains("text/html"),
		Some(Err(_)) => false,
	}
}
