//! Serves the first visit to the callback route and prints where the visitor is sent.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use oauth2_passport::{
	CALLBACK_PATH,
	auth::SESSION_STATE_KEY,
	config::{PassportConfig, keys},
	flows::{CallbackParams, ReqwestFlowController, error_response},
	host::{MemoryDirectory, MemoryResponder},
	http_types::{Request, header},
	oauth::ReqwestTokenExchangeClient,
	store::{MemorySession, MemorySettings, SessionStore, SettingsStore},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let settings: Arc<dyn SettingsStore> = Arc::new(MemorySettings::from_pairs([
		(keys::AUTHORIZATION_ENDPOINT, "https://id.example.com/oauth/authorize"),
		(keys::TOKEN_ENDPOINT, "https://id.example.com/oauth/token"),
		(keys::USER_INFORMATION_ENDPOINT, "https://id.example.com/api/user"),
		(keys::CLIENT_ID, "demo-client"),
		(keys::CLIENT_SECRET, "demo-secret"),
		(keys::SCOPES, "read,profile"),
	]));
	let redirect_uri = Url::parse("https://forum.example.com")?.join(CALLBACK_PATH)?;
	let config = PassportConfig::load(settings.as_ref(), redirect_uri.clone())?;

	println!("Button: {} ({}).", config.display.button_title, config.display.button_color);

	let controller = ReqwestFlowController::new(
		ReqwestTokenExchangeClient::new()?,
		settings,
		redirect_uri,
		Arc::new(MemoryResponder::new(MemoryDirectory::default())),
	);
	let session = MemorySession::default();
	let response =
		controller.handle_callback(&Request::get(CALLBACK_PATH).body(())?, &session).await?;

	if let Some(location) = response.headers().get(header::LOCATION) {
		println!("Send your visitor to {}.", location.to_str()?);
	}

	let stashed = session.get(SESSION_STATE_KEY).unwrap_or_default();

	println!("Stashed state `{stashed}` in the session.");

	// A provider that bounces the visitor back with an error never reaches the token endpoint.
	let denied = Request::get(format!("{CALLBACK_PATH}?error=access_denied&hint=User%20declined"))
		.body(())?;

	println!("Parsed callback: {:?}.", CallbackParams::from_uri(denied.uri()));

	if let Err(e) = controller.handle_callback(&denied, &session).await {
		let page = error_response(&e);

		println!("Denied login answers HTTP {}: {e}", page.status());
	}

	Ok(())
}
