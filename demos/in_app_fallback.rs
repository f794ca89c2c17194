//! Shows how an opener-based completion page is rewritten for an in-app browser, and how the
//! forum reads the handed-over registration hints back.

// crates.io
use color_eyre::{Result, eyre::eyre};
use serde_json::json;
// self
use oauth2_passport::{
	PROVIDER_KEY,
	config::{DisplayOptions, IdentityFlags},
	flows::RegistrationIntent,
	host::{LoginResponder, MemoryDirectory, MemoryResponder},
	http_types::{Request, header},
	inapp::{InAppBrowserRedirector, is_in_app_browser, take_fallback_payload},
	profile::ResourceOwnerProfile,
	url::Url,
};

const WECHAT: &str = "Mozilla/5.0 (iPhone) AppleWebKit/605.1.15 MicroMessenger/8.0.40";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let raw = json!({ "id": 42, "profile": { "name": "Ada", "email": "ada@example.com" } });
	let raw = raw.as_object().cloned().ok_or_else(|| eyre!("Profile must be an object."))?;
	let profile = ResourceOwnerProfile::map_fields(raw, "id", "profile.name", "profile.email");
	let flags = IdentityFlags { force_email: true, ..Default::default() };
	let intent = RegistrationIntent::build(profile, &flags, "id")?;
	let identifier = intent.identifier().to_owned();
	let responder = MemoryResponder::new(MemoryDirectory::default());
	let completion = responder.complete(PROVIDER_KEY, &identifier, intent).await?;

	println!("Desktop page: {}", completion.body());
	println!("In-app browser detected: {}.", is_in_app_browser(WECHAT));

	let base = Url::parse("https://forum.example.com/")?;
	let redirector = InAppBrowserRedirector::from_display(&DisplayOptions::default(), base.clone());
	let request = Request::get("/auth/passport?code=demo&state=demo")
		.header(header::USER_AGENT, WECHAT)
		.body(())?;
	let page = redirector.filter(&request, completion);
	let target = page
		.body()
		.lines()
		.find_map(|line| line.trim().strip_prefix("var target = "))
		.and_then(|literal| serde_json::from_str::<String>(literal.trim_end_matches(';')).ok())
		.ok_or_else(|| eyre!("Redirect page should carry a target."))?;

	println!("In-app visitors are sent to {target}.");

	let (payload, cleaned) = take_fallback_payload(&Url::parse(&target)?);

	println!("Sign-up modal opens with {payload:?}; address bar becomes {cleaned}.");

	Ok(())
}
