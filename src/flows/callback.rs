//! `GET /auth/passport`: authorize redirect on the first visit, code exchange on return.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	PROVIDER_KEY,
	auth::OAuthState,
	config::PassportConfig,
	error::{ConfigError, ProviderError},
	flows::RegistrationIntent,
	host::LoginResponder,
	http::ProviderHttpClient,
	obs::{self, FlowOutcome, FlowStage, StageSpan},
	oauth::{TokenExchangeClient, TransportErrorMapper},
	profile::ResourceOwnerProfile,
	store::{SessionStore, SettingsStore},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Controller specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestFlowController = OAuthFlowController<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Query parameters the callback route understands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// Authorization code (return leg).
	pub code: Option<String>,
	/// Echoed CSRF state.
	pub state: Option<String>,
	/// Provider error code.
	pub error: Option<String>,
	/// `error_description`, falling back to `hint`.
	pub error_description: Option<String>,
}
impl CallbackParams {
	/// Parses the query string of `uri`; empty values count as absent.
	pub fn from_uri(uri: &http_types::Uri) -> Self {
		let mut params = HashMap::new();

		for (key, value) in form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes()) {
			if !value.is_empty() {
				params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
			}
		}

		let error_description =
			params.remove("error_description").or_else(|| params.remove("hint"));

		Self {
			code: params.remove("code"),
			state: params.remove("state"),
			error: params.remove("error"),
			error_description,
		}
	}
}

/// Drives the authorization-code flow for one configured provider.
///
/// Settings are re-read on every request so operators can change them without a restart.
pub struct OAuthFlowController<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: TokenExchangeClient<C, M>,
	settings: Arc<dyn SettingsStore>,
	redirect_uri: Url,
	responder: Arc<dyn LoginResponder>,
}
impl<C, M> OAuthFlowController<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a controller whose callback route is reachable at `redirect_uri`.
	pub fn new(
		client: TokenExchangeClient<C, M>,
		settings: Arc<dyn SettingsStore>,
		redirect_uri: Url,
		responder: Arc<dyn LoginResponder>,
	) -> Self {
		Self { client, settings, redirect_uri, responder }
	}

	/// Returns the exchange client used for provider calls.
	pub fn client(&self) -> &TokenExchangeClient<C, M> {
		&self.client
	}

	/// Handles one request to the callback route.
	///
	/// The query string is read before the returned future starts, so the future does not
	/// borrow `request`.
	pub fn handle_callback<'a, B>(
		&'a self,
		request: &Request<B>,
		session: &'a dyn SessionStore,
	) -> impl Future<Output = Result<Response>> + use<'a, B, C, M> {
		let params = CallbackParams::from_uri(request.uri());

		async move {
			if let Some(error) = &params.error {
				obs::record_flow_outcome(FlowStage::Callback, FlowOutcome::Failure);

				return Err(ProviderError::from_callback(
					error,
					params.error_description.as_deref().unwrap_or_default(),
				)
				.into());
			}

			let config = PassportConfig::load(self.settings.as_ref(), self.redirect_uri.clone())?;

			match params.code {
				None => self.authorize(&config, session),
				Some(code) => self.complete(&config, session, &code, params.state.as_deref()).await,
			}
		}
	}

	fn authorize(&self, config: &PassportConfig, session: &dyn SessionStore) -> Result<Response> {
		let _guard = StageSpan::new(FlowStage::Authorize, "redirect").enter();

		obs::record_flow_outcome(FlowStage::Authorize, FlowOutcome::Attempt);

		let state = OAuthState::generate();
		let url = self.client.authorization_url(&config.provider, &state, &config.provider.scopes);

		state.stash(session);

		obs::observe(FlowStage::Authorize, redirect(&url))
	}

	async fn complete(
		&self,
		config: &PassportConfig,
		session: &dyn SessionStore,
		code: &str,
		state: Option<&str>,
	) -> Result<Response> {
		let span = StageSpan::new(FlowStage::Callback, "complete");

		obs::record_flow_outcome(FlowStage::Callback, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				OAuthState::consume(session, state)?;

				let provider = &config.provider;
				let token = self.client.exchange_code(provider, code).await?;
				let raw = self.client.fetch_resource_owner(provider, &token).await?;
				let profile = ResourceOwnerProfile::map(raw, provider);
				let intent = RegistrationIntent::build(profile, &config.identity, &provider.id_field)?;
				let identifier = intent.identifier().to_owned();

				Ok(self.responder.complete(PROVIDER_KEY, &identifier, intent).await?)
			})
			.await;

		obs::observe(FlowStage::Callback, result)
	}
}
impl<C, M> Debug for OAuthFlowController<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthFlowController")
			.field("redirect_uri", &self.redirect_uri.as_str())
			.finish_non_exhaustive()
	}
}

fn redirect(location: &Url) -> Result<Response> {
	http_types::Response::builder()
		.status(StatusCode::FOUND)
		.header(header::LOCATION, location.as_str())
		.body(String::new())
		.map_err(|e| ConfigError::from(e).into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn params_skip_empty_values_and_prefer_description() {
		let uri: http_types::Uri =
			"/auth/passport?code=&state=s&error=denied&hint=h&error_description=d"
				.parse()
				.expect("URI fixture should parse.");
		let params = CallbackParams::from_uri(&uri);

		assert_eq!(params.code, None);
		assert_eq!(params.state.as_deref(), Some("s"));
		assert_eq!(params.error.as_deref(), Some("denied"));
		assert_eq!(params.error_description.as_deref(), Some("d"));
	}

	#[test]
	fn hint_is_used_when_description_is_missing() {
		let uri: http_types::Uri = "/auth/passport?error=access_denied&hint=User%20declined"
			.parse()
			.expect("URI fixture should parse.");
		let bare: http_types::Uri = "/auth/passport".parse().expect("URI fixture should parse.");

		assert_eq!(
			CallbackParams::from_uri(&uri).error_description.as_deref(),
			Some("User declined")
		);
		assert_eq!(CallbackParams::from_uri(&bare), CallbackParams::default());
	}

	#[test]
	fn redirect_sets_location() {
		let url = Url::parse("https://id.example.com/authorize?state=x")
			.expect("URL fixture should parse.");
		let response = redirect(&url).expect("Redirect should build.");

		assert_eq!(response.status(), StatusCode::FOUND);
		assert_eq!(
			response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
			Some(url.as_str())
		);
	}
}
