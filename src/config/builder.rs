//! Builder for [`ProviderConfig`] values.

// self
use crate::{
	_prelude::*,
	auth::{ScopeList, TokenSecret},
	config::{ProviderConfig, keys},
	error::ConfigError,
};

/// Builder for [`ProviderConfig`]; endpoints stay raw strings until [`build`](Self::build)
/// so validation errors can name the settings key at fault.
#[derive(Debug, Default)]
pub struct ProviderConfigBuilder {
	/// Raw authorization endpoint.
	pub authorization_endpoint: Option<String>,
	/// Raw token endpoint.
	pub token_endpoint: Option<String>,
	/// Raw user-info endpoint.
	pub user_info_endpoint: Option<String>,
	/// Client identifier.
	pub client_id: Option<String>,
	/// Client secret.
	pub client_secret: Option<TokenSecret>,
	/// Requested scopes.
	pub scopes: ScopeList,
	/// Identifier path (defaults to `id`).
	pub id_field: Option<String>,
	/// Display-name path (defaults to `name`).
	pub name_field: Option<String>,
	/// Email path (defaults to `email`).
	pub email_field: Option<String>,
	/// Callback URL.
	pub redirect_uri: Option<Url>,
}
impl ProviderConfigBuilder {
	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: impl Into<String>) -> Self {
		self.authorization_endpoint = Some(url.into());

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: impl Into<String>) -> Self {
		self.token_endpoint = Some(url.into());

		self
	}

	/// Sets the user-info endpoint.
	pub fn user_info_endpoint(mut self, url: impl Into<String>) -> Self {
		self.user_info_endpoint = Some(url.into());

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, id: impl Into<String>) -> Self {
		self.client_id = Some(id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Overrides the requested scopes.
	pub fn scopes(mut self, scopes: ScopeList) -> Self {
		self.scopes = scopes;

		self
	}

	/// Overrides the identifier path.
	pub fn id_field(mut self, path: impl Into<String>) -> Self {
		self.id_field = Some(path.into());

		self
	}

	/// Overrides the display-name path.
	pub fn name_field(mut self, path: impl Into<String>) -> Self {
		self.name_field = Some(path.into());

		self
	}

	/// Overrides the email path.
	pub fn email_field(mut self, path: impl Into<String>) -> Self {
		self.email_field = Some(path.into());

		self
	}

	/// Sets the callback URL.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		let authorization_endpoint =
			parse_endpoint(keys::AUTHORIZATION_ENDPOINT, self.authorization_endpoint)?;
		let token_endpoint = parse_endpoint(keys::TOKEN_ENDPOINT, self.token_endpoint)?;
		let user_info_endpoint =
			parse_endpoint(keys::USER_INFORMATION_ENDPOINT, self.user_info_endpoint)?;
		let client_id = require(keys::CLIENT_ID, self.client_id)?;
		let client_secret = self
			.client_secret
			.filter(|secret| !secret.expose().trim().is_empty())
			.ok_or(ConfigError::MissingSetting { key: keys::CLIENT_SECRET })?;
		let redirect_uri =
			self.redirect_uri.ok_or(ConfigError::MissingSetting { key: "redirect_uri" })?;

		Ok(ProviderConfig {
			authorization_endpoint,
			token_endpoint,
			user_info_endpoint,
			client_id,
			client_secret,
			scopes: self.scopes,
			id_field: field_or(self.id_field, keys::DEFAULT_ID_FIELD),
			name_field: field_or(self.name_field, keys::DEFAULT_NAME_FIELD),
			email_field: field_or(self.email_field, keys::DEFAULT_EMAIL_FIELD),
			redirect_uri,
		})
	}
}

fn require(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	value
		.map(|value| value.trim().to_owned())
		.filter(|value| !value.is_empty())
		.ok_or(ConfigError::MissingSetting { key })
}

fn parse_endpoint(key: &'static str, value: Option<String>) -> Result<Url, ConfigError> {
	let raw = require(key, value)?;

	Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint { key, source })
}

fn field_or(value: Option<String>, default: &str) -> String {
	value
		.map(|value| value.trim().to_owned())
		.filter(|value| !value.is_empty())
		.unwrap_or_else(|| default.to_owned())
}
