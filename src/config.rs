//! Typed configuration assembled from the host's flat settings bag.
//!
//! [`PassportConfig::load`] runs once per request and validates required provider
//! settings eagerly, so a misconfigured deployment fails before any network call.

pub mod attributes;
pub mod builder;
pub mod keys;
pub mod migrate;

pub use attributes::*;
pub use builder::*;
pub use migrate::*;

// self
use crate::{
	_prelude::*,
	auth::{ScopeList, TokenSecret},
	store::{SettingsStore, SettingsStoreExt},
};

/// Immutable provider settings for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
	/// Where visitors are sent to authorize.
	pub authorization_endpoint: Url,
	/// Where codes are exchanged for access tokens.
	pub token_endpoint: Url,
	/// Where the resource owner profile is fetched.
	pub user_info_endpoint: Url,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Requested scopes in configured order.
	pub scopes: ScopeList,
	/// Dot-path of the identifier in the profile.
	pub id_field: String,
	/// Dot-path of the display name in the profile.
	pub name_field: String,
	/// Dot-path of the email address in the profile.
	pub email_field: String,
	/// Callback URL registered with the provider.
	pub redirect_uri: Url,
}
impl ProviderConfig {
	/// Creates a new builder.
	pub fn builder() -> ProviderConfigBuilder {
		ProviderConfigBuilder::default()
	}

	/// Reads and validates the provider settings.
	pub fn from_settings(
		settings: &dyn SettingsStore,
		redirect_uri: Url,
	) -> Result<Self, crate::error::ConfigError> {
		let mut builder = Self::builder()
			.scopes(ScopeList::from_setting(&settings.get(keys::SCOPES).unwrap_or_default()))
			.id_field(settings.get_or(keys::ID_PARAMETER, keys::DEFAULT_ID_FIELD))
			.name_field(settings.get_or(keys::DISPLAY_NAME_PARAMETER, keys::DEFAULT_NAME_FIELD))
			.email_field(settings.get_or(keys::EMAIL_ADDRESS_PARAMETER, keys::DEFAULT_EMAIL_FIELD))
			.redirect_uri(redirect_uri);

		if let Some(value) = settings.non_empty(keys::AUTHORIZATION_ENDPOINT) {
			builder = builder.authorization_endpoint(value);
		}
		if let Some(value) = settings.non_empty(keys::TOKEN_ENDPOINT) {
			builder = builder.token_endpoint(value);
		}
		if let Some(value) = settings.non_empty(keys::USER_INFORMATION_ENDPOINT) {
			builder = builder.user_info_endpoint(value);
		}
		if let Some(value) = settings.non_empty(keys::CLIENT_ID) {
			builder = builder.client_id(value);
		}
		if let Some(value) = settings.non_empty(keys::CLIENT_SECRET) {
			builder = builder.client_secret(value);
		}

		builder.build()
	}
}

/// Force-vs-suggest switches applied when building a registration intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFlags {
	/// Username must equal the provider identifier.
	pub force_user_id: bool,
	/// Nickname must equal the provider display name.
	pub force_name: bool,
	/// Email is adopted as trusted and skips verification.
	pub force_email: bool,
}
impl IdentityFlags {
	/// Reads the flags from settings.
	pub fn from_settings(settings: &dyn SettingsStore) -> Self {
		Self {
			force_user_id: settings.flag(keys::FORCE_USERID),
			force_name: settings.flag(keys::FORCE_NAME),
			force_email: settings.flag(keys::FORCE_EMAIL),
		}
	}
}

/// Which stored fields are refreshed on every login.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFlags {
	/// Keep the display name in sync with the provider.
	pub update_display_name: bool,
	/// Keep the email in sync with the provider.
	pub update_email: bool,
}
impl SyncFlags {
	/// Reads the flags from settings.
	pub fn from_settings(settings: &dyn SettingsStore) -> Self {
		Self {
			update_display_name: settings.flag(keys::UPDATE_DISPLAY_NAME),
			update_email: settings.flag(keys::UPDATE_EMAIL),
		}
	}

	/// Returns true when neither field is synced.
	pub fn is_disabled(&self) -> bool {
		!self.update_display_name && !self.update_email
	}
}

/// Branding and popup options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
	/// Whether the login button is offered.
	pub enabled: bool,
	/// Button label.
	pub button_title: String,
	/// Button icon class.
	pub button_icon: String,
	/// Button background color.
	pub button_color: String,
	/// Button text color.
	pub button_text_color: String,
	/// Replace the stock login/signup buttons.
	pub replace_login_signup: bool,
	/// Hide the username/password form.
	pub disable_password_login: bool,
	/// Open the provider fullscreen instead of in a sized popup.
	pub fullscreen_popup: bool,
	/// Popup width in pixels.
	pub popup_width: u32,
	/// Popup height in pixels.
	pub popup_height: u32,
}
impl DisplayOptions {
	/// Reads the options from settings, substituting defaults for blanks.
	pub fn from_settings(settings: &dyn SettingsStore) -> Self {
		Self {
			enabled: settings.flag(keys::ENABLED),
			button_title: settings.get_or(keys::BUTTON_TITLE, keys::DEFAULT_BUTTON_TITLE),
			button_icon: settings.get_or(keys::BUTTON_ICON, keys::DEFAULT_BUTTON_ICON),
			button_color: settings.get_or(keys::BUTTON_COLOR, keys::DEFAULT_BUTTON_COLOR),
			button_text_color: settings
				.get_or(keys::BUTTON_TEXT_COLOR, keys::DEFAULT_BUTTON_TEXT_COLOR),
			replace_login_signup: settings.flag(keys::REPLACE_LOGIN_SIGNUP),
			disable_password_login: settings.flag(keys::DISABLE_PASSWORD_LOGIN),
			fullscreen_popup: settings.flag(keys::FULLSCREEN_POPUP),
			popup_width: settings.positive_int(keys::POPUP_WIDTH, keys::DEFAULT_POPUP_WIDTH),
			popup_height: settings.positive_int(keys::POPUP_HEIGHT, keys::DEFAULT_POPUP_HEIGHT),
		}
	}
}
impl Default for DisplayOptions {
	fn default() -> Self {
		Self {
			enabled: false,
			button_title: keys::DEFAULT_BUTTON_TITLE.into(),
			button_icon: keys::DEFAULT_BUTTON_ICON.into(),
			button_color: keys::DEFAULT_BUTTON_COLOR.into(),
			button_text_color: keys::DEFAULT_BUTTON_TEXT_COLOR.into(),
			replace_login_signup: false,
			disable_password_login: false,
			fullscreen_popup: false,
			popup_width: keys::DEFAULT_POPUP_WIDTH,
			popup_height: keys::DEFAULT_POPUP_HEIGHT,
		}
	}
}

/// Complete per-request configuration snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassportConfig {
	/// Provider endpoints, credentials, and field mapping.
	pub provider: ProviderConfig,
	/// Force-vs-suggest switches.
	pub identity: IdentityFlags,
	/// Profile sync switches.
	pub sync: SyncFlags,
	/// Branding and popup options.
	pub display: DisplayOptions,
}
impl PassportConfig {
	/// Assembles and validates the full configuration.
	pub fn load(settings: &dyn SettingsStore, redirect_uri: Url) -> Result<Self> {
		Ok(Self {
			provider: ProviderConfig::from_settings(settings, redirect_uri)?,
			identity: IdentityFlags::from_settings(settings),
			sync: SyncFlags::from_settings(settings),
			display: DisplayOptions::from_settings(settings),
		})
	}
}
