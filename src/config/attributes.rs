//! Settings exposed to the browser so the login button and popup can be rendered.

// self
use crate::{
	_prelude::*,
	config::DisplayOptions,
	store::SettingsStore,
};

/// Serializable attribute bag the host merges into its forum payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendAttributes {
	/// Login button label.
	#[serde(rename = "importAiOAuthPassport.loginTitle")]
	pub login_title: String,
	/// Login button icon class.
	#[serde(rename = "importAiOAuthPassport.loginIcon")]
	pub login_icon: String,
	/// Whether the button is offered at all.
	#[serde(rename = "importAiOAuthPassport.enabled")]
	pub enabled: bool,
	/// Button background color.
	#[serde(rename = "importAiOAuthPassport.buttonColor")]
	pub button_color: String,
	/// Button text color.
	#[serde(rename = "importAiOAuthPassport.buttonTextColor")]
	pub button_text_color: String,
	/// Replace the stock login/signup buttons.
	#[serde(rename = "importAiOAuthPassport.replaceLoginSignup")]
	pub replace_login_signup: bool,
	/// Hide the username/password form.
	#[serde(rename = "importAiOAuthPassport.disablePasswordLogin")]
	pub disable_password_login: bool,
	/// Open the provider fullscreen.
	#[serde(rename = "importAiOAuthPassport.fullscreenPopup")]
	pub fullscreen_popup: bool,
	/// Popup width in pixels.
	#[serde(rename = "importAiOAuthPassport.popupWidth")]
	pub popup_width: u32,
	/// Popup height in pixels.
	#[serde(rename = "importAiOAuthPassport.popupHeight")]
	pub popup_height: u32,
	/// Absolute callback URL the popup opens.
	#[serde(rename = "importAiOAuthPassport.redirectUrl")]
	pub redirect_url: String,
}
impl FrontendAttributes {
	/// Reads display settings, substituting defaults for blank values.
	pub fn from_settings(settings: &dyn SettingsStore, redirect_url: &Url) -> Self {
		Self::from_display(DisplayOptions::from_settings(settings), redirect_url)
	}

	/// Projects already-loaded display options.
	pub fn from_display(display: DisplayOptions, redirect_url: &Url) -> Self {
		Self {
			login_title: display.button_title,
			login_icon: display.button_icon,
			enabled: display.enabled,
			button_color: display.button_color,
			button_text_color: display.button_text_color,
			replace_login_signup: display.replace_login_signup,
			disable_password_login: display.disable_password_login,
			fullscreen_popup: display.fullscreen_popup,
			popup_width: display.popup_width,
			popup_height: display.popup_height,
			redirect_url: redirect_url.to_string(),
		}
	}
}
