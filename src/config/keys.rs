//! Settings keys and their defaults.

/// Prefix shared by every passport setting.
pub const PREFIX: &str = "import-ai-oauth-passport.";

/// Master switch shown to the frontend.
pub const ENABLED: &str = "import-ai-oauth-passport.enabled";
/// OAuth client identifier.
pub const CLIENT_ID: &str = "import-ai-oauth-passport.client_id";
/// OAuth client secret.
pub const CLIENT_SECRET: &str = "import-ai-oauth-passport.client_secret";
/// Comma-separated scope list.
pub const SCOPES: &str = "import-ai-oauth-passport.scopes";
/// Authorization endpoint URL.
pub const AUTHORIZATION_ENDPOINT: &str = "import-ai-oauth-passport.authorization_endpoint";
/// Token endpoint URL.
pub const TOKEN_ENDPOINT: &str = "import-ai-oauth-passport.token_endpoint";
/// User-info endpoint URL.
pub const USER_INFORMATION_ENDPOINT: &str = "import-ai-oauth-passport.user_information_endpoint";
/// Dot-path of the identifier in the profile.
pub const ID_PARAMETER: &str = "import-ai-oauth-passport.id_parameter";
/// Dot-path of the display name in the profile.
pub const DISPLAY_NAME_PARAMETER: &str = "import-ai-oauth-passport.display_name_parameter";
/// Dot-path of the email address in the profile.
pub const EMAIL_ADDRESS_PARAMETER: &str = "import-ai-oauth-passport.email_address_parameter";
/// Force the username to the provider identifier.
pub const FORCE_USERID: &str = "import-ai-oauth-passport.force_userid";
/// Force the nickname to the provider display name.
pub const FORCE_NAME: &str = "import-ai-oauth-passport.force_name";
/// Force (and trust) the provider email.
pub const FORCE_EMAIL: &str = "import-ai-oauth-passport.force_email";
/// Re-sync the display name on every login.
pub const UPDATE_DISPLAY_NAME: &str = "import-ai-oauth-passport.update_display_name";
/// Re-sync the email on every login.
pub const UPDATE_EMAIL: &str = "import-ai-oauth-passport.update_email";
/// Replace the stock login/signup buttons with the passport button.
pub const REPLACE_LOGIN_SIGNUP: &str = "import-ai-oauth-passport.replace_login_signup";
/// Hide the username/password form.
pub const DISABLE_PASSWORD_LOGIN: &str = "import-ai-oauth-passport.disable_password_login";
/// Open the provider in a fullscreen popup.
pub const FULLSCREEN_POPUP: &str = "import-ai-oauth-passport.fullscreen_popup";
/// Login button label.
pub const BUTTON_TITLE: &str = "import-ai-oauth-passport.button_title";
/// Login button icon class.
pub const BUTTON_ICON: &str = "import-ai-oauth-passport.button_icon";
/// Login button background color.
pub const BUTTON_COLOR: &str = "import-ai-oauth-passport.button_color";
/// Login button text color.
pub const BUTTON_TEXT_COLOR: &str = "import-ai-oauth-passport.button_text_color";
/// Popup width in pixels.
pub const POPUP_WIDTH: &str = "import-ai-oauth-passport.popup_width";
/// Popup height in pixels.
pub const POPUP_HEIGHT: &str = "import-ai-oauth-passport.popup_height";

/// Default identifier path.
pub const DEFAULT_ID_FIELD: &str = "id";
/// Default display-name path.
pub const DEFAULT_NAME_FIELD: &str = "name";
/// Default email path.
pub const DEFAULT_EMAIL_FIELD: &str = "email";
/// Default login button label.
pub const DEFAULT_BUTTON_TITLE: &str = "Log in with Passport";
/// Default login button icon.
pub const DEFAULT_BUTTON_ICON: &str = "fas fa-passport";
/// Default button background color.
pub const DEFAULT_BUTTON_COLOR: &str = "#684ba6";
/// Default button text color.
pub const DEFAULT_BUTTON_TEXT_COLOR: &str = "#ffffff";
/// Default popup width.
pub const DEFAULT_POPUP_WIDTH: u32 = 580;
/// Default popup height.
pub const DEFAULT_POPUP_HEIGHT: u32 = 400;
