//! One-shot import of settings left behind by earlier OAuth login extensions.

// self
use crate::{
	_prelude::*,
	config::keys,
	store::{SettingsStore, SettingsStoreExt},
};

/// Marker key of the legacy generic-provider extension.
pub const LEGACY_GENERIC_ENABLED: &str = "fof-oauth.generic";
/// Marker key of the legacy passport extension.
pub const LEGACY_PASSPORT_APP_ID: &str = "fof-passport.app_id";

const GENERIC_MAPPINGS: [(&str, &str); 13] = [
	(LEGACY_GENERIC_ENABLED, keys::ENABLED),
	("fof-oauth.generic.client_id", keys::CLIENT_ID),
	("fof-oauth.generic.client_secret", keys::CLIENT_SECRET),
	("fof-oauth.generic.scopes", keys::SCOPES),
	("fof-oauth.generic.authorization_endpoint", keys::AUTHORIZATION_ENDPOINT),
	("fof-oauth.generic.token_endpoint", keys::TOKEN_ENDPOINT),
	("fof-oauth.generic.user_information_endpoint", keys::USER_INFORMATION_ENDPOINT),
	("fof-oauth.generic.id_parameter", keys::ID_PARAMETER),
	("fof-oauth.generic.display_name_parameter", keys::DISPLAY_NAME_PARAMETER),
	("fof-oauth.generic.email_address_parameter", keys::EMAIL_ADDRESS_PARAMETER),
	("fof-oauth.generic.force_userid", keys::FORCE_USERID),
	("fof-oauth.generic.force_name", keys::FORCE_NAME),
	("fof-oauth.generic.force_email", keys::FORCE_EMAIL),
];
const PASSPORT_MAPPINGS: [(&str, &str); 6] = [
	(LEGACY_PASSPORT_APP_ID, keys::CLIENT_ID),
	("fof-passport.app_secret", keys::CLIENT_SECRET),
	("fof-passport.app_oauth_scopes", keys::SCOPES),
	("fof-passport.app_auth_url", keys::AUTHORIZATION_ENDPOINT),
	("fof-passport.app_token_url", keys::TOKEN_ENDPOINT),
	("fof-passport.app_user_url", keys::USER_INFORMATION_ENDPOINT),
];

/// What [`migrate_legacy_settings`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
	/// Passport keys that were written.
	pub copied: Vec<String>,
	/// Login-provider rename `(from, to)` the host must apply to its linked accounts.
	pub rename_login_provider: Option<(String, String)>,
}
impl MigrationReport {
	/// Returns true when nothing was migrated.
	pub fn is_empty(&self) -> bool {
		self.copied.is_empty() && self.rename_login_provider.is_none()
	}
}

/// Copies legacy settings onto passport keys.
///
/// Generic-provider settings are copied key by key when present, and linked accounts
/// must be renamed from `generic`. Legacy passport settings are imported only when no
/// client id is configured yet.
pub fn migrate_legacy_settings(settings: &dyn SettingsStore) -> MigrationReport {
	let mut report = MigrationReport::default();

	if settings.get(LEGACY_GENERIC_ENABLED).is_some() {
		for (legacy, current) in GENERIC_MAPPINGS {
			if let Some(value) = settings.get(legacy) {
				settings.set(current, value);
				report.copied.push(current.to_owned());
			}
		}

		report.rename_login_provider = Some(("generic".into(), crate::PROVIDER_KEY.into()));
	}
	if settings.get(LEGACY_PASSPORT_APP_ID).is_some() && settings.get(keys::CLIENT_ID).is_none()
	{
		settings.set(keys::ENABLED, "1".into());
		report.copied.push(keys::ENABLED.to_owned());

		for (legacy, current) in PASSPORT_MAPPINGS {
			settings.set(current, settings.get(legacy).unwrap_or_default());
			report.copied.push(current.to_owned());
		}
		for (key, value) in [
			(keys::ID_PARAMETER, keys::DEFAULT_ID_FIELD),
			(keys::DISPLAY_NAME_PARAMETER, keys::DEFAULT_NAME_FIELD),
			(keys::EMAIL_ADDRESS_PARAMETER, keys::DEFAULT_EMAIL_FIELD),
		] {
			settings.set(key, value.into());
			report.copied.push(key.to_owned());
		}
	}

	report
}

/// Reverts the migration by disabling the provider; imported values are kept.
pub fn rollback_migration(settings: &dyn SettingsStore) {
	if settings.flag(keys::ENABLED) {
		settings.set(keys::ENABLED, "0".into());
	}
}
