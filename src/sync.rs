//! Refreshes the stored display name and email from the provider on every login.

// self
use crate::{
	_prelude::*,
	PROVIDER_KEY,
	config::{SyncFlags, keys},
	error::ValidationError,
	host::{
		EmailValidator, EventDispatcher, HostError, HostEvent, LoginSucceeded, UserAccount,
		UserDirectory,
	},
	obs::{self, FlowOutcome, FlowStage, StageSpan},
	profile::{self, ProfileSource},
	store::{SettingsStore, SettingsStoreExt},
};

/// What happened to one synced field.
#[derive(Debug)]
pub enum FieldSync {
	/// Syncing this field is switched off.
	Disabled,
	/// The profile carried no usable value.
	Empty,
	/// The stored value already matches.
	Unchanged,
	/// The new value was persisted.
	Updated(String),
	/// Host validation rejected the new value.
	Invalid(ValidationError),
	/// Persisting the new value failed.
	Failed(HostError),
}
impl FieldSync {
	/// Returns true when the field was written.
	pub fn is_updated(&self) -> bool {
		matches!(self, Self::Updated(_))
	}
}

/// Per-field outcome of one [`ProfileSyncHandler::handle`] call.
#[derive(Debug)]
pub struct SyncReport {
	/// Account that was examined, if one is linked.
	pub account: Option<u64>,
	/// Display-name outcome.
	pub display_name: FieldSync,
	/// Email outcome.
	pub email: FieldSync,
}
impl SyncReport {
	fn untouched(account: Option<u64>) -> Self {
		Self { account, display_name: FieldSync::Disabled, email: FieldSync::Disabled }
	}
}

/// Listener for [`LoginSucceeded`] events of the passport provider.
pub struct ProfileSyncHandler {
	settings: Arc<dyn SettingsStore>,
	users: Arc<dyn UserDirectory>,
	validator: Arc<dyn EmailValidator>,
	events: Arc<dyn EventDispatcher>,
}
impl ProfileSyncHandler {
	/// Wires the handler to its host collaborators.
	pub fn new(
		settings: Arc<dyn SettingsStore>,
		users: Arc<dyn UserDirectory>,
		validator: Arc<dyn EmailValidator>,
		events: Arc<dyn EventDispatcher>,
	) -> Self {
		Self { settings, users, validator, events }
	}

	/// Applies the enabled updates for the account behind `event`.
	///
	/// Events for other providers and unlinked identities are no-ops. The two fields are
	/// handled independently: a rejected email or a failed save only affects its own field.
	/// The only error returned is a failed account lookup.
	pub async fn handle(&self, event: &LoginSucceeded) -> Result<SyncReport> {
		if event.provider != PROVIDER_KEY {
			return Ok(SyncReport::untouched(None));
		}

		let flags = SyncFlags::from_settings(self.settings.as_ref());

		if flags.is_disabled() {
			return Ok(SyncReport::untouched(None));
		}

		let span = StageSpan::new(FlowStage::ProfileSync, "handle");

		obs::record_flow_outcome(FlowStage::ProfileSync, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let Some(account) =
					self.users.find_by_login_provider(&event.provider, &event.identifier).await?
				else {
					return Ok(SyncReport::untouched(None));
				};
				let resource = event.resource.as_ref();
				let display_name = if flags.update_display_name {
					self.sync_display_name(&account, resource).await
				} else {
					FieldSync::Disabled
				};
				let email = if flags.update_email {
					self.sync_email(&account, resource).await
				} else {
					FieldSync::Disabled
				};

				Ok(SyncReport { account: Some(account.id), display_name, email })
			})
			.await;

		obs::observe(FlowStage::ProfileSync, result)
	}

	async fn sync_display_name(
		&self,
		account: &UserAccount,
		resource: &dyn ProfileSource,
	) -> FieldSync {
		let name_field =
			self.settings.get_or(keys::DISPLAY_NAME_PARAMETER, keys::DEFAULT_NAME_FIELD);
		let Some(name) = candidate(resource.name(), resource, &name_field) else {
			return FieldSync::Empty;
		};

		if name == account.display_name {
			return FieldSync::Unchanged;
		}

		match self.users.save_display_name(account, &name).await {
			Ok(events) => {
				self.release(events);

				FieldSync::Updated(name)
			},
			Err(e) => {
				obs::record_skip(FlowStage::ProfileSync, "display_name", &e);

				FieldSync::Failed(e)
			},
		}
	}

	async fn sync_email(&self, account: &UserAccount, resource: &dyn ProfileSource) -> FieldSync {
		let email_field =
			self.settings.get_or(keys::EMAIL_ADDRESS_PARAMETER, keys::DEFAULT_EMAIL_FIELD);
		let Some(email) = candidate(resource.email(), resource, &email_field) else {
			return FieldSync::Empty;
		};

		if email == account.email {
			return FieldSync::Unchanged;
		}
		if let Err(e) = self.validator.validate_email(account, &email) {
			obs::record_skip(FlowStage::ProfileSync, "email", &e);

			return FieldSync::Invalid(e);
		}

		match self.users.change_verified_email(account, &email).await {
			Ok(events) => {
				self.release(events);

				FieldSync::Updated(email)
			},
			Err(e) => {
				obs::record_skip(FlowStage::ProfileSync, "email", &e);

				FieldSync::Failed(e)
			},
		}
	}

	fn release(&self, events: Vec<HostEvent>) {
		for event in events {
			self.events.dispatch(event);
		}
	}
}
impl Debug for ProfileSyncHandler {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ProfileSyncHandler(..)")
	}
}

/// Prefers the dedicated accessor, then the dot-path lookup against the raw profile.
fn candidate(
	accessor: Option<&str>,
	resource: &dyn ProfileSource,
	path: &str,
) -> Option<String> {
	accessor
		.filter(|value| !value.is_empty())
		.map(str::to_owned)
		.or_else(|| profile::resolve(resource.raw(), path).and_then(profile::scalar_text))
}
