//! In-memory host collaborators for local development, demos, and tests.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	flows::RegistrationIntent,
	host::{
		EmailValidator, EventDispatcher, HostError, HostEvent, HostFuture, LoginResponder,
		UserAccount, UserDirectory,
	},
};

/// Mutation recorded by [`MemoryDirectory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectoryWrite {
	/// `save_display_name` was called.
	DisplayName {
		/// Account that was changed.
		account: u64,
		/// New value.
		value: String,
	},
	/// `change_verified_email` was called.
	Email {
		/// Account that was changed.
		account: u64,
		/// New value.
		value: String,
	},
}

#[derive(Debug, Default)]
struct DirectoryState {
	accounts: HashMap<u64, UserAccount>,
	links: HashMap<(String, String), u64>,
	writes: Vec<DirectoryWrite>,
	next_id: u64,
}

/// Account directory keyed by `(provider, identifier)` links.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory(Arc<RwLock<DirectoryState>>);
impl MemoryDirectory {
	/// Creates an account linked to `(provider, identifier)`.
	pub fn link(
		&self,
		provider: &str,
		identifier: &str,
		display_name: &str,
		email: &str,
	) -> UserAccount {
		let mut state = self.0.write();

		state.next_id += 1;

		let account = UserAccount {
			id: state.next_id,
			display_name: display_name.to_owned(),
			email: email.to_owned(),
		};

		state.accounts.insert(account.id, account.clone());
		state.links.insert((provider.to_owned(), identifier.to_owned()), account.id);

		account
	}

	/// Removes the account, leaving its provider link dangling.
	pub fn delete_account(&self, id: u64) {
		self.0.write().accounts.remove(&id);
	}

	/// Returns the current state of an account.
	pub fn account(&self, id: u64) -> Option<UserAccount> {
		self.0.read().accounts.get(&id).cloned()
	}

	/// Returns true when `(provider, identifier)` is linked to an existing account.
	pub fn is_linked(&self, provider: &str, identifier: &str) -> bool {
		let state = self.0.read();

		state
			.links
			.get(&(provider.to_owned(), identifier.to_owned()))
			.is_some_and(|id| state.accounts.contains_key(id))
	}

	/// Every mutation applied so far, in call order.
	pub fn writes(&self) -> Vec<DirectoryWrite> {
		self.0.read().writes.clone()
	}

	fn apply(&self, account: &UserAccount, write: DirectoryWrite) -> Result<HostEvent, HostError> {
		let mut state = self.0.write();
		let stored = state
			.accounts
			.get_mut(&account.id)
			.ok_or_else(|| HostError::backend("save", format!("account {} is gone", account.id)))?;
		let event = match &write {
			DirectoryWrite::DisplayName { value, .. } => {
				stored.display_name = value.clone();

				HostEvent::new(
					"user.renamed",
					serde_json::json!({ "id": account.id, "displayName": value }),
				)
			},
			DirectoryWrite::Email { value, .. } => {
				stored.email = value.clone();

				HostEvent::new(
					"user.email_changed",
					serde_json::json!({ "id": account.id, "email": value }),
				)
			},
		};

		state.writes.push(write);

		Ok(event)
	}
}
impl UserDirectory for MemoryDirectory {
	fn find_by_login_provider<'a>(
		&'a self,
		provider: &'a str,
		identifier: &'a str,
	) -> HostFuture<'a, Option<UserAccount>> {
		Box::pin(async move {
			let state = self.0.read();

			Ok(state
				.links
				.get(&(provider.to_owned(), identifier.to_owned()))
				.and_then(|id| state.accounts.get(id))
				.cloned())
		})
	}

	fn save_display_name<'a>(
		&'a self,
		account: &'a UserAccount,
		display_name: &'a str,
	) -> HostFuture<'a, Vec<HostEvent>> {
		Box::pin(async move {
			let write =
				DirectoryWrite::DisplayName { account: account.id, value: display_name.to_owned() };

			Ok(vec![self.apply(account, write)?])
		})
	}

	fn change_verified_email<'a>(
		&'a self,
		account: &'a UserAccount,
		email: &'a str,
	) -> HostFuture<'a, Vec<HostEvent>> {
		Box::pin(async move {
			let write = DirectoryWrite::Email { account: account.id, value: email.to_owned() };

			Ok(vec![self.apply(account, write)?])
		})
	}
}

/// Event bus that keeps every dispatched event.
#[derive(Clone, Debug, Default)]
pub struct EventLog(Arc<Mutex<Vec<HostEvent>>>);
impl EventLog {
	/// Returns a copy of the dispatched events.
	pub fn events(&self) -> Vec<HostEvent> {
		self.0.lock().clone()
	}
}
impl EventDispatcher for EventLog {
	fn dispatch(&self, event: HostEvent) {
		self.0.lock().push(event);
	}
}

/// Structural email check: one `@`, a non-empty local part, a dotted domain, no spaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicEmailValidator;
impl EmailValidator for BasicEmailValidator {
	fn validate_email(&self, _: &UserAccount, email: &str) -> Result<(), ValidationError> {
		let reject = |reason: &str| ValidationError {
			field: "email".into(),
			value: email.to_owned(),
			reason: reason.into(),
		};

		if email.chars().any(char::is_whitespace) {
			return Err(reject("must not contain whitespace"));
		}

		let Some((local, domain)) = email.split_once('@') else {
			return Err(reject("must contain `@`"));
		};

		if local.is_empty() || domain.contains('@') {
			return Err(reject("must contain exactly one local part"));
		}
		if !domain.split('.').all(|label| !label.is_empty()) || !domain.contains('.') {
			return Err(reject("must have a dotted domain"));
		}

		Ok(())
	}
}

/// Login sink that renders the same completion page a forum would.
///
/// Linked identities get `{"loggedIn":true}`; anything else gets a registration token plus
/// the intent's completion payload. Every call is recorded.
#[derive(Clone, Debug)]
pub struct MemoryResponder {
	directory: MemoryDirectory,
	calls: Arc<Mutex<Vec<(String, String, RegistrationIntent)>>>,
}
impl MemoryResponder {
	/// Creates a responder that consults `directory` for existing links.
	pub fn new(directory: MemoryDirectory) -> Self {
		Self { directory, calls: Default::default() }
	}

	/// Every `(provider, identifier, intent)` passed to [`LoginResponder::complete`].
	pub fn calls(&self) -> Vec<(String, String, RegistrationIntent)> {
		self.calls.lock().clone()
	}
}
impl LoginResponder for MemoryResponder {
	fn complete<'a>(
		&'a self,
		provider: &'a str,
		identifier: &'a str,
		intent: RegistrationIntent,
	) -> HostFuture<'a, Response> {
		Box::pin(async move {
			let payload = if self.directory.is_linked(provider, identifier) {
				serde_json::json!({ "loggedIn": true })
			} else {
				let token = {
					let calls = self.calls.lock();

					format!("registration-{}", calls.len() + 1)
				};

				Value::Object(intent.completion_payload(&token))
			};

			self.calls.lock().push((provider.to_owned(), identifier.to_owned(), intent));

			let body = format!(
				"<script>window.close();window.opener.app.authenticationComplete({payload});</script>"
			);

			http_types::Response::builder()
				.header(header::CONTENT_TYPE, "text/html; charset=utf-8")
				.header(header::SET_COOKIE, "forum_session=memory; Path=/; HttpOnly")
				.body(body)
				.map_err(|e| HostError::Login { message: e.to_string() })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn basic_validator_accepts_plain_addresses() {
		let account = UserAccount { id: 1, display_name: "a".into(), email: "a@x.io".into() };

		assert!(BasicEmailValidator.validate_email(&account, "ada@example.com").is_ok());

		for bad in ["not-an-email", "@example.com", "a@b@c.io", "a@localhost", "a b@x.io", "a@x."] {
			let err = BasicEmailValidator
				.validate_email(&account, bad)
				.expect_err("Malformed address should be rejected.");

			assert_eq!(err.field, "email");
			assert_eq!(err.value, bad);
		}
	}

	#[test]
	fn deleted_accounts_are_not_linked() {
		let directory = MemoryDirectory::default();
		let account = directory.link("passport", "42", "Ada", "ada@example.com");

		assert!(directory.is_linked("passport", "42"));
		assert!(!directory.is_linked("github", "42"));

		directory.delete_account(account.id);

		assert!(!directory.is_linked("passport", "42"));
	}
}
