//! Host collaborators: the forum's login sink, account directory, email validator, and
//! event bus.
//!
//! The passport never owns accounts. Everything that touches users goes through these
//! traits so a host can back them with its own persistence.

pub mod memory;

pub use memory::*;

// self
use crate::{_prelude::*, error::ValidationError, flows::RegistrationIntent, profile::ProfileSource};

/// Boxed future returned by async host operations.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HostError>> + 'a + Send>>;

/// Failure reported by a host collaborator.
#[derive(Debug, ThisError)]
pub enum HostError {
	/// The backing store (database, cache, remote service) failed.
	#[error("Host backend failed during {operation}: {message}.")]
	Backend {
		/// Operation that failed (`find_by_login_provider`, `save_display_name`, ...).
		operation: &'static str,
		/// Human-readable failure detail.
		message: String,
	},
	/// The login sink refused to finish the login.
	#[error("Login could not be completed: {message}.")]
	Login {
		/// Human-readable failure detail.
		message: String,
	},
}
impl HostError {
	/// Creates a [`HostError::Backend`] error.
	pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
		Self::Backend { operation, message: message.into() }
	}
}

/// Local account linked to a login provider identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAccount {
	/// Host-assigned account identifier.
	pub id: u64,
	/// Current display name.
	pub display_name: String,
	/// Current email address.
	pub email: String,
}

/// Domain event released by a host save operation.
#[derive(Clone, Debug, PartialEq)]
pub struct HostEvent {
	/// Event name, e.g. `user.renamed`.
	pub name: String,
	/// Event-specific data.
	pub payload: Value,
}
impl HostEvent {
	/// Creates a new event.
	pub fn new(name: impl Into<String>, payload: Value) -> Self {
		Self { name: name.into(), payload }
	}
}

/// Fired by the host once a provider login has been finalized.
#[derive(Clone, Debug)]
pub struct LoginSucceeded {
	/// Provider key (`passport` for this crate).
	pub provider: String,
	/// Provider-unique account identifier.
	pub identifier: String,
	/// Profile the login was completed with.
	pub resource: Arc<dyn ProfileSource>,
	/// Whether an existing account was logged in (false for registrations).
	pub logged_in: bool,
}

/// Registration/login sink that turns a mapped identity into an HTTP response.
pub trait LoginResponder
where
	Self: Send + Sync,
{
	/// Logs in the account linked to `(provider, identifier)` or starts registration with
	/// the supplied hints.
	fn complete<'a>(
		&'a self,
		provider: &'a str,
		identifier: &'a str,
		intent: RegistrationIntent,
	) -> HostFuture<'a, Response>;
}

/// Account lookup and mutation.
pub trait UserDirectory
where
	Self: Send + Sync,
{
	/// Finds the account linked to `(provider, identifier)`.
	fn find_by_login_provider<'a>(
		&'a self,
		provider: &'a str,
		identifier: &'a str,
	) -> HostFuture<'a, Option<UserAccount>>;

	/// Persists a new display name and returns the events the save released.
	fn save_display_name<'a>(
		&'a self,
		account: &'a UserAccount,
		display_name: &'a str,
	) -> HostFuture<'a, Vec<HostEvent>>;

	/// Replaces the account email without a confirmation round-trip.
	fn change_verified_email<'a>(
		&'a self,
		account: &'a UserAccount,
		email: &'a str,
	) -> HostFuture<'a, Vec<HostEvent>>;
}

/// Host-side email validation (format, uniqueness, blocklists).
pub trait EmailValidator
where
	Self: Send + Sync,
{
	/// Accepts or rejects `email` as the new address of `account`.
	fn validate_email(&self, account: &UserAccount, email: &str) -> Result<(), ValidationError>;
}

/// Host event bus.
pub trait EventDispatcher
where
	Self: Send + Sync,
{
	/// Publishes one event.
	fn dispatch(&self, event: HostEvent);
}
