//! Host-owned stores consumed by the passport: the browser session and the settings bag.

pub mod memory;

pub use memory::{MemorySession, MemorySettings};

/// Per-browser session storage, used solely for the CSRF state token.
///
/// Implementations rely on interior mutability; one value per key.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`.
	fn get(&self, key: &str) -> Option<String>;

	/// Stores `value` under `key`, replacing any earlier value.
	fn put(&self, key: &str, value: String);

	/// Removes `key`; a missing key is not an error.
	fn remove(&self, key: &str);
}

/// Flat, string-keyed settings repository.
pub trait SettingsStore
where
	Self: Send + Sync,
{
	/// Reads the raw value stored under `key`.
	fn get(&self, key: &str) -> Option<String>;

	/// Persists `value` under `key`.
	fn set(&self, key: &str, value: String);
}

/// Settings helpers layered on top of [`SettingsStore::get`].
pub trait SettingsStoreExt: SettingsStore {
	/// Returns the trimmed value, or `None` when absent or blank.
	fn non_empty(&self, key: &str) -> Option<String> {
		self.get(key).map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
	}

	/// Returns the value or `default` when absent or blank.
	fn get_or(&self, key: &str, default: &str) -> String {
		self.non_empty(key).unwrap_or_else(|| default.to_owned())
	}

	/// Interprets the value as a boolean flag (`1`, `true`, `yes`, `on`), defaulting to false.
	fn flag(&self, key: &str) -> bool {
		self.non_empty(key).is_some_and(|value| {
			matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
		})
	}

	/// Parses a positive integer, falling back to `default` when absent, zero, or invalid.
	fn positive_int(&self, key: &str, default: u32) -> u32 {
		self.non_empty(key)
			.and_then(|value| value.parse::<u32>().ok())
			.filter(|value| *value > 0)
			.unwrap_or(default)
	}
}
impl<T> SettingsStoreExt for T where T: ?Sized + SettingsStore {}
