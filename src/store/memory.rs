//! Thread-safe in-memory session and settings stores for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{SessionStore, SettingsStore},
};

type StoreMap = Arc<RwLock<HashMap<String, String>>>;

/// In-process session backing a single browser.
#[derive(Clone, Debug, Default)]
pub struct MemorySession(StoreMap);
impl MemorySession {
	/// Returns a copy of every stored entry.
	pub fn snapshot(&self) -> HashMap<String, String> {
		self.0.read().clone()
	}
}
impl SessionStore for MemorySession {
	fn get(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	fn put(&self, key: &str, value: String) {
		self.0.write().insert(key.to_owned(), value);
	}

	fn remove(&self, key: &str) {
		self.0.write().remove(key);
	}
}

/// In-process settings repository.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings(StoreMap);
impl MemorySettings {
	/// Seeds the store from key/value pairs.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let map = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

		Self(Arc::new(RwLock::new(map)))
	}

	/// Removes `key`.
	pub fn unset(&self, key: &str) {
		self.0.write().remove(key);
	}
}
impl SettingsStore for MemorySettings {
	fn get(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	fn set(&self, key: &str, value: String) {
		self.0.write().insert(key.to_owned(), value);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn session_clones_share_state() {
		let session = MemorySession::default();
		let handle = session.clone();

		handle.put("k", "v".into());

		assert_eq!(session.get("k").as_deref(), Some("v"));

		session.remove("k");
		session.remove("k");

		assert!(handle.snapshot().is_empty());
	}

	#[test]
	fn settings_round_trip() {
		let settings = MemorySettings::from_pairs([("a", "1")]);

		settings.set("b", "2".into());
		settings.unset("a");

		assert_eq!(settings.get("a"), None);
		assert_eq!(settings.get("b").as_deref(), Some("2"));
	}
}
