//! Scope list stored comma-separated in settings and transmitted space-separated.

// self
use crate::_prelude::*;

/// Scope requested when the settings leave the list empty.
pub const DEFAULT_SCOPE: &str = "read";

/// Ordered list of OAuth scopes.
///
/// Unlike a normalized set, the order configured by the operator is preserved so the
/// authorize URL matches what the provider documentation shows.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Builds a list from individual entries, trimming whitespace and skipping blanks.
	///
	/// An empty result falls back to [`DEFAULT_SCOPE`].
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let scopes = scopes
			.into_iter()
			.map(|scope| scope.as_ref().trim().to_owned())
			.filter(|scope| !scope.is_empty())
			.collect::<Vec<_>>();

		if scopes.is_empty() { Self::default() } else { Self(scopes) }
	}

	/// Parses the comma-separated settings representation.
	pub fn from_setting(raw: &str) -> Self {
		Self::new(raw.split(','))
	}

	/// Number of scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Always false; an empty list is replaced by the default scope.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over the scopes in configured order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Wire representation (single-space delimited).
	pub fn to_param(&self) -> String {
		self.0.join(" ")
	}

	/// Settings representation (comma delimited).
	pub fn to_setting(&self) -> String {
		self.0.join(",")
	}
}
impl Default for ScopeList {
	fn default() -> Self {
		Self(vec![DEFAULT_SCOPE.to_owned()])
	}
}
impl From<Vec<String>> for ScopeList {
	fn from(scopes: Vec<String>) -> Self {
		Self::new(scopes)
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.to_param())
	}
}
