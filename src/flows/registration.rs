//! Force/suggest identity hints handed to the host registration system.

// self
use crate::{_prelude::*, config::IdentityFlags, profile::ResourceOwnerProfile};

/// Account fields the passport can pre-fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
	/// Unique login name, taken from the profile identifier.
	Username,
	/// Display name.
	Nickname,
	/// Email address.
	Email,
}
impl IdentityField {
	/// Returns the key the host registration payload uses for this field.
	pub const fn as_str(self) -> &'static str {
		match self {
			IdentityField::Username => "username",
			IdentityField::Nickname => "nickname",
			IdentityField::Email => "email",
		}
	}
}
impl Display for IdentityField {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How strongly the host must adopt a hinted value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintMode {
	/// Pre-fill; the visitor may edit before the account is created.
	Suggest,
	/// Adopt as-is. For email this also means the address is already verified.
	Force,
}
impl HintMode {
	fn from_flag(force: bool) -> Self {
		if force { Self::Force } else { Self::Suggest }
	}
}

/// One `(field, value, mode)` triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityHint {
	/// Field being hinted.
	pub field: IdentityField,
	/// Value taken from the provider profile.
	pub value: String,
	/// Whether the host must adopt the value.
	pub mode: HintMode,
}

/// Everything the host needs to log in or register a provider identity.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistrationIntent {
	hints: Vec<IdentityHint>,
	payload: JsonMap<String, Value>,
}
impl RegistrationIntent {
	/// Builds the hints for a freshly mapped profile.
	///
	/// Fails with [`Error::MissingIdentity`] when the identifier did not resolve.
	pub fn build(
		profile: ResourceOwnerProfile,
		flags: &IdentityFlags,
		id_field: &str,
	) -> Result<Self> {
		let Some(id) = profile.id else {
			return Err(Error::MissingIdentity { field: id_field.to_owned() });
		};
		let mut hints = vec![IdentityHint {
			field: IdentityField::Username,
			value: id,
			mode: HintMode::from_flag(flags.force_user_id),
		}];

		if let Some(name) = profile.name {
			hints.push(IdentityHint {
				field: IdentityField::Nickname,
				value: name,
				mode: HintMode::from_flag(flags.force_name),
			});
		}
		if let Some(email) = profile.email {
			hints.push(IdentityHint {
				field: IdentityField::Email,
				value: email,
				mode: HintMode::from_flag(flags.force_email),
			});
		}

		Ok(Self { hints, payload: profile.raw })
	}

	/// Returns the hint for `field`, if one was produced.
	pub fn get(&self, field: IdentityField) -> Option<&IdentityHint> {
		self.hints.iter().find(|hint| hint.field == field)
	}

	/// Iterates hints in username, nickname, email order.
	pub fn iter(&self) -> impl Iterator<Item = &IdentityHint> {
		self.hints.iter()
	}

	/// Provider identifier (the username hint value).
	pub fn identifier(&self) -> &str {
		self.get(IdentityField::Username).map(|hint| hint.value.as_str()).unwrap_or_default()
	}

	/// Raw provider profile, attached opaquely for downstream listeners.
	pub fn payload(&self) -> &JsonMap<String, Value> {
		&self.payload
	}

	/// True when the host must skip email confirmation.
	pub fn trusts_email(&self) -> bool {
		self.get(IdentityField::Email).is_some_and(|hint| hint.mode == HintMode::Force)
	}

	/// Completion payload for a not-yet-registered visitor.
	///
	/// Forced values, then suggested values, then `token` and the `provided` list naming
	/// every forced field. A forced and suggested value for the same key cannot coexist, so
	/// the merge order only matters for readability.
	pub fn completion_payload(&self, token: &str) -> JsonMap<String, Value> {
		let mut payload = JsonMap::new();
		let mut provided = Vec::new();

		for mode in [HintMode::Force, HintMode::Suggest] {
			for hint in self.hints.iter().filter(|hint| hint.mode == mode) {
				payload.insert(hint.field.as_str().to_owned(), Value::String(hint.value.clone()));

				if mode == HintMode::Force {
					provided.push(Value::String(hint.field.as_str().to_owned()));
				}
			}
		}

		payload.insert("token".into(), Value::String(token.to_owned()));
		payload.insert("provided".into(), Value::Array(provided));

		payload
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use serde_json::json;

	fn profile(raw: Value) -> ResourceOwnerProfile {
		let Value::Object(raw) = raw else { panic!("Fixture must be a JSON object.") };

		ResourceOwnerProfile::map_fields(raw, "id", "profile.name", "profile.email")
	}

	fn flags(force_user_id: bool, force_name: bool, force_email: bool) -> IdentityFlags {
		IdentityFlags { force_user_id, force_name, force_email }
	}

	#[test]
	fn email_mode_follows_force_flag() {
		let raw = json!({ "id": "7", "profile": { "email": "u@x.com" } });
		let forced = RegistrationIntent::build(profile(raw.clone()), &flags(false, false, true), "id")
			.expect("Intent should build.");

		assert_eq!(forced.get(IdentityField::Email).map(|hint| hint.mode), Some(HintMode::Force));
		assert!(forced.trusts_email());

		let suggested = RegistrationIntent::build(profile(raw), &flags(false, false, false), "id")
			.expect("Intent should build.");

		assert_eq!(
			suggested.get(IdentityField::Email).map(|hint| hint.mode),
			Some(HintMode::Suggest)
		);
		assert!(!suggested.trusts_email());
	}

	#[test]
	fn empty_optional_fields_produce_no_hints() {
		let raw = json!({ "id": 7, "profile": { "name": "", "email": "" } });
		let intent = RegistrationIntent::build(profile(raw), &flags(true, true, true), "id")
			.expect("Intent should build.");

		assert_eq!(intent.iter().count(), 1);
		assert_eq!(intent.identifier(), "7");
		assert_eq!(intent.get(IdentityField::Nickname), None);
		assert_eq!(intent.get(IdentityField::Email), None);
	}

	#[test]
	fn missing_identifier_is_fatal() {
		let err = RegistrationIntent::build(
			profile(json!({ "profile": { "name": "Ada" } })),
			&flags(false, false, false),
			"id",
		)
		.expect_err("Missing identifier should fail.");

		assert!(matches!(err, Error::MissingIdentity { ref field } if field == "id"));
	}

	#[test]
	fn completion_payload_lists_forced_fields() {
		let raw = json!({ "id": "42", "profile": { "name": "Ada", "email": "ada@example.com" } });
		let intent = RegistrationIntent::build(profile(raw.clone()), &flags(true, false, true), "id")
			.expect("Intent should build.");
		let payload = intent.completion_payload("abc");

		assert_eq!(payload.get("username"), Some(&json!("42")));
		assert_eq!(payload.get("nickname"), Some(&json!("Ada")));
		assert_eq!(payload.get("email"), Some(&json!("ada@example.com")));
		assert_eq!(payload.get("token"), Some(&json!("abc")));
		assert_eq!(payload.get("provided"), Some(&json!(["username", "email"])));
		assert_eq!(Value::Object(intent.payload().clone()), raw);
	}
}
