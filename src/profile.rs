//! Resource-owner profiles and dot-path field resolution.

// self
use crate::{_prelude::*, config::ProviderConfig};

/// Resolves a dot-separated path (`data.user.id`) against a JSON profile.
///
/// Walks key by key and returns `None` as soon as a key is missing or an intermediate
/// value is not an object. The leaf is returned as-is; no coercion happens here.
pub fn resolve<'a>(profile: &'a JsonMap<String, Value>, path: &str) -> Option<&'a Value> {
	let mut keys = path.split('.');
	let mut value = profile.get(keys.next()?)?;

	for key in keys {
		value = value.as_object()?.get(key)?;
	}

	Some(value)
}

/// Renders a resolved leaf as text: strings verbatim, numbers in decimal form.
///
/// Anything else (objects, arrays, booleans, null) and empty strings yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) if !text.is_empty() => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

/// Anything that can describe the account that just logged in.
///
/// Profiles produced by this crate expose resolved accessors; bare JSON maps from other
/// sources only expose the raw payload.
pub trait ProfileSource
where
	Self: Debug + Send + Sync,
{
	/// Raw profile payload.
	fn raw(&self) -> &JsonMap<String, Value>;

	/// Dedicated display-name accessor, when the source has one.
	fn name(&self) -> Option<&str> {
		None
	}

	/// Dedicated email accessor, when the source has one.
	fn email(&self) -> Option<&str> {
		None
	}
}
impl ProfileSource for JsonMap<String, Value> {
	fn raw(&self) -> &JsonMap<String, Value> {
		self
	}
}

/// Profile returned by the user-info endpoint plus its three mapped fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceOwnerProfile {
	/// Raw payload, attached opaquely to the registration intent.
	pub raw: JsonMap<String, Value>,
	/// Resolved identifier (`None` when the path resolved to nothing usable).
	pub id: Option<String>,
	/// Resolved display name.
	pub name: Option<String>,
	/// Resolved email address.
	pub email: Option<String>,
}
impl ResourceOwnerProfile {
	/// Maps `raw` through the field paths configured on `config`.
	pub fn map(raw: JsonMap<String, Value>, config: &ProviderConfig) -> Self {
		Self::map_fields(raw, &config.id_field, &config.name_field, &config.email_field)
	}

	/// Maps `raw` through explicit field paths.
	pub fn map_fields(
		raw: JsonMap<String, Value>,
		id_field: &str,
		name_field: &str,
		email_field: &str,
	) -> Self {
		let lookup = |path: &str| resolve(&raw, path).and_then(scalar_text);
		let id = lookup(id_field);
		let name = lookup(name_field);
		let email = lookup(email_field);

		Self { raw, id, name, email }
	}
}
impl ProfileSource for ResourceOwnerProfile {
	fn raw(&self) -> &JsonMap<String, Value> {
		&self.raw
	}

	fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	fn email(&self) -> Option<&str> {
		self.email.as_deref()
	}
}
