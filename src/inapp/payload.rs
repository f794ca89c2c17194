//! Completion payload extraction, classification, and the fallback query contract.
//!
//! A finished login page calls `authenticationComplete({...})` or `linkingComplete({...})`
//! on the opener window. In-app browsers have no opener, so the payload is lifted out of the
//! page and re-sent as `oauth_*` query parameters on a top-level redirect.

// self
use crate::_prelude::*;

/// Script calls that deliver a completion payload.
pub const COMPLETION_CALLS: [&str; 2] = ["authenticationComplete", "linkingComplete"];

/// Query parameter carrying the registration token.
pub const PARAM_TOKEN: &str = "oauth_token";
/// Query parameter carrying the suggested or forced username.
pub const PARAM_USERNAME: &str = "oauth_username";
/// Query parameter carrying the suggested or forced email.
pub const PARAM_EMAIL: &str = "oauth_email";
/// Query parameter carrying the comma-joined list of forced fields.
pub const PARAM_PROVIDED: &str = "oauth_provided";

const FALLBACK_PARAMS: [&str; 4] = [PARAM_TOKEN, PARAM_USERNAME, PARAM_EMAIL, PARAM_PROVIDED];

/// Returns the first completion payload in `body` that decodes to a JSON object.
pub fn extract_completion_payload(body: &str) -> Option<JsonMap<String, Value>> {
	let argument = COMPLETION_CALLS
		.iter()
		.flat_map(|&call| body.match_indices(call).map(|(at, found)| at + found.len()))
		.filter_map(|after| object_argument(&body[after..]))
		.next()?;

	match serde_json::from_str::<Value>(argument).ok()? {
		Value::Object(payload) => Some(payload),
		_ => None,
	}
}

/// Matches `\s*(\s*{...}` and returns the balanced `{...}` slice.
fn object_argument(rest: &str) -> Option<&str> {
	let rest = rest.trim_start().strip_prefix('(')?.trim_start();

	if !rest.starts_with('{') {
		return None;
	}

	let mut depth = 0_usize;
	let mut in_string = false;
	let mut escaped = false;

	for (at, c) in rest.char_indices() {
		if in_string {
			match c {
				_ if escaped => escaped = false,
				'\\' => escaped = true,
				'"' => in_string = false,
				_ => {},
			}

			continue;
		}

		match c {
			'"' => in_string = true,
			'{' | '[' => depth += 1,
			'}' | ']' => {
				depth = depth.checked_sub(1)?;

				if depth == 0 {
					return Some(&rest[..=at]);
				}
			},
			_ => {},
		}
	}

	None
}

/// How the visitor should continue after an in-app login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackPayload {
	/// No account yet: the site opens its sign-up modal from the query parameters.
	NewUser {
		/// Registration token issued by the host.
		token: String,
		/// Username hint.
		username: Option<String>,
		/// Email hint.
		email: Option<String>,
		/// Fields the host forced.
		provided: Vec<String>,
	},
	/// Already logged in through the session cookie.
	ExistingUser,
}
impl FallbackPayload {
	/// New user iff `token` is present and `loggedIn` is absent or falsy.
	pub fn classify(payload: &JsonMap<String, Value>) -> Self {
		let token = payload.get("token").filter(|token| !token.is_null());
		let logged_in = payload.get("loggedIn").is_some_and(is_truthy);

		match token {
			Some(token) if !logged_in => Self::NewUser {
				token: text(token),
				username: payload.get("username").and_then(crate::profile::scalar_text),
				email: payload.get("email").and_then(crate::profile::scalar_text),
				provided: payload
					.get("provided")
					.and_then(Value::as_array)
					.map(|fields| fields.iter().filter_map(crate::profile::scalar_text).collect())
					.unwrap_or_default(),
			},
			_ => Self::ExistingUser,
		}
	}

	/// Returns true for [`FallbackPayload::NewUser`].
	pub fn is_new_user(&self) -> bool {
		matches!(self, Self::NewUser { .. })
	}

	/// Builds the redirect target: `base` alone for existing users, `base` plus the
	/// `oauth_*` parameters for new ones.
	pub fn redirect_url(&self, base: &Url) -> Url {
		let mut url = base.clone();

		if let Self::NewUser { token, username, email, provided } = self {
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair(PARAM_TOKEN, token);

			if let Some(username) = username {
				pairs.append_pair(PARAM_USERNAME, username);
			}
			if let Some(email) = email {
				pairs.append_pair(PARAM_EMAIL, email);
			}
			if !provided.is_empty() {
				pairs.append_pair(PARAM_PROVIDED, &provided.join(","));
			}
		}

		url
	}
}

/// Reads the `oauth_*` fallback parameters from `url` once.
///
/// Returns the rebuilt completion payload (`{token, username?, email?, provided}`) when an
/// `oauth_token` is present, plus `url` with every `oauth_*` parameter stripped.
pub fn take_fallback_payload(url: &Url) -> (Option<Value>, Url) {
	let mut payload = JsonMap::new();
	let mut provided = Vec::new();
	let mut kept = Vec::new();

	for (key, value) in url.query_pairs() {
		match key.as_ref() {
			PARAM_TOKEN => {
				payload.entry("token").or_insert_with(|| Value::String(value.into_owned()));
			},
			PARAM_USERNAME => {
				payload.entry("username").or_insert_with(|| Value::String(value.into_owned()));
			},
			PARAM_EMAIL => {
				payload.entry("email").or_insert_with(|| Value::String(value.into_owned()));
			},
			PARAM_PROVIDED => provided.extend(
				value
					.split(',')
					.filter(|field| !field.is_empty())
					.map(|field| Value::String(field.to_owned())),
			),
			_ => kept.push((key.into_owned(), value.into_owned())),
		}
	}

	let mut stripped = url.clone();

	if kept.is_empty() {
		stripped.set_query(None);
	} else {
		stripped.query_pairs_mut().clear().extend_pairs(kept);
	}

	let payload = payload.contains_key("token").then(|| {
		payload.insert("provided".into(), Value::Array(provided));

		Value::Object(payload)
	});

	(payload, stripped)
}

/// Returns true when `url` carries any fallback parameter.
pub fn has_fallback_params(url: &Url) -> bool {
	url.query_pairs().any(|(key, _)| FALLBACK_PARAMS.contains(&key.as_ref()))
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
		Value::String(text) => !text.is_empty() && text != "0",
		Value::Array(items) => !items.is_empty(),
		Value::Object(_) => true,
	}
}

fn text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
