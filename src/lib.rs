//! Generic OAuth 2.0 "passport" login for forums.
//!
//! Covers CSRF-safe authorization-code callbacks, dot-path profile mapping, force/suggest
//! registration hints, profile sync on login, and a redirect fallback for in-app browsers
//! that cannot reach `window.opener`.
//!
//! The crate never owns users, sessions, or settings. Hosts plug those in through the
//! narrow traits in [`store`] and [`host`], then compose the pieces explicitly:
//!
//! - [`flows::OAuthFlowController`] serves `GET /auth/passport`.
//! - [`sync::ProfileSyncHandler`] listens for [`host::LoginSucceeded`].
//! - [`inapp::InAppBrowserRedirector`] post-processes the callback response.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod host;
pub mod http;
pub mod inapp;
pub mod oauth;
pub mod obs;
pub mod profile;
pub mod store;
pub mod sync;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use oauth2::http::{self as http_types, HeaderValue, Request, StatusCode, header};
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};

	/// Response type exchanged with the host web framework.
	pub type Response = http_types::Response<String>;
}

#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Re-exports and transport helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	// std
	use std::time::Duration as StdDuration;
	// crates.io
	use reqwest::redirect::Policy;

	pub use crate::{_prelude::*, http::ReqwestHttpClient};

	/// Reqwest transport that trusts the self-signed certificates served by local mock
	/// providers while keeping the bounded timeout and the no-redirect policy.
	pub fn test_reqwest_http_client(timeout: StdDuration) -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.redirect(Policy::none())
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}
}

pub use _prelude::Response;
pub use oauth2::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

/// Provider key under which accounts are linked and login events are published.
pub const PROVIDER_KEY: &str = "passport";
/// Route path served by [`flows::OAuthFlowController`].
pub const CALLBACK_PATH: &str = "/auth/passport";
