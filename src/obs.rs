//! Optional observability helpers for passport flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit `oauth2_passport.stage` spans carrying `stage`, `step` and
//!   `provider`, plus a `warn` event for every skipped profile-sync update.
//! - Enable `metrics` to increment the `oauth2_passport_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Request stages observed by the passport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// First visit: state stashed, visitor redirected to the provider.
	Authorize,
	/// Return leg: state check, code exchange, profile mapping.
	Callback,
	/// Post-login display-name and email refresh.
	ProfileSync,
	/// Completion page rewritten for an in-app browser.
	InAppRedirect,
}
impl FlowStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::Authorize => "authorize",
			FlowStage::Callback => "callback",
			FlowStage::ProfileSync => "profile_sync",
			FlowStage::InAppRedirect => "in_app_redirect",
		}
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
