// self
use crate::{_prelude::*, obs::FlowStage};

/// Future returned by [`StageSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type Traced<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`StageSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type Traced<F> = F;

/// Span covering one step of a passport stage.
///
/// Emitted as `oauth2_passport.stage` with `stage`, `step` and `provider` fields.
#[derive(Clone, Debug)]
pub struct StageSpan {
	stage: FlowStage,
	step: &'static str,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Opens a span for `step` within `stage`.
	pub fn new(stage: FlowStage, step: &'static str) -> Self {
		Self {
			stage,
			step,
			#[cfg(feature = "tracing")]
			span: tracing::info_span!(
				"oauth2_passport.stage",
				stage = stage.as_str(),
				step,
				provider = crate::PROVIDER_KEY
			),
		}
	}

	/// Stage this span belongs to.
	pub fn stage(&self) -> FlowStage {
		self.stage
	}

	/// Step label within the stage.
	pub fn step(&self) -> &'static str {
		self.step
	}

	/// Enters the span until the returned guard drops. Synchronous sections only.
	pub fn enter(self) -> StageGuard {
		#[cfg(feature = "tracing")]
		{
			StageGuard { stage: self.stage, _entered: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			StageGuard { stage: self.stage }
		}
	}

	/// Attaches the span to `fut` so it is active on every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Guard returned by [`StageSpan::enter`].
pub struct StageGuard {
	stage: FlowStage,
	#[cfg(feature = "tracing")]
	_entered: tracing::span::EnteredSpan,
}
impl Debug for StageGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "StageGuard({})", self.stage)
	}
}

/// Warns about a profile field that was left untouched.
pub fn record_skip(stage: FlowStage, field: &'static str, reason: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			stage = stage.as_str(),
			field,
			provider = crate::PROVIDER_KEY,
			%reason,
			"profile field not updated"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, field, reason);
	}
}
