// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("newsroom_client.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
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

/// Logs a refresh failure that was swallowed in favor of the original 401.
pub fn warn_refresh_failed(path: &str, err: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(path, error = %err, "Token refresh failed; returning the original 401.");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (path, err);
	}
}

/// Logs a request that is being reissued with a refreshed credential.
pub fn debug_retrying(path: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(path, "Retrying request with a refreshed access token.");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = path;
	}
}
