//! Access-token refresh with an optional single in-flight guard.
//!
//! [`ApiClient::refresh_access_token`] is the raw exchange: it posts the stored refresh token to
//! the refresh endpoint, stores the returned access token, and never clears state on failure.
//! The `401` path goes through `refresh_after_rejection`, which serializes concurrent refreshes
//! when [`ClientConfig::coalesce_refresh`](crate::config::ClientConfig::coalesce_refresh) is on
//! and lets late arrivals reuse a token that was replaced while they waited. A rejected bearer the
//! caller supplied never reuses the stored token.

// self
use crate::{
	_prelude::*,
	auth::{RefreshRequest, RefreshResponse, TokenSecret},
	client::ApiClient,
	error::ConfigError,
	http::{ApiRequest, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges the stored refresh token for a new access token and stores it.
	///
	/// Fails with [`ConfigError::MissingRefreshToken`] without any network call when the session
	/// holds no refresh token. Rejections surface as [`Error::Status`]; no state is cleared.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "refresh_access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let refresh =
					self.session.refresh_token().await?.ok_or(ConfigError::MissingRefreshToken)?;
				let request = ApiRequest::post(self.config.refresh_path.clone())
					.with_json(&RefreshRequest { refresh: refresh.expose() })?
					.with_timeout(self.config.refresh_timeout);
				let issued: RefreshResponse =
					self.dispatch(&request).await?.error_for_status()?.json()?;

				self.session.store_access(issued.access.clone()).await?;

				if let Some(rotated) = issued.refresh {
					self.session.store_refresh(rotated).await?;
				}

				Ok(issued.access)
			})
			.await;

		match &result {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_call_outcome(KIND, CallOutcome::Success);
			},
			Err(_) => {
				self.refresh_metrics.record_failure();
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}

	/// Obtains a usable access token after a request was rejected with `401`.
	///
	/// `stale` is the session token the rejected request carried; `None` when the caller supplied
	/// the bearer, in which case the stored token is never reused and a refresh always runs.
	pub(crate) async fn refresh_after_rejection(
		&self,
		stale: Option<&TokenSecret>,
	) -> Result<TokenSecret> {
		if !self.config.coalesce_refresh {
			return self.refresh_access_token().await;
		}

		let _inflight = self.refresh_guard.lock().await;
		let Some(stale) = stale else {
			return self.refresh_access_token().await;
		};

		match self.session.access_token().await? {
			Some(current) if current != *stale => {
				self.refresh_metrics.record_coalesced();

				Ok(current)
			},
			_ => self.refresh_access_token().await,
		}
	}
}
