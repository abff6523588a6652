//! Username/password login and logout.

// self
use crate::{
	_prelude::*,
	auth::{LoginRequest, TokenPair},
	client::ApiClient,
	http::{ApiRequest, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges credentials for an access/refresh pair and stores both.
	///
	/// Nothing is stored when the backend rejects the login with `400` or `401`; the returned
	/// [`Error::LoginRejected`] carries the backend's `detail` message when present.
	pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
		const KIND: CallKind = CallKind::Login;

		let span = CallSpan::new(KIND, "login");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self.with_defaults(
					ApiRequest::post(self.config.login_path.clone())
						.with_json(&LoginRequest { username, password })?,
				);
				let pair: TokenPair = self
					.dispatch(&request)
					.await?
					.error_for_status()
					.map_err(|err| match err {
						Error::Status(status) if matches!(status.status, 400 | 401) => {
							Error::LoginRejected(status)
						},
						other => other,
					})?
					.json()?;

				self.session.store_pair(&pair).await?;

				Ok(pair)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Removes both stored credentials.
	pub async fn logout(&self) -> Result<()> {
		obs::record_call_outcome(CallKind::Logout, CallOutcome::Attempt);

		let result = self.session.clear().await;

		match &result {
			Ok(_) => obs::record_call_outcome(CallKind::Logout, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(CallKind::Logout, CallOutcome::Failure),
		}

		result
	}

	/// Returns `true` when an access token is stored (route guard check).
	pub async fn is_authenticated(&self) -> Result<bool> {
		self.session.is_authenticated().await
	}
}
