//! The authenticated API client shared by every consumer of the backend.
//!
//! [`ApiClient::send`] attaches the session's access token to protected requests and, when a
//! credentialed request comes back `401`, refreshes the access token and reissues the request
//! exactly once. The request's [`RetryState`] flips to `Retried` before the retry is sent, so a
//! second `401` is returned to the caller instead of starting another refresh.

mod login;
mod metrics;
mod refresh;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ClientConfig,
	http::{ApiRequest, ApiResponse, HttpTransport, RetryState},
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::Session,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Authenticated client for the backend REST API.
///
/// Cloning is cheap; clones share the transport, session, refresh guard, and metrics.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Base URL, endpoints, and timeouts.
	pub config: Arc<ClientConfig>,
	/// Credential owner consulted on every request.
	pub session: Session,
	refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client around a caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		session: Session,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			config: Arc::new(config),
			session,
			refresh_metrics: Default::default(),
			refresh_guard: Arc::new(AsyncMutex::new(())),
		}
	}

	/// Counters describing refresh activity since the client was built.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.refresh_metrics
	}

	/// Sends `request`, attaching the stored bearer and retrying once after a refresh on `401`.
	///
	/// Non-success statuses surface as [`Error::Status`]. When the refresh itself fails, the
	/// original `401` is returned.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "send");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.send_with_refresh(request)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Issues a `GET` and decodes the JSON body.
	pub async fn get_json<R>(&self, path: impl Into<String>) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.send(ApiRequest::get(path)).await?.json()
	}

	/// Issues a `POST` with a JSON body and decodes the JSON response.
	pub async fn post_json<B, R>(&self, path: impl Into<String>, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.send(ApiRequest::post(path).with_json(body)?).await?.json()
	}

	/// Issues a `PUT` with a JSON body and decodes the JSON response.
	pub async fn put_json<B, R>(&self, path: impl Into<String>, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.send(ApiRequest::put(path).with_json(body)?).await?.json()
	}

	/// Issues a `DELETE`, discarding any response body.
	pub async fn delete(&self, path: impl Into<String>) -> Result<()> {
		self.send(ApiRequest::delete(path)).await.map(|_| ())
	}

	async fn send_with_refresh(&self, request: ApiRequest) -> Result<ApiResponse> {
		let mut request = self.with_defaults(request);
		let attached = self.attach_bearer(&mut request).await?;
		let response = self.dispatch(&request).await?;
		let Some(attached) = attached else {
			return response.error_for_status();
		};

		if !response.is_unauthorized() || !request.retry.is_fresh() {
			return response.error_for_status();
		}

		request.retry = RetryState::Retried;

		let fresh = match self.refresh_after_rejection(attached.stored()).await {
			Ok(token) => token,
			Err(err) => {
				obs::warn_refresh_failed(&request.path, &err);

				return response.error_for_status();
			},
		};

		request.bearer = Some(fresh);
		self.refresh_metrics.record_retry();
		obs::debug_retrying(&request.path);

		self.dispatch(&request).await?.error_for_status()
	}

	/// Attaches the stored access token unless the caller already set one; reports which bearer
	/// the request carries.
	async fn attach_bearer(&self, request: &mut ApiRequest) -> Result<Option<AttachedBearer>> {
		if let Some(bearer) = &request.bearer {
			return Ok(Some(AttachedBearer::Caller(bearer.clone())));
		}
		if !self.config.is_protected(&request.path) || self.config.is_auth_endpoint(&request.path)
		{
			return Ok(None);
		}

		request.bearer = self.session.access_token().await?;

		Ok(request.bearer.clone().map(AttachedBearer::Session))
	}

	fn with_defaults(&self, mut request: ApiRequest) -> ApiRequest {
		if request.timeout.is_none() {
			request.timeout = self.config.request_timeout;
		}

		request
	}

	fn resolve(&self, request: &ApiRequest) -> Result<Url> {
		let mut url = self.config.endpoint(&request.path)?;

		if !request.query.is_empty() {
			url.query_pairs_mut().extend_pairs(request.query.iter());
		}

		Ok(url)
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
		let url = self.resolve(request)?;

		Ok(self.transport.execute(url, request).await?)
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, session: Session) -> Self {
		Self::with_transport(config, session, ReqwestTransport::default())
	}

	/// Builds a client from [`ClientConfig::from_env`] with an in-memory session.
	pub fn from_env() -> Result<Self> {
		Ok(Self::new(ClientConfig::from_env()?, Session::in_memory()))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			session: self.session.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("coalesce_refresh", &self.config.coalesce_refresh)
			.field("refresh_metrics", &self.refresh_metrics)
			.finish()
	}
}

/// Origin of the bearer a request was sent with.
enum AttachedBearer {
	/// Read from the session just before dispatch.
	Session(TokenSecret),
	/// Set on the request by the caller.
	Caller(TokenSecret),
}
impl AttachedBearer {
	fn stored(&self) -> Option<&TokenSecret> {
		match self {
			Self::Session(token) => Some(token),
			Self::Caller(_) => None,
		}
	}
}
