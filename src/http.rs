//! Transport primitives for backend calls.
//!
//! [`ApiRequest`] describes one logical call (method, relative path, body, bearer, retry tag) and
//! is kept fully owned and re-sendable so the client can reissue it after a token refresh.
//! [`HttpTransport`] is the client's only dependency on an HTTP stack: it turns a request into an
//! [`ApiResponse`] and reports a [`TransportError`] only when no response was received at all.
//! Non-success statuses are ordinary responses at this layer.

// std
use std::time::Duration as StdDuration;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, StatusError, TransportError},
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing backend calls.
///
/// Implementations must attach [`ApiRequest::bearer`] as an `Authorization: Bearer` header when
/// present, honor [`ApiRequest::timeout`], and return every received response regardless of
/// status.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` to the fully resolved `url`.
	fn execute<'a>(&'a self, url: Url, request: &'a ApiRequest) -> TransportFuture<'a>;
}

/// HTTP verbs used by the backend API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
}
impl Method {
	/// Returns the canonical upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}

	#[cfg(feature = "reqwest")]
	fn to_reqwest(self) -> reqwest::Method {
		match self {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Retry tag carried by every request; a request is retried at most once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RetryState {
	/// Never retried.
	#[default]
	Fresh,
	/// Already reissued after a credential refresh.
	Retried,
}
impl RetryState {
	/// Returns `true` while the request is still eligible for a retry.
	pub const fn is_fresh(self) -> bool {
		matches!(self, RetryState::Fresh)
	}
}

/// Single file uploaded as a multipart form part.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
	/// Form field name.
	pub field: String,
	/// File name reported to the backend.
	pub file_name: String,
	/// MIME type of the payload.
	pub mime: String,
	/// Raw file bytes.
	pub bytes: Vec<u8>,
}
impl FilePart {
	/// Builds a part after validating the MIME type shape (`type/subtype`).
	pub fn new(
		field: impl Into<String>,
		file_name: impl Into<String>,
		mime: impl Into<String>,
		bytes: impl Into<Vec<u8>>,
	) -> Result<Self> {
		let mime = mime.into();
		let valid = mime
			.split_once('/')
			.is_some_and(|(kind, sub)| {
				!kind.is_empty() && !sub.is_empty() && !mime.contains(char::is_whitespace)
			});

		if !valid {
			return Err(ConfigError::InvalidMime { mime }.into());
		}

		Ok(Self { field: field.into(), file_name: file_name.into(), mime, bytes: bytes.into() })
	}
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("field", &self.field)
			.field("file_name", &self.file_name)
			.field("mime", &self.mime)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// Request payload; owned so the request can be sent twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// Pre-encoded JSON document.
	Json(Vec<u8>),
	/// Multipart form with a single file part.
	Multipart(FilePart),
}

/// One logical backend call.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Path relative to the configured base URL.
	pub path: String,
	/// Query parameters appended in order.
	pub query: Vec<(String, String)>,
	/// Request payload.
	pub body: RequestBody,
	/// Bearer credential attached by the client.
	pub bearer: Option<TokenSecret>,
	/// Per-request timeout; `None` falls back to the transport default.
	pub timeout: Option<Duration>,
	/// Retry tag maintained by the client.
	pub retry: RetryState,
}
impl ApiRequest {
	/// Creates a fresh request without body, bearer, or timeout.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			body: RequestBody::Empty,
			bearer: None,
			timeout: None,
			retry: RetryState::Fresh,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Encodes `body` as the JSON payload.
	pub fn with_json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let encoded = serde_json::to_vec(body).map_err(ConfigError::RequestEncode)?;

		self.body = RequestBody::Json(encoded);

		Ok(self)
	}

	/// Appends a query parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Sends `part` as a multipart form.
	pub fn with_multipart(mut self, part: FilePart) -> Self {
		self.body = RequestBody::Multipart(part);

		self
	}

	/// Overrides the request timeout; negative durations are clamped to zero.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(if timeout.is_negative() { Duration::ZERO } else { timeout });

		self
	}

	/// Converts the timeout into the std representation used by transports.
	pub fn std_timeout(&self) -> Option<StdDuration> {
		self.timeout.and_then(|t| StdDuration::try_from(t).ok())
	}
}

/// Response received from the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response from its parts.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, retry_after: None, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` for `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Body decoded lossily as UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing field path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { source, status: self.status })
	}

	/// Passes 2xx responses through and turns every other status into [`StatusError`].
	pub fn error_for_status(self) -> Result<Self> {
		if self.is_success() {
			return Ok(self);
		}

		Err(self.into_status_error().into())
	}

	/// Converts the response into a [`StatusError`] regardless of its status.
	pub fn into_status_error(self) -> StatusError {
		StatusError {
			status: self.status,
			body: String::from_utf8_lossy(&self.body).into_owned(),
			retry_after: self.retry_after,
		}
	}
}

/// [`HttpTransport`] backed by a shared [`ReqwestClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute<'a>(&'a self, url: Url, request: &'a ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut builder = self
				.0
				.request(request.method.to_reqwest(), url)
				.header(ACCEPT, "application/json");

			if let Some(secret) = &request.bearer {
				builder = builder.bearer_auth(secret.expose());
			}
			if let Some(timeout) = request.std_timeout() {
				builder = builder.timeout(timeout);
			}

			builder = match &request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(bytes) =>
					builder.header(CONTENT_TYPE, "application/json").body(bytes.clone()),
				RequestBody::Multipart(part) => {
					let file = reqwest::multipart::Part::bytes(part.bytes.clone())
						.file_name(part.file_name.clone())
						.mime_str(&part.mime)?;

					let form = reqwest::multipart::Form::new().part(part.field.clone(), file);

					builder.multipart(form)
				},
			};

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, retry_after, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
