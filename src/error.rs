//! Client-level error types shared across the session, transport, and endpoint layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Largest response body preview kept inside [`StatusError`] display strings.
const BODY_PREVIEW_LEN: usize = 500;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::session::StoreError,
	),
	/// Local configuration or input problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No response was received from the backend (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend answered with a non-success status.
	#[error(transparent)]
	Status(#[from] StatusError),
	/// Backend refused the submitted login credentials.
	#[error("Login was rejected with HTTP {}.", .0.status)]
	LoginRejected(#[source] StatusError),
	/// Backend answered with a success status but the body did not match the expected shape.
	#[error("Response body for HTTP {status} could not be decoded.")]
	Decode {
		/// Structured parsing failure, including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl Error {
	/// HTTP status code carried by the error, when the backend answered.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status(err) | Self::LoginRejected(err) => Some(err.status),
			Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns `true` when the caller should treat the error as "session expired" and send the
	/// user back through login.
	///
	/// Only credentialed requests qualify: a rejected login is [`Error::LoginRejected`] and never
	/// counts as an expired session.
	pub fn is_session_expired(&self) -> bool {
		match self {
			Self::Config(ConfigError::MissingRefreshToken) => true,
			Self::Status(err) => err.status == 401,
			_ => false,
		}
	}
}

/// Configuration and local validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed or cannot carry relative paths.
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Raw configured value.
		value: String,
		/// Underlying parsing failure, if any.
		#[source]
		source: Option<url::ParseError>,
	},
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` cannot be joined onto the base URL.")]
	InvalidPath {
		/// Offending request path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be encoded.")]
	RequestEncode(#[source] serde_json::Error),
	/// Multipart part carries an invalid MIME type.
	#[error("MIME type `{mime}` is invalid.")]
	InvalidMime {
		/// Offending MIME string.
		mime: String,
	},
	/// Session holds no refresh credential, so no refresh can be attempted.
	#[error("Session is missing a refresh token.")]
	MissingRefreshToken,
	/// Caller-supplied input was rejected before any request was sent.
	#[error("Invalid input: {reason}.")]
	InvalidInput {
		/// Human-readable explanation.
		reason: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Shorthand for [`ConfigError::InvalidInput`].
	pub fn invalid_input(reason: impl Into<String>) -> Self {
		Self::InvalidInput { reason: reason.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures where no HTTP response was received.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-success HTTP response passed through for the caller to interpret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusError {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body, decoded lossily as UTF-8.
	pub body: String,
	/// Retry-After hint, when the backend supplied one.
	pub retry_after: Option<Duration>,
}
impl StatusError {
	/// Returns `true` for `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Extracts the backend's `{"detail": "..."}` message, if the body carries one.
	pub fn detail(&self) -> Option<String> {
		#[derive(Deserialize)]
		struct Detail {
			detail: String,
		}

		serde_json::from_str::<Detail>(&self.body).ok().map(|d| d.detail)
	}

	fn preview(&self) -> String {
		if let Some(detail) = self.detail() {
			return detail;
		}
		if self.body.is_empty() {
			return "<empty body>".into();
		}
		if self.body.len() <= BODY_PREVIEW_LEN {
			return self.body.clone();
		}

		let mut end = BODY_PREVIEW_LEN;

		while !self.body.is_char_boundary(end) {
			end -= 1;
		}

		format!("{}... ({} bytes total)", &self.body[..end], self.body.len())
	}
}
impl Display for StatusError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Backend returned HTTP {}: {}", self.status, self.preview())
	}
}
impl StdError for StatusError {}
