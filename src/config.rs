//! Client configuration: backend location, auth endpoints, timeouts, and protected paths.

// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "NEWSROOM_API_URL";
/// Base URL used when [`BASE_URL_ENV`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";

/// Settings shared by every request the client issues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Backend base URL; always ends with `/`.
	pub base_url: Url,
	/// Login endpoint path, relative to the base URL.
	pub login_path: String,
	/// Refresh endpoint path, relative to the base URL.
	pub refresh_path: String,
	/// Default timeout applied to requests that do not carry their own.
	pub request_timeout: Option<Duration>,
	/// Upper bound on a refresh call before the retry-or-fail decision.
	pub refresh_timeout: Duration,
	/// Path prefixes that receive the bearer credential; empty means every path.
	pub protected_prefixes: Vec<String>,
	/// Serializes concurrent 401-triggered refreshes behind one in-flight call.
	pub coalesce_refresh: bool,
}
impl ClientConfig {
	const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::seconds(10);

	/// Creates a configuration for the provided base URL with default endpoints.
	pub fn new(base_url: &str) -> Result<Self> {
		Ok(Self {
			base_url: normalize_base_url(base_url)?,
			login_path: "token/".into(),
			refresh_path: "token/refresh/".into(),
			request_timeout: None,
			refresh_timeout: Self::DEFAULT_REFRESH_TIMEOUT,
			protected_prefixes: Vec::new(),
			coalesce_refresh: true,
		})
	}

	/// Reads [`BASE_URL_ENV`] (honoring a `.env` file) and falls back to [`DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self> {
		match dotenvy::var(BASE_URL_ENV) {
			Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
			_ => Self::new(DEFAULT_BASE_URL),
		}
	}

	/// Overrides the login endpoint path.
	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Sets the default request timeout.
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(clamp(timeout));

		self
	}

	/// Sets the refresh call timeout (defaults to 10 seconds).
	pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
		self.refresh_timeout = clamp(timeout);

		self
	}

	/// Restricts bearer attachment to paths starting with one of `prefixes`.
	pub fn with_protected_prefixes<I, S>(mut self, prefixes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.protected_prefixes =
			prefixes.into_iter().map(|p| trim_path(p.as_ref()).to_owned()).collect();

		self
	}

	/// Toggles refresh coalescing.
	pub fn with_coalesced_refresh(mut self, enabled: bool) -> Self {
		self.coalesce_refresh = enabled;

		self
	}

	/// Resolves `path` against the base URL. A leading `/` is ignored so `"/articles/"` and
	/// `"articles/"` address the same resource.
	pub fn endpoint(&self, path: &str) -> Result<Url> {
		self.base_url.join(trim_path(path)).map_err(|source| {
			ConfigError::InvalidPath { path: path.to_owned(), source }.into()
		})
	}

	/// Returns `true` when requests to `path` should carry the bearer credential.
	pub fn is_protected(&self, path: &str) -> bool {
		if self.protected_prefixes.is_empty() {
			return true;
		}

		let path = trim_path(path);

		self.protected_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
	}

	/// Returns `true` for the login and refresh endpoints, which never carry a bearer.
	pub fn is_auth_endpoint(&self, path: &str) -> bool {
		let path = trim_path(path);

		path == trim_path(&self.login_path) || path == trim_path(&self.refresh_path)
	}
}

fn normalize_base_url(raw: &str) -> Result<Url> {
	let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
		value: raw.to_owned(),
		source: Some(source),
	})?;

	if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::InvalidBaseUrl { value: raw.to_owned(), source: None }.into());
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url.set_query(None);
	url.set_fragment(None);

	Ok(url)
}

fn trim_path(path: &str) -> &str {
	path.trim_start_matches('/')
}

fn clamp(timeout: Duration) -> Duration {
	if timeout.is_negative() { Duration::ZERO } else { timeout }
}
