//! Wire payloads exchanged with the login and refresh endpoints.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Body posted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
	/// Account username.
	pub username: &'a str,
	/// Account password; never logged.
	pub password: &'a str,
}
impl Debug for LoginRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Access/refresh pair issued by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived access credential.
	pub access: TokenSecret,
	/// Longer-lived refresh credential.
	pub refresh: TokenSecret,
}

/// Body posted to the refresh endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshRequest<'a> {
	/// Stored refresh credential.
	pub refresh: &'a str,
}

/// Response returned by the refresh endpoint.
///
/// Backends that rotate refresh tokens may include a new `refresh` value; it is stored when
/// present and ignored otherwise.
#[derive(Clone, Debug, Deserialize)]
pub struct RefreshResponse {
	/// Replacement access credential.
	pub access: TokenSecret,
	/// Rotated refresh credential, if the backend issued one.
	#[serde(default)]
	pub refresh: Option<TokenSecret>,
}
