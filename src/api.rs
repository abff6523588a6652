//! Typed endpoints for the blog backend.
//!
//! Every helper routes through [`ApiClient::send`](crate::ApiClient::send), so bearer
//! attachment and the single refresh-and-retry apply uniformly. Admin mutations rely on the
//! stored session; public reads work without one.

pub mod accounts;
pub mod articles;
pub mod categories;
pub mod media;
pub mod newsletter;

pub use accounts::*;
pub use articles::*;
pub use categories::*;
pub use media::*;
pub use newsletter::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Backend record identifier; the API returns both numeric and string ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
	/// Numeric primary key.
	Number(i64),
	/// Opaque string key.
	Text(String),
}
impl Display for ResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Number(value) => write!(f, "{value}"),
			Self::Text(value) => f.write_str(value),
		}
	}
}
impl ResourceId {
	/// Renders the id as a single URL path segment.
	pub(crate) fn to_segment(&self) -> Result<String> {
		match self {
			Self::Number(value) => Ok(value.to_string()),
			Self::Text(value) => segment("id", value).map(ToOwned::to_owned),
		}
	}
}
impl From<i64> for ResourceId {
	fn from(value: i64) -> Self {
		Self::Number(value)
	}
}
impl From<&str> for ResourceId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for ResourceId {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

/// Rejects blank required fields before a request is sent.
pub(crate) fn require(field: &str, value: Option<&str>) -> Result<()> {
	match value {
		Some(v) if !v.trim().is_empty() => Ok(()),
		_ => Err(ConfigError::invalid_input(format!("`{field}` is required")).into()),
	}
}

/// Validates a value interpolated into a single path segment.
///
/// Separators, dot segments, query and fragment markers, and percent escapes are refused so the
/// value can never address another resource.
pub(crate) fn segment<'a>(field: &str, value: &'a str) -> Result<&'a str> {
	let value = value.trim();

	require(field, Some(value))?;

	if value == "." || value == ".." || value.contains(['/', '\\', '?', '#', '%']) {
		return Err(ConfigError::invalid_input(format!(
			"`{field}` must be a single path segment"
		))
		.into());
	}

	Ok(value)
}
