//! Signed-in author profile.

// self
use crate::{
	_prelude::*,
	api::ResourceId,
	client::ApiClient,
	http::{ApiRequest, HttpTransport},
};

/// Profile of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Primary key.
	#[serde(default)]
	pub id: Option<ResourceId>,
	/// Login name.
	#[serde(default)]
	pub username: Option<String>,
	/// Display name used as the article byline.
	#[serde(default)]
	pub name: Option<String>,
	/// Short biography.
	#[serde(default)]
	pub bio: Option<String>,
	/// Portrait URL.
	#[serde(default)]
	pub image_url: Option<String>,
}
impl UserProfile {
	/// Byline for new articles: the display name, else the login name.
	pub fn byline(&self) -> Option<&str> {
		[self.name.as_deref(), self.username.as_deref()]
			.into_iter()
			.flatten()
			.find(|value| !value.trim().is_empty())
	}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileBody<'a> {
	bio: &'a str,
	image_url: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Fetches the signed-in user's profile.
	pub async fn current_user(&self) -> Result<UserProfile> {
		self.get_json("accounts/users/me/").await
	}

	/// Replaces the signed-in user's biography and portrait URL.
	pub async fn update_profile(&self, bio: &str, image_url: &str) -> Result<()> {
		self.send(ApiRequest::put("accounts/profile/").with_json(&ProfileBody { bio, image_url })?)
			.await
			.map(|_| ())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn profile_body_matches_backend_field_names() {
		let body =
			ProfileBody { bio: "Writes about L2s.", image_url: "https://cdn.example.com/a.png" };

		assert_eq!(
			serde_json::to_value(&body).expect("Profile body encodes."),
			serde_json::json!({
				"bio": "Writes about L2s.",
				"imageUrl": "https://cdn.example.com/a.png",
			}),
		);
	}

	#[test]
	fn byline_prefers_display_name() {
		let named = UserProfile {
			name: Some("Ada".into()),
			username: Some("ada".into()),
			..Default::default()
		};
		let unnamed = UserProfile {
			name: Some(" ".into()),
			username: Some("ada".into()),
			..Default::default()
		};

		assert_eq!(named.byline(), Some("Ada"));
		assert_eq!(unnamed.byline(), Some("ada"));
		assert_eq!(UserProfile::default().byline(), None);
	}
}
