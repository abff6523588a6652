//! Newsletter signup, opt-out, and admin broadcast.

// self
use crate::{
	_prelude::*,
	api::{ResourceId, require},
	client::ApiClient,
	http::{ApiRequest, HttpTransport},
};

/// Subscription state of a mailing-list entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
	/// Receives newsletters.
	Active,
	/// Opted out.
	Unsubscribed,
	/// Any state this client does not know about.
	#[serde(other)]
	Unknown,
}

/// Mailing-list entry visible to admins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
	/// Primary key.
	pub id: ResourceId,
	/// Subscriber address.
	pub email: String,
	/// Subscription state.
	pub status: SubscriberStatus,
	/// ISO-8601 subscription timestamp.
	#[serde(default)]
	pub subscription_date: Option<String>,
	/// ISO-8601 creation timestamp.
	#[serde(default)]
	pub created_at: Option<String>,
}
impl Subscriber {
	/// Returns `true` when the entry still receives newsletters.
	pub fn is_active(&self) -> bool {
		self.status == SubscriberStatus::Active
	}
}

/// Acknowledgement returned by the signup endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SubscribeReceipt {
	/// Backend confirmation message, when provided.
	#[serde(default)]
	pub message: Option<String>,
}

/// How an opt-out request identifies the subscriber.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unsubscribe {
	/// One-click token from a newsletter link.
	Token(String),
	/// Manual opt-out by address.
	Email(String),
}
impl Unsubscribe {
	fn value(&self) -> &str {
		match self {
			Self::Token(value) | Self::Email(value) => value,
		}
	}
}

#[derive(Serialize)]
struct SubscribeBody<'a> {
	email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BroadcastBody<'a> {
	subject: &'a str,
	content: &'a str,
	recipient_type: &'static str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Adds `email` to the mailing list.
	pub async fn subscribe(&self, email: &str) -> Result<SubscribeReceipt> {
		require("email", Some(email))?;

		let response = self
			.send(ApiRequest::post("newsletter/subscribe/").with_json(&SubscribeBody { email })?)
			.await?;

		if response.body.is_empty() {
			return Ok(SubscribeReceipt::default());
		}

		response.json()
	}

	/// Removes a subscriber by token or by address.
	pub async fn unsubscribe(&self, who: Unsubscribe) -> Result<()> {
		require(
			match who {
				Unsubscribe::Token(_) => "token",
				Unsubscribe::Email(_) => "email",
			},
			Some(who.value()),
		)?;

		self.send(ApiRequest::post("newsletter/unsubscribe/").with_json(&who)?).await.map(|_| ())
	}

	/// Lists every mailing-list entry.
	pub async fn subscribers(&self) -> Result<Vec<Subscriber>> {
		self.get_json("newsletter/subscribers/").await
	}

	/// Sends a newsletter to every active subscriber.
	pub async fn send_newsletter(&self, subject: &str, content: &str) -> Result<()> {
		require("subject", Some(subject))?;
		require("content", Some(content))?;

		let body = BroadcastBody { subject, content, recipient_type: "active" };

		self.send(ApiRequest::post("newsletter/send-newsletter/").with_json(&body)?)
			.await
			.map(|_| ())
	}
}
