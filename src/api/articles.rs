//! Article reads for the public site and CRUD for the admin console.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	api::{ResourceId, require},
	client::ApiClient,
	error::ConfigError,
	http::{ApiRequest, HttpTransport},
};

/// Publication state of an article.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
	/// Not visible on the public site.
	#[default]
	Draft,
	/// Visible on the public site.
	Published,
}

/// Embedded author profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Portrait URL.
	#[serde(default)]
	pub image_url: Option<String>,
	/// Short biography.
	#[serde(default)]
	pub bio: Option<String>,
}

/// Tags are sent either as a comma-separated string or a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tags {
	/// List form.
	List(Vec<String>),
	/// Comma-separated form.
	Joined(String),
}
impl Tags {
	/// Normalizes both forms into trimmed, non-empty tags.
	pub fn to_vec(&self) -> Vec<String> {
		let raw: Vec<&str> = match self {
			Self::List(items) => items.iter().map(String::as_str).collect(),
			Self::Joined(joined) => joined.split(',').collect(),
		};

		raw.into_iter().map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned).collect()
	}
}

/// Article as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
	/// Primary key.
	pub id: i64,
	/// Headline.
	pub title: String,
	/// Teaser text.
	#[serde(default)]
	pub excerpt: String,
	/// Category name or slug.
	#[serde(default)]
	pub category: String,
	/// Cover image URL.
	#[serde(default)]
	pub image_url: Option<String>,
	/// Author display name.
	#[serde(default)]
	pub author_name: Option<String>,
	/// Embedded author profile.
	#[serde(default)]
	pub author: Option<Author>,
	/// Author foreign key.
	#[serde(default)]
	pub author_id: Option<i64>,
	/// Author portrait URL (flattened form).
	#[serde(default)]
	pub author_image_url: Option<String>,
	/// Author biography (flattened form).
	#[serde(default)]
	pub author_bio: Option<String>,
	/// ISO-8601 publication timestamp.
	#[serde(default)]
	pub published_date: Option<String>,
	/// HTML body.
	#[serde(default)]
	pub content: String,
	/// Publication state.
	#[serde(default)]
	pub status: ArticleStatus,
	/// ISO-8601 creation timestamp.
	#[serde(default)]
	pub created_at: Option<String>,
	/// ISO-8601 last-modified timestamp.
	#[serde(default)]
	pub last_updated: Option<String>,
	/// Whether the backend refreshes the article automatically.
	#[serde(default)]
	pub is_auto_update: bool,
	/// Shown in the editor's picks rail.
	#[serde(default)]
	pub is_editors_pick: bool,
	/// Shown in the featured slot.
	#[serde(default)]
	pub is_featured: bool,
	/// Free-form tags.
	#[serde(default)]
	pub tags: Option<Tags>,
}
impl Article {
	/// Cover image: the explicit `image_url`, else the first `<img src>` in the body.
	pub fn cover_image(&self) -> Option<&str> {
		self.image_url
			.as_deref()
			.filter(|url| !url.trim().is_empty())
			.or_else(|| first_image_src(&self.content))
	}
}

/// Writable article fields for create and update calls. Unset fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArticleDraft {
	/// Headline.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Teaser text.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub excerpt: Option<String>,
	/// Category name or slug.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	/// Cover image URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	/// Author display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	/// HTML body.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	/// Publication state.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<ArticleStatus>,
	/// Auto-update flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_auto_update: Option<bool>,
	/// Featured flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_featured: Option<bool>,
	/// Editor's pick flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_editors_pick: Option<bool>,
	/// Free-form tags.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tags: Option<Tags>,
	/// Publication timestamp; stamped on create.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub published_date: Option<String>,
	/// Creation timestamp; stamped on create.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	/// Last-modified timestamp; stamped on create and update.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_updated: Option<String>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists every article.
	pub async fn articles(&self) -> Result<Vec<Article>> {
		self.get_json("articles/").await
	}

	/// Fetches a single article.
	pub async fn article(&self, id: i64) -> Result<Article> {
		self.get_json(format!("articles/{id}/")).await
	}

	/// Most recent articles.
	pub async fn latest_articles(&self) -> Result<Vec<Article>> {
		self.get_json("articles/latest/").await
	}

	/// Articles flagged for the featured slot.
	pub async fn featured_articles(&self) -> Result<Vec<Article>> {
		self.get_json("articles/featured/").await
	}

	/// Trending articles for the sidebar.
	pub async fn trending_articles(&self) -> Result<Vec<Article>> {
		self.get_json("articles/trending/").await
	}

	/// Editor's picks.
	pub async fn editors_picks(&self) -> Result<Vec<Article>> {
		self.get_json("articles/editors-picks/").await
	}

	/// Articles the backend relates to `id`.
	pub async fn related_articles(&self, id: i64) -> Result<Vec<Article>> {
		self.get_json(format!("articles/{id}/related/")).await
	}

	/// Articles filtered by category.
	pub async fn articles_in_category(&self, category: &str) -> Result<Vec<Article>> {
		self.send(ApiRequest::get("articles/").with_query("category", category)).await?.json()
	}

	/// Full-text search; a blank query returns no results without calling the backend.
	pub async fn search_articles(&self, query: &str) -> Result<Vec<Article>> {
		let query = query.trim();

		if query.is_empty() {
			return Ok(Vec::new());
		}

		self.send(ApiRequest::get("articles/search/").with_query("query", query)).await?.json()
	}

	/// Creates an article, stamping publication, creation, and modification times.
	pub async fn create_article(&self, mut draft: ArticleDraft) -> Result<Article> {
		require("title", draft.title.as_deref())?;
		require("category", draft.category.as_deref())?;
		require("author", draft.author.as_deref())?;

		let now = now_rfc3339()?;

		draft.published_date = Some(now.clone());
		draft.created_at = Some(now.clone());
		draft.last_updated = Some(now);

		self.post_json("articles/", &draft).await
	}

	/// Replaces an article, stamping the modification time.
	pub async fn update_article(&self, id: i64, mut draft: ArticleDraft) -> Result<Article> {
		draft.last_updated = Some(now_rfc3339()?);

		self.put_json(format!("articles/{id}/"), &draft).await
	}

	/// Deletes an article.
	pub async fn delete_article(&self, id: impl Into<ResourceId>) -> Result<()> {
		let id = id.into().to_segment()?;

		self.delete(format!("articles/{id}/")).await
	}
}

fn now_rfc3339() -> Result<String> {
	OffsetDateTime::now_utc()
		.format(&Rfc3339)
		.map_err(|e| {
			ConfigError::invalid_input(format!("timestamp formatting failed: {e}")).into()
		})
}

fn first_image_src(html: &str) -> Option<&str> {
	let tag_start = html.find("<img")?;
	let tag = &html[tag_start..];
	let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
	let attr = tag.find("src=")?;
	let rest = &tag[attr + 4..];
	let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
	let value = &rest[1..];
	let end = value.find(quote)?;

	Some(&value[..end]).filter(|src| !src.is_empty())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn article_with(image_url: Option<&str>, content: &str) -> Article {
		serde_json::from_value(serde_json::json!({
			"id": 1,
			"title": "ETH upgrade lands",
			"image_url": image_url,
			"content": content,
		}))
		.expect("Minimal article fixture should deserialize.")
	}

	#[test]
	fn minimal_article_uses_defaults() {
		let article = article_with(None, "");

		assert_eq!(article.status, ArticleStatus::Draft);
		assert!(!article.is_featured);
		assert!(article.tags.is_none());
	}

	#[test]
	fn cover_image_falls_back_to_first_inline_image() {
		let explicit = article_with(Some("https://cdn.example.com/cover.png"), "");
		let inline = article_with(
			Some(""),
			r#"<p>Intro</p><img alt="chart" src="https://cdn.example.com/chart.png"><img src='x'>"#,
		);
		let none = article_with(None, "<p>No images.</p>");

		assert_eq!(explicit.cover_image(), Some("https://cdn.example.com/cover.png"));
		assert_eq!(inline.cover_image(), Some("https://cdn.example.com/chart.png"));
		assert_eq!(none.cover_image(), None);
	}

	#[test]
	fn tags_normalize_both_wire_forms() {
		let joined: Tags = serde_json::from_str("\"btc, defi ,,etf\"").expect("Joined tags parse.");
		let list: Tags = serde_json::from_str("[\"btc\",\" defi\"]").expect("Tag list parses.");

		assert_eq!(joined.to_vec(), vec!["btc", "defi", "etf"]);
		assert_eq!(list.to_vec(), vec!["btc", "defi"]);
	}

	#[test]
	fn draft_omits_unset_fields() {
		let draft = ArticleDraft {
			title: Some("Title".into()),
			status: Some(ArticleStatus::Published),
			..Default::default()
		};
		let value = serde_json::to_value(&draft).expect("Draft should serialize.");

		assert_eq!(value, serde_json::json!({ "title": "Title", "status": "published" }));
	}
}
