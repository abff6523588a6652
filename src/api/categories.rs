//! Category listing and admin management.

// self
use crate::{
	_prelude::*,
	api::{Article, ResourceId, require, segment},
	client::ApiClient,
	http::HttpTransport,
};

/// Article category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
	/// Primary key.
	pub id: ResourceId,
	/// Display name.
	pub name: String,
	/// URL slug.
	pub slug: String,
	/// Number of articles in the category.
	#[serde(default)]
	pub count: u64,
	/// ISO-8601 creation timestamp.
	#[serde(default)]
	pub created_at: Option<String>,
}

#[derive(Serialize)]
struct CategoryBody<'a> {
	name: &'a str,
	slug: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	count: Option<u64>,
}
impl<'a> CategoryBody<'a> {
	fn new(name: &'a str, slug: Option<&str>) -> Result<Self> {
		require("name", Some(name))?;

		let slug = match slug.map(str::trim) {
			Some(slug) if !slug.is_empty() => slug.to_owned(),
			_ => slugify(name),
		};

		Ok(Self { name, slug, count: None })
	}
}

/// Lowercases `name` and replaces each whitespace run with `-`.
pub fn slugify(name: &str) -> String {
	let mut slug = String::with_capacity(name.len());
	let mut in_whitespace = false;

	for c in name.chars() {
		if c.is_whitespace() {
			if !in_whitespace {
				slug.push('-');
			}

			in_whitespace = true;
		} else {
			slug.extend(c.to_lowercase());

			in_whitespace = false;
		}
	}

	slug
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists every category.
	pub async fn categories(&self) -> Result<Vec<Category>> {
		self.get_json("categories/").await
	}

	/// Articles filed under the category with `slug`.
	pub async fn category_articles(&self, slug: &str) -> Result<Vec<Article>> {
		let slug = segment("slug", slug)?;

		self.get_json(format!("categories/{slug}/")).await
	}

	/// Creates a category with an empty article count, deriving the slug from `name` when
	/// `slug` is absent or blank.
	pub async fn create_category(&self, name: &str, slug: Option<&str>) -> Result<Category> {
		let body = CategoryBody { count: Some(0), ..CategoryBody::new(name, slug)? };

		self.post_json("categories/", &body).await
	}

	/// Renames a category; the slug follows the same derivation as [`Self::create_category`].
	pub async fn update_category(
		&self,
		id: impl Into<ResourceId>,
		name: &str,
		slug: Option<&str>,
	) -> Result<Category> {
		let id = id.into().to_segment()?;
		let body = CategoryBody::new(name, slug)?;

		self.put_json(format!("categories/{id}/"), &body).await
	}

	/// Deletes a category.
	pub async fn delete_category(&self, id: impl Into<ResourceId>) -> Result<()> {
		let id = id.into().to_segment()?;

		self.delete(format!("categories/{id}/")).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn slugify_collapses_whitespace_runs() {
		assert_eq!(slugify("DeFi  News"), "defi-news");
		assert_eq!(slugify("Layer 2\tScaling"), "layer-2-scaling");
		assert_eq!(slugify("Bitcoin"), "bitcoin");
	}

	#[test]
	fn explicit_slug_wins_over_generated_one() {
		let derived = CategoryBody::new("Market Analysis", None).expect("Name is present.");
		let blank = CategoryBody::new("Market Analysis", Some("  ")).expect("Name is present.");
		let explicit =
			CategoryBody::new("Market Analysis", Some("markets")).expect("Name is present.");

		assert_eq!(derived.slug, "market-analysis");
		assert_eq!(blank.slug, "market-analysis");
		assert_eq!(explicit.slug, "markets");
	}

	#[test]
	fn blank_name_is_rejected() {
		assert!(matches!(
			CategoryBody::new(" ", None),
			Err(Error::Config(crate::error::ConfigError::InvalidInput { .. }))
		));
	}

	#[test]
	fn category_accepts_string_and_numeric_ids() {
		let category: Category =
			serde_json::from_str(r#"{"id":"3","name":"NFTs","slug":"nfts","count":12}"#)
				.expect("Category should deserialize.");

		assert_eq!(category.id, ResourceId::Text("3".into()));
		assert_eq!(category.count, 12);
	}
}
