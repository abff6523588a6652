#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::{ARTICLE_JSON, seeded_client};
use newsroom_client::{
	api::{ArticleDraft, ArticleStatus, SubscriberStatus, Unsubscribe},
	error::{ConfigError, Error},
};

fn is_invalid_input(err: &Error) -> bool {
	matches!(err, Error::Config(ConfigError::InvalidInput { .. }))
}

#[tokio::test]
async fn public_reads_decode_article_lists() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded_client(&server, None, None);
	let list_body = format!("[{ARTICLE_JSON}]");
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/articles/search/").query_param("query", "halving");
			then.status(200).header("content-type", "application/json").body(&list_body);
		})
		.await;
	let by_category = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/articles/").query_param("category", "markets");
			then.status(200).header("content-type", "application/json").body(&list_body);
		})
		.await;
	let related = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/articles/1/related/");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let found = client.search_articles("  halving ").await.expect("Search should succeed.");
	let filed =
		client.articles_in_category("markets").await.expect("Category filter should succeed.");
	let nearby = client.related_articles(1).await.expect("Related lookup should succeed.");

	search.assert_async().await;
	by_category.assert_async().await;
	related.assert_async().await;

	assert_eq!(found.len(), 1);
	assert_eq!(found[0].status, ArticleStatus::Published);
	assert_eq!(filed[0].category, "markets");
	assert!(nearby.is_empty());
}

#[tokio::test]
async fn blank_search_skips_the_backend() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded_client(&server, None, None);
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/articles/search/");
			then.status(200).body("[]");
		})
		.await;
	let found = client.search_articles("   ").await.expect("Blank search should succeed.");

	assert!(found.is_empty());

	search.assert_calls_async(0).await;
}

#[tokio::test]
async fn article_mutations_carry_bearer_and_validate_drafts() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded_client(&server, Some("access-1"), Some("refresh-1"));
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/articles/").header("authorization", "Bearer access-1");
			then.status(201).header("content-type", "application/json").body(ARTICLE_JSON);
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/articles/1/").header("authorization", "Bearer access-1");
			then.status(200).header("content-type", "application/json").body(ARTICLE_JSON);
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/articles/1/").header("authorization", "Bearer access-1");
			then.status(204);
		})
		.await;
	let incomplete = ArticleDraft { title: Some("No byline".into()), ..Default::default() };
	let err = client
		.create_article(incomplete)
		.await
		.expect_err("Draft without category or author should be rejected.");

	assert!(is_invalid_input(&err));

	let draft = ArticleDraft {
		title: Some("Bitcoin breaks range".into()),
		category: Some("markets".into()),
		author: Some("Ada".into()),
		content: Some("<p>Body</p>".into()),
		status: Some(ArticleStatus::Published),
		..Default::default()
	};
	let created = client.create_article(draft.clone()).await.expect("Create should succeed.");
	let updated = client.update_article(created.id, draft).await.expect("Update should succeed.");

	client.delete_article(updated.id).await.expect("Delete should succeed.");

	create.assert_calls_async(1).await;
	update.assert_calls_async(1).await;
	delete.assert_calls_async(1).await;
}

#[tokio::test]
async fn category_admin_generates_slugs() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded_client(&server, Some("access-1"), Some("refresh-1"));
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/categories/")
				.json_body(json!({ "name": "Layer  Two", "slug": "layer-two", "count": 0 }));
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"id\":\"5\",\"name\":\"Layer  Two\",\"slug\":\"layer-two\",\"count\":0}");
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/api/categories/5/")
				.json_body(json!({ "name": "Rollups", "slug": "l2" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"5\",\"name\":\"Rollups\",\"slug\":\"l2\",\"count\":3}");
		})
		.await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/categories/l2/");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let created = client.create_category("Layer  Two", None).await.expect("Create should succeed.");
	let updated = client
		.update_category(created.id.clone(), "Rollups", Some("l2"))
		.await
		.expect("Update should succeed.");
	let articles = client.category_articles(&updated.slug).await.expect("Listing should succeed.");

	create.assert_async().await;
	update.assert_async().await;
	listing.assert_async().await;

	assert_eq!(updated.count, 3);
	assert!(articles.is_empty());
	assert!(is_invalid_input(
		&client.create_category("  ", None).await.expect_err("Blank name should be rejected.")
	));
}

#[tokio::test]
async fn ids_and_slugs_cannot_escape_their_path_segment() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded_client(&server, Some("access-1"), Some("refresh-1"));
	let any_delete = server
		.mock_async(|when, then| {
			when.method(DELETE);
			then.status(204);
		})
		.await;
	let any_get = server
		.mock_async(|when, then| {
			when.method(GET);
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let err = client
		.category_articles("defi?x=1#frag")
		.await
		.expect_err("Query and fragment markers should be refused.");

	assert!(is_invalid_input(&err));

	let err = client
		.delete_category("../articles/5")
		.await
		.expect_err("Dot segments should be refused.");

	assert!(is_invalid_input(&err));

	let err = client
		.delete_article("5/related")
		.await
		.expect_err("Nested ids should be refused.");

	assert!(is_invalid_input(&err));

	any_delete.assert_calls_async(0).await;
	any_get.assert_calls_async(0).await;
}

#[tokio::test]
async fn newsletter_flows_send_expected_bodies() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded_client(&server, Some("access-1"), Some("refresh-1"));
	let subscribe = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/newsletter/subscribe/")
				.json_body(json!({ "email": "reader@example.com" }));
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"message\":\"Subscribed successfully.\"}");
		})
		.await;
	let unsubscribe = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/newsletter/unsubscribe/")
				.json_body(json!({ "token": "opt-out-1" }));
			then.status(200).body("{}");
		})
		.await;
	let subscribers = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/newsletter/subscribers/");
			then.status(200).header("content-type", "application/json").body(
				r#"[
					{"id": "1", "email": "a@example.com", "status": "active"},
					{"id": "2", "email": "b@example.com", "status": "unsubscribed"}
				]"#,
			);
		})
		.await;
	let broadcast = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/newsletter/send-newsletter/").json_body(json!({
				"subject": "Weekly wrap",
				"content": "<p>Markets recap</p>",
				"recipientType": "active",
			}));
			then.status(200).body("{\"sent\":1}");
		})
		.await;
	let receipt = client.subscribe("reader@example.com").await.expect("Subscribe should succeed.");

	client
		.unsubscribe(Unsubscribe::Token("opt-out-1".into()))
		.await
		.expect("Unsubscribe should succeed.");

	let entries = client.subscribers().await.expect("Subscriber listing should succeed.");

	client
		.send_newsletter("Weekly wrap", "<p>Markets recap</p>")
		.await
		.expect("Broadcast should succeed.");

	assert!(is_invalid_input(
		&client.send_newsletter(" ", "<p>x</p>").await.expect_err("Blank subject is rejected.")
	));

	subscribe.assert_async().await;
	unsubscribe.assert_async().await;
	subscribers.assert_async().await;
	broadcast.assert_calls_async(1).await;

	assert_eq!(receipt.message.as_deref(), Some("Subscribed successfully."));
	assert_eq!(entries.iter().filter(|s| s.is_active()).count(), 1);
	assert_eq!(entries[1].status, SubscriberStatus::Unsubscribed);
}

#[tokio::test]
async fn profile_upload_and_prices() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded_client(&server, Some("access-1"), Some("refresh-1"));
	let profile = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/api/accounts/profile/")
				.json_body(json!({
					"bio": "Markets desk.",
					"imageUrl": "https://cdn.example.com/ada.png",
				}));
			then.status(200).body("{}");
		})
		.await;
	let upload = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/upload/").header("authorization", "Bearer access-1");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"url\":\"https://cdn.example.com/chart.png\"}");
		})
		.await;
	let prices = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/crypto/prices/");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"symbol\":\"BTCUSDT\",\"price\":64000.5,\"changePercent\":2.5}]");
		})
		.await;

	client
		.update_profile("Markets desk.", "https://cdn.example.com/ada.png")
		.await
		.expect("Profile update should succeed.");

	let stored = client
		.upload_file("chart.png", "image/png", vec![0x89, b'P', b'N', b'G'])
		.await
		.expect("Upload should succeed.");
	let quotes = client.crypto_prices().await.expect("Price feed should load.");

	profile.assert_async().await;
	upload.assert_async().await;
	prices.assert_async().await;

	assert_eq!(stored.url, "https://cdn.example.com/chart.png");
	assert_eq!(quotes[0].symbol, "BTCUSDT");
	assert!(quotes[0].is_up());

	let err = client
		.upload_file("chart.png", "not a mime", vec![1])
		.await
		.expect_err("Malformed MIME type should be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidMime { .. })));
}
