// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
// self
use newsroom_client::{
	ClientConfig,
	auth::TokenSecret,
	client::ReqwestApiClient,
	session::{MemoryStore, Session},
};

pub const ARTICLE_JSON: &str = r#"{
	"id": 1,
	"title": "Bitcoin breaks range",
	"excerpt": "Volatility returns.",
	"category": "markets",
	"content": "<p>Body</p>",
	"status": "published"
}"#;

pub fn config_for(server: &MockServer) -> ClientConfig {
	ClientConfig::new(&server.url("/api/")).expect("Mock server base URL should parse.")
}

/// Client against `server` whose session holds the given credentials.
pub fn seeded_client(
	server: &MockServer,
	access: Option<&str>,
	refresh: Option<&str>,
) -> (ReqwestApiClient, MemoryStore) {
	seeded_client_with(config_for(server), access, refresh)
}

pub fn seeded_client_with(
	config: ClientConfig,
	access: Option<&str>,
	refresh: Option<&str>,
) -> (ReqwestApiClient, MemoryStore) {
	let access = access.map(TokenSecret::from);
	let refresh = refresh.map(TokenSecret::from);
	let store = MemoryStore::with_credentials(access, refresh);
	let client = ReqwestApiClient::new(config, Session::new(Arc::new(store.clone())));

	(client, store)
}
