//! Credential storage contracts, built-in stores, and the [`Session`] owner handed to the client.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for persisted session credentials.
///
/// Every operation must be atomic with respect to the others: a reader never observes a
/// half-applied [`clear`](CredentialStore::clear).
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the secret stored under `key`, if any.
	fn load(&self, key: CredentialKey) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Persists or replaces the secret stored under `key`.
	fn save(&self, key: CredentialKey, secret: TokenSecret) -> StoreFuture<'_, ()>;

	/// Removes the secret stored under `key`, returning the previous value.
	fn remove(&self, key: CredentialKey) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Removes every stored credential in one step.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Fixed names under which session credentials are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKey {
	/// Short-lived bearer credential.
	AccessToken,
	/// Credential exchanged for new access tokens.
	RefreshToken,
}
impl CredentialKey {
	/// Returns the persisted key name.
	pub const fn as_str(self) -> &'static str {
		match self {
			CredentialKey::AccessToken => "access_token",
			CredentialKey::RefreshToken => "refresh_token",
		}
	}
}
impl Display for CredentialKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Single owner of the session credentials used by the client.
///
/// Cloning is cheap and every clone shares the same store.
#[derive(Clone)]
pub struct Session {
	store: Arc<dyn CredentialStore>,
}
impl Session {
	/// Wraps an existing credential store.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self { store }
	}

	/// Builds a session backed by a fresh [`MemoryStore`].
	pub fn in_memory() -> Self {
		Self::new(Arc::new(MemoryStore::default()))
	}

	/// Returns the stored access credential.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.load(CredentialKey::AccessToken).await?)
	}

	/// Returns the stored refresh credential.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.load(CredentialKey::RefreshToken).await?)
	}

	/// Returns `true` when an access credential is stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.access_token().await?.is_some())
	}

	/// Stores a freshly issued access/refresh pair.
	pub async fn store_pair(&self, pair: &TokenPair) -> Result<()> {
		self.store.save(CredentialKey::AccessToken, pair.access.clone()).await?;
		self.store.save(CredentialKey::RefreshToken, pair.refresh.clone()).await?;

		Ok(())
	}

	/// Replaces the access credential, keeping the refresh credential untouched.
	pub async fn store_access(&self, access: TokenSecret) -> Result<()> {
		Ok(self.store.save(CredentialKey::AccessToken, access).await?)
	}

	/// Replaces the refresh credential.
	pub async fn store_refresh(&self, refresh: TokenSecret) -> Result<()> {
		Ok(self.store.save(CredentialKey::RefreshToken, refresh).await?)
	}

	/// Deletes both credentials together.
	pub async fn clear(&self) -> Result<()> {
		Ok(self.store.clear().await?)
	}
}
impl Default for Session {
	fn default() -> Self {
		Self::in_memory()
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Session(..)")
	}
}
