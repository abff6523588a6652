//! Thread-safe in-memory [`CredentialStore`] for short-lived processes and tests.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	session::{CredentialKey, CredentialStore, StoreFuture},
};

type StoreMap = Arc<RwLock<BTreeMap<CredentialKey, TokenSecret>>>;

/// Storage backend that keeps credentials in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Builds a store pre-seeded with the provided credentials.
	pub fn with_credentials(
		access: Option<TokenSecret>,
		refresh: Option<TokenSecret>,
	) -> Self {
		let mut map = BTreeMap::new();

		if let Some(access) = access {
			map.insert(CredentialKey::AccessToken, access);
		}
		if let Some(refresh) = refresh {
			map.insert(CredentialKey::RefreshToken, refresh);
		}

		Self(Arc::new(RwLock::new(map)))
	}

	/// Number of credentials currently stored.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no credential is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl CredentialStore for MemoryStore {
	fn load(&self, key: CredentialKey) -> StoreFuture<'_, Option<TokenSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn save(&self, key: CredentialKey, secret: TokenSecret) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(key, secret);

			Ok(())
		})
	}

	fn remove(&self, key: CredentialKey) -> StoreFuture<'_, Option<TokenSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove(&key)) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().clear();

			Ok(())
		})
	}
}
