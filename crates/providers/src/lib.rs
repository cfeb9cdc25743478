//! Stablepay Providers
//!
//! Provider-specific adapters for the stablepay route aggregator.

pub mod cctp;
pub mod http;
pub mod lifi;
pub mod route_cache;

pub use cctp::CctpProvider;
pub use lifi::LifiProvider;
pub use route_cache::RouteCache;
pub use stablepay_types::{ProviderError, ProviderResult, RouteProvider};

use std::collections::HashMap;

/// Registry of route providers keyed by provider id
pub struct ProviderRegistry {
	providers: HashMap<String, Box<dyn RouteProvider>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self {
			providers: HashMap::new(),
		}
	}

	/// Registry with both built-in providers registered
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		registry
			.register(Box::new(LifiProvider::with_default_config()))
			.expect("default lifi provider id is unique");
		registry
			.register(Box::new(CctpProvider::with_default_config()))
			.expect("default cctp provider id is unique");
		registry
	}

	/// Register a provider under its own id
	pub fn register(&mut self, provider: Box<dyn RouteProvider>) -> ProviderResult<()> {
		let id = provider.id().to_string();
		if self.providers.contains_key(&id) {
			return Err(ProviderError::AlreadyRegistered { provider_id: id });
		}
		self.providers.insert(id, provider);
		Ok(())
	}

	pub fn get(&self, id: &str) -> Option<&dyn RouteProvider> {
		self.providers.get(id).map(|p| p.as_ref())
	}

	pub fn get_all(&self) -> &HashMap<String, Box<dyn RouteProvider>> {
		&self.providers
	}

	pub fn ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.providers.keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}

impl Default for ProviderRegistry {
	fn default() -> Self {
		Self::new()
	}
}
