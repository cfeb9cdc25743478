//! Stablepay Relay Library
//!
//! Payment-routing and monetization core of a stablecoin payment relay:
//! route discovery across liquidity/bridge providers, a pay-to-access
//! handshake for gated resources, and the protocol fee engine.

pub mod mocks;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

// Core domain types - the most commonly used types
pub use stablepay_types::{
	chrono,
	// External dependencies for convenience
	serde_json,
	AllocationSlice,
	DiscountReason,
	FeeBreakdown,
	FeeTier,
	PaymentDetails,
	PaymentProof,
	ProbeOutcome,
	// Error types
	ProtocolError,
	ProviderError,
	RouteError,
	RouteFamily,
	// Primary domain entities
	RouteOption,
	RouteRequest,
	RoutesResponse,
	StrategyAllocation,
	StrategyKind,
	TierProgress,
	YieldSplit,
};

// Service layer
pub use stablepay_service::{
	FeeEngine, PaymentPlan, PaymentPlanRequest, PaymentPlanner, RouteAggregator,
	StrategyAllocator,
};

// Protocol layer
pub use stablepay_protocol::{PaymentSigner, PaywallClient, PaywallResponse};

// Storage layer
pub use stablepay_storage::MemoryStore;
pub use stablepay_types::storage::{
	Participant, ParticipantStore, PreferenceStore, ReceiptStore,
};

// Providers
pub use stablepay_providers::{ProviderRegistry, RouteCache, RouteProvider};

// API layer
pub use stablepay_api::{create_router, AppState};

// Config
pub use stablepay_config::{load_config, Settings};

// Module aliases for advanced usage
pub mod types {
	pub use stablepay_types::*;
}

pub mod providers {
	pub use stablepay_providers::*;
}

pub mod service {
	pub use stablepay_service::*;
}

pub mod protocol {
	pub use stablepay_protocol::*;
}

pub mod storage {
	pub use stablepay_storage::*;
}

pub mod config {
	pub use stablepay_config::*;
}

pub mod api {
	pub use stablepay_api::*;
}

// Re-export external dependencies used at the builder seam
pub use async_trait;
pub use reqwest;

/// Builder pattern for configuring the relay
pub struct RelayBuilder {
	settings: Option<Settings>,
	store: MemoryStore,
	registry: Option<ProviderRegistry>,
	signer: Option<Arc<dyn PaymentSigner>>,
}

impl RelayBuilder {
	pub fn new() -> Self {
		Self {
			settings: None,
			store: MemoryStore::new(),
			registry: None,
			signer: None,
		}
	}

	/// Use a pre-populated in-memory store
	pub fn with_store(mut self, store: MemoryStore) -> Self {
		self.store = store;
		self
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Register a custom route provider (uses the provider's own id)
	///
	/// Panics if registration fails; duplicate provider ids at startup are a
	/// fatal configuration error.
	pub fn with_provider(mut self, provider: Box<dyn RouteProvider>) -> Self {
		let mut registry = self.registry.unwrap_or_else(ProviderRegistry::with_defaults);
		registry
			.register(provider)
			.expect("Failed to register provider during startup");
		self.registry = Some(registry);
		self
	}

	/// Start from an empty provider registry instead of the built-ins
	pub fn without_default_providers(mut self) -> Self {
		self.registry = Some(ProviderRegistry::new());
		self
	}

	/// Set the payment signer used by the paywall endpoint
	pub fn with_signer(mut self, signer: Arc<dyn PaymentSigner>) -> Self {
		self.signer = Some(signer);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Seed participants declared in settings into the registry store
	async fn seed_participants(&self, settings: &Settings) -> Result<(), String> {
		for seed in &settings.participants {
			let mut participant = Participant::new(seed.id.clone());
			if seed.gas_allowance {
				participant = participant.with_gas_allowance();
			}
			self.store
				.add(participant)
				.await
				.map_err(|e| format!("Failed to seed participant '{}': {}", seed.id, e))?;
		}
		Ok(())
	}

	/// Start the relay and return the configured router with state
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();

		self.seed_participants(&settings).await?;

		let registry = Arc::new(
			self.registry
				.unwrap_or_else(ProviderRegistry::with_defaults),
		);

		let configs: Vec<stablepay_types::ProviderRuntimeConfig> = settings
			.enabled_providers()
			.values()
			.map(|config| (*config).into())
			.collect();

		let cache = RouteCache::with_ttl(Duration::from_secs(settings.timeouts.cache_ttl_secs));
		let aggregator = RouteAggregator::new(
			registry,
			configs,
			cache,
			settings.timeouts.per_provider_ms,
			settings.timeouts.global_ms,
		);
		aggregator
			.validate_providers()
			.map_err(|e| format!("Provider validation failed: {}", e))?;

		let participants: Arc<dyn ParticipantStore> = Arc::new(self.store.clone());
		let preferences: Arc<dyn PreferenceStore> = Arc::new(self.store.clone());
		let receipts: Arc<dyn ReceiptStore> = Arc::new(self.store.clone());

		let tiers = settings.fee_tiers();
		let fee_engine = if tiers.is_empty() {
			FeeEngine::with_default_schedule(Arc::clone(&participants))
		} else {
			FeeEngine::new(tiers, Arc::clone(&participants))
		}
		.with_yield_protocol_bps(settings.fees.yield_protocol_bps);

		let paywall = PaywallClient::new()?.with_receipts(receipts);
		let signer = self
			.signer
			.unwrap_or_else(|| Arc::new(mocks::MockSigner::new("0x0000000000000000000000000000000000000000")));

		let aggregator = Arc::new(aggregator);
		let fee_engine = Arc::new(fee_engine);
		let allocator = Arc::new(StrategyAllocator::new(Arc::clone(&preferences)));
		let planner = Arc::new(PaymentPlanner::new(
			Arc::clone(&aggregator),
			Arc::clone(&allocator),
			Arc::clone(&fee_engine),
		));

		let app_state = AppState {
			aggregator,
			fee_engine,
			allocator,
			planner,
			paywall: Arc::new(paywall),
			signer,
			participants,
			preferences,
		};

		let router = create_router().with_state(app_state.clone());

		info!(
			"Relay initialized with {} registered participant(s)",
			self.store.participant_count()
		);

		Ok((router, app_state))
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(
		&self,
		settings: &Settings,
	) -> Result<(), Box<dyn std::error::Error>> {
		use stablepay_config::LogFormat;

		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

		match settings.logging.format {
			LogFormat::Json => {
				let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
			LogFormat::Pretty => {
				let subscriber = tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
			LogFormat::Compact => {
				let subscriber = tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
		}

		Ok(())
	}

	/// Start the complete server with all defaults and setup
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		// Load .env file if it exists
		dotenvy::dotenv().ok();

		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config().unwrap_or_default(),
		};

		self.init_tracing_from_settings(&settings)?;

		info!("Configuring stablepay relay server");
		let enabled = settings.enabled_providers();
		info!("Enabled providers: {}", enabled.len());
		for (id, provider) in &enabled {
			info!(
				"  - {}: {} ({}ms timeout)",
				id, provider.endpoint, provider.timeout_ms
			);
		}

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		let rate_limit = settings.server.rate_limit_per_minute;
		self.settings = Some(settings);
		let (app, _) = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;
		info!("Stablepay relay listening on {}", bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  POST /v1/routes");
		info!("  POST /v1/payments/plan");
		info!("  POST /v1/fees/quote");
		info!("  GET  /v1/fees/progress");
		info!("  POST /v1/fees/yield");
		info!("  POST /v1/participants");
		info!("  POST /v1/allocations/preview");
		info!("  PUT  /v1/allocations/preferences");
		info!("  POST /v1/paywall/fetch");

		// Optional global rate limiting at the make_service level
		if let Some(requests_per_minute) = rate_limit {
			use tower::limit::RateLimitLayer;
			use tower::ServiceBuilder;
			let make_svc = ServiceBuilder::new()
				.layer(RateLimitLayer::new(
					requests_per_minute,
					Duration::from_secs(60),
				))
				.service(app.into_make_service());
			axum::serve(listener, make_svc).await?;
		} else {
			axum::serve(listener, app).await?;
		}

		Ok(())
	}
}

impl Default for RelayBuilder {
	fn default() -> Self {
		Self::new()
	}
}
