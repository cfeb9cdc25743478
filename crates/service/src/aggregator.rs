//! Core route aggregation logic

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use stablepay_providers::{ProviderRegistry, RouteCache};
use stablepay_types::routes::AggregationMetadata;
use stablepay_types::{ProviderRuntimeConfig, RouteKind, RouteOption, RouteRequest, RouteResult};

/// Per-provider outcome of one aggregation round
enum ProviderOutcome {
	Success(Vec<RouteOption>),
	Failed(String),
	TimedOut,
}

/// Service that fans a routing request out to all registered providers
///
/// Providers are queried concurrently; a slow or failing provider never
/// blocks the others and never fails the aggregation on its own. Failures
/// surface as diagnostic route entries so callers can see why a route is
/// missing.
pub struct RouteAggregator {
	registry: Arc<ProviderRegistry>,
	configs: HashMap<String, ProviderRuntimeConfig>,
	cache: RouteCache,
	per_provider_timeout_ms: u64,
	global_timeout_ms: u64,
}

impl RouteAggregator {
	pub fn new(
		registry: Arc<ProviderRegistry>,
		configs: Vec<ProviderRuntimeConfig>,
		cache: RouteCache,
		per_provider_timeout_ms: u64,
		global_timeout_ms: u64,
	) -> Self {
		let configs = configs
			.into_iter()
			.map(|c| (c.provider_id.clone(), c))
			.collect();

		Self {
			registry,
			configs,
			cache,
			per_provider_timeout_ms,
			global_timeout_ms,
		}
	}

	/// Validate that every configured provider id resolves to a registered
	/// provider
	pub fn validate_providers(&self) -> Result<(), String> {
		for provider_id in self.configs.keys() {
			if self.registry.get(provider_id).is_none() {
				return Err(format!(
					"Config references unknown provider '{}'",
					provider_id
				));
			}
		}
		Ok(())
	}

	/// Fetch routes concurrently from all applicable providers
	pub async fn fetch_routes(
		&self,
		request: RouteRequest,
	) -> RouteResult<(Vec<RouteOption>, AggregationMetadata)> {
		request.validate()?;

		let started = Instant::now();

		// Providers are filtered by routing family before fan-out, so an
		// excluded family is never queried at all.
		let selected: Vec<String> = self
			.registry
			.ids()
			.into_iter()
			.filter(|id| self.configs.contains_key(id))
			.filter(|id| {
				self.registry
					.get(id)
					.map(|provider| request.wants_family(provider.family()))
					.unwrap_or(false)
			})
			.collect();

		info!(
			"Fetching routes from {} provider(s) for {} {} -> {} {}",
			selected.len(),
			request.from_token,
			request.from_chain,
			request.to_token,
			request.to_chain
		);

		let mut metadata = AggregationMetadata {
			providers_queried: selected.len(),
			..Default::default()
		};

		// Cache check per provider namespace; a hit short-circuits the
		// provider call entirely.
		let mut cached: HashMap<String, Vec<RouteOption>> = HashMap::new();
		let mut to_query: Vec<String> = Vec::new();
		for provider_id in &selected {
			let key = format!("{}:{}", provider_id, request.normalized_key());
			match self.cache.get(&key) {
				Some(routes) => {
					metadata.cache_hits += 1;
					cached.insert(provider_id.clone(), routes);
				},
				None => to_query.push(provider_id.clone()),
			}
		}

		let tasks = to_query.iter().map(|provider_id| {
			let provider_id = provider_id.clone();
			let request = request.clone();
			let registry = Arc::clone(&self.registry);
			let config = self.configs.get(&provider_id).cloned();
			let per_provider_timeout = Duration::from_millis(self.per_provider_timeout_ms);

			tokio::spawn(async move {
				debug!("Starting route fetch from provider {}", provider_id);

				let Some(config) = config else {
					return (
						provider_id.clone(),
						ProviderOutcome::Failed("no runtime config".to_string()),
					);
				};
				let Some(provider) = registry.get(&provider_id) else {
					return (
						provider_id.clone(),
						ProviderOutcome::Failed("provider not registered".to_string()),
					);
				};

				match timeout(per_provider_timeout, provider.find_routes(&request, &config)).await
				{
					Ok(Ok(routes)) => {
						info!(
							"Provider {} returned {} route(s)",
							provider_id,
							routes.len()
						);
						(provider_id, ProviderOutcome::Success(routes))
					},
					Ok(Err(e)) => {
						warn!("Provider {} returned error: {}", provider_id, e);
						(provider_id, ProviderOutcome::Failed(e.to_string()))
					},
					Err(_) => {
						warn!("Provider {} timed out", provider_id);
						(provider_id, ProviderOutcome::TimedOut)
					},
				}
			})
		});

		// Global timeout over the whole fan-out; one stuck join handle must
		// not hold the request hostage.
		let global_timeout = Duration::from_millis(self.global_timeout_ms);
		let results = match timeout(global_timeout, join_all(tasks)).await {
			Ok(results) => results,
			Err(_) => {
				warn!(
					"Global aggregation timeout reached after {}ms",
					self.global_timeout_ms
				);
				Vec::new()
			},
		};

		let mut outcomes: HashMap<String, ProviderOutcome> = results
			.into_iter()
			.filter_map(|joined| joined.ok())
			.collect();

		// Providers lost to the global timeout are reported as timed out
		for provider_id in &to_query {
			outcomes
				.entry(provider_id.clone())
				.or_insert(ProviderOutcome::TimedOut);
		}

		// Merge in deterministic provider order: live routes first, then
		// diagnostics. Only successful results are cached.
		let mut routes: Vec<RouteOption> = Vec::new();
		let mut diagnostics: Vec<RouteOption> = Vec::new();
		let mut any_failure = false;

		for provider_id in &selected {
			if let Some(hit) = cached.remove(provider_id) {
				routes.extend(hit);
				continue;
			}

			match outcomes.remove(provider_id) {
				Some(ProviderOutcome::Success(provider_routes)) => {
					metadata.providers_responded_success += 1;
					let key = format!("{}:{}", provider_id, request.normalized_key());
					self.cache.set(key, provider_routes.clone());
					routes.extend(provider_routes);
				},
				Some(ProviderOutcome::Failed(reason)) => {
					metadata.providers_responded_error += 1;
					any_failure = true;
					diagnostics.push(RouteOption::diagnostic(provider_id, reason));
				},
				Some(ProviderOutcome::TimedOut) => {
					metadata.providers_timed_out += 1;
					any_failure = true;
					diagnostics.push(RouteOption::diagnostic(
						provider_id,
						format!("timed out after {}ms", self.per_provider_timeout_ms),
					));
				},
				None => {},
			}
		}

		// Every provider failed: degrade to one best-effort synthetic
		// estimate rather than returning only diagnostics.
		if routes.is_empty() && any_failure {
			routes.push(Self::synthetic_estimate(&request));
		}

		routes.extend(diagnostics);

		metadata.total_duration_ms = started.elapsed().as_millis() as u64;
		info!(
			"Route aggregation completed: {} route(s) from {} provider(s) in {}ms",
			routes.len(),
			selected.len(),
			metadata.total_duration_ms
		);

		Ok((routes, metadata))
	}

	/// Best-effort quote produced when no provider could answer
	fn synthetic_estimate(request: &RouteRequest) -> RouteOption {
		let fee_minor = request
			.amount
			.trim()
			.parse::<u64>()
			.map(|amount| amount * 30 / 10_000)
			.unwrap_or(0);

		RouteOption::new(
			format!(
				"{} {} on {} -> {} on {} (all providers unavailable)",
				request.amount,
				request.from_token,
				request.from_chain,
				request.to_token,
				request.to_chain
			),
			format!(
				"{}.{:02} USDC",
				fee_minor / 1_000_000,
				(fee_minor % 1_000_000) / 10_000
			),
			if request.is_cross_chain() {
				"~5 min"
			} else {
				"~1 min"
			},
			"estimate",
		)
		.with_kind(RouteKind::Standard)
	}

	/// Perform health checks on all configured providers
	pub async fn health_check_all(&self) -> HashMap<String, bool> {
		let mut results = HashMap::new();

		for (provider_id, config) in &self.configs {
			if let Some(provider) = self.registry.get(provider_id) {
				let healthy = provider.health_check(config).await.unwrap_or(false);
				results.insert(provider_id.clone(), healthy);
			} else {
				results.insert(provider_id.clone(), false);
			}
		}

		results
	}

	/// Get aggregation statistics
	pub fn stats(&self) -> AggregationStats {
		AggregationStats {
			registered_providers: self.registry.len(),
			configured_providers: self.configs.len(),
			per_provider_timeout_ms: self.per_provider_timeout_ms,
			global_timeout_ms: self.global_timeout_ms,
		}
	}
}

/// Aggregator configuration statistics
#[derive(Debug, Clone)]
pub struct AggregationStats {
	pub registered_providers: usize,
	pub configured_providers: usize,
	pub per_provider_timeout_ms: u64,
	pub global_timeout_ms: u64,
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use stablepay_types::{ProviderError, ProviderInfo, ProviderResult, RouteFamily, RouteProvider};

	/// Mock provider with call tracking, configurable delay and failure mode
	#[derive(Debug)]
	struct MockProvider {
		info: ProviderInfo,
		calls: Arc<AtomicUsize>,
		should_fail: bool,
		response_delay_ms: u64,
		routes: Vec<RouteOption>,
	}

	impl MockProvider {
		fn success(id: &str, family: RouteFamily) -> (Self, Arc<AtomicUsize>) {
			let calls = Arc::new(AtomicUsize::new(0));
			let provider = Self {
				info: ProviderInfo::new(id, format!("{} Mock", id), "1.0.0", family),
				calls: Arc::clone(&calls),
				should_fail: false,
				response_delay_ms: 0,
				routes: vec![RouteOption::new("mock path", "0.10 USDC", "~1 min", id)],
			};
			(provider, calls)
		}

		fn failing(id: &str) -> Self {
			let (mut provider, _) = Self::success(id, RouteFamily::Aggregator);
			provider.should_fail = true;
			provider
		}

		fn slow(id: &str, delay_ms: u64) -> Self {
			let (mut provider, _) = Self::success(id, RouteFamily::Aggregator);
			provider.response_delay_ms = delay_ms;
			provider
		}

		fn empty(id: &str) -> Self {
			let (mut provider, _) = Self::success(id, RouteFamily::Aggregator);
			provider.routes = Vec::new();
			provider
		}
	}

	#[async_trait]
	impl RouteProvider for MockProvider {
		fn info(&self) -> &ProviderInfo {
			&self.info
		}

		async fn find_routes(
			&self,
			_request: &RouteRequest,
			_config: &ProviderRuntimeConfig,
		) -> ProviderResult<Vec<RouteOption>> {
			self.calls.fetch_add(1, Ordering::Relaxed);

			if self.response_delay_ms > 0 {
				tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
			}

			if self.should_fail {
				return Err(ProviderError::http_failure(503, "backend down"));
			}

			Ok(self.routes.clone())
		}

		async fn health_check(&self, _config: &ProviderRuntimeConfig) -> ProviderResult<bool> {
			Ok(!self.should_fail)
		}
	}

	fn request() -> RouteRequest {
		RouteRequest::new("base", "arbitrum", "100000000", "USDC", "USDC")
	}

	fn aggregator_with(providers: Vec<Box<dyn RouteProvider>>) -> RouteAggregator {
		let mut registry = ProviderRegistry::new();
		let mut configs = Vec::new();
		for provider in providers {
			configs.push(ProviderRuntimeConfig::new(provider.id(), "http://localhost"));
			registry.register(provider).unwrap();
		}

		RouteAggregator::new(Arc::new(registry), configs, RouteCache::new(), 200, 1_000)
	}

	#[tokio::test]
	async fn test_merges_routes_from_all_providers() {
		let (a, _) = MockProvider::success("alpha", RouteFamily::Aggregator);
		let (b, _) = MockProvider::success("beta", RouteFamily::NativeBridge);
		let aggregator = aggregator_with(vec![Box::new(a), Box::new(b)]);

		let (routes, metadata) = aggregator.fetch_routes(request()).await.unwrap();
		assert_eq!(routes.len(), 2);
		assert_eq!(metadata.providers_queried, 2);
		assert_eq!(metadata.providers_responded_success, 2);
	}

	#[tokio::test]
	async fn test_cache_hit_short_circuits_provider_call() {
		let (provider, calls) = MockProvider::success("alpha", RouteFamily::Aggregator);
		let aggregator = aggregator_with(vec![Box::new(provider)]);

		let (first, _) = aggregator.fetch_routes(request()).await.unwrap();
		assert_eq!(calls.load(Ordering::Relaxed), 1);

		let (second, metadata) = aggregator.fetch_routes(request()).await.unwrap();
		assert_eq!(calls.load(Ordering::Relaxed), 1, "cache hit must not re-query");
		assert_eq!(metadata.cache_hits, 1);
		assert_eq!(first, second, "cached result must be identical");
	}

	#[tokio::test]
	async fn test_one_failure_does_not_fail_aggregation() {
		let (ok, _) = MockProvider::success("alpha", RouteFamily::Aggregator);
		let aggregator =
			aggregator_with(vec![Box::new(ok), Box::new(MockProvider::failing("beta"))]);

		let (routes, metadata) = aggregator.fetch_routes(request()).await.unwrap();

		let live: Vec<_> = routes.iter().filter(|r| !r.is_diagnostic()).collect();
		let diagnostics: Vec<_> = routes.iter().filter(|r| r.is_diagnostic()).collect();

		assert_eq!(live.len(), 1);
		assert_eq!(diagnostics.len(), 1);
		assert_eq!(diagnostics[0].provider, "beta-error");
		assert!(diagnostics[0].path.contains("backend down"));
		assert_eq!(metadata.providers_responded_error, 1);
	}

	#[tokio::test]
	async fn test_all_failed_degrades_to_synthetic_estimate() {
		let aggregator = aggregator_with(vec![
			Box::new(MockProvider::failing("alpha")),
			Box::new(MockProvider::failing("beta")),
		]);

		let (routes, _) = aggregator.fetch_routes(request()).await.unwrap();

		assert_eq!(routes[0].provider, "estimate");
		assert!(routes[0].is_estimate());
		assert_eq!(routes.iter().filter(|r| r.is_diagnostic()).count(), 2);
	}

	#[tokio::test]
	async fn test_not_applicable_yields_empty_without_synthetic() {
		let aggregator = aggregator_with(vec![Box::new(MockProvider::empty("alpha"))]);

		let (routes, _) = aggregator.fetch_routes(request()).await.unwrap();
		assert!(routes.is_empty(), "no failures means no synthetic estimate");
	}

	#[tokio::test]
	async fn test_slow_provider_times_out_without_blocking_others() {
		let (fast, _) = MockProvider::success("fast", RouteFamily::Aggregator);
		let aggregator = aggregator_with(vec![
			Box::new(fast),
			Box::new(MockProvider::slow("slow", 2_000)),
		]);

		let (routes, metadata) = aggregator.fetch_routes(request()).await.unwrap();

		assert!(routes.iter().any(|r| r.provider == "fast"));
		assert!(routes.iter().any(|r| r.provider == "slow-error"));
		assert_eq!(metadata.providers_timed_out, 1);
	}

	#[tokio::test]
	async fn test_family_filter_skips_other_families() {
		let (a, a_calls) = MockProvider::success("alpha", RouteFamily::Aggregator);
		let (b, b_calls) = MockProvider::success("beta", RouteFamily::NativeBridge);
		let aggregator = aggregator_with(vec![Box::new(a), Box::new(b)]);

		let req = request().with_families(vec![RouteFamily::NativeBridge]);
		let (routes, metadata) = aggregator.fetch_routes(req).await.unwrap();

		assert_eq!(routes.len(), 1);
		assert_eq!(routes[0].provider, "beta");
		assert_eq!(metadata.providers_queried, 1);
		assert_eq!(a_calls.load(Ordering::Relaxed), 0);
		assert_eq!(b_calls.load(Ordering::Relaxed), 1);
	}

	#[tokio::test]
	async fn test_invalid_request_is_rejected() {
		let (provider, _) = MockProvider::success("alpha", RouteFamily::Aggregator);
		let aggregator = aggregator_with(vec![Box::new(provider)]);

		let mut req = request();
		req.amount = "not-a-number".to_string();
		assert!(aggregator.fetch_routes(req).await.is_err());
	}

	#[tokio::test]
	async fn test_validate_providers_flags_unknown_config() {
		let (provider, _) = MockProvider::success("alpha", RouteFamily::Aggregator);
		let mut registry = ProviderRegistry::new();
		registry.register(Box::new(provider)).unwrap();

		let aggregator = RouteAggregator::new(
			Arc::new(registry),
			vec![ProviderRuntimeConfig::new("ghost", "http://localhost")],
			RouteCache::new(),
			200,
			1_000,
		);

		assert!(aggregator.validate_providers().is_err());
	}
}
