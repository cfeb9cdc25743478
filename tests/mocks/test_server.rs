//! Relay test server for integration tests

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::task::JoinHandle;

use stablepay_relay::mocks::{MockRouteProvider, MockSigner};
use stablepay_relay::{RelayBuilder, RouteFamily};

use super::configs;

/// Running relay instance bound to an ephemeral port
pub struct TestServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
}

impl TestServer {
	/// Spawn a relay backed by one successful mock provider
	///
	/// Returns the shared call counter so tests can assert on cache
	/// short-circuiting.
	pub async fn spawn_with_mock_provider(
	) -> Result<(Self, Arc<AtomicUsize>), Box<dyn std::error::Error>> {
		let provider = MockRouteProvider::success("mock", RouteFamily::Aggregator);
		let calls = provider.call_counter();

		let (app, _) = RelayBuilder::default()
			.with_settings(configs::settings_for_mock_provider("mock"))
			.without_default_providers()
			.with_provider(Box::new(provider))
			.start()
			.await?;

		let server = Self::spawn_app(app).await?;
		Ok((server, calls))
	}

	/// Spawn a relay whose only provider fails every request
	pub async fn spawn_with_failing_provider() -> Result<Self, Box<dyn std::error::Error>> {
		let (app, _) = RelayBuilder::default()
			.with_settings(configs::settings_for_mock_provider("broken"))
			.without_default_providers()
			.with_provider(Box::new(MockRouteProvider::failing("broken")))
			.start()
			.await?;

		Self::spawn_app(app).await
	}

	/// Spawn a relay with no providers configured
	pub async fn spawn_minimal() -> Result<Self, Box<dyn std::error::Error>> {
		let (app, _) = RelayBuilder::default()
			.with_settings(configs::settings_without_providers())
			.without_default_providers()
			.start()
			.await?;

		Self::spawn_app(app).await
	}

	/// Spawn a relay with a signer for paywall tests
	pub async fn spawn_with_signer(
		signer: MockSigner,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let (app, _) = RelayBuilder::default()
			.with_settings(configs::settings_without_providers())
			.without_default_providers()
			.with_signer(Arc::new(signer))
			.start()
			.await?;

		Self::spawn_app(app).await
	}

	/// Bind the app to an ephemeral port and serve it in the background
	pub async fn spawn_app(app: axum::Router) -> Result<Self, Box<dyn std::error::Error>> {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;

		let handle = tokio::spawn(async move {
			axum::serve(listener, app).await.ok();
		});

		Ok(Self {
			base_url: format!("http://{}", addr),
			handle,
		})
	}

	pub fn abort(&self) {
		self.handle.abort();
	}
}
