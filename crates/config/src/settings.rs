//! Configuration settings structures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stablepay_types::{FeeTier, ProviderRuntimeConfig};

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
	pub server: ServerSettings,
	pub providers: HashMap<String, ProviderConfig>,
	pub timeouts: TimeoutSettings,
	pub fees: FeeSettings,
	pub logging: LoggingSettings,
	/// Participants seeded into the registry at startup
	#[serde(default)]
	pub participants: Vec<ParticipantSeed>,
}

impl Settings {
	/// Providers that are enabled in this configuration
	pub fn enabled_providers(&self) -> HashMap<String, &ProviderConfig> {
		self.providers
			.iter()
			.filter(|(_, config)| config.enabled)
			.map(|(id, config)| (id.clone(), config))
			.collect()
	}

	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Tier schedule as domain fee tiers
	pub fn fee_tiers(&self) -> Vec<FeeTier> {
		self.fees
			.tiers
			.iter()
			.map(|tier| {
				FeeTier::new(
					tier.name.clone(),
					tier.min_volume,
					tier.max_volume,
					tier.fee_rate_bps,
				)
			})
			.collect()
	}
}

impl Default for Settings {
	fn default() -> Self {
		let mut providers = HashMap::new();
		providers.insert(
			"lifi".to_string(),
			ProviderConfig {
				provider_id: "lifi".to_string(),
				endpoint: "https://li.quest/v1".to_string(),
				timeout_ms: 5_000,
				enabled: true,
				api_key: None,
				headers: None,
			},
		);
		providers.insert(
			"cctp".to_string(),
			ProviderConfig {
				provider_id: "cctp".to_string(),
				endpoint: "https://iris-api.circle.com".to_string(),
				timeout_ms: 5_000,
				enabled: true,
				api_key: None,
				headers: None,
			},
		);

		Self {
			server: ServerSettings {
				host: "127.0.0.1".to_string(),
				port: 8080,
				rate_limit_per_minute: None,
			},
			providers,
			timeouts: TimeoutSettings::default(),
			fees: FeeSettings::default(),
			logging: LoggingSettings::default(),
			participants: Vec::new(),
		}
	}
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
	/// Requests allowed per minute; `None` disables rate limiting
	#[serde(default)]
	pub rate_limit_per_minute: Option<u64>,
}

/// Individual provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub endpoint: String,
	pub timeout_ms: u64,
	pub enabled: bool,
	#[serde(default)]
	pub api_key: Option<String>,
	#[serde(default)]
	pub headers: Option<HashMap<String, String>>,
}

/// Convert from settings ProviderConfig to the runtime config providers see
impl From<&ProviderConfig> for ProviderRuntimeConfig {
	fn from(config: &ProviderConfig) -> Self {
		Self {
			provider_id: config.provider_id.clone(),
			endpoint: config.endpoint.clone(),
			timeout_ms: config.timeout_ms,
			api_key: config.api_key.clone(),
			headers: config.headers.clone(),
		}
	}
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeoutSettings {
	/// Per-provider timeout in milliseconds
	pub per_provider_ms: u64,
	/// Global aggregation timeout in milliseconds
	pub global_ms: u64,
	/// Route result cache TTL in seconds
	pub cache_ttl_secs: u64,
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			per_provider_ms: 5_000,
			global_ms: 10_000,
			cache_ttl_secs: 60,
		}
	}
}

/// Fee engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeeSettings {
	/// Custom tier schedule; empty means the built-in default
	#[serde(default)]
	pub tiers: Vec<TierConfig>,
	/// Protocol share of realized yield, in basis points
	#[serde(default = "default_yield_protocol_bps")]
	pub yield_protocol_bps: u32,
}

fn default_yield_protocol_bps() -> u32 {
	1_000
}

impl Default for FeeSettings {
	fn default() -> Self {
		Self {
			tiers: Vec::new(),
			yield_protocol_bps: default_yield_protocol_bps(),
		}
	}
}

/// Minimal tier shape for config to avoid exposing domain defaults here
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TierConfig {
	pub name: String,
	pub min_volume: u64,
	#[serde(default)]
	pub max_volume: Option<u64>,
	pub fee_rate_bps: u32,
}

/// A participant registered at startup
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParticipantSeed {
	pub id: String,
	#[serde(default)]
	pub gas_allowance: bool,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Compact,
			structured: false,
		}
	}
}

/// Log output formats
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_settings_enable_builtin_providers() {
		let settings = Settings::default();
		let enabled = settings.enabled_providers();

		assert!(enabled.contains_key("lifi"));
		assert!(enabled.contains_key("cctp"));
		assert_eq!(settings.bind_address(), "127.0.0.1:8080");
	}

	#[test]
	fn test_settings_deserialize_from_toml() {
		let raw = r#"
			[server]
			host = "0.0.0.0"
			port = 9000

			[providers.lifi]
			provider_id = "lifi"
			endpoint = "https://li.quest/v1"
			timeout_ms = 3000
			enabled = true
			api_key = "test-key"

			[timeouts]
			per_provider_ms = 3000
			global_ms = 8000
			cache_ttl_secs = 30

			[fees]
			yield_protocol_bps = 1500
			tiers = [
				{ name = "flat", min_volume = 0, fee_rate_bps = 25 },
			]

			[logging]
			level = "debug"
			format = "json"
			structured = true

			[[participants]]
			id = "shop.eth"
			gas_allowance = true
		"#;

		let settings: Settings = toml::from_str(raw).unwrap();
		assert_eq!(settings.server.port, 9000);
		assert_eq!(
			settings.providers["lifi"].api_key.as_deref(),
			Some("test-key")
		);
		assert_eq!(settings.fees.tiers.len(), 1);
		assert_eq!(settings.fees.yield_protocol_bps, 1500);
		assert_eq!(settings.logging.format, LogFormat::Json);
		assert!(settings.participants[0].gas_allowance);
	}

	#[test]
	fn test_disabled_provider_is_filtered() {
		let mut settings = Settings::default();
		settings.providers.get_mut("lifi").unwrap().enabled = false;

		assert!(!settings.enabled_providers().contains_key("lifi"));
		assert!(settings.enabled_providers().contains_key("cctp"));
	}
}
