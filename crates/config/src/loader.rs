//! Configuration loading utilities

use config::{Config, ConfigError, Environment, File};

use crate::Settings;

/// Load configuration from the config file and environment
///
/// Reads `config/config.{toml,yaml,json}` when present, then applies
/// `STABLEPAY_*` environment overrides (`STABLEPAY_SERVER__PORT=9000`).
/// The LI.FI credential can also come from `LIFI_API_KEY`.
pub fn load_config() -> Result<Settings, ConfigError> {
	let s = Config::builder()
		.add_source(File::with_name("config/config").required(false))
		.add_source(Environment::with_prefix("STABLEPAY").separator("__"))
		.build()?;

	let mut settings: Settings = s.try_deserialize().unwrap_or_default();

	if let Ok(api_key) = std::env::var("LIFI_API_KEY") {
		if let Some(lifi) = settings.providers.get_mut("lifi") {
			lifi.api_key.get_or_insert(api_key);
		}
	}

	Ok(settings)
}
