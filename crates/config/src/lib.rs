//! Stablepay Config
//!
//! Settings structures and file/env configuration loading.

pub mod loader;
pub mod settings;

pub use loader::load_config;
pub use settings::{
	FeeSettings, LogFormat, LoggingSettings, ParticipantSeed, ProviderConfig, ServerSettings,
	Settings, TierConfig, TimeoutSettings,
};
