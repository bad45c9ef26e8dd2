//! Build-time application settings.

use log::Level;

/// Startup settings. The WASM build has no process environment, so values
/// are baked in at compile time from `FLOW_*` variables.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Entity API root; `None` runs against the in-memory demo store.
	pub api_base_url: Option<String>,
	/// Sent as the `api_key` header.
	pub api_key: Option<String>,
	/// Flow opened on the home page.
	pub default_flow_id: String,
	/// Console log level.
	pub log_level: Level,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: None,
			api_key: None,
			default_flow_id: "demo".into(),
			log_level: Level::Debug,
		}
	}
}

impl AppConfig {
	/// Reads `FLOW_API_URL`, `FLOW_API_KEY`, `FLOW_DEFAULT_ID` and
	/// `FLOW_LOG_LEVEL` as captured by the compiler.
	pub fn from_build_env() -> Self {
		Self::from_values(
			option_env!("FLOW_API_URL"),
			option_env!("FLOW_API_KEY"),
			option_env!("FLOW_DEFAULT_ID"),
			option_env!("FLOW_LOG_LEVEL"),
		)
	}

	fn from_values(
		api_url: Option<&str>,
		api_key: Option<&str>,
		flow_id: Option<&str>,
		log_level: Option<&str>,
	) -> Self {
		let non_empty = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
		let defaults = Self::default();
		Self {
			api_base_url: non_empty(api_url),
			api_key: non_empty(api_key),
			default_flow_id: non_empty(flow_id).unwrap_or(defaults.default_flow_id),
			log_level: log_level
				.and_then(|l| l.trim().parse().ok())
				.unwrap_or(defaults.log_level),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_values_fall_back_to_defaults() {
		let config = AppConfig::from_values(Some("  "), None, Some(""), Some("loud"));
		assert_eq!(config, AppConfig::default());
	}

	#[test]
	fn values_are_trimmed_and_parsed() {
		let config = AppConfig::from_values(
			Some(" https://api.example.com "),
			Some("k"),
			Some("flow-42"),
			Some("warn"),
		);
		assert_eq!(config.api_base_url.as_deref(), Some("https://api.example.com"));
		assert_eq!(config.api_key.as_deref(), Some("k"));
		assert_eq!(config.default_flow_id, "flow-42");
		assert_eq!(config.log_level, Level::Warn);
	}
}
