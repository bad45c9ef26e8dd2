use flow_builder::config::AppConfig;
use flow_builder::{App, init_logging};
use leptos::prelude::*;

fn main() {
	init_logging(AppConfig::from_build_env().log_level);
	mount_to_body(App)
}
