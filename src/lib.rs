//! Flow builder: a canvas diagram editor for flows of typed nodes, backed by
//! an entity-CRUD store.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
pub mod config;
pub mod error;
pub mod flow;
pub mod store;

mod pages;

use crate::components::toast::{ToastStack, Toaster};
use crate::config::AppConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(level: Level) {
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {}", level);
}

/// An app router which renders the flow editor and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(AppConfig::from_build_env());
	provide_context(Toaster::new());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		<Title text="Flow Builder" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
		<ToastStack />
	}
}
