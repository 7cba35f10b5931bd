//! Interactive project/media diagram for an artist portfolio, as a Leptos
//! client-side app.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
pub mod config;
pub mod error;
mod pages;

use crate::components::project_overlay::ProjectOverlay;
use crate::config::DiagramConfig;
use crate::pages::diagram::DiagramPage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Router with the diagram at `/`, project details nested under it, and a 404.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	provide_context(DiagramConfig::from_document());

	view! {
		<Html attr:lang="ko" attr:dir="ltr" />

		<Title text="Diagram" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<ParentRoute path=path!("/") view=DiagramPage>
					<Route path=path!("") view=|| () />
					<Route path=path!("projects/:id") view=ProjectOverlay />
				</ParentRoute>
			</Routes>
		</Router>
	}
}
