use std::sync::Arc;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Outlet;
use leptos_router::hooks::use_navigate;
use log::{debug, error};

use crate::components::controls::DiagramControls;
use crate::components::diagram::{
	DiagramCanvas, KeywordFilter, LayoutMode, LoadState, NodeAction, load_diagram,
};
use crate::components::mobile::MobilePortfolio;
use crate::components::upcoming_modal::UpcomingModal;
use crate::config::DiagramConfig;

/// Load state shared with the nested project overlay route.
#[derive(Clone, Copy)]
pub struct DiagramLoad(pub RwSignal<LoadState>);

fn viewport_width() -> f64 {
	web_sys::window()
		.and_then(|w| w.inner_width().ok())
		.and_then(|v| v.as_f64())
		.unwrap_or(f64::MAX)
}

/// Whether the viewport is at or below `breakpoint`, kept current on resize.
fn use_compact_viewport(breakpoint: f64) -> ReadSignal<bool> {
	let (compact, set_compact) = signal(viewport_width() <= breakpoint);
	let handle = window_event_listener(ev::resize, move |_| {
		let next = viewport_width() <= breakpoint;
		if compact.get_untracked() != next {
			debug!("viewport compact = {next}");
			set_compact.set(next);
		}
	});
	on_cleanup(move || handle.remove());
	compact
}

/// Diagram page: canvas and controls on wide screens, card grid on narrow
/// ones. Child routes render on top through the `Outlet`.
#[component]
pub fn DiagramPage() -> impl IntoView {
	let config = use_context::<DiagramConfig>().unwrap_or_default();
	let load = RwSignal::new(LoadState::Loading);
	provide_context(DiagramLoad(load));

	let data_config = config.data.clone();
	spawn_local(async move {
		match load_diagram(&data_config).await {
			Ok(data) => {
				let _ = load.try_set(LoadState::Ready(Arc::new(data)));
			}
			Err(err) => {
				error!("diagram load failed: {err}");
				let _ = load.try_set(LoadState::Failed(err.to_string()));
			}
		}
	});

	let compact = use_compact_viewport(config.mobile_breakpoint);
	let filter = RwSignal::new(KeywordFilter::default());
	let layout_mode = RwSignal::new(LayoutMode::default());
	let upcoming = RwSignal::new(None::<String>);

	let navigate = use_navigate();
	let on_action = Callback::new(move |action: NodeAction| {
		debug!("node action {action:?}");
		match action {
			NodeAction::OpenProject(id) => navigate(&format!("/projects/{id}"), Default::default()),
			NodeAction::OpenUpcoming(id) => upcoming.set(Some(id)),
		}
	});
	let close_upcoming = Callback::new(move |()| upcoming.set(None));

	let body = move || match load.get() {
		LoadState::Loading => view! { <p class="diagram-status">"Loading..."</p> }.into_any(),
		LoadState::Failed(msg) => view! {
			<div class="diagram-status error">
				<p>"The diagram could not be loaded."</p>
				<p class="detail">{msg}</p>
			</div>
		}
		.into_any(),
		LoadState::Ready(data) if data.graph.is_empty() => {
			view! { <p class="diagram-status">"Nothing to show yet."</p> }.into_any()
		}
		LoadState::Ready(data) if compact.get() => {
			view! { <MobilePortfolio data=data /> }.into_any()
		}
		LoadState::Ready(data) => {
			let keywords = data.graph.keywords();
			let graph = data.graph.clone();
			let modal = move || {
				upcoming.get().map(|id| {
					view! { <UpcomingModal data=data.clone() id=id on_close=close_upcoming /> }
				})
			};
			view! {
				<div class="fullscreen-graph">
					<DiagramCanvas
						graph=graph
						filter=filter
						layout_mode=layout_mode
						on_action=on_action
					/>
					<div class="graph-overlay">
						<DiagramControls keywords=keywords filter=filter layout_mode=layout_mode />
					</div>
					{modal}
				</div>
			}
			.into_any()
		}
	};

	view! {
		<div class="diagram-page">
			{body}
			<Outlet />
		</div>
	}
}
