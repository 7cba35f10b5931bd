use std::sync::Arc;

use leptos::ev;
use leptos::prelude::*;

use crate::components::diagram::DiagramData;

/// Info modal for an "upcoming" node. Shows the node label, and the
/// matching project record when one exists.
#[component]
pub fn UpcomingModal(data: Arc<DiagramData>, id: String, on_close: Callback<()>) -> impl IntoView {
	let label = data
		.graph
		.node(&id)
		.map(|n| n.label.clone())
		.unwrap_or_else(|| id.clone());
	let detail = data.project(&id).cloned();

	let handle = window_event_listener(ev::keydown, move |ev| {
		if ev.key() == "Escape" {
			on_close.run(());
		}
	});
	on_cleanup(move || handle.remove());

	let extra = detail.map(|d| {
		let titles = [d.title_en.clone(), d.title_ko.clone()]
			.into_iter()
			.filter(|t| !t.is_empty() && *t != label)
			.collect::<Vec<_>>();
		let descriptions: Vec<String> = d.descriptions().into_iter().map(str::to_string).collect();
		view! {
			{titles
				.into_iter()
				.map(|t| view! { <h3 class="upcoming-title">{t}</h3> })
				.collect_view()}
			{d.caption.map(|c| view! { <p class="upcoming-caption">{c}</p> })}
			{descriptions.into_iter().map(|p| view! { <p>{p}</p> }).collect_view()}
		}
	});

	view! {
		<div class="upcoming-backdrop" on:click=move |_| on_close.run(())>
			<div class="upcoming-modal" on:click=|ev| ev.stop_propagation()>
				<button class="overlay-close" aria-label="Close" on:click=move |_| on_close.run(())>
					"×"
				</button>
				<h2>"Upcoming Events"</h2>
				<h3 class="upcoming-label">{label.clone()}</h3>
				{extra}
			</div>
		</div>
	}
}
