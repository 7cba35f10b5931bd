use leptos::prelude::*;

use crate::components::diagram::{KeywordFilter, LayoutMode};
use crate::config::{DiagramConfig, NavLink};

#[component]
fn KeywordToggle(keyword: String, filter: RwSignal<KeywordFilter>) -> impl IntoView {
	let (checked_kw, toggle_kw) = (keyword.clone(), keyword.clone());
	view! {
		<label class="keyword-toggle">
			<input
				type="checkbox"
				prop:checked=move || filter.with(|f| f.contains(&checked_kw))
				on:change=move |_| filter.update(|f| {
					f.toggle(&toggle_kw);
				})
			/>
			<span>{keyword}</span>
		</label>
	}
}

#[component]
pub fn NavLinks(
	links: Vec<NavLink>,
	#[prop(default = "nav-links")] class: &'static str,
) -> impl IntoView {
	view! {
		<nav class=class>
			{links
				.into_iter()
				.map(|link| {
					let external = link.is_external();
					view! {
						<a
							href=link.href
							target=external.then_some("_blank")
							rel=external.then_some("noopener noreferrer")
						>
							{link.label}
						</a>
					}
				})
				.collect_view()}
		</nav>
	}
}

/// Keyword checkboxes, the time-ordered switch and the outbound links.
#[component]
pub fn DiagramControls(
	keywords: Vec<String>,
	filter: RwSignal<KeywordFilter>,
	layout_mode: RwSignal<LayoutMode>,
) -> impl IntoView {
	let config = use_context::<DiagramConfig>().unwrap_or_default();
	let year_grid = move || layout_mode.get() == LayoutMode::YearGrid;

	view! {
		<div class="diagram-controls">
			<div class="diagram-filter">
				<h4>"Keywords"</h4>
				{keywords
					.into_iter()
					.map(|keyword| view! { <KeywordToggle keyword=keyword filter=filter /> })
					.collect_view()}
				<div class="time-toggle">
					<span>"Time-Ordered View"</span>
					<label class="switch" class:on=year_grid>
						<input
							type="checkbox"
							prop:checked=year_grid
							on:change=move |_| layout_mode.update(|m| *m = m.toggled())
						/>
						<span class="switch-knob"></span>
					</label>
				</div>
			</div>
			<NavLinks links=config.nav_links />
		</div>
	}
}
