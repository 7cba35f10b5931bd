//! Card grid shown instead of the diagram on narrow viewports.

use std::collections::BTreeSet;
use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::controls::NavLinks;
use crate::components::diagram::{
	DiagramData, DiagramGraph, DiagramNode, KeywordFilter, NodeIdx, NodeKind, year_caption,
};
use crate::config::DiagramConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaTab {
	/// `None` is the "All" tab.
	pub id: Option<String>,
	pub label: String,
}

fn in_media(node: &DiagramNode, media: Option<&str>) -> bool {
	media.is_none_or(|m| node.media_refs.contains(m))
}

/// "All", then every media outlet in order of first reference, walking
/// project nodes in node-list order and each project's `media` list in
/// order. Outlets without a media node are labelled by id.
pub fn media_tabs(data: &DiagramData) -> Vec<MediaTab> {
	let mut ids: Vec<&str> = Vec::new();
	for (_, node) in data.graph.projects() {
		let Some(detail) = data.project(&node.id) else {
			continue;
		};
		for id in &detail.media {
			if !ids.contains(&id.as_str()) {
				ids.push(id.as_str());
			}
		}
	}

	let all = MediaTab {
		id: None,
		label: "All".to_string(),
	};
	std::iter::once(all)
		.chain(ids.into_iter().map(|id| MediaTab {
			id: Some(id.to_string()),
			label: data
				.graph
				.node(id)
				.filter(|n| n.kind == NodeKind::Media)
				.map_or_else(|| id.to_string(), |n| n.label.clone()),
		}))
		.collect()
}

/// Keywords of the projects under the selected outlet, sorted.
pub fn keyword_options(graph: &DiagramGraph, media: Option<&str>) -> Vec<String> {
	graph
		.projects()
		.filter(|(_, n)| in_media(n, media))
		.flat_map(|(_, n)| n.keywords.iter().cloned())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

/// Matching projects, newest first by earliest year.
pub fn card_indices(
	graph: &DiagramGraph,
	media: Option<&str>,
	filter: &KeywordFilter,
) -> Vec<NodeIdx> {
	let mut cards: Vec<NodeIdx> = graph
		.projects()
		.filter(|(_, n)| in_media(n, media) && filter.matches(&n.keywords))
		.map(|(idx, _)| idx)
		.collect();
	cards.sort_by(|&a, &b| graph.nodes[b].earliest_year().cmp(&graph.nodes[a].earliest_year()));
	cards
}

#[component]
fn ProjectCard(node: DiagramNode, thumbnail: String) -> impl IntoView {
	let navigate = use_navigate();
	let href = format!("/projects/{}", node.id);
	let years = year_caption(&node.years).unwrap_or_default();
	view! {
		<div class="project-card" on:click=move |_| navigate(&href, Default::default())>
			<img src=thumbnail alt=node.label.clone() class="card-thumb" />
			<div class="card-title">{node.label}</div>
			<div class="card-tags">
				{node
					.keywords
					.into_iter()
					.map(|k| view! { <span class="tag">{k}</span> })
					.collect_view()}
			</div>
			<div class="card-years">{years}</div>
		</div>
	}
}

#[component]
pub fn MobilePortfolio(data: Arc<DiagramData>) -> impl IntoView {
	let config = use_context::<DiagramConfig>().unwrap_or_default();
	let media = RwSignal::new(None::<String>);
	let filter = RwSignal::new(KeywordFilter::default());
	let tabs = media_tabs(&data);

	let data_kw = data.clone();
	let keyword_chips = move || {
		media.with(|m| keyword_options(&data_kw.graph, m.as_deref()))
			.into_iter()
			.map(|k| {
				let (active_kw, toggle_kw) = (k.clone(), k.clone());
				view! {
					<button
						class="keyword-chip"
						class:active=move || filter.with(|f| f.contains(&active_kw))
						on:click=move |_| filter.update(|f| {
							f.toggle(&toggle_kw);
						})
					>
						{k}
					</button>
				}
			})
			.collect_view()
	};

	let data_cards = data.clone();
	let data_config = config.data.clone();
	let cards = move || {
		let indices =
			media.with(|m| filter.with(|f| card_indices(&data_cards.graph, m.as_deref(), f)));
		indices
			.into_iter()
			.map(|idx| {
				let node = data_cards.graph.nodes[idx].clone();
				let thumbnail = data_config.thumbnail_url(&node.id);
				view! { <ProjectCard node=node thumbnail=thumbnail /> }
			})
			.collect_view()
	};

	view! {
		<div class="mobile-portfolio">
			<div class="media-tabs">
				{tabs
					.into_iter()
					.map(|tab| {
						let (active_id, select_id) = (tab.id.clone(), tab.id);
						view! {
							<button
								class="media-tab"
								class:active=move || media.with(|m| *m == active_id)
								on:click=move |_| {
									media.set(select_id.clone());
									filter.update(|f| f.clear());
								}
							>
								{tab.label}
							</button>
						}
					})
					.collect_view()}
			</div>
			<div class="keyword-chips">{keyword_chips}</div>
			<div class="card-grid">{cards}</div>
			<p class="mobile-hint">
				"전체 다이어그램은 PC에서 더 편하게 보실 수 있습니다"
			</p>
			<NavLinks links=config.nav_links class="mobile-nav" />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn sample_data() -> DiagramData {
		DiagramData::from_parts(
			serde_json::from_value(json!([
				{ "id": "m2", "type": "media", "label": "Radio", "px": 0.1, "py": 0.1 },
				{ "id": "m1", "type": "media", "label": "TV", "px": 0.2, "py": 0.1 },
				{ "id": "old", "type": "project", "label": "Old", "px": 0.3, "py": 0.3,
				  "years": [2018, 2022], "keywords": ["film"] },
				{ "id": "new", "type": "project", "label": "New", "px": 0.4, "py": 0.4,
				  "years": [2023], "keywords": ["film", "archive"] },
				{ "id": "undated", "type": "project", "label": "?", "px": 0.5, "py": 0.5 },
				{ "id": "soon", "type": "upcoming", "label": "Soon", "px": 0.6, "py": 0.6 }
			]))
			.unwrap(),
			vec![],
			serde_json::from_value(json!([
				{ "id": "old", "media": ["m1"] },
				{ "id": "new", "media": ["m1", "m2", "zine"] }
			]))
			.unwrap(),
		)
	}

	fn sample() -> DiagramGraph {
		sample_data().graph
	}

	#[test]
	fn tabs_follow_first_reference_order() {
		let tabs = media_tabs(&sample_data());
		let labels: Vec<&str> = tabs.iter().map(|t| t.label.as_str()).collect();
		assert_eq!(labels, vec!["All", "TV", "Radio", "zine"]);
		assert_eq!(tabs[0].id, None);
		assert_eq!(tabs[1].id.as_deref(), Some("m1"));
		assert_eq!(tabs[3].id.as_deref(), Some("zine"));
	}

	#[test]
	fn cards_sorted_by_earliest_year_descending() {
		let graph = sample();
		let ids = |v: Vec<NodeIdx>| {
			v.into_iter()
				.map(|i| graph.nodes[i].id.clone())
				.collect::<Vec<_>>()
		};

		let all = card_indices(&graph, None, &KeywordFilter::default());
		assert_eq!(ids(all), vec!["new", "old", "undated"]);

		let radio = card_indices(&graph, Some("m2"), &KeywordFilter::default());
		assert_eq!(ids(radio), vec!["new"]);
	}

	#[test]
	fn keyword_filter_applies_to_cards() {
		let graph = sample();
		let mut filter = KeywordFilter::default();
		filter.toggle("archive");
		let cards = card_indices(&graph, Some("m1"), &filter);
		assert_eq!(cards.len(), 1);
		assert_eq!(graph.nodes[cards[0]].id, "new");
	}

	#[test]
	fn keyword_options_scoped_to_media() {
		let graph = sample();
		assert_eq!(keyword_options(&graph, None), vec!["archive", "film"]);
		assert_eq!(keyword_options(&graph, Some("m1")), vec!["archive", "film"]);
		assert!(keyword_options(&graph, Some("nothing")).is_empty());
	}
}
