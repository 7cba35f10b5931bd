//! Project detail overlay, mounted under `/projects/:id` on top of the diagram.

use leptos::ev;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use log::debug;
use url::Url;

use crate::components::diagram::{LoadState, ProjectDetail};
use crate::pages::diagram::DiagramLoad;

/// How a `videos` entry gets embedded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoSource {
	/// Hosted player page, rendered in an `<iframe>`.
	Embed(String),
	/// Plain file, rendered with `<video controls>`.
	File(String),
}

/// Parses absolute URLs, and scheme-less ones like `youtu.be/abc`.
/// Site-relative paths are not page links.
fn parse_link(link: &str) -> Option<Url> {
	if link.starts_with('/') {
		return None;
	}
	Url::parse(link)
		.or_else(|_| Url::parse(&format!("https://{link}")))
		.ok()
}

fn youtube_id(url: &Url, host: &str) -> Option<String> {
	let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
	let id = match host {
		"youtu.be" => segments.next().map(str::to_string),
		"youtube.com" | "youtube-nocookie.com" => match segments.next()? {
			"watch" => url
				.query_pairs()
				.find(|(key, _)| key == "v")
				.map(|(_, v)| v.into_owned()),
			"embed" | "shorts" | "live" | "v" => segments.next().map(str::to_string),
			_ => None,
		},
		_ => None,
	};
	id.filter(|id| !id.is_empty())
}

fn vimeo_id(url: &Url) -> Option<String> {
	url.path_segments()?
		.find(|s| !s.is_empty())
		.filter(|s| s.chars().all(|c| c.is_ascii_digit()))
		.map(str::to_string)
}

/// Map YouTube and Vimeo page links to their player URLs.
pub fn video_source(link: &str) -> VideoSource {
	let Some(url) = parse_link(link) else {
		return VideoSource::File(link.to_string());
	};
	let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
	let host = host
		.strip_prefix("www.")
		.or_else(|| host.strip_prefix("m."))
		.unwrap_or(&host);

	if host == "player.vimeo.com" {
		return VideoSource::Embed(link.to_string());
	}
	if let Some(id) = youtube_id(&url, host) {
		return VideoSource::Embed(format!("https://www.youtube.com/embed/{id}"));
	}
	if host == "vimeo.com" {
		if let Some(id) = vimeo_id(&url) {
			return VideoSource::Embed(format!("https://player.vimeo.com/video/{id}"));
		}
	}
	VideoSource::File(link.to_string())
}

/// `images`, or the single legacy `image` field when the list is empty.
fn gallery(detail: &ProjectDetail) -> Vec<String> {
	if !detail.images.is_empty() {
		return detail.images.clone();
	}
	detail
		.extra
		.get("image")
		.and_then(|v| v.as_str())
		.filter(|s| !s.is_empty())
		.map(|s| vec![s.to_string()])
		.unwrap_or_default()
}

fn paragraphs(text: &str) -> Vec<String> {
	text.split("\n\n")
		.map(str::trim)
		.filter(|p| !p.is_empty())
		.map(str::to_string)
		.collect()
}

#[component]
fn ProjectBody(detail: ProjectDetail) -> impl IntoView {
	let descriptions: Vec<String> = detail
		.descriptions()
		.into_iter()
		.flat_map(paragraphs)
		.collect();
	let images = gallery(&detail);
	let alt = detail.title_en.clone();
	let year = detail.year.as_ref().map(|y| y.to_string());

	view! {
		<div class="project-text">
			<h2>{detail.title_en}</h2>
			<h2>{detail.title_ko}</h2>
			{year.map(|y| view! { <h2 class="project-year">{y}</h2> })}
			{detail.caption.map(|c| view! { <p class="project-caption">{c}</p> })}
			<div class="project-description">
				{descriptions.into_iter().map(|p| view! { <p>{p}</p> }).collect_view()}
			</div>
		</div>
		<div class="project-media">
			{images
				.into_iter()
				.map(|src| view! { <img src=src alt=alt.clone() class="project-image" /> })
				.collect_view()}
			{detail
				.videos
				.into_iter()
				.map(|url| match video_source(&url) {
					VideoSource::Embed(src) => view! {
						<iframe src=src class="project-video" allowfullscreen=true></iframe>
					}
					.into_any(),
					VideoSource::File(src) => view! {
						<video src=src class="project-video" controls=true></video>
					}
					.into_any(),
				})
				.collect_view()}
		</div>
	}
}

/// Detail panel for the project in the route's `:id`.
#[component]
pub fn ProjectOverlay() -> impl IntoView {
	let params = use_params_map();
	let load = use_context::<DiagramLoad>();
	let navigate = use_navigate();

	let close_nav = navigate.clone();
	let close = move || close_nav("/", Default::default());

	let esc_close = close.clone();
	let handle = window_event_listener(ev::keydown, move |ev| {
		if ev.key() == "Escape" {
			debug!("project overlay closed with Escape");
			esc_close();
		}
	});
	on_cleanup(move || handle.remove());

	let body = move || {
		let id = params.with(|p| p.get("id")).unwrap_or_default();
		let Some(DiagramLoad(state)) = load else {
			return view! { <p class="overlay-status">"Project not found."</p> }.into_any();
		};
		match state.get() {
			LoadState::Loading => view! { <p class="overlay-status">"Loading..."</p> }.into_any(),
			LoadState::Failed(msg) => view! {
				<p class="overlay-status error">{format!("Could not load projects: {msg}")}</p>
			}
			.into_any(),
			LoadState::Ready(data) => match data.project(&id) {
				Some(detail) => view! { <ProjectBody detail=detail.clone() /> }.into_any(),
				None => view! { <p class="overlay-status">{format!("No project \"{id}\".")}</p> }
					.into_any(),
			},
		}
	};

	let (backdrop_close, button_close) = (close.clone(), close);
	view! {
		<div class="project-overlay" on:click=move |_| backdrop_close()>
			<div class="project-panel" on:click=|ev| ev.stop_propagation()>
				<button class="overlay-close" aria-label="Close" on:click=move |_| button_close()>
					"×"
				</button>
				{body}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn youtube_links_become_embeds() {
		let embed = VideoSource::Embed("https://www.youtube.com/embed/l_0ZW-7QKYw".to_string());
		assert_eq!(video_source("https://youtu.be/l_0ZW-7QKYw?si=cYupbCM_azINMUN3"), embed);
		assert_eq!(video_source("https://www.youtube.com/watch?v=l_0ZW-7QKYw&t=10"), embed);
		assert_eq!(video_source("youtube.com/watch?feature=share&v=l_0ZW-7QKYw"), embed);
	}

	#[test]
	fn youtube_hosts_ignore_case_and_mobile_prefix() {
		let embed = VideoSource::Embed("https://www.youtube.com/embed/abc123".to_string());
		assert_eq!(video_source("https://m.youtube.com/watch?v=abc123"), embed);
		assert_eq!(video_source("HTTPS://YOUTU.BE/abc123"), embed);
		assert_eq!(video_source("https://WWW.YouTube.com/watch?v=abc123"), embed);
	}

	#[test]
	fn youtube_shorts_and_embeds_use_the_player() {
		let embed = VideoSource::Embed("https://www.youtube.com/embed/abc123".to_string());
		assert_eq!(video_source("https://www.youtube.com/shorts/abc123"), embed);
		assert_eq!(video_source("https://youtube.com/embed/abc123?start=5"), embed);
		assert_eq!(
			video_source("https://www.youtube.com/watch?list=x"),
			VideoSource::File("https://www.youtube.com/watch?list=x".to_string())
		);
	}

	#[test]
	fn vimeo_and_existing_players() {
		assert_eq!(
			video_source("https://vimeo.com/123456"),
			VideoSource::Embed("https://player.vimeo.com/video/123456".to_string())
		);
		let player = "https://player.vimeo.com/video/9";
		assert_eq!(video_source(player), VideoSource::Embed(player.to_string()));
	}

	#[test]
	fn other_urls_are_files() {
		assert_eq!(video_source("/videos/a.mp4"), VideoSource::File("/videos/a.mp4".to_string()));
		assert_eq!(
			video_source("https://vimeo.com/channels/x"),
			VideoSource::File("https://vimeo.com/channels/x".to_string())
		);
	}

	#[test]
	fn gallery_falls_back_to_single_image() {
		let single: ProjectDetail =
			serde_json::from_value(json!({ "id": "p", "image": "/images/p.jpg" })).unwrap();
		assert_eq!(gallery(&single), vec!["/images/p.jpg"]);

		let listed: ProjectDetail = serde_json::from_value(json!({
			"id": "p", "image": "/images/p.jpg", "images": ["/a.jpg", "/b.jpg"]
		}))
		.unwrap();
		assert_eq!(gallery(&listed), vec!["/a.jpg", "/b.jpg"]);
	}

	#[test]
	fn descriptions_split_on_blank_lines() {
		assert_eq!(paragraphs("one\n\n  two \n\n\n"), vec!["one", "two"]);
	}
}
